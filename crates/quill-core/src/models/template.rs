use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tera::ast::{Expr, ExprVal, FunctionCall, Node};
use ts_rs::TS;

use crate::error::CoreError;

use super::document_type::DocumentType;

const MAX_STYLE_VALUE_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Semantic type of a slot. Field updates are checked against it at merge time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SlotKind {
    /// A single line, at most 200 characters.
    ShortText,
    LongText,
    /// A single line; free-form ("July 12", "2025-07-12").
    Date,
    TextList,
}

impl SlotKind {
    pub const SHORT_TEXT_MAX: usize = 200;

    pub fn is_list(&self) -> bool {
        matches!(self, SlotKind::TextList)
    }

    pub fn is_single_line(&self) -> bool {
        matches!(self, SlotKind::ShortText | SlotKind::Date)
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlotKind::ShortText => "short text",
            SlotKind::LongText => "long text",
            SlotKind::Date => "date",
            SlotKind::TextList => "list of text",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Slot {
    pub name: String,
    pub kind: SlotKind,
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

impl Slot {
    pub fn required(name: &str, kind: SlotKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            description: String::new(),
        }
    }

    pub fn optional(name: &str, kind: SlotKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// A style property a template accepts overrides for, and where it lands
/// in the stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StyleRule {
    /// Key used in `style_overrides`, e.g. `titleFontSize`.
    pub property: String,
    pub selector: String,
    pub css_property: String,
    pub default: String,
}

/// Visual family a template belongs to. Several templates of one document
/// type usually differ only in style.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TemplateStyle {
    #[default]
    Professional,
    Modern,
    Formal,
    Creative,
    Minimal,
}

impl TemplateStyle {
    pub const ALL: [TemplateStyle; 5] = [
        TemplateStyle::Professional,
        TemplateStyle::Modern,
        TemplateStyle::Formal,
        TemplateStyle::Creative,
        TemplateStyle::Minimal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateStyle::Professional => "professional",
            TemplateStyle::Modern => "modern",
            TemplateStyle::Formal => "formal",
            TemplateStyle::Creative => "creative",
            TemplateStyle::Minimal => "minimal",
        }
    }
}

impl fmt::Display for TemplateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        TemplateStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownTemplateStyle(s.to_string()))
    }
}

/// A renderable template: an HTML skeleton with named, typed slots.
///
/// Templates are immutable once registered; the registry only hands out
/// shared references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub document_type: DocumentType,
    #[serde(default)]
    pub style: TemplateStyle,
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub style_rules: Vec<StyleRule>,
    #[serde(default)]
    pub css: String,
    pub skeleton: String,
}

impl Template {
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn style_rule(&self, property: &str) -> Option<&StyleRule> {
        self.style_rules.iter().find(|r| r.property == property)
    }

    pub fn required_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.required)
    }

    /// Names the skeleton reads from its context. Names bound by `for`,
    /// `set` and macro arguments are excluded within their scope, and
    /// `raw` blocks are not inspected.
    pub fn referenced_names(&self) -> Result<BTreeSet<String>, CoreError> {
        let name = format!("{}.html", self.id);
        let mut tera = tera::Tera::default();
        tera.add_raw_template(&name, &self.skeleton)
            .map_err(|e| CoreError::InvalidTemplate {
                template_id: self.id.clone(),
                reason: format!("skeleton does not parse: {}", flatten(&e)),
            })?;
        let parsed = tera.get_template(&name).map_err(|e| CoreError::InvalidTemplate {
            template_id: self.id.clone(),
            reason: e.to_string(),
        })?;

        let mut refs = References::default();
        refs.nodes(&parsed.ast);
        Ok(refs.found)
    }

    /// Check the registration invariants: well-formed, unique slot names and
    /// style properties, valid style defaults, a skeleton that parses, and
    /// every name the skeleton references declared as a slot.
    pub fn validate(&self) -> Result<(), CoreError> {
        let invalid = |reason: String| CoreError::InvalidTemplate {
            template_id: self.id.clone(),
            reason,
        };

        if self.id.as_str().trim().is_empty() {
            return Err(invalid("template id is empty".to_string()));
        }

        let mut seen = BTreeSet::new();
        for slot in &self.slots {
            if !is_identifier(&slot.name) {
                return Err(invalid(format!("slot name '{}' is not an identifier", slot.name)));
            }
            if !seen.insert(slot.name.as_str()) {
                return Err(invalid(format!("slot '{}' declared twice", slot.name)));
            }
        }

        let mut seen = BTreeSet::new();
        for rule in &self.style_rules {
            if !seen.insert(rule.property.as_str()) {
                return Err(invalid(format!(
                    "style property '{}' declared twice",
                    rule.property
                )));
            }
            if rule.selector.trim().is_empty() || rule.css_property.trim().is_empty() {
                return Err(invalid(format!(
                    "style property '{}' has no target",
                    rule.property
                )));
            }
            validate_style_value(&rule.property, &rule.default)
                .map_err(|e| invalid(e.to_string()))?;
        }

        for name in self.referenced_names()? {
            if self.slot(&name).is_none() {
                return Err(invalid(format!(
                    "skeleton references undeclared slot '{name}'"
                )));
            }
        }

        Ok(())
    }
}

/// Reject values that could break out of a CSS declaration.
pub fn validate_style_value(property: &str, value: &str) -> Result<(), CoreError> {
    let bad = value.trim().is_empty()
        || value.len() > MAX_STYLE_VALUE_LEN
        || value
            .chars()
            .any(|c| matches!(c, ';' | '{' | '}' | '<' | '>' | '\n' | '\r'));

    if bad {
        return Err(CoreError::InvalidStyleValue {
            property: property.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn flatten(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// Free names of a parsed skeleton. `scopes` holds the names bound at each
/// nesting level; the first entry is the template's top level.
struct References {
    scopes: Vec<BTreeSet<String>>,
    found: BTreeSet<String>,
}

impl Default for References {
    fn default() -> Self {
        Self {
            scopes: vec![BTreeSet::new()],
            found: BTreeSet::new(),
        }
    }
}

impl References {
    fn nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.node(node);
        }
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::VariableBlock(_, expr) => self.expr(expr),
            Node::Set(_, set) => {
                self.expr(&set.value);
                let scope = if set.global {
                    self.scopes.first_mut()
                } else {
                    self.scopes.last_mut()
                };
                if let Some(scope) = scope {
                    scope.insert(set.key.clone());
                }
            }
            Node::Forloop(_, forloop, _) => {
                self.expr(&forloop.container);
                let mut bound: BTreeSet<String> =
                    ["loop".to_string(), forloop.value.clone()].into();
                bound.extend(forloop.key.clone());
                self.scoped(bound, &forloop.body);
                if let Some(empty) = &forloop.empty_body {
                    self.nodes(empty);
                }
            }
            Node::If(branches, _) => {
                for (_, condition, body) in &branches.conditions {
                    self.expr(condition);
                    self.nodes(body);
                }
                if let Some((_, body)) = &branches.otherwise {
                    self.nodes(body);
                }
            }
            Node::FilterSection(_, section, _) => {
                self.call(&section.filter);
                self.nodes(&section.body);
            }
            Node::Block(_, block, _) => self.nodes(&block.body),
            Node::MacroDefinition(_, definition, _) => {
                for default in definition.args.values().flatten() {
                    self.expr(default);
                }
                // Macro bodies only see their own arguments.
                let saved = std::mem::replace(
                    &mut self.scopes,
                    vec![definition.args.keys().cloned().collect()],
                );
                self.nodes(&definition.body);
                self.scopes = saved;
            }
            Node::Raw(..)
            | Node::Text(_)
            | Node::Comment(..)
            | Node::Super
            | Node::Extends(..)
            | Node::Include(..)
            | Node::ImportMacro(..)
            | Node::Break(_)
            | Node::Continue(_) => {}
        }
    }

    fn scoped(&mut self, bound: BTreeSet<String>, body: &[Node]) {
        self.scopes.push(bound);
        self.nodes(body);
        self.scopes.pop();
    }

    fn expr(&mut self, expr: &Expr) {
        self.value(&expr.val);
        for filter in &expr.filters {
            self.call(filter);
        }
    }

    fn call(&mut self, call: &FunctionCall) {
        for arg in call.args.values() {
            self.expr(arg);
        }
    }

    fn value(&mut self, value: &ExprVal) {
        match value {
            ExprVal::Ident(ident) => self.ident(ident),
            ExprVal::Math(math) => {
                self.expr(&math.lhs);
                self.expr(&math.rhs);
            }
            ExprVal::Logic(logic) => {
                self.expr(&logic.lhs);
                self.expr(&logic.rhs);
            }
            ExprVal::Test(test) => {
                self.ident(&test.ident);
                for arg in &test.args {
                    self.expr(arg);
                }
            }
            ExprVal::MacroCall(call) => {
                for arg in call.args.values() {
                    self.expr(arg);
                }
            }
            ExprVal::FunctionCall(call) => self.call(call),
            ExprVal::Array(items) => {
                for item in items {
                    self.expr(item);
                }
            }
            ExprVal::StringConcat(concat) => {
                for part in &concat.values {
                    self.value(part);
                }
            }
            ExprVal::In(test) => {
                self.expr(&test.lhs);
                self.expr(&test.rhs);
            }
            ExprVal::String(_) | ExprVal::Int(_) | ExprVal::Float(_) | ExprVal::Bool(_) => {}
        }
    }

    /// `item.name` and `items[0]` read `item` and `items`.
    fn ident(&mut self, ident: &str) {
        let root = ident
            .split(['.', '['])
            .next()
            .unwrap_or(ident)
            .trim();
        if root.is_empty() || root == "__tera_context" {
            return;
        }
        if !self.scopes.iter().any(|scope| scope.contains(root)) {
            self.found.insert(root.to_string());
        }
    }
}
