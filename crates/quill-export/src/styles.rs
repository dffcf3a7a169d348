//! CSS layering and print page geometry.

use std::collections::BTreeMap;
use std::fmt::Write;

use quill_core::models::document_type::DocumentType;
use quill_core::models::template::Template;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Page size for PDF output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    pub fn css_name(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "letter",
        }
    }

    /// Flyers and events print on letter paper; everything else on A4.
    pub fn preferred_for(document_type: DocumentType) -> Self {
        match document_type {
            DocumentType::Flyer | DocumentType::Event => PageSize::Letter,
            _ => PageSize::A4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageLayout {
    pub size: PageSize,
    /// Uniform page margin in points.
    pub margin_pt: u32,
}

impl PageLayout {
    pub const DEFAULT_MARGIN_PT: u32 = 72;

    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            margin_pt: Self::DEFAULT_MARGIN_PT,
        }
    }

    /// Used once when the preferred layout fails.
    pub fn fallback() -> Self {
        Self {
            size: PageSize::A4,
            margin_pt: 36,
        }
    }

    pub fn page_rule(&self) -> String {
        format!(
            "@page {{ size: {}; margin: {}pt; }}",
            self.size.css_name(),
            self.margin_pt
        )
    }
}

/// Template CSS, then one rule per style property at its default, then the
/// document's overrides. Later rules win by cascade order.
pub fn compose_css(template: &Template, overrides: &BTreeMap<String, String>) -> String {
    let mut css = String::with_capacity(template.css.len() + 512);
    css.push_str(template.css.trim_end());
    css.push_str("\n\n/* defaults */\n");
    for rule in &template.style_rules {
        declaration(&mut css, &rule.selector, &rule.css_property, &rule.default);
    }

    let overridden: Vec<_> = template
        .style_rules
        .iter()
        .filter_map(|rule| overrides.get(&rule.property).map(|value| (rule, value)))
        .collect();
    if !overridden.is_empty() {
        css.push_str("\n/* overrides */\n");
        for (rule, value) in overridden {
            declaration(&mut css, &rule.selector, &rule.css_property, value);
        }
    }

    css
}

fn declaration(css: &mut String, selector: &str, property: &str, value: &str) {
    // Writing to a String cannot fail.
    let _ = writeln!(css, "{selector} {{ {property}: {value}; }}");
}
