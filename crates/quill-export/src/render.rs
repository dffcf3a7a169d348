use tera::{Context, Tera};
use tracing::debug;

use quill_core::models::document::Document;
use quill_core::models::field::FieldValue;
use quill_core::models::preview::{PreviewContent, RenderMode};
use quill_core::models::template::Template;

use crate::error::ExportError;
use crate::styles::compose_css;

/// Render a document into its HTML/CSS preview.
///
/// Deterministic: the same document and template always produce identical
/// output. Every slot is present in the context, so empty optional slots
/// render as nothing. Values are HTML-escaped.
///
/// In [`RenderMode::Strict`] a document with empty required slots fails with
/// [`ExportError::MissingRequired`]; in lenient mode they render blank.
pub fn render_preview(
    document: &Document,
    template: &Template,
    mode: RenderMode,
) -> Result<PreviewContent, ExportError> {
    if document.template_id() != &template.id {
        return Err(ExportError::TemplateMismatch {
            document: document.template_id().clone(),
            template: template.id.clone(),
        });
    }

    if mode == RenderMode::Strict {
        let missing = document.missing_required(template);
        if !missing.is_empty() {
            return Err(ExportError::MissingRequired(missing));
        }
    }

    let html = render_skeleton(template, &slot_context(document, template))?;
    let css = compose_css(template, document.style_overrides());

    debug!(
        document_id = %document.id(),
        version = document.version(),
        template_id = %template.id,
        html_len = html.len(),
        "rendered preview"
    );

    Ok(PreviewContent { html, css })
}

fn slot_context(document: &Document, template: &Template) -> Context {
    let mut context = Context::new();
    for slot in &template.slots {
        match document.field(&slot.name) {
            Some(FieldValue::Text(text)) => context.insert(slot.name.as_str(), text),
            Some(FieldValue::List(items)) => context.insert(slot.name.as_str(), items),
            None if slot.kind.is_list() => {
                context.insert(slot.name.as_str(), &Vec::<String>::new())
            }
            None => context.insert(slot.name.as_str(), ""),
        }
    }
    context
}

/// The `.html` suffix turns on Tera's autoescaping.
fn render_skeleton(template: &Template, context: &Context) -> Result<String, ExportError> {
    let name = format!("{}.html", template.id);
    let mut tera = Tera::default();
    tera.add_raw_template(&name, &template.skeleton)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let rendered = tera.render(&name, context)?;
    Ok(rendered)
}
