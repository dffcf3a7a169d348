//! Current-document context for revision prompts.
//!
//! Renders a document's fields and style overrides as an XML-style block
//! that is placed ahead of the instruction, so the model can produce a
//! scoped update instead of regenerating everything.

use quill_core::models::document::Document;
use quill_core::models::field::FieldValue;

pub fn build_document_block(document: &Document) -> String {
    let mut block = format!(
        "<current_document template=\"{}\" version=\"{}\">\n",
        document.template_id(),
        document.version()
    );

    for (name, value) in document.fields() {
        match value {
            FieldValue::Text(text) => {
                block.push_str(&format!("<field name=\"{name}\">"));
                block.push_str(text);
                block.push_str("</field>\n");
            }
            FieldValue::List(items) => {
                block.push_str(&format!("<field name=\"{name}\" kind=\"list\">\n"));
                for item in items {
                    block.push_str(&format!("<item>{item}</item>\n"));
                }
                block.push_str("</field>\n");
            }
        }
    }

    for (property, value) in document.style_overrides() {
        block.push_str(&format!("<style property=\"{property}\">{value}</style>\n"));
    }

    block.push_str("</current_document>");
    block
}
