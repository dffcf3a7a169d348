use std::collections::BTreeMap;

use quill_bedrock::context::build_document_block;
use quill_bedrock::prompt;
use quill_core::TemplateRegistry;
use quill_core::models::document::Document;
use quill_core::models::field::FieldValue;
use quill_core::models::template::TemplateId;

fn event(registry: &TemplateRegistry) -> Document {
    Document::create(
        registry,
        &TemplateId::new("event"),
        BTreeMap::from([
            ("title".to_string(), FieldValue::text("Summer Party")),
            ("highlights".to_string(), FieldValue::list(["Food", "Music"])),
        ]),
        BTreeMap::from([("titleFontSize".to_string(), "32px".to_string())]),
        "summer party",
    )
    .unwrap()
}

#[test]
fn block_wraps_fields_and_styles() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    let block = build_document_block(&event(&registry));

    assert!(block.starts_with("<current_document template=\"event\" version=\"1\">"));
    assert!(block.ends_with("</current_document>"));
    assert!(block.contains("<field name=\"title\">Summer Party</field>"));
    assert!(block.contains("<field name=\"highlights\" kind=\"list\">"));
    assert!(block.contains("<item>Music</item>"));
    assert!(block.contains("<style property=\"titleFontSize\">32px</style>"));
}

#[test]
fn empty_document_block_has_no_fields() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    let doc = Document::create(
        &registry,
        &TemplateId::new("notice"),
        BTreeMap::new(),
        BTreeMap::new(),
        "notice",
    )
    .unwrap();
    let block = build_document_block(&doc);
    assert!(!block.contains("<field"));
    assert!(!block.contains("<style"));
}

#[test]
fn initial_prompt_lists_every_template() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    let system = prompt::initial_system_prompt(&registry);
    for template in registry.iter() {
        assert!(system.contains(&format!("<template id=\"{}\"", template.id)));
    }
    assert!(system.contains("<template id=\"report_creative\" type=\"report\" style=\"creative\""));
    assert!(system.contains("title (short text, required)"));
    assert!(system.contains("\"template_change\""));
}

#[test]
fn revision_prompt_describes_only_current_template() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    let current = registry.lookup(&TemplateId::new("event")).unwrap();
    let system = prompt::revision_system_prompt(&registry, &current);
    assert!(system.contains("<template id=\"event\""));
    assert!(!system.contains("<template id=\"letter\""));
    assert!(system.contains("meeting_minutes"));
    assert!(system.contains("- letter_modern (letter, modern): "));
    assert!(system.contains("Return only the"));
}

#[test]
fn user_message_places_context_before_instruction() {
    let message = prompt::user_message("make the title bigger", Some("<current_document/>"));
    let context_at = message.find("<current_document/>").unwrap();
    let instruction_at = message.find("make the title bigger").unwrap();
    assert!(context_at < instruction_at);

    let bare = prompt::user_message("hello", None);
    assert_eq!(bare, "<instruction>\nhello\n</instruction>");
}
