use std::collections::BTreeMap;

use quill_core::error::KeyScope;
use quill_core::models::document::Document;
use quill_core::models::field::FieldValue;
use quill_core::models::proposal::RevisionProposal;
use quill_core::models::template::{SlotKind, TemplateId};
use quill_core::{CoreError, TemplateRegistry};

fn registry() -> TemplateRegistry {
    TemplateRegistry::with_builtin().unwrap()
}

fn flyer(registry: &TemplateRegistry) -> Document {
    let proposal = RevisionProposal::new()
        .with_template_change(TemplateId::new("flyer"))
        .with_field("title", FieldValue::text("Summer Party"))
        .with_field("date", FieldValue::text("July 12"))
        .with_field("description", FieldValue::text("Food, music and games."));
    Document::from_proposal(registry, &proposal, "make a flyer for a summer party").unwrap()
}

#[test]
fn initial_document_is_version_one_with_no_history() {
    let registry = registry();
    let doc = flyer(&registry);

    assert_eq!(doc.version(), 1);
    assert!(doc.history().is_empty());
    assert_eq!(doc.template_id().as_str(), "flyer");
    assert_eq!(doc.field("title"), Some(&FieldValue::text("Summer Party")));
    assert_eq!(doc.instruction(), "make a flyer for a summer party");
}

#[test]
fn initial_proposal_without_template_is_rejected() {
    let registry = registry();
    let proposal = RevisionProposal::new().with_field("title", FieldValue::text("x"));
    let err = Document::from_proposal(&registry, &proposal, "x").unwrap_err();
    assert!(matches!(err, CoreError::MissingTemplateChange));
}

#[test]
fn style_change_bumps_version_and_keeps_fields() {
    let registry = registry();
    let v1 = flyer(&registry);

    let proposal = RevisionProposal::new().with_style("titleFontSize", "48px");
    let v2 = v1
        .apply_proposal(&registry, &proposal, "make the title bigger")
        .unwrap();

    assert_eq!(v2.version(), 2);
    assert_eq!(v2.id(), v1.id());
    assert_eq!(v2.fields(), v1.fields());
    assert_eq!(v2.style_overrides().get("titleFontSize").unwrap(), "48px");
    assert_eq!(v2.history().len(), 1);
    assert_eq!(v2.history()[0].version, 1);
    assert_eq!(v2.history()[0].fields, *v1.fields());

    // The previous value is untouched.
    assert_eq!(v1.version(), 1);
    assert!(v1.style_overrides().is_empty());
}

#[test]
fn unknown_field_rejects_whole_proposal() {
    let registry = registry();
    let v1 = flyer(&registry);

    let proposal = RevisionProposal::new()
        .with_field("title", FieldValue::text("Winter Party"))
        .with_field("signature", FieldValue::text("Jane"));
    let err = v1.apply_proposal(&registry, &proposal, "sign it").unwrap_err();

    assert!(matches!(
        err,
        CoreError::UnknownSlot { ref key, scope: KeyScope::Field, .. } if key == "signature"
    ));
    assert_eq!(v1.field("title"), Some(&FieldValue::text("Summer Party")));
}

#[test]
fn unknown_style_property_is_rejected() {
    let registry = registry();
    let v1 = flyer(&registry);
    let proposal = RevisionProposal::new().with_style("borderRadius", "4px");
    let err = v1.apply_proposal(&registry, &proposal, "round it").unwrap_err();
    assert!(matches!(err, CoreError::UnknownSlot { scope: KeyScope::Style, .. }));
}

#[test]
fn list_value_in_text_slot_is_a_type_mismatch() {
    let registry = registry();
    let v1 = flyer(&registry);
    let proposal =
        RevisionProposal::new().with_field("title", FieldValue::list(["Summer", "Party"]));
    let err = v1.apply_proposal(&registry, &proposal, "split it").unwrap_err();
    assert!(matches!(
        err,
        CoreError::FieldTypeMismatch { expected: SlotKind::ShortText, .. }
    ));
}

#[test]
fn over_long_short_text_is_a_type_mismatch() {
    let registry = registry();
    let v1 = flyer(&registry);
    let proposal = RevisionProposal::new().with_field("title", FieldValue::text("x".repeat(201)));
    assert!(v1.apply_proposal(&registry, &proposal, "long").is_err());
}

#[test]
fn css_breaking_style_value_is_rejected() {
    let registry = registry();
    let v1 = flyer(&registry);
    let proposal = RevisionProposal::new().with_style("titleColor", "red;} body { display:none");
    let err = v1.apply_proposal(&registry, &proposal, "inject").unwrap_err();
    assert!(matches!(err, CoreError::InvalidStyleValue { .. }));
}

#[test]
fn empty_value_clears_field() {
    let registry = registry();
    let v1 = flyer(&registry);
    let proposal = RevisionProposal::new().with_field("date", FieldValue::text(""));
    let v2 = v1.apply_proposal(&registry, &proposal, "drop the date").unwrap();
    assert!(v2.field("date").is_none());
}

#[test]
fn template_change_keeps_shared_fields_and_drops_the_rest() {
    let registry = registry();
    let v1 = flyer(&registry)
        .apply_proposal(
            &registry,
            &RevisionProposal::new().with_style("titleFontSize", "48px"),
            "bigger title",
        )
        .unwrap();

    let proposal = RevisionProposal::new().with_template_change(TemplateId::new("letter"));
    let v3 = v1
        .apply_proposal(&registry, &proposal, "make it a formal letter instead")
        .unwrap();

    assert_eq!(v3.template_id().as_str(), "letter");
    assert_eq!(v3.version(), 3);
    assert_eq!(v3.field("date"), Some(&FieldValue::text("July 12")));
    assert!(v3.field("title").is_none());
    assert!(v3.field("description").is_none());
    assert_eq!(v3.style_overrides().get("titleFontSize").unwrap(), "48px");

    let letter = registry.lookup(&TemplateId::new("letter")).unwrap();
    let mut missing = v3.missing_required(&letter);
    missing.sort();
    assert_eq!(missing, vec!["body", "recipient", "sender", "signature"]);
    assert!(!v3.is_complete(&letter));
}

#[test]
fn template_change_to_unknown_template_fails() {
    let registry = registry();
    let v1 = flyer(&registry);
    let proposal = RevisionProposal::new().with_template_change(TemplateId::new("brochure"));
    let err = v1.apply_proposal(&registry, &proposal, "brochure").unwrap_err();
    assert!(matches!(err, CoreError::TemplateNotFound(_)));
}

#[test]
fn values_are_trimmed_and_blank_list_items_dropped() {
    let registry = registry();
    let v1 = flyer(&registry);
    let proposal = RevisionProposal::new()
        .with_field("title", FieldValue::text("  Beach Party  "))
        .with_field("highlights", FieldValue::list(["Food", "  ", " Music "]));
    let v2 = v1.apply_proposal(&registry, &proposal, "beach").unwrap();
    assert_eq!(v2.field("title"), Some(&FieldValue::text("Beach Party")));
    assert_eq!(v2.field("highlights"), Some(&FieldValue::list(["Food", "Music"])));
}

#[test]
fn fork_starts_a_fresh_version_one() {
    let registry = registry();
    let v2 = flyer(&registry)
        .apply_proposal(
            &registry,
            &RevisionProposal::new().with_style("titleColor", "#ff0000"),
            "red title",
        )
        .unwrap();

    let forked = v2.fork();
    assert_ne!(forked.id(), v2.id());
    assert_eq!(forked.version(), 1);
    assert!(forked.history().is_empty());
    assert_eq!(forked.fields(), v2.fields());
    let origin = forked.forked_from().unwrap();
    assert_eq!(origin.document_id, v2.id());
    assert_eq!(origin.version, 2);
}

#[test]
fn title_falls_back_to_type_label() {
    let registry = registry();
    let letter = registry.lookup(&TemplateId::new("letter")).unwrap();
    let doc = Document::create(
        &registry,
        &letter.id,
        BTreeMap::from([("sender".to_string(), FieldValue::text("Acme"))]),
        BTreeMap::new(),
        "write a letter",
    )
    .unwrap();
    assert_eq!(doc.title(&letter), "Letter");

    let flyer_doc = flyer(&registry);
    let flyer_template = registry.lookup(flyer_doc.template_id()).unwrap();
    assert_eq!(flyer_doc.title(&flyer_template), "Summer Party");
}

#[test]
fn document_round_trips_through_json() {
    let registry = registry();
    let doc = flyer(&registry);
    let json = serde_json::to_string(&doc).unwrap();
    let back: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc);
}
