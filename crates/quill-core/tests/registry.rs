use quill_core::CoreError;
use quill_core::TemplateRegistry;
use quill_core::models::document_type::DocumentType;
use quill_core::models::template::{
    Slot, SlotKind, StyleRule, Template, TemplateId, TemplateStyle,
};

fn minimal(id: &str, document_type: DocumentType, skeleton: &str) -> Template {
    Template {
        id: TemplateId::new(id),
        name: id.to_string(),
        description: String::new(),
        document_type,
        style: TemplateStyle::Minimal,
        slots: vec![
            Slot::required("title", SlotKind::ShortText),
            Slot::optional("items", SlotKind::TextList),
        ],
        style_rules: vec![StyleRule {
            property: "titleColor".to_string(),
            selector: ".doc-title".to_string(),
            css_property: "color".to_string(),
            default: "#000000".to_string(),
        }],
        css: String::new(),
        skeleton: skeleton.to_string(),
    }
}

#[test]
fn builtin_library_registers_every_document_type() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    for document_type in DocumentType::ALL {
        let template = registry.default_for(document_type).unwrap();
        assert_eq!(template.document_type, document_type);
    }
}

#[test]
fn builtin_templates_carry_print_css() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    for template in registry.iter() {
        assert!(template.css.contains("@media print"), "{}", template.id);
        assert!(template.style_rule("titleFontSize").is_some());
    }
}

#[test]
fn lookup_unknown_template_fails() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    let err = registry.lookup(&TemplateId::new("brochure")).unwrap_err();
    assert!(matches!(err, CoreError::TemplateNotFound(id) if id.as_str() == "brochure"));
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = TemplateRegistry::new();
    registry
        .register(minimal("plain", DocumentType::Notice, "<h1>{{ title }}</h1>"))
        .unwrap();
    let err = registry
        .register(minimal("plain", DocumentType::Notice, "<h1>{{ title }}</h1>"))
        .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateTemplate(_)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn skeleton_referencing_undeclared_slot_is_rejected() {
    let mut registry = TemplateRegistry::new();
    let err = registry
        .register(minimal(
            "broken",
            DocumentType::Notice,
            "<h1>{{ title }}</h1><p>{{ footer }}</p>",
        ))
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTemplate { reason, .. } if reason.contains("footer")));
    assert!(registry.is_empty());
}

#[test]
fn loop_variables_are_not_treated_as_slots() {
    let mut registry = TemplateRegistry::new();
    registry
        .register(minimal(
            "looped",
            DocumentType::Report,
            "{% for item in items %}<li>{{ item }}</li>{% endfor %}{{ title }}",
        ))
        .unwrap();
}

fn rejection(skeleton: &str) -> String {
    match TemplateRegistry::new().register(minimal("checked", DocumentType::Notice, skeleton)) {
        Err(CoreError::InvalidTemplate { reason, .. }) => reason,
        other => panic!("expected InvalidTemplate for {skeleton:?}, got {other:?}"),
    }
}

#[test]
fn undeclared_names_inside_expressions_are_rejected() {
    assert!(rejection("<h1>{{ title ~ ghost }}</h1>").contains("ghost"));
    assert!(rejection("{% if title and ghost %}<h1>{{ title }}</h1>{% endif %}").contains("ghost"));
    assert!(rejection("{{ title | default(value=ghost) }}").contains("ghost"));
    assert!(rejection("{% if ghost is defined %}{{ title }}{% endif %}").contains("ghost"));
    let reason = rejection("{% for item in ghosts %}{{ item }}{% endfor %}{{ title }}");
    assert!(reason.contains("ghosts"));
}

#[test]
fn loop_variables_are_scoped_to_their_loop() {
    let reason =
        rejection("{% for item in items %}<li>{{ item }}</li>{% endfor %}{{ item }}{{ title }}");
    assert!(reason.contains("'item'"));

    let reason = rejection("{% for item in items %}{% endfor %}{{ loop.index }}{{ title }}");
    assert!(reason.contains("'loop'"));
}

#[test]
fn raw_blocks_and_set_bindings_are_accepted() {
    let mut registry = TemplateRegistry::new();
    registry
        .register(minimal(
            "raw",
            DocumentType::Notice,
            "{% raw %}{{ literal }}{% endraw %}<h1>{{ title }}</h1>",
        ))
        .unwrap();
    registry
        .register(minimal(
            "set",
            DocumentType::Notice,
            "{% set heading = title | upper %}<h1>{{ heading }}</h1>",
        ))
        .unwrap();
    registry
        .register(minimal(
            "indexed",
            DocumentType::Notice,
            "{% for item in items %}{{ loop.index }}. {{ item }}{% endfor %}{{ items[0] }}{{ title }}",
        ))
        .unwrap();
    assert_eq!(registry.len(), 3);
}

#[test]
fn referenced_names_are_the_free_names_of_the_skeleton() {
    let template = minimal(
        "names",
        DocumentType::Report,
        "{% set shown = title %}{% for item in items %}{{ item }}{% endfor %}{{ shown }}",
    );
    let names: Vec<String> = template.referenced_names().unwrap().into_iter().collect();
    assert_eq!(names, vec!["items".to_string(), "title".to_string()]);
}

#[test]
fn unparseable_skeleton_is_rejected() {
    let mut registry = TemplateRegistry::new();
    let err = registry
        .register(minimal("bad", DocumentType::Report, "{% if title %}<h1>"))
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTemplate { .. }));
}

#[test]
fn invalid_style_default_is_rejected() {
    let mut template = minimal("styled", DocumentType::Letter, "{{ title }}");
    template.style_rules[0].default = "red; display: none".to_string();
    let err = TemplateRegistry::new().register(template).unwrap_err();
    assert!(matches!(err, CoreError::InvalidTemplate { .. }));
}

#[test]
fn list_by_type_preserves_registration_order() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    let flyers: Vec<&str> = registry
        .list_by_type(DocumentType::Flyer)
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(flyers, vec!["flyer", "flyer_business"]);
}

#[test]
fn style_variants_list_in_registration_order() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    let minutes: Vec<(&str, TemplateStyle)> = registry
        .list_by_type(DocumentType::MeetingMinutes)
        .map(|t| (t.id.as_str(), t.style))
        .collect();
    assert_eq!(
        minutes,
        vec![
            ("meeting_minutes", TemplateStyle::Professional),
            ("meeting_minutes_modern", TemplateStyle::Modern),
            ("meeting_minutes_minimal", TemplateStyle::Minimal),
        ]
    );
    assert_eq!(
        registry.default_for(DocumentType::MeetingMinutes).unwrap().id.as_str(),
        "meeting_minutes"
    );

    let letters: Vec<&str> = registry
        .list_by_type(DocumentType::Letter)
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(letters, vec!["letter", "letter_modern"]);

    let reports: Vec<&str> = registry
        .list_by_type(DocumentType::Report)
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(reports, vec!["report", "report_creative"]);
}

#[test]
fn list_by_style_spans_document_types() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    let modern: Vec<&str> = registry
        .list_by_style(TemplateStyle::Modern)
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(modern, vec!["flyer", "meeting_minutes_modern", "letter_modern"]);

    let formal: Vec<&str> = registry
        .list_by_style(TemplateStyle::Formal)
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(formal, vec!["letter"]);

    assert_eq!(TemplateRegistry::new().list_by_style(TemplateStyle::Modern).count(), 0);
}

#[test]
fn template_style_parses_and_defaults() {
    assert_eq!(" Creative ".parse::<TemplateStyle>().unwrap(), TemplateStyle::Creative);
    assert!(matches!(
        "baroque".parse::<TemplateStyle>(),
        Err(CoreError::UnknownTemplateStyle(name)) if name == "baroque"
    ));

    let template: Template = serde_json::from_value(serde_json::json!({
        "id": "plain",
        "name": "Plain",
        "document_type": "notice",
        "slots": [],
        "skeleton": "<p>plain</p>"
    }))
    .unwrap();
    assert_eq!(template.style, TemplateStyle::Professional);
}

#[test]
fn list_by_type_is_restartable() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    let listing = registry.list_by_type(DocumentType::Flyer);
    let first: Vec<_> = listing.clone().map(|t| t.id.clone()).collect();
    let second: Vec<_> = listing.map(|t| t.id.clone()).collect();
    assert_eq!(first, second);
}

#[test]
fn list_by_type_without_templates_is_empty() {
    let registry = TemplateRegistry::new();
    assert_eq!(registry.list_by_type(DocumentType::Letter).count(), 0);
    assert!(matches!(
        registry.default_for(DocumentType::Letter),
        Err(CoreError::NoTemplateForType(DocumentType::Letter))
    ));
}

#[test]
fn resolve_accepts_ids_and_type_names() {
    let registry = TemplateRegistry::with_builtin().unwrap();
    assert_eq!(registry.resolve("flyer_business").unwrap().id.as_str(), "flyer_business");
    assert_eq!(registry.resolve("Meeting Minutes").unwrap().id.as_str(), "meeting_minutes");
    assert!(matches!(
        registry.resolve("spreadsheet"),
        Err(CoreError::UnsupportedDocumentType(_))
    ));
}

#[test]
fn document_type_requests_need_change_phrasing() {
    assert!(DocumentType::requested_by("make the event title bigger").is_empty());
    assert!(DocumentType::requested_by("add the report date to the footer").is_empty());
    assert!(DocumentType::requested_by("send the invite on friday").is_empty());
    assert!(DocumentType::requested_by("change the title to Event Night").is_empty());
    assert!(DocumentType::requested_by("make it pop for the event").is_empty());

    assert_eq!(
        DocumentType::requested_by("Make this a formal letter instead"),
        vec![DocumentType::Letter]
    );
    assert_eq!(
        DocumentType::requested_by("turn the meeting notes into a report"),
        vec![DocumentType::Report]
    );
    assert_eq!(
        DocumentType::requested_by("convert it to an invitation"),
        vec![DocumentType::Event]
    );
    assert_eq!(
        DocumentType::requested_by("redo this as a notice"),
        vec![DocumentType::Notice]
    );
    assert_eq!(
        DocumentType::requested_by("make it a noticeable poster"),
        vec![DocumentType::Flyer]
    );
    assert_eq!(
        DocumentType::requested_by("turn it into meeting notes"),
        vec![DocumentType::MeetingMinutes]
    );
}
