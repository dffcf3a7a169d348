//! Built-in templates, one or more per document type. Variants of a type
//! draw on the same slot vocabulary and differ in [`TemplateStyle`]; the
//! first one listed is the type's default.
//!
//! Every template shares the same class vocabulary (`document`, `doc-title`,
//! `doc-accent`, `doc-section`, `doc-text`) so the standard style rules
//! apply to all of them.

use crate::models::document_type::DocumentType;
use crate::models::template::{Slot, SlotKind, StyleRule, Template, TemplateId, TemplateStyle};

const SANS: &str = r#""Hiragino Sans", "Noto Sans JP", "Helvetica Neue", Arial, sans-serif"#;
const SERIF: &str = r#""Hiragino Mincho ProN", "Noto Serif JP", Georgia, serif"#;

const BASE_CSS: &str = r#".document {
  max-width: 800px;
  margin: 0 auto;
  padding: 40px 32px;
}
.doc-title {
  font-weight: 700;
  margin: 0 0 16px 0;
}
.doc-accent {
  border-bottom: 3px solid;
  padding-bottom: 12px;
}
.doc-text {
  white-space: pre-line;
}
.doc-meta {
  color: #64748b;
  font-size: 0.9em;
}
.doc-footer {
  margin-top: 40px;
  padding-top: 16px;
  border-top: 1px solid #e2e8f0;
  text-align: center;
  font-size: 0.85em;
}
@media print {
  .document { padding: 0; max-width: none; }
}"#;

pub fn builtin_templates() -> Vec<Template> {
    vec![
        flyer(),
        flyer_business(),
        announcement(),
        notice(),
        event(),
        meeting_minutes(),
        meeting_minutes_modern(),
        meeting_minutes_minimal(),
        letter(),
        letter_modern(),
        report(),
        report_creative(),
    ]
}

fn rule(property: &str, selector: &str, css_property: &str, default: &str) -> StyleRule {
    StyleRule {
        property: property.to_string(),
        selector: selector.to_string(),
        css_property: css_property.to_string(),
        default: default.to_string(),
    }
}

fn standard_rules(title_size: &str, accent: &str, font: &str) -> Vec<StyleRule> {
    vec![
        rule("titleFontSize", ".doc-title", "font-size", title_size),
        rule("titleColor", ".doc-title", "color", "#0f172a"),
        rule("titleAlign", ".doc-title", "text-align", "center"),
        rule("fontFamily", ".document", "font-family", font),
        rule("bodyFontSize", ".document", "font-size", "14px"),
        rule("textColor", ".document", "color", "#1e293b"),
        rule("backgroundColor", ".document", "background", "#ffffff"),
        rule("accentColor", ".doc-accent", "border-color", accent),
        rule("lineHeight", ".document", "line-height", "1.7"),
        rule("spacing", ".doc-section", "margin-bottom", "24px"),
    ]
}

fn css(extra: &str) -> String {
    format!("{BASE_CSS}\n{extra}")
}

fn flyer() -> Template {
    Template {
        id: TemplateId::new("flyer"),
        name: "Event Flyer".to_string(),
        description: "Eye-catching flyer with a headline, details and a call to action."
            .to_string(),
        document_type: DocumentType::Flyer,
        style: TemplateStyle::Modern,
        slots: vec![
            Slot::required("title", SlotKind::ShortText).describe("Eye-catching headline"),
            Slot::optional("subtitle", SlotKind::ShortText),
            Slot::optional("date", SlotKind::Date),
            Slot::optional("time", SlotKind::ShortText),
            Slot::optional("location", SlotKind::ShortText),
            Slot::required("description", SlotKind::LongText)
                .describe("Main body: what, who and why"),
            Slot::optional("highlights", SlotKind::TextList).describe("Benefits or highlights"),
            Slot::optional("call_to_action", SlotKind::ShortText),
            Slot::optional("contact", SlotKind::ShortText),
        ],
        style_rules: standard_rules("40px", "#22c55e", SANS),
        css: css(
            ".doc-flyer .doc-subtitle { text-align: center; font-size: 1.3em; }\n\
             .doc-flyer .doc-details { text-align: center; font-size: 1.1em; }\n\
             .doc-flyer .doc-cta { text-align: center; font-weight: 700; font-size: 1.2em; }",
        ),
        skeleton: r#"<article class="document doc-flyer">
  <header class="doc-accent doc-section">
    <h1 class="doc-title">{{ title }}</h1>
    {% if subtitle %}<p class="doc-subtitle">{{ subtitle }}</p>{% endif %}
  </header>
  {% if date or location %}<section class="doc-section doc-details">
    {% if date %}<p><strong>When:</strong> {{ date }}{% if time %} at {{ time }}{% endif %}</p>{% endif %}
    {% if location %}<p><strong>Where:</strong> {{ location }}</p>{% endif %}
  </section>{% endif %}
  <section class="doc-section doc-text">{{ description }}</section>
  {% if highlights %}<section class="doc-section">
    <ul>{% for item in highlights %}<li>{{ item }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if call_to_action %}<p class="doc-section doc-cta">{{ call_to_action }}</p>{% endif %}
  {% if contact %}<footer class="doc-footer">{{ contact }}</footer>{% endif %}
</article>"#
            .to_string(),
    }
}

fn flyer_business() -> Template {
    Template {
        id: TemplateId::new("flyer_business"),
        name: "Business Flyer".to_string(),
        description: "Product or service flyer with a feature list.".to_string(),
        document_type: DocumentType::Flyer,
        style: TemplateStyle::Professional,
        slots: vec![
            Slot::required("title", SlotKind::ShortText),
            Slot::optional("tagline", SlotKind::ShortText),
            Slot::required("description", SlotKind::LongText),
            Slot::optional("features", SlotKind::TextList),
            Slot::optional("offer", SlotKind::ShortText).describe("Price or promotion"),
            Slot::optional("call_to_action", SlotKind::ShortText),
            Slot::optional("contact", SlotKind::ShortText),
        ],
        style_rules: standard_rules("36px", "#0ea5e9", SANS),
        css: css(
            ".doc-business .doc-tagline { font-style: italic; text-align: center; }\n\
             .doc-business .doc-offer { font-size: 1.4em; font-weight: 700; text-align: center; }\n\
             .doc-business ul { columns: 2; }",
        ),
        skeleton: r#"<article class="document doc-business">
  <header class="doc-accent doc-section">
    <h1 class="doc-title">{{ title }}</h1>
    {% if tagline %}<p class="doc-tagline">{{ tagline }}</p>{% endif %}
  </header>
  <section class="doc-section doc-text">{{ description }}</section>
  {% if features %}<section class="doc-section">
    <ul>{% for feature in features %}<li>{{ feature }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if offer %}<p class="doc-section doc-offer">{{ offer }}</p>{% endif %}
  {% if call_to_action %}<p class="doc-section"><strong>{{ call_to_action }}</strong></p>{% endif %}
  {% if contact %}<footer class="doc-footer">{{ contact }}</footer>{% endif %}
</article>"#
            .to_string(),
    }
}

fn announcement() -> Template {
    Template {
        id: TemplateId::new("announcement"),
        name: "Announcement".to_string(),
        description: "Formal announcement with the key facts up front.".to_string(),
        document_type: DocumentType::Announcement,
        style: TemplateStyle::Professional,
        slots: vec![
            Slot::required("title", SlotKind::ShortText),
            Slot::optional("date", SlotKind::Date),
            Slot::required("body", SlotKind::LongText),
            Slot::optional("details", SlotKind::TextList).describe("What, when, where, who"),
            Slot::optional("issuer", SlotKind::ShortText),
            Slot::optional("contact", SlotKind::ShortText),
        ],
        style_rules: standard_rules("30px", "#6366f1", SANS),
        css: css(".doc-announcement .doc-details li { margin-bottom: 6px; }"),
        skeleton: r#"<article class="document doc-announcement">
  <header class="doc-accent doc-section">
    <h1 class="doc-title">{{ title }}</h1>
    {% if date %}<p class="doc-meta">{{ date }}</p>{% endif %}
  </header>
  <section class="doc-section doc-text">{{ body }}</section>
  {% if details %}<section class="doc-section doc-details">
    <ul>{% for detail in details %}<li>{{ detail }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if issuer or contact %}<footer class="doc-footer">
    {% if issuer %}<p>{{ issuer }}</p>{% endif %}
    {% if contact %}<p>{{ contact }}</p>{% endif %}
  </footer>{% endif %}
</article>"#
            .to_string(),
    }
}

fn notice() -> Template {
    Template {
        id: TemplateId::new("notice"),
        name: "Notice".to_string(),
        description: "Short notice that can be read at a glance.".to_string(),
        document_type: DocumentType::Notice,
        style: TemplateStyle::Minimal,
        slots: vec![
            Slot::required("title", SlotKind::ShortText),
            Slot::optional("effective_date", SlotKind::Date),
            Slot::required("body", SlotKind::LongText),
            Slot::optional("points", SlotKind::TextList),
            Slot::optional("issuer", SlotKind::ShortText),
            Slot::optional("contact", SlotKind::ShortText),
        ],
        style_rules: standard_rules("32px", "#ef4444", SANS),
        css: css(
            ".doc-notice .doc-title { text-transform: uppercase; letter-spacing: 0.05em; }\n\
             .doc-notice .doc-points li { font-weight: 600; }",
        ),
        skeleton: r#"<article class="document doc-notice">
  <header class="doc-accent doc-section">
    <h1 class="doc-title">{{ title }}</h1>
    {% if effective_date %}<p class="doc-meta">Effective {{ effective_date }}</p>{% endif %}
  </header>
  <section class="doc-section doc-text">{{ body }}</section>
  {% if points %}<section class="doc-section doc-points">
    <ul>{% for point in points %}<li>{{ point }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if issuer or contact %}<footer class="doc-footer">
    {% if issuer %}<p>{{ issuer }}</p>{% endif %}
    {% if contact %}<p>{{ contact }}</p>{% endif %}
  </footer>{% endif %}
</article>"#
            .to_string(),
    }
}

fn event() -> Template {
    Template {
        id: TemplateId::new("event"),
        name: "Event Invitation".to_string(),
        description: "Invitation with date, time, place and what to expect.".to_string(),
        document_type: DocumentType::Event,
        style: TemplateStyle::Creative,
        slots: vec![
            Slot::required("title", SlotKind::ShortText),
            Slot::required("date", SlotKind::Date),
            Slot::optional("time", SlotKind::ShortText),
            Slot::optional("location", SlotKind::ShortText),
            Slot::optional("description", SlotKind::LongText),
            Slot::optional("highlights", SlotKind::TextList),
            Slot::optional("rsvp", SlotKind::ShortText),
            Slot::optional("contact", SlotKind::ShortText),
        ],
        style_rules: standard_rules("36px", "#ef2b70", SANS),
        css: css(
            ".doc-event .doc-details { text-align: center; font-size: 1.15em; }\n\
             .doc-event .doc-rsvp { text-align: center; font-weight: 700; }",
        ),
        skeleton: r#"<article class="document doc-event">
  <header class="doc-accent doc-section">
    <h1 class="doc-title">{{ title }}</h1>
  </header>
  <section class="doc-section doc-details">
    {% if date %}<p><strong>When:</strong> {{ date }}{% if time %} at {{ time }}{% endif %}</p>{% endif %}
    {% if location %}<p><strong>Where:</strong> {{ location }}</p>{% endif %}
  </section>
  {% if description %}<section class="doc-section doc-text">{{ description }}</section>{% endif %}
  {% if highlights %}<section class="doc-section">
    <ul>{% for item in highlights %}<li>{{ item }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if rsvp %}<p class="doc-section doc-rsvp">{{ rsvp }}</p>{% endif %}
  {% if contact %}<footer class="doc-footer">{{ contact }}</footer>{% endif %}
</article>"#
            .to_string(),
    }
}

fn minutes_slots() -> Vec<Slot> {
    vec![
        Slot::required("title", SlotKind::ShortText),
        Slot::required("date", SlotKind::Date),
        Slot::optional("attendees", SlotKind::TextList),
        Slot::optional("agenda", SlotKind::TextList),
        Slot::optional("discussion", SlotKind::LongText),
        Slot::optional("decisions", SlotKind::TextList),
        Slot::optional("action_items", SlotKind::TextList),
        Slot::optional("next_meeting", SlotKind::Date),
    ]
}

fn meeting_minutes() -> Template {
    Template {
        id: TemplateId::new("meeting_minutes"),
        name: "Meeting Minutes".to_string(),
        description: "Attendees, agenda, decisions and action items.".to_string(),
        document_type: DocumentType::MeetingMinutes,
        style: TemplateStyle::Professional,
        slots: minutes_slots(),
        style_rules: {
            let mut rules = standard_rules("26px", "#22c55e", SANS);
            rules.push(rule("headingColor", ".document h2", "color", "#334155"));
            rules
        },
        css: css(
            ".doc-minutes h2 { font-size: 1.2em; border-left: 4px solid #22c55e; padding-left: 12px; }\n\
             .doc-minutes .doc-title { text-align: left; }",
        ),
        skeleton: r#"<article class="document doc-minutes">
  <header class="doc-accent doc-section">
    <h1 class="doc-title">{{ title }}</h1>
    <p class="doc-meta">{{ date }}</p>
    {% if attendees %}<p class="doc-meta">Attendees: {{ attendees | join(sep=", ") }}</p>{% endif %}
  </header>
  {% if agenda %}<section class="doc-section"><h2>Agenda</h2>
    <ol>{% for item in agenda %}<li>{{ item }}</li>{% endfor %}</ol>
  </section>{% endif %}
  {% if discussion %}<section class="doc-section"><h2>Discussion</h2>
    <div class="doc-text">{{ discussion }}</div>
  </section>{% endif %}
  {% if decisions %}<section class="doc-section"><h2>Decisions</h2>
    <ul>{% for decision in decisions %}<li>{{ decision }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if action_items %}<section class="doc-section"><h2>Action Items</h2>
    <ul>{% for action in action_items %}<li>{{ action }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if next_meeting %}<footer class="doc-footer">Next meeting: {{ next_meeting }}</footer>{% endif %}
</article>"#
            .to_string(),
    }
}

fn meeting_minutes_modern() -> Template {
    Template {
        id: TemplateId::new("meeting_minutes_modern"),
        name: "Meeting Minutes (Modern)".to_string(),
        description: "Colour-coded minutes with agenda and actions as cards.".to_string(),
        document_type: DocumentType::MeetingMinutes,
        style: TemplateStyle::Modern,
        slots: minutes_slots(),
        style_rules: {
            let mut rules = standard_rules("30px", "#8b5cf6", SANS);
            rules.push(rule("headingColor", ".document h2", "color", "#6d28d9"));
            rules
        },
        css: css(
            ".doc-minutes-modern .doc-accent { background: linear-gradient(135deg, #8b5cf6, #ec4899); color: #ffffff; padding: 24px; border-radius: 12px; }\n\
             .doc-minutes-modern .doc-card { background: #f5f3ff; border-radius: 10px; padding: 16px 20px; }\n\
             .doc-minutes-modern .doc-actions li { border-left: 4px solid #ec4899; padding-left: 10px; list-style: none; margin-bottom: 8px; }",
        ),
        skeleton: r#"<article class="document doc-minutes-modern">
  <header class="doc-accent doc-section">
    <h1 class="doc-title">{{ title }}</h1>
    <p>{{ date }}{% if attendees %} · {{ attendees | length }} attending{% endif %}</p>
  </header>
  {% if attendees %}<section class="doc-section doc-card"><h2>Attendees</h2>
    <p>{{ attendees | join(sep=" · ") }}</p>
  </section>{% endif %}
  {% if agenda %}<section class="doc-section doc-card"><h2>Agenda</h2>
    <ol>{% for item in agenda %}<li>{{ item }}</li>{% endfor %}</ol>
  </section>{% endif %}
  {% if discussion %}<section class="doc-section doc-card"><h2>Discussion</h2>
    <div class="doc-text">{{ discussion }}</div>
  </section>{% endif %}
  {% if decisions %}<section class="doc-section doc-card"><h2>Decisions</h2>
    <ul>{% for decision in decisions %}<li>{{ decision }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if action_items %}<section class="doc-section doc-card doc-actions"><h2>Action Items</h2>
    <ul>{% for action in action_items %}<li>{{ action }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if next_meeting %}<footer class="doc-footer">Next meeting: {{ next_meeting }}</footer>{% endif %}
</article>"#
            .to_string(),
    }
}

/// Plain minutes without decisions or a next-meeting line.
fn meeting_minutes_minimal() -> Template {
    let slots = minutes_slots()
        .into_iter()
        .filter(|slot| !matches!(slot.name.as_str(), "decisions" | "next_meeting"))
        .collect();
    Template {
        id: TemplateId::new("meeting_minutes_minimal"),
        name: "Meeting Minutes (Minimal)".to_string(),
        description: "Simple, easy-to-read minutes.".to_string(),
        document_type: DocumentType::MeetingMinutes,
        style: TemplateStyle::Minimal,
        slots,
        style_rules: standard_rules("22px", "#0f172a", SANS),
        css: css(
            ".doc-minutes-minimal .doc-title { text-align: left; font-weight: 400; }\n\
             .doc-minutes-minimal h2 { font-size: 1em; text-transform: uppercase; letter-spacing: 0.08em; color: #64748b; }",
        ),
        skeleton: r#"<article class="document doc-minutes-minimal">
  <header class="doc-accent doc-section">
    <h1 class="doc-title">{{ title }}</h1>
    <p class="doc-meta">{{ date }}</p>
  </header>
  {% if attendees %}<section class="doc-section"><h2>Attendees</h2>
    <p>{{ attendees | join(sep=", ") }}</p>
  </section>{% endif %}
  {% if agenda %}<section class="doc-section"><h2>Agenda</h2>
    <ol>{% for item in agenda %}<li>{{ item }}</li>{% endfor %}</ol>
  </section>{% endif %}
  {% if discussion %}<section class="doc-section"><h2>Notes</h2>
    <div class="doc-text">{{ discussion }}</div>
  </section>{% endif %}
  {% if action_items %}<section class="doc-section"><h2>Next Steps</h2>
    <ul>{% for action in action_items %}<li>{{ action }}</li>{% endfor %}</ul>
  </section>{% endif %}
</article>"#
            .to_string(),
    }
}

fn letter_slots() -> Vec<Slot> {
    vec![
        Slot::required("sender", SlotKind::ShortText),
        Slot::optional("sender_address", SlotKind::LongText),
        Slot::required("date", SlotKind::Date),
        Slot::required("recipient", SlotKind::ShortText),
        Slot::optional("recipient_address", SlotKind::LongText),
        Slot::optional("subject", SlotKind::ShortText),
        Slot::optional("salutation", SlotKind::ShortText),
        Slot::required("body", SlotKind::LongText),
        Slot::optional("closing", SlotKind::ShortText),
        Slot::required("signature", SlotKind::ShortText),
    ]
}

fn letter() -> Template {
    Template {
        id: TemplateId::new("letter"),
        name: "Formal Letter".to_string(),
        description: "Business letter with salutation, body and signature.".to_string(),
        document_type: DocumentType::Letter,
        style: TemplateStyle::Formal,
        slots: letter_slots(),
        style_rules: {
            let mut rules = standard_rules("18px", "#1e293b", SERIF);
            for r in &mut rules {
                if r.property == "titleAlign" {
                    r.default = "left".to_string();
                }
            }
            rules
        },
        css: css(
            ".doc-letter .doc-sender { text-align: right; }\n\
             .doc-letter .doc-closing { margin-top: 32px; }",
        ),
        skeleton: r#"<article class="document doc-letter">
  <section class="doc-section doc-sender">
    <p>{{ sender }}</p>
    {% if sender_address %}<p class="doc-text">{{ sender_address }}</p>{% endif %}
    <p>{{ date }}</p>
  </section>
  <section class="doc-section">
    <p>{{ recipient }}</p>
    {% if recipient_address %}<p class="doc-text">{{ recipient_address }}</p>{% endif %}
  </section>
  {% if subject %}<h1 class="doc-title doc-accent">{{ subject }}</h1>{% endif %}
  <p>{% if salutation %}{{ salutation }}{% else %}Dear {{ recipient }},{% endif %}</p>
  <section class="doc-section doc-text">{{ body }}</section>
  <section class="doc-closing">
    <p>{% if closing %}{{ closing }}{% else %}Sincerely,{% endif %}</p>
    <p>{{ signature }}</p>
  </section>
</article>"#
            .to_string(),
    }
}

fn letter_modern() -> Template {
    Template {
        id: TemplateId::new("letter_modern"),
        name: "Business Letter (Modern)".to_string(),
        description: "Contemporary business letter with a letterhead band.".to_string(),
        document_type: DocumentType::Letter,
        style: TemplateStyle::Modern,
        slots: letter_slots(),
        style_rules: {
            let mut rules = standard_rules("20px", "#0ea5e9", SANS);
            for r in &mut rules {
                if r.property == "titleAlign" {
                    r.default = "left".to_string();
                }
            }
            rules
        },
        css: css(
            ".doc-letter-modern .doc-letterhead { border-left: 6px solid #0ea5e9; padding-left: 16px; }\n\
             .doc-letter-modern .doc-closing { margin-top: 32px; }",
        ),
        skeleton: r#"<article class="document doc-letter-modern">
  <header class="doc-section doc-letterhead">
    <p><strong>{{ sender }}</strong></p>
    {% if sender_address %}<p class="doc-meta doc-text">{{ sender_address }}</p>{% endif %}
  </header>
  <section class="doc-section">
    <p class="doc-meta">{{ date }}</p>
    <p>{{ recipient }}</p>
    {% if recipient_address %}<p class="doc-text">{{ recipient_address }}</p>{% endif %}
  </section>
  {% if subject %}<h1 class="doc-title doc-accent">{{ subject }}</h1>{% endif %}
  <p>{% if salutation %}{{ salutation }}{% else %}Dear {{ recipient }},{% endif %}</p>
  <section class="doc-section doc-text">{{ body }}</section>
  <section class="doc-closing">
    <p>{% if closing %}{{ closing }}{% else %}Best regards,{% endif %}</p>
    <p>{{ signature }}</p>
  </section>
</article>"#
            .to_string(),
    }
}

fn report_slots() -> Vec<Slot> {
    vec![
        Slot::required("title", SlotKind::ShortText),
        Slot::optional("author", SlotKind::ShortText),
        Slot::optional("date", SlotKind::Date),
        Slot::required("summary", SlotKind::LongText).describe("Executive summary"),
        Slot::optional("findings", SlotKind::TextList),
        Slot::optional("analysis", SlotKind::LongText),
        Slot::optional("recommendations", SlotKind::TextList),
        Slot::optional("conclusion", SlotKind::LongText),
    ]
}

fn report() -> Template {
    Template {
        id: TemplateId::new("report"),
        name: "Report".to_string(),
        description: "Summary, findings, analysis and recommendations.".to_string(),
        document_type: DocumentType::Report,
        style: TemplateStyle::Professional,
        slots: report_slots(),
        style_rules: {
            let mut rules = standard_rules("28px", "#334155", SERIF);
            rules.push(rule("headingColor", ".document h2", "color", "#334155"));
            rules
        },
        css: css(
            ".doc-report h2 { font-size: 1.25em; margin-top: 32px; }\n\
             .doc-report .doc-summary { background: #f8f9fa; padding: 16px; border-radius: 8px; }",
        ),
        skeleton: r#"<article class="document doc-report">
  <header class="doc-accent doc-section">
    <h1 class="doc-title">{{ title }}</h1>
    {% if author or date %}<p class="doc-meta">{{ author }}{% if author and date %} · {% endif %}{{ date }}</p>{% endif %}
  </header>
  <section class="doc-section doc-summary"><h2>Summary</h2>
    <div class="doc-text">{{ summary }}</div>
  </section>
  {% if findings %}<section class="doc-section"><h2>Findings</h2>
    <ul>{% for finding in findings %}<li>{{ finding }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if analysis %}<section class="doc-section"><h2>Analysis</h2>
    <div class="doc-text">{{ analysis }}</div>
  </section>{% endif %}
  {% if recommendations %}<section class="doc-section"><h2>Recommendations</h2>
    <ol>{% for recommendation in recommendations %}<li>{{ recommendation }}</li>{% endfor %}</ol>
  </section>{% endif %}
  {% if conclusion %}<section class="doc-section"><h2>Conclusion</h2>
    <div class="doc-text">{{ conclusion }}</div>
  </section>{% endif %}
</article>"#
            .to_string(),
    }
}

fn report_creative() -> Template {
    Template {
        id: TemplateId::new("report_creative"),
        name: "Creative Report".to_string(),
        description: "Bold report with a highlighted summary and findings as tiles.".to_string(),
        document_type: DocumentType::Report,
        style: TemplateStyle::Creative,
        slots: report_slots(),
        style_rules: {
            let mut rules = standard_rules("34px", "#f97316", SANS);
            rules.push(rule("headingColor", ".document h2", "color", "#c2410c"));
            rules
        },
        css: css(
            ".doc-report-creative .doc-accent { border-bottom-width: 6px; }\n\
             .doc-report-creative .doc-summary { background: #fff7ed; border-left: 6px solid #f97316; padding: 16px 20px; }\n\
             .doc-report-creative .doc-tiles { display: flex; flex-wrap: wrap; gap: 12px; padding: 0; }\n\
             .doc-report-creative .doc-tiles li { list-style: none; flex: 1 1 40%; background: #fef3c7; border-radius: 10px; padding: 12px; }",
        ),
        skeleton: r#"<article class="document doc-report-creative">
  <header class="doc-accent doc-section">
    <h1 class="doc-title">{{ title }}</h1>
    {% if author or date %}<p class="doc-meta">{{ author }}{% if author and date %} · {% endif %}{{ date }}</p>{% endif %}
  </header>
  <section class="doc-section doc-summary">
    <div class="doc-text">{{ summary }}</div>
  </section>
  {% if findings %}<section class="doc-section"><h2>Key Insights</h2>
    <ul class="doc-tiles">{% for finding in findings %}<li>{{ finding }}</li>{% endfor %}</ul>
  </section>{% endif %}
  {% if analysis %}<section class="doc-section"><h2>Analysis</h2>
    <div class="doc-text">{{ analysis }}</div>
  </section>{% endif %}
  {% if recommendations %}<section class="doc-section"><h2>What's Next</h2>
    <ol>{% for recommendation in recommendations %}<li>{{ recommendation }}</li>{% endfor %}</ol>
  </section>{% endif %}
  {% if conclusion %}<section class="doc-section"><h2>Conclusion</h2>
    <div class="doc-text">{{ conclusion }}</div>
  </section>{% endif %}
</article>"#
            .to_string(),
    }
}
