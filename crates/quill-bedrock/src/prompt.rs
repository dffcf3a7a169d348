//! System prompts and user messages for proposal generation.

use std::fmt::Write;

use quill_core::TemplateRegistry;
use quill_core::models::document_type::DocumentType;
use quill_core::models::template::Template;

const ROLE: &str = "\
You turn short spoken or typed instructions into the content of a printable \
document. You never write HTML or CSS; you fill named slots and adjust named \
style properties.";

const RESPONSE_FORMAT: &str = r##"Respond with exactly one JSON object and no other text:
{
  "template_change": string or null,
  "field_updates": { "<slot>": string or [string, ...] },
  "style_updates": { "<style property>": "<css value>" },
  "rationale": "<one sentence>",
  "rejected": null or "<reason>"
}
Use a JSON array for list slots and a string for every other slot.
Style values are single CSS values such as "32px", "#1d4ed8" or "center".
If the instruction is empty, unintelligible or not something a document can \
express, set "rejected" to a short reason and leave everything else empty."##;

/// Prompt for the first call, which must also pick a template.
pub fn initial_system_prompt(registry: &TemplateRegistry) -> String {
    let mut prompt =
        format!("{ROLE}\n\nChoose the template that best fits the instruction:\n<templates>\n");
    for template in registry.iter() {
        describe_template(&mut prompt, template);
    }
    prompt.push_str("</templates>\n\n");
    prompt.push_str(
        "Set \"template_change\" to the id of the chosen template. Fill every \
         required slot you can infer from the instruction, using concise, \
         natural wording in the language of the instruction. Do not invent \
         dates, places or contact details that were not mentioned.\n\n",
    );
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

/// Prompt for a revision of an existing document.
pub fn revision_system_prompt(registry: &TemplateRegistry, current: &Template) -> String {
    let mut prompt = format!("{ROLE}\n\nThe document currently uses this template:\n");
    describe_template(&mut prompt, current);

    prompt.push_str(
        "\nApply only the change the instruction asks for. Return only the \
         slots and style properties that change; everything you omit stays \
         as it is. To clear a slot, set it to an empty string.\n\n",
    );

    prompt.push_str(
        "Leave \"template_change\" null unless the instruction explicitly asks \
         for a different kind of document. Kinds: ",
    );
    let kinds: Vec<&str> = DocumentType::ALL.iter().map(DocumentType::as_str).collect();
    prompt.push_str(&kinds.join(", "));
    prompt.push_str(". Available templates:\n");
    for template in registry.iter() {
        let _ = writeln!(
            prompt,
            "- {} ({}, {}): {}",
            template.id, template.document_type, template.style, template.description
        );
    }
    prompt.push_str(
        "When you change the template, also fill the new template's slots \
         from the current content.\n\n",
    );
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

/// The user turn: optional context block, then the instruction.
pub fn user_message(instruction: &str, context_block: Option<&str>) -> String {
    match context_block {
        Some(block) if !block.is_empty() => {
            format!("{block}\n\n<instruction>\n{instruction}\n</instruction>")
        }
        _ => format!("<instruction>\n{instruction}\n</instruction>"),
    }
}

fn describe_template(prompt: &mut String, template: &Template) {
    let _ = writeln!(
        prompt,
        "<template id=\"{}\" type=\"{}\" style=\"{}\" name=\"{}\">",
        template.id, template.document_type, template.style, template.name
    );
    if !template.description.is_empty() {
        let _ = writeln!(prompt, "{}", template.description);
    }
    prompt.push_str("slots:\n");
    for slot in &template.slots {
        let _ = write!(
            prompt,
            "- {} ({}, {})",
            slot.name,
            slot.kind,
            if slot.required { "required" } else { "optional" }
        );
        if !slot.description.is_empty() {
            let _ = write!(prompt, ": {}", slot.description);
        }
        prompt.push('\n');
    }
    let styles: Vec<&str> = template
        .style_rules
        .iter()
        .map(|r| r.property.as_str())
        .collect();
    let _ = writeln!(prompt, "style properties: {}", styles.join(", "));
    prompt.push_str("</template>\n");
}
