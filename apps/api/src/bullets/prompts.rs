// Prompt template for EPB narrative statement generation.

use crate::bullets::models::{Entry, OrganizedEntries};

/// Narrative generation prompt.
/// Replace: {mission}, {leadership}, {training}, {other}
pub const NARRATIVE_PROMPT_TEMPLATE: &str = r#"You are an expert US Air Force writer specializing in the new EPB (Enlisted Performance Brief) Narrative Statement format.

    TASK: Convert logged accomplishments into strong Narrative Statements.
    
    RULES:
    - Write in full, grammatically correct sentences (Active Voice).
    - Limit: 350 characters per statement.
    - Structure: Action -> Impact -> Result/Leadership.
    - Focus on Executing the Mission, Leading People, Managing Resources.

    INPUT DATA:
    Mission: {mission}
    Leadership: {leadership}
    Training: {training}
    Other: {other}

    OUTPUT JSON:
    {
      "performance": [{"bullet": "Narrative sentence...", "chars": 210}],
      "leadership": [],
      "training": [],
      "other": []
    }"#;

/// Renders one category as `- text (date); - text (date)`, or `None` when empty.
pub fn format_section(entries: &[&Entry]) -> String {
    if entries.is_empty() {
        return "None".to_string();
    }
    entries
        .iter()
        .map(|e| format!("- {} ({})", e.text, e.date))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn build_narrative_prompt(organized: &OrganizedEntries<'_>) -> String {
    fill_template(
        NARRATIVE_PROMPT_TEMPLATE,
        &[
            ("mission", format_section(&organized.performance)),
            ("leadership", format_section(&organized.leadership)),
            ("training", format_section(&organized.training)),
            ("other", format_section(&organized.other)),
        ],
    )
}

/// Substitutes `{key}` placeholders in one pass, so caller text that happens
/// to contain a placeholder is copied verbatim. Other braces are left alone.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        for (key, value) in values {
            if let Some(after) = tail.strip_prefix(*key).and_then(|t| t.strip_prefix('}')) {
                out.push_str(value);
                rest = after;
                continue 'scan;
            }
        }
        out.push('{');
        rest = tail;
    }
    out.push_str(rest);
    out
}
