// Shared prompt constants and prompt-building utilities.
// Each composer defines its own templates alongside it (proposals/prompts.rs).

/// System prompt sent with every document-drafting call.
pub const DOCUMENT_WRITER_SYSTEM: &str = "You are a senior freelance business writer. \
    You draft client-facing documents in plain text. \
    Do NOT wrap the document in markdown code fences. \
    Do NOT add commentary before or after the document.";

/// Fills `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so user text containing `{price}`
/// stays literal. Unknown placeholders are left as-is.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
