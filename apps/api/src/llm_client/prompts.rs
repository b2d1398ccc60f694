// Shared prompt fragments.
// Each feature module that calls the LLM defines its own prompts.rs alongside it;
// this file only holds fragments used by more than one of them.

/// Appended to every prompt whose reply is parsed as a comma-separated list.
pub const COMMA_LIST_INSTRUCTION: &str =
    "Return ONLY a comma-separated list with no additional text, headings or explanation.";

/// Persona for the supplementary scenario, coding and behavioral prompts.
pub const INTERVIEWER_SYSTEM: &str = "You are an expert technical interviewer.";

/// Joins skills the way every prompt embeds them.
pub fn skill_list(skills: &[String]) -> String {
    skills.join(", ")
}

/// Substitutes every `{name}` in `template` in a single pass. Substituted
/// values are never rescanned, so braces inside resume or answer text stay
/// literal. Unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => {
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
