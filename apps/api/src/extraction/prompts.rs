// Skill extraction prompt templates.

pub const SKILLS_SYSTEM: &str =
    "You are a resume parser that extracts only explicitly mentioned skills.";

/// Replace `{resume_text}` and `{list_instruction}` before sending.
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"The resume below has a "Skills" section.
Extract ONLY the technical skills explicitly listed in the Skills section.
{list_instruction}

Resume:
{resume_text}"#;
