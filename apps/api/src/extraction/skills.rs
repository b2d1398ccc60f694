//! Skill/Experience Extractor.
//!
//! Flow: entity candidates (first 100k chars) + LLM skill list (first 4k chars)
//! → regex "Skills:" fallback when the LLM list is empty → Python bias →
//! case-sensitive union → experience sections.
//!
//! LLM and entity-recognition failures are fatal here; there is no partial result.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::entities::{skill_candidates, EntityRecognizer};
use crate::extraction::prompts::{SKILLS_PROMPT_TEMPLATE, SKILLS_SYSTEM};
use crate::extraction::sections::{extract_experience, skills_section};
use crate::extraction::{dedup_preserving_order, truncate_chars};
use crate::llm_client::prompts::{fill_template, COMMA_LIST_INSTRUCTION};
use crate::llm_client::{ChatCompletion, LlmError};

const MAX_ENTITY_CHARS: usize = 100_000;
const MAX_SKILL_PROMPT_CHARS: usize = 4_000;
const SKILLS_TEMPERATURE: f32 = 0.1;
const SKILLS_MAX_TOKENS: u32 = 200;

static SKILL_LABELS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Technical Skills:|Soft Skills:|Skills:").expect("skill label regex"));

/// Skills and experience pulled from one resume or transcription.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedProfile {
    /// Deduplicated case-sensitively; order carries no meaning.
    pub skills: Vec<String>,
    pub experience_text: String,
    pub raw_text: String,
}

/// Builds the full profile for `text`.
///
/// Blank text yields an empty profile without calling any service.
pub async fn extract_info(
    llm: &dyn ChatCompletion,
    recognizer: &dyn EntityRecognizer,
    text: &str,
) -> Result<ExtractedProfile, AppError> {
    if text.trim().is_empty() {
        info!("No text to extract from; returning an empty profile");
        return Ok(ExtractedProfile::default());
    }

    let entities = recognizer
        .entities(truncate_chars(text, MAX_ENTITY_CHARS))
        .await?;
    let entity_skills = skill_candidates(&entities);

    let llm_skills = extract_skills(llm, text).await?;

    let skills = dedup_preserving_order(llm_skills.into_iter().chain(entity_skills));
    let experience_text = extract_experience(text);

    info!(
        "Extracted {} skills and {} chars of experience",
        skills.len(),
        experience_text.len()
    );

    Ok(ExtractedProfile {
        skills,
        experience_text,
        raw_text: text.to_string(),
    })
}

/// The LLM skill path on its own: prompt, parse, regex fallback, Python bias.
pub async fn extract_skills(llm: &dyn ChatCompletion, text: &str) -> Result<Vec<String>, AppError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let prompt = fill_template(
        SKILLS_PROMPT_TEMPLATE,
        &[
            ("list_instruction", COMMA_LIST_INSTRUCTION),
            ("resume_text", truncate_chars(text, MAX_SKILL_PROMPT_CHARS)),
        ],
    );

    // An empty reply still gets the regex fallback.
    let reply = match llm
        .complete(SKILLS_SYSTEM, &prompt, SKILLS_TEMPERATURE, SKILLS_MAX_TOKENS)
        .await
    {
        Ok(reply) => reply,
        Err(LlmError::EmptyContent) => String::new(),
        Err(e) => return Err(AppError::llm("Skill extraction failed", e)),
    };

    let mut skills = parse_skill_list(&reply);
    if skills.is_empty() {
        skills = skills_section(text);
        debug!("LLM returned no skills; regex fallback found {}", skills.len());
    }

    let has_python = skills.iter().any(|s| s.to_lowercase() == "python");
    if !has_python && text.to_lowercase().contains("python") {
        skills.push("Python".to_string());
    }

    Ok(dedup_preserving_order(skills))
}

/// Parses a comma-separated LLM reply, dropping "Skills:"-style labels.
/// Line breaks count as separators.
pub fn parse_skill_list(reply: &str) -> Vec<String> {
    let cleaned = SKILL_LABELS.replace_all(reply, "");
    cleaned
        .replace(|c: char| c == '\n' || c == '\r', ", ")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::extraction::entities::{Entity, EntityError, EntityLabel, NoopEntityRecognizer};
    use crate::llm_client::fake::ScriptedLlm;

    struct FixedEntities(Vec<Entity>);

    #[async_trait]
    impl EntityRecognizer for FixedEntities {
        async fn entities(&self, _text: &str) -> Result<Vec<Entity>, EntityError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenEntities;

    #[async_trait]
    impl EntityRecognizer for BrokenEntities {
        async fn entities(&self, _text: &str) -> Result<Vec<Entity>, EntityError> {
            Err(EntityError::Api {
                status: 500,
                message: "model not loaded".to_string(),
            })
        }
    }

    fn contains_ci(skills: &[String], wanted: &str) -> bool {
        skills.iter().any(|s| s.eq_ignore_ascii_case(wanted))
    }

    #[test]
    fn test_parse_skill_list_strips_labels_and_newlines() {
        let reply = "Technical Skills: Rust, Go\nSoft Skills: Mentoring,\n\n, Docker ";
        assert_eq!(
            parse_skill_list(reply),
            vec!["Rust", "Go", "Mentoring", "Docker"]
        );
    }

    #[test]
    fn test_parse_skill_list_empty_reply() {
        assert!(parse_skill_list("  \n , ").is_empty());
    }

    #[tokio::test]
    async fn test_scenario_skills_line_without_experience() {
        let llm = ScriptedLlm::new().reply("Python, Go, Docker");
        let text = "Skills: Python, Go, Docker";

        let profile = extract_info(&llm, &NoopEntityRecognizer, text).await.unwrap();

        for wanted in ["Python", "Go", "Docker"] {
            assert!(contains_ci(&profile.skills, wanted), "missing {wanted}");
        }
        assert_eq!(profile.experience_text, "");
        assert_eq!(profile.raw_text, text);
    }

    #[tokio::test]
    async fn test_regex_fallback_when_llm_list_is_empty() {
        let llm = ScriptedLlm::new().reply("Skills:");
        let skills = extract_skills(&llm, "Skills: Kotlin | Swift").await.unwrap();
        // A pipe right after a word reads as a header boundary: empty section.
        assert!(skills.is_empty());

        let llm = ScriptedLlm::new().reply("");
        let skills = extract_skills(&llm, "Skills: Kotlin, Swift").await.unwrap();
        assert_eq!(skills, vec!["Kotlin", "Swift"]);
    }

    #[tokio::test]
    async fn test_empty_completion_uses_regex_fallback() {
        let llm = ScriptedLlm::new().empty();
        let skills = extract_skills(&llm, "Skills: Kotlin, Swift").await.unwrap();
        assert_eq!(skills, vec!["Kotlin", "Swift"]);
    }

    #[tokio::test]
    async fn test_python_is_forced_in_when_mentioned() {
        let llm = ScriptedLlm::new().reply("Django, Flask");
        let skills = extract_skills(&llm, "Built services with python and Django")
            .await
            .unwrap();
        assert_eq!(skills, vec!["Django", "Flask", "Python"]);
    }

    #[tokio::test]
    async fn test_python_not_duplicated_case_insensitively() {
        let llm = ScriptedLlm::new().reply("python, SQL");
        let skills = extract_skills(&llm, "python developer").await.unwrap();
        assert_eq!(skills, vec!["python", "SQL"]);
    }

    #[tokio::test]
    async fn test_prompt_is_truncated_to_4000_chars() {
        let llm = ScriptedLlm::new().reply("Rust");
        let text = format!("Skills: Rust {}", "x".repeat(10_000));
        extract_skills(&llm, &text).await.unwrap();

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("Skills: Rust"));
        assert!(!calls[0].prompt.contains(&"x".repeat(4_000)));
        assert!((calls[0].temperature - 0.1).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_entity_candidates_union_is_case_sensitive() {
        let llm = ScriptedLlm::new().reply("Docker, Kubernetes");
        let entities = FixedEntities(vec![
            Entity {
                text: "docker".to_string(),
                label: EntityLabel::Product,
            },
            Entity {
                text: "Docker".to_string(),
                label: EntityLabel::Product,
            },
            Entity {
                text: "London".to_string(),
                label: EntityLabel::Other,
            },
        ]);

        let profile = extract_info(&llm, &entities, "Docker and Kubernetes at scale")
            .await
            .unwrap();
        assert_eq!(profile.skills, vec!["Docker", "Kubernetes", "docker"]);
    }

    #[tokio::test]
    async fn test_llm_failure_is_fatal() {
        let llm = ScriptedLlm::failing();
        let result = extract_info(&llm, &NoopEntityRecognizer, "Skills: Go").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn test_entity_failure_is_fatal() {
        let llm = ScriptedLlm::new().reply("Go");
        let result = extract_info(&llm, &BrokenEntities, "Skills: Go").await;
        assert!(matches!(result, Err(AppError::Entity(_))));
    }

    #[tokio::test]
    async fn test_blank_text_makes_no_calls() {
        let llm = ScriptedLlm::new();
        let profile = extract_info(&llm, &BrokenEntities, "   ").await.unwrap();
        assert!(profile.skills.is_empty());
        assert_eq!(llm.call_count(), 0);
    }
}
