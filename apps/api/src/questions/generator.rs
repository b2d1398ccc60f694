//! Question Generator and Expected-Answer Generator.
//!
//! Flow: skills (derived from the resume if none were given) → one batch prompt
//! → line split → relevance filter → up to three supplementary prompts when
//! fewer than 5 questions survive → dedup → cap at 15.
//!
//! Expected answers are one sequential LLM call per question. Every LLM failure
//! here aborts the whole operation.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::dedup_preserving_order;
use crate::extraction::sections::extract_experience;
use crate::extraction::skills::extract_skills;
use crate::llm_client::prompts::{fill_template, skill_list, INTERVIEWER_SYSTEM};
use crate::llm_client::ChatCompletion;
use crate::questions::prompts::{
    BEHAVIORAL_PROMPT, CODING_PROMPT_TEMPLATE, EXPECTED_ANSWER_PROMPT_TEMPLATE,
    EXPECTED_ANSWER_SYSTEM, QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM,
    SCENARIO_PROMPT_TEMPLATE,
};

/// Returned as the only "question" when no skills could be identified.
pub const NO_SKILLS_MESSAGE: &str =
    "No specific skills were identified. Please check the resume format.";

pub const MAX_QUESTIONS: usize = 15;
/// Below this many relevant questions the supplementary prompts run.
const MIN_RELEVANT_QUESTIONS: usize = 5;
/// Supplementary prompts stop once this many questions have accumulated.
const SUPPLEMENT_TARGET: usize = 10;

const QUESTIONS_TEMPERATURE: f32 = 0.7;
const QUESTIONS_MAX_TOKENS: u32 = 500;
const SUPPLEMENT_MAX_TOKENS: u32 = 300;
const ANSWER_TEMPERATURE: f32 = 0.3;
const ANSWER_MAX_TOKENS: u32 = 300;

/// Generates up to 15 distinct interview questions, in LLM emission order.
pub async fn generate_questions(
    llm: &dyn ChatCompletion,
    skills: &[String],
    resume_text: &str,
) -> Result<Vec<String>, AppError> {
    let derived: Vec<String>;
    let skills = if skills.is_empty() && !resume_text.trim().is_empty() {
        derived = extract_skills(llm, resume_text).await?;
        derived.as_slice()
    } else {
        skills
    };

    if skills.is_empty() {
        info!("No skills identified; returning the informational message");
        return Ok(vec![NO_SKILLS_MESSAGE.to_string()]);
    }

    let experience = extract_experience(resume_text);
    let prompt = fill_template(
        QUESTIONS_PROMPT_TEMPLATE,
        &[
            ("skills", skill_list(skills).as_str()),
            ("experience", experience.as_str()),
        ],
    );

    let reply = llm
        .complete(
            QUESTIONS_SYSTEM,
            &prompt,
            QUESTIONS_TEMPERATURE,
            QUESTIONS_MAX_TOKENS,
        )
        .await
        .map_err(|e| AppError::llm("Question generation failed", e))?;

    let generated = non_empty_lines(&reply);
    let generated_count = generated.len();
    let mut questions: Vec<String> = generated
        .into_iter()
        .filter(|q| is_relevant(q, skills, &experience))
        .collect();

    info!(
        "{}/{} generated questions passed the relevance filter",
        questions.len(),
        generated_count
    );

    if questions.len() < MIN_RELEVANT_QUESTIONS {
        warn!(
            "Only {} relevant questions; running supplementary prompts",
            questions.len()
        );
        for prompt in supplementary_prompts(skills) {
            let reply = llm
                .complete(
                    INTERVIEWER_SYSTEM,
                    &prompt,
                    QUESTIONS_TEMPERATURE,
                    SUPPLEMENT_MAX_TOKENS,
                )
                .await
                .map_err(|e| AppError::llm("Supplementary question generation failed", e))?;

            questions.extend(non_empty_lines(&reply));
            if questions.len() >= SUPPLEMENT_TARGET {
                break;
            }
        }
    }

    let mut questions = dedup_preserving_order(questions);
    questions.truncate(MAX_QUESTIONS);
    Ok(questions)
}

/// One model answer per question, index-aligned. Calls run one after another.
pub async fn generate_expected_answers(
    llm: &dyn ChatCompletion,
    questions: &[String],
    skills: &[String],
    resume_text: &str,
) -> Result<Vec<String>, AppError> {
    if questions.is_empty() {
        return Ok(Vec::new());
    }

    let experience = extract_experience(resume_text);
    let skills = skill_list(skills);
    let mut answers = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let prompt = fill_template(
            EXPECTED_ANSWER_PROMPT_TEMPLATE,
            &[
                ("question", question.as_str()),
                ("skills", skills.as_str()),
                ("experience", experience.as_str()),
            ],
        );

        let answer = llm
            .complete(
                EXPECTED_ANSWER_SYSTEM,
                &prompt,
                ANSWER_TEMPERATURE,
                ANSWER_MAX_TOKENS,
            )
            .await
            .map_err(|e| {
                AppError::llm(
                    &format!("Expected answer {}/{} failed", i + 1, questions.len()),
                    e,
                )
            })?;
        answers.push(answer);
    }

    info!("Generated {} expected answers", answers.len());
    Ok(answers)
}

fn non_empty_lines(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Case-insensitive substring match against any skill or any whitespace token
/// of the experience text. Short tokens ("a", "in") make this very permissive.
fn is_relevant(question: &str, skills: &[String], experience: &str) -> bool {
    let question = question.to_lowercase();
    skills
        .iter()
        .any(|skill| question.contains(&skill.to_lowercase()))
        || experience
            .split_whitespace()
            .any(|token| question.contains(&token.to_lowercase()))
}

/// Scenario (top 3 skills), coding (first skill), then behavioral.
fn supplementary_prompts(skills: &[String]) -> [String; 3] {
    let top = &skills[..skills.len().min(3)];
    let first = skills.first().map(String::as_str).unwrap_or("general programming");
    [
        fill_template(
            SCENARIO_PROMPT_TEMPLATE,
            &[("top_skills", skill_list(top).as_str())],
        ),
        fill_template(CODING_PROMPT_TEMPLATE, &[("skill", first)]),
        BEHAVIORAL_PROMPT.to_string(),
    ]
}
