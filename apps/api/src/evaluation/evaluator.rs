//! Answer Evaluator.
//!
//! Degradation chain, each level used only when the one above fails:
//!   1. structured LLM feedback
//!   2. keyword-gap feedback with LLM-extracted keywords
//!   3. keyword-gap feedback with locally ranked keywords
//!
//! Never fails and never returns an empty string. Filler phrases are stripped
//! from whatever comes out, fallback messages included.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::evaluation::keywords::{extract_keywords, local_keywords};
use crate::evaluation::prompts::{
    FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM, GOOD_COVERAGE_FEEDBACK, MISSING_CONCEPTS_TEMPLATE,
};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::ChatCompletion;

const FEEDBACK_TEMPERATURE: f32 = 0.3;
const FEEDBACK_MAX_TOKENS: u32 = 200;
/// At most this many missing keywords are named in fallback feedback.
const MAX_REPORTED_GAPS: usize = 3;

/// Canned phrases that must never reach the candidate.
pub const FILLER_PHRASES: &[&str] = &[
    "your answer has been recorded",
    "consider reviewing",
    "you can review",
    "has been noted",
    "feedback is recorded",
];

static FILLER: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = FILLER_PHRASES.iter().map(|p| regex::escape(p)).collect();
    Regex::new(&format!("(?i){}", alternatives.join("|"))).expect("filler regex")
});

/// Feedback on `user_answer` measured against `expected_answer`.
pub async fn compare_and_provide_feedback(
    llm: &dyn ChatCompletion,
    user_answer: &str,
    expected_answer: &str,
) -> String {
    let prompt = fill_template(
        FEEDBACK_PROMPT_TEMPLATE,
        &[
            ("expected_answer", expected_answer),
            ("user_answer", user_answer),
        ],
    );

    match llm
        .complete(
            FEEDBACK_SYSTEM,
            &prompt,
            FEEDBACK_TEMPERATURE,
            FEEDBACK_MAX_TOKENS,
        )
        .await
    {
        Ok(reply) => {
            let feedback = strip_filler(&reply);
            if feedback.chars().any(char::is_alphanumeric) {
                return feedback;
            }
            warn!("Feedback was nothing but filler; using keyword-gap feedback");
        }
        Err(e) => warn!("Feedback generation failed ({e}); using keyword-gap feedback"),
    }

    let mut keywords = extract_keywords(llm, expected_answer).await;
    keywords.retain(|k| !FILLER.is_match(k));
    if keywords.is_empty() {
        keywords = local_keywords(expected_answer);
    }
    strip_filler(&keyword_gap_feedback(&keywords, user_answer))
}

/// Reports the expected keywords missing from `user_answer`, compared
/// case-insensitively as substrings.
pub fn keyword_gap_feedback(keywords: &[String], user_answer: &str) -> String {
    let answer = user_answer.to_lowercase();
    let missing: Vec<&str> = keywords
        .iter()
        .filter(|k| !answer.contains(&k.to_lowercase()))
        .map(String::as_str)
        .collect();

    info!("{}/{} expected keywords missing", missing.len(), keywords.len());

    if missing.is_empty() {
        return GOOD_COVERAGE_FEEDBACK.to_string();
    }
    let named = &missing[..missing.len().min(MAX_REPORTED_GAPS)];
    fill_template(MISSING_CONCEPTS_TEMPLATE, &[("missing", named.join(", ").as_str())])
}

/// Removes every filler phrase in any casing and collapses whitespace.
/// Repeats until nothing changes, since a removal can join two fragments
/// into a fresh occurrence.
pub fn strip_filler(text: &str) -> String {
    let mut current = collapse_whitespace(text);
    loop {
        let next = collapse_whitespace(&FILLER.replace_all(&current, ""));
        if next == current {
            return current;
        }
        current = next;
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
