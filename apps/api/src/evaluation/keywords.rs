//! Keyword extraction for the evaluator's fallback path.
//!
//! `extract_keywords` asks the LLM first and drops to `local_keywords`
//! (frequency ranking over stopword-filtered tokens) when that call fails.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::evaluation::prompts::{KEYWORDS_PROMPT_TEMPLATE, KEYWORDS_SYSTEM};
use crate::llm_client::prompts::{fill_template, COMMA_LIST_INSTRUCTION};
use crate::llm_client::ChatCompletion;

const KEYWORDS_TEMPERATURE: f32 = 0.1;
const KEYWORDS_MAX_TOKENS: u32 = 100;
const MAX_LOCAL_KEYWORDS: usize = 5;
/// Tokens must be longer than this to count as keywords.
const MIN_KEYWORD_CHARS: usize = 3;

/// NLTK's English stopword list.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOPWORDS.iter().copied().collect());

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("non-word regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digits regex"));

/// Lowercases, blanks out punctuation and digits, and drops stopwords.
pub fn preprocess(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let no_punct = NON_WORD.replace_all(&lowered, " ");
    let no_digits = DIGITS.replace_all(&no_punct, " ");
    no_digits
        .split_whitespace()
        .filter(|token| !STOPWORDS.contains(token))
        .map(String::from)
        .collect()
}

/// Top five tokens by frequency. Ties keep first-occurrence order.
pub fn local_keywords(text: &str) -> Vec<String> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in preprocess(text) {
        if token.chars().count() <= MIN_KEYWORD_CHARS {
            continue;
        }
        match index.get(&token) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(token.clone(), order.len());
                order.push((token, 1));
            }
        }
    }

    // stable: equal counts stay in first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(MAX_LOCAL_KEYWORDS)
        .map(|(token, _)| token)
        .collect()
}

/// Essential concepts of `text`: the LLM's comma-separated list, or
/// `local_keywords` when the call fails or yields nothing.
pub async fn extract_keywords(llm: &dyn ChatCompletion, text: &str) -> Vec<String> {
    let prompt = fill_template(
        KEYWORDS_PROMPT_TEMPLATE,
        &[("list_instruction", COMMA_LIST_INSTRUCTION), ("text", text)],
    );

    match llm
        .complete(
            KEYWORDS_SYSTEM,
            &prompt,
            KEYWORDS_TEMPERATURE,
            KEYWORDS_MAX_TOKENS,
        )
        .await
    {
        Ok(reply) => {
            let keywords: Vec<String> = reply
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
            if keywords.is_empty() {
                warn!("Keyword extraction returned no keywords; using local frequency ranking");
                return local_keywords(text);
            }
            keywords
        }
        Err(e) => {
            warn!("Keyword extraction failed ({e}); using local frequency ranking");
            local_keywords(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::ScriptedLlm;

    #[test]
    fn test_preprocess_strips_punctuation_digits_and_stopwords() {
        assert_eq!(
            preprocess("The B-tree index, in 2024, is O(log n)!"),
            vec!["b", "tree", "index", "log", "n"]
        );
    }

    #[test]
    fn test_local_keywords_rank_by_frequency_then_first_seen() {
        let text = "Caching reduces latency. Caching needs invalidation. \
                    Latency matters; sharding helps, replication helps.";
        assert_eq!(
            local_keywords(text),
            vec!["caching", "latency", "helps", "reduces", "needs"]
        );
    }

    #[test]
    fn test_local_keywords_skip_short_tokens() {
        assert_eq!(local_keywords("api sql tcp http"), vec!["http"]);
    }

    #[test]
    fn test_local_keywords_empty_text() {
        assert!(local_keywords("").is_empty());
    }

    #[tokio::test]
    async fn test_extract_keywords_prefers_llm_list() {
        let llm = ScriptedLlm::new().reply("recursion, base case , call stack,");
        let keywords = extract_keywords(&llm, "Recursion needs a base case.").await;
        assert_eq!(keywords, vec!["recursion", "base case", "call stack"]);

        let call = &llm.calls()[0];
        assert_eq!(call.system, KEYWORDS_SYSTEM);
        assert_eq!(call.max_tokens, 100);
    }

    #[tokio::test]
    async fn test_extract_keywords_falls_back_on_failure() {
        let llm = ScriptedLlm::failing();
        let keywords = extract_keywords(&llm, "Recursion recursion with memoization").await;
        assert_eq!(keywords, vec!["recursion", "memoization"]);
    }

    #[tokio::test]
    async fn test_extract_keywords_falls_back_on_blank_list() {
        let llm = ScriptedLlm::new().reply(" , ");
        let keywords = extract_keywords(&llm, "Sharding spreads writes").await;
        assert_eq!(keywords, vec!["sharding", "spreads", "writes"]);
    }
}
