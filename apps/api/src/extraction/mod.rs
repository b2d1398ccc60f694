// Resume ingestion: document text, entity candidates, skills and experience.
// All LLM calls go through llm_client::ChatCompletion.

use std::collections::HashSet;

pub mod entities;
pub mod prompts;
pub mod sections;
pub mod skills;
pub mod text;

/// Removes exact-string duplicates, keeping the first occurrence.
/// Case-sensitive: "Python" and "python" both survive.
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Returns at most the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
