//! Regex section heuristics over raw resume text.
//!
//! A section runs from its header up to the next header-like token: a word
//! followed by optional whitespace and then a colon, a pipe or a line break.
//! The rule is loose: a list item that ends a line also ends the section.

use once_cell::sync::Lazy;
use regex::Regex;

/// Section headers treated as "experience", searched in this order.
pub const EXPERIENCE_HEADERS: &[&str] = &[
    "experience",
    "work experience",
    "professional experience",
    "employment history",
    "career history",
];

static SKILLS_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Skills\s*[:-]\s*").expect("skills header regex"));

static EXPERIENCE_HEADER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    EXPERIENCE_HEADERS
        .iter()
        .map(|h| {
            Regex::new(&format!(r"(?i){}\s*[:-]\s*", regex::escape(h)))
                .expect("experience header regex")
        })
        .collect()
});

/// "Senior Engineer at Acme Corp": two or more capitalised words on each side
/// of a preposition.
static ROLE_AT_COMPANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[A-Z][a-z]+\s*){2,}(?:at|in|for|with)\s+(?:[A-Z][a-z]+\s*){2,}\b")
        .expect("role regex")
});

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offset of the next header-like token in `text`, or `text.len()`.
fn next_header(text: &str) -> usize {
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if !is_word_char(c) {
            continue;
        }
        while chars.next_if(|&(_, c)| is_word_char(c)).is_some() {}

        let mut line_break = false;
        while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_whitespace()) {
            line_break |= c == '\n';
        }
        if line_break || matches!(chars.peek(), Some((_, ':' | '|'))) {
            return start;
        }
    }
    text.len()
}

/// Text following `header`'s match at or after `from`, up to the next header.
/// Returns the trimmed body and the byte offset where it ends.
fn section_after<'a>(header: &Regex, text: &'a str, from: usize) -> Option<(&'a str, usize)> {
    let m = header.find_at(text, from)?;
    let body_start = m.end();
    let body_end = body_start + next_header(&text[body_start..]);
    Some((text[body_start..body_end].trim(), body_end))
}

/// Fallback skill list: the first "Skills:" section split on `,` `|` `•` `-`.
pub fn skills_section(text: &str) -> Vec<String> {
    let Some((body, _)) = section_after(&SKILLS_HEADER, text, 0) else {
        return Vec::new();
    };
    body.split(|c: char| matches!(c, ',' | '|' | '•' | '-'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Every experience-style section body joined with newlines. Falls back to
/// "role at company" fragments when no header is present.
pub fn extract_experience(text: &str) -> String {
    let mut sections: Vec<&str> = Vec::new();

    for header in EXPERIENCE_HEADER_PATTERNS.iter() {
        let mut pos = 0;
        while let Some((body, end)) = section_after(header, text, pos) {
            sections.push(body);
            pos = end;
        }
    }

    if sections.is_empty() {
        sections = ROLE_AT_COMPANY
            .find_iter(text)
            .map(|m| m.as_str())
            .collect();
    }

    sections.join("\n")
}
