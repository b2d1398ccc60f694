// Answer evaluation: LLM feedback with a keyword-gap fallback chain, plus
// the answer history it feeds.

pub mod evaluator;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod service;
