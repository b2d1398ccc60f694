// Question sets: interview questions plus one ideal answer per question,
// generated from resume or transcription text and persisted as one record.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod service;
