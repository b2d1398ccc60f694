// Question and expected-answer prompt templates.
// Supplementary prompts run under llm_client::prompts::INTERVIEWER_SYSTEM.

/// System prompt for the main question batch.
pub const QUESTIONS_SYSTEM: &str = "You are an expert technical interviewer. \
    Generate relevant interview questions based on the candidate's skills and experience. \
    Put each question on its own line with no commentary or preamble.";

/// Replace `{skills}` and `{experience}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Generate interview questions based on the following resume:

Skills: {skills}
Experience: {experience}

Generate 10-15 questions that:
1. Test practical knowledge of the listed skills
2. Are relevant to the candidate's experience
3. Include both technical and behavioral aspects
4. Are at an appropriate difficulty level
5. Cover different aspects of their experience

Format each question as a complete sentence, one question per line."#;

/// Replace `{top_skills}`.
pub const SCENARIO_PROMPT_TEMPLATE: &str =
    "Create 5 scenario-based questions for someone with experience in {top_skills}. \
    One question per line.";

/// Replace `{skill}`.
pub const CODING_PROMPT_TEMPLATE: &str =
    "Generate 5 coding interview questions related to {skill}. One question per line.";

pub const BEHAVIORAL_PROMPT: &str =
    "Create 5 behavioral questions based on the candidate's experience. One question per line.";

pub const EXPECTED_ANSWER_SYSTEM: &str =
    "You are an expert technical interviewer creating model answers for evaluation.";

/// Replace `{question}`, `{skills}` and `{experience}` before sending.
pub const EXPECTED_ANSWER_PROMPT_TEMPLATE: &str = r#"You are evaluating responses to technical interview questions.

Question: {question}

Candidate Skills: {skills}
Candidate Experience: {experience}

Generate an ideal answer to this question that would receive a perfect score.
The answer should be comprehensive but concise (150-250 words).
Include specific technical details where appropriate.

Ideal Answer:"#;
