// Answer evaluation prompt templates.

pub const FEEDBACK_SYSTEM: &str =
    "You provide specific, actionable technical interview feedback without generic phrases.";

/// Replace `{expected_answer}` and `{user_answer}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are providing detailed feedback on a technical interview answer. Be specific, constructive, and direct.

Expected Answer:
{expected_answer}

User's Answer:
{user_answer}

Provide specific feedback by:
1. Start with what the user did well (if anything)
2. Clearly identify which key technical concepts were missing or incorrect
3. Point out any misconceptions or errors
4. Suggest specific improvements with examples
5. Mention any additional points that would strengthen the answer

Be direct and specific. Don't use generic phrases like "your answer has been recorded" or "consider reviewing".
Give actionable, technical feedback that helps them improve their interview performance.
Keep the feedback concise but comprehensive - around 3-4 sentences maximum."#;

pub const KEYWORDS_SYSTEM: &str = "You extract essential technical concepts from text.";

/// Replace `{text}` and `{list_instruction}` before sending.
pub const KEYWORDS_PROMPT_TEMPLATE: &str = r#"Extract the 5-8 most important technical concepts or key points from this text that would be essential for a correct answer:

{text}

{list_instruction}"#;

pub const GOOD_COVERAGE_FEEDBACK: &str = "Good coverage of the main concepts. \
    To improve further, add specific examples and explain the reasoning behind your approach in more detail.";

/// Replace `{missing}` with up to three comma-separated keywords.
pub const MISSING_CONCEPTS_TEMPLATE: &str = "Your answer is missing key concepts: {missing}. \
    Focus on explaining these areas with specific examples and technical details to provide a more complete response.";
