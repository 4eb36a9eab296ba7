// All LLM prompt constants for the Feedback module.

/// Name of the forced tool whose input carries the evaluation.
pub const FEEDBACK_TOOL_NAME: &str = "submit_feedback";

pub const FEEDBACK_TOOL_DESCRIPTION: &str =
    "Submit the structured evaluation of the candidate's mock interview.";

/// System instruction for transcript evaluation.
pub const FEEDBACK_SYSTEM: &str = "You are a professional interviewer analyzing a mock interview. \
    Your task is to evaluate the candidate based on structured categories.";

/// Evaluation prompt template.
/// Replace: {transcript}, {categories}, {tool_name}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are an AI interviewer analyzing a mock interview. Your task is to evaluate the candidate based on structured categories. Be thorough and detailed in your analysis. Don't be lenient with the candidate. If there are mistakes or areas for improvement, point them out.

Transcript:
{transcript}

Please score the candidate from 0 to 100 in the following areas. Do not add categories other than the ones provided:
{categories}

Also provide:
- totalScore: an overall score from 0 to 100
- strengths: what the candidate did well
- areasForImprovement: concrete things the candidate should work on
- finalAssessment: a short paragraph summarizing the interview

Submit the result by calling the `{tool_name}` tool."#;
