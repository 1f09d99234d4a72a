// LLM prompt constants for resume analysis.

/// System role for match scoring.
pub const ANALYZE_SYSTEM: &str = "You compare a resume's skills and experience against a \
    job description and its requirements, and judge the fit the way an experienced \
    recruiter would.";

/// Token budget for a match analysis.
pub const ANALYZE_MAX_TOKENS: u32 = 500;

/// Match-scoring prompt. Replace: {job_description}, {requirements}, {skills},
/// {experience}, {plain_text_instruction}
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Job Description:
{job_description}

Requirements:
{requirements}

Resume Skills:
{skills}

Resume Experience:
{experience}

Rate how well the resume's skills and experience match the job description and requirements on a scale from 1 to 10, where 1 is no match and 10 is a perfect match.

Then give detailed feedback:
- how the resume could be tailored to this job
- which required skills the resume is missing
- what would bring the resume to 10/10

Always begin your response with "Match Score: <score>/10".
{plain_text_instruction}"#;
