// LLM prompt constants for resume tailoring and cover letters.

/// System role for resume tailoring.
pub const TAILOR_SYSTEM: &str = "You rewrite resumes so they fit a target job realistically.";

/// Token budget for a tailored resume.
pub const TAILOR_MAX_TOKENS: u32 = 1000;

/// Tailoring prompt. Replace: {analysis}, {current_resume_text}, {plain_text_instruction}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer.

Feedback on the candidate's resume:
{analysis}

Original resume:
{current_resume_text}

Using only this feedback, produce an improved resume that:
- strengthens weak sections
- adds the missing skills and achievements named in the feedback
- rephrases unclear or redundant parts

Keep everything else as it is. Missing skills belong in the existing skills section.
The result must be polished and realistic for what the candidate has actually done.
{plain_text_instruction}"#;

/// System role for cover letters.
pub const COVER_LETTER_SYSTEM: &str =
    "You write cover letters that read as if a person wrote them.";

/// Token budget for a cover letter.
pub const COVER_LETTER_MAX_TOKENS: u32 = 1000;

/// Cover-letter prompt. Replace: {skills}, {experience}, {job_description},
/// {requirements}, {plain_text_instruction}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Help a job seeker write a natural, conversational cover letter.
Connect the applicant's skills and experience to the job's description and requirements.

Tone and style:
- friendly and personal, relaxed and confident
- everyday language with natural transitions; no buzzwords or corporate templates
- varied sentence length
- three to four paragraphs, ending with a simple, honest sign-off

Skills:
{skills}

Experience:
{experience}

Job Description:
{job_description}

Job Requirements:
{requirements}

Write only the letter.
{plain_text_instruction}"#;
