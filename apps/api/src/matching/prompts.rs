//! Evaluation prompt for a single candidate/job pair.

use crate::models::candidate::Candidate;
use crate::models::job::Job;

/// Number of resume characters included in the prompt.
pub const RESUME_EXCERPT_CHARS: usize = 1000;

/// Fixed instruction block. The parser depends on the model echoing
/// "Match percentage:" from item 1.
const MATCH_INSTRUCTIONS: &str = "\
Please provide:
1. Match percentage (0-100)
2. Top 3 matching qualifications
3. Critical missing skills
4. Hiring recommendation
";

/// Renders the evaluation prompt. Pure: same inputs, same text.
pub fn build_match_prompt(job: &Job, candidate: &Candidate) -> String {
    let excerpt = resume_excerpt(candidate.resume_text.as_deref());

    format!(
        "
Analyze the following job candidate match:

Job Title: {title}
Company: {company}
Required Skills: {job_skills}

Candidate Skills: {candidate_skills}
Resume Excerpt: {excerpt}...

{MATCH_INSTRUCTIONS}",
        title = job.title,
        company = job.company,
        job_skills = job.skills.join(", "),
        candidate_skills = candidate.skills.join(", "),
    )
}

/// First `RESUME_EXCERPT_CHARS` characters of the resume, or "" when there is none.
fn resume_excerpt(resume_text: Option<&str>) -> &str {
    let text = resume_text.unwrap_or("");
    match text.char_indices().nth(RESUME_EXCERPT_CHARS) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}
