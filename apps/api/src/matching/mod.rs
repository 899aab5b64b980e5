// Candidate/job matching: prompt construction, one inference call, score extraction.
// All model calls go through the inference backend — never reqwest directly.

pub mod evaluator;
pub mod handlers;
pub mod parser;
pub mod prompts;
