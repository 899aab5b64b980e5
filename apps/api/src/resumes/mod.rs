// Resume uploads: stored on local disk, text pulled out for matching prompts.

pub mod extract;
pub mod handlers;
