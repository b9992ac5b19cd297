// Review endpoints: bullet augmentation, resume grading, resume vs job comparison.
// All LLM calls go through the TextGenerator in AppState.

pub mod augment;
pub mod comparison;
pub mod grader;
pub mod handlers;
pub mod parse;
pub mod prompts;
