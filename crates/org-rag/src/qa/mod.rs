//! Question answering: retrieval, prompt assembly, generation, evaluation

pub mod evaluator;
pub mod pipeline;
pub mod prompt;

pub use evaluator::evaluate_answer;
pub use pipeline::AskPipeline;
pub use prompt::PromptBuilder;
