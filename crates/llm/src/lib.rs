pub mod answer;
pub mod prompt;
pub mod provider;
pub mod providers;

pub use answer::{Answer, AnswerError, Answerer};
pub use prompt::create_prompt;
pub use provider::{CompletionOptions, LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
