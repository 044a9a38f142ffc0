mod openrouter;

pub use super::openai_compat::OpenAiCompatProvider;
pub use openrouter::OpenRouterProvider;
