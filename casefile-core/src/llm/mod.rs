//! Chat-completion access for the verdict oracle

use async_trait::async_trait;

use crate::error::Result;

/// A single-turn completion request: one user prompt plus sampling limits
#[derive(Debug, Clone, PartialEq)]
pub struct LLMRequest {
    pub prompt: String,

    /// Sampling temperature, clamped to 0.0-2.0
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    pub max_tokens: Option<usize>,
}

impl LLMRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, 2.0));
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// Text the model sent back
#[derive(Debug, Clone, PartialEq)]
pub struct LLMResponse {
    pub content: String,
}

/// Something that can answer a single completion request.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse>;
}

pub mod providers;

pub use providers::OpenAIProvider;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = LLMRequest::from_prompt("Was it Plum?")
            .with_temperature(5.0)
            .with_max_tokens(10);

        assert_eq!(request.prompt, "Was it Plum?");
        assert_eq!(request.temperature, Some(2.0));
        assert_eq!(request.max_tokens, Some(10));
    }

    #[test]
    fn test_request_defaults_leave_sampling_to_the_server() {
        let request = LLMRequest::from_prompt("Yes or no?");
        assert_eq!(request.temperature, None);
        assert_eq!(request.max_tokens, None);
        assert_eq!(LLMRequest::from_prompt("x").with_temperature(-1.0).temperature, Some(0.0));
    }
}
