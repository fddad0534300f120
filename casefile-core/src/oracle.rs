//! Verdict oracle: decides whether a detective's guess names the real culprit

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{CasefileError, Result};
use crate::llm::{LLMProvider, LLMRequest};
use crate::parsing::{Verdict, parse_verdict};
use crate::record::Case;

/// Judges a single case.
#[async_trait]
pub trait VerdictOracle: Send + Sync {
    async fn judge(&self, case: &Case) -> Result<Verdict>;
}

/// Sampling settings for the judge call
#[derive(Debug, Clone, PartialEq)]
pub struct OracleSettings {
    pub temperature: f32,
    pub max_tokens: usize,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 10,
        }
    }
}

/// Build the one-word judge prompt for a case.
pub fn judge_prompt(case: &Case) -> String {
    format!(
        "The following suspects were considered: {}.\n The culprit was {}. The detective guessed {}. \
         Was the detective correct? Answer in one word: Yes/No -- Answer:",
        case.suspects, case.gold_answer, case.predicted_answer
    )
}

/// Oracle backed by a chat-completion model.
pub struct LlmVerdictOracle {
    provider: Arc<dyn LLMProvider>,
    settings: OracleSettings,
}

impl LlmVerdictOracle {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self::with_settings(provider, OracleSettings::default())
    }

    pub fn with_settings(provider: Arc<dyn LLMProvider>, settings: OracleSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &OracleSettings {
        &self.settings
    }
}

#[async_trait]
impl VerdictOracle for LlmVerdictOracle {
    async fn judge(&self, case: &Case) -> Result<Verdict> {
        let request = LLMRequest::from_prompt(judge_prompt(case))
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        let response = self.provider.generate_request(&request).await?;
        let raw = response.content.trim();
        tracing::info!(response = %raw, "oracle responded");

        let parsed = parse_verdict(raw)
            .ok_or_else(|| CasefileError::UnparseableVerdict(raw.to_string()))?;
        if !parsed.is_exact() {
            tracing::warn!(
                response = %raw,
                verdict = %parsed.verdict(),
                "unexpected oracle response, normalized"
            );
        }

        Ok(parsed.verdict())
    }
}
