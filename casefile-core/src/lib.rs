//! # Casefile - scoring detective-puzzle solutions with an LLM judge
//!
//! Each puzzle record is a JSON file holding the gold culprit, the list of
//! suspects, and a model-written solution. Casefile:
//! - extracts the detective's `MAIN CULPRIT(S)` statement from the solution
//! - asks a judge model whether that guess names the gold culprit
//! - writes the `Yes` / `No` verdict back into the record as `detection["correct?"]`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use casefile_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = CasefileConfig::load()?;
//!     let provider = OpenAIProvider::with_base_url(
//!         config.require_api_key()?,
//!         config.model.clone(),
//!         config.base_url.clone(),
//!     );
//!     let oracle = LlmVerdictOracle::with_settings(Arc::new(provider), config.oracle_settings());
//!     let evaluator = Evaluator::new(Arc::new(oracle));
//!
//!     let files = discover_files("puzzles", &GlobPattern::new(&config.pattern)?)?;
//!     let summary = evaluator.run(&files).await;
//!     println!("{}/{} scored", summary.successful, summary.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Parsing**: culprit extraction and verdict normalization, pure functions
//! - **Records**: order-preserving JSON wrapper; only the verdict field is written
//! - **Oracle**: `VerdictOracle` trait, with an LLM-backed implementation
//! - **Eval**: file discovery and the sequential per-file pipeline

pub mod config;
pub mod error;
pub mod eval;
pub mod llm;
pub mod oracle;
pub mod parsing;
pub mod record;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{CasefileConfig, ConfigOverrides};
    pub use crate::error::{CasefileError, Result};
    pub use crate::eval::{Evaluator, FileOutcome, GlobPattern, RunSummary, discover_files};
    pub use crate::llm::{LLMProvider, LLMRequest, LLMResponse, OpenAIProvider};
    pub use crate::oracle::{LlmVerdictOracle, OracleSettings, VerdictOracle, judge_prompt};
    pub use crate::parsing::{
        CulpritParser, CulpritStrategy, OutputParser, ParseError, ParseResult, Verdict,
        VerdictMatch, extract_main_culprit, extract_main_culprit_value, parse_verdict,
    };
    pub use crate::record::{
        Case, Field, Record, Suspects, VERDICT_KEY, apply_verdict, load_record, persist_record,
    };
}
