//! Batch evaluation of puzzle records
//!
//! Finds record files in a directory, then scores them one after another:
//! extract the detective's guess, ask the oracle, write the verdict back.
//! Nothing here runs concurrently; each file is finished before the next is
//! opened.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use casefile_core::eval::{Evaluator, GlobPattern, discover_files};
//! use casefile_core::llm::OpenAIProvider;
//! use casefile_core::oracle::LlmVerdictOracle;
//!
//! # async fn run() -> casefile_core::error::Result<()> {
//! let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
//! let provider = Arc::new(OpenAIProvider::with_base_url(
//!     api_key,
//!     "gpt-4.1-mini",
//!     "https://api.openai.com/v1",
//! ));
//! let evaluator = Evaluator::new(Arc::new(LlmVerdictOracle::new(provider)));
//!
//! let files = discover_files("runs/2024-05", &GlobPattern::default())?;
//! let summary = evaluator.run(&files).await;
//! println!("{} scored, {} failed", summary.successful, summary.failed);
//! # Ok(())
//! # }
//! ```

mod discovery;
mod evaluator;

pub use discovery::{GlobPattern, discover_files};
pub use evaluator::{Evaluator, FileOutcome, RunSummary};
