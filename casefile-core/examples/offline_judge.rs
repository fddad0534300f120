//! Offline judging with a custom oracle
//!
//! Scores a directory of records without calling any model: the oracle says
//! `Yes` when the guess mentions the gold culprit (case-insensitive). Handy for
//! a quick sanity pass before paying for real judge calls.
//!
//! Run with: cargo run --example offline_judge -- path/to/records

use async_trait::async_trait;
use casefile_core::prelude::*;
use std::sync::Arc;

struct MentionOracle;

#[async_trait]
impl VerdictOracle for MentionOracle {
    async fn judge(&self, case: &Case) -> Result<Verdict> {
        let guess = case.predicted_answer.to_lowercase();
        let gold = case.gold_answer.to_lowercase();
        Ok(if guess.contains(&gold) {
            Verdict::Yes
        } else {
            Verdict::No
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let files = discover_files(&dir, &GlobPattern::default())?;

    let evaluator = Evaluator::new(Arc::new(MentionOracle)).with_skip_scored(true);
    let summary = evaluator.run(&files).await;

    println!(
        "scored {} / failed {} / accuracy {}",
        summary.successful,
        summary.failed,
        summary
            .accuracy()
            .map(|a| format!("{:.1}%", a * 100.0))
            .unwrap_or_else(|| "n/a".to_string())
    );
    Ok(())
}
