//! Casefile CLI - score detective-puzzle records with an LLM judge

use anyhow::{Context, Result, bail};
use casefile_core::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "casefile")]
#[command(about = "Evaluate detective accuracy by asking a judge model whether each guess names the culprit", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory containing JSON files to process
    directory: PathBuf,

    /// OpenAI API key (or set OPENAI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// File pattern to match (default: *.json)
    #[arg(long)]
    pattern: Option<String>,

    /// Judge model (default: gpt-4.1-mini)
    #[arg(long)]
    model: Option<String>,

    /// Chat completions base URL for OpenAI-compatible endpoints
    #[arg(long)]
    base_url: Option<String>,

    /// TOML configuration file (CASEFILE_CONFIG_PATH is also honored)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip records that already have a verdict
    #[arg(long)]
    skip_scored: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            pattern: self.pattern.clone(),
            skip_scored: self.skip_scored,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CasefileConfig::load_with(&cli.overrides()).context("invalid configuration")?;

    let api_key = config.require_api_key()?.to_string();
    let provider = OpenAIProvider::with_base_url(api_key, config.model.clone(), config.base_url.clone())
        .with_timeout(config.request_timeout)?;
    tracing::info!(model = provider.model(), base_url = provider.base_url(), "judge configured");

    let pattern = GlobPattern::new(&config.pattern)?;
    let files = discover_files(&cli.directory, &pattern)?;
    if files.is_empty() {
        bail!(
            "No files matching {} found in {}",
            pattern.as_str(),
            cli.directory.display()
        );
    }
    println!("Found {} files to process", files.len());

    let oracle = LlmVerdictOracle::with_settings(Arc::new(provider), config.oracle_settings());
    let evaluator = Evaluator::new(Arc::new(oracle)).with_skip_scored(config.skip_scored);
    let summary = evaluator.run(&files).await;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let rule = "=".repeat(50);
    println!();
    println!("{rule}");
    println!("Successfully processed: {}", summary.successful);
    println!("Failed to process: {}", summary.failed);
    println!("Total files: {}", summary.total());
    if let Some(accuracy) = summary.accuracy() {
        println!(
            "Detective accuracy: {:.1}% ({}/{})",
            accuracy * 100.0,
            summary.correct,
            summary.successful
        );
    }
    println!("Elapsed: {:.1}s", summary.duration.as_secs_f64());
    println!("{rule}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "casefile",
            "runs/latest",
            "--api-key",
            "sk-test",
            "--pattern",
            "case_*.json",
            "--skip-scored",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(cli.directory, PathBuf::from("runs/latest"));
        assert_eq!(overrides.api_key.as_deref(), Some("sk-test"));
        assert_eq!(overrides.pattern.as_deref(), Some("case_*.json"));
        assert!(overrides.skip_scored);
        assert!(overrides.model.is_none());
        assert!(overrides.config_path.is_none());
    }

    #[test]
    fn test_directory_is_required() {
        assert!(Cli::try_parse_from(["casefile"]).is_err());
    }
}
