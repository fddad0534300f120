//! Sequential scoring of record files

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::error::{CasefileError, Result};
use crate::oracle::VerdictOracle;
use crate::parsing::Verdict;
use crate::record::{apply_verdict, load_record, persist_record};

/// What happened to one file
#[derive(Debug)]
pub enum FileOutcome {
    /// Judged and rewritten with the verdict
    Scored(Verdict),
    /// Left untouched on disk
    Skipped(CasefileError),
}

impl FileOutcome {
    pub fn is_scored(&self) -> bool {
        matches!(self, FileOutcome::Scored(_))
    }
}

/// Aggregate counts for a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Files judged and rewritten
    pub successful: usize,
    /// Files skipped for any reason
    pub failed: usize,
    /// Scored files the oracle judged correct
    pub correct: usize,
    /// Skipped files with the reason
    pub failures: Vec<(PathBuf, String)>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.successful + self.failed
    }

    /// Share of scored files judged correct; `None` when nothing was scored.
    pub fn accuracy(&self) -> Option<f64> {
        (self.successful > 0).then(|| self.correct as f64 / self.successful as f64)
    }

    fn record(&mut self, path: &Path, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Scored(verdict) => {
                self.successful += 1;
                if verdict.is_correct() {
                    self.correct += 1;
                }
            }
            FileOutcome::Skipped(err) => {
                self.failed += 1;
                self.failures.push((path.to_path_buf(), err.to_string()));
            }
        }
    }
}

/// Scores record files one at a time against a verdict oracle.
pub struct Evaluator {
    oracle: Arc<dyn VerdictOracle>,
    skip_scored: bool,
}

impl Evaluator {
    pub fn new(oracle: Arc<dyn VerdictOracle>) -> Self {
        Self {
            oracle,
            skip_scored: false,
        }
    }

    /// Do not re-judge records that already carry a verdict.
    pub fn with_skip_scored(mut self, skip_scored: bool) -> Self {
        self.skip_scored = skip_scored;
        self
    }

    /// Load, judge, and rewrite a single file.
    ///
    /// The file is written only after the oracle returned a verdict; every
    /// earlier failure leaves it untouched.
    pub async fn score_file(&self, path: &Path) -> Result<Verdict> {
        let record = load_record(path)?;
        if self.skip_scored && record.is_scored() {
            return Err(CasefileError::AlreadyScored);
        }

        let case = record.case()?;
        tracing::info!(
            suspects = %case.suspects,
            actual = %case.gold_answer,
            guess = %case.predicted_answer,
            "judging record"
        );

        let verdict = self.oracle.judge(&case).await?;
        let record = apply_verdict(record, verdict);
        persist_record(path, &record)?;

        Ok(verdict)
    }

    /// [`score_file`](Self::score_file) with failures logged and folded into
    /// the outcome.
    pub async fn evaluate_file(&self, path: &Path) -> FileOutcome {
        let span = tracing::info_span!("record", file = %path.display());
        async {
            match self.score_file(path).await {
                Ok(verdict) => {
                    tracing::info!(%verdict, "updated record");
                    FileOutcome::Scored(verdict)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipped record");
                    FileOutcome::Skipped(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Process every file in order; a failure never stops the run.
    pub async fn run(&self, files: &[PathBuf]) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::default();

        for (index, path) in files.iter().enumerate() {
            tracing::debug!(index = index + 1, total = files.len(), "processing");
            let outcome = self.evaluate_file(path).await;
            summary.record(path, outcome);
        }

        summary.duration = started.elapsed();
        tracing::info!(
            successful = summary.successful,
            failed = summary.failed,
            total = summary.total(),
            "run complete"
        );
        summary
    }
}
