//! Top-level benchmark runner.
//!
//! Iterates all suites in declared order, replacing the sandbox between
//! suites (dispose old, then create new — never the reverse), and reduces
//! the accumulated measurements into the final summary. This is the only
//! component that disposes sandboxes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::sequencer;
use crate::client::ReportClient;
use crate::error::RunError;
use crate::sandbox::{SandboxHost, SandboxManager};
use crate::score::{self, SuiteResult, Summary, DEFAULT_CORRECTION_FACTOR};
use crate::suite::Suite;
use crate::timer::PhaseTimer;

/// Tunables of a benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Fixed calibration constant dividing the score (see
    /// [`crate::score::finalize`]).
    pub correction_factor: f64,
}

impl RunnerConfig {
    /// Creates the reference configuration.
    pub fn new() -> Self {
        Self {
            correction_factor: DEFAULT_CORRECTION_FACTOR,
        }
    }

    /// Overrides the correction factor.
    pub fn with_correction_factor(mut self, factor: f64) -> Self {
        self.correction_factor = factor;
        self
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete record of one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Wall-clock timestamp at run start (metadata only; never used for
    /// durations).
    pub started_at: DateTime<Utc>,
    /// Wall-clock timestamp at run end.
    pub completed_at: DateTime<Utc>,
    /// Per-suite results in execution order.
    pub suites: Vec<SuiteResult>,
    /// The final reduction.
    pub summary: Summary,
}

/// Drives a full benchmark run: suites in order, one sandbox at a time,
/// one summary at the end.
pub struct BenchmarkRunner {
    suites: Vec<Suite>,
    client: Arc<dyn ReportClient>,
    manager: SandboxManager,
    timer: PhaseTimer,
    config: RunnerConfig,
}

impl BenchmarkRunner {
    /// Creates a runner over the given suites, host, and reporting client.
    pub fn new(suites: Vec<Suite>, host: Box<dyn SandboxHost>, client: Arc<dyn ReportClient>) -> Self {
        Self {
            suites,
            client,
            manager: SandboxManager::new(host),
            timer: PhaseTimer::new(),
            config: RunnerConfig::default(),
        }
    }

    /// Replaces the default configuration.
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs every suite in declared order and returns the run report.
    ///
    /// Any failure aborts the whole run: the error propagates after a
    /// best-effort disposal of the live sandbox, and no summary is
    /// reported.
    pub async fn run_all(&mut self) -> Result<RunReport, RunError> {
        let started_at = Utc::now();
        info!(suites = self.suites.len(), "starting benchmark run");

        let result = self.run_suites().await;
        let suites = match result {
            Ok(suites) => suites,
            Err(e) => {
                if let Err(dispose_err) = self.manager.dispose().await {
                    warn!(error = %dispose_err, "failed to dispose sandbox after aborted run");
                }
                return Err(e);
            }
        };

        let summary = score::finalize(&suites, self.config.correction_factor);
        self.client.did_run_suites(&summary);

        Ok(RunReport {
            started_at,
            completed_at: Utc::now(),
            suites,
            summary,
        })
    }

    async fn run_suites(&mut self) -> Result<Vec<SuiteResult>, RunError> {
        let mut results = Vec::with_capacity(self.suites.len());

        for suite in &self.suites {
            // Dispose old, then create new; the sequencer creates.
            self.manager.dispose().await?;
            let result =
                sequencer::run_suite(suite, &mut self.manager, &mut self.timer, self.client.as_ref())
                    .await?;
            info!(
                suite = %suite.name,
                tests = result.measurements.len(),
                total_ms = result.total_ms,
                "suite completed"
            );
            results.push(result);
        }
        self.manager.dispose().await?;

        Ok(results)
    }

    /// Total sandboxes created so far.
    pub fn sandboxes_created(&self) -> u64 {
        self.manager.created_count()
    }

    /// Total sandboxes disposed so far.
    pub fn sandboxes_disposed(&self) -> u64 {
        self.manager.disposed_count()
    }
}
