//! Reporting client contract.
//!
//! The runner fires pure side-effect hooks around each test and once at run
//! end. Hooks execute outside the measured windows, so a slow client cannot
//! contaminate timing.

use tracing::info;

use crate::score::Summary;

/// External collaborator notified of run progress.
///
/// All hooks default to no-ops; implement only what the client cares about.
pub trait ReportClient: Send + Sync {
    /// Fired immediately before a test step executes.
    fn will_run_test(&self, suite: &str, test: &str) {
        let _ = (suite, test);
    }

    /// Fired after a test step completed and its measurement was recorded.
    /// Not fired when the step itself fails fatally.
    fn did_run_test(&self, suite: &str, test: &str) {
        let _ = (suite, test);
    }

    /// Fired exactly once at run end with the final summary.
    fn did_run_suites(&self, summary: &Summary) {
        let _ = summary;
    }
}

/// Client that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullClient;

impl ReportClient for NullClient {}

/// Client that logs progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingClient;

impl ReportClient for TracingClient {
    fn will_run_test(&self, suite: &str, test: &str) {
        info!(suite, test, "running test");
    }

    fn did_run_suites(&self, summary: &Summary) {
        info!(
            total_ms = summary.total,
            geomean = summary.geomean,
            score = summary.score,
            "benchmark run finished"
        );
    }
}
