//! Test executor: runs one step and times its two phases.
//!
//! The timing boundary is strict: `sync-end` is marked immediately when the
//! step closure returns, then control yields to the sandbox for exactly one
//! full drain of the deferred work the closure scheduled, and `async-end`
//! is marked when that drain completes. Setup and teardown never leak into
//! either phase.

use tracing::debug;

use crate::error::RunError;
use crate::sandbox::Sandbox;
use crate::score::Measurement;
use crate::suite::TestStep;
use crate::timer::PhaseTimer;

fn label(suite: &str, test: &str, phase: &str) -> String {
    format!("{suite}.{test}-{phase}")
}

/// Runs one test step against the live sandbox and reports its measurement.
///
/// If the step closure fails, `sync-end` is never marked, no measurement is
/// produced, and the failure propagates as [`RunError::Step`] — fatal to
/// the run.
pub(crate) async fn run_step(
    suite_name: &str,
    test: &TestStep,
    sandbox: &mut Sandbox,
    timer: &mut PhaseTimer,
) -> Result<Measurement, RunError> {
    let start = label(suite_name, &test.name, "start");
    let sync_end = label(suite_name, &test.name, "sync-end");
    let async_end = label(suite_name, &test.name, "async-end");

    timer.mark(&start);
    test.execute(sandbox).map_err(|source| RunError::Step {
        suite: suite_name.to_string(),
        test: test.name.clone(),
        source,
    })?;
    timer.mark(&sync_end);

    // Single deferred checkpoint, not a fixed-delay sleep: exactly the work
    // the step scheduled is serviced before async-end.
    sandbox.drain_deferred().await?;
    timer.mark(&async_end);

    let sync_ms = timer
        .duration_ms(&start, &sync_end)
        .ok_or_else(|| RunError::MissingMark(sync_end.clone()))?;
    let async_ms = timer
        .duration_ms(&sync_end, &async_end)
        .ok_or_else(|| RunError::MissingMark(async_end.clone()))?;
    let sandbox_metric = sandbox.content_height();

    debug!(
        suite = suite_name,
        test = %test.name,
        sync_ms,
        async_ms,
        "test step measured"
    );

    Ok(Measurement {
        test_name: test.name.clone(),
        sync_ms,
        async_ms,
        sandbox_metric,
    })
}
