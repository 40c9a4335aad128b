//! Suite sequencer: prepares the sandbox and runs a suite's steps in order.
//!
//! The sequencer creates the suite's sandbox and awaits the readiness
//! precondition before any timing starts, which removes load-race
//! nondeterminism from the measured phases. It never disposes the sandbox —
//! lifecycle ownership stays with the runner.

use tracing::debug;

use super::executor;
use crate::client::ReportClient;
use crate::error::RunError;
use crate::sandbox::SandboxManager;
use crate::score::SuiteResult;
use crate::suite::{Prepare, Suite};
use crate::timer::PhaseTimer;

/// Runs every test of one suite in declared order against a freshly
/// created sandbox.
///
/// The `will_run_test` / `did_run_test` hooks fire around each step,
/// outside the measured windows; `did_run_test` is not fired for a step
/// that fails fatally.
pub(crate) async fn run_suite(
    suite: &Suite,
    manager: &mut SandboxManager,
    timer: &mut PhaseTimer,
    client: &dyn ReportClient,
) -> Result<SuiteResult, RunError> {
    let sandbox = manager.create(&suite.url).await?;

    match &suite.prepare {
        Prepare::Immediate => {}
        Prepare::ReadyWhen(condition) => {
            sandbox
                .wait_until_ready(condition)
                .await
                .map_err(|e| RunError::Prepare {
                    suite: suite.name.clone(),
                    source: e.into(),
                })?;
        }
        Prepare::Custom(prepare) => {
            prepare(sandbox).await.map_err(|source| RunError::Prepare {
                suite: suite.name.clone(),
                source,
            })?;
        }
    }
    debug!(suite = %suite.name, "suite prepared");

    let mut result = SuiteResult::new(&suite.name);
    for test in &suite.tests {
        client.will_run_test(&suite.name, &test.name);
        let measurement = executor::run_step(&suite.name, test, sandbox, timer).await?;
        result.push(measurement);
        client.did_run_test(&suite.name, &test.name);
    }

    Ok(result)
}
