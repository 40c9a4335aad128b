//! End-to-end runner behavior over the simulated host.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use stepmark::sandbox::simulated::{AppProfile, SimulatedHost};
use stepmark::sandbox::{Sandbox, Viewport};
use stepmark::{
    BenchmarkRunner, NullClient, ReportClient, RunError, Suite, Summary, TestStep,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Will(String, String),
    Did(String, String),
    Summary,
}

#[derive(Default)]
struct RecordingClient {
    events: Mutex<Vec<Event>>,
}

impl RecordingClient {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl ReportClient for RecordingClient {
    fn will_run_test(&self, suite: &str, test: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Will(suite.to_string(), test.to_string()));
    }

    fn did_run_test(&self, suite: &str, test: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Did(suite.to_string(), test.to_string()));
    }

    fn did_run_suites(&self, _summary: &Summary) {
        self.events.lock().unwrap().push(Event::Summary);
    }
}

fn add_step(name: &str) -> TestStep {
    TestStep::new(name, |sandbox: &mut Sandbox| {
        sandbox.set_field(".new-item", "something to do")?;
        sandbox.dispatch(".new-item", "submit")?;
        Ok(())
    })
}

#[tokio::test]
async fn test_hooks_pair_around_each_test_in_declared_order() {
    let host = SimulatedHost::new(Viewport::new(1280, 800))
        .with_app("sim://apps/one", AppProfile::new())
        .with_app("sim://apps/two", AppProfile::new());

    let suites = vec![
        Suite::new("one", "sim://apps/one")
            .with_ready_condition(".new-item")
            .with_test(add_step("First"))
            .with_test(add_step("Second")),
        Suite::new("two", "sim://apps/two").with_test(add_step("Third")),
    ];

    let client = Arc::new(RecordingClient::default());
    let mut runner = BenchmarkRunner::new(suites, Box::new(host), client.clone());
    runner.run_all().await.unwrap();

    let expected = vec![
        Event::Will("one".into(), "First".into()),
        Event::Did("one".into(), "First".into()),
        Event::Will("one".into(), "Second".into()),
        Event::Did("one".into(), "Second".into()),
        Event::Will("two".into(), "Third".into()),
        Event::Did("two".into(), "Third".into()),
        Event::Summary,
    ];
    assert_eq!(client.events(), expected);
}

#[tokio::test]
async fn test_exactly_one_sandbox_live_and_balanced_at_run_end() {
    let host = SimulatedHost::new(Viewport::new(1280, 800))
        .with_app("sim://apps/one", AppProfile::new())
        .with_app("sim://apps/two", AppProfile::new())
        .with_app("sim://apps/three", AppProfile::new());
    let stats = host.stats();

    let suites = vec![
        Suite::new("one", "sim://apps/one").with_test(add_step("Add")),
        Suite::new("two", "sim://apps/two").with_test(add_step("Add")),
        Suite::new("three", "sim://apps/three").with_test(add_step("Add")),
    ];

    let mut runner = BenchmarkRunner::new(suites, Box::new(host), Arc::new(NullClient));
    runner.run_all().await.unwrap();

    assert_eq!(stats.created(), 3);
    assert_eq!(stats.destroyed(), 3);
    assert_eq!(stats.live(), 0);
    assert_eq!(stats.max_live(), 1);
    assert_eq!(runner.sandboxes_created(), runner.sandboxes_disposed());
}

#[tokio::test]
async fn test_async_phase_reflects_only_own_deferred_work() {
    // Every mutating event queues 40ms of deferred render work.
    let host = SimulatedHost::new(Viewport::new(1280, 800)).with_app(
        "sim://apps/batched",
        AppProfile::new().with_deferred_cost(Duration::from_millis(40)),
    );

    let suites = vec![Suite::new("batched", "sim://apps/batched")
        .with_ready_condition(".new-item")
        .with_test(add_step("Mutates"))
        .with_test(TestStep::new("OnlyReads", |sandbox: &mut Sandbox| {
            sandbox.element_count(".item")?;
            Ok(())
        }))];

    let mut runner = BenchmarkRunner::new(suites, Box::new(host), Arc::new(NullClient));
    let report = runner.run_all().await.unwrap();

    let measurements = &report.suites[0].measurements;
    assert_eq!(measurements.len(), 2);

    for m in measurements {
        assert!(m.sync_ms >= 0.0);
        assert!(m.async_ms >= 0.0);
    }

    // The mutating step pays for its own deferred batch...
    assert!(
        measurements[0].async_ms >= 30.0,
        "deferred work missing from async phase: {}",
        measurements[0].async_ms
    );
    // ...and none of it bleeds into the next test's window.
    assert!(
        measurements[1].async_ms <= 15.0,
        "cross-test timing leakage: {}",
        measurements[1].async_ms
    );
}

#[tokio::test]
async fn test_failing_prepare_aborts_instead_of_skipping() {
    let host = SimulatedHost::new(Viewport::new(1280, 800))
        .with_app("sim://apps/broken", AppProfile::new().failing_ready())
        .with_app("sim://apps/healthy", AppProfile::new());
    let stats = host.stats();

    let suites = vec![
        Suite::new("broken", "sim://apps/broken")
            .with_ready_condition(".new-item")
            .with_test(add_step("Add")),
        Suite::new("healthy", "sim://apps/healthy").with_test(add_step("Add")),
    ];

    let client = Arc::new(RecordingClient::default());
    let mut runner = BenchmarkRunner::new(suites, Box::new(host), client.clone());
    let err = runner.run_all().await.unwrap_err();

    assert!(matches!(err, RunError::Prepare { ref suite, .. } if suite.as_str() == "broken"));
    assert!(
        client.events().is_empty(),
        "no test may run and no summary may be reported after a prepare failure"
    );
    assert_eq!(stats.live(), 0, "aborted run must not leak its sandbox");
}

#[tokio::test]
async fn test_never_resolving_prepare_stalls_the_run() {
    let host = SimulatedHost::new(Viewport::new(1280, 800))
        .with_app("sim://apps/hung", AppProfile::new().never_ready());

    let suites = vec![Suite::new("hung", "sim://apps/hung")
        .with_ready_condition(".new-item")
        .with_test(add_step("Add"))];

    let mut runner = BenchmarkRunner::new(suites, Box::new(host), Arc::new(NullClient));
    let outcome = tokio::time::timeout(Duration::from_millis(200), runner.run_all()).await;
    assert!(outcome.is_err(), "a hung readiness wait must stall, not skip");
}

#[tokio::test]
async fn test_failing_step_records_nothing_and_rejects() {
    let host = SimulatedHost::new(Viewport::new(1280, 800))
        .with_app("sim://apps/one", AppProfile::new());

    let suites = vec![Suite::new("one", "sim://apps/one")
        .with_test(add_step("Works"))
        .with_test(TestStep::new("Explodes", |_: &mut Sandbox| {
            anyhow::bail!("synchronous failure")
        }))];

    let client = Arc::new(RecordingClient::default());
    let mut runner = BenchmarkRunner::new(suites, Box::new(host), client.clone());
    let err = runner.run_all().await.unwrap_err();

    assert!(matches!(err, RunError::Step { ref test, .. } if test.as_str() == "Explodes"));

    let events = client.events();
    assert!(events.contains(&Event::Will("one".into(), "Explodes".into())));
    assert!(
        !events.contains(&Event::Did("one".into(), "Explodes".into())),
        "did_run_test must not fire for a fatally failing step"
    );
    assert!(
        !events.contains(&Event::Summary),
        "no summary may be reported for an aborted run"
    );
}

#[tokio::test]
async fn test_report_round_trips_through_json() {
    let host = SimulatedHost::new(Viewport::new(1280, 800))
        .with_app("sim://apps/one", AppProfile::new());
    let suites = vec![Suite::new("one", "sim://apps/one").with_test(add_step("Add"))];

    let mut runner = BenchmarkRunner::new(suites, Box::new(host), Arc::new(NullClient));
    let report = runner.run_all().await.unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let parsed: stepmark::RunReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.summary, report.summary);
    assert_eq!(parsed.suites.len(), 1);
}
