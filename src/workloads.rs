//! Demo suite registry for the simulated host.
//!
//! Each workload drives the same three-step interaction script — add a
//! batch of items, complete them all, delete them all — against simulated
//! applications with different latency profiles, so the comparative score
//! actually has something to compare. Suite content is ordinary caller
//! code: the core only ever sees [`Suite`] values.

use std::time::Duration;

use crate::sandbox::simulated::{AppProfile, SimulatedHost};
use crate::sandbox::{Sandbox, Viewport};
use crate::suite::{Suite, TestStep};

/// Items added by the first step of each workload.
pub const NUMBER_OF_ITEMS: usize = 100;

fn adding_step() -> TestStep {
    TestStep::new(format!("Adding{NUMBER_OF_ITEMS}Items"), |sandbox: &mut Sandbox| {
        for i in 0..NUMBER_OF_ITEMS {
            sandbox.set_field(".new-item", &format!("Something to do {i}"))?;
            sandbox.dispatch(".new-item", "submit")?;
        }
        Ok(())
    })
}

fn completing_step() -> TestStep {
    TestStep::new("CompletingAllItems", |sandbox: &mut Sandbox| {
        sandbox.dispatch(".toggle", "click")?;
        Ok(())
    })
}

fn deleting_step() -> TestStep {
    TestStep::new("DeletingAllItems", |sandbox: &mut Sandbox| {
        sandbox.dispatch(".remove", "click")?;
        Ok(())
    })
}

fn list_suite(name: &str, url: &str) -> Suite {
    Suite::new(name, url)
        .with_ready_condition(".new-item")
        .with_test(adding_step())
        .with_test(completing_step())
        .with_test(deleting_step())
}

/// The demo suites, in declared execution order.
pub fn demo_suites() -> Vec<Suite> {
    vec![
        list_suite("vanilla-list", "sim://apps/vanilla-list"),
        list_suite("batched-list", "sim://apps/batched-list"),
        list_suite("laggy-list", "sim://apps/laggy-list"),
    ]
}

/// A simulated host serving every application the demo suites reference.
pub fn demo_host(viewport: Viewport) -> SimulatedHost {
    SimulatedHost::new(viewport)
        .with_app("sim://apps/vanilla-list", AppProfile::new())
        .with_app(
            "sim://apps/batched-list",
            // Cheap handlers, render work batched into the deferred queue.
            AppProfile::new().with_deferred_cost(Duration::from_micros(200)),
        )
        .with_app(
            "sim://apps/laggy-list",
            AppProfile::new()
                .with_ready_delay(Duration::from_millis(10))
                .with_sync_cost(Duration::from_micros(100))
                .with_deferred_cost(Duration::from_micros(400)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_demo_suite_has_three_steps() {
        for suite in demo_suites() {
            assert_eq!(suite.tests.len(), 3, "suite {}", suite.name);
        }
    }

    #[test]
    fn test_demo_suite_names_are_unique() {
        let suites = demo_suites();
        let mut names: Vec<_> = suites.iter().map(|s| s.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), suites.len());
    }
}
