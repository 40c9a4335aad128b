//! stepmark: benchmark orchestration engine.
//!
//! Loads target applications into isolated, disposable sandboxes, drives
//! scripted interaction steps against each, measures every step's
//! synchronous and asynchronous phases on a monotonic clock, and reduces
//! the samples into a single comparative score.
//!
//! The interesting part is the runner (see [`runner`]): exactly-once,
//! ordered execution of opaque third-party interaction scripts inside one
//! sandbox at a time, with a strict sync/async timing boundary and an
//! order-independent final reduction.

pub mod cli;
pub mod client;
pub mod error;
pub mod runner;
pub mod sandbox;
pub mod score;
pub mod suite;
pub mod timer;
pub mod workloads;

// Re-export the types a typical embedding needs.
pub use client::{NullClient, ReportClient, TracingClient};
pub use error::{RunError, SandboxError};
pub use runner::{BenchmarkRunner, RunReport, RunnerConfig};
pub use score::{finalize, Measurement, SuiteResult, Summary, DEFAULT_CORRECTION_FACTOR};
pub use suite::{Prepare, Suite, TestStep};
pub use timer::PhaseTimer;
