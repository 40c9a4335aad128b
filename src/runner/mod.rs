//! Benchmark runner: sequencing, lifecycle, and phase timing.
//!
//! # Architecture
//!
//! ```text
//! BenchmarkRunner → SuiteSequencer → TestExecutor → PhaseTimer / Sandbox
//! ```
//!
//! The runner iterates suites in declared order and owns the sandbox
//! lifecycle (dispose old, then create new). The sequencer prepares each
//! suite's sandbox and runs its steps strictly in sequence. The executor
//! times one step's synchronous phase, drains the deferred work it
//! scheduled, and times the asynchronous phase. Results flow back up and
//! are reduced once, at run end, into the summary.
//!
//! There is no parallelism anywhere in this tree: isolation and valid
//! timing require strict sequencing.

mod executor;
pub mod orchestrator;
mod sequencer;

pub use orchestrator::{BenchmarkRunner, RunReport, RunnerConfig};
