//! Error types for stepmark operations.
//!
//! Two layers mirror the runner's structure:
//! - [`SandboxError`] covers sandbox lifecycle and host-backend failures.
//! - [`RunError`] is the fatal, top-level taxonomy a benchmark run rejects
//!   with: a suite that never becomes ready, a step that fails during its
//!   synchronous phase, or a sandbox fault underneath either.
//!
//! No error is swallowed or retried anywhere in the core; every failure
//! surfaces to the `run_all` caller.

use thiserror::Error;

/// Errors raised by the sandbox manager or the host backend.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("a sandbox is already live; it must be disposed before another is created")]
    AlreadyLive,

    #[error("sandbox '{0}' has been disposed")]
    Disposed(String),

    #[error("failed to load '{url}' into the sandbox: {reason}")]
    Load { url: String, reason: String },

    #[error("no element matches '{0}'")]
    NoSuchElement(String),

    #[error("readiness condition '{condition}' failed: {reason}")]
    Readiness { condition: String, reason: String },

    #[error("sandbox backend error: {0}")]
    Backend(String),
}

/// Fatal errors that abort a benchmark run.
///
/// Suite content is opaque third-party code, so its failures travel as
/// [`anyhow::Error`] payloads inside the typed variants.
#[derive(Debug, Error)]
pub enum RunError {
    /// The suite's readiness precondition rejected. The sandbox lifecycle
    /// cannot safely continue, so the whole run aborts.
    #[error("suite '{suite}' failed to prepare: {source}")]
    Prepare {
        suite: String,
        #[source]
        source: anyhow::Error,
    },

    /// A test step failed during its synchronous phase. No partial
    /// measurement is recorded for it.
    #[error("test '{suite}.{test}' failed during its synchronous phase: {source}")]
    Step {
        suite: String,
        test: String,
        #[source]
        source: anyhow::Error,
    },

    /// A timer label was read before it was marked.
    #[error("timer mark '{0}' was never recorded")]
    MissingMark(String),

    #[error("sandbox error: {0}")]
    Sandbox(#[from] SandboxError),
}
