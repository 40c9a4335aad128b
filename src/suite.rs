//! Suite and test-step data model.
//!
//! Suites are supplied by the caller and only read by the core: a named
//! group of sequential interaction steps run against one loaded application
//! instance, plus a readiness precondition that gates timing until the
//! application has finished loading.

use futures::future::BoxFuture;

use crate::sandbox::Sandbox;

/// Synchronous interaction step body. Work it schedules on the sandbox
/// (deferred render batches, pending I/O) forms the asynchronous completion
/// side-channel measured after the closure returns.
pub type StepFn = Box<dyn Fn(&mut Sandbox) -> anyhow::Result<()> + Send + Sync>;

/// Caller-supplied async precondition, resolved before any step is timed.
pub type PrepareFn =
    Box<dyn for<'a> Fn(&'a mut Sandbox) -> BoxFuture<'a, anyhow::Result<()>> + Send + Sync>;

/// Readiness precondition of a suite.
pub enum Prepare {
    /// No gate beyond the sandbox load itself.
    Immediate,
    /// Wait until the given condition becomes observable in the loaded
    /// application (e.g. an element is queryable).
    ReadyWhen(String),
    /// Arbitrary caller-supplied async precondition.
    Custom(PrepareFn),
}

impl std::fmt::Debug for Prepare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prepare::Immediate => write!(f, "Immediate"),
            Prepare::ReadyWhen(condition) => write!(f, "ReadyWhen({condition:?})"),
            Prepare::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// One scripted interaction step, timed in two phases.
pub struct TestStep {
    /// Step name, unique within its suite.
    pub name: String,
    run: StepFn,
}

impl TestStep {
    /// Creates a step from a name and a synchronous closure.
    pub fn new(
        name: impl Into<String>,
        run: impl Fn(&mut Sandbox) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            run: Box::new(run),
        }
    }

    /// Invokes the step body against the live sandbox.
    pub(crate) fn execute(&self, sandbox: &mut Sandbox) -> anyhow::Result<()> {
        (self.run)(sandbox)
    }
}

impl std::fmt::Debug for TestStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestStep").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A named group of sequential test steps run against one loaded
/// application instance.
pub struct Suite {
    /// Suite name, unique within a run.
    pub name: String,
    /// Resource locator of the application under test.
    pub url: String,
    /// Readiness precondition, awaited before the first step.
    pub prepare: Prepare,
    /// Steps in declared execution order.
    pub tests: Vec<TestStep>,
}

impl Suite {
    /// Creates a suite with an immediate (no-op) readiness precondition.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            prepare: Prepare::Immediate,
            tests: Vec::new(),
        }
    }

    /// Gates the suite on a readiness condition.
    pub fn with_ready_condition(mut self, condition: impl Into<String>) -> Self {
        self.prepare = Prepare::ReadyWhen(condition.into());
        self
    }

    /// Gates the suite on a caller-supplied async precondition.
    pub fn with_prepare(mut self, prepare: PrepareFn) -> Self {
        self.prepare = Prepare::Custom(prepare);
        self
    }

    /// Appends a test step; declaration order is execution order.
    pub fn with_test(mut self, test: TestStep) -> Self {
        self.tests.push(test);
        self
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("prepare", &self.prepare)
            .field("tests", &self.tests)
            .finish()
    }
}
