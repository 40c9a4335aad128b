//! Host environment traits consumed by the sandbox manager.
//!
//! The core never talks to a concrete rendering host directly; everything
//! goes through [`SandboxHost`] (how to obtain a fresh isolated environment)
//! and [`SandboxBackend`] (how one live environment is observed and
//! manipulated). A deterministic in-process implementation lives in
//! [`crate::sandbox::simulated`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SandboxError;

/// Canonical sandbox width in pixels.
pub const SANDBOX_WIDTH: u32 = 800;
/// Canonical sandbox height in pixels.
pub const SANDBOX_HEIGHT: u32 = 600;
/// Offset from the viewport origin applied when the viewport exceeds the
/// canonical footprint on both axes.
pub const EDGE_OFFSET: u32 = 8;

/// Dimensions of the host's visible viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800)
    }
}

/// Placement of one sandbox: fixed canonical dimensions plus a
/// deterministic offset relative to the viewport origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub left: u32,
    pub top: u32,
}

impl Geometry {
    /// Computes the canonical placement for a viewport: 800x600, offset by
    /// 8px from the origin when the viewport exceeds that footprint on both
    /// axes, flush against the origin otherwise.
    pub fn canonical(viewport: Viewport) -> Self {
        let roomy = viewport.width > SANDBOX_WIDTH && viewport.height > SANDBOX_HEIGHT;
        let offset = if roomy { EDGE_OFFSET } else { 0 };
        Self {
            width: SANDBOX_WIDTH,
            height: SANDBOX_HEIGHT,
            left: offset,
            top: offset,
        }
    }
}

/// One live isolated execution environment, as seen by the core.
///
/// Implementations must insert the environment first in the host's display
/// order when loading, so z-ordering and measurement conditions are
/// identical across runs.
#[async_trait]
pub trait SandboxBackend: Send {
    /// Loads the target resource into a fresh environment placed per
    /// `geometry`.
    async fn load(&mut self, url: &str, geometry: Geometry) -> Result<(), SandboxError>;

    /// Resolves once the readiness condition becomes observable in the
    /// loaded application (e.g. a specific element is queryable).
    async fn wait_until_ready(&mut self, condition: &str) -> Result<(), SandboxError>;

    /// Writes a value into the input element matching `selector`.
    fn set_field(&mut self, selector: &str, value: &str) -> Result<(), SandboxError>;

    /// Dispatches a synthetic event to every element matching `selector`.
    fn dispatch(&mut self, selector: &str, event: &str) -> Result<(), SandboxError>;

    /// Number of elements currently matching `selector`.
    fn element_count(&self, selector: &str) -> Result<usize, SandboxError>;

    /// Services one full pass of the deferred work pending at the moment of
    /// the call. Work scheduled while the drain itself runs belongs to a
    /// later checkpoint and must not be serviced here.
    async fn drain_deferred(&mut self) -> Result<(), SandboxError>;

    /// Bounding height of the rendered content, in pixels.
    fn content_height(&self) -> f64;

    /// Tears the environment down and releases its resources.
    async fn destroy(&mut self) -> Result<(), SandboxError>;
}

/// Factory for sandbox backends plus the host facts the manager needs.
pub trait SandboxHost: Send + Sync {
    /// Dimensions of the host's visible viewport.
    fn viewport(&self) -> Viewport;

    /// Creates a backend for one fresh, not-yet-loaded environment.
    fn create_backend(&self) -> Box<dyn SandboxBackend>;
}
