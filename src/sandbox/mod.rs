//! Sandbox lifecycle: isolated, disposable execution environments.
//!
//! The [`SandboxManager`] creates and tears down exactly one environment at
//! a time. A [`Sandbox`] handle is valid only between creation and disposal;
//! the manager refuses to create a second environment while one is live, and
//! the runner is the only component that disposes.

pub mod backend;
pub mod simulated;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::SandboxError;

pub use backend::{
    Geometry, SandboxBackend, SandboxHost, Viewport, EDGE_OFFSET, SANDBOX_HEIGHT, SANDBOX_WIDTH,
};

/// Handle over one live isolated execution environment.
///
/// Interaction scripts receive `&mut Sandbox` and use it to observe and
/// manipulate the loaded application. All operations fail with
/// [`SandboxError::Disposed`] once the manager has torn the environment
/// down.
pub struct Sandbox {
    id: String,
    url: String,
    geometry: Geometry,
    backend: Box<dyn SandboxBackend>,
    disposed: bool,
}

impl Sandbox {
    /// Unique identifier of this sandbox.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Resource locator loaded into this sandbox.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Placement of this sandbox within the host viewport.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn guard(&self) -> Result<(), SandboxError> {
        if self.disposed {
            Err(SandboxError::Disposed(self.id.clone()))
        } else {
            Ok(())
        }
    }

    /// Resolves once the readiness condition becomes observable in the
    /// loaded application.
    pub async fn wait_until_ready(&mut self, condition: &str) -> Result<(), SandboxError> {
        self.guard()?;
        self.backend.wait_until_ready(condition).await
    }

    /// Writes a value into the input element matching `selector`.
    pub fn set_field(&mut self, selector: &str, value: &str) -> Result<(), SandboxError> {
        self.guard()?;
        self.backend.set_field(selector, value)
    }

    /// Dispatches a synthetic event to every element matching `selector`.
    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<(), SandboxError> {
        self.guard()?;
        self.backend.dispatch(selector, event)
    }

    /// Number of elements currently matching `selector`.
    pub fn element_count(&self, selector: &str) -> Result<usize, SandboxError> {
        self.guard()?;
        self.backend.element_count(selector)
    }

    /// Bounding height of the rendered content, in pixels.
    pub fn content_height(&self) -> f64 {
        self.backend.content_height()
    }

    /// Services one full pass of the deferred work currently pending.
    pub(crate) async fn drain_deferred(&mut self) -> Result<(), SandboxError> {
        self.guard()?;
        self.backend.drain_deferred().await
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        if !self.disposed {
            warn!(sandbox = %self.id, "sandbox dropped without being disposed");
        }
    }
}

impl std::fmt::Debug for Sandbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sandbox")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("geometry", &self.geometry)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

/// Creates and tears down sandboxes, enforcing the single-live-handle
/// invariant: at most one [`Sandbox`] exists at any instant, and the
/// previous one must be disposed before the next is created.
pub struct SandboxManager {
    host: Box<dyn SandboxHost>,
    current: Option<Sandbox>,
    created: u64,
    disposed: u64,
}

impl SandboxManager {
    /// Creates a manager over the given host.
    pub fn new(host: Box<dyn SandboxHost>) -> Self {
        Self {
            host,
            current: None,
            created: 0,
            disposed: 0,
        }
    }

    /// Builds a fresh sandbox of canonical geometry, loads `url` into it,
    /// and returns the live handle.
    ///
    /// Fails with [`SandboxError::AlreadyLive`] if the previous sandbox has
    /// not been disposed yet.
    pub async fn create(&mut self, url: &str) -> Result<&mut Sandbox, SandboxError> {
        if self.current.is_some() {
            return Err(SandboxError::AlreadyLive);
        }

        let geometry = Geometry::canonical(self.host.viewport());
        let mut backend = self.host.create_backend();
        backend.load(url, geometry).await?;

        let sandbox = Sandbox {
            id: format!("stepmark-sandbox-{}", Uuid::new_v4()),
            url: url.to_string(),
            geometry,
            backend,
            disposed: false,
        };
        debug!(sandbox = %sandbox.id, url, "sandbox created");

        self.created += 1;
        Ok(self.current.insert(sandbox))
    }

    /// Tears down the live sandbox, if any, and invalidates its handle.
    /// A no-op when no sandbox is live.
    pub async fn dispose(&mut self) -> Result<(), SandboxError> {
        if let Some(mut sandbox) = self.current.take() {
            sandbox.disposed = true;
            sandbox.backend.destroy().await?;
            self.disposed += 1;
            debug!(sandbox = %sandbox.id, "sandbox disposed");
        }
        Ok(())
    }

    /// Mutable access to the live sandbox, if any.
    pub fn current_mut(&mut self) -> Option<&mut Sandbox> {
        self.current.as_mut()
    }

    /// Returns true while a sandbox is live.
    pub fn has_live(&self) -> bool {
        self.current.is_some()
    }

    /// Total sandboxes created over this manager's lifetime.
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Total sandboxes disposed over this manager's lifetime.
    pub fn disposed_count(&self) -> u64 {
        self.disposed
    }
}

impl std::fmt::Debug for SandboxManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxManager")
            .field("live", &self.current.is_some())
            .field("created", &self.created)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
