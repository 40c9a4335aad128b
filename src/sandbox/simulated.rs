//! Deterministic in-process sandbox host.
//!
//! Models a small list-editing application behind the [`SandboxBackend`]
//! trait: synthetic input mutates an item list synchronously, and mutating
//! events queue deferred render work that is only serviced by the next
//! drain checkpoint. Used by the CLI demo workloads and the test suite; a
//! real deployment would put an actual rendering host behind the same
//! traits.
//!
//! Recognized selectors:
//! - `.new-item` — the entry field (`set_field` stores the draft, a
//!   `submit` event appends it as a new item);
//! - `.item`, `.toggle`, `.remove` — one per item (`click` on `.toggle`
//!   flips completion, `click` on `.remove` deletes all items);
//! - `.item.completed` — completed items only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::backend::{Geometry, SandboxBackend, SandboxHost, Viewport};
use crate::error::SandboxError;

/// Behavior profile of one simulated application.
#[derive(Debug, Clone)]
pub struct AppProfile {
    /// Delay before the readiness condition becomes observable.
    pub ready_delay: Duration,
    /// Blocking cost charged inside each dispatched event, i.e. time spent
    /// in directly-executed script.
    pub sync_cost: Duration,
    /// Deferred render work queued by each mutating event, serviced at the
    /// next drain checkpoint.
    pub deferred_cost: Duration,
    /// Rendered height contributed by each item.
    pub item_height: f64,
    /// Rendered height of the empty application shell.
    pub base_height: f64,
    /// The readiness condition rejects instead of resolving.
    pub fail_ready: bool,
    /// The readiness condition never resolves at all.
    pub never_ready: bool,
}

impl AppProfile {
    /// A responsive application: near-instant readiness, no artificial
    /// script or render cost.
    pub fn new() -> Self {
        Self {
            ready_delay: Duration::from_millis(1),
            sync_cost: Duration::ZERO,
            deferred_cost: Duration::ZERO,
            item_height: 24.0,
            base_height: 120.0,
            fail_ready: false,
            never_ready: false,
        }
    }

    pub fn with_ready_delay(mut self, delay: Duration) -> Self {
        self.ready_delay = delay;
        self
    }

    pub fn with_sync_cost(mut self, cost: Duration) -> Self {
        self.sync_cost = cost;
        self
    }

    pub fn with_deferred_cost(mut self, cost: Duration) -> Self {
        self.deferred_cost = cost;
        self
    }

    /// Makes the readiness condition reject.
    pub fn failing_ready(mut self) -> Self {
        self.fail_ready = true;
        self
    }

    /// Makes the readiness condition hang forever.
    pub fn never_ready(mut self) -> Self {
        self.never_ready = true;
        self
    }
}

impl Default for AppProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle counters shared between a host and its backends.
#[derive(Debug, Default)]
pub struct HostStats {
    created: AtomicU64,
    destroyed: AtomicU64,
    live: AtomicU64,
    max_live: AtomicU64,
}

impl HostStats {
    /// Environments created so far.
    pub fn created(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    /// Environments destroyed so far.
    pub fn destroyed(&self) -> u64 {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Environments currently live.
    pub fn live(&self) -> u64 {
        self.live.load(Ordering::SeqCst)
    }

    /// Highest number of environments ever live at once.
    pub fn max_live(&self) -> u64 {
        self.max_live.load(Ordering::SeqCst)
    }

    fn record_created(&self) {
        self.created.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
    }

    fn record_destroyed(&self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
struct SimItem {
    completed: bool,
}

/// One simulated application instance.
pub struct SimulatedBackend {
    apps: HashMap<String, AppProfile>,
    stats: Arc<HostStats>,
    profile: Option<AppProfile>,
    draft: String,
    items: Vec<SimItem>,
    pending: Vec<Duration>,
}

impl SimulatedBackend {
    fn new(apps: HashMap<String, AppProfile>, stats: Arc<HostStats>) -> Self {
        Self {
            apps,
            stats,
            profile: None,
            draft: String::new(),
            items: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn profile(&self) -> Result<&AppProfile, SandboxError> {
        self.profile
            .as_ref()
            .ok_or_else(|| SandboxError::Backend("no application loaded".to_string()))
    }

    fn charge_sync_cost(&self) -> Result<(), SandboxError> {
        let cost = self.profile()?.sync_cost;
        if !cost.is_zero() {
            // Synchronous script cost: spent before the event handler
            // returns, so it must block rather than yield.
            std::thread::sleep(cost);
        }
        Ok(())
    }

    fn queue_deferred(&mut self) -> Result<(), SandboxError> {
        let cost = self.profile()?.deferred_cost;
        if !cost.is_zero() {
            self.pending.push(cost);
        }
        Ok(())
    }
}

#[async_trait]
impl SandboxBackend for SimulatedBackend {
    async fn load(&mut self, url: &str, _geometry: Geometry) -> Result<(), SandboxError> {
        let profile = self.apps.get(url).cloned().ok_or_else(|| SandboxError::Load {
            url: url.to_string(),
            reason: "unknown simulated application".to_string(),
        })?;
        self.profile = Some(profile);
        self.stats.record_created();
        Ok(())
    }

    async fn wait_until_ready(&mut self, condition: &str) -> Result<(), SandboxError> {
        let profile = self.profile()?.clone();
        if profile.never_ready {
            futures::future::pending::<()>().await;
        }
        if profile.fail_ready {
            return Err(SandboxError::Readiness {
                condition: condition.to_string(),
                reason: "application failed to initialize".to_string(),
            });
        }
        tokio::time::sleep(profile.ready_delay).await;
        Ok(())
    }

    fn set_field(&mut self, selector: &str, value: &str) -> Result<(), SandboxError> {
        self.profile()?;
        if selector == ".new-item" {
            self.draft = value.to_string();
            Ok(())
        } else {
            Err(SandboxError::NoSuchElement(selector.to_string()))
        }
    }

    fn dispatch(&mut self, selector: &str, event: &str) -> Result<(), SandboxError> {
        self.charge_sync_cost()?;
        match (selector, event) {
            (".new-item", "submit") => {
                self.items.push(SimItem { completed: false });
                self.draft.clear();
                self.queue_deferred()
            }
            (".toggle", "click") => {
                for item in &mut self.items {
                    item.completed = !item.completed;
                }
                self.queue_deferred()
            }
            (".remove", "click") => {
                self.items.clear();
                self.queue_deferred()
            }
            (".new-item" | ".toggle" | ".remove" | ".item", _) => Ok(()),
            _ => Err(SandboxError::NoSuchElement(selector.to_string())),
        }
    }

    fn element_count(&self, selector: &str) -> Result<usize, SandboxError> {
        self.profile()?;
        let count = match selector {
            ".new-item" => 1,
            ".item" | ".toggle" | ".remove" => self.items.len(),
            ".item.completed" => self.items.iter().filter(|i| i.completed).count(),
            _ => 0,
        };
        Ok(count)
    }

    async fn drain_deferred(&mut self) -> Result<(), SandboxError> {
        // One full pass over the work pending right now; anything queued
        // afterwards waits for the next checkpoint.
        let batch = std::mem::take(&mut self.pending);
        for cost in batch {
            tokio::time::sleep(cost).await;
        }
        Ok(())
    }

    fn content_height(&self) -> f64 {
        match self.profile() {
            Ok(profile) => profile.base_height + profile.item_height * self.items.len() as f64,
            Err(_) => 0.0,
        }
    }

    async fn destroy(&mut self) -> Result<(), SandboxError> {
        if self.profile.take().is_some() {
            self.stats.record_destroyed();
        }
        self.items.clear();
        self.pending.clear();
        Ok(())
    }
}

/// In-process host serving a registry of simulated applications by URL.
pub struct SimulatedHost {
    viewport: Viewport,
    apps: HashMap<String, AppProfile>,
    stats: Arc<HostStats>,
}

impl SimulatedHost {
    /// Creates a host with an empty application registry.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            apps: HashMap::new(),
            stats: Arc::new(HostStats::default()),
        }
    }

    /// Registers a simulated application under a URL.
    pub fn with_app(mut self, url: impl Into<String>, profile: AppProfile) -> Self {
        self.apps.insert(url.into(), profile);
        self
    }

    /// Shared lifecycle counters for this host's environments.
    pub fn stats(&self) -> Arc<HostStats> {
        Arc::clone(&self.stats)
    }
}

impl SandboxHost for SimulatedHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn create_backend(&self) -> Box<dyn SandboxBackend> {
        Box::new(SimulatedBackend::new(self.apps.clone(), Arc::clone(&self.stats)))
    }
}
