//! Attach/detach lifecycle and shared engine state.

use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::scheduler::{Scheduler, TaskToken};
use optsync_store::{ConfigStore, WatchCallback, WatchId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// State of one attachment between a host tree and a store.
///
/// Owns the watch subscription and the pending reload token. Both are
/// released by [`SyncContext::detach`] or on drop.
pub struct SyncContext {
    config: SyncConfig,
    store: Arc<dyn ConfigStore>,
    scheduler: Arc<dyn Scheduler>,
    watch: Option<WatchId>,
    pending_reload: Option<TaskToken>,
    inbound: bool,
}

impl SyncContext {
    /// Subscribes to the application's key prefix and schedules the initial
    /// reload pass.
    ///
    /// `on_change` receives every store notification under the prefix; it is
    /// expected to forward them to [`crate::dispatcher::handle_change`].
    pub fn attach(
        config: SyncConfig,
        store: Arc<dyn ConfigStore>,
        scheduler: Arc<dyn Scheduler>,
        on_change: WatchCallback,
    ) -> SyncResult<Self> {
        config.validate()?;
        let prefix = config.watch_prefix();
        let watch = store.watch(&prefix, on_change)?;

        let mut ctx = Self {
            config,
            store,
            scheduler,
            watch: Some(watch),
            pending_reload: None,
            inbound: false,
        };
        crate::reload::schedule_reload(&mut ctx);
        info!(%watch, prefix = %prefix, "Attached to config store");
        Ok(ctx)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn ConfigStore {
        self.store.as_ref()
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        self.scheduler.as_ref()
    }

    pub fn watch_id(&self) -> Option<WatchId> {
        self.watch
    }

    pub fn pending_reload(&self) -> Option<TaskToken> {
        self.pending_reload
    }

    pub(crate) fn set_pending_reload(&mut self, token: Option<TaskToken>) {
        self.pending_reload = token;
    }

    /// True while values read from the store are being pushed into the host.
    pub fn is_inbound(&self) -> bool {
        self.inbound
    }

    /// Runs `f` with the inbound guard raised. Local-change hooks invoked
    /// from inside `f` are not written back.
    ///
    /// The guard lives on the context, not the host. It only covers callers
    /// that run [`after_option_set`](crate::writeback::after_option_set)
    /// inside `f` with the context `f` receives. A host whose own set path
    /// triggers write-back cannot see it; the dispatcher and the reload pass
    /// avoid echoes by never calling write-back after their pushes.
    pub fn with_inbound<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.inbound, true);
        let result = f(self);
        self.inbound = previous;
        result
    }

    /// Cancels any pending reload, drops the watch and clears the store's
    /// client cache.
    pub fn detach(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(token) = self.pending_reload.take() {
            self.scheduler.cancel(token);
            debug!(%token, "Cancelled pending reload");
        }
        let Some(watch) = self.watch.take() else {
            return;
        };
        if let Err(e) = self.store.unwatch(watch) {
            warn!(%watch, error = %e, "Failed to remove store watch");
        }
        self.store.clear_cache();
        info!(%watch, "Detached from config store");
    }
}

impl Drop for SyncContext {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("config", &self.config)
            .field("watch", &self.watch)
            .field("pending_reload", &self.pending_reload)
            .field("inbound", &self.inbound)
            .finish_non_exhaustive()
    }
}
