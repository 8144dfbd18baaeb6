//! Debounced full reload of the option tree from the store.
//!
//! A reload is scheduled on attach and whenever a plugin comes up. Requests
//! arriving while one is pending are folded into it, so a burst of plugin
//! activations costs a single pass.

use crate::codec::decode_option;
use crate::context::SyncContext;
use crate::host::{resolver_for, walk, HostTree};
use crate::keys::key_for;
use crate::scheduler::TaskToken;
use crate::writeback::{persist_option, WriteBack};
use optsync_types::{ObjectId, OptionDescriptor};
use tracing::{debug, info, trace};

/// Summary of one reload pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadReport {
    pub objects: usize,
    pub options: usize,
    pub applied: usize,
    pub healed: usize,
}

/// Result of loading a single option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stored value was pushed into the host.
    Applied,
    /// The host refused the stored value.
    Rejected,
    /// The stored entry was unusable and was overwritten from the host.
    Healed,
    /// Nothing was read or written.
    Skipped,
}

/// Schedules a reload pass unless one is already pending.
///
/// Returns whether a new pass was scheduled.
pub fn schedule_reload(ctx: &mut SyncContext) -> bool {
    if let Some(token) = ctx.pending_reload() {
        trace!(%token, "Reload already pending");
        return false;
    }
    let token = ctx.scheduler().schedule_once(ctx.config().reload_delay());
    ctx.set_pending_reload(Some(token));
    debug!(%token, "Scheduled reload");
    true
}

/// Hook for a plugin becoming active on some object.
pub fn on_plugin_activated(ctx: &mut SyncContext, plugin: &str) -> bool {
    debug!(plugin, "Plugin activated");
    schedule_reload(ctx)
}

/// Handles a fired timer. Runs the pass if `token` is the pending reload.
pub fn on_timer(
    ctx: &mut SyncContext,
    host: &mut dyn HostTree,
    token: TaskToken,
) -> Option<ReloadReport> {
    if ctx.pending_reload() != Some(token) {
        debug!(%token, "Ignoring stale timer");
        return None;
    }
    ctx.set_pending_reload(None);
    Some(run_pass(ctx, host))
}

/// Loads every option of every loaded plugin on every object.
pub fn run_pass(ctx: &mut SyncContext, host: &mut dyn HostTree) -> ReloadReport {
    let mut report = ReloadReport::default();
    let objects = walk(&*host);
    report.objects = objects.len();

    let plugins: Vec<_> = host
        .loaded_plugins()
        .into_iter()
        .filter(|p| p.has_options)
        .collect();

    for object in objects {
        for plugin in &plugins {
            let Some(descriptors) = host.enumerate_options(&plugin.name, object) else {
                continue;
            };
            for descriptor in &descriptors {
                report.options += 1;
                match load_option(ctx, host, object, &plugin.name, descriptor) {
                    LoadOutcome::Applied => report.applied += 1,
                    LoadOutcome::Healed => report.healed += 1,
                    LoadOutcome::Rejected | LoadOutcome::Skipped => {}
                }
            }
        }
    }

    info!(
        objects = report.objects,
        options = report.options,
        applied = report.applied,
        healed = report.healed,
        "Reload pass complete"
    );
    report
}

/// Pulls one option from the store into the host.
///
/// An entry that cannot be decoded is overwritten with the host's value.
pub fn load_option(
    ctx: &mut SyncContext,
    host: &mut dyn HostTree,
    object: ObjectId,
    plugin: &str,
    descriptor: &OptionDescriptor,
) -> LoadOutcome {
    let Some(key) = key_for(ctx.config(), &*host, object, plugin, &descriptor.name) else {
        return LoadOutcome::Skipped;
    };
    let entry = match ctx.store().get_entry(&key) {
        Ok(entry) => entry,
        Err(e) => {
            debug!(key = %key, error = %e, "Store read failed, skipping");
            return LoadOutcome::Skipped;
        }
    };

    match decode_option(descriptor, entry.value.as_ref(), resolver_for(&*host, object)) {
        Ok(value) => {
            let accepted =
                ctx.with_inbound(|_| host.set_option(object, plugin, &descriptor.name, value));
            if accepted {
                LoadOutcome::Applied
            } else {
                debug!(key = %key, "Host rejected stored value");
                LoadOutcome::Rejected
            }
        }
        Err(failure) => {
            debug!(key = %key, %failure, "Stored value unusable, rewriting");
            match persist_option(ctx, &*host, object, plugin, descriptor) {
                WriteBack::Written { .. } => LoadOutcome::Healed,
                _ => LoadOutcome::Skipped,
            }
        }
    }
}
