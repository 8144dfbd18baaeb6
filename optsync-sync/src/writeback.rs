//! Persisting local option changes.

use crate::codec::encode_value;
use crate::context::SyncContext;
use crate::host::{resolver_for, HostTree};
use crate::keys::key_for;
use optsync_types::{ObjectId, OptionDescriptor};
use tracing::{debug, trace, warn};

/// What happened to one local change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBack {
    /// The store was updated.
    Written { key: String },
    /// The store already held the same value.
    Unchanged { key: String },
    /// The change came from the store, or a reload is about to overwrite it.
    Bypassed,
    /// The plugin has no such option on the object.
    UnknownOption,
    /// The value cannot be encoded here (a binding with no display).
    Unencodable,
    /// The store rejected the read or write.
    Failed { key: String },
}

/// Hook for every accepted local option set.
///
/// Looks the option up again through the host so the persisted value is
/// whatever the host actually stored.
pub fn after_option_set(
    ctx: &SyncContext,
    host: &dyn HostTree,
    object: ObjectId,
    plugin: &str,
    option: &str,
) -> WriteBack {
    if ctx.is_inbound() || ctx.pending_reload().is_some() {
        trace!(plugin, option, "Write-back bypassed");
        return WriteBack::Bypassed;
    }

    let descriptor = host
        .enumerate_options(plugin, object)
        .and_then(|opts| opts.into_iter().find(|d| d.name == option));
    match descriptor {
        Some(descriptor) => persist_option(ctx, host, object, plugin, &descriptor),
        None => {
            debug!(plugin, option, %object, "No descriptor for changed option");
            WriteBack::UnknownOption
        }
    }
}

/// Writes a descriptor's current value unless the store already has it.
pub fn persist_option(
    ctx: &SyncContext,
    host: &dyn HostTree,
    object: ObjectId,
    plugin: &str,
    descriptor: &OptionDescriptor,
) -> WriteBack {
    let Some(key) = key_for(ctx.config(), host, object, plugin, &descriptor.name) else {
        return WriteBack::UnknownOption;
    };
    let Some(encoded) = encode_value(&descriptor.value, resolver_for(host, object)) else {
        debug!(key = %key, "Option value not encodable without a display");
        return WriteBack::Unencodable;
    };

    // A failed read counts as "nothing stored".
    let stored = ctx.store().get_entry(&key).ok().and_then(|entry| entry.value);
    if stored.as_ref() == Some(&encoded) {
        trace!(key = %key, "Stored value already current");
        return WriteBack::Unchanged { key };
    }

    match ctx.store().set(&key, encoded) {
        Ok(()) => {
            debug!(key = %key, "Persisted option");
            WriteBack::Written { key }
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to persist option");
            WriteBack::Failed { key }
        }
    }
}
