//! Applying external store changes to the host tree.
//!
//! Only one display is supported. Hosts with more than one display object
//! have their notifications dropped with a warning.

use crate::codec::decode_option;
use crate::context::SyncContext;
use crate::error::DecodeFailure;
use crate::host::{resolver_for, HostTree};
use crate::keys::{decode_key, ObjectScope};
use optsync_store::StoreNotification;
use optsync_types::{ObjectId, ObjectType};
use tracing::{debug, trace, warn};

/// Why a notification was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Not an option key of this application.
    UnrecognizedKey,
    InactivePlugin,
    NoDisplay,
    MultipleDisplays,
    /// No screen with the key's discriminator.
    UnknownObject,
    /// The plugin has no such option on the object.
    UnknownOption,
    Undecodable(DecodeFailure),
    /// The host refused the decoded value.
    Rejected,
}

/// Result of handling one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl DispatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DispatchOutcome::Applied)
    }
}

/// Handles a store change notification.
///
/// The value is pushed into the host with the inbound guard raised, so it is
/// not written back.
pub fn handle_change(
    ctx: &mut SyncContext,
    host: &mut dyn HostTree,
    notification: &StoreNotification,
) -> DispatchOutcome {
    let key = notification.key.as_str();
    let Some(decoded) = decode_key(ctx.config(), key) else {
        trace!(key, "Ignoring foreign key");
        return DispatchOutcome::Ignored(IgnoreReason::UnrecognizedKey);
    };

    if host.find_active_plugin(&decoded.plugin).is_none() {
        debug!(key, plugin = %decoded.plugin, "Plugin not active");
        return DispatchOutcome::Ignored(IgnoreReason::InactivePlugin);
    }

    let display = match single_display(&*host) {
        Ok(display) => display,
        Err(reason) => return DispatchOutcome::Ignored(reason),
    };
    let object = match &decoded.scope {
        ObjectScope::AllScreens => display,
        ObjectScope::Screen(name) => {
            match host.find_object(display, ObjectType::Screen, Some(name.as_str())) {
                Some(screen) => screen,
                None => {
                    debug!(key, screen = %name, "No such screen");
                    return DispatchOutcome::Ignored(IgnoreReason::UnknownObject);
                }
            }
        }
    };

    let Some(descriptor) = host
        .enumerate_options(&decoded.plugin, object)
        .and_then(|opts| opts.into_iter().find(|d| d.name == decoded.option))
    else {
        debug!(key, "No such option");
        return DispatchOutcome::Ignored(IgnoreReason::UnknownOption);
    };

    let value = match decode_option(
        &descriptor,
        notification.entry.value.as_ref(),
        resolver_for(&*host, object),
    ) {
        Ok(value) => value,
        Err(failure) => {
            debug!(key, %failure, "Ignoring undecodable change");
            return DispatchOutcome::Ignored(IgnoreReason::Undecodable(failure));
        }
    };

    let accepted =
        ctx.with_inbound(|_| host.set_option(object, &decoded.plugin, &decoded.option, value));
    if accepted {
        debug!(key, "Applied external change");
        DispatchOutcome::Applied
    } else {
        DispatchOutcome::Ignored(IgnoreReason::Rejected)
    }
}

fn single_display(host: &dyn HostTree) -> Result<ObjectId, IgnoreReason> {
    let displays: Vec<ObjectId> = host
        .children(host.root())
        .into_iter()
        .filter(|id| host.object_type(*id) == Some(ObjectType::Display))
        .collect();
    match displays.as_slice() {
        [display] => Ok(*display),
        [] => {
            debug!("No display object");
            Err(IgnoreReason::NoDisplay)
        }
        _ => {
            warn!(displays = displays.len(), "Only one display is supported");
            Err(IgnoreReason::MultipleDisplays)
        }
    }
}
