//! Synchronization between a host option tree and a configuration store.
//!
//! The host owns a tree of objects (core, display, screens, windows) and, per
//! plugin, a set of typed options on each object. The store is a flat,
//! path-keyed key/value service with change notifications. This crate keeps
//! the two in step.
//!
//! # Architecture
//!
//! - **Keys** ([`keys`]): maps (object, plugin, option) to a store key and back
//! - **Codec** ([`codec`]): converts typed option values to store variants and back
//! - **Reload** ([`reload`]): debounced full pass pulling stored values into the
//!   host, rewriting entries that no longer decode
//! - **Write-back** ([`writeback`]): persists local changes, skipping writes
//!   that would not change the stored value
//! - **Dispatcher** ([`dispatcher`]): applies external store changes to the host
//! - **Orchestrator**: tokio event loop owning the host and the [`SyncContext`]
//!
//! ## Echo suppression
//!
//! Values coming from the store are pushed into the host with the context's
//! inbound guard raised and are never written back. Local changes are written
//! only when the encoded value differs from the stored one, so the
//! notification they cause settles after one round.
//!
//! # Example
//!
//! ```
//! use optsync_store::{ConfigStore, MemoryStore, StoreNotification, StoreValue};
//! use optsync_sync::host::mock::MockHost;
//! use optsync_sync::scheduler::ManualScheduler;
//! use optsync_sync::{reload, SyncConfig, SyncContext};
//! use optsync_types::{OptionDescriptor, OptionValue};
//! use std::sync::Arc;
//!
//! let mut host = MockHost::new();
//! let display = host.add_display();
//! host.add_plugin("core", true);
//! host.add_option("core", display, OptionDescriptor::new("hsize", OptionValue::Int(4)));
//!
//! let store = Arc::new(MemoryStore::new());
//! store
//!     .set("/apps/compiz/general/allscreens/options/hsize", StoreValue::int(2))
//!     .unwrap();
//!
//! let scheduler = ManualScheduler::new();
//! let mut ctx = SyncContext::attach(
//!     SyncConfig::default(),
//!     store.clone(),
//!     Arc::new(scheduler.clone()),
//!     Box::new(|_: StoreNotification| {}),
//! )
//! .unwrap();
//!
//! for token in scheduler.take_due() {
//!     reload::on_timer(&mut ctx, &mut host, token);
//! }
//! assert_eq!(host.option_value(display, "core", "hsize"), Some(&OptionValue::Int(2)));
//! ```

pub mod codec;
mod config;
mod context;
pub mod dispatcher;
mod error;
pub mod host;
pub mod keys;
mod orchestrator;
pub mod reload;
pub mod scheduler;
pub mod writeback;

pub use config::SyncConfig;
pub use context::SyncContext;
pub use dispatcher::{DispatchOutcome, IgnoreReason};
pub use error::{DecodeFailure, DecodeResult, SyncError, SyncResult};
pub use host::{HostTree, PluginInfo};
pub use keys::{DecodedKey, ObjectPath, ObjectScope};
pub use orchestrator::{
    create_orchestrator, OrchestratorHandle, SyncCommand, SyncEvent, SyncOrchestrator,
};
pub use reload::{LoadOutcome, ReloadReport};
pub use scheduler::{ManualScheduler, Scheduler, TaskToken, TokioScheduler};
pub use writeback::WriteBack;
