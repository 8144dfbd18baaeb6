//! Tokio event loop wiring the engine to a store and a host tree.
//!
//! The orchestrator task owns the host tree and the [`SyncContext`]. Local
//! commands, store notifications and fired timers arrive over channels and
//! are handled one at a time, so inbound and outbound propagation never
//! interleave.

use crate::config::SyncConfig;
use crate::context::SyncContext;
use crate::dispatcher::{self, DispatchOutcome};
use crate::error::{SyncError, SyncResult};
use crate::host::HostTree;
use crate::reload::{self, ReloadReport};
use crate::scheduler::{TaskToken, TokioScheduler};
use crate::writeback::{self, WriteBack};
use optsync_store::{ConfigStore, StoreNotification};
use optsync_types::{ObjectId, OptionValue};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Commands accepted by the orchestrator.
#[derive(Debug, Clone)]
pub enum SyncCommand {
    /// A local option change: apply it to the host, then write it back.
    SetOption {
        object: ObjectId,
        plugin: String,
        option: String,
        value: OptionValue,
    },
    /// A plugin came up; its stored options need loading.
    PluginActivated { plugin: String },
    /// Request a reload pass.
    Reload,
    /// Stop the event loop and detach.
    Shutdown,
}

/// Events emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    ReloadCompleted(ReloadReport),
    /// The host refused a local change.
    LocalRejected { plugin: String, option: String },
    LocalChange {
        plugin: String,
        option: String,
        outcome: WriteBack,
    },
    ExternalChange {
        key: String,
        outcome: DispatchOutcome,
    },
}

/// Cloneable sender side of the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    command_tx: mpsc::UnboundedSender<SyncCommand>,
}

impl OrchestratorHandle {
    fn send(&self, command: SyncCommand) -> SyncResult<()> {
        self.command_tx
            .send(command)
            .map_err(|_| SyncError::ChannelClosed)
    }

    pub fn set_option(
        &self,
        object: ObjectId,
        plugin: impl Into<String>,
        option: impl Into<String>,
        value: OptionValue,
    ) -> SyncResult<()> {
        self.send(SyncCommand::SetOption {
            object,
            plugin: plugin.into(),
            option: option.into(),
            value,
        })
    }

    pub fn plugin_activated(&self, plugin: impl Into<String>) -> SyncResult<()> {
        self.send(SyncCommand::PluginActivated {
            plugin: plugin.into(),
        })
    }

    pub fn reload(&self) -> SyncResult<()> {
        self.send(SyncCommand::Reload)
    }

    pub fn shutdown(&self) -> SyncResult<()> {
        self.send(SyncCommand::Shutdown)
    }
}

/// The event loop. Drive it with [`SyncOrchestrator::run`].
pub struct SyncOrchestrator<H> {
    context: SyncContext,
    host: H,
    command_rx: mpsc::UnboundedReceiver<SyncCommand>,
    notify_rx: mpsc::UnboundedReceiver<StoreNotification>,
    timer_rx: mpsc::UnboundedReceiver<TaskToken>,
    event_tx: mpsc::UnboundedSender<SyncEvent>,
}

/// Attaches to `store` and builds an orchestrator around `host`.
///
/// Must be called from inside a tokio runtime. The initial reload is already
/// scheduled when this returns.
pub fn create_orchestrator<H>(
    config: SyncConfig,
    store: Arc<dyn ConfigStore>,
    host: H,
) -> SyncResult<(
    OrchestratorHandle,
    mpsc::UnboundedReceiver<SyncEvent>,
    SyncOrchestrator<H>,
)>
where
    H: HostTree + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notify_tx, notify_rx) = mpsc::unbounded_channel();
    let (timer_tx, timer_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let scheduler = Arc::new(TokioScheduler::new(timer_tx)?);
    let on_change = Box::new(move |notification: StoreNotification| {
        if notify_tx.send(notification).is_err() {
            debug!("Store notification after orchestrator stopped");
        }
    });
    let context = SyncContext::attach(config, store, scheduler, on_change)?;

    let orchestrator = SyncOrchestrator {
        context,
        host,
        command_rx,
        notify_rx,
        timer_rx,
        event_tx,
    };
    Ok((OrchestratorHandle { command_tx }, event_rx, orchestrator))
}

impl<H> SyncOrchestrator<H>
where
    H: HostTree + Send + 'static,
{
    /// Runs until [`SyncCommand::Shutdown`] or until every handle is
    /// dropped. Detaches from the store and returns the host tree.
    pub async fn run(mut self) -> H {
        info!("Sync orchestrator started");
        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(SyncCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(notification) = self.notify_rx.recv() => {
                    let outcome =
                        dispatcher::handle_change(&mut self.context, &mut self.host, &notification);
                    self.emit(SyncEvent::ExternalChange {
                        key: notification.key,
                        outcome,
                    });
                }
                Some(token) = self.timer_rx.recv() => {
                    if let Some(report) =
                        reload::on_timer(&mut self.context, &mut self.host, token)
                    {
                        self.emit(SyncEvent::ReloadCompleted(report));
                    }
                }
            }
        }

        let SyncOrchestrator { context, host, .. } = self;
        context.detach();
        info!("Sync orchestrator stopped");
        host
    }

    fn handle_command(&mut self, command: SyncCommand) {
        match command {
            SyncCommand::SetOption {
                object,
                plugin,
                option,
                value,
            } => {
                if !self.host.set_option(object, &plugin, &option, value) {
                    debug!(plugin = %plugin, option = %option, "Host rejected local change");
                    self.emit(SyncEvent::LocalRejected { plugin, option });
                    return;
                }
                let outcome =
                    writeback::after_option_set(&self.context, &self.host, object, &plugin, &option);
                self.emit(SyncEvent::LocalChange {
                    plugin,
                    option,
                    outcome,
                });
            }
            SyncCommand::PluginActivated { plugin } => {
                reload::on_plugin_activated(&mut self.context, &plugin);
            }
            SyncCommand::Reload => {
                reload::schedule_reload(&mut self.context);
            }
            SyncCommand::Shutdown => {}
        }
    }

    fn emit(&self, event: SyncEvent) {
        // Nobody listening is fine.
        let _ = self.event_tx.send(event);
    }
}
