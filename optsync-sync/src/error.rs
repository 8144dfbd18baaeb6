//! Error types for the sync layer.

use optsync_store::{StoreError, StoreValueKind};
use optsync_types::OptionType;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while setting up or driving the engine.
///
/// Per-option failures never surface here; they are logged and dropped.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Config file could not be parsed.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A tokio-backed component was created outside a runtime.
    #[error("no tokio runtime available")]
    NoRuntime,

    /// Channel closed.
    #[error("channel closed")]
    ChannelClosed,
}

/// Result type for value decoding.
pub type DecodeResult<T> = Result<T, DecodeFailure>;

/// Why a stored value could not be turned into an option value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    /// The stored variant kind does not match the option type.
    #[error("expected {expected} value for {option_type} option, found {found}")]
    TypeMismatch {
        option_type: OptionType,
        expected: StoreValueKind,
        found: StoreValueKind,
    },

    /// Key or button bindings need a display to resolve against.
    #[error("no display ancestor to resolve bindings")]
    MissingDisplay,

    /// List element kind mismatch, or a list where none is allowed.
    #[error("malformed list: {0}")]
    MalformedList(String),

    /// The variant kind matched but its content did not parse.
    #[error("invalid content for {option_type} option: {content:?}")]
    InvalidContent {
        option_type: OptionType,
        content: String,
    },

    /// The entry exists but carries no value.
    #[error("entry has no value")]
    NoValue,
}
