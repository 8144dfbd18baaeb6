//! Core type definitions for optsync.
//!
//! This crate defines the typed option model shared by the store adapter and
//! the synchronization engine:
//! - Option types and values (scalars and homogeneous lists)
//! - String sub-encodings for colors, key/button bindings, screen edges and
//!   window-match expressions
//! - Object identifiers and object types of the host tree
//!
//! Nothing here knows about keys or stores; the translation to store
//! variants lives in `optsync-sync`.

mod binding;
mod color;
mod edge;
mod matching;
mod object;
mod value;

pub use binding::{ButtonBinding, KeyBinding, KeyResolver, Modifiers};
pub use color::Color;
pub use edge::EdgeMask;
pub use matching::{Conjunction, MatchExpr, MatchOp, MatchTerm};
pub use object::{ObjectId, ObjectType};
pub use value::{OptionDescriptor, OptionType, OptionValue, ValueList};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or parsing option values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("list elements must be {expected}, got {found}")]
    ListElementType {
        expected: OptionType,
        found: OptionType,
    },

    #[error("lists cannot contain lists")]
    NestedList,
}
