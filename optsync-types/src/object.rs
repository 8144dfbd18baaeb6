//! Host tree object identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle of a live object in the host tree.
///
/// Handles are issued by the host and stay valid for the object's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u32);

impl ObjectId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a host tree object. The tree is `core → display → screen → window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Core,
    Display,
    Screen,
    Window,
}

impl ObjectType {
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectType::Core => "core",
            ObjectType::Display => "display",
            ObjectType::Screen => "screen",
            ObjectType::Window => "window",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
