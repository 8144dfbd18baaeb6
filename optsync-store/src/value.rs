//! Variant values held by the store.

use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a [`StoreValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreValueKind {
    Bool,
    Int,
    Float,
    String,
    List,
}

impl fmt::Display for StoreValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreValueKind::Bool => "bool",
            StoreValueKind::Int => "int",
            StoreValueKind::Float => "float",
            StoreValueKind::String => "string",
            StoreValueKind::List => "list",
        })
    }
}

/// An untyped store value.
///
/// Equality is deep: lists compare element kind and every item in order.
/// A NaN float equals any other NaN, so an unchanged NaN option is not
/// rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreValue {
    Bool { value: bool },
    Int { value: i32 },
    Float { value: f64 },
    String { value: String },
    List {
        element: StoreValueKind,
        items: Vec<StoreValue>,
    },
}

impl PartialEq for StoreValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StoreValue::Bool { value: a }, StoreValue::Bool { value: b }) => a == b,
            (StoreValue::Int { value: a }, StoreValue::Int { value: b }) => a == b,
            (StoreValue::Float { value: a }, StoreValue::Float { value: b }) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (StoreValue::String { value: a }, StoreValue::String { value: b }) => a == b,
            (
                StoreValue::List {
                    element: a,
                    items: left,
                },
                StoreValue::List {
                    element: b,
                    items: right,
                },
            ) => a == b && left == right,
            _ => false,
        }
    }
}

impl StoreValue {
    pub fn bool(value: bool) -> Self {
        StoreValue::Bool { value }
    }

    pub fn int(value: i32) -> Self {
        StoreValue::Int { value }
    }

    pub fn float(value: f64) -> Self {
        StoreValue::Float { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        StoreValue::String {
            value: value.into(),
        }
    }

    /// Builds a list, rejecting nested lists and items of another kind.
    pub fn list(element: StoreValueKind, items: Vec<StoreValue>) -> StoreResult<Self> {
        if element == StoreValueKind::List {
            return Err(StoreError::InvalidList("lists cannot nest".to_string()));
        }
        if let Some(item) = items.iter().find(|item| item.kind() != element) {
            return Err(StoreError::InvalidList(format!(
                "expected {element} items, found {}",
                item.kind()
            )));
        }
        Ok(StoreValue::List { element, items })
    }

    /// Shorthand for a list of strings.
    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StoreValue::List {
            element: StoreValueKind::String,
            items: items.into_iter().map(StoreValue::string).collect(),
        }
    }

    pub fn kind(&self) -> StoreValueKind {
        match self {
            StoreValue::Bool { .. } => StoreValueKind::Bool,
            StoreValue::Int { .. } => StoreValueKind::Int,
            StoreValue::Float { .. } => StoreValueKind::Float,
            StoreValue::String { .. } => StoreValueKind::String,
            StoreValue::List { .. } => StoreValueKind::List,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoreValue::Bool { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            StoreValue::Int { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            StoreValue::Float { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoreValue::String { value } => Some(value),
            _ => None,
        }
    }

    /// Returns the element kind and items of a list.
    pub fn as_list(&self) -> Option<(StoreValueKind, &[StoreValue])> {
        match self {
            StoreValue::List { element, items } => Some((*element, items)),
            _ => None,
        }
    }
}
