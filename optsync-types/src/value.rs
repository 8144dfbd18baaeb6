//! Option types, values and descriptors.

use crate::{ButtonBinding, Color, EdgeMask, Error, KeyBinding, MatchExpr, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of an option, or of the elements of a list option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    Bool,
    Int,
    Float,
    String,
    Color,
    Key,
    Button,
    Edge,
    Bell,
    Match,
    List,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Bool => "bool",
            OptionType::Int => "int",
            OptionType::Float => "float",
            OptionType::String => "string",
            OptionType::Color => "color",
            OptionType::Key => "key",
            OptionType::Button => "button",
            OptionType::Edge => "edge",
            OptionType::Bell => "bell",
            OptionType::Match => "match",
            OptionType::List => "list",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OptionValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    Color(Color),
    Key(KeyBinding),
    Button(ButtonBinding),
    Edge(EdgeMask),
    Bell(bool),
    Match(MatchExpr),
    List(ValueList),
}

impl OptionValue {
    pub fn option_type(&self) -> OptionType {
        match self {
            OptionValue::Bool(_) => OptionType::Bool,
            OptionValue::Int(_) => OptionType::Int,
            OptionValue::Float(_) => OptionType::Float,
            OptionValue::String(_) => OptionType::String,
            OptionValue::Color(_) => OptionType::Color,
            OptionValue::Key(_) => OptionType::Key,
            OptionValue::Button(_) => OptionType::Button,
            OptionValue::Edge(_) => OptionType::Edge,
            OptionValue::Bell(_) => OptionType::Bell,
            OptionValue::Match(_) => OptionType::Match,
            OptionValue::List(_) => OptionType::List,
        }
    }

    pub fn as_list(&self) -> Option<&ValueList> {
        match self {
            OptionValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Shorthand for a list of strings.
    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OptionValue::List(ValueList {
            element_type: OptionType::String,
            items: items
                .into_iter()
                .map(|s| OptionValue::String(s.into()))
                .collect(),
        })
    }
}

/// A homogeneous list of option values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueList {
    element_type: OptionType,
    items: Vec<OptionValue>,
}

impl ValueList {
    /// Creates an empty list of the given element type.
    pub fn new(element_type: OptionType) -> Result<Self> {
        if element_type == OptionType::List {
            return Err(Error::NestedList);
        }
        Ok(Self {
            element_type,
            items: Vec::new(),
        })
    }

    /// Creates a list, checking every element against `element_type`.
    pub fn from_values(element_type: OptionType, items: Vec<OptionValue>) -> Result<Self> {
        let mut list = Self::new(element_type)?;
        for item in items {
            list.push(item)?;
        }
        Ok(list)
    }

    pub fn push(&mut self, item: OptionValue) -> Result<()> {
        let found = item.option_type();
        if found != self.element_type {
            return Err(Error::ListElementType {
                expected: self.element_type,
                found,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn element_type(&self) -> OptionType {
        self.element_type
    }

    pub fn items(&self) -> &[OptionValue] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One named option of one plugin on one object, with its current value.
///
/// The descriptor's type (and a list's element type) is fixed by the value it
/// was created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    pub name: String,
    pub value: OptionValue,
}

impl OptionDescriptor {
    pub fn new(name: impl Into<String>, value: OptionValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn option_type(&self) -> OptionType {
        self.value.option_type()
    }

    /// Element type for list options.
    pub fn list_type(&self) -> Option<OptionType> {
        self.value.as_list().map(ValueList::element_type)
    }
}
