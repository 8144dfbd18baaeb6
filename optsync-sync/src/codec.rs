//! Translation between typed option values and store variants.
//!
//! | option type           | store kind                    |
//! |-----------------------|-------------------------------|
//! | bool, bell            | bool                          |
//! | int                   | int                           |
//! | float                 | float                         |
//! | string, match         | string                        |
//! | color                 | string `#rrggbbaa`            |
//! | key, button           | string such as `<Alt>F1`      |
//! | edge                  | string such as `Left \| Top`  |
//! | list of T             | list of T's kind              |
//!
//! Decoding is strict on the variant kind: a float option never accepts a
//! string variant.

use crate::error::{DecodeFailure, DecodeResult};
use optsync_store::{StoreValue, StoreValueKind};
use optsync_types::{
    ButtonBinding, Color, EdgeMask, KeyBinding, KeyResolver, MatchExpr, OptionDescriptor,
    OptionType, OptionValue, ValueList,
};

/// Store kind an option type is written as.
pub fn store_kind_for(option_type: OptionType) -> StoreValueKind {
    match option_type {
        OptionType::Bool | OptionType::Bell => StoreValueKind::Bool,
        OptionType::Int => StoreValueKind::Int,
        OptionType::Float => StoreValueKind::Float,
        OptionType::String
        | OptionType::Color
        | OptionType::Key
        | OptionType::Button
        | OptionType::Edge
        | OptionType::Match => StoreValueKind::String,
        OptionType::List => StoreValueKind::List,
    }
}

/// Encodes an option value.
///
/// Returns `None` for a key or button binding when no resolver is given,
/// and for a list containing such a binding.
pub fn encode_value(value: &OptionValue, resolver: Option<&dyn KeyResolver>) -> Option<StoreValue> {
    let encoded = match value {
        OptionValue::Bool(b) | OptionValue::Bell(b) => StoreValue::bool(*b),
        OptionValue::Int(i) => StoreValue::int(*i),
        OptionValue::Float(f) => StoreValue::float(f64::from(*f)),
        OptionValue::String(s) => StoreValue::string(s.as_str()),
        OptionValue::Color(c) => StoreValue::string(c.to_string()),
        OptionValue::Key(k) => StoreValue::string(k.format(resolver?)),
        OptionValue::Button(b) => {
            if resolver.is_none() {
                return None;
            }
            StoreValue::string(b.format())
        }
        OptionValue::Edge(e) => StoreValue::string(e.to_string()),
        OptionValue::Match(m) => StoreValue::string(m.to_string()),
        OptionValue::List(list) => {
            let items = list
                .items()
                .iter()
                .map(|item| encode_value(item, resolver))
                .collect::<Option<Vec<_>>>()?;
            StoreValue::list(store_kind_for(list.element_type()), items).ok()?
        }
    };
    Some(encoded)
}

/// Decodes a scalar option value.
///
/// List types carry an element type this function does not know; they go
/// through [`decode_list`] and are reported as malformed here.
pub fn decode_value(
    option_type: OptionType,
    value: &StoreValue,
    resolver: Option<&dyn KeyResolver>,
) -> DecodeResult<OptionValue> {
    let expected = store_kind_for(option_type);
    let mismatch = || DecodeFailure::TypeMismatch {
        option_type,
        expected,
        found: value.kind(),
    };

    let decoded = match option_type {
        OptionType::Bool => OptionValue::Bool(value.as_bool().ok_or_else(mismatch)?),
        OptionType::Bell => OptionValue::Bell(value.as_bool().ok_or_else(mismatch)?),
        OptionType::Int => OptionValue::Int(value.as_int().ok_or_else(mismatch)?),
        OptionType::Float => OptionValue::Float(value.as_float().ok_or_else(mismatch)? as f32),
        OptionType::String => OptionValue::String(value.as_str().ok_or_else(mismatch)?.to_string()),
        OptionType::Color => {
            let s = value.as_str().ok_or_else(mismatch)?;
            let color = s.parse::<Color>().map_err(|_| DecodeFailure::InvalidContent {
                option_type,
                content: s.to_string(),
            })?;
            OptionValue::Color(color)
        }
        OptionType::Key => {
            let s = value.as_str().ok_or_else(mismatch)?;
            let resolver = resolver.ok_or(DecodeFailure::MissingDisplay)?;
            OptionValue::Key(KeyBinding::parse(s, resolver))
        }
        OptionType::Button => {
            let s = value.as_str().ok_or_else(mismatch)?;
            if resolver.is_none() {
                return Err(DecodeFailure::MissingDisplay);
            }
            OptionValue::Button(ButtonBinding::parse(s))
        }
        OptionType::Edge => {
            let s = value.as_str().ok_or_else(mismatch)?;
            OptionValue::Edge(s.parse::<EdgeMask>().unwrap_or_else(|never| match never {}))
        }
        OptionType::Match => OptionValue::Match(MatchExpr::parse(value.as_str().ok_or_else(mismatch)?)),
        OptionType::List => {
            return Err(DecodeFailure::MalformedList(
                "list options need a declared element type".to_string(),
            ));
        }
    };
    Ok(decoded)
}

/// Decodes a list whose elements must be `element_type`.
///
/// Fails as a whole if the stored element kind differs or any element fails.
pub fn decode_list(
    element_type: OptionType,
    value: &StoreValue,
    resolver: Option<&dyn KeyResolver>,
) -> DecodeResult<ValueList> {
    let Some((kind, items)) = value.as_list() else {
        return Err(DecodeFailure::TypeMismatch {
            option_type: OptionType::List,
            expected: StoreValueKind::List,
            found: value.kind(),
        });
    };

    let expected = store_kind_for(element_type);
    if kind != expected {
        return Err(DecodeFailure::MalformedList(format!(
            "{element_type} list stored with {kind} elements"
        )));
    }

    let values = items
        .iter()
        .map(|item| decode_value(element_type, item, resolver))
        .collect::<DecodeResult<Vec<_>>>()?;
    ValueList::from_values(element_type, values)
        .map_err(|e| DecodeFailure::MalformedList(e.to_string()))
}

/// Decodes a stored entry value against an option descriptor.
pub fn decode_option(
    descriptor: &OptionDescriptor,
    value: Option<&StoreValue>,
    resolver: Option<&dyn KeyResolver>,
) -> DecodeResult<OptionValue> {
    let value = value.ok_or(DecodeFailure::NoValue)?;
    match descriptor.list_type() {
        Some(element_type) => decode_list(element_type, value, resolver).map(OptionValue::List),
        None => decode_value(descriptor.option_type(), value, resolver),
    }
}
