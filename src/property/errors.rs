//! Error types for property descriptors and the property map codec.
//!
//! Three failure families live here:
//!
//! - [`DecodeError`]: the input bytes do not follow the object grammar, or an
//!   entry's value is not a valid property descriptor
//! - [`PropertyError`]: a JSON value does not describe a [`Property`](super::Property)
//! - [`ValidationError`]: a candidate value violates a property's constraints
//!
//! Absence (`get` or `pop` on a missing name) is not an error and has no
//! variant here.

use std::fmt;

use thiserror::Error;

use super::PropertyType;

/// The structural token the decoder was waiting for when it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expected {
    /// The opening `{` of the top-level object.
    ObjectOpen,
    /// A quoted string key.
    Key,
    /// The `:` separating a key from its value.
    Colon,
    /// A property value.
    Value,
    /// A `,` before the next entry or the closing `}`.
    CommaOrObjectClose,
    /// Nothing: the document must end after the closing `}`.
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectOpen => write!(f, "'{{'"),
            Self::Key => write!(f, "string key"),
            Self::Colon => write!(f, "':'"),
            Self::Value => write!(f, "value"),
            Self::CommaOrObjectClose => write!(f, "',' or '}}'"),
            Self::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// What the decoder actually saw in place of the expected token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Found {
    /// A byte, rendered as a character when printable.
    Byte(u8),
    /// The input ran out.
    EndOfInput,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte(b) if b.is_ascii_graphic() => write!(f, "'{}'", char::from(*b)),
            Self::Byte(b) => write!(f, "byte 0x{b:02x}"),
            Self::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// Error returned when decoding an ordered or unordered property map fails.
///
/// A failed decode never leaves a partially filled map behind: the target map
/// keeps its previous contents.
///
/// # Example
///
/// ```rust
/// use automation_provider::property::{DecodeError, Expected, OrderedPropertyMap, PropertyMap};
///
/// let mut map = OrderedPropertyMap::new();
/// let err = map.decode(br#"["not", "an", "object"]"#).unwrap_err();
/// assert_eq!(err.expected(), Some(Expected::ObjectOpen));
/// assert!(matches!(err, DecodeError::Unexpected { offset: 0, .. }));
/// ```
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A structural token other than the expected one was found.
    #[error("expected {expected} at offset {offset}, found {found}")]
    Unexpected {
        /// The token the grammar requires at this point.
        expected: Expected,
        /// What was there instead.
        found: Found,
        /// Byte offset into the input.
        offset: usize,
    },

    /// A key or value started correctly but is not well-formed JSON.
    #[error("malformed {expected} at offset {offset}: {source}")]
    Malformed {
        /// Whether a key or a value was being read.
        expected: Expected,
        /// Byte offset where the key or value starts.
        offset: usize,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Entry names must be non-empty.
    #[error("empty property name at offset {offset}")]
    EmptyKey {
        /// Byte offset of the key.
        offset: usize,
    },

    /// The value parsed as JSON but does not describe a property.
    #[error("invalid property '{name}': {source}")]
    InvalidProperty {
        /// The entry name the value belongs to.
        name: String,
        /// Why the value was rejected.
        #[source]
        source: PropertyError,
    },
}

impl DecodeError {
    /// Returns the structural expectation that failed, if the error is structural.
    #[must_use]
    pub const fn expected(&self) -> Option<Expected> {
        match self {
            Self::Unexpected { expected, .. } | Self::Malformed { expected, .. } => {
                Some(*expected)
            }
            Self::EmptyKey { .. } => Some(Expected::Key),
            Self::InvalidProperty { .. } => None,
        }
    }

    /// Returns the byte offset of the failure, if known.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::Unexpected { offset, .. }
            | Self::Malformed { offset, .. }
            | Self::EmptyKey { offset } => Some(*offset),
            Self::InvalidProperty { .. } => None,
        }
    }
}

/// Error returned when a JSON value cannot be read as a property descriptor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The descriptor is not a JSON object.
    #[error("property descriptor must be an object, found {found}")]
    NotAnObject {
        /// The JSON kind that was found.
        found: &'static str,
    },

    /// Neither `type` nor `$ref` is present.
    #[error("property descriptor has neither 'type' nor '$ref'")]
    MissingType,

    /// `type` names no known property type.
    #[error("unknown property type '{found}'")]
    UnknownType {
        /// The unrecognised type tag.
        found: String,
    },

    /// A known field holds the wrong kind of JSON value.
    #[error("field '{field}' must be {expected}")]
    InvalidField {
        /// The wire name of the field.
        field: &'static str,
        /// A description of the accepted shape.
        expected: &'static str,
    },

    /// An entry under `properties` has an empty name.
    #[error("nested property names must be non-empty")]
    EmptyName,
}

/// Error returned when a value does not satisfy a property's constraints.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The value's JSON kind does not match the declared type.
    #[error("expected {expected} value, found {found}")]
    TypeMismatch {
        /// The declared property type.
        expected: PropertyType,
        /// The JSON kind of the value.
        found: &'static str,
    },

    /// A number is below `minimum`.
    #[error("{value} is less than the minimum of {minimum}")]
    BelowMinimum {
        /// The offending value.
        value: serde_json::Number,
        /// The declared bound.
        minimum: serde_json::Number,
    },

    /// A number is above `maximum`.
    #[error("{value} is greater than the maximum of {maximum}")]
    AboveMaximum {
        /// The offending value.
        value: serde_json::Number,
        /// The declared bound.
        maximum: serde_json::Number,
    },

    /// A string or array is shorter than allowed.
    #[error("length {length} is less than the minimum of {minimum}")]
    TooShort {
        /// Character or item count of the value.
        length: u64,
        /// The declared bound.
        minimum: u64,
    },

    /// A string or array is longer than allowed.
    #[error("length {length} is greater than the maximum of {maximum}")]
    TooLong {
        /// Character or item count of the value.
        length: u64,
        /// The declared bound.
        maximum: u64,
    },

    /// A string does not match `pattern`.
    #[error("'{value}' does not match pattern '{pattern}'")]
    PatternMismatch {
        /// The offending value.
        value: String,
        /// The declared pattern.
        pattern: String,
    },

    /// The declared `pattern` is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The declared pattern.
        pattern: String,
        /// The compile error.
        #[source]
        source: regex::Error,
    },

    /// The value is not one of the enumerated values.
    #[error("{value} is not one of the allowed values")]
    NotAllowed {
        /// The offending value, rendered as JSON.
        value: String,
    },

    /// An object lacks a name listed in `required`.
    #[error("missing required property '{name}'")]
    MissingRequired {
        /// The missing name.
        name: String,
    },

    /// A nested element failed validation.
    #[error("{path}: {source}")]
    Nested {
        /// The element's position: an array index or a property name.
        path: String,
        /// The nested failure.
        #[source]
        source: Box<ValidationError>,
    },
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DecodeError>();
    assert_send_sync::<PropertyError>();
    assert_send_sync::<ValidationError>();
};
