//! Per-frame side-channel metadata.
//!
//! Frames carry a small typed key/value map. The pipeline only ever reads
//! one key, [`MATRIX_PROP`], but the map is kept intact so hosts can round
//! trip their own properties through processing.

use std::collections::BTreeMap;
use std::fmt;

/// Key of the integer matrix-coefficients tag (ITU-T H.273 codes).
pub const MATRIX_PROP: &str = "_Matrix";

/// A single metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String data.
    Data(String),
}

impl PropValue {
    /// Type name for messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Data(_) => "data",
        }
    }

    /// Integer payload, if this is an integer.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Data(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        Self::Data(v.to_string())
    }
}

/// Ordered metadata map attached to a frame.
///
/// # Example
///
/// ```rust
/// use ccd_core::{FrameProps, PropValue, MATRIX_PROP};
///
/// let props = FrameProps::new().with(MATRIX_PROP, 1);
/// assert_eq!(props.get(MATRIX_PROP), Some(&PropValue::Int(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameProps {
    map: BTreeMap<String, PropValue>,
}

impl FrameProps {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.map.insert(key.into(), value.into());
    }

    /// Looks a value up.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.map.get(key)
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.map.remove(key)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }
}
