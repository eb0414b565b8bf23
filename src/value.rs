//! Typed sensor and diagnostic values.
//!
//! Every reading that crosses the wire is a [`TypedValue`]: a semantic
//! `meaning` label (e.g. `"temperature"`, `"counter"`, `"rssi"`) paired with
//! a [`Value`]. The value is a proper sum type, so the runtime tag and the
//! stored payload cannot disagree: there is no way to construct an `Int`
//! that holds a string.
//!
//! # Kind Set
//!
//! The kind set is closed: `{Int, Uint, Float, Str, Bool}`. Encoder and
//! decoder are exhaustive over it; anything outside the set is rejected at
//! the decode boundary.
//!
//! # Example
//!
//! ```rust
//! use sensor_bridge::{TypedValue, Value, ValueKind};
//!
//! let reading = TypedValue::float("temperature", 21.5);
//! assert_eq!(reading.kind(), ValueKind::Float);
//! assert_eq!(reading.value, Value::Float(21.5));
//! ```

use core::fmt;

// ============================================================================
// Value Kinds
// ============================================================================

/// Runtime type tag of a [`Value`].
///
/// Derived from the active variant, never stored separately. The set is
/// closed and exhaustive; `match` on it catches any future extension at
/// compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Signed integer, narrowed to 16 bits on the wire.
    Int,
    /// Unsigned integer, narrowed to 16 bits on the wire.
    Uint,
    /// Floating point number.
    Float,
    /// UTF-8 string, copied verbatim onto the wire.
    Str,
    /// Boolean.
    Bool,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Uint => "uint",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Values
// ============================================================================

/// One scalar value with exactly one active representation.
///
/// Internal widths are wider than the 16-bit wire representation for `Int`
/// and `Uint`; the encoder narrows with wrapping semantics (callers
/// pre-scale).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Boolean.
    Bool(bool),
}

impl Value {
    /// The runtime tag of the active representation.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Bool(_) => ValueKind::Bool,
        }
    }
}

// ============================================================================
// Typed Values
// ============================================================================

/// One labeled measurement: a semantic `meaning` plus its [`Value`].
///
/// `meaning` must be non-empty; the encoder rejects empty meanings with an
/// explicit error rather than skipping the field.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedValue {
    /// Semantic role of the reading, e.g. `"temperature"` or `"rssi"`.
    pub meaning: String,
    /// The reading itself.
    pub value: Value,
}

impl TypedValue {
    /// Create a typed value from an already-constructed [`Value`].
    pub fn new(meaning: impl Into<String>, value: Value) -> Self {
        Self {
            meaning: meaning.into(),
            value,
        }
    }

    /// Create a signed integer reading.
    pub fn int(meaning: impl Into<String>, value: i64) -> Self {
        Self::new(meaning, Value::Int(value))
    }

    /// Create an unsigned integer reading.
    pub fn uint(meaning: impl Into<String>, value: u64) -> Self {
        Self::new(meaning, Value::Uint(value))
    }

    /// Create a floating point reading.
    pub fn float(meaning: impl Into<String>, value: f64) -> Self {
        Self::new(meaning, Value::Float(value))
    }

    /// Create a string reading.
    pub fn string(meaning: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(meaning, Value::Str(value.into()))
    }

    /// Create a boolean reading.
    pub fn bool(meaning: impl Into<String>, value: bool) -> Self {
        Self::new(meaning, Value::Bool(value))
    }

    /// The runtime tag of the stored value.
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }
}
