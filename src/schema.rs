//! Ordered channel schema for the telemetry envelope.
//!
//! The envelope is positional: downstream consumers expect slot 0 to be the
//! first configured channel, slot 1 the second, and so on, with diagnostics
//! appended after the last primary slot. Rather than hardcoding that coupling
//! as array-index convention, the schema makes it an explicit, testable
//! structure: each [`ChannelSlot`] names its meaning, wire kind, and valid
//! range, in publish order.
//!
//! # Example
//!
//! ```rust
//! use sensor_bridge::{ChannelSchema, ValueKind};
//!
//! let schema = ChannelSchema::standard();
//! assert_eq!(schema.len(), 3);
//! assert_eq!(schema.slots()[0].meaning, "temperature");
//! assert_eq!(schema.slots()[2].kind, ValueKind::Uint);
//! ```

use core::fmt;

use crate::bounds::BoundedReading;
use crate::value::{TypedValue, Value, ValueKind};

// ============================================================================
// Channel Slots
// ============================================================================

/// One positional channel: its meaning, wire kind, and valid range.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSlot {
    /// Semantic label published with every reading from this channel.
    pub meaning: String,
    /// Wire kind the reading is encoded as.
    pub kind: ValueKind,
    /// Lower bound of the valid range (inclusive).
    pub min: f64,
    /// Upper bound of the valid range (inclusive).
    pub max: f64,
    /// Substitute used when a reading falls outside the range.
    pub default: f64,
}

impl ChannelSlot {
    /// Create a channel slot.
    pub fn new(meaning: impl Into<String>, kind: ValueKind, min: f64, max: f64, default: f64) -> Self {
        Self {
            meaning: meaning.into(),
            kind,
            min,
            max,
            default,
        }
    }

    /// Seed a [`BoundedReading`] for this channel with the given raw value.
    pub fn reading(&self, value: f64) -> BoundedReading {
        BoundedReading::new(value, self.min, self.max, self.default)
    }
}

// ============================================================================
// Channel Schema
// ============================================================================

/// The ordered set of primary channels published each telemetry cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSchema {
    slots: Vec<ChannelSlot>,
}

impl ChannelSchema {
    /// Create a schema from explicitly ordered slots.
    pub fn new(slots: Vec<ChannelSlot>) -> Self {
        Self { slots }
    }

    /// The standard three-channel layout: temperature, humidity, battery.
    pub fn standard() -> Self {
        Self::new(vec![
            ChannelSlot::new("temperature", ValueKind::Float, -40.0, 85.0, 0.0),
            ChannelSlot::new("humidity", ValueKind::Float, 0.0, 100.0, 0.0),
            ChannelSlot::new("battery", ValueKind::Uint, 0.0, 100.0, 0.0),
        ])
    }

    /// The slots in publish order.
    pub fn slots(&self) -> &[ChannelSlot] {
        &self.slots
    }

    /// Number of primary channels.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the schema has no channels.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Seed one [`BoundedReading`] per slot from raw channel values.
    ///
    /// Returns [`SlotCountMismatch`] if the number of raw values does not
    /// match the number of slots.
    pub fn readings(&self, values: &[f64]) -> Result<Vec<BoundedReading>, SlotCountMismatch> {
        if values.len() != self.slots.len() {
            return Err(SlotCountMismatch {
                expected: self.slots.len(),
                got: values.len(),
            });
        }
        Ok(self
            .slots
            .iter()
            .zip(values)
            .map(|(slot, &v)| slot.reading(v))
            .collect())
    }

    /// Pair validated readings with the slot meanings and kinds, in order.
    ///
    /// Readings are stored as floating point internally regardless of wire
    /// kind (the sensor path computes in floats); integer kinds are converted
    /// here and narrowed to 16 bits later by the encoder.
    pub fn typed_values(
        &self,
        readings: &[BoundedReading],
    ) -> Result<Vec<TypedValue>, SlotCountMismatch> {
        if readings.len() != self.slots.len() {
            return Err(SlotCountMismatch {
                expected: self.slots.len(),
                got: readings.len(),
            });
        }
        Ok(self
            .slots
            .iter()
            .zip(readings)
            .map(|(slot, reading)| {
                let value = match slot.kind {
                    ValueKind::Int => Value::Int(reading.value as i64),
                    ValueKind::Uint => Value::Uint(reading.value as u64),
                    ValueKind::Float => Value::Float(reading.value),
                    ValueKind::Bool => Value::Bool(reading.value != 0.0),
                    ValueKind::Str => Value::Str(reading.value.to_string()),
                };
                TypedValue::new(slot.meaning.clone(), value)
            })
            .collect())
    }
}

impl Default for ChannelSchema {
    fn default() -> Self {
        Self::standard()
    }
}

/// The number of readings handed in does not match the schema's slot count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotCountMismatch {
    /// Slots in the schema.
    pub expected: usize,
    /// Readings actually provided.
    pub got: usize,
}

impl fmt::Display for SlotCountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "schema has {} slots but {} readings were provided",
            self.expected, self.got
        )
    }
}

impl std::error::Error for SlotCountMismatch {}
