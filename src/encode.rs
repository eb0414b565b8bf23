//! Wire-format envelope encoding.
//!
//! The outbound payload is a JSON array; each element is an object with two
//! fields, `"meaning"` and `"value"`. Array order is significant to
//! downstream consumers: primary readings come first, in schema order, with
//! diagnostics appended last. The serialized payload must fit a fixed
//! capacity (512 bytes by default, matching the publish buffer of the target
//! radio stack).
//!
//! Two conditions fail loudly instead of producing a corrupt buffer:
//!
//! - a payload that would exceed capacity returns
//!   [`EncodeError::BufferOverflow`] and nothing is published;
//! - an empty meaning or a non-finite float returns
//!   [`EncodeError::InvalidArgument`] naming the offending slot.
//!
//! Integer values are narrowed to 16 bits with wrapping semantics. The
//! truncation is intentional and unchecked: device telemetry uses 16-bit
//! precision on the wire even though internal computation is wider, and
//! callers pre-scale.
//!
//! # Example
//!
//! ```rust
//! use sensor_bridge::{encode, TypedValue, DEFAULT_CAPACITY};
//!
//! let readings = [
//!     TypedValue::float("temperature", 21.5),
//!     TypedValue::uint("battery", 87),
//! ];
//! let envelope = encode(&readings, None, DEFAULT_CAPACITY).unwrap();
//! assert_eq!(
//!     envelope.as_str(),
//!     r#"[{"meaning":"temperature","value":21.5},{"meaning":"battery","value":87}]"#
//! );
//! ```

use core::fmt;

use serde_json::json;

use crate::value::{TypedValue, Value};

/// Default publish buffer capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 512;

// ============================================================================
// Envelope
// ============================================================================

/// A serialized telemetry payload, ready to hand to the transport.
///
/// Wraps the JSON array text; the object order is exactly the order the
/// values were encoded in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    payload: String,
    objects: usize,
}

impl Envelope {
    /// The payload as UTF-8 text.
    pub fn as_str(&self) -> &str {
        &self.payload
    }

    /// The payload as bytes, for the transport boundary.
    pub fn as_bytes(&self) -> &[u8] {
        self.payload.as_bytes()
    }

    /// Serialized size in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty (never true for a serialized array).
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Number of objects in the array.
    pub fn object_count(&self) -> usize {
        self.objects
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Serialize readings plus optional diagnostics into an [`Envelope`].
///
/// Order of objects in the output exactly matches the input order, with
/// diagnostics appended after primary readings. The serialized text must fit
/// within `capacity` bytes or the call fails with
/// [`EncodeError::BufferOverflow`].
pub fn encode(
    readings: &[TypedValue],
    diagnostics: Option<&[TypedValue]>,
    capacity: usize,
) -> Result<Envelope, EncodeError> {
    let diagnostics = diagnostics.unwrap_or(&[]);
    let mut objects = Vec::with_capacity(readings.len() + diagnostics.len());

    for (slot, tv) in readings.iter().chain(diagnostics).enumerate() {
        objects.push(encode_one(slot, tv)?);
    }

    let count = objects.len();
    // serde_json only fails on non-string map keys or Serialize impls that
    // error; neither can happen for a Vec of prebuilt values.
    let payload = serde_json::to_string(&objects)
        .map_err(|e| EncodeError::InvalidArgument {
            slot: 0,
            reason: e.to_string(),
        })?;

    if payload.len() > capacity {
        return Err(EncodeError::BufferOverflow {
            needed: payload.len(),
            capacity,
        });
    }

    Ok(Envelope {
        payload,
        objects: count,
    })
}

/// Encode one typed value as a `{"meaning": ..., "value": ...}` object.
fn encode_one(slot: usize, tv: &TypedValue) -> Result<serde_json::Value, EncodeError> {
    if tv.meaning.is_empty() {
        return Err(EncodeError::InvalidArgument {
            slot,
            reason: "empty meaning".into(),
        });
    }

    let value = match &tv.value {
        // 16-bit narrowing with wrapping, unchecked by design.
        Value::Int(v) => json!(*v as i16),
        Value::Uint(v) => json!(*v as u16),
        Value::Float(v) => {
            if !v.is_finite() {
                return Err(EncodeError::InvalidArgument {
                    slot,
                    reason: "non-finite float".into(),
                });
            }
            json!(*v)
        }
        Value::Str(s) => json!(s),
        Value::Bool(b) => json!(b),
    };

    Ok(json!({ "meaning": tv.meaning, "value": value }))
}

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by [`encode`].
///
/// Both are local and recoverable: the caller decides whether to drop the
/// cycle, shrink the payload, or alert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// A field was malformed; names the offending slot (primary readings
    /// first, diagnostics continuing the count).
    InvalidArgument {
        /// Index of the offending value in encode order.
        slot: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// The serialized payload would not fit the publish buffer. Nothing was
    /// truncated; the envelope is simply not produced.
    BufferOverflow {
        /// Bytes the payload needs.
        needed: usize,
        /// Bytes the buffer holds.
        capacity: usize,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { slot, reason } => {
                write!(f, "invalid encode argument at slot {}: {}", slot, reason)
            }
            Self::BufferOverflow { needed, capacity } => {
                write!(
                    f,
                    "encoded payload needs {} bytes but buffer capacity is {}",
                    needed, capacity
                )
            }
        }
    }
}

impl std::error::Error for EncodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_readings() -> Vec<TypedValue> {
        vec![
            TypedValue::float("temperature", 21.5),
            TypedValue::float("humidity", 40.25),
            TypedValue::uint("battery", 87),
        ]
    }

    // =========================================================================
    // Wire format
    // =========================================================================

    #[test]
    fn envelope_is_an_ordered_array_of_meaning_value_objects() {
        let envelope = encode(&three_readings(), None, DEFAULT_CAPACITY).unwrap();
        assert_eq!(
            envelope.as_str(),
            r#"[{"meaning":"temperature","value":21.5},{"meaning":"humidity","value":40.25},{"meaning":"battery","value":87}]"#
        );
        assert_eq!(envelope.object_count(), 3);
    }

    #[test]
    fn diagnostics_are_appended_after_primary_readings() {
        let diag = [
            TypedValue::uint("counter", 4),
            TypedValue::int("rssi", -67),
        ];
        let envelope = encode(&three_readings(), Some(&diag), DEFAULT_CAPACITY).unwrap();
        assert_eq!(envelope.object_count(), 5);

        let parsed: Vec<serde_json::Value> = serde_json::from_str(envelope.as_str()).unwrap();
        let meanings: Vec<_> = parsed.iter().map(|o| o["meaning"].as_str().unwrap()).collect();
        assert_eq!(
            meanings,
            ["temperature", "humidity", "battery", "counter", "rssi"]
        );
    }

    #[test]
    fn bool_encodes_as_json_literal() {
        let readings = [TypedValue::bool("charging", true)];
        let envelope = encode(&readings, None, DEFAULT_CAPACITY).unwrap();
        assert_eq!(envelope.as_str(), r#"[{"meaning":"charging","value":true}]"#);
    }

    #[test]
    fn string_is_copied_verbatim() {
        // The whole string, not just its first character.
        let readings = [TypedValue::string("firmware", "1.2.0-rc3")];
        let envelope = encode(&readings, None, DEFAULT_CAPACITY).unwrap();
        assert_eq!(
            envelope.as_str(),
            r#"[{"meaning":"firmware","value":"1.2.0-rc3"}]"#
        );
    }

    #[test]
    fn empty_input_encodes_as_empty_array() {
        let envelope = encode(&[], None, DEFAULT_CAPACITY).unwrap();
        assert_eq!(envelope.as_str(), "[]");
        assert_eq!(envelope.object_count(), 0);
    }

    // =========================================================================
    // 16-bit narrowing
    // =========================================================================

    #[test]
    fn int_narrows_to_i16_with_wraparound() {
        let readings = [TypedValue::int("raw", 70_000)];
        let envelope = encode(&readings, None, DEFAULT_CAPACITY).unwrap();
        // 70_000 as i16 == 4464
        assert_eq!(envelope.as_str(), r#"[{"meaning":"raw","value":4464}]"#);
    }

    #[test]
    fn uint_narrows_to_u16_with_wraparound() {
        let readings = [TypedValue::uint("raw", 70_000)];
        let envelope = encode(&readings, None, DEFAULT_CAPACITY).unwrap();
        // 70_000 as u16 == 4464
        assert_eq!(envelope.as_str(), r#"[{"meaning":"raw","value":4464}]"#);
    }

    #[test]
    fn negative_int_survives_narrowing() {
        let readings = [TypedValue::int("rssi", -67)];
        let envelope = encode(&readings, None, DEFAULT_CAPACITY).unwrap();
        assert_eq!(envelope.as_str(), r#"[{"meaning":"rssi","value":-67}]"#);
    }

    // =========================================================================
    // Invalid arguments
    // =========================================================================

    #[test]
    fn empty_meaning_is_rejected_with_slot_index() {
        let readings = [
            TypedValue::float("temperature", 21.5),
            TypedValue::float("", 40.0),
        ];
        let err = encode(&readings, None, DEFAULT_CAPACITY).unwrap_err();
        assert_eq!(
            err,
            EncodeError::InvalidArgument {
                slot: 1,
                reason: "empty meaning".into()
            }
        );
    }

    #[test]
    fn empty_diagnostic_meaning_counts_past_primary_slots() {
        let diag = [TypedValue::uint("", 1)];
        let err = encode(&three_readings(), Some(&diag), DEFAULT_CAPACITY).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidArgument { slot: 3, .. }));
    }

    #[test]
    fn non_finite_float_is_rejected() {
        let readings = [TypedValue::float("temperature", f64::NAN)];
        let err = encode(&readings, None, DEFAULT_CAPACITY).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidArgument { slot: 0, .. }));
    }

    // =========================================================================
    // Capacity
    // =========================================================================

    #[test]
    fn tiny_capacity_reports_overflow_not_truncation() {
        let err = encode(&three_readings(), None, 4).unwrap_err();
        match err {
            EncodeError::BufferOverflow { needed, capacity } => {
                assert_eq!(capacity, 4);
                assert!(needed > 4);
            }
            other => panic!("expected BufferOverflow, got {:?}", other),
        }
    }

    #[test]
    fn payload_exactly_at_capacity_fits() {
        let readings = [TypedValue::bool("on", true)];
        let exact = encode(&readings, None, DEFAULT_CAPACITY).unwrap().len();

        assert!(encode(&readings, None, exact).is_ok());
        assert!(encode(&readings, None, exact - 1).is_err());
    }

    #[test]
    fn error_display_mentions_capacity() {
        let err = EncodeError::BufferOverflow {
            needed: 97,
            capacity: 64,
        };
        let display = err.to_string();
        assert!(display.contains("97"));
        assert!(display.contains("64"));
    }
}
