//! Inbound payload decoding.
//!
//! Command and configuration messages arrive as a JSON object with a
//! `"name"` field and a `"value"` field. The value's kind is inferred in a
//! fixed precedence order: boolean first, then signed integer, then string.
//! Any other JSON type (float, null, array, nested object) is unsupported
//! and reported as such.
//!
//! Decoding never panics and never leaves the station degraded; a malformed
//! payload is always a recoverable local failure returned to the caller.
//! The decoded name is passed through as-is, with no whitelist; acting only
//! on recognized names is the application's job.
//!
//! # Example
//!
//! ```rust
//! use sensor_bridge::{decode, Value};
//!
//! let msg = decode(br#"{"name":"relay","value":true}"#).unwrap();
//! assert_eq!(msg.name, "relay");
//! assert_eq!(msg.value, Value::Bool(true));
//! ```

use core::fmt;

use crate::value::Value;

// ============================================================================
// Inbound Messages
// ============================================================================

/// A decoded inbound command or configuration message.
#[derive(Clone, Debug, PartialEq)]
pub struct InboundMessage {
    /// The raw `"name"` field, not validated against any whitelist.
    pub name: String,
    /// The decoded value.
    pub value: Value,
}

// ============================================================================
// Decoding
// ============================================================================

/// Parse an inbound payload into an [`InboundMessage`].
///
/// Kind inference precedence: boolean, then signed integer, then string.
pub fn decode(payload: &[u8]) -> Result<InboundMessage, DecodeError> {
    let root: serde_json::Value = serde_json::from_slice(payload)
        .map_err(|e| DecodeError::MalformedPayload(e.to_string()))?;

    let object = root
        .as_object()
        .ok_or_else(|| DecodeError::MalformedPayload("payload is not a JSON object".into()))?;

    let name = object
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| DecodeError::MalformedPayload("missing string \"name\" field".into()))?;

    let raw = object
        .get("value")
        .ok_or_else(|| DecodeError::MalformedPayload("missing \"value\" field".into()))?;

    let value = if let Some(b) = raw.as_bool() {
        Value::Bool(b)
    } else if let Some(i) = raw.as_i64() {
        Value::Int(i)
    } else if let Some(s) = raw.as_str() {
        Value::Str(s.to_owned())
    } else {
        return Err(DecodeError::UnsupportedValueType(describe(raw)));
    };

    Ok(InboundMessage {
        name: name.to_owned(),
        value,
    })
}

/// Human-readable JSON type name for error reporting.
fn describe(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".into(),
        serde_json::Value::Array(_) => "array".into(),
        serde_json::Value::Object(_) => "object".into(),
        serde_json::Value::Number(_) => "number outside signed 64-bit range".into(),
        // bool and string are handled before describe is reached
        other => format!("{:?}", other),
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by [`decode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload did not parse as the expected JSON object shape.
    MalformedPayload(String),
    /// The `"value"` field holds a JSON type outside the supported set.
    UnsupportedValueType(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPayload(reason) => write!(f, "malformed payload: {}", reason),
            Self::UnsupportedValueType(kind) => {
                write!(f, "unsupported value type: {}", kind)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    // =========================================================================
    // Kind inference precedence
    // =========================================================================

    #[test]
    fn bool_value() {
        let msg = decode(br#"{"name":"temp","value":true}"#).unwrap();
        assert_eq!(msg.name, "temp");
        assert_eq!(msg.value, Value::Bool(true));
        assert_eq!(msg.value.kind(), ValueKind::Bool);
    }

    #[test]
    fn int_value() {
        let msg = decode(br#"{"name":"interval","value":30}"#).unwrap();
        assert_eq!(msg.value, Value::Int(30));
    }

    #[test]
    fn negative_int_value() {
        let msg = decode(br#"{"name":"offset","value":-12}"#).unwrap();
        assert_eq!(msg.value, Value::Int(-12));
    }

    #[test]
    fn string_value() {
        let msg = decode(br#"{"name":"mode","value":"eco"}"#).unwrap();
        assert_eq!(msg.value, Value::Str("eco".into()));
    }

    #[test]
    fn name_is_not_whitelisted() {
        let msg = decode(br#"{"name":"anything-goes-here","value":1}"#).unwrap();
        assert_eq!(msg.name, "anything-goes-here");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let msg = decode(br#"{"name":"mode","value":"eco","ts":123}"#).unwrap();
        assert_eq!(msg.value, Value::Str("eco".into()));
    }

    // =========================================================================
    // Unsupported value types
    // =========================================================================

    #[test]
    fn float_value_is_unsupported() {
        let err = decode(br#"{"name":"temp","value":21.5}"#).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedValueType(_)));
    }

    #[test]
    fn null_value_is_unsupported() {
        let err = decode(br#"{"name":"temp","value":null}"#).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedValueType("null".into()));
    }

    #[test]
    fn array_value_is_unsupported() {
        let err = decode(br#"{"name":"temp","value":[1,2]}"#).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedValueType("array".into()));
    }

    #[test]
    fn nested_object_value_is_unsupported() {
        let err = decode(br#"{"name":"temp","value":{"x":1}}"#).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedValueType("object".into()));
    }

    #[test]
    fn unsigned_value_above_i64_range_is_unsupported() {
        let err = decode(br#"{"name":"big","value":18446744073709551615}"#).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedValueType(_)));
    }

    // =========================================================================
    // Malformed payloads
    // =========================================================================

    #[test]
    fn non_json_input() {
        let err = decode(b"not json").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));
    }

    #[test]
    fn top_level_array_is_malformed() {
        let err = decode(b"[1,2,3]").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));
    }

    #[test]
    fn missing_name_field() {
        let err = decode(br#"{"value":true}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));
    }

    #[test]
    fn non_string_name_field() {
        let err = decode(br#"{"name":5,"value":true}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));
    }

    #[test]
    fn missing_value_field() {
        let err = decode(br#"{"name":"temp"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));
    }

    #[test]
    fn empty_payload() {
        let err = decode(b"").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));
    }
}
