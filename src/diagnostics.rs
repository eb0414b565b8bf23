//! Diagnostic readings appended to the telemetry envelope.
//!
//! Two supplementary non-sensor fields travel with every publish cycle when
//! diagnostics are enabled: a monotonically incrementing publish counter and
//! the last observed radio signal strength. Both are explicit state owned by
//! whichever component performs publishing (the bridge or the MQTT service),
//! never ambient globals. The counter resets only on process restart.
//!
//! # Example
//!
//! ```rust
//! use sensor_bridge::{Diagnostics, TypedValue};
//!
//! let mut diag = Diagnostics::new();
//! diag.set_rssi(-67);
//!
//! let snapshot = diag.snapshot();
//! assert_eq!(snapshot[0], TypedValue::uint("counter", 1));
//! assert_eq!(snapshot[1], TypedValue::int("rssi", -67));
//! ```

use crate::value::TypedValue;

/// Publish counter and last radio signal strength.
///
/// Counter and RSSI are held at wider-than-wire widths; the encoder narrows
/// them to 16 bits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    counter: u64,
    rssi_dbm: i32,
}

impl Diagnostics {
    /// Fresh state: counter at zero, no signal reading yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest radio signal strength in dBm.
    pub fn set_rssi(&mut self, dbm: i32) {
        self.rssi_dbm = dbm;
    }

    /// Number of publish cycles snapshotted so far.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Last recorded signal strength in dBm.
    pub fn rssi(&self) -> i32 {
        self.rssi_dbm
    }

    /// Increment the publish counter and return the ordered diagnostic pair.
    ///
    /// Called exactly once per publish cycle; the first snapshot reports a
    /// counter of 1. Order is fixed: counter first, RSSI second.
    pub fn snapshot(&mut self) -> [TypedValue; 2] {
        self.counter += 1;
        [
            TypedValue::uint("counter", self.counter),
            TypedValue::int("rssi", i64::from(self.rssi_dbm)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn counter_increments_once_per_snapshot() {
        let mut diag = Diagnostics::new();
        assert_eq!(diag.counter(), 0);

        diag.snapshot();
        assert_eq!(diag.counter(), 1);

        diag.snapshot();
        diag.snapshot();
        assert_eq!(diag.counter(), 3);
    }

    #[test]
    fn snapshot_order_and_kinds() {
        let mut diag = Diagnostics::new();
        diag.set_rssi(-71);

        let snapshot = diag.snapshot();
        assert_eq!(snapshot[0].meaning, "counter");
        assert_eq!(snapshot[0].kind(), ValueKind::Uint);
        assert_eq!(snapshot[1].meaning, "rssi");
        assert_eq!(snapshot[1].kind(), ValueKind::Int);
    }

    #[test]
    fn rssi_defaults_to_zero_until_set() {
        let mut diag = Diagnostics::new();
        let snapshot = diag.snapshot();
        assert_eq!(snapshot[1], TypedValue::int("rssi", 0));

        diag.set_rssi(-54);
        let snapshot = diag.snapshot();
        assert_eq!(snapshot[1], TypedValue::int("rssi", -54));
    }
}
