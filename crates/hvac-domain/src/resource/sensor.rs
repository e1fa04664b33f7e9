// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sensor state and the pure measurement step.
//!
//! Scheduling (`start_periodic`/`stop_periodic`) is owned by
//! `hvac-runtime`, which drives this module's `measure_once` on a timer
//! and forwards the result through the resource's listeners. Keeping the
//! measurement itself synchronous and side-effect-free (besides updating
//! `self`) makes it trivial to unit test in isolation.

#[derive(Debug, Clone)]
pub struct SensorState {
    pub value: f64,
    pub unit: String,
    pub timestamp_ms: i64,
    pub min: f64,
    pub max: f64,
    pub period_s: u64,
    pub precision_digits: u32,
}

impl SensorState {
    pub fn new(
        unit: impl Into<String>,
        min: f64,
        max: f64,
        period_s: u64,
        precision_digits: u32,
    ) -> Self {
        let mid = (min + max) / 2.0;
        Self {
            value: round_to(mid, precision_digits),
            unit: unit.into(),
            timestamp_ms: 0,
            min,
            max,
            period_s,
            precision_digits,
        }
    }

    /// Draw a new reading in `[min, max]`, round it, stamp it, and return
    /// the new value. `rand_unit` must yield a value in `[0.0, 1.0)`; the
    /// caller (the device runtime) supplies the RNG so this stays
    /// deterministic and unit-testable.
    pub fn measure(&mut self, rand_unit: f64, now_ms: i64) -> f64 {
        let span = self.max - self.min;
        let raw = self.min + rand_unit.clamp(0.0, 1.0) * span;
        let rounded = round_to(raw, self.precision_digits).clamp(self.min, self.max);
        self.value = rounded;
        self.timestamp_ms = now_ms;
        rounded
    }
}

fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_stays_in_range_and_rounds() {
        let mut s = SensorState::new("C", 10.0, 40.0, 60, 2);
        for i in 0..100 {
            let r = i as f64 / 100.0;
            let v = s.measure(r, 1_000);
            assert!((10.0..=40.0).contains(&v));
            let scaled = v * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn measure_clamps_out_of_unit_input() {
        let mut s = SensorState::new("C", 0.0, 10.0, 60, 0);
        assert_eq!(s.measure(-1.0, 0), 0.0);
        assert_eq!(s.measure(2.0, 0), 10.0);
    }

    #[test]
    fn measure_updates_timestamp() {
        let mut s = SensorState::new("C", 0.0, 10.0, 60, 0);
        s.measure(0.5, 4242);
        assert_eq!(s.timestamp_ms, 4242);
    }
}
