// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Topic pattern matching: `+` matches exactly one level, `#` matches
//! the remainder of the topic and must be the pattern's last segment.

pub fn matches(pattern: &str, topic: &str) -> bool {
    let p: Vec<&str> = pattern.split('/').collect();
    let t: Vec<&str> = topic.split('/').collect();
    matches_segments(&p, &t)
}

fn matches_segments(pattern: &[&str], topic: &[&str]) -> bool {
    match (pattern.split_first(), topic.split_first()) {
        (Some((&"#", _)), _) => true,
        (Some((&"+", prest)), Some((_, trest))) => matches_segments(prest, trest),
        (Some((p, prest)), Some((t, trest))) if *p == *t => matches_segments(prest, trest),
        (Some(_), _) => false,
        (None, Some(_)) => false,
        (None, None) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_level_wildcard() {
        assert!(matches(
            "hvac/room/room_A1/device/+/telemetry/+",
            "hvac/room/room_A1/device/monitor/telemetry/humidity"
        ));
        assert!(!matches(
            "hvac/room/room_A1/device/+/telemetry/+",
            "hvac/room/room_A1/rack/rack_A1/device/monitor/telemetry/humidity"
        ));
    }

    #[test]
    fn rack_scoped_pattern() {
        assert!(matches(
            "hvac/room/room_A1/rack/+/device/+/telemetry/+",
            "hvac/room/room_A1/rack/rack_A1/device/rack_cooling_unit/telemetry/rack_cooling_unit_temp"
        ));
    }

    #[test]
    fn multi_level_wildcard_matches_rest() {
        assert!(matches("hvac/room/room_A1/#", "hvac/room/room_A1/device/x/telemetry/y"));
        assert!(matches("hvac/room/room_A1/#", "hvac/room/room_A1"));
    }

    #[test]
    fn literal_mismatch_fails() {
        assert!(!matches(
            "hvac/room/room_A1/device/+/telemetry/+",
            "hvac/room/room_B1/device/monitor/telemetry/humidity"
        ));
    }

    #[test]
    fn shorter_topic_does_not_match_longer_pattern() {
        assert!(!matches("hvac/room/+/device/+", "hvac/room/room_A1"));
    }
}
