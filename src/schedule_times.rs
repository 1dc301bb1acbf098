//! Schedule-time transport through the shared note field.
//!
//! The portal's item record has a single free-text `note` column and no
//! structured column for per-dose administration times, so the times ride
//! inside the note: the human text, one space, then a marker token
//! immediately followed by a compact JSON payload. Other portal consumers
//! parse the same field, so the encoding is byte-stable — do not "improve"
//! it. Every other module goes through this one; nothing else is allowed
//! to understand the marker.
//!
//! When the portal responds with a structured `scheduleTimes` array next
//! to the note, that array wins and the note is only stripped for display
//! (see `requests`). Note-parsing is the fallback, not the preference.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Marker token; the JSON payload follows with no separator.
pub const TIME_MARKER: &str = "scheduleTimeJson:";

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)scheduleTimeJson:(.*)$").expect("marker regex"));

/// The embedded payload. Kept as its own struct so the wire spelling
/// (`{"scheduleTimes":[…]}`) is pinned by serde, not by string assembly.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchedulePayload {
    schedule_times: Vec<String>,
}

/// Result of splitting a note back into its two channels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedNote {
    /// The human-authored text, marker and payload stripped, trimmed.
    pub human_note: String,
    /// Embedded times; empty when absent or unreadable.
    pub schedule_times: Vec<String>,
}

/// Append the schedule times to a human note for storage.
///
/// The human text is trimmed first; an empty note yields just the
/// marker+payload with no leading separator.
pub fn encode(note: Option<&str>, times: &[String]) -> String {
    let payload = SchedulePayload {
        schedule_times: times.to_vec(),
    };
    // Vec<String> → compact JSON cannot fail.
    let json = serde_json::to_string(&payload).expect("schedule payload serializes");

    let trimmed = note.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        format!("{TIME_MARKER}{json}")
    } else {
        format!("{trimmed} {TIME_MARKER}{json}")
    }
}

/// Split a stored note into human text and embedded times.
///
/// Never fails: a malformed payload degrades to an empty time list with
/// the marker-and-payload substring stripped from the visible text, and
/// a note without the marker passes through untouched. Idempotent over
/// its own output.
pub fn decode(note: Option<&str>) -> DecodedNote {
    let Some(raw) = note else {
        return DecodedNote::default();
    };

    let Some(captures) = MARKER_RE.captures(raw) else {
        return DecodedNote {
            human_note: raw.trim().to_string(),
            schedule_times: Vec::new(),
        };
    };

    let marker_start = captures.get(0).map(|m| m.start()).unwrap_or(0);
    let human_note = raw[..marker_start].trim().to_string();

    let payload = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
    let schedule_times = match serde_json::from_str::<SchedulePayload>(payload) {
        Ok(parsed) => parsed.schedule_times,
        Err(err) => {
            tracing::debug!(%err, "unreadable schedule-time payload, ignoring");
            Vec::new()
        }
    };

    DecodedNote {
        human_note,
        schedule_times,
    }
}

/// Display fallback when an item has a known frequency but no stored
/// times: `08:00`, `12:00`, `18:00`, then `(8 + 4·i) mod 24` hours.
///
/// Placeholder policy reproduced from the portal UI; past four doses a
/// day it wraps and may repeat. Not a correctness requirement.
pub fn default_times(frequency: u32) -> Vec<String> {
    (0..frequency)
        .map(|i| match i {
            0 => "08:00".to_string(),
            1 => "12:00".to_string(),
            2 => "18:00".to_string(),
            _ => format!("{:02}:00", (8 + 4 * i) % 24),
        })
        .collect()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn times(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn encodes_note_and_times_byte_exact() {
        let encoded = encode(Some("after meals"), &times(&["08:00", "20:00"]));
        assert_eq!(
            encoded,
            "after meals scheduleTimeJson:{\"scheduleTimes\":[\"08:00\",\"20:00\"]}"
        );
    }

    #[test]
    fn empty_note_has_no_leading_separator() {
        let encoded = encode(None, &times(&["08:00"]));
        assert_eq!(encoded, "scheduleTimeJson:{\"scheduleTimes\":[\"08:00\"]}");
        assert_eq!(encode(Some("   "), &times(&["08:00"])), encoded);
    }

    #[test]
    fn round_trips_note_and_times() {
        let original = times(&["08:00", "12:00", "20:00"]);
        let encoded = encode(Some("  with a full glass of water "), &original);
        let decoded = decode(Some(&encoded));
        assert_eq!(decoded.human_note, "with a full glass of water");
        assert_eq!(decoded.schedule_times, original);
    }

    #[test]
    fn decode_without_marker_passes_note_through() {
        let decoded = decode(Some("plain nurse note"));
        assert_eq!(decoded.human_note, "plain nurse note");
        assert!(decoded.schedule_times.is_empty());
    }

    #[test]
    fn decode_of_nothing_is_empty() {
        assert_eq!(decode(None), DecodedNote::default());
        let decoded = decode(Some(""));
        assert_eq!(decoded.human_note, "");
        assert!(decoded.schedule_times.is_empty());
    }

    #[test]
    fn garbage_payload_degrades_without_error() {
        let decoded = decode(Some("garbage scheduleTimeJson:{not json"));
        assert_eq!(decoded.human_note, "garbage");
        assert!(decoded.schedule_times.is_empty());
    }

    #[test]
    fn wrong_payload_shape_degrades_without_error() {
        let decoded = decode(Some("note scheduleTimeJson:{\"other\":1}"));
        assert_eq!(decoded.human_note, "note");
        assert!(decoded.schedule_times.is_empty());
    }

    #[test]
    fn decode_is_idempotent() {
        let encoded = encode(Some("after meals"), &times(&["08:00", "20:00"]));
        let once = decode(Some(&encoded));
        let twice = decode(Some(&once.human_note));
        assert_eq!(twice.human_note, once.human_note);
        assert!(twice.schedule_times.is_empty());
    }

    #[test]
    fn default_times_fixed_then_wrapping() {
        assert_eq!(default_times(1), times(&["08:00"]));
        assert_eq!(default_times(3), times(&["08:00", "12:00", "18:00"]));
        assert_eq!(
            default_times(5),
            times(&["08:00", "12:00", "18:00", "20:00", "00:00"])
        );
        assert!(default_times(0).is_empty());
    }
}
