use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{DataPacket, PriceLevel};

// Labels are case-insensitive; `.` stops at the line break so each capture is
// the remainder of the label's own line.
static SESSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SESSION:(.*)").expect("Invalid session pattern regex"));

static PHASE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)PHASE:(.*)").expect("Invalid phase pattern regex"));

static KILLZONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)KILLZONE:(.*)").expect("Invalid killzone pattern regex"));

/// `LEVEL: [type] | [price] | [label]`
static LEVEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)LEVEL:[ \t]*\[(.*?)\][ \t]*\|[ \t]*\[(.*?)\][ \t]*\|[ \t]*\[(.*?)\]")
        .expect("Invalid level pattern regex")
});

/// Older packets: `LEVEL: [label] | [price]`
static LEGACY_LEVEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)LEVEL:[ \t]*\[(.*?)\][ \t]*\|[ \t]*\[(.*?)\]")
        .expect("Invalid legacy level pattern regex")
});

/// Parse the text between the packet marker and whatever follows it.
/// Missing lines keep the packet defaults.
pub fn parse_packet(region: &str) -> DataPacket {
    let mut packet = DataPacket::default();

    if let Some(v) = first_value(&SESSION_PATTERN, region) {
        packet.session = v;
    }
    if let Some(v) = first_value(&PHASE_PATTERN, region) {
        packet.phase = v;
    }
    if let Some(v) = first_value(&KILLZONE_PATTERN, region) {
        packet.killzone = v;
    }

    packet.levels = LEVEL_PATTERN
        .captures_iter(region)
        .map(|c| PriceLevel::new(c[1].trim(), c[2].trim(), c[3].trim()))
        .collect();

    // Two-part lines are only read when no three-part line exists, so a
    // three-part packet is never counted twice.
    if packet.levels.is_empty() {
        packet.levels = LEGACY_LEVEL_PATTERN
            .captures_iter(region)
            .map(|c| PriceLevel::new("LEVEL", c[2].trim(), c[1].trim()))
            .collect();
    }

    packet
}

fn first_value(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}
