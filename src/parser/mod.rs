//! Splits a model reply into narrative text, the ICT data packet and an
//! embedded trade setup. Total over any input: sections that are missing or
//! malformed come back as `None` (or packet defaults), never as errors.

pub mod concepts;
pub mod packet;
pub mod setup;

pub use concepts::ConceptFlags;
pub use packet::parse_packet;
pub use setup::decode_trade_setup;

use serde::Serialize;

use crate::models::{DataPacket, TradeSetup};

pub const DATA_PACKET_MARKER: &str = "---ICT_DATA_PACKET---";
pub const END_PACKET_MARKER: &str = "---END_PACKET---";
pub const TRADE_SETUP_MARKER: &str = "---TRADE_SETUP---";
pub const END_SETUP_MARKER: &str = "---END_SETUP---";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedResponse {
    pub narrative: String,
    pub data_packet: Option<DataPacket>,
    pub trade_setup: Option<TradeSetup>,
    pub concepts: ConceptFlags,
}

impl ParsedResponse {
    pub fn has_dashboard(&self) -> bool {
        self.data_packet.is_some() || self.trade_setup.is_some()
    }
}

/// Byte ranges of the marked sections inside one reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sections {
    narrative_end: usize,
    packet: Option<(usize, usize)>,
    setup: Option<(usize, usize)>,
}

fn locate_sections(raw: &str) -> Sections {
    let packet_at = raw.find(DATA_PACKET_MARKER);
    let setup_at = raw.find(TRADE_SETUP_MARKER);

    let narrative_end = match (packet_at, setup_at) {
        (Some(p), Some(s)) => p.min(s),
        (Some(p), None) => p,
        (None, Some(s)) => s,
        (None, None) => raw.len(),
    };

    let packet = packet_at.map(|p| {
        let start = p + DATA_PACKET_MARKER.len();
        let end = match raw[start..].find(TRADE_SETUP_MARKER) {
            Some(i) => start + i,
            None if setup_at.is_none() => raw.len(),
            // Only a setup marker ahead of the packet marker: empty window.
            None => start,
        };
        (start, end)
    });

    let setup = setup_at.map(|s| {
        let start = s + TRADE_SETUP_MARKER.len();
        let end = raw[start..]
            .find(END_SETUP_MARKER)
            .map_or(raw.len(), |i| start + i);
        (start, end)
    });

    Sections {
        narrative_end,
        packet,
        setup,
    }
}

/// The text following the trade-setup marker, up to the end sentinel.
pub fn trade_setup_body(raw: &str) -> Option<&str> {
    locate_sections(raw).setup.map(|(start, end)| &raw[start..end])
}

pub fn extract(raw: &str) -> ParsedResponse {
    let sections = locate_sections(raw);
    let narrative = &raw[..sections.narrative_end];

    let packet_region = sections.packet.map(|(start, end)| &raw[start..end]);
    let data_packet = packet_region.map(parse_packet);

    let trade_setup = sections
        .setup
        .and_then(|(start, end)| decode_trade_setup(&raw[start..end]).ok());

    let concepts = match packet_region {
        Some(region) => ConceptFlags::scan(&format!("{}\n{}", narrative, region)),
        None => ConceptFlags::scan(narrative),
    };

    ParsedResponse {
        narrative: narrative.to_string(),
        data_packet,
        trade_setup,
        concepts,
    }
}
