mod common;

use chrono::{DateTime, Utc};

use common::{test_config, MockGenerator, LONDON_SCAN, SCENARIO_SETUP_JSON};
use nexus_terminal::desk::Desk;
use nexus_terminal::llm::GroundingSource;
use nexus_terminal::models::{AmdPhase, DataPacket, Direction, PriceLevel, TradeSetup};
use nexus_terminal::parser::{
    extract, DATA_PACKET_MARKER, END_SETUP_MARKER, TRADE_SETUP_MARKER,
};
use nexus_terminal::report::render_dashboard;

#[test]
fn scenario_london_packet() {
    let raw = "Some text---ICT_DATA_PACKET---\nSESSION: LONDON\nPHASE: MANIPULATION\nKILLZONE: ACTIVE - London Open\nLEVEL: [BSL] | [1.2050] | [Prior High]\n---END_PACKET---";
    let parsed = extract(raw);

    assert_eq!(parsed.narrative, "Some text");
    assert_eq!(
        parsed.data_packet,
        Some(DataPacket {
            session: "LONDON".to_string(),
            phase: "MANIPULATION".to_string(),
            killzone: "ACTIVE - London Open".to_string(),
            levels: vec![PriceLevel::new("BSL", "1.2050", "Prior High")],
        })
    );
    assert!(parsed.trade_setup.is_none());
}

#[test]
fn scenario_embedded_setup() {
    let raw = format!(
        "Setup follows.{}{}{}",
        TRADE_SETUP_MARKER, SCENARIO_SETUP_JSON, END_SETUP_MARKER
    );
    let setup = extract(&raw).trade_setup.expect("setup should decode");
    assert_eq!(setup.direction, Direction::Buy);
    assert_eq!(setup.tp_levels.len(), 1);
}

#[test]
fn setup_fields_match_source_json() {
    let raw = format!("{}{}{}", TRADE_SETUP_MARKER, SCENARIO_SETUP_JSON, END_SETUP_MARKER);
    let setup = extract(&raw).trade_setup.unwrap();

    assert_eq!(setup.id.as_deref(), Some("X1"));
    assert_eq!(setup.asset, "BTC");
    assert_eq!(setup.confidence(), Some(80.0));
    assert_eq!(setup.entry_zone, "60000-59500");
    assert_eq!(setup.stop_loss, "59000");
    assert_eq!(setup.tp_levels[0].level, "62000");
    assert_eq!(setup.tp_levels[0].allocation, "100%");
    assert_eq!(setup.tp_levels[0].target, "Swing High");
    assert_eq!(setup.risk_reward, "1:4");
    assert_eq!(setup.confluences, vec!["FVG"]);
    assert_eq!(setup.risk_warnings, vec!["News"]);

    // Re-encoding yields the source object exactly, number forms included.
    let source: serde_json::Value = serde_json::from_str(SCENARIO_SETUP_JSON).unwrap();
    assert_eq!(serde_json::to_value(&setup).unwrap(), source);
}

#[test]
fn fractional_confidence_reencodes_unchanged() {
    let json = SCENARIO_SETUP_JSON.replace("\"confidenceScore\":80", "\"confidenceScore\":72.5");
    let raw = format!("{}{}{}", TRADE_SETUP_MARKER, json, END_SETUP_MARKER);
    let setup: TradeSetup = extract(&raw).trade_setup.unwrap();

    let source: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(serde_json::to_value(&setup).unwrap(), source);
}

#[test]
fn scenario_invalid_setup_json() {
    let raw = format!(
        "Narrative{}{{\"id\":\"X1\",\"asset\":\"BTC\",\"direction\":\"BU",
        TRADE_SETUP_MARKER
    );
    let parsed = extract(&raw);
    assert_eq!(parsed.narrative, "Narrative");
    assert!(parsed.trade_setup.is_none());
}

#[test]
fn scenario_reversed_markers() {
    let raw = format!(
        "Intro{}{}{}{}\nSESSION: NY\nPHASE: DISTRIBUTION\nLEVEL: [BSL] | [1] | [x]\n",
        TRADE_SETUP_MARKER, SCENARIO_SETUP_JSON, END_SETUP_MARKER, DATA_PACKET_MARKER
    );
    let parsed = extract(&raw);
    assert_eq!(parsed.narrative, "Intro");
    assert_eq!(parsed.data_packet, Some(DataPacket::default()));
}

#[test]
fn packet_between_two_setup_blocks_is_read() {
    let raw = format!(
        "intro{}{{}}{}{}\nSESSION: LONDON\n{}{}{}",
        TRADE_SETUP_MARKER,
        END_SETUP_MARKER,
        DATA_PACKET_MARKER,
        TRADE_SETUP_MARKER,
        SCENARIO_SETUP_JSON,
        END_SETUP_MARKER
    );
    let parsed = extract(&raw);
    assert_eq!(parsed.narrative, "intro");
    assert_eq!(parsed.data_packet.unwrap().session, "LONDON");
}

#[test]
fn no_markers_means_whole_input_is_narrative() {
    for raw in ["", "plain", "SESSION: LONDON\nLEVEL: [a] | [b] | [c]", "---END_PACKET---"] {
        let parsed = extract(raw);
        assert_eq!(parsed.narrative, raw);
        assert!(parsed.data_packet.is_none());
        assert!(parsed.trade_setup.is_none());
    }
}

#[test]
fn mixed_level_formats_are_not_double_counted() {
    let raw = format!(
        "x{}\nLEVEL: [NY Midnight Open] | [1.0842]\nLEVEL: [SSL] | [1.0821] | [Asia Low]\n",
        DATA_PACKET_MARKER
    );
    let packet = extract(&raw).data_packet.unwrap();
    assert_eq!(packet.levels, vec![PriceLevel::new("SSL", "1.0821", "Asia Low")]);
}

#[test]
fn extraction_is_repeatable() {
    let raw = format!("{}{}{}{}", LONDON_SCAN, TRADE_SETUP_MARKER, SCENARIO_SETUP_JSON, END_SETUP_MARKER);
    assert_eq!(extract(&raw), extract(&raw));
}

#[tokio::test]
async fn scan_then_setup_pipeline() {
    let generator = MockGenerator::new(&[LONDON_SCAN, SCENARIO_SETUP_JSON]);
    let mut desk = Desk::new(&test_config(), Box::new(generator));

    // 1. Chart scan
    let parsed = desk.analyze_chart(&[0x89, 0x50, 0x4e, 0x47], "image/png", None).await;
    let packet = parsed.data_packet.as_ref().expect("scan should carry a packet");
    assert_eq!(packet.amd_phase(), AmdPhase::Manipulation);
    assert!(packet.killzone_active());
    assert_eq!(packet.levels.len(), 3);
    assert_eq!(packet.levels[2].label, "Key FVG");
    assert!(parsed.concepts.fair_value_gap);
    assert!(parsed.concepts.premium_discount);
    assert!(!parsed.concepts.smt_divergence);
    assert!(parsed.narrative.starts_with("# EURUSD 15m"));

    // 2. Setup from context
    let now = DateTime::parse_from_rfc3339("2024-01-17T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let setup = desk.generate_setup("SETUP-1", Some(now)).await.unwrap();
    assert_eq!(setup.id.as_deref(), Some("SETUP-1"));
    assert_eq!(setup.timestamp, Some(now.timestamp_millis()));
    assert_eq!(desk.history().len(), 2);

    // 3. Render
    let text = render_dashboard(&parsed);
    assert!(text.contains("SESSION (NY TIME)   LONDON"));
    assert!(text.contains("Asia Low"));
}

#[tokio::test]
async fn chat_reply_with_setup_block() {
    let reply = format!(
        "Short the retrace into premium.\n{}{}{}",
        TRADE_SETUP_MARKER,
        SCENARIO_SETUP_JSON.replace("\"BUY\"", "\"SELL\""),
        END_SETUP_MARKER
    );
    let mut desk = Desk::new(&test_config(), Box::new(MockGenerator::new(&[reply.as_str()])));

    let parsed = desk.chat("Give me a trade").await.unwrap();
    assert_eq!(parsed.narrative, "Short the retrace into premium.\n");
    assert_eq!(parsed.trade_setup.unwrap().direction, Direction::Sell);
}

#[tokio::test]
async fn sentiment_carries_sources() {
    let generator = MockGenerator::new(&["DXY heavy, yields falling."]).with_sources(vec![
        GroundingSource {
            uri: "https://example.com/macro".to_string(),
            title: "Macro wrap".to_string(),
        },
    ]);
    let mut desk = Desk::new(&test_config(), Box::new(generator));

    let sentiment = desk.market_sentiment().await.unwrap();
    assert_eq!(sentiment.text, "DXY heavy, yields falling.");
    assert_eq!(sentiment.sources.len(), 1);
}

#[tokio::test]
async fn generator_failure_on_setup_is_reported() {
    let mut desk = Desk::new(&test_config(), Box::new(MockGenerator::new(&[])));
    assert!(desk.generate_setup("S", None).await.is_err());
    assert_eq!(desk.history().len(), 2);
}
