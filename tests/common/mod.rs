use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use nexus_terminal::config::{default_sessions, Config};
use nexus_terminal::llm::{GeneratedText, GenerationRequest, GroundingSource, TextGenerator};
use nexus_terminal::{NexusError, Result};

pub const SCENARIO_SETUP_JSON: &str = r#"{"id":"X1","asset":"BTC","direction":"BUY","confidenceScore":80,"entryZone":"60000-59500","stopLoss":"59000","tpLevels":[{"level":"62000","allocation":"100%","target":"Swing High"}],"riskReward":"1:4","confluences":["FVG"],"riskWarnings":["News"]}"#;

/// A full chart-scan reply in the shape the analysis protocol asks for.
pub const LONDON_SCAN: &str = "# EURUSD 15m\n\n## Bias\nBullish. Judas swing swept Asia lows into a discount FVG.\n\n\
---ICT_DATA_PACKET---\n\
SESSION: LONDON\n\
PHASE: MANIPULATION\n\
KILLZONE: ACTIVE - London Open\n\
LEVEL: [OPEN] | [1.0842] | [NY Midnight Open]\n\
LEVEL: [SSL] | [1.0821] | [Asia Low]\n\
LEVEL: [FVG] | [1.0830 - 1.0836] | [Key FVG]\n\
---END_PACKET---\n";

/// Mock model: canned replies in order, optional grounding sources.
pub struct MockGenerator {
    replies: Mutex<VecDeque<String>>,
    sources: Vec<GroundingSource>,
}

impl MockGenerator {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<GroundingSource>) -> Self {
        self.sources = sources;
        self
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<GeneratedText> {
        let text = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(NexusError::EmptyResponse)?;
        Ok(GeneratedText {
            text: Some(text),
            sources: self.sources.clone(),
        })
    }
}

pub fn test_config() -> Config {
    Config {
        gemini_api_key: "test-key".to_string(),
        gemini_base_url: "http://127.0.0.1:9".to_string(),
        analysis_model: "gemini-3-pro-preview".to_string(),
        fast_model: "gemini-3-flash-preview".to_string(),
        thinking_budget: 1024,
        request_timeout_secs: 5,
        sessions: default_sessions(),
        log_level: "INFO".to_string(),
    }
}
