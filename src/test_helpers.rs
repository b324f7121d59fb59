use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::config::{default_sessions, Config};
use crate::error::{NexusError, Result};
use crate::llm::{GeneratedText, GenerationRequest, TextGenerator};
use crate::parser::{END_SETUP_MARKER, TRADE_SETUP_MARKER};

pub const SAMPLE_SETUP_JSON: &str = r#"{"id":"X1","asset":"BTC","direction":"BUY","confidenceScore":80,"entryZone":"60000-59500","stopLoss":"59000","tpLevels":[{"level":"62000","allocation":"100%","target":"Swing High"}],"riskReward":"1:4","confluences":["FVG"],"riskWarnings":["News"]}"#;

/// `prefix` followed by a delimited trade-setup block.
pub fn with_setup(prefix: &str, json: &str) -> String {
    format!("{}{}{}{}", prefix, TRADE_SETUP_MARKER, json, END_SETUP_MARKER)
}

/// Hands out canned replies in order and records every request it sees.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String>>>,
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<&str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string))
                    .collect(),
            ),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedText> {
        self.requests.lock().unwrap().push(request);
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(NexusError::EmptyResponse))?;
        Ok(GeneratedText {
            text: Some(next),
            sources: Vec::new(),
        })
    }
}

/// Config without touching the environment.
pub fn default_test_config() -> Config {
    Config {
        gemini_api_key: "test-key".to_string(),
        gemini_base_url: "http://127.0.0.1:9".to_string(),
        analysis_model: "gemini-3-pro-preview".to_string(),
        fast_model: "gemini-3-flash-preview".to_string(),
        thinking_budget: 32768,
        request_timeout_secs: 5,
        sessions: default_sessions(),
        log_level: "INFO".to_string(),
    }
}
