use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::SessionClock;
use crate::error::{NexusError, Result};
use crate::llm::prompts::{
    setup_prompt, ADVISOR_INSTRUCTION, INSTITUTIONAL_ICT_PROTOCOL, MACRO_INSTRUCTION,
    MACRO_PROMPT, SETUP_PROMPT_MARKER,
};
use crate::llm::{
    ChatTurn, GenerationRequest, GroundingSource, InlineImage, ModelTier, Role, TextGenerator,
};
use crate::models::TradeSetup;
use crate::parser::{self, decode_trade_setup, ParsedResponse};

pub const NO_CONTENT: &str = "PROTOCOL_FAILURE: NO_CONTENT";
pub const LOGIC_ERROR: &str = "LOGIC_ERROR";
pub const MACRO_FALLBACK: &str = "Unable to aggregate macro flow.";
pub const CORE_REJECTION: &str = "## CORE REJECTION\nStructural integrity of the provided chart data does not meet ICT standards.";
pub const SETUP_FAILURE: &str = "ERROR: Unable to converge on a high-probability setup at this time.";

/// Chars of the latest analysis folded into the setup context.
const ANALYSIS_CONTEXT_CHARS: usize = 500;
/// Chat entries folded into the setup context.
const RECENT_TURNS: usize = 3;

/// One entry in the desk conversation: text, a generated setup, or both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeskTurn {
    pub role: Role,
    pub text: Option<String>,
    pub trade_setup: Option<TradeSetup>,
}

impl DeskTurn {
    fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: Some(text.into()),
            trade_setup: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSentiment {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

/// Sequences user actions against the model, one request at a time, and
/// runs every reply through the response extractor.
pub struct Desk {
    generator: Box<dyn TextGenerator>,
    clock: SessionClock,
    history: Vec<DeskTurn>,
    latest_analysis: String,
}

impl Desk {
    pub fn new(cfg: &Config, generator: Box<dyn TextGenerator>) -> Self {
        Self {
            generator,
            clock: SessionClock::new(cfg),
            history: Vec::new(),
            latest_analysis: String::new(),
        }
    }

    pub fn history(&self) -> &[DeskTurn] {
        &self.history
    }

    pub fn latest_analysis(&self) -> &str {
        &self.latest_analysis
    }

    /// Deep ICT scan of a chart image. A failed call yields the rejection
    /// narrative instead of an error.
    pub async fn analyze_chart(
        &mut self,
        image: &[u8],
        mime_type: &str,
        utc_now: Option<DateTime<Utc>>,
    ) -> ParsedResponse {
        info!("Ingesting chart ({} bytes, {})", image.len(), mime_type);
        self.latest_analysis.clear();

        let prompt = format!(
            "EXECUTE DEEP ICT PROTOCOL. {}",
            self.clock.time_context(utc_now)
        );
        let request = GenerationRequest::new(ModelTier::Deep, prompt)
            .system(INSTITUTIONAL_ICT_PROTOCOL)
            .image(InlineImage {
                mime_type: mime_type.to_string(),
                data_base64: BASE64.encode(image),
            })
            .thinking();

        let raw = match self.generator.generate(request).await {
            Ok(out) => {
                info!("Scan complete");
                out.text_or(NO_CONTENT)
            }
            Err(e) => {
                error!("Chart scan rejected: {}", e);
                CORE_REJECTION.to_string()
            }
        };

        let parsed = parser::extract(&raw);
        if let Some(packet) = &parsed.data_packet {
            info!(
                "Packet: session={} phase={} killzone={} levels={}",
                packet.session,
                packet.phase,
                packet.killzone,
                packet.levels.len()
            );
        }
        self.latest_analysis = raw;
        parsed
    }

    pub async fn chat(&mut self, message: &str) -> Result<ParsedResponse> {
        let message = message.trim();
        if message.is_empty() {
            return Err(NexusError::EmptyMessage);
        }

        let history = self.api_history();
        self.history.push(DeskTurn::text(Role::User, message));

        let request = GenerationRequest::new(ModelTier::Deep, message)
            .system(ADVISOR_INSTRUCTION)
            .history(history);

        let reply = match self.generator.generate(request).await {
            Ok(out) => out.text_or(LOGIC_ERROR),
            Err(e) => {
                error!("Advisory node offline: {}", e);
                return Err(e);
            }
        };

        let parsed = parser::extract(&reply);
        info!(
            "Advisory response received (setup={})",
            parsed.trade_setup.is_some()
        );
        self.history.push(DeskTurn {
            role: Role::Model,
            text: Some(reply),
            trade_setup: parsed.trade_setup.clone(),
        });
        Ok(parsed)
    }

    /// Ask for a structured setup from recent chat and the latest analysis.
    /// `id` is stamped onto the result with the generation time.
    pub async fn generate_setup(
        &mut self,
        id: &str,
        utc_now: Option<DateTime<Utc>>,
    ) -> Result<TradeSetup> {
        info!("Calculating probability matrix");
        let context = self.recent_context();
        let history = self.api_history();
        self.history.push(DeskTurn::text(Role::User, SETUP_PROMPT_MARKER));

        let request = GenerationRequest::new(ModelTier::Fast, setup_prompt(&context))
            .history(history)
            .json();

        let result = self
            .generator
            .generate(request)
            .await
            .and_then(|out| decode_trade_setup(out.text.as_deref().unwrap_or_default()));

        match result {
            Ok(mut setup) => {
                let now = utc_now.unwrap_or_else(Utc::now);
                setup.stamp(id, now.timestamp_millis());
                info!(
                    "Trade setup generated: {} {} confidence={}",
                    setup.direction, setup.asset, setup.confidence_score
                );
                self.history.push(DeskTurn {
                    role: Role::Model,
                    text: None,
                    trade_setup: Some(setup.clone()),
                });
                Ok(setup)
            }
            Err(e) => {
                warn!("Setup generation failed: {}", e);
                self.history.push(DeskTurn::text(Role::Model, SETUP_FAILURE));
                Err(e)
            }
        }
    }

    pub async fn market_sentiment(&mut self) -> Result<MarketSentiment> {
        info!("Scanning macro bias");
        let request = GenerationRequest::new(ModelTier::Fast, MACRO_PROMPT)
            .system(MACRO_INSTRUCTION)
            .grounded();

        let out = self.generator.generate(request).await.map_err(|e| {
            error!("Macro scan failed: {}", e);
            e
        })?;

        Ok(MarketSentiment {
            text: out.text_or(MACRO_FALLBACK),
            sources: out.sources,
        })
    }

    /// Text turns only; setup cards are not replayed to the model.
    fn api_history(&self) -> Vec<ChatTurn> {
        self.history
            .iter()
            .filter_map(|turn| {
                turn.text.as_ref().map(|text| ChatTurn {
                    role: turn.role,
                    text: text.clone(),
                })
            })
            .collect()
    }

    pub fn recent_context(&self) -> String {
        let start = self.history.len().saturating_sub(RECENT_TURNS);
        let mut context = self.history[start..]
            .iter()
            .map(|turn| turn.text.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n");

        if !self.latest_analysis.is_empty() {
            let excerpt: String = self
                .latest_analysis
                .chars()
                .take(ANALYSIS_CONTEXT_CHARS)
                .collect();
            context.push_str("\n\nRecent Analysis: ");
            context.push_str(&excerpt);
        }

        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{default_test_config, with_setup, ScriptedGenerator, SAMPLE_SETUP_JSON};

    fn desk(replies: Vec<Result<&str>>) -> Desk {
        Desk::new(&default_test_config(), Box::new(ScriptedGenerator::new(replies)))
    }

    #[tokio::test]
    async fn blank_chat_is_rejected_without_a_call() {
        let mut d = desk(vec![]);
        assert!(matches!(d.chat("   ").await, Err(NexusError::EmptyMessage)));
        assert!(d.history().is_empty());
    }

    #[tokio::test]
    async fn chat_records_both_turns_and_parses_setup() {
        let reply = with_setup("Long from the FVG.\n", SAMPLE_SETUP_JSON);
        let mut d = desk(vec![Ok(reply.as_str())]);
        let parsed = d.chat("Where is the entry?").await.unwrap();

        assert_eq!(parsed.narrative, "Long from the FVG.\n");
        assert!(parsed.trade_setup.is_some());
        assert_eq!(d.history().len(), 2);
        assert_eq!(d.history()[0].role, Role::User);
        assert!(d.history()[1].trade_setup.is_some());
    }

    #[tokio::test]
    async fn chat_replays_text_history_and_scan_uses_deep_model() {
        let generator = ScriptedGenerator::new(vec![Ok("scan"), Ok("r1"), Ok("r2")]);
        let seen = generator.requests.clone();
        let mut d = Desk::new(&default_test_config(), Box::new(generator));

        d.analyze_chart(b"png", "image/png", None).await;
        d.chat("q1").await.unwrap();
        d.chat("q2").await.unwrap();

        let requests = seen.lock().unwrap();
        assert_eq!(requests[0].tier, ModelTier::Deep);
        assert!(requests[0].image.is_some());
        assert!(requests[0].prompt.starts_with("EXECUTE DEEP ICT PROTOCOL. CONTEXT:"));
        assert!(requests[1].history.is_empty());
        assert_eq!(
            requests[2].history,
            vec![
                ChatTurn { role: Role::User, text: "q1".to_string() },
                ChatTurn { role: Role::Model, text: "r1".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn failed_scan_becomes_rejection_narrative() {
        let mut d = desk(vec![Err(NexusError::EmptyResponse)]);
        let parsed = d.analyze_chart(b"png", "image/png", None).await;
        assert_eq!(parsed.narrative, CORE_REJECTION);
        assert!(parsed.data_packet.is_none());
        assert_eq!(d.latest_analysis(), CORE_REJECTION);
    }

    #[tokio::test]
    async fn empty_scan_uses_no_content_text() {
        let mut d = desk(vec![Ok("")]);
        let parsed = d.analyze_chart(b"png", "image/png", None).await;
        assert_eq!(parsed.narrative, NO_CONTENT);
    }

    #[tokio::test]
    async fn recent_context_takes_last_three_and_analysis_excerpt() {
        let long_analysis = "A".repeat(800);
        let mut d = desk(vec![
            Ok(long_analysis.as_str()),
            Ok("first reply"),
            Ok("second reply"),
        ]);
        d.analyze_chart(b"png", "image/png", None).await;
        d.chat("q1").await.unwrap();
        d.chat("q2").await.unwrap();

        let ctx = d.recent_context();
        let (turns, analysis) = ctx.split_once("\n\nRecent Analysis: ").unwrap();
        assert_eq!(turns, "first reply\nq2\nsecond reply");
        assert_eq!(analysis.len(), 500);
    }

    #[tokio::test]
    async fn generated_setup_is_stamped() {
        let mut d = desk(vec![Ok(SAMPLE_SETUP_JSON)]);
        let now = DateTime::parse_from_rfc3339("2024-01-17T13:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let setup = d.generate_setup("SETUP-7", Some(now)).await.unwrap();

        assert_eq!(setup.id.as_deref(), Some("SETUP-7"));
        assert_eq!(setup.timestamp, Some(now.timestamp_millis()));
        assert_eq!(d.history()[0].text.as_deref(), Some(SETUP_PROMPT_MARKER));
        assert_eq!(d.history()[1].trade_setup.as_ref(), Some(&setup));
    }

    #[tokio::test]
    async fn bad_setup_json_appends_failure_turn() {
        let mut d = desk(vec![Ok("{\"asset\":")]);
        assert!(d.generate_setup("S", None).await.is_err());
        let last = d.history().last().unwrap();
        assert_eq!(last.role, Role::Model);
        assert_eq!(last.text.as_deref(), Some(SETUP_FAILURE));
    }
}
