use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::Direction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TpLevel {
    pub level: String,
    pub allocation: String,
    pub target: String,
}

/// A proposed trade as emitted by the model. Field names follow the JSON the
/// model is prompted with; fields the model may leave out are `Option`s and
/// are not re-emitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSetup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub asset: String,
    pub direction: Direction,
    /// Kept as the source number so `80` re-encodes as `80`, not `80.0`.
    pub confidence_score: Number,
    pub entry_zone: String,
    pub stop_loss: String,
    pub tp_levels: Vec<TpLevel>,
    pub risk_reward: String,
    pub confluences: Vec<String>,
    pub risk_warnings: Vec<String>,

    /// Milliseconds since the Unix epoch, set when the setup is generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    // Card details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_probability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_entry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_confirmation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sl_justification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_stop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_per_trade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_potential: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_structure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_plan: Option<Vec<String>>,
}

impl TradeSetup {
    pub fn confidence(&self) -> Option<f64> {
        self.confidence_score.as_f64()
    }

    pub fn confidence_in_range(&self) -> bool {
        self.confidence()
            .is_some_and(|c| (0.0..=100.0).contains(&c))
    }

    /// Attach the caller's identifier and generation time.
    pub fn stamp(&mut self, id: impl Into<String>, timestamp_ms: i64) {
        self.id = Some(id.into());
        self.timestamp = Some(timestamp_ms);
    }
}
