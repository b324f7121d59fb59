use serde::{Deserialize, Serialize};

use super::AmdPhase;

pub const DEFAULT_SESSION: &str = "WAITING";
pub const DEFAULT_PHASE: &str = "ANALYZING";
pub const DEFAULT_KILLZONE: &str = "INACTIVE";

/// One `LEVEL:` line from the packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    #[serde(rename = "type")]
    pub level_type: String,
    pub price: String,
    pub label: String,
}

impl PriceLevel {
    pub fn new(level_type: &str, price: &str, label: &str) -> Self {
        Self {
            level_type: level_type.to_string(),
            price: price.to_string(),
            label: label.to_string(),
        }
    }
}

/// Session/phase/killzone state plus reference levels, rebuilt on every parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPacket {
    pub session: String,
    pub phase: String,
    pub killzone: String,
    pub levels: Vec<PriceLevel>,
}

impl Default for DataPacket {
    fn default() -> Self {
        Self {
            session: DEFAULT_SESSION.to_string(),
            phase: DEFAULT_PHASE.to_string(),
            killzone: DEFAULT_KILLZONE.to_string(),
            levels: Vec::new(),
        }
    }
}

impl DataPacket {
    pub fn amd_phase(&self) -> AmdPhase {
        AmdPhase::classify(&self.phase)
    }

    pub fn killzone_active(&self) -> bool {
        !self.killzone.to_uppercase().contains("INACTIVE")
    }
}
