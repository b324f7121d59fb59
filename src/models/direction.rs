use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }

    pub fn is_buy(self) -> bool {
        self == Direction::Buy
    }
}

/// Power of 3 cycle stage, read loosely out of the packet's PHASE text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmdPhase {
    Accumulation,
    Manipulation,
    Distribution,
    Retracement,
    Unknown,
}

impl fmt::Display for AmdPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmdPhase::Accumulation => write!(f, "accumulation"),
            AmdPhase::Manipulation => write!(f, "manipulation"),
            AmdPhase::Distribution => write!(f, "distribution"),
            AmdPhase::Retracement => write!(f, "retracement"),
            AmdPhase::Unknown => write!(f, "unknown"),
        }
    }
}

impl AmdPhase {
    /// Containment match, so "MANIPULATION (Judas Swing)" still classifies.
    pub fn classify(text: &str) -> Self {
        let upper = text.to_uppercase();
        if upper.contains("ACCUMULATION") {
            AmdPhase::Accumulation
        } else if upper.contains("MANIPULATION") {
            AmdPhase::Manipulation
        } else if upper.contains("DISTRIBUTION") {
            AmdPhase::Distribution
        } else if upper.contains("RETRACEMENT") {
            AmdPhase::Retracement
        } else {
            AmdPhase::Unknown
        }
    }
}
