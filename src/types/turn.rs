use serde::{Deserialize, Serialize};

/// Direction of a detected market turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Upward,
    Downward,
    None,
}

/// Kind of turn: regime reversal or short-lived reversal pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnType {
    Major,
    Micro,
    None,
}

impl TurnType {
    pub fn label(&self) -> &'static str {
        match self {
            TurnType::Major => "Major",
            TurnType::Micro => "Micro",
            TurnType::None => "None",
        }
    }
}

/// Best turn signal for one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTurn {
    pub detected: bool,
    pub direction: TurnDirection,
    #[serde(rename = "type")]
    pub turn_type: TurnType,
    /// Timestamp (unix ms) of the candle that triggered the turn.
    pub timestamp: i64,
    pub interval: String,
    /// Fixed per detection rule, not a continuous estimate.
    pub confidence: f64,
    pub reason: String,
}

impl MarketTurn {
    /// "No turn" sentinel.
    pub fn none(interval: &str, timestamp: i64, reason: impl Into<String>) -> Self {
        Self {
            detected: false,
            direction: TurnDirection::None,
            turn_type: TurnType::None,
            timestamp,
            interval: interval.to_string(),
            confidence: 0.0,
            reason: reason.into(),
        }
    }

    /// Key a caller uses to avoid reporting the same turn twice.
    pub fn key(&self, symbol: &str) -> TurnKey {
        TurnKey {
            symbol: symbol.to_string(),
            direction: self.direction,
            turn_type: self.turn_type,
            interval: self.interval.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Deduplication key for turn events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnKey {
    pub symbol: String,
    pub direction: TurnDirection,
    pub turn_type: TurnType,
    pub interval: String,
    pub timestamp: i64,
}
