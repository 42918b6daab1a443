use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{AssetSnapshot, Candle, OrderBookDepth};
use crate::error::EngineError;

/// Strategy modality an opportunity is scored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyModality {
    Scalping,
    DayTrade,
    SwingTrade,
    TrendFollowing,
    TrendPullback,
    Breakout,
    MeanReversion,
    OversoldReversal,
    OverboughtReversal,
    LiquiditySweep,
    OrderBookImbalance,
    VolumeSpike,
    VolumeAccumulation,
    InstitutionalSetup,
    InstitutionalCalibration,
}

impl StrategyModality {
    pub const ALL: [StrategyModality; 15] = [
        Self::Scalping,
        Self::DayTrade,
        Self::SwingTrade,
        Self::TrendFollowing,
        Self::TrendPullback,
        Self::Breakout,
        Self::MeanReversion,
        Self::OversoldReversal,
        Self::OverboughtReversal,
        Self::LiquiditySweep,
        Self::OrderBookImbalance,
        Self::VolumeSpike,
        Self::VolumeAccumulation,
        Self::InstitutionalSetup,
        Self::InstitutionalCalibration,
    ];

    /// Stable identifier, identical to the serde representation.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Scalping => "scalping",
            Self::DayTrade => "day_trade",
            Self::SwingTrade => "swing_trade",
            Self::TrendFollowing => "trend_following",
            Self::TrendPullback => "trend_pullback",
            Self::Breakout => "breakout",
            Self::MeanReversion => "mean_reversion",
            Self::OversoldReversal => "oversold_reversal",
            Self::OverboughtReversal => "overbought_reversal",
            Self::LiquiditySweep => "liquidity_sweep",
            Self::OrderBookImbalance => "order_book_imbalance",
            Self::VolumeSpike => "volume_spike",
            Self::VolumeAccumulation => "volume_accumulation",
            Self::InstitutionalSetup => "institutional_setup",
            Self::InstitutionalCalibration => "institutional_calibration",
        }
    }

    /// Get display name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scalping => "scalping",
            Self::DayTrade => "day trade",
            Self::SwingTrade => "swing trade",
            Self::TrendFollowing => "trend following",
            Self::TrendPullback => "trend pullback",
            Self::Breakout => "breakout",
            Self::MeanReversion => "mean reversion",
            Self::OversoldReversal => "oversold reversal",
            Self::OverboughtReversal => "overbought reversal",
            Self::LiquiditySweep => "liquidity sweep",
            Self::OrderBookImbalance => "order book imbalance",
            Self::VolumeSpike => "volume spike",
            Self::VolumeAccumulation => "volume accumulation",
            Self::InstitutionalSetup => "institutional setup",
            Self::InstitutionalCalibration => "institutional calibration",
        }
    }

    /// Timeframes used when a request does not name any.
    /// The first entry is the primary timeframe.
    pub fn default_timeframes(&self) -> &'static [&'static str] {
        match self {
            Self::Scalping => &["1m", "5m"],
            Self::OrderBookImbalance | Self::VolumeSpike => &["5m", "15m"],
            Self::DayTrade | Self::Breakout | Self::MeanReversion | Self::LiquiditySweep => {
                &["15m", "1h"]
            }
            Self::TrendFollowing
            | Self::TrendPullback
            | Self::OversoldReversal
            | Self::OverboughtReversal
            | Self::VolumeAccumulation
            | Self::InstitutionalSetup
            | Self::InstitutionalCalibration => &["1h", "4h"],
            Self::SwingTrade => &["4h", "1d"],
        }
    }
}

impl fmt::Display for StrategyModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StrategyModality {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|m| m.id() == normalized)
            .ok_or_else(|| EngineError::UnknownModality(s.to_string()))
    }
}

/// Audit trail entry for one evaluated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionCheck {
    pub id: String,
    pub label: String,
    pub met: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Scored opportunity for one symbol under one modality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityScore {
    pub symbol: String,
    pub modality: StrategyModality,
    /// 0-100.
    pub score: u8,
    pub conditions: Vec<ConditionCheck>,
    pub narrative: String,
    pub timeframes: Vec<String>,
}

impl OpportunityScore {
    pub fn met_conditions(&self) -> usize {
        self.conditions.iter().filter(|c| c.met).count()
    }
}

/// Narrative tier of a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityTier {
    Low,
    Moderate,
    Good,
    Excellent,
}

impl OpportunityTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s < 30 => OpportunityTier::Low,
            s if s < 60 => OpportunityTier::Moderate,
            s if s < 80 => OpportunityTier::Good,
            _ => OpportunityTier::Excellent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OpportunityTier::Low => "Low",
            OpportunityTier::Moderate => "Moderate",
            OpportunityTier::Good => "Good",
            OpportunityTier::Excellent => "Excellent",
        }
    }
}

/// Everything the engine knows about one symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolMarketData {
    pub symbol: String,
    /// Candles keyed by interval ("1m", "5m", "1h", ...).
    #[serde(default)]
    pub candles: BTreeMap<String, Vec<Candle>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_book: Option<OrderBookDepth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetSnapshot>,
}

impl SymbolMarketData {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Default::default()
        }
    }

    pub fn with_candles(mut self, interval: &str, candles: Vec<Candle>) -> Self {
        self.candles.insert(interval.to_string(), candles);
        self
    }

    pub fn with_order_book(mut self, book: OrderBookDepth) -> Self {
        self.order_book = Some(book);
        self
    }

    pub fn with_asset(mut self, asset: AssetSnapshot) -> Self {
        self.asset = Some(asset);
        self
    }

    /// Candles for an interval; empty when absent.
    pub fn series(&self, interval: &str) -> &[Candle] {
        self.candles.get(interval).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// What to score: a modality and the timeframes to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRequest {
    pub modality: StrategyModality,
    /// First entry is primary, second (if any) is the confirmation timeframe.
    pub timeframes: Vec<String>,
}

impl OpportunityRequest {
    /// Request using the modality's default timeframes.
    pub fn new(modality: StrategyModality) -> Self {
        Self {
            modality,
            timeframes: modality
                .default_timeframes()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn with_timeframes(modality: StrategyModality, timeframes: Vec<String>) -> Self {
        if timeframes.is_empty() {
            return Self::new(modality);
        }
        Self {
            modality,
            timeframes,
        }
    }

    pub fn primary(&self) -> &str {
        self.timeframes.first().map(String::as_str).unwrap_or("")
    }

    pub fn confirmation(&self) -> Option<&str> {
        self.timeframes.get(1).map(String::as_str)
    }
}
