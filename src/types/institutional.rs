//! Institutional setup and calibration value objects.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Point-in-time market snapshot of a single asset.
///
/// Derivatives and derived metrics are optional; every consumer must handle
/// the absent branch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSnapshot {
    pub symbol: String,
    pub price: f64,
    /// 24h quote volume (USD).
    pub volume_24h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    pub percent_change_24h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_change_1h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<f64>,
    /// Open interest change over 24h, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interest_change: Option<f64>,
    /// Short-horizon rate of change, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
    /// Intraday volatility, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// Upstream confluence score (0-1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confluence_score: Option<f64>,
    /// Long accounts / short accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_short_ratio: Option<f64>,
}

impl AssetSnapshot {
    /// 24h volume relative to market cap; None without a positive market cap.
    pub fn volume_market_cap_ratio(&self) -> Option<f64> {
        match self.market_cap {
            Some(cap) if cap > 0.0 => Some(self.volume_24h / cap),
            _ => None,
        }
    }

    /// Fail fast on non-finite fields and on negative prices, volumes or sizes.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("price", Some(self.price)),
            ("volume_24h", Some(self.volume_24h)),
            ("percent_change_24h", Some(self.percent_change_24h)),
            ("market_cap", self.market_cap),
            ("percent_change_1h", self.percent_change_1h),
            ("high_24h", self.high_24h),
            ("low_24h", self.low_24h),
            ("rsi", self.rsi),
            ("open_interest", self.open_interest),
            ("open_interest_change", self.open_interest_change),
            ("momentum", self.momentum),
            ("volatility", self.volatility),
            ("confluence_score", self.confluence_score),
            ("long_short_ratio", self.long_short_ratio),
        ];
        for (field, value) in required {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(EngineError::NonFinite {
                        context: format!("{} asset", self.symbol),
                        index: 0,
                        field,
                    });
                }
            }
        }

        // Signed fields (changes, momentum) are allowed below zero
        let unsigned = [
            ("price", Some(self.price)),
            ("volume_24h", Some(self.volume_24h)),
            ("market_cap", self.market_cap),
            ("high_24h", self.high_24h),
            ("low_24h", self.low_24h),
            ("open_interest", self.open_interest),
        ];
        for (field, value) in unsigned {
            if value.is_some_and(|v| v < 0.0) {
                return Err(EngineError::NegativeValue {
                    context: format!("{} asset", self.symbol),
                    index: 0,
                    field,
                });
            }
        }
        Ok(())
    }
}

/// The eight independent setup criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupCriteria {
    pub has_liquidity: bool,
    pub has_manipulation: bool,
    pub has_structure_change: bool,
    pub has_order_block: bool,
    pub has_fair_value_gap: bool,
    pub has_mitigation: bool,
    pub has_displacement: bool,
    pub has_institutional_target: bool,
}

impl SetupCriteria {
    /// Flags paired with their display labels, in evaluation order.
    pub fn labeled(&self) -> [(&'static str, bool); 8] {
        [
            ("Liquidity", self.has_liquidity),
            ("Manipulation", self.has_manipulation),
            ("Structure change", self.has_structure_change),
            ("Order block", self.has_order_block),
            ("Fair value gap", self.has_fair_value_gap),
            ("Mitigation", self.has_mitigation),
            ("Displacement", self.has_displacement),
            ("Institutional target", self.has_institutional_target),
        ]
    }

    /// Number of satisfied criteria (0-8).
    pub fn count(&self) -> u8 {
        self.labeled().iter().filter(|(_, met)| *met).count() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupStatus {
    None,
    Partial,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfluenceLevel {
    Low,
    Medium,
    High,
}

/// Institutional setup assessment for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionalSetup {
    pub symbol: String,
    #[serde(flatten)]
    pub criteria: SetupCriteria,
    pub setup_progress: u8,
    pub setup_status: SetupStatus,
    pub confluence_level: ConfluenceLevel,
    pub setup_narrative: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationLevel {
    Weak,
    Moderate,
    Good,
    Excellent,
}

impl CalibrationLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            CalibrationLevel::Excellent
        } else if score >= 55.0 {
            CalibrationLevel::Good
        } else if score >= 40.0 {
            CalibrationLevel::Moderate
        } else {
            CalibrationLevel::Weak
        }
    }
}

/// Status label for a single calibration criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    Absent,
    Weak,
    Present,
    Strong,
}

impl CriterionStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            CriterionStatus::Strong
        } else if score >= 0.4 {
            CriterionStatus::Present
        } else if score > 0.0 {
            CriterionStatus::Weak
        } else {
            CriterionStatus::Absent
        }
    }
}

/// One weighted calibration criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationCriterion {
    pub id: String,
    pub label: String,
    pub weight: f64,
    /// Clamped to [0, 1].
    pub score: f64,
    pub status: CriterionStatus,
    pub detail: String,
}

/// Weighted six-criterion calibration for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionalCalibration {
    pub symbol: String,
    pub trend_score: f64,
    pub support_score: f64,
    pub volume_score: f64,
    pub technical_score: f64,
    pub short_position_score: f64,
    pub wick_rejection_score: f64,
    /// 0-100.
    pub composite_score: f64,
    pub calibration_level: CalibrationLevel,
    pub criteria: Vec<CalibrationCriterion>,
}
