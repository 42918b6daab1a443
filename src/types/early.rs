use serde::{Deserialize, Serialize};

/// Strength bucket of an early confluence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStrength {
    None,
    Weak,
    Moderate,
    Strong,
}

impl SignalStrength {
    /// Bucket a 0-1 confluence score.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            SignalStrength::Strong
        } else if score >= 0.5 {
            SignalStrength::Moderate
        } else if score >= 0.3 {
            SignalStrength::Weak
        } else {
            SignalStrength::None
        }
    }
}

/// Short-interval (1m/5m) confluence of price, RSI, volume and pattern signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyConfluence {
    pub short_term_momentum: bool,
    pub rsi_momentum: bool,
    pub volume_spike: bool,
    pub pattern_formation: bool,
    pub institutional_volume: bool,
    /// Weighted sum in [0, 1].
    pub confluence_score: f64,
    pub signal_strength: SignalStrength,
    pub is_early_confirmed: bool,
    /// Heuristic, not statistically calibrated. Zero unless a pattern formed
    /// on institutional volume.
    pub probability: f64,
    /// Heuristic minutes-to-move estimate; same gating as `probability`.
    pub timing_estimate_minutes: f64,
}

impl EarlyConfluence {
    /// All-false, zero-score sentinel.
    pub fn none() -> Self {
        Self {
            short_term_momentum: false,
            rsi_momentum: false,
            volume_spike: false,
            pattern_formation: false,
            institutional_volume: false,
            confluence_score: 0.0,
            signal_strength: SignalStrength::None,
            is_early_confirmed: false,
            probability: 0.0,
            timing_estimate_minutes: 0.0,
        }
    }
}
