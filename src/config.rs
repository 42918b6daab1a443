use std::env;

use crate::error::{EngineError, Result};
use crate::types::StrategyModality;

/// Market turn detector parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnConfig {
    /// Fast EMA period for major turns.
    pub fast_period: usize,
    /// Slow EMA period for major turns.
    pub slow_period: usize,
    /// Minimum candles before a major turn is considered.
    pub major_min_candles: usize,
    /// Aligned EMA points searched for a confirmed cross.
    pub major_scan_window: usize,
    /// Candles examined for micro turns.
    pub micro_window: usize,
    /// Candles defining the recent extreme for exhaustion turns.
    pub extreme_window: usize,
    /// Relative distance to the recent extreme that counts as a touch.
    pub extreme_tolerance: f64,
    pub major_confidence: f64,
    pub micro_confidence: f64,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            fast_period: 20,
            slow_period: 50,
            major_min_candles: 50,
            major_scan_window: 10,
            micro_window: 10,
            extreme_window: 5,
            extreme_tolerance: 0.002,
            major_confidence: 0.85,
            micro_confidence: 0.70,
        }
    }
}

/// Call-time engine parameters. The engine never reads these from the
/// environment itself.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub rsi_period: usize,
    pub atr_period: usize,
    /// Half-width of the swing high/low window.
    pub swing_lookback: usize,
    /// Primary-timeframe candles required before a scorer runs.
    pub min_candles: usize,
    pub turn: TurnConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            atr_period: 14,
            swing_lookback: 5,
            min_candles: 50,
            turn: TurnConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Reject zero periods and windows too short to hold a signal.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("rsi_period", self.rsi_period),
            ("atr_period", self.atr_period),
            ("swing_lookback", self.swing_lookback),
            ("fast_period", self.turn.fast_period),
            ("slow_period", self.turn.slow_period),
            ("extreme_window", self.turn.extreme_window),
        ];
        if let Some((name, _)) = checks.iter().find(|(_, value)| *value == 0) {
            return Err(EngineError::InvalidParameter(format!("{} must be positive", name)));
        }
        // A confirmed cross and an exhaustion run both span three points
        let windows = [
            ("major_scan_window", self.turn.major_scan_window),
            ("micro_window", self.turn.micro_window),
        ];
        if let Some((name, value)) = windows.iter().find(|(_, value)| *value < 3) {
            return Err(EngineError::InvalidParameter(format!(
                "{} {} must be at least 3",
                name, value
            )));
        }
        if self.turn.fast_period >= self.turn.slow_period {
            return Err(EngineError::InvalidParameter(format!(
                "fast_period {} must be below slow_period {}",
                self.turn.fast_period, self.turn.slow_period
            )));
        }
        Ok(())
    }
}

/// Batch runner configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON array of symbol market data.
    pub input_path: Option<String>,
    /// Modality to score.
    pub modality: StrategyModality,
    /// Timeframes to read; empty means the modality's defaults.
    pub timeframes: Vec<String>,
    /// Engine parameters.
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let modality = env::var("CONFLUENCE_MODALITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(StrategyModality::DayTrade);

        // Format: "15m,1h"
        let timeframes = env::var("CONFLUENCE_TIMEFRAMES")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            swing_lookback: env::var("CONFLUENCE_SWING_LOOKBACK")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.swing_lookback),
            min_candles: env::var("CONFLUENCE_MIN_CANDLES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_candles),
            ..defaults
        };

        Self {
            input_path: env::var("CONFLUENCE_INPUT").ok(),
            modality,
            timeframes,
            engine,
        }
    }
}
