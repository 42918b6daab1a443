//! Indicator primitives: averages, oscillators, swings and candle patterns.

pub mod atr;
pub mod ema;
pub mod patterns;
pub mod rsi;
pub mod swing;

pub use atr::{atr, true_range, Atr};
pub use ema::{ema, Ema};
pub use patterns::{
    classify_engulfing, classify_pin_bar, is_hammer, is_shooting_star, is_wick_dominant,
    PatternSignal,
};
pub use rsi::{rsi, rsi_reading, Rsi, RsiReading};
pub use swing::{detect_swing_high_low, SwingPoints};

use serde::{Deserialize, Serialize};

use super::Indicator;
use crate::config::EngineConfig;
use crate::types::Candle;

/// A named indicator sequence aligned to a suffix of its candles.
///
/// `values[k]` belongs to candle `k + warmup - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSeries {
    pub name: String,
    pub warmup: usize,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Value `back` steps before the latest (0 = latest).
    pub fn back(&self, back: usize) -> Option<f64> {
        self.values.len().checked_sub(back + 1).map(|i| self.values[i])
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Candle index of the `k`-th value.
    pub fn candle_index(&self, k: usize) -> Option<usize> {
        (k < self.values.len()).then(|| k + self.warmup.saturating_sub(1))
    }
}

/// The indicator bundle every scorer reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSet {
    pub ema20: IndicatorSeries,
    pub ema50: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub atr: IndicatorSeries,
}

impl IndicatorSet {
    pub fn compute(candles: &[Candle], config: &EngineConfig) -> Self {
        Self {
            ema20: Ema::new(config.turn.fast_period).compute(candles),
            ema50: Ema::new(config.turn.slow_period).compute(candles),
            rsi: Rsi::new(config.rsi_period).compute(candles),
            atr: Atr::new(config.atr_period).compute(candles),
        }
    }
}

/// Mean volume of a candle slice; zero when empty.
pub fn average_volume(candles: &[Candle]) -> f64 {
    if candles.is_empty() {
        return 0.0;
    }
    candles.iter().map(|c| c.volume).sum::<f64>() / candles.len() as f64
}

/// Ratio of the last `recent` candles' mean volume to the mean of the
/// candles before them. Zero when either side is empty or the base is zero.
pub fn volume_ratio(candles: &[Candle], recent: usize) -> f64 {
    if recent == 0 || candles.len() <= recent {
        return 0.0;
    }
    let split = candles.len() - recent;
    let base = average_volume(&candles[..split]);
    if base > 0.0 {
        average_volume(&candles[split..]) / base
    } else {
        0.0
    }
}
