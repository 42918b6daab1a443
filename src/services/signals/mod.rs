//! Technical analysis signals.
//!
//! Provides indicator calculations, market turn detection, institutional
//! setup/calibration assessment and short-interval early confluence.
//!
//! These functions trust their input. Validation lives at the engine boundary
//! (`OpportunityEngine::evaluate`), or with `validate_candles` and
//! `AssetSnapshot::validate` for direct callers.

pub mod calibration;
pub mod early;
pub mod indicators;
pub mod setup;
pub mod turns;

pub use calibration::calibrate;
pub use early::detect_early_confluence;
pub use indicators::{IndicatorSeries, IndicatorSet};
pub use setup::detect_institutional_setup;
pub use turns::{best_turn, detect_turns, detect_unified_market_turn, TurnDeduplicator};

use crate::types::Candle;

/// Trait for indicators that produce a series aligned to a candle suffix.
pub trait Indicator: Send + Sync {
    /// Stable id such as `ema20`.
    fn id(&self) -> String;

    /// Candles consumed before the first value is produced.
    fn warmup(&self) -> usize;

    /// Raw values; empty when there are fewer than `warmup` candles.
    fn values(&self, candles: &[Candle]) -> Vec<f64>;

    /// Values wrapped with their name and alignment.
    fn compute(&self, candles: &[Candle]) -> IndicatorSeries {
        IndicatorSeries {
            name: self.id(),
            warmup: self.warmup(),
            values: self.values(candles),
        }
    }
}

/// Clamp a value to [0, 1].
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
