//! Institutional calibration: six weighted criteria folded into a 0-100
//! composite.
//!
//! Trend, short-position and wick-rejection scores are gated: they are zero
//! unless their precondition holds, and only then scale.

use super::clamp_unit;
use crate::types::{
    AssetSnapshot, CalibrationCriterion, CalibrationLevel, Candle, CriterionStatus,
    InstitutionalCalibration,
};

/// Criterion weights. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationWeights {
    pub trend: f64,
    pub support: f64,
    pub volume: f64,
    pub technical: f64,
    pub short_position: f64,
    pub wick_rejection: f64,
}

impl CalibrationWeights {
    pub fn sum(&self) -> f64 {
        self.trend + self.support + self.volume + self.technical + self.short_position + self.wick_rejection
    }
}

pub const WEIGHTS: CalibrationWeights = CalibrationWeights {
    trend: 0.25,
    support: 0.20,
    volume: 0.20,
    technical: 0.15,
    short_position: 0.10,
    wick_rejection: 0.10,
};

/// Candles used for the support range when the snapshot has no 24h range.
const SUPPORT_WINDOW: usize = 50;
/// Decline (percent) that saturates the trend score.
const TREND_FULL_DECLINE: f64 = 10.0;
/// Volume/market-cap ratio that saturates the volume score.
const VOLUME_FULL_RATIO: f64 = 0.3;
/// Absolute volume that saturates the volume score without a market cap.
const VOLUME_FULL_ABSOLUTE: f64 = 100e6;

/// Raw sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationScores {
    pub trend: f64,
    pub support: f64,
    pub volume: f64,
    pub technical: f64,
    pub short_position: f64,
    pub wick_rejection: f64,
}

/// `100 × Σ weight·score`, rounded to two decimals.
pub fn composite_score(scores: &CalibrationScores) -> f64 {
    let w = WEIGHTS;
    let sum = w.trend * clamp_unit(scores.trend)
        + w.support * clamp_unit(scores.support)
        + w.volume * clamp_unit(scores.volume)
        + w.technical * clamp_unit(scores.technical)
        + w.short_position * clamp_unit(scores.short_position)
        + w.wick_rejection * clamp_unit(scores.wick_rejection);
    ((sum * 100.0 * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

/// Zero unless the 24h change is negative; deeper declines score higher,
/// discounted by volatility.
pub fn trend_score(asset: &AssetSnapshot) -> f64 {
    if asset.percent_change_24h >= 0.0 {
        return 0.0;
    }
    let magnitude = (asset.percent_change_24h.abs() / TREND_FULL_DECLINE).min(1.0);
    let volatility = asset.volatility.unwrap_or(0.0).max(0.0);
    clamp_unit(magnitude / (1.0 + volatility / 10.0))
}

/// Closeness of price to the bottom of its range.
pub fn support_score(asset: &AssetSnapshot, candles: &[Candle]) -> f64 {
    let (low, high) = match (asset.low_24h, asset.high_24h) {
        (Some(low), Some(high)) if high > low => (low, high),
        _ => {
            let window = &candles[candles.len().saturating_sub(SUPPORT_WINDOW)..];
            if window.is_empty() {
                return 0.0;
            }
            let low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
            let high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
            (low, high)
        }
    };
    if high <= low {
        return 0.0;
    }
    let price = if asset.price > 0.0 {
        asset.price
    } else {
        match candles.last() {
            Some(c) => c.close,
            None => return 0.0,
        }
    };
    clamp_unit(1.0 - (price - low) / (high - low))
}

/// Turnover relative to market cap, or absolute volume when the cap is unknown.
pub fn volume_score(asset: &AssetSnapshot) -> f64 {
    match asset.volume_market_cap_ratio() {
        Some(ratio) => clamp_unit(ratio / VOLUME_FULL_RATIO),
        None => clamp_unit(asset.volume_24h / VOLUME_FULL_ABSOLUTE),
    }
}

/// Mean of RSI, momentum and open-interest components.
pub fn technical_score(asset: &AssetSnapshot) -> f64 {
    let rsi_component = match asset.rsi {
        Some(rsi) if rsi < 30.0 => 1.0,
        Some(rsi) if rsi < 40.0 => 0.7,
        Some(rsi) if rsi < 50.0 => 0.4,
        _ => 0.0,
    };
    let momentum_component = match asset.momentum {
        Some(m) if m > 0.0 => (m / 5.0).min(1.0),
        _ => 0.0,
    };
    let oi_component = match asset.open_interest_change {
        Some(c) if c > 0.0 => (c / 10.0).min(1.0),
        _ => 0.0,
    };
    clamp_unit((rsi_component + momentum_component + oi_component) / 3.0)
}

/// Zero unless shorts dominate (long/short ratio below 1).
pub fn short_position_score(asset: &AssetSnapshot) -> f64 {
    match asset.long_short_ratio {
        Some(ratio) if ratio < 1.0 => clamp_unit((1.0 - ratio) / 0.5),
        _ => 0.0,
    }
}

/// Zero unless the last candle's lower wick exceeds its body.
pub fn wick_rejection_score(candles: &[Candle]) -> f64 {
    let Some(last) = candles.last() else {
        return 0.0;
    };
    let range = last.range();
    if range <= 0.0 || last.lower_wick() <= last.body() {
        return 0.0;
    }
    clamp_unit(last.lower_wick() / range)
}

/// Score all six criteria and fold them into the composite.
///
/// Expects an asset that passed [`AssetSnapshot::validate`] and candles that
/// passed [`validate_candles`](crate::types::validate_candles).
pub fn calibrate(asset: &AssetSnapshot, candles: &[Candle]) -> InstitutionalCalibration {
    let scores = CalibrationScores {
        trend: trend_score(asset),
        support: support_score(asset, candles),
        volume: volume_score(asset),
        technical: technical_score(asset),
        short_position: short_position_score(asset),
        wick_rejection: wick_rejection_score(candles),
    };
    let composite = composite_score(&scores);

    let criterion = |id: &str, label: &str, weight: f64, score: f64, detail: String| CalibrationCriterion {
        id: id.to_string(),
        label: label.to_string(),
        weight,
        score,
        status: CriterionStatus::from_score(score),
        detail,
    };

    let criteria = vec![
        criterion(
            "trend",
            "Downtrend exhaustion",
            WEIGHTS.trend,
            scores.trend,
            format!("24h change {:.2}%", asset.percent_change_24h),
        ),
        criterion(
            "support",
            "Proximity to support",
            WEIGHTS.support,
            scores.support,
            format!("price {:.4}", asset.price),
        ),
        criterion(
            "volume",
            "Volume / transactions",
            WEIGHTS.volume,
            scores.volume,
            match asset.volume_market_cap_ratio() {
                Some(ratio) => format!("volume/market cap {:.3}", ratio),
                None => format!("24h volume {:.0}", asset.volume_24h),
            },
        ),
        criterion(
            "technical",
            "Indicator convergence",
            WEIGHTS.technical,
            scores.technical,
            match asset.rsi {
                Some(rsi) => format!("RSI {:.1}", rsi),
                None => "RSI unavailable".to_string(),
            },
        ),
        criterion(
            "short_position",
            "Short-position asymmetry",
            WEIGHTS.short_position,
            scores.short_position,
            match asset.long_short_ratio {
                Some(ratio) => format!("long/short {:.2}", ratio),
                None => "long/short unavailable".to_string(),
            },
        ),
        criterion(
            "wick_rejection",
            "Wick rejection",
            WEIGHTS.wick_rejection,
            scores.wick_rejection,
            match candles.last() {
                Some(c) => format!("lower wick {:.4} of range {:.4}", c.lower_wick(), c.range()),
                None => "no candles".to_string(),
            },
        ),
    ];

    InstitutionalCalibration {
        symbol: asset.symbol.clone(),
        trend_score: scores.trend,
        support_score: scores.support,
        volume_score: scores.volume,
        technical_score: scores.technical,
        short_position_score: scores.short_position,
        wick_rejection_score: scores.wick_rejection,
        composite_score: composite,
        calibration_level: CalibrationLevel::from_score(composite),
        criteria,
    }
}
