//! Early confluence on 1-minute and 5-minute candles.

use super::indicators::{classify_engulfing, is_wick_dominant, rsi_reading, volume_ratio};
use crate::types::{pct_change, Candle, EarlyConfluence, SignalStrength};

const MIN_POINTS: usize = 5;
const RSI_PERIOD: usize = 14;

const WEIGHT_MOMENTUM: f64 = 0.25;
const WEIGHT_RSI: f64 = 0.25;
const WEIGHT_VOLUME: f64 = 0.20;
const WEIGHT_PATTERN: f64 = 0.20;
const WEIGHT_INSTITUTIONAL: f64 = 0.10;

const MOMENTUM_MIN_PCT: f64 = 0.5;
const VOLUME_SPIKE_RATIO: f64 = 1.5;
const INSTITUTIONAL_MIN_VOLUME: f64 = 50e6;
const CONFIRMATION_SCORE: f64 = 0.6;

fn first_to_last_pct(candles: &[Candle]) -> f64 {
    match (candles.first(), candles.last()) {
        (Some(first), Some(last)) => pct_change(first.close, last.close),
        _ => 0.0,
    }
}

fn rsi_of(candles: &[Candle]) -> f64 {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    rsi_reading(&closes, RSI_PERIOD).value()
}

/// Index of the newest engulfing pair or wick-dominant bar.
fn newest_pattern_index(candles: &[Candle]) -> Option<usize> {
    (0..candles.len()).rev().find(|&i| {
        is_wick_dominant(&candles[i])
            || (i > 0 && classify_engulfing(&candles[i - 1], &candles[i]).is_some())
    })
}

/// Fuse short-interval momentum, RSI, volume and pattern signals.
///
/// Both series need at least five candles; otherwise the all-false sentinel
/// is returned. `volume_24h` is the asset's 24h quote volume in USD.
/// Callers validate both series with
/// [`validate_candles`](crate::types::validate_candles) beforehand.
pub fn detect_early_confluence(candles_1m: &[Candle], candles_5m: &[Candle], volume_24h: f64) -> EarlyConfluence {
    if candles_1m.len() < MIN_POINTS || candles_5m.len() < MIN_POINTS {
        return EarlyConfluence::none();
    }

    let short_term_momentum = first_to_last_pct(candles_1m) > MOMENTUM_MIN_PCT
        && first_to_last_pct(candles_5m) > MOMENTUM_MIN_PCT;

    // Short series degrade to the percent-change proxy.
    let rsi_1m = rsi_of(candles_1m);
    let rsi_5m = rsi_of(candles_5m);
    let in_band = |rsi: f64| (40.0..=70.0).contains(&rsi);
    let rsi_momentum = in_band(rsi_1m) && in_band(rsi_5m) && rsi_1m >= rsi_5m - 5.0;

    let volume_spike = volume_ratio(candles_1m, 3) > VOLUME_SPIKE_RATIO;

    let pattern_index = newest_pattern_index(candles_1m);
    let pattern_formation = pattern_index.is_some();

    let institutional_volume = volume_24h > INSTITUTIONAL_MIN_VOLUME && volume_spike;

    let weighted = [
        (short_term_momentum, WEIGHT_MOMENTUM),
        (rsi_momentum, WEIGHT_RSI),
        (volume_spike, WEIGHT_VOLUME),
        (pattern_formation, WEIGHT_PATTERN),
        (institutional_volume, WEIGHT_INSTITUTIONAL),
    ];
    let confluence_score = weighted
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, w)| w)
        .sum::<f64>()
        .clamp(0.0, 1.0);

    // Heuristic estimates, not statistically calibrated.
    let (probability, timing_estimate_minutes) = match pattern_index {
        Some(index) if institutional_volume => {
            // Candles since the pattern bar, inclusive.
            let formation_speed = (candles_1m.len() - index) as f64;
            (confluence_score * 0.8, formation_speed * 2.0)
        }
        _ => (0.0, 0.0),
    };

    EarlyConfluence {
        short_term_momentum,
        rsi_momentum,
        volume_spike,
        pattern_formation,
        institutional_volume,
        confluence_score,
        signal_strength: SignalStrength::from_score(confluence_score),
        is_early_confirmed: confluence_score >= CONFIRMATION_SCORE && institutional_volume,
        probability,
        timing_estimate_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(i: i64, open: f64, close: f64, volume: f64) -> Candle {
        let high = open.max(close) + 0.01;
        let low = open.min(close) - 0.01;
        Candle::new(i * 60_000, open, high, low, close, volume)
    }

    #[test]
    fn test_short_input_returns_sentinel() {
        let few: Vec<Candle> = (0..4).map(|i| candle(i, 100.0, 100.5, 10.0)).collect();
        let enough: Vec<Candle> = (0..6).map(|i| candle(i, 100.0, 100.5, 10.0)).collect();
        assert_eq!(detect_early_confluence(&few, &enough, 1e9), EarlyConfluence::none());
        assert_eq!(detect_early_confluence(&enough, &few, 1e9), EarlyConfluence::none());
    }

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(SignalStrength::from_score(0.7), SignalStrength::Strong);
        assert_eq!(SignalStrength::from_score(0.5), SignalStrength::Moderate);
        assert_eq!(SignalStrength::from_score(0.3), SignalStrength::Weak);
        assert_eq!(SignalStrength::from_score(0.29), SignalStrength::None);
    }

    #[test]
    fn test_volume_spike_without_institutional_volume() {
        let mut one: Vec<Candle> = (0..6).map(|i| candle(i, 100.0, 100.0 + i as f64 * 0.01, 10.0)).collect();
        for c in one.iter_mut().skip(3) {
            c.volume = 40.0;
        }
        let five: Vec<Candle> = (0..6).map(|i| candle(i, 100.0, 100.0, 10.0)).collect();
        let result = detect_early_confluence(&one, &five, 1e6);
        assert!(result.volume_spike);
        assert!(!result.institutional_volume);
        assert!(!result.is_early_confirmed);
        assert_eq!(result.probability, 0.0);
        assert_eq!(result.timing_estimate_minutes, 0.0);
    }
}
