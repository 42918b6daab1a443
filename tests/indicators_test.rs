//! Indicator library tests

use confluence::config::EngineConfig;
use confluence::services::signals::indicators::*;
use confluence::services::signals::Indicator;
use confluence::types::Candle;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn band(values: &[f64], half_width: f64) -> Vec<Candle> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Candle::new(i as i64, *v, v + half_width, v - half_width, *v, 1.0))
        .collect()
}

#[test]
fn test_ema_seeded_with_sma() {
    assert_eq!(ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3), vec![2.0, 3.0, 4.0]);
    assert!(ema(&[1.0, 2.0], 3).is_empty());
    assert!(ema(&[1.0, 2.0], 0).is_empty());
}

#[test]
fn test_rsi_wilder_smoothing() {
    let values = rsi(&[1.0, 2.0, 1.0, 2.0, 1.0], 2);
    assert_eq!(values.len(), 3);
    assert!(approx(values[0], 50.0));
    assert!(approx(values[1], 75.0));
    assert!(approx(values[2], 37.5));
}

#[test]
fn test_rsi_without_losses_is_100() {
    let rising: Vec<f64> = (0..20).map(|i| i as f64).collect();
    assert!(rsi(&rising, 14).iter().all(|v| *v == 100.0));
}

#[test]
fn test_rsi_reading_degrades_to_proxy() {
    assert_eq!(rsi_reading(&[100.0], 14), RsiReading::Proxy(50.0));
    let proxy = rsi_reading(&[100.0, 110.0], 14);
    assert!(proxy.is_proxy());
    assert!(approx(proxy.value(), 70.0));
    // Large moves saturate
    assert_eq!(rsi_reading(&[100.0, 200.0], 14).value(), 100.0);

    let rising: Vec<f64> = (1..=15).map(|i| i as f64).collect();
    assert_eq!(rsi_reading(&rising, 14), RsiReading::Wilder(100.0));
}

#[test]
fn test_atr_constant_range() {
    let candles = band(&[10.0; 20], 1.0);
    let values = atr(&candles, 14);
    assert_eq!(values.len(), 7);
    assert!(values.iter().all(|v| approx(*v, 2.0)));
}

#[test]
fn test_true_range_uses_previous_close() {
    let prev = Candle::new(0, 10.0, 10.5, 9.5, 10.0, 1.0);
    let gap_up = Candle::new(1, 12.0, 12.5, 11.5, 12.0, 1.0);
    assert_eq!(true_range(&gap_up, None), 1.0);
    assert_eq!(true_range(&gap_up, Some(&prev)), 2.5);
}

#[test]
fn test_swing_points() {
    let candles = band(&[3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0], 0.5);
    let swings = detect_swing_high_low(&candles, 2);
    assert_eq!(swings.swing_lows, vec![2]);
    assert_eq!(swings.swing_highs, vec![4]);
    assert_eq!(swings.last_low(&candles).map(|c| c.close), Some(1.0));

    assert_eq!(detect_swing_high_low(&candles, 0), SwingPoints::default());
    assert_eq!(detect_swing_high_low(&candles[..4], 2), SwingPoints::default());
}

#[test]
fn test_swing_ties_are_not_extremes() {
    let candles = band(&[1.0, 2.0, 2.0, 1.0, 0.5], 0.5);
    assert!(detect_swing_high_low(&candles, 1).swing_highs.is_empty());
}

#[test]
fn test_engulfing() {
    let bearish = Candle::new(0, 10.0, 10.5, 8.5, 9.0, 1.0);
    let bullish = Candle::new(1, 8.8, 11.0, 8.7, 10.8, 1.0);
    assert_eq!(classify_engulfing(&bearish, &bullish), PatternSignal::Bullish);

    let up = Candle::new(0, 9.0, 10.5, 8.5, 10.0, 1.0);
    let down = Candle::new(1, 10.2, 10.4, 8.0, 8.5, 1.0);
    assert_eq!(classify_engulfing(&up, &down), PatternSignal::Bearish);

    let flat = Candle::new(2, 10.0, 10.0, 10.0, 10.0, 1.0);
    assert_eq!(classify_engulfing(&flat, &bullish), PatternSignal::None);
    assert_eq!(classify_pin_bar(&flat), PatternSignal::None);
}

#[test]
fn test_hammer_and_star() {
    let hammer = Candle::new(0, 10.0, 10.5, 8.0, 10.5, 1.0);
    assert!(is_hammer(&hammer));
    assert!(!is_shooting_star(&hammer));
    assert!(is_wick_dominant(&hammer));

    let star = Candle::new(1, 10.0, 12.5, 9.5, 9.5, 1.0);
    assert!(is_shooting_star(&star));
    assert!(!is_hammer(&star));
}

#[test]
fn test_indicator_trait_alignment() {
    let candles = band(&(0..30).map(|i| 100.0 + i as f64).collect::<Vec<_>>(), 1.0);
    let series = Rsi::new(14).compute(&candles);
    assert_eq!(series.name, "rsi14");
    assert_eq!(series.values.len(), 16);
    assert_eq!(series.candle_index(0), Some(14));

    let ema20 = Ema::new(20).compute(&candles);
    assert_eq!(ema20.values.len(), 11);
    assert_eq!(ema20.candle_index(10), Some(29));
}

#[test]
fn test_indicator_set_from_config() {
    let candles = band(&(0..60).map(|i| 100.0 + i as f64).collect::<Vec<_>>(), 1.0);
    let set = IndicatorSet::compute(&candles, &EngineConfig::default());
    assert_eq!(set.ema20.values.len(), 41);
    assert_eq!(set.ema50.values.len(), 11);
    assert_eq!(set.rsi.values.len(), 46);
    assert_eq!(set.atr.values.len(), 47);
    assert!(set.ema20.last() > set.ema50.last());
}

#[test]
fn test_volume_ratio_recent_against_base() {
    let candles: Vec<Candle> = [10.0, 10.0, 10.0, 25.0, 25.0]
        .iter()
        .enumerate()
        .map(|(i, v)| Candle::new(i as i64, 1.0, 1.0, 1.0, 1.0, *v))
        .collect();
    assert_eq!(volume_ratio(&candles, 2), 2.5);
    assert_eq!(average_volume(&candles), 16.0);
}
