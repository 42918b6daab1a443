//! Institutional setup, calibration and early confluence tests

use confluence::services::signals::calibration::{composite_score, CalibrationScores, WEIGHTS};
use confluence::services::signals::setup::has_liquidity;
use confluence::services::signals::{calibrate, detect_early_confluence, detect_institutional_setup};
use confluence::types::*;

fn snapshot(volume: f64, market_cap: f64) -> AssetSnapshot {
    AssetSnapshot {
        symbol: "BTCUSDT".to_string(),
        price: 50_000.0,
        volume_24h: volume,
        market_cap: Some(market_cap),
        ..Default::default()
    }
}

#[test]
fn test_liquidity_ratio_examples() {
    // volume/market cap 0.5
    assert!(has_liquidity(&snapshot(20e6, 40e6)));
    // volume/market cap 0.05
    assert!(!has_liquidity(&snapshot(20e6, 400e6)));
}

#[test]
fn test_advanced_setup() {
    let asset = AssetSnapshot {
        symbol: "SOLUSDT".to_string(),
        price: 150.0,
        volume_24h: 60e6,
        market_cap: Some(100e6),
        percent_change_24h: -1.0,
        percent_change_1h: Some(2.0),
        volatility: Some(6.0),
        momentum: Some(2.0),
        rsi: Some(50.0),
        confluence_score: Some(0.8),
        open_interest: Some(60e6),
        ..Default::default()
    };

    let setup = detect_institutional_setup(&asset);
    assert_eq!(setup.symbol, "SOLUSDT");
    assert_eq!(setup.setup_progress, 7);
    assert!(!setup.criteria.has_displacement);
    assert_eq!(setup.setup_status, SetupStatus::Partial);
    assert_eq!(setup.confluence_level, ConfluenceLevel::High);
    assert_eq!(
        setup.setup_narrative,
        "Criteria met: Liquidity, Manipulation, Structure change, Order block, Fair value gap, \
         Mitigation, Institutional target. Advanced setup: 7/8 criteria confirmed, awaiting final confirmation."
    );
}

#[test]
fn test_setup_without_optionals() {
    let setup = detect_institutional_setup(&AssetSnapshot::default());
    assert_eq!(setup.setup_progress, 0);
    assert_eq!(setup.setup_status, SetupStatus::None);
    assert_eq!(setup.confluence_level, ConfluenceLevel::Low);
}

#[test]
fn test_setup_serializes_flat_criteria() {
    let setup = detect_institutional_setup(&snapshot(20e6, 40e6));
    let json = serde_json::to_value(&setup).unwrap();
    assert_eq!(json["hasLiquidity"], true);
    assert_eq!(json["setupProgress"], 1);
    assert_eq!(json["setupStatus"], "partial");
}

#[test]
fn test_composite_extremes() {
    assert!((WEIGHTS.sum() - 1.0).abs() < 1e-12);
    assert_eq!(composite_score(&CalibrationScores::default()), 0.0);
    let full = CalibrationScores {
        trend: 1.0,
        support: 1.0,
        volume: 1.0,
        technical: 1.0,
        short_position: 1.0,
        wick_rejection: 1.0,
    };
    assert_eq!(composite_score(&full), 100.0);
}

#[test]
fn test_calibration_of_empty_snapshot_is_weak() {
    let calibration = calibrate(&AssetSnapshot::default(), &[]);
    assert_eq!(calibration.composite_score, 0.0);
    assert_eq!(calibration.calibration_level, CalibrationLevel::Weak);
    assert_eq!(calibration.criteria.len(), 6);
    assert!(calibration
        .criteria
        .iter()
        .all(|c| c.status == CriterionStatus::Absent));
}

#[test]
fn test_calibration_of_capitulating_asset() {
    let asset = AssetSnapshot {
        symbol: "ETHUSDT".to_string(),
        price: 82.0,
        volume_24h: 30e6,
        market_cap: Some(100e6),
        percent_change_24h: -10.0,
        low_24h: Some(80.0),
        high_24h: Some(100.0),
        long_short_ratio: Some(0.5),
        ..Default::default()
    };
    // Lower wick 2 of a 2.5 range
    let candle = Candle::new(0, 82.0, 82.5, 80.0, 82.5, 1.0);

    let calibration = calibrate(&asset, &[candle]);
    assert_eq!(calibration.trend_score, 1.0);
    assert!((calibration.support_score - 0.9).abs() < 1e-9);
    assert!((calibration.volume_score - 1.0).abs() < 1e-9);
    assert_eq!(calibration.technical_score, 0.0);
    assert_eq!(calibration.short_position_score, 1.0);
    assert!((calibration.wick_rejection_score - 0.8).abs() < 1e-9);
    // 25 + 18 + 20 + 0 + 10 + 8
    assert_eq!(calibration.composite_score, 81.0);
    assert_eq!(calibration.calibration_level, CalibrationLevel::Excellent);
}

/// Six 1m candles rising 0.2 each; the last one is a hammer.
fn rising_with_hammer(spike: bool) -> Vec<Candle> {
    let mut candles: Vec<Candle> = (0..5)
        .map(|i| {
            let close = 100.0 + 0.2 * i as f64;
            let volume = if spike && i >= 3 { 40.0 } else { 10.0 };
            Candle::new(i * 60_000, close - 0.2, close + 0.05, close - 0.25, close, volume)
        })
        .collect();
    let volume = if spike { 40.0 } else { 10.0 };
    candles.push(Candle::new(5 * 60_000, 100.9, 101.01, 100.5, 101.0, volume));
    candles
}

#[test]
fn test_early_confluence_confirmed() {
    let one = rising_with_hammer(true);
    let five = rising_with_hammer(false);

    let early = detect_early_confluence(&one, &five, 1e9);
    assert!(early.short_term_momentum);
    assert!(early.rsi_momentum);
    assert!(early.volume_spike);
    assert!(early.pattern_formation);
    assert!(early.institutional_volume);
    assert!(early.is_early_confirmed);
    assert_eq!(early.signal_strength, SignalStrength::Strong);
    assert!((early.confluence_score - 1.0).abs() < 1e-9);
    assert!((early.probability - 0.8).abs() < 1e-9);
    // Pattern on the newest candle
    assert_eq!(early.timing_estimate_minutes, 2.0);
}

#[test]
fn test_early_confluence_without_institutional_volume() {
    let one = rising_with_hammer(true);
    let five = rising_with_hammer(false);

    let early = detect_early_confluence(&one, &five, 1e6);
    assert!(early.pattern_formation);
    assert!(!early.institutional_volume);
    assert!(!early.is_early_confirmed);
    assert_eq!(early.probability, 0.0);
    assert_eq!(early.timing_estimate_minutes, 0.0);
}
