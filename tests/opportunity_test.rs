//! Opportunity engine tests

use confluence::config::EngineConfig;
use confluence::error::EngineError;
use confluence::services::OpportunityEngine;
use confluence::types::*;

/// Geometric trend with a fixed relative wick.
fn trend(n: usize, step: f64, start_ms: i64) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let open = 100.0 * step.powi(i as i32);
            let close = open * step;
            Candle::new(
                start_ms + i as i64 * 900_000,
                open,
                open.max(close) * 1.002,
                open.min(close) * 0.998,
                close,
                1_000.0,
            )
        })
        .collect()
}

fn symbol(name: &str, step: f64) -> SymbolMarketData {
    SymbolMarketData::new(name)
        .with_candles("15m", trend(80, step, 0))
        .with_candles("1h", trend(80, step, 0))
}

#[test]
fn test_uptrend_outscores_downtrend() {
    let engine = OpportunityEngine::default();
    let request = OpportunityRequest::new(StrategyModality::DayTrade);

    let up = engine.evaluate(&symbol("UPUSDT", 1.005), &request).unwrap();
    let down = engine.evaluate(&symbol("DOWNUSDT", 0.995), &request).unwrap();

    assert!(up.score > down.score, "{} vs {}", up.score, down.score);
    assert_eq!(up.conditions.len(), 7);
    assert!(up.conditions.iter().any(|c| c.id == "ema_trend" && c.met));
    assert!(down.conditions.iter().any(|c| c.id == "ema_trend" && !c.met));
    assert_eq!(up.timeframes, vec!["15m".to_string(), "1h".to_string()]);
}

#[test]
fn test_ranking_breaks_ties_by_symbol() {
    let engine = OpportunityEngine::default();
    let request = OpportunityRequest::new(StrategyModality::DayTrade);
    let data = vec![
        symbol("ETHUSDT", 1.005),
        SymbolMarketData::new("AAVEUSDT").with_candles("15m", trend(10, 1.005, 0)),
        symbol("BTCUSDT", 1.005),
    ];

    let ranked = engine.rank(&data, &request).unwrap();
    let order: Vec<&str> = ranked.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(order, vec!["BTCUSDT", "ETHUSDT", "AAVEUSDT"]);
    assert_eq!(ranked[0].score, ranked[1].score);
    assert_eq!(ranked[2].score, 0);
}

#[test]
fn test_ranking_is_deterministic() {
    let engine = OpportunityEngine::default();
    let data: Vec<SymbolMarketData> = [("SOLUSDT", 1.004), ("ADAUSDT", 0.997), ("XRPUSDT", 1.001)]
        .iter()
        .map(|(name, step)| symbol(name, *step))
        .collect();

    for modality in StrategyModality::ALL {
        let request = OpportunityRequest::with_timeframes(
            modality,
            vec!["15m".to_string(), "1h".to_string()],
        );
        let first = serde_json::to_string(&engine.rank(&data, &request).unwrap()).unwrap();
        let second = serde_json::to_string(&engine.rank(&data, &request).unwrap()).unwrap();
        assert_eq!(first, second, "{}", modality);
    }
}

#[test]
fn test_every_modality_produces_a_narrative() {
    let engine = OpportunityEngine::default();
    let data = symbol("BTCUSDT", 1.003);

    for modality in StrategyModality::ALL {
        let request = OpportunityRequest::with_timeframes(modality, vec!["15m".to_string()]);
        let score = engine.evaluate(&data, &request).unwrap();
        assert_eq!(score.modality, modality);
        assert!(score.score <= 100);
        assert!(!score.conditions.is_empty());
        let expected = format!(
            "{} {} opportunity for BTCUSDT: {}/{} conditions met.",
            OpportunityTier::from_score(score.score).label(),
            modality.label(),
            score.met_conditions(),
            score.conditions.len()
        );
        assert!(score.narrative.starts_with(&expected), "{}", score.narrative);
    }
}

#[test]
fn test_insufficient_primary_data() {
    let engine = OpportunityEngine::default();
    let data = SymbolMarketData::new("BTCUSDT").with_candles("15m", trend(49, 1.01, 0));
    let score = engine
        .evaluate(&data, &OpportunityRequest::new(StrategyModality::Breakout))
        .unwrap();

    assert_eq!(score.score, 0);
    assert_eq!(score.conditions.len(), 1);
    assert_eq!(score.conditions[0].id, "insufficient_data");
    assert_eq!(score.conditions[0].value.as_deref(), Some("49 candles on 15m, need 50"));
    assert_eq!(
        score.narrative,
        "Low breakout opportunity for BTCUSDT: 0/1 conditions met."
    );
}

#[test]
fn test_min_candles_is_configurable() {
    let engine = OpportunityEngine::new(EngineConfig {
        min_candles: 20,
        ..Default::default()
    });
    let data = SymbolMarketData::new("BTCUSDT").with_candles("15m", trend(30, 1.01, 0));
    let score = engine
        .evaluate(&data, &OpportunityRequest::new(StrategyModality::DayTrade))
        .unwrap();
    assert!(score.conditions.iter().all(|c| c.id != "insufficient_data"));
}

#[test]
fn test_non_finite_input_is_rejected() {
    let mut candles = trend(60, 1.0, 0);
    candles[10].close = f64::NAN;
    let data = SymbolMarketData::new("BTCUSDT").with_candles("15m", candles);

    let engine = OpportunityEngine::default();
    let err = engine
        .rank(&[data], &OpportunityRequest::new(StrategyModality::DayTrade))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::NonFinite {
            context: "BTCUSDT 15m".to_string(),
            index: 10,
            field: "close",
        }
    );
}

#[test]
fn test_invalid_engine_parameters_are_rejected() {
    let engine = OpportunityEngine::new(EngineConfig {
        swing_lookback: 0,
        ..Default::default()
    });
    let result = engine.evaluate(&symbol("BTCUSDT", 1.0), &OpportunityRequest::new(StrategyModality::SwingTrade));
    assert!(matches!(result, Err(EngineError::InvalidParameter(_))));
}

#[test]
fn test_order_book_imbalance_uses_depth() {
    let book = OrderBookDepth {
        bids: vec![
            OrderBookLevel { price: 99.95, quantity: 40.0 },
            OrderBookLevel { price: 99.5, quantity: 20.0 },
        ],
        asks: vec![OrderBookLevel { price: 100.02, quantity: 5.0 }],
        last_update_id: 7,
    };
    let data = SymbolMarketData::new("BTCUSDT")
        .with_candles("5m", trend(60, 1.001, 0))
        .with_order_book(book);

    let engine = OpportunityEngine::default();
    let score = engine
        .evaluate(&data, &OpportunityRequest::new(StrategyModality::OrderBookImbalance))
        .unwrap();
    let met = |id: &str| score.conditions.iter().any(|c| c.id == id && c.met);
    assert!(met("book_imbalance"));
    assert!(met("tight_spread"));
    assert!(met("near_mid_bids"));
    assert!(met("price_holding"));
    assert!(score.score >= 85);
}

#[test]
fn test_institutional_setup_scorer_reads_asset() {
    let asset = AssetSnapshot {
        symbol: "BTCUSDT".to_string(),
        price: 100.0,
        volume_24h: 60e6,
        market_cap: Some(100e6),
        percent_change_24h: -1.0,
        ..Default::default()
    };
    let data = SymbolMarketData::new("BTCUSDT")
        .with_candles("1h", trend(60, 1.0, 0))
        .with_asset(asset);

    let engine = OpportunityEngine::default();
    let score = engine
        .evaluate(&data, &OpportunityRequest::new(StrategyModality::InstitutionalSetup))
        .unwrap();
    let met: Vec<&str> = score
        .conditions
        .iter()
        .filter(|c| c.met)
        .map(|c| c.id.as_str())
        .collect();
    // Liquidity (15) and order block (15)
    assert!(met.contains(&"liquidity"));
    assert!(met.contains(&"order_block"));
    assert_eq!(score.conditions.len(), 8);
}

#[test]
fn test_modality_from_str() {
    assert_eq!("day_trade".parse::<StrategyModality>(), Ok(StrategyModality::DayTrade));
    assert_eq!("Order-Book-Imbalance".parse::<StrategyModality>(), Ok(StrategyModality::OrderBookImbalance));
    assert_eq!(
        "martingale".parse::<StrategyModality>(),
        Err(EngineError::UnknownModality("martingale".to_string()))
    );
}

#[test]
fn test_negative_asset_values_are_rejected() {
    let asset = AssetSnapshot {
        symbol: "BTCUSDT".to_string(),
        price: -100.0,
        volume_24h: -5e6,
        ..Default::default()
    };
    let data = SymbolMarketData::new("BTCUSDT")
        .with_candles("1h", trend(60, 1.0, 0))
        .with_asset(asset);

    let engine = OpportunityEngine::default();
    let result = engine.evaluate(
        &data,
        &OpportunityRequest::new(StrategyModality::InstitutionalCalibration),
    );
    assert_eq!(
        result,
        Err(EngineError::NegativeValue {
            context: "BTCUSDT asset".to_string(),
            index: 0,
            field: "price",
        })
    );
}

#[test]
fn test_signed_asset_fields_may_be_negative() {
    let asset = AssetSnapshot {
        symbol: "BTCUSDT".to_string(),
        price: 100.0,
        volume_24h: 5e6,
        percent_change_24h: -8.0,
        momentum: Some(-3.0),
        open_interest_change: Some(-2.0),
        ..Default::default()
    };
    assert_eq!(asset.validate(), Ok(()));

    let crossed = AssetSnapshot {
        low_24h: Some(-1.0),
        ..asset
    };
    assert!(matches!(
        crossed.validate(),
        Err(EngineError::NegativeValue { field: "low_24h", .. })
    ));
}

#[test]
fn test_disabled_turn_windows_are_rejected() {
    let mut config = EngineConfig::default();
    config.turn.major_scan_window = 0;
    let engine = OpportunityEngine::new(config);
    let result = engine.evaluate(
        &symbol("BTCUSDT", 1.005),
        &OpportunityRequest::new(StrategyModality::OversoldReversal),
    );
    assert!(matches!(result, Err(EngineError::InvalidParameter(_))));
}

#[test]
fn test_huge_swing_lookback_does_not_overflow() {
    let engine = OpportunityEngine::new(EngineConfig {
        swing_lookback: usize::MAX / 2 + 1,
        ..Default::default()
    });
    let data = symbol("BTCUSDT", 0.995);

    for modality in [
        StrategyModality::OversoldReversal,
        StrategyModality::OverboughtReversal,
        StrategyModality::LiquiditySweep,
        StrategyModality::SwingTrade,
    ] {
        let request = OpportunityRequest::with_timeframes(modality, vec!["15m".to_string()]);
        let score = engine.evaluate(&data, &request).unwrap();
        assert!(score.score <= 100);
        assert!(score.conditions.iter().all(|c| c.id != "swing_low" || !c.met));
    }
}

#[test]
fn test_calibration_scorer_lists_every_criterion() {
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
    let data = SymbolMarketData::new("ETHUSDT")
        .with_candles("1h", trend(60, 1.0, 0))
        .with_asset(asset);

    let engine = OpportunityEngine::default();
    let score = engine
        .evaluate(&data, &OpportunityRequest::new(StrategyModality::InstitutionalCalibration))
        .unwrap();
    let ids: Vec<&str> = score.conditions.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["composite", "trend", "support", "volume", "technical", "short_position", "wick_rejection"]
    );

    let find = |id: &str| score.conditions.iter().find(|c| c.id == id).unwrap();
    assert!(find("short_position").met);
    assert_eq!(find("short_position").value.as_deref(), Some("1.00"));
    // Flat closes put RSI at 100, no momentum or open interest
    assert!(!find("technical").met);
    assert_eq!(find("technical").value.as_deref(), Some("0.00"));
}
