//! Indicator and Scoring Property Tests
//!
//! Properties that must hold for any well-formed candle input.

use confluence::services::opportunity::rank_opportunities;
use confluence::services::signals::indicators::*;
use confluence::services::OpportunityEngine;
use confluence::types::*;
use proptest::prelude::*;

prop_compose! {
    fn candle()
        (
            open in 1.0f64..1_000.0,
            close in 1.0f64..1_000.0,
            up in 0.0f64..50.0,
            down in 0.0f64..50.0,
            volume in 0.0f64..1e6,
        ) -> Candle {
        let high = open.max(close) + up;
        let low = (open.min(close) - down).max(0.0);
        Candle::new(0, open, high, low, close, volume)
    }
}

prop_compose! {
    fn candles(min: usize, max: usize)
        (series in prop::collection::vec(candle(), min..max)) -> Vec<Candle> {
        series
            .into_iter()
            .enumerate()
            .map(|(i, c)| Candle { timestamp: i as i64 * 60_000, ..c })
            .collect()
    }
}

proptest! {
    #[test]
    fn ema_is_empty_iff_too_short(
        prices in prop::collection::vec(1.0f64..10_000.0, 0..100),
        period in 1usize..60,
    ) {
        let values = ema(&prices, period);
        prop_assert_eq!(values.is_empty(), prices.len() < period);
        if !values.is_empty() {
            prop_assert_eq!(values.len(), prices.len() - period + 1);
        }
    }

    #[test]
    fn rsi_stays_in_range(
        prices in prop::collection::vec(1.0f64..10_000.0, 0..120),
        period in 1usize..30,
    ) {
        for value in rsi(&prices, period) {
            prop_assert!((0.0..=100.0).contains(&value), "rsi {}", value);
        }
        let reading = rsi_reading(&prices, period).value();
        prop_assert!((0.0..=100.0).contains(&reading));
    }

    #[test]
    fn classifiers_are_total(prev in candle(), curr in candle()) {
        let _ = classify_engulfing(&prev, &curr);
        let _ = classify_pin_bar(&curr);
        let _ = is_hammer(&curr);
        let _ = is_shooting_star(&curr);
        let _ = is_wick_dominant(&curr);
    }

    #[test]
    fn degenerate_candles_classify_as_none(price in 1.0f64..1_000.0, other in candle()) {
        let flat = Candle::new(0, price, price, price, price, 1.0);
        prop_assert_eq!(classify_pin_bar(&flat), PatternSignal::None);
        prop_assert_eq!(classify_engulfing(&flat, &other), PatternSignal::None);
        prop_assert_eq!(classify_engulfing(&other, &flat), PatternSignal::None);
        prop_assert!(!is_wick_dominant(&flat));
    }

    #[test]
    fn swing_points_stay_inside_lookback(series in candles(0, 80), lookback in 1usize..8) {
        let swings = detect_swing_high_low(&series, lookback);
        for index in swings.swing_highs.iter().chain(swings.swing_lows.iter()) {
            prop_assert!(*index >= lookback);
            prop_assert!(*index + lookback < series.len());
        }
    }

    #[test]
    fn scores_are_bounded_and_ranked(
        a in candles(50, 90),
        b in candles(50, 90),
        modality_index in 0usize..15,
    ) {
        let modality = StrategyModality::ALL[modality_index];
        let request = OpportunityRequest::new(modality);
        let primary = request.primary().to_string();
        let data = vec![
            SymbolMarketData::new("AAAUSDT").with_candles(&primary, a),
            SymbolMarketData::new("BBBUSDT").with_candles(&primary, b),
        ];

        let engine = OpportunityEngine::default();
        let ranked = engine.rank(&data, &request).unwrap();
        prop_assert_eq!(ranked.len(), 2);
        for score in &ranked {
            prop_assert!(score.score <= 100);
            prop_assert!(!score.conditions.is_empty());
        }
        prop_assert!(ranked[0].score >= ranked[1].score);
        prop_assert_eq!(rank_opportunities(ranked.clone()), ranked);
    }
}
