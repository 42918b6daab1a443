//! Timeframe-driven scorers: scalping, day trading and swing trading.

use super::card::{show, Rule, ScoreCard};
use super::context::ScoringContext;
use crate::services::signals::detect_early_confluence;

/// Fast entries on 1m/5m candles.
pub fn scalping(ctx: &ScoringContext) -> ScoreCard {
    const EMA_TREND: Rule = Rule::new("ema_trend", "EMA20 above EMA50", 15);
    const RSI_BAND: Rule = Rule::new("rsi_band", "RSI between 45 and 70", 15);
    const VOLUME: Rule = Rule::new("volume_spike", "Recent volume spike", 15);
    const SPREAD: Rule = Rule::new("tight_spread", "Spread under 0.05%", 10);
    const BIDS: Rule = Rule::new("bid_pressure", "Bids outweigh asks", 10);
    const ATR: Rule = Rule::new("atr_range", "ATR between 0.1% and 1.5%", 10);
    const EARLY: Rule = Rule::new("early_confluence", "Early confluence on 1m/5m", 25);

    let rsi = ctx.rsi();
    let volume_ratio = ctx.volume_ratio(3);
    let spread = ctx.order_book().and_then(|b| b.spread_pct());
    let imbalance = ctx.order_book().map(|b| b.imbalance());
    let atr_pct = ctx.atr_pct();

    // Early confluence needs both short intervals
    let volume_24h = ctx.asset().map(|a| a.volume_24h).unwrap_or(0.0);
    let early = detect_early_confluence(ctx.data.series("1m"), ctx.data.series("5m"), volume_24h);

    ScoreCard::new()
        .check(EMA_TREND, ctx.ema_bullish(), show(ctx.ema20(), 4))
        .check(RSI_BAND, rsi.is_some_and(|r| (45.0..=70.0).contains(&r)), show(rsi, 1))
        .check(VOLUME, volume_ratio > 1.5, show(Some(volume_ratio), 2))
        .check(SPREAD, spread.is_some_and(|s| s < 0.05), show(spread, 4))
        .check(BIDS, imbalance.is_some_and(|i| i > 0.1), show(imbalance, 3))
        .check(ATR, atr_pct.is_some_and(|a| (0.1..=1.5).contains(&a)), show(atr_pct, 3))
        .check(
            EARLY,
            early.confluence_score >= 0.5,
            Some(format!("{:.2} ({:?})", early.confluence_score, early.signal_strength).to_lowercase()),
        )
}

/// Intraday continuation on 15m with a 1h regime check.
pub fn day_trade(ctx: &ScoringContext) -> ScoreCard {
    const EMA_TREND: Rule = Rule::new("ema_trend", "EMA20 above EMA50", 20);
    const ABOVE_EMA: Rule = Rule::new("above_ema20", "Close above EMA20", 10);
    const RSI_BAND: Rule = Rule::new("rsi_band", "RSI between 50 and 70", 15);
    const MOMENTUM: Rule = Rule::new("momentum", "Up more than 0.5% over 4 candles", 15);
    const VOLUME: Rule = Rule::new("volume", "Volume above average", 15);
    const HIGHER_TF: Rule = Rule::new("higher_timeframe", "Higher timeframe uptrend", 15);
    const ATR: Rule = Rule::new("atr_range", "ATR between 0.3% and 3%", 10);

    let rsi = ctx.rsi();
    let change = ctx.change_pct(4);
    let volume_ratio = ctx.volume_ratio(5);
    let higher = ctx.confirmation_bullish();
    let atr_pct = ctx.atr_pct();

    ScoreCard::new()
        .check(EMA_TREND, ctx.ema_bullish(), show(ctx.ema50(), 4))
        .check(ABOVE_EMA, ctx.ema20().is_some_and(|e| ctx.last_close() > e), show(ctx.distance_from_ema20_pct(), 2))
        .check(RSI_BAND, rsi.is_some_and(|r| (50.0..=70.0).contains(&r)), show(rsi, 1))
        .check(MOMENTUM, change > 0.5, show(Some(change), 2))
        .check(VOLUME, volume_ratio > 1.2, show(Some(volume_ratio), 2))
        .check(HIGHER_TF, higher == Some(true), Some(regime(higher)))
        .check(ATR, atr_pct.is_some_and(|a| (0.3..=3.0).contains(&a)), show(atr_pct, 3))
}

/// Multi-day positioning on 4h structure with a daily regime check.
pub fn swing_trade(ctx: &ScoringContext) -> ScoreCard {
    const STRUCTURE: Rule = Rule::new("structure", "Higher highs and higher lows", 25);
    const EMA_TREND: Rule = Rule::new("ema_trend", "EMA20 above EMA50", 20);
    const RSI_BAND: Rule = Rule::new("rsi_band", "RSI between 40 and 65", 15);
    const PULLBACK: Rule = Rule::new("near_ema20", "Close within 1.5% of EMA20", 15);
    const HIGHER_TF: Rule = Rule::new("higher_timeframe", "Higher timeframe uptrend", 15);
    const VOLUME: Rule = Rule::new("volume", "Volume holding up", 10);

    let rsi = ctx.rsi();
    let distance = ctx.distance_from_ema20_pct();
    let higher = ctx.confirmation_bullish();
    let volume_ratio = ctx.volume_ratio(5);

    ScoreCard::new()
        .check(
            STRUCTURE,
            ctx.swings.higher_highs_and_lows(ctx.candles),
            Some(format!("{} highs / {} lows", ctx.swings.swing_highs.len(), ctx.swings.swing_lows.len())),
        )
        .check(EMA_TREND, ctx.ema_bullish(), show(ctx.ema50(), 4))
        .check(RSI_BAND, rsi.is_some_and(|r| (40.0..=65.0).contains(&r)), show(rsi, 1))
        .check(PULLBACK, distance.is_some_and(|d| d.abs() < 1.5), show(distance, 2))
        .check(HIGHER_TF, higher == Some(true), Some(regime(higher)))
        .check(VOLUME, volume_ratio > 1.0, show(Some(volume_ratio), 2))
}

pub(super) fn regime(bullish: Option<bool>) -> String {
    match bullish {
        Some(true) => "bullish".to_string(),
        Some(false) => "bearish".to_string(),
        None => "n/a".to_string(),
    }
}
