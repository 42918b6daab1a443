//! Trend scorers: following, pullback and breakout.

use super::card::{show, Rule, ScoreCard};
use super::context::ScoringContext;
use super::momentum::regime;

pub fn trend_following(ctx: &ScoringContext) -> ScoreCard {
    const EMA_TREND: Rule = Rule::new("ema_trend", "EMA20 above EMA50", 20);
    const SLOPE: Rule = Rule::new("ema_slope", "EMA20 rising over 5 candles", 15);
    const ABOVE_EMA: Rule = Rule::new("above_ema20", "Close above EMA20", 15);
    const RSI_BAND: Rule = Rule::new("rsi_band", "RSI between 55 and 75", 15);
    const PERFORMANCE: Rule = Rule::new("performance", "Up more than 3% over 20 candles", 15);
    const HIGHER_TF: Rule = Rule::new("higher_timeframe", "Higher timeframe uptrend", 20);

    let rsi = ctx.rsi();
    let ema = &ctx.indicators.ema20;
    let rising = matches!((ema.last(), ema.back(5)), (Some(now), Some(then)) if now > then);
    let change = ctx.change_pct(20);
    let higher = ctx.confirmation_bullish();

    ScoreCard::new()
        .check(EMA_TREND, ctx.ema_bullish(), show(ctx.ema50(), 4))
        .check(SLOPE, rising, show(ema.last(), 4))
        .check(ABOVE_EMA, ctx.ema20().is_some_and(|e| ctx.last_close() > e), show(ctx.distance_from_ema20_pct(), 2))
        .check(RSI_BAND, rsi.is_some_and(|r| (55.0..=75.0).contains(&r)), show(rsi, 1))
        .check(PERFORMANCE, change > 3.0, show(Some(change), 2))
        .check(HIGHER_TF, higher == Some(true), Some(regime(higher)))
}

/// Buying a dip to EMA20 inside an established uptrend.
pub fn trend_pullback(ctx: &ScoringContext) -> ScoreCard {
    const EMA_TREND: Rule = Rule::new("ema_trend", "EMA20 above EMA50", 25);
    const TOUCH: Rule = Rule::new("ema_touch", "Pulled back to EMA20 and held EMA50", 25);
    const RSI_BAND: Rule = Rule::new("rsi_band", "RSI between 40 and 55", 20);
    const BULLISH: Rule = Rule::new("bullish_candle", "Last candle closed up", 15);
    const DRYING: Rule = Rule::new("volume_drying", "Pullback on lighter volume", 15);

    let rsi = ctx.rsi();
    let recent_low = ctx.recent(3).iter().map(|c| c.low).reduce(f64::min);
    let touched = match (ctx.ema20(), ctx.ema50(), recent_low) {
        (Some(fast), Some(slow), Some(low)) => low <= fast * 1.005 && ctx.last_close() > slow,
        _ => false,
    };
    let volume_ratio = ctx.volume_ratio(3);

    ScoreCard::new()
        .check(EMA_TREND, ctx.ema_bullish(), show(ctx.ema50(), 4))
        .check(TOUCH, touched, show(recent_low, 4))
        .check(RSI_BAND, rsi.is_some_and(|r| (40.0..=55.0).contains(&r)), show(rsi, 1))
        .check(BULLISH, ctx.last().is_some_and(|c| c.is_bullish()), None)
        .check(DRYING, volume_ratio > 0.0 && volume_ratio < 1.0, show(Some(volume_ratio), 2))
}

/// Close through the 20-candle high on expanding volume and range.
pub fn breakout(ctx: &ScoringContext) -> ScoreCard {
    const BREAK: Rule = Rule::new("range_break", "Close above 20-candle high", 30);
    const VOLUME: Rule = Rule::new("volume_surge", "Volume 1.8x average", 25);
    const EXPANSION: Rule = Rule::new("atr_expansion", "ATR expanding", 15);
    const RSI_BAND: Rule = Rule::new("rsi_band", "RSI between 55 and 80", 15);
    const STRONG_CLOSE: Rule = Rule::new("strong_close", "Close in top quarter of range", 15);

    let high = ctx.prior_high(20);
    let volume_ratio = ctx.volume_ratio(3);
    let atr = &ctx.indicators.atr;
    let expanding = matches!((atr.last(), atr.back(10)), (Some(now), Some(then)) if now > then);
    let rsi = ctx.rsi();
    let strong_close = ctx.last().is_some_and(|c| c.range() > 0.0 && (c.close - c.low) / c.range() >= 0.75);

    ScoreCard::new()
        .check(BREAK, high.is_some_and(|h| ctx.last_close() > h), show(high, 4))
        .check(VOLUME, volume_ratio > 1.8, show(Some(volume_ratio), 2))
        .check(EXPANSION, expanding, show(atr.last(), 4))
        .check(RSI_BAND, rsi.is_some_and(|r| (55.0..=80.0).contains(&r)), show(rsi, 1))
        .check(STRONG_CLOSE, strong_close, None)
}
