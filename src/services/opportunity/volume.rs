//! Volume scorers.

use super::card::{show, Rule, ScoreCard};
use super::context::ScoringContext;

pub fn volume_spike(ctx: &ScoringContext) -> ScoreCard {
    const SPIKE: Rule = Rule::new("volume_spike", "Volume 2x average", 35);
    const BULLISH: Rule = Rule::new("bullish_candle", "Spike candle closed up", 15);
    const MOVE: Rule = Rule::new("price_move", "Up more than 1% over 3 candles", 20);
    const RSI: Rule = Rule::new("rsi_room", "RSI under 75", 15);
    const ABOVE_EMA: Rule = Rule::new("above_ema20", "Close above EMA20", 15);

    let volume_ratio = ctx.volume_ratio(3);
    let change = ctx.change_pct(3);
    let rsi = ctx.rsi();

    ScoreCard::new()
        .check(SPIKE, volume_ratio > 2.0, show(Some(volume_ratio), 2))
        .check(BULLISH, ctx.last().is_some_and(|c| c.is_bullish()), None)
        .check(MOVE, change > 1.0, show(Some(change), 2))
        .check(RSI, rsi.is_some_and(|r| r < 75.0), show(rsi, 1))
        .check(ABOVE_EMA, ctx.ema20().is_some_and(|e| ctx.last_close() > e), show(ctx.distance_from_ema20_pct(), 2))
}

/// Quiet, tight range with volume building on up candles.
pub fn volume_accumulation(ctx: &ScoringContext) -> ScoreCard {
    const RISING: Rule = Rule::new("volume_rising", "Volume 1.2x average over 10 candles", 25);
    const TIGHT: Rule = Rule::new("tight_range", "20-candle range under 5%", 25);
    const UP_VOLUME: Rule = Rule::new("up_volume", "Up-candle volume exceeds down-candle volume", 25);
    const RSI_BAND: Rule = Rule::new("rsi_band", "RSI between 40 and 60", 15);
    const ABOVE_EMA: Rule = Rule::new("above_ema50", "Close above EMA50", 10);

    let volume_ratio = ctx.volume_ratio(10);
    let window = ctx.recent(20);
    let high = window.iter().map(|c| c.high).reduce(f64::max);
    let low = window.iter().map(|c| c.low).reduce(f64::min);
    let close = ctx.last_close();
    let range_pct = match (high, low) {
        (Some(h), Some(l)) if close > 0.0 => Some((h - l) / close * 100.0),
        _ => None,
    };
    let (up, down) = window.iter().fold((0.0, 0.0), |(up, down), c| {
        if c.is_bullish() {
            (up + c.volume, down)
        } else if c.is_bearish() {
            (up, down + c.volume)
        } else {
            (up, down)
        }
    });
    let rsi = ctx.rsi();

    ScoreCard::new()
        .check(RISING, volume_ratio > 1.2, show(Some(volume_ratio), 2))
        .check(TIGHT, range_pct.is_some_and(|r| r < 5.0), show(range_pct, 2))
        .check(UP_VOLUME, up > down, Some(format!("{:.0} vs {:.0}", up, down)))
        .check(RSI_BAND, rsi.is_some_and(|r| (40.0..=60.0).contains(&r)), show(rsi, 1))
        .check(ABOVE_EMA, ctx.ema50().is_some_and(|e| close > e), show(ctx.ema50(), 4))
}
