//! Counter-trend scorers. The oversold/overbought pair leans on the market
//! turn detector for the actual turn.

use super::card::{show, Rule, ScoreCard};
use super::context::ScoringContext;
use crate::services::signals::indicators::{classify_engulfing, classify_pin_bar, is_hammer, PatternSignal};
use crate::types::{Candle, TurnDirection};

/// Newest engulfing or pin bar signal over the last two candles.
fn reversal_pattern(candles: &[Candle]) -> PatternSignal {
    match candles {
        [.., prev, last] => match classify_engulfing(prev, last) {
            PatternSignal::None => classify_pin_bar(last),
            signal => signal,
        },
        [last] => classify_pin_bar(last),
        [] => PatternSignal::None,
    }
}

/// Stretched below EMA20 and due to snap back.
pub fn mean_reversion(ctx: &ScoringContext) -> ScoreCard {
    const STRETCH: Rule = Rule::new("stretched", "Close 2 ATR below EMA20", 30);
    const OVERSOLD: Rule = Rule::new("rsi_oversold", "RSI under 35", 25);
    const REJECTION: Rule = Rule::new("rejection", "Hammer or bullish pin bar", 20);
    const SUPPORT: Rule = Rule::new("near_support", "Within 1% of 20-candle low", 15);
    const VOLUME: Rule = Rule::new("volume", "Capitulation volume", 10);

    let stretched = match (ctx.ema20(), ctx.indicators.atr.last()) {
        (Some(ema), Some(atr)) => ctx.last_close() < ema - 2.0 * atr,
        _ => false,
    };
    let rsi = ctx.rsi();
    let rejection = ctx
        .last()
        .is_some_and(|c| is_hammer(c) || classify_pin_bar(c) == PatternSignal::Bullish);
    let low = ctx.prior_low(20);
    let volume_ratio = ctx.volume_ratio(3);

    ScoreCard::new()
        .check(STRETCH, stretched, show(ctx.distance_from_ema20_pct(), 2))
        .check(OVERSOLD, rsi.is_some_and(|r| r < 35.0), show(rsi, 1))
        .check(REJECTION, rejection, None)
        .check(SUPPORT, low.is_some_and(|l| ctx.last_close() <= l * 1.01), show(low, 4))
        .check(VOLUME, volume_ratio > 1.2, show(Some(volume_ratio), 2))
}

pub fn oversold_reversal(ctx: &ScoringContext) -> ScoreCard {
    const OVERSOLD: Rule = Rule::new("rsi_oversold", "RSI under 30 in last 3 candles", 25);
    const TURN: Rule = Rule::new("upward_turn", "Upward market turn", 30);
    const PATTERN: Rule = Rule::new("bullish_pattern", "Bullish engulfing or pin bar", 15);
    const SWING: Rule = Rule::new("swing_low", "Fresh swing low", 15);
    const VOLUME: Rule = Rule::new("volume", "Volume 1.3x average", 15);

    let lowest_rsi = ctx.indicators.rsi.values.iter().rev().take(3).copied().reduce(f64::min);
    let turn = ctx.turn();
    let volume_ratio = ctx.volume_ratio(3);

    ScoreCard::new()
        .check(OVERSOLD, lowest_rsi.is_some_and(|r| r < 30.0), show(lowest_rsi, 1))
        .check(TURN, turn.detected && turn.direction == TurnDirection::Upward, Some(turn.reason))
        .check(PATTERN, reversal_pattern(ctx.candles) == PatternSignal::Bullish, None)
        .check(SWING, ctx.recent_swing_low(ctx.swing_span()), None)
        .check(VOLUME, volume_ratio > 1.3, show(Some(volume_ratio), 2))
}

pub fn overbought_reversal(ctx: &ScoringContext) -> ScoreCard {
    const OVERBOUGHT: Rule = Rule::new("rsi_overbought", "RSI over 70 in last 3 candles", 25);
    const TURN: Rule = Rule::new("downward_turn", "Downward market turn", 30);
    const PATTERN: Rule = Rule::new("bearish_pattern", "Bearish engulfing or pin bar", 15);
    const SWING: Rule = Rule::new("swing_high", "Fresh swing high", 15);
    const VOLUME: Rule = Rule::new("volume", "Volume 1.3x average", 15);

    let highest_rsi = ctx.indicators.rsi.values.iter().rev().take(3).copied().reduce(f64::max);
    let turn = ctx.turn();
    let volume_ratio = ctx.volume_ratio(3);

    ScoreCard::new()
        .check(OVERBOUGHT, highest_rsi.is_some_and(|r| r > 70.0), show(highest_rsi, 1))
        .check(TURN, turn.detected && turn.direction == TurnDirection::Downward, Some(turn.reason))
        .check(PATTERN, reversal_pattern(ctx.candles) == PatternSignal::Bearish, None)
        .check(SWING, ctx.recent_swing_high(ctx.swing_span()), None)
        .check(VOLUME, volume_ratio > 1.3, show(Some(volume_ratio), 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversal_pattern_prefers_engulfing() {
        let prev = Candle::new(0, 10.0, 10.5, 8.5, 9.0, 1.0);
        let last = Candle::new(1, 8.8, 11.0, 8.7, 10.8, 1.0);
        assert_eq!(reversal_pattern(&[prev, last]), PatternSignal::Bullish);
        assert_eq!(reversal_pattern(&[]), PatternSignal::None);
    }
}
