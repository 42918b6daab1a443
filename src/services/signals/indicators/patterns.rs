//! Candlestick pattern classifiers.
//!
//! All classifiers are total: degenerate candles (`high == low`) classify as
//! `None` rather than producing ratios over a zero range.

use serde::{Deserialize, Serialize};

use crate::types::Candle;

/// Directional reading of a candlestick pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSignal {
    None,
    Bullish,
    Bearish,
}

impl PatternSignal {
    pub fn is_some(&self) -> bool {
        !matches!(self, PatternSignal::None)
    }
}

/// Engulfing pattern on a consecutive pair.
///
/// Bullish: `prev` bearish, `curr` bullish, `curr.open <= prev.close` and
/// `curr.close >= prev.open`. Bearish mirrors it.
pub fn classify_engulfing(prev: &Candle, curr: &Candle) -> PatternSignal {
    if prev.is_degenerate() || curr.is_degenerate() {
        return PatternSignal::None;
    }
    if prev.is_bearish() && curr.is_bullish() && curr.open <= prev.close && curr.close >= prev.open {
        PatternSignal::Bullish
    } else if prev.is_bullish()
        && curr.is_bearish()
        && curr.open >= prev.close
        && curr.close <= prev.open
    {
        PatternSignal::Bearish
    } else {
        PatternSignal::None
    }
}

/// Pin bar: a long rejection wick with a small body.
///
/// Bullish: lower wick > 2x body, lower wick > 60% of range, upper wick < body.
pub fn classify_pin_bar(candle: &Candle) -> PatternSignal {
    if candle.is_degenerate() {
        return PatternSignal::None;
    }
    let body = candle.body();
    let range = candle.range();
    let upper = candle.upper_wick();
    let lower = candle.lower_wick();

    if lower > 2.0 * body && lower > 0.6 * range && upper < body {
        PatternSignal::Bullish
    } else if upper > 2.0 * body && upper > 0.6 * range && lower < body {
        PatternSignal::Bearish
    } else {
        PatternSignal::None
    }
}

/// Hammer: lower wick ≥ 2x body, upper wick ≤ body, lower wick ≥ half the range.
pub fn is_hammer(candle: &Candle) -> bool {
    if candle.is_degenerate() {
        return false;
    }
    let body = candle.body();
    let lower = candle.lower_wick();
    lower >= 2.0 * body && candle.upper_wick() <= body && lower >= 0.5 * candle.range()
}

/// Shooting star: mirror of the hammer.
pub fn is_shooting_star(candle: &Candle) -> bool {
    if candle.is_degenerate() {
        return false;
    }
    let body = candle.body();
    let upper = candle.upper_wick();
    upper >= 2.0 * body && candle.lower_wick() <= body && upper >= 0.5 * candle.range()
}

/// The dominant wick is more than twice the body and at least half the range.
pub fn is_wick_dominant(candle: &Candle) -> bool {
    if candle.is_degenerate() {
        return false;
    }
    let wick = candle.upper_wick().max(candle.lower_wick());
    wick > 2.0 * candle.body() && wick >= 0.5 * candle.range()
}
