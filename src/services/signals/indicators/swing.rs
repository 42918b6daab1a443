//! Swing high/low detection.

use serde::{Deserialize, Serialize};

use crate::types::Candle;

/// Indices of local extremes in a candle sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingPoints {
    pub swing_highs: Vec<usize>,
    pub swing_lows: Vec<usize>,
}

impl SwingPoints {
    pub fn last_high<'a>(&self, candles: &'a [Candle]) -> Option<&'a Candle> {
        self.swing_highs.last().and_then(|i| candles.get(*i))
    }

    pub fn last_low<'a>(&self, candles: &'a [Candle]) -> Option<&'a Candle> {
        self.swing_lows.last().and_then(|i| candles.get(*i))
    }

    /// Whether the last two swing lows and highs both step upward.
    pub fn higher_highs_and_lows(&self, candles: &[Candle]) -> bool {
        rising(&self.swing_highs, candles, |c| c.high) && rising(&self.swing_lows, candles, |c| c.low)
    }

    /// Whether the last two swing lows and highs both step downward.
    pub fn lower_highs_and_lows(&self, candles: &[Candle]) -> bool {
        falling(&self.swing_highs, candles, |c| c.high) && falling(&self.swing_lows, candles, |c| c.low)
    }
}

fn last_two(indices: &[usize], candles: &[Candle], field: fn(&Candle) -> f64) -> Option<(f64, f64)> {
    match indices {
        [.., a, b] => Some((field(candles.get(*a)?), field(candles.get(*b)?))),
        _ => None,
    }
}

fn rising(indices: &[usize], candles: &[Candle], field: fn(&Candle) -> f64) -> bool {
    last_two(indices, candles, field).is_some_and(|(prev, last)| last > prev)
}

fn falling(indices: &[usize], candles: &[Candle], field: fn(&Candle) -> f64) -> bool {
    last_two(indices, candles, field).is_some_and(|(prev, last)| last < prev)
}

/// Find swing highs and lows.
///
/// Index `i` is a swing high iff its high is strictly greater than every
/// other high in `[i - lookback, i + lookback]`; lows mirror this. Candles
/// within `lookback` of either end are never classified.
pub fn detect_swing_high_low(candles: &[Candle], lookback: usize) -> SwingPoints {
    let mut points = SwingPoints::default();
    let span = lookback.checked_mul(2).and_then(|w| w.checked_add(1));
    if lookback == 0 || span.map_or(true, |span| candles.len() < span) {
        return points;
    }

    for i in lookback..candles.len() - lookback {
        let window = (i - lookback..=i + lookback).filter(|j| *j != i);
        let (mut is_high, mut is_low) = (true, true);
        for j in window {
            if candles[j].high >= candles[i].high {
                is_high = false;
            }
            if candles[j].low <= candles[i].low {
                is_low = false;
            }
            if !is_high && !is_low {
                break;
            }
        }
        if is_high {
            points.swing_highs.push(i);
        }
        if is_low {
            points.swing_lows.push(i);
        }
    }

    points
}
