//! Market turn detection.
//!
//! Combines an EMA20/EMA50 regime cross (major turn) with short-window
//! candlestick and price-structure heuristics (micro turn). Each call is
//! independent; repeated-event suppression is the caller's job, see
//! [`TurnDeduplicator`].

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::trace;

use super::indicators::{classify_engulfing, ema, is_hammer, is_shooting_star, PatternSignal};
use crate::config::TurnConfig;
use crate::types::{Candle, MarketTurn, TurnDirection, TurnKey, TurnType};

/// Detect the single best turn on one timeframe. Major wins over micro.
///
/// Input is not checked here; run [`validate_candles`](crate::types::validate_candles)
/// first, as `OpportunityEngine::evaluate` does, or NaN closes leak into the EMAs.
pub fn detect_unified_market_turn(candles: &[Candle], interval: &str, config: &TurnConfig) -> MarketTurn {
    if let Some(turn) = detect_major_turn(candles, interval, config) {
        trace!(interval, reason = %turn.reason, "major turn");
        return turn;
    }
    if let Some(turn) = detect_micro_turn(candles, interval, config) {
        trace!(interval, reason = %turn.reason, "micro turn");
        return turn;
    }

    let timestamp = candles.last().map(|c| c.timestamp).unwrap_or(0);
    if candles.len() < config.micro_window {
        MarketTurn::none(
            interval,
            timestamp,
            format!("Insufficient data: {} candles, need {}", candles.len(), config.micro_window),
        )
    } else {
        MarketTurn::none(interval, timestamp, "No turn pattern detected")
    }
}

/// Run the detector on every interval, in interval-key order.
pub fn detect_turns(series: &BTreeMap<String, Vec<Candle>>, config: &TurnConfig) -> Vec<MarketTurn> {
    series
        .iter()
        .map(|(interval, candles)| detect_unified_market_turn(candles, interval, config))
        .collect()
}

/// Highest-confidence detected turn; the earliest wins ties.
pub fn best_turn(turns: &[MarketTurn]) -> Option<&MarketTurn> {
    turns.iter().filter(|t| t.detected).fold(None, |best, t| match best {
        Some(b) if b.confidence >= t.confidence => Some(b),
        _ => Some(t),
    })
}

/// EMA20/EMA50 cross confirmed by two candles on the new side.
fn detect_major_turn(candles: &[Candle], interval: &str, config: &TurnConfig) -> Option<MarketTurn> {
    if candles.len() < config.major_min_candles.max(config.slow_period) {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast = ema(&closes, config.fast_period);
    let slow = ema(&closes, config.slow_period);

    let (direction, aligned_cross) = find_confirmed_cross(&fast, &slow, config.major_scan_window)?;
    let aligned_len = fast.len().min(slow.len());
    let cross_index = candles.len() - aligned_len + aligned_cross;
    let cross = &candles[cross_index];
    let held = candles.len() - cross_index;

    let side = match direction {
        TurnDirection::Upward => "above",
        _ => "below",
    };
    Some(MarketTurn {
        detected: true,
        direction,
        turn_type: TurnType::Major,
        timestamp: cross.timestamp,
        interval: interval.to_string(),
        confidence: config.major_confidence,
        reason: format!(
            "EMA{} crossed {} EMA{} at {} and held for {} candles",
            config.fast_period,
            side,
            config.slow_period,
            format_timestamp(cross.timestamp),
            held
        ),
    })
}

/// Find the most recent confirmed cross among the last `window` aligned
/// points of `fast` and `slow`.
///
/// A bullish cross at aligned index `k - 1` requires `fast <= slow` at
/// `k - 2` and `fast > slow` at `k - 1` and `k`, and every later point must
/// stay above. Bearish mirrors it. Returns the direction and the aligned
/// index of the cross.
pub fn find_confirmed_cross(fast: &[f64], slow: &[f64], window: usize) -> Option<(TurnDirection, usize)> {
    let n = fast.len().min(slow.len());
    if n < 3 {
        return None;
    }
    let fast = &fast[fast.len() - n..];
    let slow = &slow[slow.len() - n..];
    let diff: Vec<f64> = fast.iter().zip(slow).map(|(f, s)| f - s).collect();

    let start = n.saturating_sub(window).max(2);
    for k in (start..n).rev() {
        let bullish = diff[k - 2] <= 0.0 && diff[k - 1] > 0.0 && diff[k] > 0.0;
        let bearish = diff[k - 2] >= 0.0 && diff[k - 1] < 0.0 && diff[k] < 0.0;
        if bullish {
            let held = diff[k..].iter().all(|d| *d > 0.0);
            return held.then_some((TurnDirection::Upward, k - 1));
        }
        if bearish {
            let held = diff[k..].iter().all(|d| *d < 0.0);
            return held.then_some((TurnDirection::Downward, k - 1));
        }
    }
    None
}

/// Short-window reversal patterns on the last `micro_window` candles.
fn detect_micro_turn(candles: &[Candle], interval: &str, config: &TurnConfig) -> Option<MarketTurn> {
    if config.micro_window < 3 || candles.len() < config.micro_window {
        return None;
    }
    let window = &candles[candles.len() - config.micro_window..];
    let last = &window[window.len() - 1];
    let prev = &window[window.len() - 2];

    let (direction, reason) = match classify_engulfing(prev, last) {
        PatternSignal::Bullish => (TurnDirection::Upward, "Bullish engulfing".to_string()),
        PatternSignal::Bearish => (TurnDirection::Downward, "Bearish engulfing".to_string()),
        PatternSignal::None if is_hammer(last) => (TurnDirection::Upward, "Hammer".to_string()),
        PatternSignal::None if is_shooting_star(last) => {
            (TurnDirection::Downward, "Shooting star".to_string())
        }
        PatternSignal::None => exhaustion(window, config)?,
    };

    Some(MarketTurn {
        detected: true,
        direction,
        turn_type: TurnType::Micro,
        timestamp: last.timestamp,
        interval: interval.to_string(),
        confidence: config.micro_confidence,
        reason: format!("{} at {}", reason, format_timestamp(last.timestamp)),
    })
}

/// Three monotonic closes ending at the recent extreme.
fn exhaustion(window: &[Candle], config: &TurnConfig) -> Option<(TurnDirection, String)> {
    let n = window.len();
    let (c0, c1, c2) = (window[n - 3].close, window[n - 2].close, window[n - 1].close);
    let last = &window[n - 1];
    let recent = &window[n.saturating_sub(config.extreme_window.max(1))..];

    let recent_low = recent.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let recent_high = recent.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);

    if c0 > c1 && c1 > c2 && last.low <= recent_low * (1.0 + config.extreme_tolerance) {
        return Some((
            TurnDirection::Upward,
            format!("Selling exhaustion at {}-candle low", recent.len()),
        ));
    }
    if c0 < c1 && c1 < c2 && last.high >= recent_high * (1.0 - config.extreme_tolerance) {
        return Some((
            TurnDirection::Downward,
            format!("Buying exhaustion at {}-candle high", recent.len()),
        ));
    }
    None
}

fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Caller-owned record of turns already reported.
#[derive(Debug, Default)]
pub struct TurnDeduplicator {
    seen: HashSet<TurnKey>,
}

impl TurnDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a detected turn is observed for `symbol`.
    pub fn observe(&mut self, symbol: &str, turn: &MarketTurn) -> bool {
        turn.detected && self.seen.insert(turn.key(symbol))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
