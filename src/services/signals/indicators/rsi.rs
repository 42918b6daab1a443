//! Relative Strength Index (RSI) indicator.

use serde::{Deserialize, Serialize};

use crate::services::signals::Indicator;
use crate::types::{pct_change, Candle};

/// RSI series using Wilder's running average.
///
/// Initial average gain/loss come from the first `period` deltas; afterwards
/// `avg = (avg * (period - 1) + x) / period`. Output has `len - period`
/// values; empty when there are fewer than `period + 1` prices.
pub fn rsi(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() <= period {
        return Vec::new();
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let gain = |d: f64| if d > 0.0 { d } else { 0.0 };
    let loss = |d: f64| if d < 0.0 { -d } else { 0.0 };

    // Seed from the first `period` deltas
    let mut avg_gain = deltas[..period].iter().map(|d| gain(*d)).sum::<f64>() / period as f64;
    let mut avg_loss = deltas[..period].iter().map(|d| loss(*d)).sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(prices.len() - period);
    result.push(rsi_from_averages(avg_gain, avg_loss));

    let p = period as f64;
    for d in &deltas[period..] {
        avg_gain = (avg_gain * (p - 1.0) + gain(*d)) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss(*d)) / p;
        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Latest RSI reading, tagged with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RsiReading {
    /// True Wilder RSI.
    Wilder(f64),
    /// Below the warmup threshold: `clamp(50 + 2 * pct_change, 0, 100)`.
    /// A momentum heuristic, not RSI.
    Proxy(f64),
}

impl RsiReading {
    pub fn value(&self) -> f64 {
        match self {
            RsiReading::Wilder(v) | RsiReading::Proxy(v) => *v,
        }
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self, RsiReading::Proxy(_))
    }
}

/// Latest RSI value, degrading to the percent-change proxy for short runs.
pub fn rsi_reading(prices: &[f64], period: usize) -> RsiReading {
    if let Some(value) = rsi(prices, period).last() {
        return RsiReading::Wilder(*value);
    }
    match (prices.first(), prices.last()) {
        (Some(first), Some(last)) if prices.len() >= 2 => {
            RsiReading::Proxy((50.0 + 2.0 * pct_change(*first, *last)).clamp(0.0, 100.0))
        }
        _ => RsiReading::Proxy(50.0),
    }
}

/// RSI of candle closes.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Rsi {
    fn id(&self) -> String {
        format!("rsi{}", self.period)
    }

    fn warmup(&self) -> usize {
        self.period.saturating_add(1)
    }

    fn values(&self, candles: &[Candle]) -> Vec<f64> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        rsi(&closes, self.period)
    }
}
