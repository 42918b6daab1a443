//! Average True Range (ATR) indicator.

use crate::services::signals::Indicator;
use crate::types::Candle;

/// True Range = max(High-Low, |High-PrevClose|, |Low-PrevClose|).
/// The first candle has no previous close and uses High-Low.
pub fn true_range(current: &Candle, previous: Option<&Candle>) -> f64 {
    let hl = current.high - current.low;
    match previous {
        Some(prev) => {
            let hc = (current.high - prev.close).abs();
            let lc = (current.low - prev.close).abs();
            hl.max(hc).max(lc)
        }
        None => hl,
    }
}

/// ATR series with Wilder smoothing.
///
/// Seeded with the simple average of the first `period` true ranges, then
/// `atr = (atr * (period - 1) + tr) / period`. Output has `len - period + 1`
/// values; empty when `len < period`.
pub fn atr(candles: &[Candle], period: usize) -> Vec<f64> {
    if period == 0 || candles.len() < period {
        return Vec::new();
    }

    let true_ranges: Vec<f64> = candles
        .iter()
        .enumerate()
        .map(|(i, c)| true_range(c, i.checked_sub(1).map(|p| &candles[p])))
        .collect();

    let initial = true_ranges[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(candles.len() - period + 1);
    result.push(initial);

    let p = period as f64;
    let mut current = initial;
    for tr in &true_ranges[period..] {
        current = (current * (p - 1.0) + tr) / p;
        result.push(current);
    }

    result
}

/// Wilder ATR over candles.
///
/// Higher ATR = higher volatility.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Atr {
    fn id(&self) -> String {
        format!("atr{}", self.period)
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn values(&self, candles: &[Candle]) -> Vec<f64> {
        atr(candles, self.period)
    }
}
