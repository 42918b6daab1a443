//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::Indicator;
use crate::types::Candle;

/// EMA series over `prices`.
///
/// Seeded with the simple average of the first `period` prices, then
/// `ema = (price - prev) * α + prev` with `α = 2 / (period + 1)`.
/// Output has `len - period + 1` values; empty when `len < period`.
pub fn ema(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    // First EMA is SMA
    let sma = prices[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(prices.len() - period + 1);
    result.push(sma);

    let mut prev = sma;
    for price in &prices[period..] {
        prev = (price - prev) * multiplier + prev;
        result.push(prev);
    }

    result
}

/// EMA of candle closes.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Ema {
    fn id(&self) -> String {
        format!("ema{}", self.period)
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn values(&self, candles: &[Candle]) -> Vec<f64> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        ema(&closes, self.period)
    }
}
