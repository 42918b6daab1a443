use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// OHLCV candle. Sequences are ordered oldest to newest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time, unix milliseconds.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Close above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// A candle with no range carries no shape information.
    pub fn is_degenerate(&self) -> bool {
        self.high == self.low
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }
}

/// Extract the close column.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Percentage change from `from` to `to`; zero when `from` is not positive.
pub fn pct_change(from: f64, to: f64) -> f64 {
    if from > 0.0 {
        (to - from) / from * 100.0
    } else {
        0.0
    }
}

/// Fail fast on NaN/infinite or negative values.
pub fn validate_candles(context: &str, candles: &[Candle]) -> Result<()> {
    for (index, candle) in candles.iter().enumerate() {
        let fields = [
            ("open", candle.open),
            ("high", candle.high),
            ("low", candle.low),
            ("close", candle.close),
            ("volume", candle.volume),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(EngineError::NonFinite {
                    context: context.to_string(),
                    index,
                    field,
                });
            }
            if value < 0.0 {
                return Err(EngineError::NegativeValue {
                    context: context.to_string(),
                    index,
                    field,
                });
            }
        }
    }
    Ok(())
}
