//! Shared inputs and helpers for the modality scorers.

use crate::config::EngineConfig;
use crate::services::signals::indicators::{detect_swing_high_low, volume_ratio, SwingPoints};
use crate::services::signals::{detect_unified_market_turn, IndicatorSet};
use crate::types::{pct_change, AssetSnapshot, Candle, MarketTurn, OrderBookDepth, SymbolMarketData};

/// Everything a scorer reads for one symbol, computed once.
pub struct ScoringContext<'a> {
    pub data: &'a SymbolMarketData,
    pub config: &'a EngineConfig,
    pub interval: &'a str,
    /// Primary-timeframe candles, oldest first.
    pub candles: &'a [Candle],
    /// Confirmation-timeframe candles; empty when none was requested.
    pub confirmation: &'a [Candle],
    pub indicators: IndicatorSet,
    pub swings: SwingPoints,
}

impl<'a> ScoringContext<'a> {
    pub fn new(
        data: &'a SymbolMarketData,
        config: &'a EngineConfig,
        interval: &'a str,
        confirmation: Option<&str>,
    ) -> Self {
        let candles = data.series(interval);
        Self {
            data,
            config,
            interval,
            candles,
            confirmation: confirmation.map(|tf| data.series(tf)).unwrap_or(&[]),
            indicators: IndicatorSet::compute(candles, config),
            swings: detect_swing_high_low(candles, config.swing_lookback),
        }
    }

    pub fn order_book(&self) -> Option<&'a OrderBookDepth> {
        let data: &'a SymbolMarketData = self.data;
        data.order_book.as_ref()
    }

    pub fn asset(&self) -> Option<&'a AssetSnapshot> {
        let data: &'a SymbolMarketData = self.data;
        data.asset.as_ref()
    }

    pub fn last(&self) -> Option<&'a Candle> {
        self.candles.last()
    }

    pub fn last_close(&self) -> f64 {
        self.last().map(|c| c.close).unwrap_or(0.0)
    }

    pub fn rsi(&self) -> Option<f64> {
        self.indicators.rsi.last()
    }

    pub fn ema20(&self) -> Option<f64> {
        self.indicators.ema20.last()
    }

    pub fn ema50(&self) -> Option<f64> {
        self.indicators.ema50.last()
    }

    pub fn ema_bullish(&self) -> bool {
        matches!((self.ema20(), self.ema50()), (Some(fast), Some(slow)) if fast > slow)
    }

    /// Latest ATR as a percentage of the last close.
    pub fn atr_pct(&self) -> Option<f64> {
        let close = self.last_close();
        let atr = self.indicators.atr.last()?;
        (close > 0.0).then(|| atr / close * 100.0)
    }

    /// Percent change of the close over the last `n` candles.
    pub fn change_pct(&self, n: usize) -> f64 {
        let len = self.candles.len();
        if len <= n {
            return 0.0;
        }
        pct_change(self.candles[len - 1 - n].close, self.last_close())
    }

    /// Mean volume of the last `recent` candles against the rest.
    pub fn volume_ratio(&self, recent: usize) -> f64 {
        volume_ratio(self.candles, recent)
    }

    /// The `n` candles before the latest one.
    pub fn prior(&self, n: usize) -> &'a [Candle] {
        let candles: &'a [Candle] = self.candles;
        let end = candles.len().saturating_sub(1);
        &candles[end.saturating_sub(n)..end]
    }

    /// The most recent `n` candles, latest included.
    pub fn recent(&self, n: usize) -> &'a [Candle] {
        let candles: &'a [Candle] = self.candles;
        &candles[candles.len().saturating_sub(n)..]
    }

    pub fn prior_high(&self, n: usize) -> Option<f64> {
        self.prior(n).iter().map(|c| c.high).reduce(f64::max)
    }

    pub fn prior_low(&self, n: usize) -> Option<f64> {
        self.prior(n).iter().map(|c| c.low).reduce(f64::min)
    }

    /// Distance of the close from EMA20, in percent of EMA20.
    pub fn distance_from_ema20_pct(&self) -> Option<f64> {
        let ema = self.ema20()?;
        (ema > 0.0).then(|| (self.last_close() - ema) / ema * 100.0)
    }

    /// EMA regime on the confirmation timeframe; `None` without enough data.
    pub fn confirmation_bullish(&self) -> Option<bool> {
        if self.confirmation.is_empty() {
            return None;
        }
        let set = IndicatorSet::compute(self.confirmation, self.config);
        Some(set.ema20.last()? > set.ema50.last()?)
    }

    pub fn turn(&self) -> MarketTurn {
        detect_unified_market_turn(self.candles, self.interval, &self.config.turn)
    }

    /// Candles covered by one swing window, `2 * lookback + 1`.
    pub fn swing_span(&self) -> usize {
        self.config.swing_lookback.saturating_mul(2).saturating_add(1)
    }

    /// Whether a swing low was confirmed within the last `n` candles.
    pub fn recent_swing_low(&self, n: usize) -> bool {
        let cutoff = self.candles.len().saturating_sub(n);
        self.swings.swing_lows.last().is_some_and(|i| *i >= cutoff)
    }

    pub fn recent_swing_high(&self, n: usize) -> bool {
        let cutoff = self.candles.len().saturating_sub(n);
        self.swings.swing_highs.last().is_some_and(|i| *i >= cutoff)
    }
}
