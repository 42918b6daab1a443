//! Order book depth snapshot as supplied by the market-data collaborator.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Resting size at one price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookLevel {
    pub price: f64,
    /// Base-asset size resting at `price`.
    pub quantity: f64,
}

/// Depth snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookDepth {
    /// Bid levels, best (highest) first
    pub bids: Vec<OrderBookLevel>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<OrderBookLevel>,
    /// Exchange sequence number of the snapshot
    pub last_update_id: u64,
}

impl OrderBookDepth {
    /// Total bid quantity.
    pub fn bid_total(&self) -> f64 {
        self.bids.iter().map(|l| l.quantity).sum()
    }

    /// Total ask quantity.
    pub fn ask_total(&self) -> f64 {
        self.asks.iter().map(|l| l.quantity).sum()
    }

    /// Net bid pressure in [-1, 1]; positive when bids outweigh asks, 0 for
    /// an empty book.
    pub fn imbalance(&self) -> f64 {
        let bid_total = self.bid_total();
        let ask_total = self.ask_total();
        let total = bid_total + ask_total;
        if total > 0.0 {
            (bid_total - ask_total) / total
        } else {
            0.0
        }
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.bids.iter().map(|l| l.price).reduce(f64::max)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.iter().map(|l| l.price).reduce(f64::min)
    }

    /// (best_bid + best_ask) / 2, when both sides are present.
    pub fn mid_price(&self) -> Option<f64> {
        Some((self.best_bid()? + self.best_ask()?) / 2.0)
    }

    /// Spread as percentage of mid price.
    pub fn spread_pct(&self) -> Option<f64> {
        let mid = self.mid_price()?;
        if mid > 0.0 {
            Some((self.best_ask()? - self.best_bid()?) / mid * 100.0)
        } else {
            None
        }
    }

    /// Quote notional (price × quantity) resting within `pct` percent of mid,
    /// returned as (bid_notional, ask_notional).
    pub fn notional_within(&self, pct: f64) -> (f64, f64) {
        let Some(mid) = self.mid_price() else {
            return (0.0, 0.0);
        };
        let band = mid * pct / 100.0;
        let bids = self
            .bids
            .iter()
            .filter(|l| l.price >= mid - band)
            .map(|l| l.price * l.quantity)
            .sum();
        let asks = self
            .asks
            .iter()
            .filter(|l| l.price <= mid + band)
            .map(|l| l.price * l.quantity)
            .sum();
        (bids, asks)
    }

    /// Fail fast on NaN/infinite or negative levels.
    pub fn validate(&self, context: &str) -> Result<()> {
        let levels = self.bids.iter().chain(self.asks.iter());
        for (index, level) in levels.enumerate() {
            for (field, value) in [("price", level.price), ("quantity", level.quantity)] {
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
}
