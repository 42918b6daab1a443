//! Liquidity-driven scorers: stop sweeps and order book pressure.

use super::card::{show, Rule, ScoreCard};
use super::context::ScoringContext;

/// Wick through the 20-candle low that closes back inside the range.
pub fn liquidity_sweep(ctx: &ScoringContext) -> ScoreCard {
    const SWEEP: Rule = Rule::new("sweep", "Swept 20-candle low and reclaimed", 35);
    const WICK: Rule = Rule::new("long_lower_wick", "Lower wick over 2x body", 20);
    const VOLUME: Rule = Rule::new("volume_spike", "Volume 1.5x average", 20);
    const BIDS: Rule = Rule::new("bid_pressure", "Bids outweigh asks", 15);
    const RSI: Rule = Rule::new("rsi_low", "RSI under 45", 10);

    let level = ctx.prior_low(20);
    let swept = match (ctx.last(), level) {
        (Some(last), Some(level)) => last.low < level && last.close > level,
        _ => false,
    };
    let wick = ctx
        .last()
        .is_some_and(|c| c.range() > 0.0 && c.lower_wick() > 2.0 * c.body());
    let volume_ratio = ctx.volume_ratio(3);
    let imbalance = ctx.order_book().map(|b| b.imbalance());
    let rsi = ctx.rsi();

    ScoreCard::new()
        .check(SWEEP, swept, show(level, 4))
        .check(WICK, wick, show(ctx.last().map(|c| c.lower_wick()), 4))
        .check(VOLUME, volume_ratio > 1.5, show(Some(volume_ratio), 2))
        .check(BIDS, imbalance.is_some_and(|i| i > 0.1), show(imbalance, 3))
        .check(RSI, rsi.is_some_and(|r| r < 45.0), show(rsi, 1))
}

/// Resting bids dominating the book near mid.
pub fn order_book_imbalance(ctx: &ScoringContext) -> ScoreCard {
    const IMBALANCE: Rule = Rule::new("book_imbalance", "Book imbalance above 0.2", 30);
    const SPREAD: Rule = Rule::new("tight_spread", "Spread under 0.1%", 15);
    const NEAR_MID: Rule = Rule::new("near_mid_bids", "Bid notional 1.5x asks within 1% of mid", 25);
    const PRICE: Rule = Rule::new("price_holding", "Price flat or up over 5 candles", 15);
    const VOLUME: Rule = Rule::new("volume", "Volume above average", 15);

    let book = ctx.order_book();
    let imbalance = book.map(|b| b.imbalance());
    let spread = book.and_then(|b| b.spread_pct());
    let (bids, asks) = book.map(|b| b.notional_within(1.0)).unwrap_or((0.0, 0.0));
    let change = ctx.change_pct(5);
    let volume_ratio = ctx.volume_ratio(5);

    ScoreCard::new()
        .check(IMBALANCE, imbalance.is_some_and(|i| i > 0.2), show(imbalance, 3))
        .check(SPREAD, spread.is_some_and(|s| s < 0.1), show(spread, 4))
        .check(
            NEAR_MID,
            bids > 0.0 && bids > asks * 1.5,
            Some(format!("{:.0} vs {:.0}", bids, asks)),
        )
        .check(PRICE, change >= 0.0, show(Some(change), 2))
        .check(VOLUME, volume_ratio > 1.0, show(Some(volume_ratio), 2))
}
