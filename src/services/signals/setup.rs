//! Institutional setup detection.
//!
//! Eight independent predicates over a single asset snapshot. No predicate
//! depends on another; absent optional inputs make a predicate false.

use crate::types::{AssetSnapshot, ConfluenceLevel, InstitutionalSetup, SetupCriteria, SetupStatus};

/// Fixed thresholds for the eight criteria.
pub mod thresholds {
    pub const LIQUIDITY_VOLUME_MCAP_RATIO: f64 = 0.15;
    pub const LIQUIDITY_MIN_VOLUME: f64 = 10e6;
    pub const MANIPULATION_MIN_VOLATILITY: f64 = 5.0;
    pub const MANIPULATION_MAX_NET_CHANGE: f64 = 3.0;
    pub const STRUCTURE_MIN_MOMENTUM: f64 = 1.0;
    pub const ORDER_BLOCK_MIN_VOLUME: f64 = 50e6;
    pub const ORDER_BLOCK_MAX_NET_CHANGE: f64 = 2.0;
    pub const FVG_MIN_HOURLY_MOVE: f64 = 1.5;
    pub const FVG_MIN_VOLATILITY: f64 = 3.0;
    pub const MITIGATION_RSI_LOW: f64 = 40.0;
    pub const MITIGATION_RSI_HIGH: f64 = 60.0;
    pub const DISPLACEMENT_MIN_CHANGE: f64 = 5.0;
    pub const DISPLACEMENT_VOLUME_MCAP_RATIO: f64 = 0.1;
    pub const TARGET_MIN_CONFLUENCE: f64 = 0.6;
    pub const TARGET_MIN_OPEN_INTEREST: f64 = 50e6;
    pub const HIGH_CONFLUENCE: f64 = 0.7;
    pub const MEDIUM_CONFLUENCE: f64 = 0.5;
}

use thresholds::*;

/// Heavy turnover relative to size: `volume/marketCap > 0.15 ∧ volume > 10M`.
pub fn has_liquidity(asset: &AssetSnapshot) -> bool {
    asset
        .volume_market_cap_ratio()
        .is_some_and(|ratio| ratio > LIQUIDITY_VOLUME_MCAP_RATIO)
        && asset.volume_24h > LIQUIDITY_MIN_VOLUME
}

/// Wide intraday swings that net out: a sweep of both sides.
pub fn has_manipulation(asset: &AssetSnapshot) -> bool {
    asset.volatility.is_some_and(|v| v > MANIPULATION_MIN_VOLATILITY)
        && asset.percent_change_24h.abs() < MANIPULATION_MAX_NET_CHANGE
}

/// Short-term momentum running against the 24h move (change of character).
pub fn has_structure_change(asset: &AssetSnapshot) -> bool {
    let change = asset.percent_change_24h;
    asset.momentum.is_some_and(|m| {
        m.abs() > STRUCTURE_MIN_MOMENTUM && change != 0.0 && m.signum() != change.signum()
    })
}

/// Large volume absorbed inside a tight range.
pub fn has_order_block(asset: &AssetSnapshot) -> bool {
    asset.volume_24h > ORDER_BLOCK_MIN_VOLUME
        && asset.percent_change_24h.abs() < ORDER_BLOCK_MAX_NET_CHANGE
}

/// A fast hourly move under elevated volatility leaves an imbalance.
pub fn has_fair_value_gap(asset: &AssetSnapshot) -> bool {
    asset
        .percent_change_1h
        .is_some_and(|c| c.abs() > FVG_MIN_HOURLY_MOVE)
        && asset.volatility.is_some_and(|v| v > FVG_MIN_VOLATILITY)
}

/// Price back at equilibrium: RSI inside [40, 60].
pub fn has_mitigation(asset: &AssetSnapshot) -> bool {
    asset
        .rsi
        .is_some_and(|rsi| (MITIGATION_RSI_LOW..=MITIGATION_RSI_HIGH).contains(&rsi))
}

/// Strong directional move on meaningful turnover.
pub fn has_displacement(asset: &AssetSnapshot) -> bool {
    asset.percent_change_24h.abs() > DISPLACEMENT_MIN_CHANGE
        && asset
            .volume_market_cap_ratio()
            .is_some_and(|ratio| ratio > DISPLACEMENT_VOLUME_MCAP_RATIO)
}

/// Enough confluence and open interest to attract a target.
pub fn has_institutional_target(asset: &AssetSnapshot) -> bool {
    asset
        .confluence_score
        .is_some_and(|c| c > TARGET_MIN_CONFLUENCE)
        && asset
            .open_interest
            .is_some_and(|oi| oi > TARGET_MIN_OPEN_INTEREST)
}

pub fn evaluate_criteria(asset: &AssetSnapshot) -> SetupCriteria {
    SetupCriteria {
        has_liquidity: has_liquidity(asset),
        has_manipulation: has_manipulation(asset),
        has_structure_change: has_structure_change(asset),
        has_order_block: has_order_block(asset),
        has_fair_value_gap: has_fair_value_gap(asset),
        has_mitigation: has_mitigation(asset),
        has_displacement: has_displacement(asset),
        has_institutional_target: has_institutional_target(asset),
    }
}

pub fn setup_status(progress: u8) -> SetupStatus {
    match progress {
        0 => SetupStatus::None,
        1..=7 => SetupStatus::Partial,
        _ => SetupStatus::Complete,
    }
}

pub fn confluence_level(confluence_score: f64, progress: u8) -> ConfluenceLevel {
    if confluence_score > HIGH_CONFLUENCE && progress >= 6 {
        ConfluenceLevel::High
    } else if confluence_score > MEDIUM_CONFLUENCE || progress >= 4 {
        ConfluenceLevel::Medium
    } else {
        ConfluenceLevel::Low
    }
}

/// Satisfied-criterion labels followed by a progress-tier sentence.
pub fn setup_narrative(criteria: &SetupCriteria) -> String {
    let met: Vec<&str> = criteria
        .labeled()
        .iter()
        .filter(|(_, met)| *met)
        .map(|(label, _)| *label)
        .collect();
    let progress = met.len();

    let head = if met.is_empty() {
        "No institutional criteria satisfied.".to_string()
    } else {
        format!("Criteria met: {}.", met.join(", "))
    };

    let tier = match progress {
        8 => "Complete institutional setup: all 8 criteria aligned.".to_string(),
        6..=7 => format!("Advanced setup: {}/8 criteria confirmed, awaiting final confirmation.", progress),
        4..=5 => format!("Developing setup: {}/8 criteria in place.", progress),
        _ => format!("Early stage: {}/8 criteria, no actionable setup yet.", progress),
    };

    format!("{} {}", head, tier)
}

/// Evaluate all eight criteria and aggregate them. The snapshot should have
/// passed [`AssetSnapshot::validate`].
pub fn detect_institutional_setup(asset: &AssetSnapshot) -> InstitutionalSetup {
    let criteria = evaluate_criteria(asset);
    let progress = criteria.count();

    InstitutionalSetup {
        symbol: asset.symbol.clone(),
        criteria,
        setup_progress: progress,
        setup_status: setup_status(progress),
        confluence_level: confluence_level(asset.confluence_score.unwrap_or(0.0), progress),
        setup_narrative: setup_narrative(&criteria),
    }
}
