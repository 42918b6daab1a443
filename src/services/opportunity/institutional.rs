//! Scorers backed by the institutional setup and calibration detectors.
//!
//! Both need an asset snapshot. Without one every rule is evaluated as unmet
//! so the audit trail still lists what was checked.

use super::card::{Rule, ScoreCard};
use super::context::ScoringContext;
use crate::services::signals::{calibrate, detect_institutional_setup};
use crate::types::{AssetSnapshot, CriterionStatus};

const NO_ASSET: &str = "asset snapshot unavailable";

/// One rule per setup criterion, in `SetupCriteria::labeled` order.
const SETUP_RULES: [Rule; 8] = [
    Rule::new("liquidity", "Liquidity", 15),
    Rule::new("manipulation", "Manipulation", 10),
    Rule::new("structure_change", "Structure change", 15),
    Rule::new("order_block", "Order block", 15),
    Rule::new("fair_value_gap", "Fair value gap", 10),
    Rule::new("mitigation", "Mitigation", 10),
    Rule::new("displacement", "Displacement", 15),
    Rule::new("institutional_target", "Institutional target", 10),
];

/// The snapshot with RSI filled from the primary candles when absent.
fn enriched_asset(ctx: &ScoringContext, asset: &AssetSnapshot) -> AssetSnapshot {
    AssetSnapshot {
        rsi: asset.rsi.or_else(|| ctx.rsi()),
        ..asset.clone()
    }
}

pub fn institutional_setup(ctx: &ScoringContext) -> ScoreCard {
    let Some(asset) = ctx.asset() else {
        return SETUP_RULES
            .iter()
            .fold(ScoreCard::new(), |card, rule| card.check(*rule, false, Some(NO_ASSET.to_string())));
    };

    let setup = detect_institutional_setup(&enriched_asset(ctx, asset));
    let progress = format!("{}/8", setup.setup_progress);
    SETUP_RULES
        .iter()
        .zip(setup.criteria.labeled())
        .fold(ScoreCard::new(), |card, (rule, (_, met))| {
            card.check(*rule, met, Some(progress.clone()))
        })
}

pub fn institutional_calibration(ctx: &ScoringContext) -> ScoreCard {
    const COMPOSITE: Rule = Rule::new("composite", "Calibration composite at least 55", 30);
    const TREND: Rule = Rule::new("trend", "Downtrend exhaustion present", 15);
    const SUPPORT: Rule = Rule::new("support", "Price near support", 15);
    const VOLUME: Rule = Rule::new("volume", "Turnover present", 10);
    const TECHNICAL: Rule = Rule::new("technical", "Indicator convergence present", 10);
    const SHORTS: Rule = Rule::new("short_position", "Crowded short side", 10);
    const WICK: Rule = Rule::new("wick_rejection", "Wick rejection", 10);

    let Some(asset) = ctx.asset() else {
        return [COMPOSITE, TREND, SUPPORT, VOLUME, TECHNICAL, SHORTS, WICK]
            .into_iter()
            .fold(ScoreCard::new(), |card, rule| card.check(rule, false, Some(NO_ASSET.to_string())));
    };

    let calibration = calibrate(&enriched_asset(ctx, asset), ctx.candles);
    let present = |score: f64| {
        matches!(
            CriterionStatus::from_score(score),
            CriterionStatus::Present | CriterionStatus::Strong
        )
    };
    let detail = |score: f64| Some(format!("{:.2}", score));

    ScoreCard::new()
        .check(
            COMPOSITE,
            calibration.composite_score >= 55.0,
            Some(format!("{:.2} ({:?})", calibration.composite_score, calibration.calibration_level).to_lowercase()),
        )
        .check(TREND, present(calibration.trend_score), detail(calibration.trend_score))
        .check(SUPPORT, present(calibration.support_score), detail(calibration.support_score))
        .check(VOLUME, present(calibration.volume_score), detail(calibration.volume_score))
        .check(TECHNICAL, present(calibration.technical_score), detail(calibration.technical_score))
        .check(
            SHORTS,
            calibration.short_position_score > 0.0,
            detail(calibration.short_position_score),
        )
        .check(WICK, calibration.wick_rejection_score > 0.0, detail(calibration.wick_rejection_score))
}
