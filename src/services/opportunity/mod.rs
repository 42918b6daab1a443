//! Opportunity scoring engine.
//!
//! Each strategy modality has its own scorer. Scorers share a
//! [`ScoringContext`] and report through a [`ScoreCard`], so every evaluated
//! rule ends up in the audit trail whether it was met or not.

pub mod card;
pub mod context;
pub mod institutional;
pub mod liquidity;
pub mod momentum;
pub mod reversal;
pub mod trend;
pub mod volume;

pub use card::{Rule, ScoreCard};
pub use context::ScoringContext;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::types::{
    validate_candles, ConditionCheck, OpportunityRequest, OpportunityScore, OpportunityTier,
    StrategyModality, SymbolMarketData,
};

/// Run the scorer for `modality` over a prepared context.
pub fn score_card(modality: StrategyModality, ctx: &ScoringContext) -> ScoreCard {
    match modality {
        StrategyModality::Scalping => momentum::scalping(ctx),
        StrategyModality::DayTrade => momentum::day_trade(ctx),
        StrategyModality::SwingTrade => momentum::swing_trade(ctx),
        StrategyModality::TrendFollowing => trend::trend_following(ctx),
        StrategyModality::TrendPullback => trend::trend_pullback(ctx),
        StrategyModality::Breakout => trend::breakout(ctx),
        StrategyModality::MeanReversion => reversal::mean_reversion(ctx),
        StrategyModality::OversoldReversal => reversal::oversold_reversal(ctx),
        StrategyModality::OverboughtReversal => reversal::overbought_reversal(ctx),
        StrategyModality::LiquiditySweep => liquidity::liquidity_sweep(ctx),
        StrategyModality::OrderBookImbalance => liquidity::order_book_imbalance(ctx),
        StrategyModality::VolumeSpike => volume::volume_spike(ctx),
        StrategyModality::VolumeAccumulation => volume::volume_accumulation(ctx),
        StrategyModality::InstitutionalSetup => institutional::institutional_setup(ctx),
        StrategyModality::InstitutionalCalibration => institutional::institutional_calibration(ctx),
    }
}

/// `"{Tier} {modality} opportunity for {symbol}: {met}/{total} conditions met."`
/// followed by the met labels.
pub fn narrative(modality: StrategyModality, symbol: &str, score: u8, conditions: &[ConditionCheck]) -> String {
    let met: Vec<&str> = conditions
        .iter()
        .filter(|c| c.met)
        .map(|c| c.label.as_str())
        .collect();
    let head = format!(
        "{} {} opportunity for {}: {}/{} conditions met.",
        OpportunityTier::from_score(score).label(),
        modality.label(),
        symbol,
        met.len(),
        conditions.len()
    );
    if met.is_empty() {
        head
    } else {
        format!("{} Met: {}.", head, met.join(", "))
    }
}

/// Sort by score descending, then symbol ascending.
pub fn rank_opportunities(mut scores: Vec<OpportunityScore>) -> Vec<OpportunityScore> {
    scores.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.symbol.cmp(&b.symbol)));
    scores
}

/// Fail fast on non-finite or negative candle, order book and asset values.
pub fn validate_market_data(data: &SymbolMarketData) -> Result<()> {
    for (interval, candles) in &data.candles {
        validate_candles(&format!("{} {}", data.symbol, interval), candles)?;
    }
    if let Some(book) = &data.order_book {
        book.validate(&format!("{} order book", data.symbol))?;
    }
    if let Some(asset) = &data.asset {
        asset.validate()?;
    }
    Ok(())
}

/// Scores symbols for one modality. Stateless apart from its parameters.
#[derive(Debug, Clone, Default)]
pub struct OpportunityEngine {
    config: EngineConfig,
}

impl OpportunityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score without validating input. Below `min_candles` on the primary
    /// timeframe the result is zero with a single insufficient-data condition.
    pub fn score_symbol(&self, data: &SymbolMarketData, request: &OpportunityRequest) -> OpportunityScore {
        let primary = request.primary();
        let available = data.series(primary).len();

        let (score, conditions) = if available < self.config.min_candles {
            let condition = ConditionCheck {
                id: "insufficient_data".to_string(),
                label: "Insufficient data".to_string(),
                met: false,
                value: Some(format!(
                    "{} candles on {}, need {}",
                    available, primary, self.config.min_candles
                )),
            };
            (0, vec![condition])
        } else {
            let ctx = ScoringContext::new(data, &self.config, primary, request.confirmation());
            score_card(request.modality, &ctx).into_parts()
        };

        debug!(
            symbol = %data.symbol,
            modality = %request.modality,
            score,
            "scored opportunity"
        );

        OpportunityScore {
            symbol: data.symbol.clone(),
            modality: request.modality,
            score,
            narrative: narrative(request.modality, &data.symbol, score, &conditions),
            conditions,
            timeframes: request.timeframes.clone(),
        }
    }

    /// Validate, then score one symbol.
    pub fn evaluate(&self, data: &SymbolMarketData, request: &OpportunityRequest) -> Result<OpportunityScore> {
        self.config.validate()?;
        validate_market_data(data)?;
        Ok(self.score_symbol(data, request))
    }

    /// Validate every symbol, then score and rank them all.
    pub fn rank(&self, data: &[SymbolMarketData], request: &OpportunityRequest) -> Result<Vec<OpportunityScore>> {
        let scores = data
            .iter()
            .map(|d| self.evaluate(d, request))
            .collect::<Result<Vec<_>>>()?;
        Ok(rank_opportunities(scores))
    }
}
