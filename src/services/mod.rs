pub mod opportunity;
pub mod signals;

pub use opportunity::{rank_opportunities, OpportunityEngine};
pub use signals::{
    calibrate, detect_early_confluence, detect_institutional_setup, detect_unified_market_turn,
    TurnDeduplicator,
};
