//! Confluence - technical analysis and opportunity scoring engine
//!
//! Pure, synchronous analysis over caller-supplied candles, order books and
//! asset snapshots. Nothing here performs I/O or reads the environment except
//! [`config::Config::from_env`], which only the batch runner uses.

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::{EngineConfig, TurnConfig};
pub use error::{EngineError, Result};
pub use services::OpportunityEngine;
