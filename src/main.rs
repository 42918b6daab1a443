use std::sync::Arc;

use anyhow::Context;
use confluence::config::Config;
use confluence::services::{
    detect_unified_market_turn, rank_opportunities, OpportunityEngine, TurnDeduplicator,
};
use confluence::types::{MarketTurn, OpportunityRequest, OpportunityScore, StrategyModality, SymbolMarketData};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Output of one batch run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    modality: StrategyModality,
    timeframes: Vec<String>,
    opportunities: Vec<OpportunityScore>,
    turns: Vec<SymbolTurn>,
    rejected: Vec<Rejection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SymbolTurn {
    symbol: String,
    #[serde(flatten)]
    turn: MarketTurn,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Rejection {
    symbol: String,
    error: String,
}

/// Read the input document from a path, or stdin when none is given.
async fn read_input(path: Option<String>) -> anyhow::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path)),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confluence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    config.engine.validate()?;

    let request = Arc::new(OpportunityRequest::with_timeframes(
        config.modality,
        config.timeframes.clone(),
    ));
    info!(
        modality = %request.modality,
        timeframes = ?request.timeframes,
        "Starting confluence run"
    );

    let input = read_input(std::env::args().nth(1).or(config.input_path.clone())).await?;
    let symbols: Vec<SymbolMarketData> =
        serde_json::from_str(&input).context("parsing symbol market data")?;
    debug!(symbols = symbols.len(), "Loaded market data");

    // Symbols are independent; score each on the blocking pool
    let engine = Arc::new(OpportunityEngine::new(config.engine.clone()));
    let handles: Vec<_> = symbols
        .into_iter()
        .map(|data| {
            let engine = Arc::clone(&engine);
            let request = Arc::clone(&request);
            tokio::task::spawn_blocking(move || {
                let outcome = engine.evaluate(&data, &request).map(|score| {
                    let primary = request.primary();
                    let turn = detect_unified_market_turn(
                        data.series(primary),
                        primary,
                        &engine.config().turn,
                    );
                    (score, turn)
                });
                (data.symbol, outcome)
            })
        })
        .collect();

    let mut scores = Vec::with_capacity(handles.len());
    let mut turns = Vec::new();
    let mut rejected = Vec::new();
    let mut dedup = TurnDeduplicator::new();

    for handle in handles {
        let (symbol, outcome) = handle.await?;
        match outcome {
            Ok((score, turn)) => {
                scores.push(score);
                if dedup.observe(&symbol, &turn) {
                    turns.push(SymbolTurn { symbol, turn });
                }
            }
            Err(e) => {
                warn!(%symbol, error = %e, "Rejected market data");
                rejected.push(Rejection {
                    symbol,
                    error: e.to_string(),
                });
            }
        }
    }

    let report = Report {
        modality: request.modality,
        timeframes: request.timeframes.clone(),
        opportunities: rank_opportunities(scores),
        turns,
        rejected,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!(
        scored = report.opportunities.len(),
        turns = report.turns.len(),
        rejected = report.rejected.len(),
        "Run complete"
    );
    Ok(())
}
