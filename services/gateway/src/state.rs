use std::sync::Arc;

use matching_engine::MatchingEngine;
use market_data::{Publisher, TradeTape};

use crate::config::GatewayConfig;

/// Shared application state
///
/// The engine publishes into the fan-out and the trade tape; both are
/// registered as sinks before the first submission, so no event is missed.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    pub publisher: Arc<Publisher>,
    pub tape: Arc<TradeTape>,
    pub default_depth: usize,
}

impl AppState {
    pub fn new(config: &GatewayConfig) -> Self {
        let publisher = Arc::new(Publisher::new(config.subscriber_queue_capacity));
        let tape = Arc::new(TradeTape::new(config.trade_history));
        let engine = Arc::new(
            MatchingEngine::new(config.instrument_table())
                .with_snapshot_depth(config.snapshot_depth)
                .with_sink(publisher.clone())
                .with_sink(tape.clone()),
        );
        Self {
            engine,
            publisher,
            tape,
            default_depth: config.snapshot_depth,
        }
    }
}
