use crate::error::AppError;
use crate::models::{DepthQuery, LimitQuery};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use matching_engine::{BookView, EngineStats};
use market_data::PublicTrade;

/// Depth-limited order book view
pub async fn get_order_book(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<DepthQuery>,
) -> Result<Json<BookView>, AppError> {
    let depth = params.depth.unwrap_or(state.default_depth);
    state
        .engine
        .book_view(&symbol, depth)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("symbol {symbol} not found")))
}

/// Recent public trades, newest first
pub async fn get_recent_trades(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<PublicTrade>>, AppError> {
    if state.engine.bbo(&symbol).is_none() {
        return Err(AppError::NotFound(format!("symbol {symbol} not found")));
    }
    let limit = params.limit.unwrap_or(100);
    Ok(Json(state.tape.recent(&symbol, limit)))
}

/// Venue counters
pub async fn get_stats(State(state): State<AppState>) -> Json<EngineStats> {
    Json(state.engine.stats())
}
