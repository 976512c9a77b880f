use crate::error::AppError;
use crate::models::SubmitOrderResponse;
use crate::state::AppState;
use axum::{extract::State, Json};
use matching_engine::OrderRequest;

/// Submit one order to the engine
///
/// Admission failures come back as a normal response with
/// `status = "rejected"` and a reason code; only fatal engine states
/// (poisoned book) surface as an HTTP error.
pub async fn submit_order(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> Result<Json<SubmitOrderResponse>, AppError> {
    let outcome = state
        .engine
        .submit(request)
        .map_err(|err| AppError::ServiceUnavailable(err.to_string()))?;
    Ok(Json(SubmitOrderResponse::from(outcome)))
}
