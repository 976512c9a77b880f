//! Rejection and engine error taxonomy
//!
//! Admission failures are data, returned to the caller as a structured
//! rejection; `EngineError` covers the fatal paths that escalate past the
//! submission.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a submission was refused without mutating the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    #[error("unknown symbol")]
    UnknownSymbol,

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("quantity is not a lot multiple")]
    QuantityOffLot,

    #[error("price is not a tick multiple")]
    PriceOffTick,

    #[error("order type requires a price")]
    MissingPrice,

    #[error("market orders must not carry a price")]
    UnexpectedPrice,

    #[error("fill-or-kill order cannot fill in full")]
    FokUnfillable,
}

/// Fatal engine-side failures
///
/// An invariant violation poisons the affected symbol's book; later
/// submissions for it are refused until operator intervention. Other
/// symbols keep trading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("book invariant violated on {symbol}: {detail}")]
    InvariantViolation { symbol: String, detail: String },

    #[error("book for {symbol} is halted after an invariant violation: {detail}")]
    BookPoisoned { symbol: String, detail: String },
}
