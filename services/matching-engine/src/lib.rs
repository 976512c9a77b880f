//! Matching engine
//!
//! Per-symbol limit order books matched under strict price-time priority.
//!
//! **Key invariants:**
//! - Price-time priority: better price first, then earlier arrival
//! - Trades execute at the resting (maker) price, never through a better one
//! - Deterministic: a given arrival sequence produces exactly one trade
//!   stream and book state
//! - Fill-or-kill admission is atomic: reject leaves the book untouched
//!
//! The [`engine::MatchingEngine`] façade owns the per-symbol books,
//! validates admissions against the instrument table, serializes matching
//! per symbol, and emits [`events::MarketEvent`]s to registered sinks.

pub mod book;
pub mod engine;
pub mod events;
pub mod matching;

pub use engine::{BookView, EngineStats, MatchingEngine, OrderRequest, SubmitOutcome};
