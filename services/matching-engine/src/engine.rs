//! Engine façade
//!
//! Owns the per-symbol books, validates admissions against the instrument
//! table, assigns the global arrival sequence, serializes matching per
//! symbol, keeps the venue counters, and emits events to registered sinks.
//!
//! Matching for one symbol runs under that symbol's mutex; symbols never
//! share book state, so submissions for different symbols proceed in
//! parallel. Events are published while the symbol lock is held so that
//! per-symbol event order equals submission order; sinks are required to
//! enqueue without blocking.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use types::errors::{EngineError, RejectReason};
use types::ids::{OrderId, Symbol};
use types::instrument::InstrumentTable;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus, OrderType, Side};
use types::trade::Trade;

use crate::book::OrderBook;
use crate::events::{EventSink, MarketEvent};
use crate::matching::{self, MatchExecutor};

/// Current unix time in nanoseconds
pub fn unix_nanos_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or_default()
}

/// An order submission, as accepted from the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

/// Result of one submission
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub sequence: u64,
    pub trades: Vec<Trade>,
    pub remaining: Quantity,
    pub reason: Option<RejectReason>,
    pub timestamp: i64,
}

impl SubmitOutcome {
    fn rejected(
        quantity: Quantity,
        sequence: u64,
        timestamp: i64,
        reason: RejectReason,
    ) -> Self {
        Self {
            order_id: OrderId::new(),
            status: OrderStatus::Rejected,
            sequence,
            trades: Vec::new(),
            remaining: quantity,
            reason: Some(reason),
            timestamp,
        }
    }
}

/// Self-describing read view of one symbol's book
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    pub symbol: Symbol,
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
    pub best_bid: Option<(Price, Quantity)>,
    pub best_ask: Option<(Price, Quantity)>,
    /// Engine sequence the view incorporates
    pub sequence: u64,
    pub timestamp: i64,
}

/// Venue counters
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub total_orders_accepted: u64,
    pub total_orders_rejected: u64,
    pub total_trades: u64,
    /// Matched base volume per symbol
    pub total_matched_volume_per_symbol: BTreeMap<String, Decimal>,
    pub uptime_seconds: f64,
    pub orders_per_second: f64,
    pub active_symbols: usize,
}

/// Per-symbol state guarded by the symbol's mutex
struct SymbolBook {
    book: OrderBook,
    matched_volume: Decimal,
    /// Last sequence processed inside this symbol's critical section
    last_sequence: u64,
    /// Set when an invariant violation corrupted this book
    poisoned: Option<String>,
}

impl SymbolBook {
    fn new(symbol: Symbol) -> Self {
        Self {
            book: OrderBook::new(symbol),
            matched_volume: Decimal::ZERO,
            last_sequence: 0,
            poisoned: None,
        }
    }
}

/// The matching venue
pub struct MatchingEngine {
    books: DashMap<String, Mutex<SymbolBook>>,
    instruments: InstrumentTable,
    executor: MatchExecutor,
    next_sequence: AtomicU64,
    orders_accepted: AtomicU64,
    orders_rejected: AtomicU64,
    trades_executed: AtomicU64,
    started_at: Instant,
    snapshot_depth: usize,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl MatchingEngine {
    /// Create an engine trading exactly the symbols in `instruments`
    pub fn new(instruments: InstrumentTable) -> Self {
        let books = DashMap::new();
        for symbol in instruments.symbols() {
            books.insert(
                symbol.as_str().to_string(),
                Mutex::new(SymbolBook::new(symbol.clone())),
            );
        }
        Self {
            books,
            instruments,
            executor: MatchExecutor::new(1),
            next_sequence: AtomicU64::new(0),
            orders_accepted: AtomicU64::new(0),
            orders_rejected: AtomicU64::new(0),
            trades_executed: AtomicU64::new(0),
            started_at: Instant::now(),
            snapshot_depth: 10,
            sinks: Vec::new(),
        }
    }

    /// Depth used for book-update events
    pub fn with_snapshot_depth(mut self, depth: usize) -> Self {
        self.snapshot_depth = depth;
        self
    }

    /// Register an event sink; sinks receive events in submission order per symbol
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Submit one order
    ///
    /// Admission failures come back as a `Rejected` outcome with a reason;
    /// `Err` is reserved for the fatal paths (invariant violation, poisoned
    /// book).
    pub fn submit(&self, request: OrderRequest) -> Result<SubmitOutcome, EngineError> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let timestamp = unix_nanos_now();

        if let Err(reason) = self.validate(&request) {
            self.orders_rejected.fetch_add(1, Ordering::Relaxed);
            debug!(symbol = %request.symbol, %reason, "submission rejected at admission");
            return Ok(SubmitOutcome::rejected(
                request.quantity,
                sequence,
                timestamp,
                reason,
            ));
        }

        let entry = self
            .books
            .get(request.symbol.as_str())
            .expect("validated symbol has a book");
        let mut guard = entry.lock().expect("symbol book mutex poisoned");
        let state = &mut *guard;

        if let Some(detail) = &state.poisoned {
            return Err(EngineError::BookPoisoned {
                symbol: request.symbol.as_str().to_string(),
                detail: detail.clone(),
            });
        }
        state.last_sequence = sequence;

        let mut order = Order::new(
            request.symbol.clone(),
            request.side,
            request.order_type,
            request.price,
            request.quantity,
            sequence,
            timestamp,
        );

        let outcome = matching::execute(&mut state.book, &mut order, &self.executor, timestamp);

        if outcome.killed {
            self.orders_rejected.fetch_add(1, Ordering::Relaxed);
            debug!(order_id = %order.order_id, symbol = %order.symbol, "fill-or-kill rejected");
            return Ok(SubmitOutcome::rejected(
                order.quantity,
                sequence,
                timestamp,
                RejectReason::FokUnfillable,
            ));
        }

        if let Err(detail) = state.book.check_invariants() {
            state.poisoned = Some(detail.clone());
            error!(
                symbol = %order.symbol,
                detail = %detail,
                "book invariant violated; halting symbol"
            );
            return Err(EngineError::InvariantViolation {
                symbol: order.symbol.as_str().to_string(),
                detail,
            });
        }

        self.orders_accepted.fetch_add(1, Ordering::Relaxed);
        self.trades_executed
            .fetch_add(outcome.trades.len() as u64, Ordering::Relaxed);
        for trade in &outcome.trades {
            state.matched_volume += trade.quantity.as_decimal();
        }

        let status = if order.is_filled() {
            OrderStatus::Filled
        } else if outcome.rested {
            if order.has_fills() {
                OrderStatus::PartiallyFilledResting
            } else {
                OrderStatus::Resting
            }
        } else {
            OrderStatus::PartiallyFilledCancelled
        };

        // Published under the symbol lock: per-symbol event order equals
        // submission order. Sinks only enqueue.
        for trade in &outcome.trades {
            self.emit(&MarketEvent::from_trade(trade));
        }
        if !outcome.trades.is_empty() || outcome.rested {
            let snapshot = state.book.snapshot(self.snapshot_depth);
            let bbo = state.book.bbo();
            self.emit(&MarketEvent::BookUpdated {
                symbol: order.symbol.clone(),
                sequence,
                timestamp,
                bids: snapshot.bids,
                asks: snapshot.asks,
                best_bid: bbo.bid,
                best_ask: bbo.ask,
            });
        }

        Ok(SubmitOutcome {
            order_id: order.order_id,
            status,
            sequence,
            trades: outcome.trades,
            remaining: order.remaining,
            reason: None,
            timestamp,
        })
    }

    fn validate(&self, request: &OrderRequest) -> Result<(), RejectReason> {
        let Some(spec) = self.instruments.get(request.symbol.as_str()) else {
            return Err(RejectReason::UnknownSymbol);
        };
        if request.quantity.is_zero() {
            return Err(RejectReason::InvalidQuantity);
        }
        if !spec.quantity_on_lot(request.quantity) {
            return Err(RejectReason::QuantityOffLot);
        }
        match (request.order_type.requires_price(), request.price) {
            (true, None) => Err(RejectReason::MissingPrice),
            (false, Some(_)) => Err(RejectReason::UnexpectedPrice),
            (true, Some(price)) if !spec.price_on_tick(price) => Err(RejectReason::PriceOffTick),
            _ => Ok(()),
        }
    }

    fn emit(&self, event: &MarketEvent) {
        for sink in &self.sinks {
            sink.publish(event);
        }
    }

    /// Depth-limited view of one symbol's book; None for unknown symbols
    pub fn book_view(&self, symbol: &str, depth: usize) -> Option<BookView> {
        let entry = self.books.get(symbol)?;
        let state = entry.lock().expect("symbol book mutex poisoned");
        let snapshot = state.book.snapshot(depth);
        let bbo = state.book.bbo();
        Some(BookView {
            symbol: state.book.symbol().clone(),
            bids: snapshot.bids,
            asks: snapshot.asks,
            best_bid: bbo.bid,
            best_ask: bbo.ask,
            sequence: state.last_sequence,
            timestamp: unix_nanos_now(),
        })
    }

    /// Best bid and offer for one symbol; None for unknown symbols
    pub fn bbo(&self, symbol: &str) -> Option<crate::book::Bbo> {
        let entry = self.books.get(symbol)?;
        let state = entry.lock().expect("symbol book mutex poisoned");
        Some(state.book.bbo())
    }

    /// Venue counters snapshot
    pub fn stats(&self) -> EngineStats {
        let mut total_matched_volume_per_symbol = BTreeMap::new();
        for entry in self.books.iter() {
            let state = entry.value().lock().expect("symbol book mutex poisoned");
            total_matched_volume_per_symbol.insert(entry.key().clone(), state.matched_volume);
        }
        let accepted = self.orders_accepted.load(Ordering::Relaxed);
        let uptime_seconds = self.started_at.elapsed().as_secs_f64();
        let orders_per_second = if uptime_seconds > 0.0 {
            accepted as f64 / uptime_seconds
        } else {
            0.0
        };
        EngineStats {
            total_orders_accepted: accepted,
            total_orders_rejected: self.orders_rejected.load(Ordering::Relaxed),
            total_trades: self.trades_executed.load(Ordering::Relaxed),
            total_matched_volume_per_symbol,
            uptime_seconds,
            orders_per_second,
            active_symbols: self.books.len(),
        }
    }

    /// Symbols this engine trades, sorted
    pub fn symbols(&self) -> Vec<String> {
        self.instruments
            .symbols()
            .map(|s| s.as_str().to_string())
            .collect()
    }
}
