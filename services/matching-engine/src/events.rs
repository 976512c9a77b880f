//! Events emitted by the engine façade
//!
//! One event per trade plus one book update per book-mutating submission.
//! Every event carries the engine sequence that produced it, so
//! subscribers can detect gaps, and the symbol, so the fan-out can route
//! it to its topic.

use serde::{Deserialize, Serialize};
use types::ids::{OrderId, Symbol, TradeId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// A market event produced inside a symbol's matching cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// A trade executed between a resting maker and an incoming taker
    TradeExecuted {
        trade_id: TradeId,
        symbol: Symbol,
        price: Price,
        quantity: Quantity,
        aggressor_side: Side,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        timestamp: i64,
        sequence: u64,
    },

    /// The book changed; carries the new top-of-book state
    BookUpdated {
        symbol: Symbol,
        sequence: u64,
        timestamp: i64,
        /// Depth-limited levels, best first
        bids: Vec<(Price, Quantity)>,
        asks: Vec<(Price, Quantity)>,
        best_bid: Option<(Price, Quantity)>,
        best_ask: Option<(Price, Quantity)>,
    },
}

impl MarketEvent {
    pub fn from_trade(trade: &Trade) -> Self {
        MarketEvent::TradeExecuted {
            trade_id: trade.trade_id,
            symbol: trade.symbol.clone(),
            price: trade.price,
            quantity: trade.quantity,
            aggressor_side: trade.aggressor_side,
            maker_order_id: trade.maker_order_id,
            taker_order_id: trade.taker_order_id,
            timestamp: trade.timestamp,
            sequence: trade.sequence,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        match self {
            MarketEvent::TradeExecuted { symbol, .. } => symbol,
            MarketEvent::BookUpdated { symbol, .. } => symbol,
        }
    }

    pub fn sequence(&self) -> u64 {
        match self {
            MarketEvent::TradeExecuted { sequence, .. } => *sequence,
            MarketEvent::BookUpdated { sequence, .. } => *sequence,
        }
    }

    /// Event type as a string label for logging
    pub fn event_type_label(&self) -> &'static str {
        match self {
            MarketEvent::TradeExecuted { .. } => "TradeExecuted",
            MarketEvent::BookUpdated { .. } => "BookUpdated",
        }
    }
}

/// Destination for engine events
///
/// Implementations must not block: the façade publishes while holding the
/// symbol's critical section so that per-symbol event order matches
/// submission order.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &MarketEvent);
}
