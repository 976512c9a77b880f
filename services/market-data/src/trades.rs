//! Public trade history
//!
//! Keeps a bounded ring buffer of executed trades per symbol for the
//! recent-trades query and replay. Fed from the engine's event stream, so
//! per-symbol ordering matches submission order.

use std::collections::VecDeque;
use std::sync::Mutex;

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use matching_engine::events::{EventSink, MarketEvent};
use types::ids::{Symbol, TradeId};
use types::numeric::{Price, Quantity};
use types::order::Side;

/// A trade as exposed publicly (no resting-order internals)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicTrade {
    pub trade_id: TradeId,
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Quantity,
    /// Notional value (price × quantity)
    pub value: Decimal,
    pub aggressor_side: Side,
    pub timestamp: i64,
    pub sequence: u64,
}

/// Bounded ring buffer of recent trades for one symbol
#[derive(Debug)]
struct TradeBuffer {
    history: VecDeque<PublicTrade>,
    max_history: usize,
}

impl TradeBuffer {
    fn new(max_history: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    fn record(&mut self, trade: PublicTrade) {
        if self.history.len() >= self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(trade);
    }

    fn recent(&self, limit: usize) -> Vec<PublicTrade> {
        self.history.iter().rev().take(limit).cloned().collect()
    }

    fn replay(&self) -> Vec<PublicTrade> {
        self.history.iter().cloned().collect()
    }
}

/// Per-symbol trade history, fed from the engine event stream
pub struct TradeTape {
    buffers: DashMap<String, Mutex<TradeBuffer>>,
    max_history: usize,
}

impl TradeTape {
    /// `max_history` bounds the per-symbol ring buffer
    pub fn new(max_history: usize) -> Self {
        assert!(max_history > 0, "trade history capacity must be positive");
        Self {
            buffers: DashMap::new(),
            max_history,
        }
    }

    fn record(&self, trade: PublicTrade) {
        let buffer = self
            .buffers
            .entry(trade.symbol.as_str().to_string())
            .or_insert_with(|| Mutex::new(TradeBuffer::new(self.max_history)));
        buffer.lock().expect("trade buffer poisoned").record(trade);
    }

    /// Most recent trades for `symbol`, newest first
    pub fn recent(&self, symbol: &str, limit: usize) -> Vec<PublicTrade> {
        self.buffers
            .get(symbol)
            .map(|buffer| buffer.lock().expect("trade buffer poisoned").recent(limit))
            .unwrap_or_default()
    }

    /// Full buffered history for `symbol`, oldest first
    pub fn replay(&self, symbol: &str) -> Vec<PublicTrade> {
        self.buffers
            .get(symbol)
            .map(|buffer| buffer.lock().expect("trade buffer poisoned").replay())
            .unwrap_or_default()
    }

    pub fn history_len(&self, symbol: &str) -> usize {
        self.buffers
            .get(symbol)
            .map(|buffer| buffer.lock().expect("trade buffer poisoned").history.len())
            .unwrap_or(0)
    }
}

impl EventSink for TradeTape {
    fn publish(&self, event: &MarketEvent) {
        if let MarketEvent::TradeExecuted {
            trade_id,
            symbol,
            price,
            quantity,
            aggressor_side,
            timestamp,
            sequence,
            ..
        } = event
        {
            self.record(PublicTrade {
                trade_id: *trade_id,
                symbol: symbol.clone(),
                price: *price,
                quantity: *quantity,
                value: *quantity * *price,
                aggressor_side: *aggressor_side,
                timestamp: *timestamp,
                sequence: *sequence,
            });
        }
    }
}
