//! Subscription topics
//!
//! Two topics per symbol: `trades:<symbol>` for executions and
//! `book:<symbol>` for book updates. Cross-topic ordering is not
//! guaranteed; within a topic delivery is FIFO.

use matching_engine::events::MarketEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A subscribable topic
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    /// Book updates: `book:<symbol>`
    Book { symbol: String },
    /// Trade executions: `trades:<symbol>`
    Trades { symbol: String },
}

impl Topic {
    pub fn book(symbol: impl Into<String>) -> Self {
        Topic::Book {
            symbol: symbol.into(),
        }
    }

    pub fn trades(symbol: impl Into<String>) -> Self {
        Topic::Trades {
            symbol: symbol.into(),
        }
    }

    /// Parse a topic string
    ///
    /// Formats: `book:BTC-USD`, `trades:BTC-USD`.
    pub fn parse(s: &str) -> Option<Self> {
        let (kind, symbol) = s.split_once(':')?;
        if symbol.is_empty() {
            return None;
        }
        match kind {
            "book" => Some(Topic::book(symbol)),
            "trades" => Some(Topic::trades(symbol)),
            _ => None,
        }
    }

    /// The topic an engine event is routed to
    pub fn for_event(event: &MarketEvent) -> Self {
        match event {
            MarketEvent::TradeExecuted { symbol, .. } => Topic::trades(symbol.as_str()),
            MarketEvent::BookUpdated { symbol, .. } => Topic::book(symbol.as_str()),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Topic::Book { symbol } => symbol,
            Topic::Trades { symbol } => symbol,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Book { symbol } => write!(f, "book:{symbol}"),
            Topic::Trades { symbol } => write!(f, "trades:{symbol}"),
        }
    }
}

impl Serialize for Topic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Topic::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid topic: {s}")))
    }
}
