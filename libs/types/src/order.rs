//! Order model and lifecycle statuses

use crate::ids::{OrderId, Symbol};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type, controlling price constraints and residual handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Match what crosses, rest the residual at the limit price
    Limit,
    /// Match against whatever is available, discard the residual
    Market,
    /// Immediate-or-cancel: match what crosses, discard the residual
    Ioc,
    /// Fill-or-kill: fill in full atomically or reject with no side effects
    Fok,
}

impl OrderType {
    /// Whether this type must carry a limit price
    pub fn requires_price(self) -> bool {
        !matches!(self, OrderType::Market)
    }

    /// Whether a residual of this type may rest on the book
    pub fn can_rest(self) -> bool {
        matches!(self, OrderType::Limit)
    }

    /// Whether partial fills are allowed
    pub fn allows_partial(self) -> bool {
        !matches!(self, OrderType::Fok)
    }
}

/// Terminal status of a submission, as reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Fully matched
    Filled,
    /// Matched in part; the residual rests on the book
    PartiallyFilledResting,
    /// Matched in part (possibly not at all); the residual was discarded
    PartiallyFilledCancelled,
    /// No match; the order rests on the book
    Resting,
    /// Refused at admission or by FOK atomicity; no book mutation
    Rejected,
}

/// An order admitted by the engine
///
/// `sequence` is the engine-assigned arrival sequence; all intra-symbol
/// ordering derives from it. `accepted_at` is reporting-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    /// Limit price; absent for market orders
    pub price: Option<Price>,
    /// Original quantity, immutable after admission
    pub quantity: Quantity,
    /// Unfilled remainder; the only field matching mutates
    pub remaining: Quantity,
    pub sequence: u64,
    /// Unix nanos at admission
    pub accepted_at: i64,
}

impl Order {
    pub fn new(
        symbol: Symbol,
        side: Side,
        order_type: OrderType,
        price: Option<Price>,
        quantity: Quantity,
        sequence: u64,
        accepted_at: i64,
    ) -> Self {
        Self {
            order_id: OrderId::new(),
            symbol,
            side,
            order_type,
            price,
            quantity,
            remaining: quantity,
            sequence,
            accepted_at,
        }
    }

    /// Decrement the remainder by a fill
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity
    pub fn fill(&mut self, quantity: Quantity) {
        self.remaining = self.remaining - quantity;
    }

    /// Quantity matched so far
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.remaining
    }

    pub fn is_filled(&self) -> bool {
        self.remaining.is_zero()
    }

    pub fn has_fills(&self) -> bool {
        !self.filled_quantity().is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_order(qty: &str) -> Order {
        Order::new(
            Symbol::new("BTC-USD"),
            Side::Buy,
            OrderType::Limit,
            Some(Price::from_u64(50000)),
            Quantity::from_str(qty).unwrap(),
            1,
            1708123456789000000,
        )
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_order_type_price_rules() {
        assert!(OrderType::Limit.requires_price());
        assert!(OrderType::Ioc.requires_price());
        assert!(OrderType::Fok.requires_price());
        assert!(!OrderType::Market.requires_price());
    }

    #[test]
    fn test_order_type_resting_rules() {
        assert!(OrderType::Limit.can_rest());
        assert!(!OrderType::Market.can_rest());
        assert!(!OrderType::Ioc.can_rest());
        assert!(!OrderType::Fok.can_rest());
    }

    #[test]
    fn test_order_type_partial_rules() {
        assert!(OrderType::Limit.allows_partial());
        assert!(OrderType::Market.allows_partial());
        assert!(OrderType::Ioc.allows_partial());
        assert!(!OrderType::Fok.allows_partial());
    }

    #[test]
    fn test_order_fill_bookkeeping() {
        let mut order = limit_order("1.0");
        assert!(!order.has_fills());

        order.fill(Quantity::from_str("0.3").unwrap());
        assert!(order.has_fills());
        assert!(!order.is_filled());
        assert_eq!(order.filled_quantity(), Quantity::from_str("0.3").unwrap());

        order.fill(Quantity::from_str("0.7").unwrap());
        assert!(order.is_filled());
        assert_eq!(order.remaining, Quantity::zero());
    }

    #[test]
    #[should_panic(expected = "Quantity subtraction would go negative")]
    fn test_order_overfill_panics() {
        let mut order = limit_order("1.0");
        order.fill(Quantity::from_str("1.5").unwrap());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"buy\"");
        assert_eq!(serde_json::to_string(&OrderType::Fok).unwrap(), "\"fok\"");
        assert_eq!(
            serde_json::to_string(&OrderStatus::PartiallyFilledResting).unwrap(),
            "\"partially_filled_resting\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::PartiallyFilledCancelled).unwrap(),
            "\"partially_filled_cancelled\""
        );
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let order = limit_order("2.5");
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
