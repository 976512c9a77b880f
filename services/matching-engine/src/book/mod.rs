//! Order book infrastructure
//!
//! A two-sided, price-indexed book per symbol. Book invariants:
//! - no empty price level is retained
//! - after a match completes, the best bid is strictly below the best ask
//! - an order rests on the side it was submitted for

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use price_level::{PriceLevel, RestingOrder};

use serde::{Deserialize, Serialize};
use types::ids::Symbol;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

/// Top-of-book prices and volumes; a side is None when it holds no orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bbo {
    pub bid: Option<(Price, Quantity)>,
    pub ask: Option<(Price, Quantity)>,
}

/// Depth-limited view of both sides, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}

/// Two-sided order book for a single symbol
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: Symbol,
    bids: BidBook,
    asks: AskBook,
}

impl OrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BidBook::new(),
            asks: AskBook::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Rest an order's remainder on its own side at its limit price
    pub fn insert_resting(&mut self, order: &Order) {
        let price = order.price.expect("resting order carries a limit price");
        let entry = RestingOrder {
            order_id: order.order_id,
            sequence: order.sequence,
            remaining: order.remaining,
        };
        match order.side {
            Side::Buy => self.bids.insert(price, entry),
            Side::Sell => self.asks.insert(price, entry),
        }
    }

    /// Best level on `side`: max price for bids, min price for asks
    pub fn best(&self, side: Side) -> Option<(Price, Quantity)> {
        match side {
            Side::Buy => self.bids.best(),
            Side::Sell => self.asks.best(),
        }
    }

    pub(crate) fn best_level_mut(&mut self, side: Side) -> Option<(Price, &mut PriceLevel)> {
        match side {
            Side::Buy => self.bids.best_level_mut(),
            Side::Sell => self.asks.best_level_mut(),
        }
    }

    /// Levels on `side` from best to worst
    pub fn levels_from_best(
        &self,
        side: Side,
    ) -> Box<dyn Iterator<Item = (Price, &PriceLevel)> + '_> {
        match side {
            Side::Buy => Box::new(self.bids.levels_from_best()),
            Side::Sell => Box::new(self.asks.levels_from_best()),
        }
    }

    /// Drop the level at `price` on `side` if it holds no volume
    pub fn remove_if_empty(&mut self, side: Side, price: Price) {
        match side {
            Side::Buy => self.bids.remove_if_empty(price),
            Side::Sell => self.asks.remove_if_empty(price),
        }
    }

    /// Top `depth` levels per side, best first
    pub fn snapshot(&self, depth: usize) -> DepthSnapshot {
        DepthSnapshot {
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
        }
    }

    pub fn bbo(&self) -> Bbo {
        Bbo {
            bid: self.bids.best(),
            ask: self.asks.best(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Verify level and book invariants, returning a description on failure
    pub fn check_invariants(&self) -> Result<(), String> {
        for (price, level) in self.bids.levels_from_best() {
            if level.is_empty() {
                return Err(format!("empty bid level retained at {price}"));
            }
            level.check_invariants()?;
        }
        for (price, level) in self.asks.levels_from_best() {
            if level.is_empty() {
                return Err(format!("empty ask level retained at {price}"));
            }
            level.check_invariants()?;
        }
        if let (Some((bid, _)), Some((ask, _))) = (self.bids.best(), self.asks.best()) {
            if bid >= ask {
                return Err(format!("book crossed: best bid {bid} >= best ask {ask}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::order::OrderType;

    fn resting_order(side: Side, price: u64, qty: &str, sequence: u64) -> Order {
        Order::new(
            Symbol::new("BTC-USD"),
            side,
            OrderType::Limit,
            Some(Price::from_u64(price)),
            Quantity::from_str(qty).unwrap(),
            sequence,
            1708123456789000000,
        )
    }

    #[test]
    fn test_insert_resting_lands_on_own_side() {
        let mut book = OrderBook::new(Symbol::new("BTC-USD"));
        book.insert_resting(&resting_order(Side::Buy, 50000, "1.0", 1));
        book.insert_resting(&resting_order(Side::Sell, 50100, "2.0", 2));

        assert_eq!(
            book.best(Side::Buy),
            Some((Price::from_u64(50000), Quantity::from_str("1.0").unwrap()))
        );
        assert_eq!(
            book.best(Side::Sell),
            Some((Price::from_u64(50100), Quantity::from_str("2.0").unwrap()))
        );
    }

    #[test]
    fn test_bbo_empty_sides() {
        let book = OrderBook::new(Symbol::new("BTC-USD"));
        let bbo = book.bbo();
        assert!(bbo.bid.is_none());
        assert!(bbo.ask.is_none());
    }

    #[test]
    fn test_snapshot_depth_limit() {
        let mut book = OrderBook::new(Symbol::new("BTC-USD"));
        for (i, price) in [50000u64, 49900, 49800, 49700].iter().enumerate() {
            book.insert_resting(&resting_order(Side::Buy, *price, "1.0", i as u64 + 1));
        }

        let snapshot = book.snapshot(2);
        assert_eq!(snapshot.bids.len(), 2);
        assert_eq!(snapshot.bids[0].0, Price::from_u64(50000));
        assert_eq!(snapshot.bids[1].0, Price::from_u64(49900));
        assert!(snapshot.asks.is_empty());
    }

    #[test]
    fn test_invariants_pass_on_uncrossed_book() {
        let mut book = OrderBook::new(Symbol::new("BTC-USD"));
        book.insert_resting(&resting_order(Side::Buy, 49900, "1.0", 1));
        book.insert_resting(&resting_order(Side::Sell, 50100, "1.0", 2));
        assert!(book.check_invariants().is_ok());
    }

    #[test]
    fn test_invariants_catch_crossed_book() {
        let mut book = OrderBook::new(Symbol::new("BTC-USD"));
        book.insert_resting(&resting_order(Side::Buy, 50200, "1.0", 1));
        book.insert_resting(&resting_order(Side::Sell, 50100, "1.0", 2));
        assert!(book.check_invariants().is_err());
    }

    #[test]
    fn test_snapshot_serializes_as_string_pairs() {
        let mut book = OrderBook::new(Symbol::new("BTC-USD"));
        book.insert_resting(&resting_order(Side::Sell, 50100, "1.5", 1));

        let json = serde_json::to_value(book.snapshot(10)).unwrap();
        assert_eq!(json["asks"][0][0], "50100");
        assert_eq!(json["asks"][0][1], "1.5");
    }
}
