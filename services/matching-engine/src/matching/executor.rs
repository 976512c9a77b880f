//! Trade construction
//!
//! Assigns monotonic trade ids and builds trade records. Shared across all
//! symbol books; the id counter is atomic so per-symbol critical sections
//! never contend on it.

use std::sync::atomic::{AtomicU64, Ordering};

use types::ids::{OrderId, Symbol, TradeId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// Builds trades with globally monotonic ids
#[derive(Debug)]
pub struct MatchExecutor {
    next_trade_id: AtomicU64,
}

impl MatchExecutor {
    pub fn new(starting_trade_id: u64) -> Self {
        Self {
            next_trade_id: AtomicU64::new(starting_trade_id),
        }
    }

    fn next_id(&self) -> TradeId {
        TradeId::new(self.next_trade_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Build a trade between a resting maker and an incoming taker
    ///
    /// `price` is the maker's price and `sequence` the taker submission's
    /// engine sequence.
    #[allow(clippy::too_many_arguments)]
    pub fn execute_trade(
        &self,
        symbol: Symbol,
        price: Price,
        quantity: Quantity,
        aggressor_side: Side,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        timestamp: i64,
        sequence: u64,
    ) -> Trade {
        Trade::new(
            self.next_id(),
            symbol,
            price,
            quantity,
            aggressor_side,
            maker_order_id,
            taker_order_id,
            timestamp,
            sequence,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execute(executor: &MatchExecutor, qty: &str) -> Trade {
        executor.execute_trade(
            Symbol::new("BTC-USD"),
            Price::from_u64(50000),
            Quantity::from_str(qty).unwrap(),
            Side::Buy,
            OrderId::new(),
            OrderId::new(),
            1708123456789000000,
            9,
        )
    }

    #[test]
    fn test_trade_fields() {
        let executor = MatchExecutor::new(1000);
        let trade = execute(&executor, "0.5");

        assert_eq!(trade.trade_id, TradeId::new(1000));
        assert_eq!(trade.price, Price::from_u64(50000));
        assert_eq!(trade.quantity, Quantity::from_str("0.5").unwrap());
        assert_eq!(trade.sequence, 9);
    }

    #[test]
    fn test_trade_ids_monotonic() {
        let executor = MatchExecutor::new(1);
        let t1 = execute(&executor, "0.5");
        let t2 = execute(&executor, "0.3");
        let t3 = execute(&executor, "0.1");

        assert!(t1.trade_id < t2.trade_id);
        assert!(t2.trade_id < t3.trade_id);
    }
}
