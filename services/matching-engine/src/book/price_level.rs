//! Price level with FIFO queue
//!
//! A price level holds the resting remainders at one price, in arrival
//! order. Consumption only ever touches the head; there is no reordering.
//!
//! Level invariants:
//! - entries are ordered by strictly increasing arrival sequence
//! - every entry has remaining > 0
//! - the cached volume equals the sum of entry remainders

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};

/// A resting order's remainder inside a price level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestingOrder {
    pub order_id: OrderId,
    /// Engine arrival sequence; FIFO position derives from it
    pub sequence: u64,
    pub remaining: Quantity,
}

/// FIFO queue of resting remainders at a single price
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    orders: VecDeque<RestingOrder>,
    /// Cached aggregate of entry remainders
    volume: Quantity,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            volume: Quantity::zero(),
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Append a resting remainder at the tail of the FIFO
    ///
    /// Precondition: `order.remaining > 0`.
    pub fn push_back(&mut self, order: RestingOrder) {
        debug_assert!(!order.remaining.is_zero());
        self.volume = self.volume + order.remaining;
        self.orders.push_back(order);
    }

    /// The front order, without removing it
    pub fn front(&self) -> Option<&RestingOrder> {
        self.orders.front()
    }

    /// Decrement the head by `quantity`, removing it when fully consumed
    ///
    /// Returns true when the head was removed. `quantity` must not exceed
    /// the head's remainder.
    pub fn consume(&mut self, quantity: Quantity) -> bool {
        let Some(front) = self.orders.front_mut() else {
            return false;
        };
        front.remaining = front.remaining - quantity;
        self.volume = self.volume - quantity;
        if front.remaining.is_zero() {
            self.orders.pop_front();
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Aggregate volume at this level
    pub fn volume(&self) -> Quantity {
        self.volume
    }

    /// Number of resting orders at this level
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Verify the level invariants, returning a description on failure
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut total = Quantity::zero();
        let mut last_sequence = None;
        for entry in &self.orders {
            if entry.remaining.is_zero() {
                return Err(format!(
                    "level {} holds order {} with zero remainder",
                    self.price, entry.order_id
                ));
            }
            if let Some(last) = last_sequence {
                if entry.sequence <= last {
                    return Err(format!(
                        "level {} FIFO out of order: sequence {} after {}",
                        self.price, entry.sequence, last
                    ));
                }
            }
            last_sequence = Some(entry.sequence);
            total = total + entry.remaining;
        }
        if total != self.volume {
            return Err(format!(
                "level {} volume cache {} != sum of remainders {}",
                self.price, self.volume, total
            ));
        }
        Ok(())
    }
}
