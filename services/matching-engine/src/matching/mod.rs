//! Matching core
//!
//! Consumes one incoming order against its symbol's book, producing trades
//! and an updated book. Pure and synchronous: no suspension, no sequence
//! assignment, no event publication. The walk always trades against the
//! opposite side's best level head-first, so a trade can never execute
//! while a better resting price is available.

pub mod crossing;
pub mod executor;

pub use executor::MatchExecutor;

use tracing::trace;
use types::numeric::Quantity;
use types::order::{Order, OrderType};
use types::trade::Trade;

use crate::book::OrderBook;

/// What one matching pass did to the book
#[derive(Debug)]
pub struct MatchOutcome {
    /// Trades in execution order
    pub trades: Vec<Trade>,
    /// Whether the incoming order's residual was rested
    pub rested: bool,
    /// Fill-or-kill order that could not fill in full; book untouched
    pub killed: bool,
}

impl MatchOutcome {
    fn killed() -> Self {
        Self {
            trades: Vec::new(),
            rested: false,
            killed: true,
        }
    }
}

/// Match `order` against `book`
///
/// Fill-or-kill orders run a non-mutating dry run first and are killed
/// unless the full quantity is available at tradable prices. Limit
/// residuals rest; market/IOC residuals are discarded by simply not
/// resting them.
pub fn execute(
    book: &mut OrderBook,
    order: &mut Order,
    executor: &MatchExecutor,
    timestamp: i64,
) -> MatchOutcome {
    if matches!(order.order_type, OrderType::Fok) {
        let available = fillable_quantity(book, order);
        if available < order.quantity {
            trace!(
                order_id = %order.order_id,
                %available,
                wanted = %order.quantity,
                "fill-or-kill dry run came up short"
            );
            return MatchOutcome::killed();
        }
    }

    let trades = walk(book, order, executor, timestamp);

    let rested = if !order.is_filled() && order.order_type.can_rest() {
        book.insert_resting(order);
        true
    } else {
        false
    };

    MatchOutcome {
        trades,
        rested,
        killed: false,
    }
}

/// The opposite-side walk
///
/// Repeatedly trades the head of the best tradable opposite level at the
/// maker's price, until the order fills or the opposite side is exhausted
/// or no longer tradable.
fn walk(
    book: &mut OrderBook,
    order: &mut Order,
    executor: &MatchExecutor,
    timestamp: i64,
) -> Vec<Trade> {
    let mut trades = Vec::new();
    let opposite = order.side.opposite();

    while !order.is_filled() {
        let Some((maker_price, level)) = book.best_level_mut(opposite) else {
            break;
        };
        if !crossing::tradable(order.order_type, order.side, order.price, maker_price) {
            break;
        }
        let Some(maker) = level.front().copied() else {
            break;
        };

        let quantity = order.remaining.min(maker.remaining);
        let trade = executor.execute_trade(
            order.symbol.clone(),
            maker_price,
            quantity,
            order.side,
            maker.order_id,
            order.order_id,
            timestamp,
            order.sequence,
        );

        order.fill(quantity);
        level.consume(quantity);
        if level.is_empty() {
            book.remove_if_empty(opposite, maker_price);
        }
        trades.push(trade);
    }

    trades
}

/// Dry run for fill-or-kill admission
///
/// Sums head-first availability across opposite levels tradable for this
/// order, without mutating the book. Stops early once the order's full
/// quantity is covered. Uses the same tradability predicate as the walk.
fn fillable_quantity(book: &OrderBook, order: &Order) -> Quantity {
    let mut available = Quantity::zero();
    for (maker_price, level) in book.levels_from_best(order.side.opposite()) {
        if !crossing::tradable(order.order_type, order.side, order.price, maker_price) {
            break;
        }
        available = available + level.volume();
        if available >= order.quantity {
            break;
        }
    }
    available
}
