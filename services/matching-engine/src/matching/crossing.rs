//! Tradability predicate
//!
//! Decides whether an incoming order may trade against a resting level at
//! `maker_price`. The same predicate drives both the live walk and the
//! fill-or-kill dry run.

use types::numeric::Price;
use types::order::{OrderType, Side};

/// Whether an incoming order can trade at `maker_price`
///
/// Market orders trade at any price. Priced orders (limit/IOC/FOK) trade
/// only when the maker price does not breach their limit: a buyer never
/// pays above its limit, a seller never receives below it.
pub fn tradable(
    order_type: OrderType,
    side: Side,
    limit: Option<Price>,
    maker_price: Price,
) -> bool {
    if matches!(order_type, OrderType::Market) {
        return true;
    }
    match (side, limit) {
        (Side::Buy, Some(limit)) => maker_price <= limit,
        (Side::Sell, Some(limit)) => maker_price >= limit,
        // Priced order without a price never reaches the core; refuse to trade
        (_, None) => false,
    }
}
