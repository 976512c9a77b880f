use serde::{Deserialize, Serialize};
use types::errors::RejectReason;
use types::ids::{OrderId, TradeId};
use types::numeric::{Price, Quantity};
use types::order::{OrderStatus, Side};
use types::trade::Trade;

use matching_engine::SubmitOutcome;

/// One execution in a submission response
#[derive(Debug, Clone, Serialize)]
pub struct TradeView {
    pub trade_id: TradeId,
    pub price: Price,
    pub quantity: Quantity,
    pub aggressor_side: Side,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub timestamp: i64,
}

impl From<&Trade> for TradeView {
    fn from(trade: &Trade) -> Self {
        Self {
            trade_id: trade.trade_id,
            price: trade.price,
            quantity: trade.quantity,
            aggressor_side: trade.aggressor_side,
            maker_order_id: trade.maker_order_id,
            taker_order_id: trade.taker_order_id,
            timestamp: trade.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitOrderResponse {
    pub status: OrderStatus,
    pub order_id: OrderId,
    pub sequence: u64,
    pub trades: Vec<TradeView>,
    pub remaining_quantity: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

impl From<SubmitOutcome> for SubmitOrderResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            status: outcome.status,
            order_id: outcome.order_id,
            sequence: outcome.sequence,
            trades: outcome.trades.iter().map(TradeView::from).collect(),
            remaining_quantity: outcome.remaining,
            reason: outcome.reason,
        }
    }
}

/// Query parameters for the order book endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DepthQuery {
    pub depth: Option<usize>,
}

/// Query parameters for the recent trades endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}
