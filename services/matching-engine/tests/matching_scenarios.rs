//! End-to-end matching scenarios through the engine façade

use std::sync::{Arc, Mutex};

use rust_decimal::prelude::FromStr;
use rust_decimal::Decimal;

use matching_engine::events::{EventSink, MarketEvent};
use matching_engine::{MatchingEngine, OrderRequest};
use types::instrument::{InstrumentSpec, InstrumentTable};
use types::numeric::{Price, Quantity};
use types::order::{OrderStatus, OrderType, Side};

fn engine() -> MatchingEngine {
    let table = InstrumentTable::new([
        InstrumentSpec::new(
            "BTC-USD",
            Decimal::from_str("0.01").unwrap(),
            Decimal::from_str("0.001").unwrap(),
        ),
        InstrumentSpec::new(
            "ETH-USD",
            Decimal::from_str("0.01").unwrap(),
            Decimal::from_str("0.001").unwrap(),
        ),
    ]);
    MatchingEngine::new(table)
}

fn submit(
    engine: &MatchingEngine,
    side: Side,
    order_type: OrderType,
    price: Option<&str>,
    qty: &str,
) -> matching_engine::SubmitOutcome {
    engine
        .submit(OrderRequest {
            symbol: "BTC-USD".into(),
            side,
            order_type,
            quantity: Quantity::from_str(qty).unwrap(),
            price: price.map(|p| Price::from_str(p).unwrap()),
        })
        .expect("engine healthy")
}

fn qty(s: &str) -> Quantity {
    Quantity::from_str(s).unwrap()
}

fn price(s: &str) -> Price {
    Price::from_str(s).unwrap()
}

#[test]
fn sweep_two_ask_levels_and_leave_residual_volume() {
    // Seed asks: 1.0 @ 100, 2.0 @ 101. Buy limit 2.5 @ 101 sweeps both
    // levels, paying each maker's own price.
    let engine = engine();
    submit(&engine, Side::Sell, OrderType::Limit, Some("100"), "1.0");
    submit(&engine, Side::Sell, OrderType::Limit, Some("101"), "2.0");

    let outcome = submit(&engine, Side::Buy, OrderType::Limit, Some("101"), "2.5");

    assert_eq!(outcome.status, OrderStatus::Filled);
    assert_eq!(outcome.trades.len(), 2);
    assert_eq!(outcome.trades[0].price, price("100"));
    assert_eq!(outcome.trades[0].quantity, qty("1.0"));
    assert_eq!(outcome.trades[1].price, price("101"));
    assert_eq!(outcome.trades[1].quantity, qty("1.5"));

    let view = engine.book_view("BTC-USD", 10).unwrap();
    assert!(view.bids.is_empty());
    assert_eq!(view.asks, vec![(price("101"), qty("0.5"))]);
}

#[test]
fn market_sell_sweeps_bids_and_discards_residual() {
    // Seed bids: 1.0 @ 99, 1.0 @ 98. Market sell 2.5 takes both, drops 0.5.
    let engine = engine();
    submit(&engine, Side::Buy, OrderType::Limit, Some("99"), "1.0");
    submit(&engine, Side::Buy, OrderType::Limit, Some("98"), "1.0");

    let outcome = submit(&engine, Side::Sell, OrderType::Market, None, "2.5");

    assert_eq!(outcome.status, OrderStatus::PartiallyFilledCancelled);
    assert_eq!(outcome.trades.len(), 2);
    assert_eq!(outcome.trades[0].price, price("99"));
    assert_eq!(outcome.trades[1].price, price("98"));
    assert_eq!(outcome.remaining, qty("0.5"));

    let view = engine.book_view("BTC-USD", 10).unwrap();
    assert!(view.bids.is_empty());
    assert!(view.asks.is_empty());
}

#[test]
fn fok_fills_when_exactly_covered() {
    // Seed asks: 1.0 @ 100, 1.0 @ 101. FOK buy 2.0 @ 101 is exactly covered.
    let engine = engine();
    submit(&engine, Side::Sell, OrderType::Limit, Some("100"), "1.0");
    submit(&engine, Side::Sell, OrderType::Limit, Some("101"), "1.0");

    let outcome = submit(&engine, Side::Buy, OrderType::Fok, Some("101"), "2.0");

    assert_eq!(outcome.status, OrderStatus::Filled);
    assert_eq!(outcome.trades.len(), 2);
    assert_eq!(outcome.trades[0].price, price("100"));
    assert_eq!(outcome.trades[1].price, price("101"));
}

#[test]
fn fok_rejects_without_side_effects_when_short() {
    // Same seed; FOK buy 3.0 @ 101 is one unit short and must leave the
    // book bit-identical.
    let engine = engine();
    submit(&engine, Side::Sell, OrderType::Limit, Some("100"), "1.0");
    submit(&engine, Side::Sell, OrderType::Limit, Some("101"), "1.0");
    let before = engine.book_view("BTC-USD", 10).unwrap();

    let outcome = submit(&engine, Side::Buy, OrderType::Fok, Some("101"), "3.0");

    assert_eq!(outcome.status, OrderStatus::Rejected);
    assert_eq!(
        outcome.reason,
        Some(types::errors::RejectReason::FokUnfillable)
    );
    assert!(outcome.trades.is_empty());

    let after = engine.book_view("BTC-USD", 10).unwrap();
    assert_eq!(after.asks, vec![(price("100"), qty("1.0")), (price("101"), qty("1.0"))]);
    assert_eq!(after.bids, before.bids);
}

#[test]
fn same_price_levels_fill_in_arrival_order() {
    // Two asks at 100; the earlier one fills first, the later keeps 0.5.
    let engine = engine();
    let earlier = submit(&engine, Side::Sell, OrderType::Limit, Some("100"), "1.0");
    let later = submit(&engine, Side::Sell, OrderType::Limit, Some("100"), "1.0");

    let outcome = submit(&engine, Side::Buy, OrderType::Limit, Some("100"), "1.5");

    assert_eq!(outcome.trades.len(), 2);
    assert_eq!(outcome.trades[0].maker_order_id, earlier.order_id);
    assert_eq!(outcome.trades[0].quantity, qty("1.0"));
    assert_eq!(outcome.trades[1].maker_order_id, later.order_id);
    assert_eq!(outcome.trades[1].quantity, qty("0.5"));

    let view = engine.book_view("BTC-USD", 10).unwrap();
    assert_eq!(view.asks, vec![(price("100"), qty("0.5"))]);
}

#[test]
fn rest_then_ioc_partial_consumption() {
    // Limit buy 1.0 @ 100 rests; IOC sell 0.6 @ 100 trades and leaves 0.4.
    let engine = engine();
    let rest = submit(&engine, Side::Buy, OrderType::Limit, Some("100"), "1.0");
    assert_eq!(rest.status, OrderStatus::Resting);
    assert!(rest.trades.is_empty());

    let ioc = submit(&engine, Side::Sell, OrderType::Ioc, Some("100"), "0.6");
    assert_eq!(ioc.status, OrderStatus::Filled);
    assert_eq!(ioc.trades.len(), 1);
    assert_eq!(ioc.trades[0].price, price("100"));
    assert_eq!(ioc.trades[0].quantity, qty("0.6"));

    let view = engine.book_view("BTC-USD", 10).unwrap();
    assert_eq!(view.bids, vec![(price("100"), qty("0.4"))]);
}

#[test]
fn seed_and_unwind_leaves_empty_book() {
    // Rest N limits, then consume them in reverse with opposing limits:
    // every quantity trades and both sides end empty.
    let engine = engine();
    let seeds: [(&str, &str); 3] = [("100", "1.0"), ("101", "2.0"), ("102", "0.5")];
    for (p, q) in seeds {
        submit(&engine, Side::Sell, OrderType::Limit, Some(p), q);
    }

    let mut traded = Quantity::zero();
    for (_, q) in seeds.iter().rev() {
        let outcome = submit(&engine, Side::Buy, OrderType::Limit, Some("102"), q);
        assert_eq!(outcome.status, OrderStatus::Filled);
        for trade in &outcome.trades {
            traded = traded + trade.quantity;
        }
    }

    assert_eq!(traded, qty("3.5"));
    let view = engine.book_view("BTC-USD", 10).unwrap();
    assert!(view.bids.is_empty());
    assert!(view.asks.is_empty());

    let stats = engine.stats();
    assert_eq!(
        stats.total_matched_volume_per_symbol.get("BTC-USD"),
        Some(&Decimal::from_str("3.5").unwrap())
    );
}

#[test]
fn quiescent_snapshots_are_stable() {
    let engine = engine();
    submit(&engine, Side::Buy, OrderType::Limit, Some("99"), "1.0");
    submit(&engine, Side::Sell, OrderType::Limit, Some("101"), "2.0");

    let first = engine.book_view("BTC-USD", usize::MAX).unwrap();
    let second = engine.book_view("BTC-USD", usize::MAX).unwrap();
    assert_eq!(first.bids, second.bids);
    assert_eq!(first.asks, second.asks);
    assert_eq!(first.sequence, second.sequence);
}

#[test]
fn symbols_do_not_share_books() {
    let engine = engine();
    submit(&engine, Side::Sell, OrderType::Limit, Some("100"), "1.0");

    let eth = engine
        .submit(OrderRequest {
            symbol: "ETH-USD".into(),
            side: Side::Buy,
            order_type: OrderType::Limit,
            quantity: qty("1.0"),
            price: Some(price("100")),
        })
        .unwrap();

    // The ETH buy must not cross the BTC ask
    assert_eq!(eth.status, OrderStatus::Resting);
    assert_eq!(
        engine.book_view("BTC-USD", 10).unwrap().asks,
        vec![(price("100"), qty("1.0"))]
    );
}

/// Sink capturing per-symbol event order for the tests below
struct RecordingSink {
    events: Mutex<Vec<MarketEvent>>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &MarketEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[test]
fn events_follow_submission_order_with_sequences() {
    let sink = Arc::new(RecordingSink::new());
    let engine = engine().with_sink(sink.clone());

    submit(&engine, Side::Sell, OrderType::Limit, Some("100"), "1.0");
    submit(&engine, Side::Buy, OrderType::Limit, Some("100"), "1.0");

    let events = sink.events.lock().unwrap();
    // Resting submission publishes one book update; the cross publishes a
    // trade followed by a book update.
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].event_type_label(), "BookUpdated");
    assert_eq!(events[0].sequence(), 1);
    assert_eq!(events[1].event_type_label(), "TradeExecuted");
    assert_eq!(events[1].sequence(), 2);
    assert_eq!(events[2].event_type_label(), "BookUpdated");
    assert_eq!(events[2].sequence(), 2);

    match &events[2] {
        MarketEvent::BookUpdated { bids, asks, .. } => {
            assert!(bids.is_empty());
            assert!(asks.is_empty());
        }
        other => panic!("expected BookUpdated, got {other:?}"),
    }
}

#[test]
fn fok_rejection_emits_no_events() {
    let sink = Arc::new(RecordingSink::new());
    let engine = engine().with_sink(sink.clone());

    submit(&engine, Side::Sell, OrderType::Limit, Some("100"), "1.0");
    let before = sink.events.lock().unwrap().len();

    submit(&engine, Side::Buy, OrderType::Fok, Some("100"), "2.0");
    assert_eq!(sink.events.lock().unwrap().len(), before);
}
