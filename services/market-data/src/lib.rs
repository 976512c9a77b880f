//! Market data fan-out
//!
//! Delivers engine events to subscribers without ever blocking the
//! matching path:
//! - `channels`: the topic model (`book:<symbol>`, `trades:<symbol>`)
//! - `publisher`: per-subscriber bounded queues with drop-oldest overflow
//!   and dropped-event counters
//! - `trades`: public trade history with replay
//!
//! Delivery is per-topic FIFO and at-most-once; a slow subscriber loses
//! its oldest events rather than stalling the engine.

pub mod channels;
pub mod publisher;
pub mod trades;

pub use channels::Topic;
pub use publisher::{Delivery, Publisher, SubscriberHandle};
pub use trades::{PublicTrade, TradeTape};
