//! WebSocket market data feed
//!
//! Flow: connect → welcome → subscribe to topics → snapshot per book
//! topic → streamed events. The socket task drains its fan-out queue on a
//! short interval; a slow client only ever loses its own oldest events.

use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use market_data::{SubscriberHandle, Topic};
use matching_engine::engine::unix_nanos_now;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const DRAIN_INTERVAL: Duration = Duration::from_millis(25);

/// Client request message
///
/// Actions: `subscribe`, `unsubscribe` (with `channels`),
/// `list_subscriptions`.
#[derive(Debug, Deserialize)]
struct ClientMessage {
    action: String,
    #[serde(default)]
    channels: Vec<String>,
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let subscriber = state.publisher.subscribe([]);

    let welcome = json!({
        "type": "welcome",
        "message": "Connected to market data feed",
        "timestamp": unix_nanos_now(),
    });
    if sender.send(Message::Text(welcome.to_string())).await.is_err() {
        state.publisher.remove(subscriber.id());
        return;
    }

    let mut drain = tokio::time::interval(DRAIN_INTERVAL);
    loop {
        tokio::select! {
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if handle_client_message(&text, &state, &subscriber, &mut sender)
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
            _ = drain.tick() => {
                if flush_deliveries(&subscriber, &mut sender).await.is_err() {
                    break;
                }
            }
        }
    }

    state.publisher.remove(subscriber.id());
    debug!(
        subscriber_id = subscriber.id(),
        dropped = subscriber.dropped(),
        "websocket client disconnected"
    );
}

async fn handle_client_message(
    text: &str,
    state: &AppState,
    subscriber: &SubscriberHandle,
    sender: &mut SplitSink<WebSocket, Message>,
) -> Result<(), axum::Error> {
    let Ok(message) = serde_json::from_str::<ClientMessage>(text) else {
        return send_error(sender, "invalid JSON message").await;
    };

    match message.action.as_str() {
        "subscribe" => {
            let mut accepted = Vec::new();
            for channel in &message.channels {
                let Some(topic) = Topic::parse(channel) else {
                    send_error(sender, &format!("unknown channel: {channel}")).await?;
                    continue;
                };
                subscriber.subscribe(topic.clone());
                accepted.push(topic.clone());

                // Book subscriptions start from a full snapshot; deltas
                // follow through the queue.
                if let Topic::Book { symbol } = &topic {
                    if let Some(view) = state.engine.book_view(symbol, state.default_depth) {
                        let snapshot = json!({
                            "type": "book_snapshot",
                            "topic": topic,
                            "data": view,
                        });
                        sender.send(Message::Text(snapshot.to_string())).await?;
                    }
                }
            }
            send_ack(sender, "subscribed", &accepted).await
        }
        "unsubscribe" => {
            let mut removed = Vec::new();
            for channel in &message.channels {
                if let Some(topic) = Topic::parse(channel) {
                    subscriber.unsubscribe(&topic);
                    removed.push(topic);
                }
            }
            send_ack(sender, "unsubscribed", &removed).await
        }
        "list_subscriptions" => {
            let list = json!({
                "type": "subscription_list",
                "channels": subscriber.topics(),
                "dropped_events": subscriber.dropped(),
                "timestamp": unix_nanos_now(),
            });
            sender.send(Message::Text(list.to_string())).await
        }
        other => send_error(sender, &format!("unknown action: {other}")).await,
    }
}

async fn send_ack(
    sender: &mut SplitSink<WebSocket, Message>,
    status: &str,
    channels: &[Topic],
) -> Result<(), axum::Error> {
    let ack = json!({
        "type": "subscription",
        "status": status,
        "channels": channels,
        "timestamp": unix_nanos_now(),
    });
    sender.send(Message::Text(ack.to_string())).await
}

async fn send_error(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &str,
) -> Result<(), axum::Error> {
    let error = json!({
        "type": "error",
        "message": message,
        "timestamp": unix_nanos_now(),
    });
    sender.send(Message::Text(error.to_string())).await
}

async fn flush_deliveries(
    subscriber: &SubscriberHandle,
    sender: &mut SplitSink<WebSocket, Message>,
) -> Result<(), axum::Error> {
    for delivery in subscriber.drain() {
        let message = json!({
            "type": "event",
            "topic": delivery.topic,
            "data": delivery.event,
        });
        sender.send(Message::Text(message.to_string())).await?;
    }
    Ok(())
}
