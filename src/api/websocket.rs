use axum::{
    extract::{State, ws::{WebSocket, WebSocketUpgrade, Message}},
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, Duration};
use futures::{SinkExt, StreamExt};
use crate::render;
use crate::services::ViewState;
use super::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

fn state_message(view: &ViewState) -> Message {
    let msg = serde_json::json!({
        "type": "state",
        "data": render::snapshot(view),
    });
    Message::Text(msg.to_string())
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut updates = state.dashboard.subscribe();
    let mut heartbeat_ticker = interval(Duration::from_secs(10));

    // current state first so the client never waits for the next transition
    if sender.send(state_message(&state.dashboard.snapshot())).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = updates.recv() => {
                let view = match update {
                    Ok(view) => view,
                    // only the latest state matters
                    Err(RecvError::Lagged(_)) => state.dashboard.snapshot(),
                    Err(RecvError::Closed) => return,
                };
                if sender.send(state_message(&view)).await.is_err() {
                    return;
                }
            }

            _ = heartbeat_ticker.tick() => {
                if sender.send(Message::Ping(vec![])).await.is_err() {
                    return;
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(cmd) = serde_json::from_str::<serde_json::Value>(&text) {
                            if cmd["type"] == "refresh" {
                                let accepted = state.dashboard.spawn_refresh();
                                let reply = serde_json::json!({ "type": "refresh", "accepted": accepted });
                                let _ = sender.send(Message::Text(reply.to_string())).await;
                            } else if cmd["type"] == "ping" {
                                let _ = sender.send(Message::Text(r#"{"type":"pong"}"#.to_string())).await;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return,
                    _ => {}
                }
            }
        }
    }
}
