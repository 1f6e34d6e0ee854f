//! WebSocket endpoint: bridges a socket to the relay core. Each connection
//! gets a read loop (this task) and a write loop (spawned) around a
//! [`ConnectionSession`].

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use courier_database::User;
use courier_relay::{ClientEvent, ConnectionHandle, ConnectionSession, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct WebSocketQuery {
    token: String,
}

#[utoipa::path(
    get,
    path = "/ws",
    tag = "WebSocket",
    responses(
        (status = 101, description = "Switching to the realtime event stream"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WebSocketQuery>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let user = state.authenticate(&params.token).await?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

async fn handle_socket(socket: WebSocket, state: AppState, user: User) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (handle, mut outbound) = ConnectionHandle::channel();
    let mut session = ConnectionSession::new(state.router(), handle.clone());

    let connection = handle.id();
    debug!(user = %user.public_id, connection, "websocket connected");

    // Write loop: drain the connection's outbound queue onto the socket.
    // Ends when every handle clone is gone, i.e. after the session closes.
    let writer = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(%err, "failed to encode outbound event");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    // Read loop: one inbound event at a time, so a sender's messages are
    // persisted and delivered in the order they were sent.
    while let Some(message) = ws_receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => {
                    if let ClientEvent::Join { user_id } = &event {
                        // The socket was authenticated at upgrade time; a
                        // join for anyone else is rejected at the boundary.
                        if user_id != &user.public_id {
                            handle.send(ServerEvent::Error {
                                error: "invalid_input".to_string(),
                                message: "identity does not match this connection".to_string(),
                            });
                            continue;
                        }
                    }
                    session.handle_event(event).await;
                }
                Err(err) => {
                    debug!(user = %user.public_id, %err, "malformed client event");
                    handle.send(ServerEvent::Error {
                        error: "invalid_input".to_string(),
                        message: "malformed event payload".to_string(),
                    });
                }
            },
            Ok(Message::Close(_)) => break,
            Err(err) => {
                debug!(user = %user.public_id, %err, "websocket receive error");
                break;
            }
            // Ping/pong/binary frames carry no client events.
            Ok(_) => {}
        }
    }

    session.close().await;
    drop(session);
    drop(handle);

    // All outbound senders are gone now; the writer drains and exits.
    let _ = writer.await;
    debug!(user = %user.public_id, connection, "websocket closed");
}
