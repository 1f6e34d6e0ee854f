//! Per-connection lifecycle: identity binding, event dispatch, teardown.

use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::RelayError;
use crate::events::{ClientEvent, PresenceKind, ServerEvent, TypingKind, UserId};
use crate::registry::ConnectionHandle;
use crate::router::MessageRouter;
use crate::store::{MessageStore, UserDirectory};

enum SessionState {
    Opened,
    Joined(UserId),
    Closed,
}

/// Owns one connection from accept to close. Events arriving after `close`
/// are ignored; a connection that closes while still unjoined touches
/// neither the registry nor the presence broadcast.
pub struct ConnectionSession<S> {
    handle: ConnectionHandle,
    router: Arc<MessageRouter<S>>,
    state: SessionState,
}

impl<S> ConnectionSession<S>
where
    S: MessageStore + UserDirectory,
{
    pub fn new(router: Arc<MessageRouter<S>>, handle: ConnectionHandle) -> Self {
        Self {
            handle,
            router,
            state: SessionState::Opened,
        }
    }

    /// Identity this connection is bound to, if it has joined.
    pub fn user_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Joined(user_id) => Some(user_id),
            _ => None,
        }
    }

    /// Dispatch one inbound event.
    pub async fn handle_event(&mut self, event: ClientEvent) {
        if matches!(self.state, SessionState::Closed) {
            return;
        }

        match event {
            ClientEvent::Join { user_id } => self.join(user_id).await,
            ClientEvent::SendMessage {
                sender_id,
                receiver_id,
                chat_id,
                text,
            } => {
                match self
                    .router
                    .route_message(&sender_id, &receiver_id, &chat_id, &text)
                    .await
                {
                    Ok(_) => {}
                    Err(RelayError::InvalidInput(reason)) => {
                        // Rejected locally: no state change, no event emitted.
                        debug!(sender_id, reason, "rejected message");
                    }
                    Err(err @ RelayError::Persistence(_)) => {
                        self.handle.send(ServerEvent::Error {
                            error: "persistence_error".to_string(),
                            message: err.to_string(),
                        });
                    }
                }
            }
            ClientEvent::TypingStart { chat_id, user_id } => {
                self.router
                    .route_typing(TypingKind::Start, &chat_id, &user_id)
                    .await;
            }
            ClientEvent::TypingStop { chat_id, user_id } => {
                self.router
                    .route_typing(TypingKind::Stop, &chat_id, &user_id)
                    .await;
            }
        }
    }

    async fn join(&mut self, user_id: UserId) {
        if user_id.trim().is_empty() {
            self.handle.send(ServerEvent::Error {
                error: "invalid_input".to_string(),
                message: "user id is empty".to_string(),
            });
            return;
        }

        // Re-joining under a different identity releases the old binding
        // first, so a connection is never registered twice.
        if let SessionState::Joined(previous) = &self.state {
            if previous != &user_id {
                let previous = previous.clone();
                if self.router.registry().unbind(&previous, &self.handle).await {
                    self.router
                        .broadcast_presence(PresenceKind::Offline, &previous)
                        .await;
                }
            }
        }

        let replaced = self
            .router
            .registry()
            .bind(user_id.clone(), self.handle.clone())
            .await;
        if let Some(old) = replaced {
            debug!(user_id, old_connection = old.id(), "rebound identity to new connection");
        }

        info!(user_id, connection = self.handle.id(), "user joined");
        self.state = SessionState::Joined(user_id.clone());
        self.router
            .broadcast_presence(PresenceKind::Online, &user_id)
            .await;
    }

    /// Tear the connection down. Unbinds and broadcasts offline only if this
    /// connection is still the canonical one for its identity; a stale close
    /// after a fast reconnect does neither. Idempotent.
    pub async fn close(&mut self) {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Joined(user_id) => {
                let removed = self.router.registry().unbind(&user_id, &self.handle).await;
                if removed {
                    info!(user_id, connection = self.handle.id(), "user disconnected");
                    self.router
                        .broadcast_presence(PresenceKind::Offline, &user_id)
                        .await;
                } else {
                    debug!(
                        user_id,
                        connection = self.handle.id(),
                        "stale close, identity already rebound"
                    );
                }
            }
            SessionState::Opened | SessionState::Closed => {}
        }
    }
}
