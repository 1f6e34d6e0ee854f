//! Router/dispatcher: consumes inbound events, consults the registry, and
//! emits outbound events to zero or more target connections.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::{RelayError, RelayResult};
use crate::events::{MessageView, PresenceKind, ServerEvent, TypingKind, UserSummary};
use crate::registry::ConnectionRegistry;
use crate::store::{MessageStore, UserDirectory};

/// Routes messages, typing signals, and presence changes between live
/// connections. Shared by every connection task.
pub struct MessageRouter<S> {
    registry: ConnectionRegistry,
    store: Arc<S>,
}

impl<S> MessageRouter<S>
where
    S: MessageStore + UserDirectory,
{
    pub fn new(registry: ConnectionRegistry, store: Arc<S>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Persist a message and deliver it. The message is stored before any
    /// delivery event is emitted; a persistence failure aborts the send with
    /// zero delivery events. An offline receiver is not an error: they pick
    /// the message up from history on their next fetch.
    pub async fn route_message(
        &self,
        sender_id: &str,
        receiver_id: &str,
        chat_id: &str,
        text: &str,
    ) -> RelayResult<MessageView> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RelayError::invalid_input("message text is empty"));
        }
        if sender_id.is_empty() || receiver_id.is_empty() || chat_id.is_empty() {
            return Err(RelayError::invalid_input("missing message addressing"));
        }

        let stored = self.store.create_message(chat_id, sender_id, text).await?;

        let sender = match self.store.user_summary(sender_id).await {
            Ok(Some(summary)) => summary,
            Ok(None) => UserSummary::bare(sender_id),
            Err(err) => {
                warn!(sender_id, %err, "sender lookup failed, delivering without display data");
                UserSummary::bare(sender_id)
            }
        };

        let view = MessageView::new(stored, sender);

        if let Some(connection) = self.registry.lookup(receiver_id).await {
            connection.send(ServerEvent::ReceiveMessage {
                message: view.clone(),
            });
        } else {
            debug!(receiver_id, "receiver offline, skipping delivery");
        }

        // The sender normally still holds a connection; a race with its
        // disconnect is tolerated silently.
        if let Some(connection) = self.registry.lookup(sender_id).await {
            connection.send(ServerEvent::MessageSent {
                message: view.clone(),
            });
        }

        Ok(view)
    }

    /// Relay a typing signal to the chat's other participants. Pure relay:
    /// nothing is persisted, and unresolvable targets are dropped silently.
    pub async fn route_typing(&self, kind: TypingKind, chat_id: &str, user_id: &str) {
        let participants = match self.store.chat_participants(chat_id).await {
            Ok(participants) => participants,
            Err(err) => {
                debug!(chat_id, %err, "dropping typing signal, chat lookup failed");
                return;
            }
        };

        for participant in participants.iter().filter(|p| p.as_str() != user_id) {
            if let Some(connection) = self.registry.lookup(participant).await {
                let event = match kind {
                    TypingKind::Start => ServerEvent::TypingStart {
                        user_id: user_id.to_string(),
                    },
                    TypingKind::Stop => ServerEvent::TypingStop {
                        user_id: user_id.to_string(),
                    },
                };
                connection.send(event);
            }
        }
    }

    /// Fan a presence change out to every connection except the one that
    /// triggered it. Best-effort over a point-in-time snapshot; no retry.
    pub async fn broadcast_presence(&self, kind: PresenceKind, user_id: &str) {
        for (peer_id, connection) in self.registry.snapshot().await {
            if peer_id == user_id {
                continue;
            }
            let event = match kind {
                PresenceKind::Online => ServerEvent::UserOnline {
                    user_id: user_id.to_string(),
                },
                PresenceKind::Offline => ServerEvent::UserOffline {
                    user_id: user_id.to_string(),
                },
            };
            connection.send(event);
        }
    }
}
