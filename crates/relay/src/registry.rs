//! Connection registry: the single source of truth for who is online.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::events::{ServerEvent, UserId};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a live connection's outbound queue. Cloning is cheap; all clones
/// share the same connection id, which the registry uses to tell an old
/// connection apart from a newer one bound to the same identity.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: u64,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    /// Wrap an outbound queue in a handle with a fresh connection id.
    pub fn new(sender: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            id: NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            sender,
        }
    }

    /// Create a handle together with the receiving end of its queue.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Process-unique id of the underlying connection.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Queue an event for delivery. Best-effort: returns false if the
    /// connection's receive side is already gone.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Mapping from user identity to the active connection bound to it.
///
/// At most one entry per identity; binding an already-present identity
/// replaces the previous mapping. The lock is held only for the map
/// operation itself, never across I/O.
#[derive(Clone)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<UserId, ConnectionHandle>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Bind an identity to a connection, returning the handle it replaced.
    pub async fn bind(
        &self,
        user_id: impl Into<UserId>,
        handle: ConnectionHandle,
    ) -> Option<ConnectionHandle> {
        let mut connections = self.connections.write().await;
        connections.insert(user_id.into(), handle)
    }

    /// Look up the connection currently bound to an identity.
    pub async fn lookup(&self, user_id: &str) -> Option<ConnectionHandle> {
        let connections = self.connections.read().await;
        connections.get(user_id).cloned()
    }

    /// Remove the entry for an identity, but only while it still points at
    /// the given connection. A stale handle from a connection that was
    /// already replaced by a fast reconnect leaves the newer binding intact.
    /// Returns whether an entry was removed.
    pub async fn unbind(&self, user_id: &str, handle: &ConnectionHandle) -> bool {
        let mut connections = self.connections.write().await;
        match connections.get(user_id) {
            Some(current) if current.id == handle.id => {
                connections.remove(user_id);
                true
            }
            _ => false,
        }
    }

    /// Point-in-time copy of all current bindings, for presence fan-out.
    pub async fn snapshot(&self) -> Vec<(UserId, ConnectionHandle)> {
        let connections = self.connections.read().await;
        connections
            .iter()
            .map(|(user_id, handle)| (user_id.clone(), handle.clone()))
            .collect()
    }

    /// Number of identities currently online.
    pub async fn online_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_replaces_previous_connection() {
        let registry = ConnectionRegistry::new();
        let (first, _rx1) = ConnectionHandle::channel();
        let (second, _rx2) = ConnectionHandle::channel();

        assert!(registry.bind("alice", first.clone()).await.is_none());
        let replaced = registry.bind("alice", second.clone()).await.unwrap();
        assert_eq!(replaced.id(), first.id());

        assert_eq!(registry.online_count().await, 1);
        assert_eq!(registry.lookup("alice").await.unwrap().id(), second.id());
    }

    #[tokio::test]
    async fn unbind_requires_matching_connection() {
        let registry = ConnectionRegistry::new();
        let (old, _rx1) = ConnectionHandle::channel();
        let (new, _rx2) = ConnectionHandle::channel();

        registry.bind("alice", old.clone()).await;
        registry.bind("alice", new.clone()).await;

        // The old connection's close must not evict the newer binding.
        assert!(!registry.unbind("alice", &old).await);
        assert_eq!(registry.lookup("alice").await.unwrap().id(), new.id());

        assert!(registry.unbind("alice", &new).await);
        assert!(registry.lookup("alice").await.is_none());
    }

    #[tokio::test]
    async fn unbind_unknown_identity_is_noop() {
        let registry = ConnectionRegistry::new();
        let (handle, _rx) = ConnectionHandle::channel();

        assert!(!registry.unbind("nobody", &handle).await);
    }

    #[tokio::test]
    async fn snapshot_is_a_copy() {
        let registry = ConnectionRegistry::new();
        let (alice, _rx1) = ConnectionHandle::channel();
        let (bob, _rx2) = ConnectionHandle::channel();

        registry.bind("alice", alice).await;
        registry.bind("bob", bob.clone()).await;

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 2);

        // Mutating the registry after the fact does not affect the snapshot.
        registry.unbind("bob", &bob).await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.online_count().await, 1);
    }
}
