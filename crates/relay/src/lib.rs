//! # Courier Relay Crate
//!
//! The presence-tracked message routing core: maps user identities to live
//! connections, delivers messages to the right connection when the recipient
//! is online, persists every accepted message through the store gateway, and
//! propagates typing and online/offline signals.
//!
//! The crate is transport-agnostic: the gateway layer feeds it parsed
//! [`events::ClientEvent`]s and drains [`events::ServerEvent`]s from each
//! connection's queue. Storage and user lookup are injected through the
//! [`store`] traits.

pub mod errors;
pub mod events;
pub mod registry;
pub mod router;
pub mod session;
pub mod store;

pub use errors::{RelayError, RelayResult};
pub use events::{
    ClientEvent, MessageView, PresenceKind, ServerEvent, StoredMessage, TypingKind, UserId,
    UserSummary,
};
pub use registry::{ConnectionHandle, ConnectionRegistry};
pub use router::MessageRouter;
pub use session::ConnectionSession;
pub use store::{MessageStore, PersistenceError, UserDirectory};
