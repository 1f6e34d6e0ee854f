//! Entity definitions for the storage layer.

pub mod chat;
pub mod message;
pub mod user;

pub use chat::Chat;
pub use message::ChatMessage;
pub use user::{CreateUserRequest, User};
