//! # Courier Users Crate
//!
//! Account management for the Courier backend: credential hashing,
//! registration/login, JWT issuance and validation, and peer listing.
//! Credentials never leave this crate; the gateway layer only sees
//! [`courier_database::User`] records and opaque tokens.

pub mod errors;
pub mod password;
pub mod service;
pub mod token;
pub mod validation;

pub use errors::{UserError, UserResult};
pub use service::{AccountService, Credentials, IssuedToken, NewAccount};
pub use token::{Claims, TokenIssuer};
