//! Credentials and bearer tokens.
//!
//! # Security invariants
//!
//! - Plaintext passwords are only held for the duration of a hash or verify
//!   call and are never logged.
//! - Tokens are HMAC-SHA256 signed; signature comparison is constant-time.
//! - A signed-out token stays rejected until its natural expiry.

pub mod password;
pub mod revocation;
pub mod token;

pub use revocation::RevocationList;
pub use token::{Claims, TokenError, TokenSigner};
