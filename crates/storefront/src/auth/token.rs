//! Signed bearer tokens.
//!
//! # Token format
//!
//! ```text
//! <base64url-no-pad(claims JSON)>.<base64url-no-pad(HMAC-SHA256(first part))>
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Role, User};

type HmacSha256 = Hmac<Sha256>;

/// Errors produced when issuing or checking a token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("token signing failed")]
    Signing,
}

/// Identity carried inside a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Unique token id; the revocation key.
    pub jti: Uuid,
    /// Username.
    pub sub: String,
    /// User id.
    pub uid: i64,
    pub email: String,
    pub roles: Vec<Role>,
    /// Expiry as a Unix timestamp (seconds).
    pub exp: i64,
}

impl Claims {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Issues and verifies tokens with one HMAC key.
#[derive(Clone)]
pub struct TokenSigner {
    key: Arc<[u8]>,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key", &"[REDACTED]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            key: Arc::from(secret),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::Signing)
    }

    /// Issue a token for `user`, valid from `now` for the configured TTL.
    pub fn issue(&self, user: &User, now: i64) -> Result<(String, Claims), TokenError> {
        let claims = Claims {
            jti: Uuid::new_v4(),
            sub: user.username.clone(),
            uid: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
            exp: now.saturating_add(self.ttl_secs),
        };
        let json = serde_json::to_vec(&claims).map_err(|_| TokenError::Signing)?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok((format!("{payload}.{signature}"), claims))
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
