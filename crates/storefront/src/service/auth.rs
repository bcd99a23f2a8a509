//! Registration, sign-in, and bearer-token handling.

use std::sync::Arc;

use common::protocol::{LoginRequest, MessageResponse, SignupRequest, UserInfoResponse};
use common::ServiceError;
use tracing::{info, warn};

use super::mapper::user_info;
use super::now;
use crate::auth::password::{self, PasswordError};
use crate::auth::{Claims, RevocationList, TokenError, TokenSigner};
use crate::config::BootstrapAdmin;
use crate::domain::{Role, User};
use crate::repository::{StoreError, UserRepository};

const USERNAME_TAKEN: &str = "Error: Username is already taken!";
const EMAIL_TAKEN: &str = "Error: Email is already in use!";
const BAD_CREDENTIALS: &str = "Bad credentials";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    signer: TokenSigner,
    revocations: RevocationList,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, signer: TokenSigner, revocations: RevocationList) -> Self {
        Self {
            users,
            signer,
            revocations,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Api`] for a taken username or email, or an unknown role.
    /// - [`ServiceError::Forbidden`] when the request asks for the admin role.
    pub async fn signup(&self, req: SignupRequest) -> Result<MessageResponse, ServiceError> {
        let username = req.username.trim().to_owned();
        let email = req.email.trim().to_owned();

        if self.users.find_by_username(username.clone()).await?.is_some() {
            return Err(ServiceError::api(USERNAME_TAKEN));
        }
        if self.users.exists_by_email(email.clone()).await? {
            return Err(ServiceError::api(EMAIL_TAKEN));
        }
        let roles = requested_roles(&req.roles)?;

        let password_hash = password::hash_blocking(req.password)
            .await
            .map_err(internal)?;
        let user = self
            .users
            .insert(User {
                id: 0,
                username,
                email,
                password_hash,
                roles,
            })
            .await
            .map_err(duplicate_account)?;

        info!(user_id = user.id, "user registered");
        Ok(MessageResponse::ok("User registered successfully!"))
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown users and wrong passwords fail identically.
    pub async fn signin(&self, req: LoginRequest) -> Result<UserInfoResponse, ServiceError> {
        let user = self
            .users
            .find_by_username(req.username.trim().to_owned())
            .await?
            .ok_or_else(|| ServiceError::Unauthorized(BAD_CREDENTIALS.into()))?;

        let matches = password::verify_blocking(req.password, user.password_hash.clone())
            .await
            .map_err(internal)?;
        if !matches {
            return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.into()));
        }

        let (token, _) = self.signer.issue(&user, now()).map_err(token_fault)?;
        info!(user_id = user.id, "user signed in");
        Ok(user_info(&user, Some(token)))
    }

    /// Resolve a bearer token to its claims.
    pub async fn authenticate(&self, token: &str) -> Result<Claims, ServiceError> {
        let claims = self.signer.verify(token, now()).map_err(|err| {
            ServiceError::Unauthorized(match err {
                TokenError::Expired => "Token has expired".into(),
                _ => "Invalid token".into(),
            })
        })?;
        if self.revocations.is_revoked(&claims.jti).await {
            return Err(ServiceError::Unauthorized("Token has been revoked".into()));
        }
        Ok(claims)
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<UserInfoResponse, ServiceError> {
        let user = self
            .users
            .find_by_id(claims.uid)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", "id", claims.uid))?;
        Ok(user_info(&user, None))
    }

    /// Revoke the presented token until it would have expired anyway.
    pub async fn signout(&self, claims: &Claims) -> MessageResponse {
        self.revocations.revoke(claims.jti, claims.exp, now()).await;
        info!(user_id = claims.uid, "user signed out");
        MessageResponse::ok("You've been signed out!")
    }

    /// Create the configured admin account unless the username already exists.
    pub async fn ensure_admin(&self, admin: &BootstrapAdmin) -> Result<(), ServiceError> {
        if self
            .users
            .find_by_username(admin.username.clone())
            .await?
            .is_some()
        {
            info!(username = %admin.username, "bootstrap admin already present");
            return Ok(());
        }
        let password_hash = password::hash_blocking(admin.password.clone())
            .await
            .map_err(internal)?;
        let user = self
            .users
            .insert(User {
                id: 0,
                username: admin.username.clone(),
                email: admin.email.clone(),
                password_hash,
                roles: vec![Role::User, Role::Seller, Role::Admin],
            })
            .await
            .map_err(duplicate_account)?;
        info!(user_id = user.id, "bootstrap admin created");
        Ok(())
    }
}

/// Map sign-up role names to roles. No names means a plain user.
fn requested_roles(names: &[String]) -> Result<Vec<Role>, ServiceError> {
    if names.is_empty() {
        return Ok(vec![Role::User]);
    }
    let mut roles = Vec::with_capacity(names.len());
    for name in names {
        let role = Role::from_request_name(name.trim())
            .ok_or_else(|| ServiceError::api(format!("Error: Role {name} is not found.")))?;
        if role == Role::Admin {
            return Err(ServiceError::Forbidden(
                "Error: Role admin cannot be self-assigned.".into(),
            ));
        }
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    roles.sort();
    Ok(roles)
}

fn duplicate_account(err: StoreError) -> ServiceError {
    match err {
        StoreError::Duplicate { field: "username", .. } => ServiceError::api(USERNAME_TAKEN),
        StoreError::Duplicate { field: "email", .. } => ServiceError::api(EMAIL_TAKEN),
        other => other.into(),
    }
}

fn internal(err: PasswordError) -> ServiceError {
    warn!(error = %err, "password operation failed");
    ServiceError::Internal(err.to_string())
}

fn token_fault(err: TokenError) -> ServiceError {
    ServiceError::Internal(err.to_string())
}
