use std::sync::Arc;

use bcrypt::DEFAULT_COST;
use chrono::Duration;
use tracing::info;
use uuid::Uuid;

use storage::repository::{AccountRepository, AuthSession, SessionRepository, StorageError};
use tutor_core::Clock;
use tutor_core::model::{UserAccount, UserId};

use crate::error::AuthError;

/// Issued bearer credentials stay valid this long.
pub const TOKEN_TTL_DAYS: i64 = 7;

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Registers accounts, verifies passwords, and resolves bearer credentials.
///
/// Tokens are opaque random identifiers persisted with an expiry; there is
/// nothing to decode client-side.
pub struct AuthService {
    clock: Clock,
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(
        clock: Clock,
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            clock,
            accounts,
            sessions,
        }
    }

    /// Register a new account and issue a credential for it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email is already registered,
    /// or hashing/storage errors.
    pub async fn signup(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<(String, UserAccount), AuthError> {
        if self.accounts.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = bcrypt::hash(password, DEFAULT_COST)?;
        let account = UserAccount::new(email, name, password_hash, self.clock.now());

        match self.accounts.insert_account(&account).await {
            Ok(()) => {}
            // A concurrent signup can still win the race past the lookup.
            Err(StorageError::Conflict) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        }

        info!(user = %account.id, "account registered");
        let token = self.issue_session(account.id).await?;
        Ok((token, account))
    }

    /// Verify a password and issue a fresh credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password; the two cases are indistinguishable to the caller.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, UserAccount), AuthError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !bcrypt::verify(password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_session(account.id).await?;
        Ok((token, account))
    }

    /// Resolve a bearer token to its owning user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` when the token is unknown or
    /// expired.
    pub async fn resolve_caller(&self, token: &str) -> Result<UserId, AuthError> {
        let session = self
            .sessions
            .get_session(token)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        if session.expires_at <= self.clock.now() {
            return Err(AuthError::Unauthenticated);
        }
        Ok(session.user_id)
    }

    /// Fetch the account behind an already-resolved caller.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` (wrapped) if the account vanished.
    pub async fn account(&self, user_id: UserId) -> Result<UserAccount, AuthError> {
        Ok(self.accounts.get_account(user_id).await?)
    }

    async fn issue_session(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = self.clock.now();
        let session = AuthSession {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at: now + Duration::days(TOKEN_TTL_DAYS),
        };
        self.sessions.insert_session(&session).await?;
        Ok(session.token)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
