/**
 * Authentication Module
 *
 * Session store plus the sign-in / validation round trips. The token and
 * the cached profile live in storage; `AuthStore` mirrors them as a
 * `Session` that is only ever replaced whole.
 */

use thiserror::Error;

use crate::desk_app::api::{ApiClient, ApiError};
use crate::desk_app::storage::{keys, read_json, write_json, SharedStorage, Storage, StorageError};
use crate::shared::error::SharedError;
use crate::shared::UserInfo;

/// An authenticated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserInfo,
}

/// Sign-in failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] SharedError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Message for the login form
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation(e) => e.user_message().to_string(),
            AuthError::Api(ApiError::Network(_)) => {
                "Could not reach the server. Try again.".to_string()
            }
            _ => "Login failed. Check your credentials.".to_string(),
        }
    }
}

/// Session state
pub struct AuthStore {
    storage: SharedStorage,
    session: Option<Session>,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthStore {
    /// Bootstrap from storage. A persisted token with a cached profile is
    /// trusted until `restore_session` says otherwise.
    pub fn new(storage: SharedStorage) -> Self {
        let session = match (storage.get_item(keys::TOKEN), read_json::<UserInfo>(storage.as_ref(), keys::USER)) {
            (Some(token), Some(user)) if !token.is_empty() => Some(Session { token, user }),
            _ => None,
        };
        Self {
            storage,
            session,
            error: None,
            loading: false,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a token is persisted, validated or not
    pub fn has_persisted_token(&self) -> bool {
        self.storage
            .get_item(keys::TOKEN)
            .is_some_and(|token| !token.is_empty())
    }

    /// Install a new session, persisting token and profile
    pub fn install(&mut self, session: Session) -> Result<(), StorageError> {
        persist_session(self.storage.as_ref(), &session)?;
        tracing::info!(user = %session.user.username, "signed in");
        self.session = Some(session);
        self.error = None;
        self.loading = false;
        Ok(())
    }

    /// Drop the session and its persisted credentials
    pub fn sign_out(&mut self) {
        clear_persisted(self.storage.as_ref());
        if let Some(session) = self.session.take() {
            tracing::info!(user = %session.user.username, "signed out");
        }
        self.loading = false;
    }

    /// Pass a result through, signing out first when it reports rejected
    /// credentials
    pub fn guard<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                tracing::warn!(error = %e, "token rejected, forcing sign-out");
                self.sign_out();
            }
        }
        result
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

fn persist_session(storage: &dyn Storage, session: &Session) -> Result<(), StorageError> {
    storage.set_item(keys::TOKEN, &session.token)?;
    write_json(storage, keys::USER, &session.user)
}

fn clear_persisted(storage: &dyn Storage) {
    for key in [keys::TOKEN, keys::USER] {
        if let Err(e) = storage.remove_item(key) {
            tracing::error!(key, error = %e, "failed to clear credential");
        }
    }
}

/// Exchange credentials for a session.
///
/// The token is persisted before the profile is fetched, since the client
/// reads it from storage. If the profile fetch fails the token is removed
/// again.
pub async fn sign_in(
    api: &ApiClient,
    storage: &dyn Storage,
    username: &str,
    password: &str,
) -> Result<Session, AuthError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(SharedError::validation("username", "Username and password are required").into());
    }

    let login = api.login(username.trim(), password).await?;
    storage.set_item(keys::TOKEN, &login.access_token)?;

    match api.me().await {
        Ok(user) => {
            let session = Session {
                token: login.access_token,
                user,
            };
            persist_session(storage, &session)?;
            Ok(session)
        }
        Err(e) => {
            clear_persisted(storage);
            Err(e.into())
        }
    }
}

/// Validate the persisted token against `/auth/me`.
///
/// `Ok(None)` when there is no token, or when validation failed for any
/// reason; in the latter case the persisted credentials are removed.
pub async fn restore_session(api: &ApiClient, storage: &dyn Storage) -> Result<Option<Session>, StorageError> {
    let Some(token) = storage.get_item(keys::TOKEN).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    match api.me().await {
        Ok(user) => {
            let session = Session { token, user };
            persist_session(storage, &session)?;
            Ok(Some(session))
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored token is invalid or expired, forcing sign-out");
            clear_persisted(storage);
            Ok(None)
        }
    }
}
