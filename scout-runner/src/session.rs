//! User session and scan parameters.
//!
//! A [`Session`] is an explicit value threaded through the scan call; there
//! is no process-wide login state.

use crate::config::AuthConfig;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use scout_core::data::{UniverseId, UniverseSpec};
use scout_core::domain::Horizon;
use scout_core::strategy::StrategyKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Salted Argon2id hash of a password in PHC string form, as stored in
/// configuration.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Whether `hash` parses as a PHC password hash string.
pub fn is_password_hash(hash: &str) -> bool {
    PasswordHash::new(hash).is_ok()
}

/// The single configured user, if any.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    user: Option<(String, String)>,
}

impl CredentialStore {
    /// Store that accepts anyone.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            user: Some((username.into(), password_hash.into())),
        }
    }

    pub fn from_config(auth: &AuthConfig) -> Self {
        match (&auth.username, &auth.password_hash) {
            (Some(user), Some(digest)) => Self::new(user.clone(), digest.clone()),
            _ => Self::anonymous(),
        }
    }

    pub fn requires_login(&self) -> bool {
        self.user.is_some()
    }

    fn verify(&self, username: &str, password: &str) -> bool {
        match &self.user {
            Some((user, hash)) => {
                if user != username {
                    return false;
                }
                let Ok(parsed) = PasswordHash::new(hash) else {
                    tracing::warn!("stored password hash is malformed");
                    return false;
                };
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            }
            None => true,
        }
    }
}

/// What to scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanParams {
    pub universe: UniverseSpec,
    pub horizon: Horizon,
    pub investment: f64,
    pub strategy: StrategyKind,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            universe: UniverseSpec::new(UniverseId::Nifty100, false),
            horizon: Horizon::default(),
            investment: 100_000.0,
            strategy: StrategyKind::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: Option<String>,
    authenticated: bool,
    pub params: ScanParams,
}

impl Session {
    /// Unauthenticated session; scans are refused until [`Session::login`] succeeds.
    pub fn new(params: ScanParams) -> Self {
        Self {
            user: None,
            authenticated: false,
            params,
        }
    }

    /// Open a session against `store`. Stores without credentials open
    /// an authenticated anonymous session.
    pub fn open(store: &CredentialStore, params: ScanParams) -> Self {
        let mut session = Self::new(params);
        if !store.requires_login() {
            session.authenticated = true;
        }
        session
    }

    pub fn login(
        &mut self,
        store: &CredentialStore,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if !store.verify(username, password) {
            tracing::warn!(username, "login rejected");
            self.authenticated = false;
            self.user = None;
            return Err(AuthError::InvalidCredentials);
        }
        self.authenticated = true;
        self.user = Some(username.to_string());
        Ok(())
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        self.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}
