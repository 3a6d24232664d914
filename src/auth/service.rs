//! Account operations behind the auth schema.
//!
//! Every operation is a single request/response round trip against the user
//! store, wrapped in one timeout guard covering the whole store interaction.
//! When the guard fires the pending store call is dropped (cancelled, not
//! left running) and the operation fails with a store-timeout error.
//! "Not found" and "email taken" are `None` results, never errors.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::{distributions::Alphanumeric, Rng};
use tracing::{info, instrument};

use crate::auth::hashing;
use crate::auth::token::{Claims, TokenService};
use crate::errors::{Error, Result};
use crate::storage::{NewUser, User, UserStore, UserUpdate};

const RESET_PASSWORD_LEN: usize = 10;

/// Implements login, register, and the credential-guarded record mutations.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
    timeout: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenService, timeout: Duration) -> Self {
        Self { store, tokens, timeout }
    }

    /// Authenticate by email and password; issue a token embedding the record.
    /// Unknown email or wrong password both resolve to `None`.
    #[instrument(skip(self, password), fields(user_email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<String>> {
        self.guarded("login", async {
            match self.authenticate(email, password).await? {
                Some(user) => Ok(Some(self.tokens.issue(&Claims::from_user(&user))?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Create an account and issue a token for it. Resolves to `None` when the
    /// email is already taken.
    #[instrument(skip(self, password), fields(user_email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        level: i64,
    ) -> Result<Option<String>> {
        self.guarded("register", async {
            if self.store.find_one(email).await?.is_some() {
                return Ok(None);
            }

            let user = self
                .store
                .create(NewUser {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: hashing::hash_password(password)?,
                    level,
                })
                .await?;
            info!(user_email = %user.email, "registered new account");
            Ok(Some(self.tokens.issue(&Claims::from_user(&user))?))
        })
        .await
    }

    /// Re-set the password for an account after authenticating with it.
    ///
    /// The surface deliberately takes no separate new-password argument: the
    /// supplied password is both the credential and the value written back
    /// (re-hashed with a fresh salt). Matches the published schema.
    #[instrument(skip(self, password), fields(user_email = %email))]
    pub async fn change_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.guarded("change_password", async {
            if self.authenticate(email, password).await?.is_none() {
                return Ok(None);
            }
            let hash = hashing::hash_password(password)?;
            self.store.find_one_and_update(email, UserUpdate::password(hash)).await
        })
        .await
    }

    /// Replace the password of the account matching `email` with a short
    /// generated one. No credential required; resolves to `None` for unknown
    /// emails.
    #[instrument(skip(self), fields(user_email = %email))]
    pub async fn reset_password(&self, email: &str) -> Result<Option<User>> {
        let replacement: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_PASSWORD_LEN)
            .map(char::from)
            .collect();
        let hash = hashing::hash_password(&replacement)?;

        self.guarded("reset_password", async {
            let updated = self.store.find_one_and_update(email, UserUpdate::password(hash)).await?;
            if updated.is_some() {
                info!(user_email = %email, "password reset");
            }
            Ok(updated)
        })
        .await
    }

    /// Change the account email after authenticating. No check that the new
    /// email is free; uniqueness is only enforced at registration.
    #[instrument(skip(self, password), fields(user_email = %email))]
    pub async fn change_email(
        &self,
        email: &str,
        password: &str,
        new_email: &str,
    ) -> Result<Option<User>> {
        self.guarded("change_email", async {
            if self.authenticate(email, password).await?.is_none() {
                return Ok(None);
            }
            self.store.find_one_and_update(email, UserUpdate::email(new_email)).await
        })
        .await
    }

    /// Change the display name after authenticating.
    #[instrument(skip(self, password), fields(user_email = %email))]
    pub async fn change_name(
        &self,
        email: &str,
        password: &str,
        new_name: &str,
    ) -> Result<Option<User>> {
        self.guarded("change_name", async {
            if self.authenticate(email, password).await?.is_none() {
                return Ok(None);
            }
            self.store.find_one_and_update(email, UserUpdate::name(new_name)).await
        })
        .await
    }

    /// Fetch the record for `email` and verify the password against its hash.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        match self.store.find_one(email).await? {
            Some(user) if hashing::verify_password(password, &user.password)? => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    /// Race `fut` against the configured budget. Losing the race drops the
    /// future, cancelling the in-flight store call.
    async fn guarded<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::StoreTimeout {
                operation,
                duration_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}
