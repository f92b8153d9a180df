//! Session store: current user, bearer token and its persistence

mod storage;
pub mod token;
mod types;

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::fetch::{endpoint, Fetch, FetchBuilder};
use crate::state::Shared;

pub use storage::*;
pub use types::*;

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Holds who is signed in and attaches their token to outgoing requests.
///
/// Cloning is cheap and every clone sees the same session, so the store can be
/// handed to the cart, orders client and views.
#[derive(Clone)]
pub struct SessionStore {
    base_url: String,
    client: Client,
    state: Shared<SessionState>,
    tokens: Arc<dyn TokenStore>,
}

impl SessionStore {
    pub fn new(base_url: &str, client: Client, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            base_url: base_url.to_string(),
            client,
            state: Shared::default(),
            tokens,
        }
    }

    /// Restore a persisted session.
    ///
    /// Any failure (unreadable or expired token, rejected token, unreachable
    /// server) clears the persisted token and leaves the store anonymous.
    pub async fn restore(&self) -> Option<User> {
        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(err) => {
                warn!("could not read persisted token: {err}");
                self.downgrade();
                return None;
            }
        };

        if token::is_expired(&token, Utc::now()) {
            info!("persisted token has expired; continuing anonymously");
            self.downgrade();
            return None;
        }

        match self.fetch_me(&token).await {
            Ok(user) => {
                info!("restored session for {}", user.email);
                self.state.write(|state| {
                    state.token = Some(token);
                    state.user = Some(user.clone());
                });
                Some(user)
            }
            Err(err) => {
                info!("could not restore session ({err}); continuing anonymously");
                self.downgrade();
                None
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// Bad credentials come back as [`Error::Authentication`] carrying the
    /// server's message.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let url = endpoint(&self.base_url, &["auth", "login"])?;
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = Fetch::post(&self.client, &url)
            .json(&body)?
            .execute::<LoginResponse>()
            .await
            .map_err(|err| match err {
                Error::Unauthorized(message) => Error::Authentication(message),
                other => other,
            })?;

        if let Err(err) = self.tokens.save(&response.access_token) {
            warn!("signed in but could not persist token: {err}");
        }

        let user = response.user;
        self.state.write(|state| {
            state.token = Some(response.access_token);
            state.user = Some(user.clone());
        });
        info!("signed in as {}", user.email);

        Ok(user)
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let url = endpoint(&self.base_url, &["auth", "register"])?;

        let user = Fetch::post(&self.client, &url)
            .json(request)?
            .execute::<User>()
            .await?;

        info!("registered {}", user.email);
        Ok(user)
    }

    /// Forget the token and user, locally and in persistent storage
    pub fn logout(&self) {
        self.downgrade();
        info!("signed out");
    }

    /// Fetch the current user from the server, refreshing the cached copy
    pub async fn me(&self) -> Result<User> {
        let url = endpoint(&self.base_url, &["auth", "me"])?;
        let user: User = self.execute_authorized(Fetch::get(&self.client, &url)).await?;
        self.state.write(|state| state.user = Some(user.clone()));
        Ok(user)
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read(|state| state.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.state.read(|state| state.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read(|state| state.token.is_some())
    }

    /// Attach the bearer token, or refuse with [`Error::NotAuthenticated`]
    pub fn authorize<'a>(&self, request: FetchBuilder<'a>) -> Result<FetchBuilder<'a>> {
        let token = self.token().ok_or(Error::NotAuthenticated)?;
        Ok(request.bearer_auth(&token))
    }

    /// Attach the bearer token when signed in; anonymous requests pass through
    pub fn authorize_optional<'a>(&self, request: FetchBuilder<'a>) -> FetchBuilder<'a> {
        match self.token() {
            Some(token) => request.bearer_auth(&token),
            None => request,
        }
    }

    /// Run an authenticated request. A 401 answer drops the session, unless
    /// the session has moved on to another token meanwhile.
    pub async fn execute_authorized<T: DeserializeOwned>(
        &self,
        request: FetchBuilder<'_>,
    ) -> Result<T> {
        let sent = self.token().ok_or(Error::NotAuthenticated)?;
        match request.bearer_auth(&sent).execute::<T>().await {
            Err(Error::Unauthorized(message)) => {
                if self.token().as_deref() == Some(sent.as_str()) {
                    warn!("token rejected ({message}); continuing anonymously");
                    self.downgrade();
                } else {
                    debug!("ignoring rejection of a replaced token ({message})");
                }
                Err(Error::Unauthorized(message))
            }
            other => other,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    async fn fetch_me(&self, token: &str) -> Result<User> {
        let url = endpoint(&self.base_url, &["auth", "me"])?;
        Fetch::get(&self.client, &url)
            .bearer_auth(token)
            .execute::<User>()
            .await
    }

    fn downgrade(&self) {
        self.state.write(|state| {
            state.token = None;
            state.user = None;
        });
        if let Err(err) = self.tokens.clear() {
            warn!("could not clear persisted token: {err}");
        } else {
            debug!("persisted token cleared");
        }
    }
}
