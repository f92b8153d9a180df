//! Storefront Rust Client Library
//!
//! A Rust client for the hair-care storefront API: product catalog, a cart
//! mirrored from the server, orders, and email/password sessions whose bearer
//! token survives restarts.
//!
//! Stores are plain service objects. [`Storefront`] builds them once and hands
//! out clones; there is no global state.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod orders;
mod state;
pub mod ui;

use std::sync::Arc;

use log::warn;
use reqwest::Client;

use crate::auth::{FileTokenStore, SessionStore, TokenStore, User};
use crate::cart::CartStore;
use crate::catalog::CatalogClient;
use crate::config::ClientOptions;
use crate::error::Result;
use crate::orders::OrdersClient;
use crate::ui::{AuthPanel, CartPanel, CatalogView, Notifications};

/// The main entry point for the storefront client
pub struct Storefront {
    /// Client options
    pub options: ClientOptions,
    /// HTTP client shared by every store
    pub http_client: Client,
    session: SessionStore,
    cart: CartStore,
    notifications: Notifications,
}

impl Storefront {
    /// Create a client for `base_url`, persisting the token in the user's
    /// config directory
    ///
    /// # Example
    ///
    /// ```no_run
    /// use storefront_client::Storefront;
    ///
    /// let storefront = Storefront::new("https://shop.example.com").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        Self::new_with_options(ClientOptions::default().with_base_url(base_url))
    }

    /// Create a client with custom options and a file-backed token store
    pub fn new_with_options(options: ClientOptions) -> Result<Self> {
        let tokens = FileTokenStore::new(options.resolved_token_path()?, &options.token_key);
        Self::with_token_store(options, Arc::new(tokens))
    }

    /// Create a client with an explicit token store
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use storefront_client::{auth::MemoryTokenStore, config::ClientOptions, Storefront};
    ///
    /// let options = ClientOptions::default().with_base_url("http://localhost:8001");
    /// let storefront = Storefront::with_token_store(options, Arc::new(MemoryTokenStore::new())).unwrap();
    /// assert!(!storefront.session().is_authenticated());
    /// ```
    pub fn with_token_store(options: ClientOptions, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(options.user_agent.clone());
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let session = SessionStore::new(&options.base_url, http_client.clone(), tokens);
        let cart = CartStore::new(session.clone());

        Ok(Self {
            options,
            http_client,
            session,
            cart,
            notifications: Notifications::new(),
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn catalog(&self) -> CatalogClient {
        CatalogClient::new(self.session.clone())
    }

    pub fn orders(&self) -> OrdersClient {
        OrdersClient::new(self.session.clone())
    }

    /// Notices queued by the views
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn catalog_view(&self) -> CatalogView {
        CatalogView::new(self.catalog(), self.notifications.clone())
    }

    pub fn cart_panel(&self) -> CartPanel {
        CartPanel::new(self.cart.clone(), self.orders(), self.notifications.clone())
    }

    pub fn auth_panel(&self) -> AuthPanel {
        AuthPanel::new(
            self.session.clone(),
            self.cart.clone(),
            self.notifications.clone(),
        )
    }

    /// Restore a persisted session and, when one exists, load its cart
    pub async fn start(&self) -> Option<User> {
        let user = self.session.restore().await?;
        if let Err(err) = self.cart.refresh().await {
            warn!("session restored but cart sync failed: {err}");
        }
        Some(user)
    }

    /// Sign in and load the user's cart
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        sign_in(&self.session, &self.cart, email, password).await
    }

    /// Sign out and forget the mirrored cart
    pub fn logout(&self) {
        sign_out(&self.session, &self.cart);
    }
}

pub(crate) async fn sign_in(
    session: &SessionStore,
    cart: &CartStore,
    email: &str,
    password: &str,
) -> Result<User> {
    let user = session.login(email, password).await?;
    if let Err(err) = cart.refresh().await {
        warn!("signed in but cart sync failed: {err}");
    }
    Ok(user)
}

pub(crate) fn sign_out(session: &SessionStore, cart: &CartStore) {
    session.logout();
    cart.clear_local();
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{SessionStore, User};
    pub use crate::cart::{Cart, CartItem, CartStore};
    pub use crate::catalog::{Category, Product};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::Storefront;
}
