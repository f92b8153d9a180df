//! Cart store: a mirror of the server-side cart

mod types;

use log::{debug, info};
use rust_decimal::Decimal;

use crate::auth::SessionStore;
use crate::error::{Error, Result};
use crate::fetch::{endpoint, Fetch};
use crate::state::Shared;

pub use types::*;

/// Mirrors the signed-in user's cart.
///
/// The server owns quantities and totals. Every mutation is followed by a
/// full refetch, so the local copy is exact right after each call returns
/// and is never patched locally.
#[derive(Clone)]
pub struct CartStore {
    session: SessionStore,
    cart: Shared<Option<Cart>>,
}

impl CartStore {
    pub fn new(session: SessionStore) -> Self {
        Self {
            session,
            cart: Shared::new(None),
        }
    }

    /// Replace the local cart with the server's
    pub async fn refresh(&self) -> Result<Cart> {
        let url = endpoint(self.session.base_url(), &["cart"])?;
        let request = Fetch::get(self.session.client(), &url);

        let cart: Cart = self.guard(self.session.execute_authorized(request).await)?;
        debug!(
            "cart refreshed: {} lines, total {}",
            cart.items.len(),
            cart.total_amount
        );
        self.cart.write(|local| *local = Some(cart.clone()));
        Ok(cart)
    }

    /// Add `quantity` units of a product, then refetch.
    ///
    /// Without a session nothing is sent and [`Error::NotAuthenticated`] is
    /// returned.
    pub async fn add(&self, product_id: &str, quantity: u32) -> Result<Cart> {
        if !self.session.is_authenticated() {
            return Err(Error::NotAuthenticated);
        }
        if quantity == 0 {
            return Err(Error::invalid_input("Quantity must be at least 1"));
        }

        let url = endpoint(self.session.base_url(), &["cart", "add"])?;
        let request = Fetch::post(self.session.client(), &url)
            .query("product_id", product_id)
            .query("quantity", quantity);

        let response: AddToCartResponse =
            self.guard(self.session.execute_authorized(request).await)?;
        info!("{} (product {product_id} x{quantity})", response.message);

        self.refresh().await
    }

    /// Remove a product's line, then refetch
    pub async fn remove(&self, product_id: &str) -> Result<Cart> {
        if !self.session.is_authenticated() {
            return Err(Error::NotAuthenticated);
        }

        let url = endpoint(self.session.base_url(), &["cart", "remove", product_id])?;
        let request = Fetch::delete(self.session.client(), &url);

        let _: serde_json::Value = self.guard(self.session.execute_authorized(request).await)?;
        info!("removed product {product_id} from cart");

        self.refresh().await
    }

    /// Drop the mirrored cart without contacting the server
    pub fn clear_local(&self) {
        self.cart.write(|local| *local = None);
    }

    /// The cart as of the last refetch
    pub fn cart(&self) -> Option<Cart> {
        self.cart.read(|local| local.clone())
    }

    /// Server total as of the last refetch, zero when no cart is loaded
    pub fn total(&self) -> Decimal {
        self.cart
            .read(|local| local.as_ref().map_or(Decimal::ZERO, |cart| cart.total_amount))
    }

    pub fn item_count(&self) -> u32 {
        self.cart
            .read(|local| local.as_ref().map_or(0, Cart::item_count))
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// A rejected token means the cart no longer belongs to anyone here
    fn guard<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_auth_failure() {
                self.clear_local();
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use reqwest::Client;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn signed_in_store(server: &MockServer) -> CartStore {
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-1",
                "email": "jane@example.com",
                "first_name": "Jane",
                "last_name": "Doe"
            })))
            .mount(server)
            .await;

        let session = SessionStore::new(
            &server.uri(),
            Client::new(),
            Arc::new(MemoryTokenStore::with_token("tok")),
        );
        session.restore().await.unwrap();
        CartStore::new(session)
    }

    #[tokio::test]
    async fn add_then_refetches() {
        let server = MockServer::start().await;
        let store = signed_in_store(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/cart/add"))
            .and(query_param("product_id", "p1"))
            .and(query_param("quantity", "2"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Item added to cart",
                "total_items": 1
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/cart"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"product_id": "p1", "quantity": 2, "price": 10}],
                "total_amount": 20
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cart = store.add("p1", 2).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(store.total(), Decimal::from(20));
        assert_eq!(store.item_count(), 2);
    }

    #[tokio::test]
    async fn add_without_session_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/cart/add"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = SessionStore::new(
            &server.uri(),
            Client::new(),
            Arc::new(MemoryTokenStore::new()),
        );
        let store = CartStore::new(session);

        assert!(matches!(
            store.add("p1", 1).await,
            Err(Error::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_locally() {
        let server = MockServer::start().await;
        let store = signed_in_store(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/cart/add"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert!(matches!(
            store.add("p1", 0).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn remove_then_refetches() {
        let server = MockServer::start().await;
        let store = signed_in_store(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/api/cart/remove/p1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": "Item removed from cart"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/cart"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "total_amount": 0.0
            })))
            .mount(&server)
            .await;

        let cart = store.remove("p1").await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(store.total(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn expired_token_downgrades_and_clears_cart() {
        let server = MockServer::start().await;
        let store = signed_in_store(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/cart"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token"})),
            )
            .mount(&server)
            .await;

        let err = store.refresh().await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
        assert!(!store.session().is_authenticated());
        assert!(store.cart().is_none());
    }
}
