//! Product catalog

mod types;

use log::debug;

use crate::auth::SessionStore;
use crate::error::Result;
use crate::fetch::{endpoint, Fetch};

pub use types::*;

/// Client for the product endpoints.
///
/// They are public, but a signed-in session still sends its token.
#[derive(Clone)]
pub struct CatalogClient {
    session: SessionStore,
}

impl CatalogClient {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// List products, optionally restricted to one category
    pub async fn list(&self, category: Option<&Category>) -> Result<Vec<Product>> {
        let url = endpoint(self.session.base_url(), &["products"])?;

        let mut request = self
            .session
            .authorize_optional(Fetch::get(self.session.client(), &url));
        if let Some(category) = category {
            request = request.query("category", category);
        }

        let products = request.execute::<Vec<Product>>().await?;
        debug!(
            "listed {} products (category: {})",
            products.len(),
            category.map_or("all", Category::as_str)
        );
        Ok(products)
    }

    /// Fetch one product
    pub async fn get(&self, product_id: &str) -> Result<Product> {
        let url = endpoint(self.session.base_url(), &["products", product_id])?;
        self.session
            .authorize_optional(Fetch::get(self.session.client(), &url))
            .execute::<Product>()
            .await
    }

    /// Ask the backend to load its sample products. Safe to repeat.
    pub async fn seed(&self) -> Result<String> {
        let url = endpoint(self.session.base_url(), &["init-data"])?;
        let response = self
            .session
            .authorize_optional(Fetch::post(self.session.client(), &url))
            .execute::<MessageResponse>()
            .await?;
        debug!("seed: {}", response.message);
        Ok(response.message)
    }
}
