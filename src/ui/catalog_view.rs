//! Product grid state: category filter and the one-time sample-data seed

use log::{debug, warn};

use crate::catalog::{CatalogClient, Category, Product};
use crate::ui::Notifications;

/// Product grid with a category filter.
///
/// The first [`mount`](Self::mount) also asks the backend to seed its sample
/// data; that call may fail harmlessly when the data already exists.
pub struct CatalogView {
    catalog: CatalogClient,
    notifications: Notifications,
    products: Vec<Product>,
    filter: Option<Category>,
    seeded: bool,
}

impl CatalogView {
    pub fn new(catalog: CatalogClient, notifications: Notifications) -> Self {
        Self {
            catalog,
            notifications,
            products: Vec::new(),
            filter: None,
            seeded: false,
        }
    }

    /// Start with a category selected instead of all products
    pub fn with_filter(mut self, category: Option<Category>) -> Self {
        self.filter = category;
        self
    }

    /// Seed once, then load the current filter
    pub async fn mount(&mut self) -> bool {
        if !self.seeded {
            self.seeded = true;
            match self.catalog.seed().await {
                Ok(message) => debug!("sample data: {message}"),
                Err(err) => debug!("sample data seed failed, ignoring: {err}"),
            }
        }
        self.reload().await
    }

    /// Switch filter (`None` for all products) and reload
    pub async fn select_category(&mut self, category: Option<Category>) -> bool {
        self.filter = category;
        self.reload().await
    }

    /// Replace the displayed products. On failure the previous set stays.
    pub async fn reload(&mut self) -> bool {
        match self.catalog.list(self.filter.as_ref()).await {
            Ok(mut products) => {
                if let Some(filter) = &self.filter {
                    let before = products.len();
                    products.retain(|product| &product.category == filter);
                    if products.len() != before {
                        warn!(
                            "server returned {} products outside category {filter}",
                            before - products.len()
                        );
                    }
                }
                self.products = products;
                true
            }
            Err(err) => {
                self.notifications.report(&err);
                false
            }
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn filter(&self) -> Option<&Category> {
        self.filter.as_ref()
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }
}
