//! Slide-out cart: rendered lines, footer total and checkout

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::cart::CartStore;
use crate::catalog::Product;
use crate::orders::{Order, OrdersClient, ShippingAddress};
use crate::ui::Notifications;

/// One rendered cart row
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: String,
    /// Product name, when the product has been seen in the catalog
    pub name: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
    pub subtotal: Decimal,
}

impl CartLine {
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.product_id)
    }
}

/// Slide-out cart: open state, rendered lines and the actions it offers
pub struct CartPanel {
    cart: CartStore,
    orders: OrdersClient,
    notifications: Notifications,
    open: bool,
    names: HashMap<String, String>,
}

impl CartPanel {
    pub fn new(cart: CartStore, orders: OrdersClient, notifications: Notifications) -> Self {
        Self {
            cart,
            orders,
            notifications,
            open: false,
            names: HashMap::new(),
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Learn product names so lines can show them
    pub fn remember_products(&mut self, products: &[Product]) {
        for product in products {
            self.names.insert(product.id.clone(), product.name.clone());
        }
    }

    /// Rows exactly as last reported by the server
    pub fn lines(&self) -> Vec<CartLine> {
        self.cart
            .cart()
            .map(|cart| {
                cart.items
                    .iter()
                    .map(|item| CartLine {
                        product_id: item.product_id.clone(),
                        name: self.names.get(&item.product_id).cloned(),
                        quantity: item.quantity,
                        price: item.price,
                        subtotal: item.subtotal(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Server total with two decimals, e.g. `20.00`
    pub fn footer_total(&self) -> String {
        format!("{:.2}", self.cart.total())
    }

    pub fn is_empty(&self) -> bool {
        !self.cart.cart().is_some_and(|cart| !cart.is_empty())
    }

    pub fn badge_count(&self) -> u32 {
        self.cart.item_count()
    }

    pub async fn refresh(&mut self) -> bool {
        match self.cart.refresh().await {
            Ok(_) => true,
            Err(err) => {
                self.notifications.report(&err);
                false
            }
        }
    }

    pub async fn add(&mut self, product_id: &str, quantity: u32) -> bool {
        match self.cart.add(product_id, quantity).await {
            Ok(_) => {
                self.notifications.success("Added to cart");
                true
            }
            Err(err) => {
                self.notifications.report(&err);
                false
            }
        }
    }

    pub async fn remove(&mut self, product_id: &str) -> bool {
        match self.cart.remove(product_id).await {
            Ok(_) => {
                self.notifications.info("Removed from cart");
                true
            }
            Err(err) => {
                self.notifications.report(&err);
                false
            }
        }
    }

    /// Place an order for the current cart, then refetch the (now empty) cart
    pub async fn checkout(
        &mut self,
        shipping_address: ShippingAddress,
        payment_method: &str,
    ) -> Option<Order> {
        let cart = match self.cart.cart() {
            Some(cart) if !cart.is_empty() => cart,
            _ => {
                self.notifications.error("Your cart is empty");
                return None;
            }
        };

        match self
            .orders
            .checkout(&cart, shipping_address, payment_method)
            .await
        {
            Ok(order) => {
                self.notifications
                    .success(format!("Order {} placed", order.id));
                if let Err(err) = self.cart.refresh().await {
                    self.notifications.report(&err);
                }
                self.close();
                Some(order)
            }
            Err(err) => {
                self.notifications.report(&err);
                None
            }
        }
    }
}
