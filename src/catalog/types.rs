//! Product and category types

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product category tag.
///
/// Tags the client does not know yet are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Extensions,
    Wigs,
    Bundles,
    Closures,
    HairCare,
    Accessories,
    Other(String),
}

impl Category {
    /// Every category the storefront offers as a filter
    pub const ALL: [Category; 6] = [
        Category::Extensions,
        Category::Wigs,
        Category::Bundles,
        Category::Closures,
        Category::HairCare,
        Category::Accessories,
    ];

    /// Wire tag, e.g. `hair_care`
    pub fn as_str(&self) -> &str {
        match self {
            Self::Extensions => "extensions",
            Self::Wigs => "wigs",
            Self::Bundles => "bundles",
            Self::Closures => "closures",
            Self::HairCare => "hair_care",
            Self::Accessories => "accessories",
            Self::Other(tag) => tag,
        }
    }

    /// Human readable label
    pub fn label(&self) -> &str {
        match self {
            Self::Extensions => "Extensions",
            Self::Wigs => "Wigs",
            Self::Bundles => "Bundles",
            Self::Closures => "Closures",
            Self::HairCare => "Hair Care",
            Self::Accessories => "Accessories",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "extensions" => Self::Extensions,
            "wigs" => Self::Wigs,
            "bundles" => Self::Bundles,
            "closures" => Self::Closures,
            "hair_care" => Self::HairCare,
            "accessories" => Self::Accessories,
            _ => Self::Other(tag),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.trim().to_ascii_lowercase().replace([' ', '-'], "_")))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// A product listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Free-form attributes such as length, color or texture
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// First image, used as the listing thumbnail
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// An attribute rendered as text, whatever JSON type it was sent as
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).map(|value| match value {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }
}

/// `{ "message": ... }` answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn category_tags() {
        assert_eq!("hair care".parse::<Category>().unwrap(), Category::HairCare);
        assert_eq!("Wigs".parse::<Category>().unwrap(), Category::Wigs);
        assert_eq!(
            "toppers".parse::<Category>().unwrap(),
            Category::Other("toppers".into())
        );
        assert_eq!(Category::HairCare.to_string(), "hair_care");
    }

    #[test]
    fn product_from_server_payload() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Lace Front Wig - Natural Look",
            "description": "Premium lace front wig",
            "price": 199.99,
            "category": "wigs",
            "subcategory": "lace_front",
            "images": ["https://img.example.com/wig.jpg"],
            "attributes": {"length": "16 inches", "cap_size": "Medium"},
            "stock_quantity": 25,
            "is_active": true,
            "created_at": "2024-05-01T10:00:00"
        }))
        .unwrap();

        assert_eq!(product.category, Category::Wigs);
        assert_eq!(product.price, Decimal::new(19999, 2));
        assert_eq!(product.attribute("length").as_deref(), Some("16 inches"));
        assert_eq!(product.primary_image(), Some("https://img.example.com/wig.jpg"));
        assert!(product.in_stock());
        assert_eq!(
            product.created_at,
            NaiveDate::from_ymd_opt(2024, 5, 1).and_then(|day| day.and_hms_opt(10, 0, 0))
        );

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["category"], "wigs");
        assert_eq!(value["created_at"], "2024-05-01T10:00:00");
    }
}
