//! Product records and creation-time validation.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Category applied when the caller supplies none.
pub const DEFAULT_CATEGORY: &str = "general";

/// A catalog product.
///
/// Immutable after creation; there are no update or delete operations.
/// Ids are minted by the store as `p1`, `p2`, … and never reused within
/// a process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
}

/// Unvalidated product creation input, exactly as received on the wire.
///
/// `price` is kept as a raw JSON value so a supplied non-number (e.g. a
/// string) is rejected with a validation error rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub price: Option<serde_json::Value>,
    pub category: Option<String>,
}

/// Validated, creation-ready product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub category: String,
}

impl ProductDraft {
    /// Validates the draft: name required non-empty, price (if supplied)
    /// must be a JSON number, category defaults to [`DEFAULT_CATEGORY`].
    pub fn validate(self) -> Result<NewProduct, CatalogError> {
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(CatalogError::Validation("name is required".to_string())),
        };

        let price = match self.price {
            None => 0.0,
            Some(value) => value
                .as_f64()
                .filter(|price| price.is_finite())
                .ok_or_else(|| CatalogError::Validation("price must be a number".to_string()))?,
        };

        let category = self
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Ok(NewProduct {
            name,
            price,
            category,
        })
    }
}
