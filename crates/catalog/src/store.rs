//! In-memory catalog store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::assignment::Assignment;
use crate::product::{NewProduct, Product};

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Product>,
    assignments: HashMap<String, Vec<Assignment>>,
    next_product_id: u64,
    next_assignment_id: u64,
}

/// In-memory store for products and assignments.
///
/// State lives for the process lifetime only. Ids are minted from two
/// independent counters under the write lock, so they stay unique even
/// when handlers run concurrently.
#[derive(Clone, Default)]
pub struct CatalogStore {
    state: Arc<RwLock<CatalogState>>,
}

impl CatalogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a validated product and returns the created record.
    pub async fn insert_product(&self, new: NewProduct) -> Product {
        let mut state = self.state.write().await;
        state.next_product_id += 1;
        let product = Product {
            id: format!("p{}", state.next_product_id),
            name: new.name,
            price: new.price,
            category: new.category,
        };
        state.products.push(product.clone());
        product
    }

    /// Looks up a product by id.
    pub async fn get_product(&self, id: &str) -> Option<Product> {
        self.state
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Lists products in insertion order, optionally filtered by exact
    /// (case-sensitive) category match.
    pub async fn list_products(&self, category: Option<&str>) -> Vec<Product> {
        let state = self.state.read().await;
        match category {
            Some(category) => state
                .products
                .iter()
                .filter(|p| p.category == category)
                .cloned()
                .collect(),
            None => state.products.clone(),
        }
    }

    /// Stores a new assignment for the account and returns it.
    pub async fn insert_assignment(&self, account_id: &str, product_id: &str) -> Assignment {
        let mut state = self.state.write().await;
        state.next_assignment_id += 1;
        let assignment = Assignment {
            id: format!("a{}", state.next_assignment_id),
            account_id: account_id.to_string(),
            product_id: product_id.to_string(),
            created_at: Utc::now(),
        };
        state
            .assignments
            .entry(account_id.to_string())
            .or_default()
            .push(assignment.clone());
        assignment
    }

    /// Assignments for an account in insertion order; empty when the
    /// account has none (or was never seen).
    pub async fn assignments_for(&self, account_id: &str) -> Vec<Assignment> {
        self.state
            .read()
            .await
            .assignments
            .get(account_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of stored products.
    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }
}
