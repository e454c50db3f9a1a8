//! Route handlers and shared application state.

pub mod assignments;
pub mod health;
pub mod metrics;
pub mod products;

use catalog::{AccountsClient, CatalogService};

/// Shared application state accessible from all handlers.
pub struct AppState<A: AccountsClient> {
    pub service: CatalogService<A>,
}
