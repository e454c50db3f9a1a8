//! Catalog error types.

use thiserror::Error;

use crate::accounts::AccountsError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// Unknown product id.
    #[error("Product {0} not found")]
    ProductNotFound(String),

    /// Failure reported by (or while reaching) the accounts collaborator.
    #[error(transparent)]
    Accounts(#[from] AccountsError),
}

/// Convenience type alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;
