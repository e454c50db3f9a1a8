//! Product catalog domain.
//!
//! This crate holds the catalog records, the in-memory store backing them,
//! and the accounts collaborator the assignment flow calls out to:
//! 1. Create products (validated, counter-minted ids)
//! 2. Assign products to external accounts
//! 3. Optionally debit the account by the product price on assignment
//!
//! The collaborator is a trait so the HTTP client can be swapped for an
//! in-memory fake in tests.

pub mod accounts;
pub mod assignment;
pub mod error;
pub mod product;
pub mod service;
pub mod store;

pub use accounts::{
    Account, AccountsClient, AccountsError, ChargeReceipt, HttpAccountsClient,
    InMemoryAccountsService, seed_accounts,
};
pub use assignment::Assignment;
pub use error::{CatalogError, Result};
pub use product::{DEFAULT_CATEGORY, NewProduct, Product, ProductDraft};
pub use service::{AssignmentOutcome, CatalogService};
pub use store::CatalogStore;
