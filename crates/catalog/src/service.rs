//! Catalog service orchestrating the product and assignment operations.

use crate::accounts::{AccountsClient, ChargeReceipt};
use crate::assignment::Assignment;
use crate::error::{CatalogError, Result};
use crate::product::{Product, ProductDraft};
use crate::store::CatalogStore;

/// Outcome of a successful assignment: the stored record, plus the charge
/// receipt when charge-on-assign ran.
#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    pub assignment: Assignment,
    pub charge: Option<ChargeReceipt>,
}

/// Catalog operations over the in-memory store and the accounts
/// collaborator.
///
/// Generic over [`AccountsClient`] so tests inject the in-memory fake
/// while the server wires up the HTTP client.
pub struct CatalogService<A: AccountsClient> {
    store: CatalogStore,
    accounts: A,
    charge_on_assign: bool,
}

impl<A: AccountsClient> CatalogService<A> {
    /// Creates a service over the given store and collaborator.
    pub fn new(store: CatalogStore, accounts: A, charge_on_assign: bool) -> Self {
        Self {
            store,
            accounts,
            charge_on_assign,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Validates and stores a new product.
    #[tracing::instrument(skip(self, draft))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product> {
        let new = draft.validate()?;
        let product = self.store.insert_product(new).await;
        metrics::counter!("catalog_products_created").increment(1);
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Lists products, optionally filtered by exact category.
    pub async fn list_products(&self, category: Option<&str>) -> Vec<Product> {
        self.store.list_products(category).await
    }

    /// Looks up a product by id.
    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.store
            .get_product(id)
            .await
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    /// Assigns a product to an account, optionally charging it.
    ///
    /// Steps: product lookup, accountId validation, account existence check
    /// against the collaborator (its failure is propagated verbatim), then
    /// the assignment is stored. With charge-on-assign enabled the account
    /// is debited by exactly the product price; a failed debit is returned
    /// to the caller but the already-stored assignment is never removed.
    #[tracing::instrument(skip(self))]
    pub async fn assign_product(
        &self,
        product_id: &str,
        account_id: &str,
    ) -> Result<AssignmentOutcome> {
        let product = self
            .store
            .get_product(product_id)
            .await
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.to_string()))?;

        if account_id.trim().is_empty() {
            return Err(CatalogError::Validation(
                "accountId is required".to_string(),
            ));
        }

        // Confirm the account exists before anything is written.
        self.accounts.get_account(account_id).await?;

        let assignment = self.store.insert_assignment(account_id, product_id).await;
        metrics::counter!("catalog_assignments_created").increment(1);
        tracing::info!(
            assignment_id = %assignment.id,
            product_id,
            account_id,
            "assignment created"
        );

        let charge = if self.charge_on_assign && product.price.is_finite() {
            match self.accounts.credit_account(account_id, -product.price).await {
                Ok(receipt) => {
                    metrics::counter!("catalog_charges_succeeded").increment(1);
                    Some(receipt)
                }
                Err(err) => {
                    // No compensation: the assignment stays in the store.
                    metrics::counter!("catalog_charges_failed").increment(1);
                    tracing::warn!(
                        assignment_id = %assignment.id,
                        error = %err,
                        "charge failed after assignment was stored"
                    );
                    return Err(err.into());
                }
            }
        } else {
            None
        };

        Ok(AssignmentOutcome { assignment, charge })
    }

    /// Assignments for an account, empty when none exist.
    pub async fn assignments_for(&self, account_id: &str) -> Vec<Assignment> {
        self.store.assignments_for(account_id).await
    }
}
