//! Assignment records linking products to external accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product assigned to an account.
///
/// Ids are minted by the store as `a1`, `a2`, … with their own counter,
/// separate from product ids. Immutable after creation and never deleted.
/// The product reference is checked only at assignment time; it is not a
/// foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub account_id: String,
    pub product_id: String,
    pub created_at: DateTime<Utc>,
}
