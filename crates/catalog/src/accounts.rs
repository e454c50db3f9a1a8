//! Accounts collaborator: trait, HTTP client, and in-memory fake.
//!
//! The catalog service calls the accounts service for exactly two things:
//! confirming an account exists before an assignment is stored, and
//! applying a signed balance delta when charge-on-assign is enabled.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account record as reported by the accounts service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub balance: f64,
}

/// Result of a successful credit/debit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeReceipt {
    pub balance: f64,
    pub currency: String,
}

/// Errors from the accounts collaborator.
///
/// `Upstream` failures carry the status the accounts service answered with
/// and are propagated verbatim to the catalog caller; `Transport` and
/// `Decode` map to a generic server error at the API boundary.
#[derive(Debug, Error)]
pub enum AccountsError {
    /// Failure reported by the accounts service itself.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The accounts service could not be reached.
    #[error("accounts service unreachable: {0}")]
    Transport(String),

    /// The accounts service answered with a body that could not be decoded.
    #[error("invalid response from accounts service: {0}")]
    Decode(String),
}

impl AccountsError {
    fn not_found(account_id: &str) -> Self {
        AccountsError::Upstream {
            status: 404,
            message: format!("Account {account_id} not found"),
        }
    }
}

/// The two operations the catalog service needs from the accounts service.
#[async_trait]
pub trait AccountsClient: Send + Sync {
    /// Looks up an account by id.
    async fn get_account(&self, account_id: &str) -> Result<Account, AccountsError>;

    /// Applies a signed balance delta: negative for a debit, positive for a
    /// credit. A debit that would drive the balance below zero is rejected
    /// and leaves the balance unchanged.
    async fn credit_account(
        &self,
        account_id: &str,
        amount: f64,
    ) -> Result<ChargeReceipt, AccountsError>;
}

/// The account set the mock server (and the seeded fake) start with.
pub fn seed_accounts() -> Vec<Account> {
    vec![
        Account {
            id: "acc_123".to_string(),
            name: "Acme Corp".to_string(),
            balance: 200.0,
        },
        Account {
            id: "acc_456".to_string(),
            name: "Globex".to_string(),
            balance: 1500.0,
        },
        Account {
            id: "acc_789".to_string(),
            name: "Initech".to_string(),
            balance: 50.0,
        },
        Account {
            id: "acc_999".to_string(),
            name: "Umbrella".to_string(),
            balance: 0.0,
        },
    ]
}

// -- HTTP client --

/// Accounts client talking to the real (or mock) accounts service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAccountsClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct AccountEnvelope {
    account: Account,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpAccountsClient {
    /// Creates a client against the given base URL (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn upstream_error(response: reqwest::Response) -> AccountsError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("accounts service returned status {status}"),
        };
        AccountsError::Upstream { status, message }
    }
}

#[async_trait]
impl AccountsClient for HttpAccountsClient {
    async fn get_account(&self, account_id: &str) -> Result<Account, AccountsError> {
        let url = format!("{}/accounts/{account_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AccountsError::Transport(e.to_string()))?;

        if response.status().is_success() {
            let envelope: AccountEnvelope = response
                .json()
                .await
                .map_err(|e| AccountsError::Decode(e.to_string()))?;
            Ok(envelope.account)
        } else {
            Err(Self::upstream_error(response).await)
        }
    }

    async fn credit_account(
        &self,
        account_id: &str,
        amount: f64,
    ) -> Result<ChargeReceipt, AccountsError> {
        let url = format!("{}/accounts/{account_id}/credit", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "amount": amount }))
            .send()
            .await
            .map_err(|e| AccountsError::Transport(e.to_string()))?;

        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| AccountsError::Decode(e.to_string()))
        } else {
            Err(Self::upstream_error(response).await)
        }
    }
}

// -- In-memory fake --

#[derive(Debug, Default)]
struct InMemoryAccountsState {
    accounts: HashMap<String, Account>,
    credit_calls: Vec<(String, f64)>,
    fail_on_credit: bool,
}

/// In-memory accounts service for testing.
///
/// Applies the same balance rules as the mock server, records every credit
/// call it receives, and can be told to fail the next credit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountsService {
    state: Arc<RwLock<InMemoryAccountsState>>,
}

impl InMemoryAccountsService {
    /// Creates an empty in-memory accounts service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service pre-seeded with the standard account set.
    pub fn seeded() -> Self {
        let service = Self::default();
        for account in seed_accounts() {
            service.insert_account(account);
        }
        service
    }

    /// Adds (or replaces) an account.
    pub fn insert_account(&self, account: Account) {
        self.state
            .write()
            .unwrap()
            .accounts
            .insert(account.id.clone(), account);
    }

    /// Configures the service to fail credit calls.
    pub fn set_fail_on_credit(&self, fail: bool) {
        self.state.write().unwrap().fail_on_credit = fail;
    }

    /// Returns every credit call received, in order.
    pub fn credit_calls(&self) -> Vec<(String, f64)> {
        self.state.read().unwrap().credit_calls.clone()
    }

    /// Returns the current balance of an account, if it exists.
    pub fn balance_of(&self, account_id: &str) -> Option<f64> {
        self.state
            .read()
            .unwrap()
            .accounts
            .get(account_id)
            .map(|a| a.balance)
    }
}

#[async_trait]
impl AccountsClient for InMemoryAccountsService {
    async fn get_account(&self, account_id: &str) -> Result<Account, AccountsError> {
        self.state
            .read()
            .unwrap()
            .accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| AccountsError::not_found(account_id))
    }

    async fn credit_account(
        &self,
        account_id: &str,
        amount: f64,
    ) -> Result<ChargeReceipt, AccountsError> {
        let mut state = self.state.write().unwrap();
        state.credit_calls.push((account_id.to_string(), amount));

        if state.fail_on_credit {
            return Err(AccountsError::Upstream {
                status: 503,
                message: "accounts service unavailable".to_string(),
            });
        }

        let account = state
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| AccountsError::not_found(account_id))?;

        if amount < 0.0 && account.balance + amount < 0.0 {
            return Err(AccountsError::Upstream {
                status: 400,
                message: "Insufficient balance".to_string(),
            });
        }

        account.balance += amount;
        Ok(ChargeReceipt {
            balance: account.balance,
            currency: "USD".to_string(),
        })
    }
}
