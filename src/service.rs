//! Request-level operations: validation, id assignment and response envelopes.
//!
//! This is the surface a front end (the bundled CLI, or an HTTP layer) calls.
//! Store failures are logged here and reported through the `success` flag
//! rather than propagated.

use crate::account::{Account, AccountStore, AccountView};
use crate::analytics::{AnalyticsSummary, SalesAnalytics};
use crate::codec::{is_storable, ACCOUNT_DELIMITER, TRANSACTION_DELIMITER};
use crate::config::StoreConfig;
use crate::decimal::Amount;
use crate::error::Result;
use crate::record_store::RecordStore;
use crate::transaction::{parse_timestamp, Transaction};
use chrono::{Local, NaiveDateTime};
use log::{debug, error, info};
use serde::Serialize;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Outcome of register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AccountView>,
}

impl AuthResponse {
    fn ok(message: &str, user: AccountView) -> Self {
        AuthResponse {
            success: true,
            message: message.to_string(),
            user: Some(user),
        }
    }

    fn fail(message: &str) -> Self {
        AuthResponse {
            success: false,
            message: message.to_string(),
            user: None,
        }
    }
}

/// Outcome of add and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    fn fail(message: &str) -> Self {
        ActionResponse {
            success: false,
            message: message.to_string(),
        }
    }

    fn from_result(result: Result<()>, ok: &str, fail: &str) -> Self {
        let success = result.is_ok();
        ActionResponse {
            success,
            message: if success { ok } else { fail }.to_string(),
        }
    }
}

/// A sale as submitted, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub product_name: String,
    pub category: String,
    pub amount: Amount,
    pub quantity: u32,
    /// `YYYY-MM-DD HH:MM:SS`; absent or unparsable means now.
    pub timestamp: Option<String>,
    pub customer_name: String,
}

/// Accounts, transactions and analytics over one storage root.
#[derive(Debug, Clone)]
pub struct SalesService {
    records: RecordStore,
    accounts: AccountStore,
}

impl SalesService {
    pub fn new(config: StoreConfig) -> Self {
        SalesService {
            records: RecordStore::new(config.clone()),
            accounts: AccountStore::new(config),
        }
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// Creates an account unless the username is taken.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
        business_name: Option<&str>,
    ) -> AuthResponse {
        if username.trim().is_empty() {
            return AuthResponse::fail("Username is required");
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return AuthResponse::fail("Password must be at least 6 characters");
        }
        if full_name.trim().is_empty() {
            return AuthResponse::fail("Full name is required");
        }
        let stored = [username, full_name, business_name.unwrap_or_default()];
        if !stored.iter().all(|f| is_storable(f, ACCOUNT_DELIMITER)) {
            return AuthResponse::fail("Fields must not contain '|' or line breaks");
        }

        match self.accounts.exists(username) {
            Ok(true) => return AuthResponse::fail("Username already exists"),
            Ok(false) => {}
            Err(e) => {
                error!("Registration of {} failed: {}", username, e);
                return AuthResponse::fail("Registration failed");
            }
        }

        let account = Account::new(
            username,
            password,
            full_name,
            business_name.map(str::to_string),
        );
        match self.accounts.save(&account) {
            Ok(()) => {
                info!("Registered user {}", username);
                AuthResponse::ok("Registration successful", account.view())
            }
            Err(e) => {
                error!("Registration of {} failed: {}", username, e);
                AuthResponse::fail("Registration failed")
            }
        }
    }

    /// Checks credentials. Unknown users and wrong passwords get the same answer.
    pub fn login(&self, username: &str, password: &str) -> AuthResponse {
        if username.trim().is_empty() {
            return AuthResponse::fail("Username is required");
        }
        if password.is_empty() {
            return AuthResponse::fail("Password is required");
        }

        let account = match self.accounts.find(username) {
            Ok(account) => account,
            Err(e) => {
                error!("Login lookup for {} failed: {}", username, e);
                None
            }
        };

        match account {
            Some(account) if account.verify_password(password) => {
                debug!("User {} logged in", username);
                AuthResponse::ok("Login successful", account.view())
            }
            _ => {
                debug!("Rejected login for {}", username);
                AuthResponse::fail(INVALID_CREDENTIALS)
            }
        }
    }

    /// Stores a new sale under the next free id.
    pub fn add_transaction(&self, username: &str, sale: NewTransaction) -> ActionResponse {
        if username.trim().is_empty() {
            return ActionResponse::fail("Username is required");
        }
        if sale.amount.is_negative() {
            return ActionResponse::fail("Amount must not be negative");
        }
        let text = [&sale.product_name, &sale.category, &sale.customer_name];
        if !text.iter().all(|f| is_storable(f, TRANSACTION_DELIMITER)) {
            return ActionResponse::fail("Fields must not contain commas or line breaks");
        }

        let result = self.records.next_id(username).and_then(|id| {
            let timestamp = sale
                .timestamp
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_else(now);
            let record = Transaction::new(
                id,
                sale.product_name,
                sale.category,
                sale.amount,
                sale.quantity,
                timestamp,
                sale.customer_name,
            );
            self.records.add_record(username, &record)
        });

        if let Err(e) = &result {
            error!("Adding sale for {} failed: {}", username, e);
        }
        ActionResponse::from_result(result, "Sale added successfully", "Failed to add sale")
    }

    /// All of the user's sales in insertion order.
    pub fn list_transactions(&self, username: &str) -> Result<Vec<Transaction>> {
        self.records.list_records(username)
    }

    /// Summary over all of the user's sales.
    pub fn analytics(&self, username: &str) -> Result<AnalyticsSummary> {
        let sales = self.records.list_records(username)?;
        Ok(SalesAnalytics::new(&sales).summarize())
    }

    pub fn delete_transaction(&self, username: &str, id: u32) -> ActionResponse {
        let result = self.records.delete_record(username, id);
        if let Err(e) = &result {
            error!("Deleting sale {} for {} failed: {}", id, username, e);
        }
        ActionResponse::from_result(
            result,
            "Sale deleted successfully",
            "Failed to delete sale",
        )
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
