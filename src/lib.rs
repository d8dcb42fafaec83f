//! # Sales Ledger
//!
//! File-backed per-user sales records with on-demand revenue analytics.
//!
//! ## Design Principles
//!
//! - **Plain-text storage**: one delimited line per record, one file per user
//! - **Fixed-point arithmetic**: amounts carry 2 decimal places via `rust_decimal`
//! - **Fresh reads**: every call reloads from disk, nothing is cached
//! - **Tolerant loading**: a corrupt line is logged and skipped
//! - **Strict writing**: a field that would break its line is refused, never escaped
//! - **Pure analytics**: summaries are computed from a slice, no I/O
//!
//! ## Example
//!
//! ```no_run
//! use sales_ledger::{Amount, NewTransaction, SalesService, StoreConfig};
//!
//! let service = SalesService::new(StoreConfig::new("data"));
//! service.register("shop1", "secret1", "Shop Owner", None);
//! service.add_transaction(
//!     "shop1",
//!     NewTransaction {
//!         product_name: "Widget".into(),
//!         category: "Tools".into(),
//!         amount: "10.00".parse::<Amount>().unwrap(),
//!         quantity: 2,
//!         timestamp: Some("2024-01-05 09:00:00".into()),
//!         customer_name: "Alice".into(),
//!     },
//! );
//! let summary = service.analytics("shop1").unwrap();
//! println!("{}", serde_json::to_string_pretty(&summary).unwrap());
//! ```

pub mod account;
pub mod analytics;
pub mod codec;
pub mod config;
pub mod decimal;
pub mod error;
pub mod record_store;
pub mod service;
pub mod transaction;

pub use account::{Account, AccountStore, AccountView};
pub use analytics::{AnalyticsSummary, Breakdown, SalesAnalytics, SummaryMetrics};
pub use config::StoreConfig;
pub use decimal::Amount;
pub use error::{LedgerError, LineError, Result};
pub use record_store::RecordStore;
pub use service::{ActionResponse, AuthResponse, NewTransaction, SalesService};
pub use transaction::{Transaction, TransactionRecord};
