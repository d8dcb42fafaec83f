//! Sale transaction model and its stored line representation.

use crate::decimal::Amount;
use crate::error::LineError;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

/// Canonical timestamp layout used on disk and in responses.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a canonical `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

fn serialize_timestamp<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

/// A single recorded sale.
///
/// Owned by exactly one user's record set. `id` is unique within that set and
/// is assigned by [`RecordStore::next_id`](crate::RecordStore::next_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Positive identifier, unique per user.
    pub id: u32,

    pub product_name: String,

    pub category: String,

    /// Sale amount, never negative.
    #[serde(rename = "saleAmount")]
    pub amount: Amount,

    pub quantity: u32,

    /// Time of sale, second precision.
    #[serde(rename = "saleDate", serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,

    pub customer_name: String,
}

impl Transaction {
    /// Creates a transaction, dropping any sub-second part of `timestamp`.
    pub fn new(
        id: u32,
        product_name: impl Into<String>,
        category: impl Into<String>,
        amount: Amount,
        quantity: u32,
        timestamp: NaiveDateTime,
        customer_name: impl Into<String>,
    ) -> Self {
        Transaction {
            id,
            product_name: product_name.into(),
            category: category.into(),
            amount,
            quantity,
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            customer_name: customer_name.into(),
        }
    }

    /// Returns the fields in stored order:
    /// `id, productName, category, amount, quantity, timestamp, customerName`.
    pub fn to_fields(&self) -> [String; TransactionRecord::FIELDS] {
        [
            self.id.to_string(),
            self.product_name.clone(),
            self.category.clone(),
            self.amount.to_string(),
            self.quantity.to_string(),
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.customer_name.clone(),
        ]
    }

    /// Hour of day (0-23) the sale happened in.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// Raw transaction line as read from a user's record file.
///
/// All fields are kept as text so that a bad value can be reported by name
/// instead of failing the whole read.
#[derive(Debug, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub product_name: String,
    pub category: String,
    pub amount: String,
    pub quantity: String,
    pub timestamp: String,
    pub customer_name: String,
}

impl TransactionRecord {
    /// Number of fields in a stored transaction line.
    pub const FIELDS: usize = 7;

    /// Parses the raw line into a typed transaction.
    pub fn parse(&self) -> Result<Transaction, LineError> {
        let id = match self.id.trim().parse::<u32>() {
            Ok(id) if id > 0 => id,
            _ => return Err(LineError::invalid("id", &self.id)),
        };

        let amount = Amount::from_str(&self.amount)
            .ok()
            .filter(|a| !a.is_negative())
            .ok_or_else(|| LineError::invalid("amount", &self.amount))?;

        let quantity = self
            .quantity
            .trim()
            .parse::<u32>()
            .map_err(|_| LineError::invalid("quantity", &self.quantity))?;

        let timestamp = parse_timestamp(&self.timestamp)
            .ok_or_else(|| LineError::invalid("timestamp", &self.timestamp))?;

        Ok(Transaction {
            id,
            product_name: self.product_name.clone(),
            category: self.category.clone(),
            amount,
            quantity,
            timestamp,
            customer_name: self.customer_name.clone(),
        })
    }
}
