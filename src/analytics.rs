//! Revenue and volume summaries over a user's transactions.
//!
//! Everything here is a pure function of the slice it is given. Empty input
//! yields empty breakdowns, zero totals, hour 0 and `"N/A"` labels.
//!
//! # Ordering and ties
//!
//! - Product and category groups appear in the order their first record
//!   appears. Ranked product lists use a stable sort, so equal totals keep
//!   that order.
//! - Monthly groups are chronological, hourly groups ascend by hour.
//! - Peak month and peak hour pick the earliest entry among equal maxima;
//!   the max-sale product is the first record carrying the largest amount.

use crate::decimal::Amount;
use crate::transaction::Transaction;
use chrono::Datelike;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::hash::Hash;

/// Label reported when there is no month or product to name.
pub const NOT_AVAILABLE: &str = "N/A";

/// Number of products in the top and least lists of a summary.
pub const RANKED_PRODUCTS: usize = 5;

/// Ordered key/value pairs.
///
/// Serializes as a map whose keys keep this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown<K, V>(Vec<(K, V)>);

impl<K: PartialEq, V> Breakdown<K, V> {
    pub fn entries(&self) -> &[(K, V)] {
        &self.0
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> From<Vec<(K, V)>> for Breakdown<K, V> {
    fn from(entries: Vec<(K, V)>) -> Self {
        Breakdown(entries)
    }
}

impl<K: Serialize, V: Serialize> Serialize for Breakdown<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// Headline numbers of a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub total_revenue: Amount,
    pub total_sales: usize,
    pub max_sale_amount: Amount,
    pub max_sale_product: String,
    pub max_sale_month: String,
    pub peak_sales_hour: u32,
}

/// Everything the dashboard shows, computed in one pass over the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub summary: SummaryMetrics,
    pub top_products: Breakdown<String, u64>,
    pub least_products: Breakdown<String, u64>,
    pub monthly_sales: Breakdown<String, Amount>,
    pub category_sales: Breakdown<String, Amount>,
    pub hourly_sales: Breakdown<u32, Amount>,
}

/// Aggregations over a borrowed list of transactions.
pub struct SalesAnalytics<'a> {
    sales: &'a [Transaction],
}

impl<'a> SalesAnalytics<'a> {
    pub fn new(sales: &'a [Transaction]) -> Self {
        SalesAnalytics { sales }
    }

    /// The `n` products with the highest total quantity, largest first.
    pub fn top_by_quantity(&self, n: usize) -> Breakdown<String, u64> {
        let mut totals = self.quantity_by_product();
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals.truncate(n);
        totals.into()
    }

    /// The `n` products with the lowest total quantity, smallest first.
    pub fn bottom_by_quantity(&self, n: usize) -> Breakdown<String, u64> {
        let mut totals = self.quantity_by_product();
        totals.sort_by(|a, b| a.1.cmp(&b.1));
        totals.truncate(n);
        totals.into()
    }

    /// Revenue per calendar month, labelled like `"JANUARY 2024"`.
    pub fn revenue_by_month(&self) -> Breakdown<String, Amount> {
        let mut months = group_sum(
            self.sales,
            |s| (s.timestamp.year(), s.timestamp.month()),
            |s| s.amount,
        );
        months.sort_by_key(|(key, _)| *key);

        months
            .into_iter()
            .map(|((year, month), total)| (month_label(year, month), total))
            .collect::<Vec<_>>()
            .into()
    }

    /// Label of the month with the highest revenue, or `"N/A"`.
    pub fn peak_month(&self) -> String {
        peak_month_of(&self.revenue_by_month())
    }

    /// Revenue per hour of day (0-23).
    pub fn revenue_by_hour(&self) -> Breakdown<u32, Amount> {
        let mut hours = group_sum(self.sales, Transaction::hour, |s| s.amount);
        hours.sort_by_key(|(hour, _)| *hour);
        hours.into()
    }

    /// Hour of day with the highest revenue, or 0.
    pub fn peak_hour(&self) -> u32 {
        peak_hour_of(&self.revenue_by_hour())
    }

    /// Largest single sale amount, or zero.
    pub fn max_sale_amount(&self) -> Amount {
        self.max_sale().map(|s| s.amount).unwrap_or(Amount::ZERO)
    }

    /// Product of the largest single sale, or `"N/A"`.
    pub fn max_sale_product(&self) -> String {
        self.max_sale()
            .map(|s| s.product_name.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn total_revenue(&self) -> Amount {
        self.sales.iter().map(|s| s.amount).sum()
    }

    /// Revenue per category.
    pub fn revenue_by_category(&self) -> Breakdown<String, Amount> {
        group_sum(self.sales, |s| s.category.clone(), |s| s.amount).into()
    }

    pub fn summarize(&self) -> AnalyticsSummary {
        let monthly_sales = self.revenue_by_month();
        let hourly_sales = self.revenue_by_hour();

        AnalyticsSummary {
            summary: SummaryMetrics {
                total_revenue: self.total_revenue(),
                total_sales: self.sales.len(),
                max_sale_amount: self.max_sale_amount(),
                max_sale_product: self.max_sale_product(),
                max_sale_month: peak_month_of(&monthly_sales),
                peak_sales_hour: peak_hour_of(&hourly_sales),
            },
            top_products: self.top_by_quantity(RANKED_PRODUCTS),
            least_products: self.bottom_by_quantity(RANKED_PRODUCTS),
            monthly_sales,
            category_sales: self.revenue_by_category(),
            hourly_sales,
        }
    }

    fn quantity_by_product(&self) -> Vec<(String, u64)> {
        group_sum(
            self.sales,
            |s| s.product_name.clone(),
            |s| u64::from(s.quantity),
        )
    }

    fn max_sale(&self) -> Option<&'a Transaction> {
        self.sales.iter().fold(None::<&'a Transaction>, |best, sale| match best {
            Some(b) if b.amount >= sale.amount => Some(b),
            _ => Some(sale),
        })
    }
}

/// Sums `value` per `key`, groups in order of first appearance.
fn group_sum<K, V, KF, VF>(sales: &[Transaction], key: KF, value: VF) -> Vec<(K, V)>
where
    K: Eq + Hash + Clone,
    V: std::ops::AddAssign + Copy,
    KF: Fn(&Transaction) -> K,
    VF: Fn(&Transaction) -> V,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, V)> = Vec::new();

    for sale in sales {
        let k = key(sale);
        let v = value(sale);
        match index.get(&k) {
            Some(&i) => groups[i].1 += v,
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, v));
            }
        }
    }

    groups
}

/// Earliest month among those with the highest revenue.
fn peak_month_of(months: &Breakdown<String, Amount>) -> String {
    first_max(months.entries())
        .map(|(label, _)| label.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Lowest hour among those with the highest revenue.
fn peak_hour_of(hours: &Breakdown<u32, Amount>) -> u32 {
    first_max(hours.entries()).map(|(hour, _)| *hour).unwrap_or(0)
}

/// First entry holding the largest value.
fn first_max<K, V: Ord>(entries: &[(K, V)]) -> Option<&(K, V)> {
    entries.iter().fold(None::<&(K, V)>, |best, entry| match best {
        Some(b) if b.1 >= entry.1 => Some(b),
        _ => Some(entry),
    })
}

const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// `month` is 1-based, as returned by `Datelike::month`.
fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_NAMES[(month as usize - 1) % MONTH_NAMES.len()];
    format!("{} {}", name, year)
}
