//! Sales bill model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::repository::Entity;

use super::timestamp;

/// A single line on a bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    /// Unique identifier within the bill.
    pub id: i64,
    /// What was sold.
    pub description: String,
    /// Line amount in yen.
    pub amount: Decimal,
}

/// A customer's bill for one visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Unique identifier.
    pub id: i64,
    /// The billed customer.
    pub customer_id: i64,
    /// Name of the cast member credited with the sale.
    pub cast: String,
    /// Bill lines.
    #[serde(default)]
    pub items: Vec<BillItem>,
    /// When the bill was stored.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Returns the sum of all line amounts.
    ///
    /// # Examples
    ///
    /// ```
    /// use venue_backoffice::models::{Bill, BillItem};
    /// use chrono::Utc;
    /// use rust_decimal::Decimal;
    ///
    /// let bill = Bill {
    ///     id: 1,
    ///     customer_id: 1,
    ///     cast: "キャスト1".to_string(),
    ///     items: vec![
    ///         BillItem { id: 1, description: "セット".to_string(), amount: Decimal::new(5000, 0) },
    ///         BillItem { id: 2, description: "ドリンク".to_string(), amount: Decimal::new(1500, 0) },
    ///     ],
    ///     created_at: Utc::now(),
    /// };
    /// assert_eq!(bill.total(), Decimal::new(6500, 0));
    /// ```
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.amount).sum()
    }
}

impl Entity for Bill {
    type Id = i64;
    const COLLECTION: &'static str = "bills";

    fn id(&self) -> i64 {
        self.id
    }
}
