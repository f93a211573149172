//! Product master and bottle keep models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// A product on the drinks master list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: i64,
    /// Product name.
    pub name: String,
    /// Price in yen.
    pub price: Decimal,
}

impl Entity for Product {
    type Id = i64;
    const COLLECTION: &'static str = "products";

    fn id(&self) -> i64 {
        self.id
    }
}

/// A bottle kept at the venue on behalf of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keep {
    /// Unique identifier.
    pub id: i64,
    /// The customer who owns the bottle.
    pub customer_id: i64,
    /// The product that is kept.
    pub product_id: i64,
}

impl Entity for Keep {
    type Id = i64;
    const COLLECTION: &'static str = "keeps";

    fn id(&self) -> i64 {
        self.id
    }
}
