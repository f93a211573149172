//! Product master and bottle keeps.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{Customer, Keep, Product};

use super::customer::customer_label;
use super::{filter_by_query, non_blank};

/// A product as submitted by the master form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraft {
    /// Id of the product being edited; absent for a new product.
    #[serde(default)]
    pub id: Option<i64>,
    /// Product name; required.
    #[serde(default)]
    pub name: String,
    /// Price in yen; required.
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl ProductDraft {
    /// Validates the draft. New products get `now` in epoch milliseconds as id.
    ///
    /// # Errors
    ///
    /// [`BackofficeError::Validation`] when the name or price is missing.
    pub fn into_product(self, now: DateTime<Utc>) -> BackofficeResult<Product> {
        let name = non_blank(Some(&self.name))
            .ok_or_else(|| BackofficeError::validation("name", "name is required"))?;
        let price = self
            .price
            .ok_or_else(|| BackofficeError::validation("price", "price is required"))?;

        Ok(Product {
            id: self.id.unwrap_or_else(|| now.timestamp_millis()),
            name,
            price,
        })
    }
}

/// A keep as submitted by the keep form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeepDraft {
    /// Id of the keep being edited; absent for a new keep.
    #[serde(default)]
    pub id: Option<i64>,
    /// The owning customer.
    pub customer_id: i64,
    /// The kept product.
    pub product_id: i64,
}

impl KeepDraft {
    /// Builds the keep. New keeps get `now` in epoch milliseconds as id.
    pub fn into_keep(self, now: DateTime<Utc>) -> Keep {
        Keep {
            id: self.id.unwrap_or_else(|| now.timestamp_millis()),
            customer_id: self.customer_id,
            product_id: self.product_id,
        }
    }
}

/// Returns the name of the product with `id`, or an empty string.
pub fn product_name(products: &[Product], id: i64) -> String {
    products
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .unwrap_or_default()
}

/// Keeps products whose name or price text match the query.
pub fn search_products(products: Vec<Product>, query: Option<&str>) -> Vec<Product> {
    filter_by_query(products, query, |q, p| {
        q.matches(&p.name) || q.matches(&p.price.to_string())
    })
}

/// Keeps bottle keeps whose customer label, product name or id match the query.
pub fn search_keeps(
    keeps: Vec<Keep>,
    customers: &[Customer],
    products: &[Product],
    query: Option<&str>,
) -> Vec<Keep> {
    filter_by_query(keeps, query, |q, k| {
        q.matches(&customer_label(customers, k.customer_id))
            || q.matches(&product_name(products, k.product_id))
            || q.matches(&k.id.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-12-01T00:00:00Z").unwrap()
    }

    fn make_product(id: i64, name: &str, price: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: Decimal::new(price, 0),
        }
    }

    fn make_customer(id: i64, name: &str) -> Customer {
        Customer {
            id,
            name: name.to_string(),
            tags: vec![],
            visits: vec![],
            birthday: None,
            favorite_drink: None,
            seat_preference: None,
            bottle: None,
            cast_id: "cast1".to_string(),
        }
    }

    #[test]
    fn test_new_product_gets_time_based_id() {
        let draft = ProductDraft {
            id: None,
            name: "山崎12年".to_string(),
            price: Some(Decimal::new(30000, 0)),
        };
        let product = draft.into_product(now()).unwrap();
        assert_eq!(product.id, now().timestamp_millis());
        assert_eq!(product.price, Decimal::new(30000, 0));
    }

    #[test]
    fn test_edited_product_keeps_id() {
        let draft = ProductDraft {
            id: Some(5),
            name: "Wine".to_string(),
            price: Some(Decimal::new(8000, 0)),
        };
        assert_eq!(draft.into_product(now()).unwrap().id, 5);
    }

    #[test]
    fn test_product_requires_name_and_price() {
        let no_price = ProductDraft {
            name: "Wine".to_string(),
            ..ProductDraft::default()
        };
        match no_price.into_product(now()) {
            Err(BackofficeError::Validation { field, .. }) => assert_eq!(field, "price"),
            other => panic!("Expected Validation error, got {other:?}"),
        }

        let no_name = ProductDraft {
            price: Some(Decimal::ONE),
            ..ProductDraft::default()
        };
        assert!(no_name.into_product(now()).is_err());
    }

    #[test]
    fn test_search_products_by_name_or_price() {
        let products = vec![make_product(1, "Whisky", 12000), make_product(2, "Beer", 800)];

        let found = search_products(products.clone(), Some("whis"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);

        let found = search_products(products, Some("800"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
    }

    #[test]
    fn test_search_keeps_by_customer_product_or_id() {
        let customers = vec![make_customer(1, "Alice"), make_customer(2, "Bob")];
        let products = vec![make_product(10, "Shochu", 5000), make_product(11, "Brandy", 9000)];
        let keeps = vec![
            Keep {
                id: 100,
                customer_id: 1,
                product_id: 10,
            },
            Keep {
                id: 200,
                customer_id: 2,
                product_id: 11,
            },
        ];

        let ids = |found: Vec<Keep>| found.iter().map(|k| k.id).collect::<Vec<_>>();
        assert_eq!(ids(search_keeps(keeps.clone(), &customers, &products, Some("alice"))), vec![100]);
        assert_eq!(ids(search_keeps(keeps.clone(), &customers, &products, Some("brandy"))), vec![200]);
        assert_eq!(ids(search_keeps(keeps.clone(), &customers, &products, Some("200"))), vec![200]);
        assert_eq!(ids(search_keeps(keeps, &customers, &products, Some(""))), vec![100, 200]);
    }

    #[test]
    fn test_keep_draft_deserializes_camel_case() {
        let draft: KeepDraft = serde_json::from_str(r#"{"customerId": 1, "productId": 2}"#).unwrap();
        let keep = draft.into_keep(now());
        assert_eq!(keep.customer_id, 1);
        assert_eq!(keep.product_id, 2);
        assert_eq!(keep.id, now().timestamp_millis());
    }
}
