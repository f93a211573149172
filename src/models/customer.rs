//! Customer model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// A venue customer assigned to a cast member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier.
    pub id: i64,
    /// Customer name.
    pub name: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Visit dates, oldest first.
    #[serde(default)]
    pub visits: Vec<NaiveDate>,
    /// Birthday as entered (free text).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    /// Favourite drink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_drink: Option<String>,
    /// Preferred seat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_preference: Option<String>,
    /// Bottle the customer usually orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottle: Option<String>,
    /// The user id of the cast member in charge.
    pub cast_id: String,
}

impl Customer {
    /// Returns the most recent visit, if any.
    pub fn last_visit(&self) -> Option<NaiveDate> {
        self.visits.last().copied()
    }

    /// Returns the selection label `"<name> (<id>)"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use venue_backoffice::models::Customer;
    ///
    /// let customer = Customer {
    ///     id: 1,
    ///     name: "太郎".to_string(),
    ///     tags: vec![],
    ///     visits: vec![],
    ///     birthday: None,
    ///     favorite_drink: None,
    ///     seat_preference: None,
    ///     bottle: None,
    ///     cast_id: "cast1".to_string(),
    /// };
    /// assert_eq!(customer.label(), "太郎 (1)");
    /// ```
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

impl Entity for Customer {
    type Id = i64;
    const COLLECTION: &'static str = "customers";

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_customer() {
        let json = r#"{"id": 1, "name": "太郎", "tags": [], "visits": [], "castId": "cast1"}"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.cast_id, "cast1");
        assert!(customer.favorite_drink.is_none());
        assert!(customer.last_visit().is_none());
    }

    #[test]
    fn test_last_visit_is_final_entry() {
        let json = r#"{
            "id": 2,
            "name": "花子",
            "visits": ["2024-11-02", "2024-12-01"],
            "favoriteDrink": "シャンパン",
            "castId": "cast1"
        }"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(
            customer.last_visit(),
            NaiveDate::from_ymd_opt(2024, 12, 1)
        );
        assert_eq!(customer.favorite_drink.as_deref(), Some("シャンパン"));
    }
}
