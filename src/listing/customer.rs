//! Customer registration, visits and the customer list.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::access::Identity;
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::Customer;

use super::{filter_by_query, non_blank};

/// Customer fields as submitted by the customer form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    /// Customer name; required.
    #[serde(default)]
    pub name: String,
    /// Comma-separated tags.
    #[serde(default)]
    pub tags: Option<String>,
    /// Cast member in charge; defaults to the acting user.
    #[serde(default)]
    pub cast_id: Option<String>,
    /// Birthday as entered.
    #[serde(default)]
    pub birthday: Option<String>,
    /// Favourite drink.
    #[serde(default)]
    pub favorite_drink: Option<String>,
    /// Preferred seat.
    #[serde(default)]
    pub seat_preference: Option<String>,
    /// Usual bottle.
    #[serde(default)]
    pub bottle: Option<String>,
}

impl CustomerDraft {
    /// Builds a new customer with no visits.
    ///
    /// # Errors
    ///
    /// [`BackofficeError::Validation`] when the name is blank.
    pub fn create(self, id: i64, actor: &Identity) -> BackofficeResult<Customer> {
        self.into_customer(id, Vec::new(), actor)
    }

    /// Replaces an existing customer's fields, keeping its id and visits.
    ///
    /// # Errors
    ///
    /// [`BackofficeError::Validation`] when the name is blank.
    pub fn update(self, existing: &Customer, actor: &Identity) -> BackofficeResult<Customer> {
        self.into_customer(existing.id, existing.visits.clone(), actor)
    }

    fn into_customer(
        self,
        id: i64,
        visits: Vec<NaiveDate>,
        actor: &Identity,
    ) -> BackofficeResult<Customer> {
        let name = non_blank(Some(&self.name))
            .ok_or_else(|| BackofficeError::validation("name", "name is required"))?;

        Ok(Customer {
            id,
            name,
            tags: self.tags.as_deref().map(parse_tags).unwrap_or_default(),
            visits,
            birthday: non_blank(self.birthday.as_deref()),
            favorite_drink: non_blank(self.favorite_drink.as_deref()),
            seat_preference: non_blank(self.seat_preference.as_deref()),
            bottle: non_blank(self.bottle.as_deref()),
            cast_id: non_blank(self.cast_id.as_deref()).unwrap_or_else(|| actor.id.clone()),
        })
    }
}

/// Splits a comma-separated tag list, trimming and dropping blanks.
///
/// # Examples
///
/// ```
/// use venue_backoffice::listing::parse_tags;
///
/// assert_eq!(parse_tags(" VIP, ,wine "), vec!["VIP", "wine"]);
/// ```
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Records a visit on `date`.
pub fn add_visit(customer: &mut Customer, date: NaiveDate) {
    customer.visits.push(date);
}

/// Returns the selection label of the customer with `id`, or an empty string.
pub fn customer_label(customers: &[Customer], id: i64) -> String {
    customers
        .iter()
        .find(|c| c.id == id)
        .map(Customer::label)
        .unwrap_or_default()
}

/// Orderings offered by the customer list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomerSort {
    /// By name, ascending.
    #[default]
    Name,
    /// By most recent visit, newest first; never-visited customers last.
    LastVisit,
}

/// Keeps customers whose name, a tag, or favourite drink match the query.
pub fn search_customers(customers: Vec<Customer>, query: Option<&str>) -> Vec<Customer> {
    filter_by_query(customers, query, |q, c| {
        q.matches(&c.name)
            || c.tags.iter().any(|t| q.matches(t))
            || c.favorite_drink.as_deref().is_some_and(|d| q.matches(d))
    })
}

/// Orders customers in place.
pub fn sort_customers(customers: &mut [Customer], sort: CustomerSort) {
    match sort {
        CustomerSort::Name => customers.sort_by(|a, b| a.name.cmp(&b.name)),
        CustomerSort::LastVisit => {
            customers.sort_by(|a, b| b.last_visit().cmp(&a.last_visit()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn actor() -> Identity {
        Identity::new("cast1", Role::Cast)
    }

    fn make_customer(id: i64, name: &str, visits: &[&str]) -> Customer {
        CustomerDraft {
            name: name.to_string(),
            ..CustomerDraft::default()
        }
        .into_customer(
            id,
            visits
                .iter()
                .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap())
                .collect(),
            &actor(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_defaults_cast_to_actor() {
        let draft = CustomerDraft {
            name: " 太郎 ".to_string(),
            tags: Some("VIP, wine,".to_string()),
            favorite_drink: Some("".to_string()),
            ..CustomerDraft::default()
        };
        let customer = draft.create(10, &actor()).unwrap();

        assert_eq!(customer.id, 10);
        assert_eq!(customer.name, "太郎");
        assert_eq!(customer.tags, vec!["VIP", "wine"]);
        assert_eq!(customer.cast_id, "cast1");
        assert!(customer.favorite_drink.is_none());
        assert!(customer.visits.is_empty());
    }

    #[test]
    fn test_create_with_explicit_cast() {
        let draft = CustomerDraft {
            name: "花子".to_string(),
            cast_id: Some("cast9".to_string()),
            ..CustomerDraft::default()
        };
        assert_eq!(draft.create(1, &actor()).unwrap().cast_id, "cast9");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let result = CustomerDraft::default().create(1, &actor());
        match result {
            Err(BackofficeError::Validation { field, .. }) => assert_eq!(field, "name"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_update_keeps_visits() {
        let existing = make_customer(3, "old", &["2024-11-01"]);
        let updated = CustomerDraft {
            name: "new".to_string(),
            ..CustomerDraft::default()
        }
        .update(&existing, &actor())
        .unwrap();

        assert_eq!(updated.id, 3);
        assert_eq!(updated.name, "new");
        assert_eq!(updated.visits, existing.visits);
    }

    #[test]
    fn test_add_visit_appends() {
        let mut customer = make_customer(1, "a", &["2024-11-01"]);
        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        add_visit(&mut customer, today);
        assert_eq!(customer.last_visit(), Some(today));
        assert_eq!(customer.visits.len(), 2);
    }

    #[test]
    fn test_search_matches_name_tags_and_drink() {
        let mut by_tag = make_customer(2, "Bob", &[]);
        by_tag.tags = vec!["Regular".to_string()];
        let mut by_drink = make_customer(3, "Carol", &[]);
        by_drink.favorite_drink = Some("Highball".to_string());
        let customers = vec![make_customer(1, "Alice", &[]), by_tag, by_drink];

        let ids = |found: Vec<Customer>| found.iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids(search_customers(customers.clone(), Some("ali"))), vec![1]);
        assert_eq!(ids(search_customers(customers.clone(), Some("REG"))), vec![2]);
        assert_eq!(ids(search_customers(customers.clone(), Some("highball"))), vec![3]);
        assert_eq!(ids(search_customers(customers, None)), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_by_name_and_last_visit() {
        let mut customers = vec![
            make_customer(1, "b", &["2024-11-01"]),
            make_customer(2, "c", &[]),
            make_customer(3, "a", &["2024-10-01", "2024-12-01"]),
        ];

        sort_customers(&mut customers, CustomerSort::Name);
        let names: Vec<&str> = customers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        sort_customers(&mut customers, CustomerSort::LastVisit);
        let ids: Vec<i64> = customers.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_deserializes_from_query_value() {
        let sort: CustomerSort = serde_json::from_str("\"lastVisit\"").unwrap();
        assert_eq!(sort, CustomerSort::LastVisit);
    }

    #[test]
    fn test_customer_label_lookup() {
        let customers = vec![make_customer(7, "太郎", &[])];
        assert_eq!(customer_label(&customers, 7), "太郎 (7)");
        assert_eq!(customer_label(&customers, 8), "");
    }
}
