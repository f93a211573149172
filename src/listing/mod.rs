//! Back-office lists: customers, bottles, sales and users.
//!
//! Each submodule turns submitted drafts into validated entities and
//! filters or orders the lists read from the repositories. Searches are
//! case-insensitive substring matches on a trimmed query; an empty query
//! keeps everything.

pub mod bottle;
pub mod customer;
pub mod sales;
pub mod user;

pub use bottle::{KeepDraft, ProductDraft, product_name, search_keeps, search_products};
pub use customer::{
    CustomerDraft, CustomerSort, add_visit, customer_label, parse_tags, search_customers,
    sort_customers,
};
pub use sales::{BillDraft, BillItemDraft, monthly_total, search_bills, sort_newest_first};
pub use user::{
    Registration, cast_name, casts, ensure_unique_email, filter_by_role, validate_email,
    validate_password,
};

/// A lower-cased, trimmed search query; `None` when blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Normalizes raw search input.
    ///
    /// # Examples
    ///
    /// ```
    /// use venue_backoffice::listing::Query;
    ///
    /// let query = Query::parse("  Whisky ").unwrap();
    /// assert!(query.matches("Old whisky bottle"));
    /// assert!(Query::parse("   ").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_lowercase()))
    }

    /// Returns true if `text` contains the query, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.0)
    }
}

/// Keeps the items matching an optional query.
pub(crate) fn filter_by_query<T>(
    items: Vec<T>,
    raw: Option<&str>,
    matches: impl Fn(&Query, &T) -> bool,
) -> Vec<T> {
    match raw.and_then(Query::parse) {
        Some(query) => items.into_iter().filter(|item| matches(&query, item)).collect(),
        None => items,
    }
}

/// Returns `value` trimmed, or `None` when blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_case_insensitive() {
        let query = Query::parse("ABC").unwrap();
        assert!(query.matches("xabcx"));
        assert!(!query.matches("ab"));
    }

    #[test]
    fn test_filter_by_blank_query_keeps_all() {
        let items = vec!["a", "b"];
        let kept = filter_by_query(items.clone(), Some("  "), |q, item| q.matches(item));
        assert_eq!(kept, items);
        assert_eq!(filter_by_query(items.clone(), None, |_, _| false), items);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(" x ")), Some("x".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
