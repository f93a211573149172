//! Sales bills: registration, the bill list and monthly totals.

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{Bill, BillItem, Cast, Customer, Role, User, format_timestamp};

use super::customer::customer_label;
use super::{filter_by_query, non_blank};

/// A bill line as entered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillItemDraft {
    /// Id of the line being edited.
    #[serde(default)]
    pub id: Option<i64>,
    /// What was sold; required.
    #[serde(default)]
    pub description: String,
    /// Line amount; required.
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// A bill as submitted by the sales form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDraft {
    /// Id of the bill being edited; absent for a new bill.
    #[serde(default)]
    pub id: Option<i64>,
    /// The billed customer.
    #[serde(default)]
    pub customer_id: i64,
    /// User id of the cast member credited with the sale; required.
    #[serde(default)]
    pub cast_id: String,
    /// Bill lines; at least one.
    #[serde(default)]
    pub items: Vec<BillItemDraft>,
}

impl BillDraft {
    /// Finds the cast member the draft credits among `users`.
    ///
    /// # Errors
    ///
    /// [`BackofficeError::Validation`] on `castId` when no cast is selected
    /// or the id is not a registered cast member.
    pub fn resolve_cast(&self, users: &[User]) -> BackofficeResult<Cast> {
        let cast_id = self.cast_id.trim();
        if cast_id.is_empty() {
            return Err(BackofficeError::validation("castId", "a cast must be selected"));
        }
        users
            .iter()
            .find(|u| u.id == cast_id && u.role == Role::Cast)
            .map(Cast::from)
            .ok_or_else(|| BackofficeError::validation("castId", format!("unknown cast '{cast_id}'")))
    }

    /// Validates the lines and stamps the bill with `now`.
    ///
    /// The bill stores the display name of `cast`, as returned by
    /// [`BillDraft::resolve_cast`]. New bills and lines get ids derived from
    /// `now` in epoch milliseconds.
    ///
    /// # Errors
    ///
    /// [`BackofficeError::Validation`] when there are no lines, or a line
    /// lacks a description or amount.
    pub fn into_bill(self, cast: &Cast, now: DateTime<Utc>) -> BackofficeResult<Bill> {
        if self.items.is_empty() {
            return Err(BackofficeError::validation("items", "a bill needs at least one line"));
        }

        let base_id = now.timestamp_millis();
        let items = self
            .items
            .into_iter()
            .zip(0..)
            .map(|(item, offset)| {
                let description = non_blank(Some(&item.description)).ok_or_else(|| {
                    BackofficeError::validation("items.description", "description is required")
                })?;
                let amount = item.amount.ok_or_else(|| {
                    BackofficeError::validation("items.amount", "amount is required")
                })?;
                Ok(BillItem {
                    id: item.id.unwrap_or(base_id + offset),
                    description,
                    amount,
                })
            })
            .collect::<BackofficeResult<Vec<_>>>()?;

        Ok(Bill {
            id: self.id.unwrap_or(base_id),
            customer_id: self.customer_id,
            cast: cast.name.clone(),
            items,
            created_at: now,
        })
    }
}

/// Orders bills newest first.
pub fn sort_newest_first(bills: &mut [Bill]) {
    bills.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// Keeps bills whose customer label, cast, creation time or id match the query.
pub fn search_bills(bills: Vec<Bill>, customers: &[Customer], query: Option<&str>) -> Vec<Bill> {
    filter_by_query(bills, query, |q, b| {
        q.matches(&customer_label(customers, b.customer_id))
            || q.matches(&b.cast)
            || q.matches(&format_timestamp(&b.created_at))
            || q.matches(&b.id.to_string())
    })
}

/// Sums the bills credited to `cast_name` in the calendar month containing
/// `now`, as seen in the venue's `offset`.
///
/// # Examples
///
/// ```
/// use venue_backoffice::listing::monthly_total;
/// use venue_backoffice::models::{Bill, BillItem, parse_timestamp};
/// use chrono::FixedOffset;
/// use rust_decimal::Decimal;
///
/// let jst = FixedOffset::east_opt(9 * 3600).unwrap();
/// let bill = Bill {
///     id: 1,
///     customer_id: 1,
///     cast: "Mika".to_string(),
///     items: vec![BillItem { id: 1, description: "Set".to_string(), amount: Decimal::new(5000, 0) }],
///     // 2024-12-01 00:30 in Japan
///     created_at: parse_timestamp("2024-11-30T15:30:00Z").unwrap(),
/// };
/// let now = parse_timestamp("2024-12-15T00:00:00Z").unwrap();
///
/// assert_eq!(monthly_total(&[bill], "Mika", now, jst), Decimal::new(5000, 0));
/// ```
pub fn monthly_total(
    bills: &[Bill],
    cast_name: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Decimal {
    let current = now.with_timezone(&offset);
    bills
        .iter()
        .filter(|b| {
            let created = b.created_at.with_timezone(&offset);
            b.cast == cast_name
                && created.year() == current.year()
                && created.month() == current.month()
        })
        .map(Bill::total)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn mika() -> Cast {
        Cast {
            id: "cast1".to_string(),
            name: "Mika".to_string(),
        }
    }

    fn make_user(id: &str, name: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            role,
            created_at: ts("2024-11-01T00:00:00Z"),
            updated_at: ts("2024-11-01T00:00:00Z"),
        }
    }

    fn item(description: &str, amount: i64) -> BillItemDraft {
        BillItemDraft {
            id: None,
            description: description.to_string(),
            amount: Some(Decimal::new(amount, 0)),
        }
    }

    fn make_bill(id: i64, cast: &str, amount: i64, created_at: &str) -> Bill {
        Bill {
            id,
            customer_id: 1,
            cast: cast.to_string(),
            items: vec![BillItem {
                id: 1,
                description: "Set".to_string(),
                amount: Decimal::new(amount, 0),
            }],
            created_at: ts(created_at),
        }
    }

    #[test]
    fn test_bill_from_draft() {
        let now = ts("2024-12-01T12:00:00Z");
        let draft = BillDraft {
            id: None,
            customer_id: 3,
            cast_id: "cast1".to_string(),
            items: vec![item("Set", 5000), item("Champagne", 30000)],
        };
        let bill = draft.into_bill(&mika(), now).unwrap();

        assert_eq!(bill.id, now.timestamp_millis());
        assert_eq!(bill.cast, "Mika");
        assert_eq!(bill.created_at, now);
        assert_eq!(bill.items[0].id, now.timestamp_millis());
        assert_eq!(bill.items[1].id, now.timestamp_millis() + 1);
        assert_eq!(bill.total(), Decimal::new(35000, 0));
    }

    #[test]
    fn test_resolve_cast() {
        let users = vec![
            make_user("cast1", "Mika", Role::Cast),
            make_user("staff1", "Ken", Role::Staff),
        ];
        let draft = |cast_id: &str| BillDraft {
            cast_id: cast_id.to_string(),
            ..BillDraft::default()
        };

        assert_eq!(draft(" cast1 ").resolve_cast(&users).unwrap(), mika());
        for cast_id in ["", "  ", "staff1", "nobody"] {
            match draft(cast_id).resolve_cast(&users) {
                Err(BackofficeError::Validation { field, .. }) => assert_eq!(field, "castId"),
                other => panic!("Expected Validation error for {cast_id:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_bill_requires_items() {
        let now = ts("2024-12-01T12:00:00Z");
        let no_items = BillDraft {
            cast_id: "cast1".to_string(),
            ..BillDraft::default()
        };
        match no_items.into_bill(&mika(), now) {
            Err(BackofficeError::Validation { field, .. }) => assert_eq!(field, "items"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_line_is_rejected() {
        let draft = BillDraft {
            cast_id: "cast1".to_string(),
            items: vec![
                item("Set", 5000),
                BillItemDraft {
                    description: "Tip".to_string(),
                    ..BillItemDraft::default()
                },
            ],
            ..BillDraft::default()
        };
        match draft.into_bill(&mika(), ts("2024-12-01T12:00:00Z")) {
            Err(BackofficeError::Validation { field, .. }) => assert_eq!(field, "items.amount"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut bills = vec![
            make_bill(1, "Mika", 1, "2024-12-01T10:00:00Z"),
            make_bill(2, "Mika", 1, "2024-12-03T10:00:00Z"),
            make_bill(3, "Mika", 1, "2024-12-02T10:00:00Z"),
        ];
        sort_newest_first(&mut bills);
        let ids: Vec<i64> = bills.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_search_bills() {
        let customers = vec![Customer {
            id: 1,
            name: "Alice".to_string(),
            tags: vec![],
            visits: vec![],
            birthday: None,
            favorite_drink: None,
            seat_preference: None,
            bottle: None,
            cast_id: "cast1".to_string(),
        }];
        let bills = vec![
            make_bill(11, "Mika", 1, "2024-12-01T10:00:00Z"),
            make_bill(22, "Yuna", 1, "2024-11-05T10:00:00Z"),
        ];

        let ids = |found: Vec<Bill>| found.iter().map(|b| b.id).collect::<Vec<_>>();
        assert_eq!(ids(search_bills(bills.clone(), &customers, Some("yuna"))), vec![22]);
        assert_eq!(ids(search_bills(bills.clone(), &customers, Some("2024-11"))), vec![22]);
        assert_eq!(ids(search_bills(bills.clone(), &customers, Some("alice"))), vec![11, 22]);
        assert_eq!(ids(search_bills(bills, &customers, Some("11"))), vec![11, 22]);
    }

    #[test]
    fn test_monthly_total_filters_cast_and_month() {
        let bills = vec![
            make_bill(1, "Mika", 5000, "2024-12-01T00:00:00Z"),
            make_bill(2, "Mika", 7000, "2024-12-31T23:59:59Z"),
            make_bill(3, "Mika", 9000, "2024-11-30T23:59:59Z"),
            make_bill(4, "Yuna", 1000, "2024-12-10T00:00:00Z"),
        ];
        let now = ts("2024-12-15T00:00:00Z");

        assert_eq!(monthly_total(&bills, "Mika", now, utc()), Decimal::new(12000, 0));
        assert_eq!(monthly_total(&bills, "Nobody", now, utc()), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_total_uses_venue_offset() {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let bills = vec![make_bill(1, "Mika", 5000, "2024-12-31T16:00:00Z")];

        assert_eq!(
            monthly_total(&bills, "Mika", ts("2024-12-15T00:00:00Z"), jst),
            Decimal::ZERO
        );
        assert_eq!(
            monthly_total(&bills, "Mika", ts("2025-01-02T00:00:00Z"), jst),
            Decimal::new(5000, 0)
        );
    }
}
