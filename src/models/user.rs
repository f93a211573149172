//! User model and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::repository::Entity;

use super::timestamp;

/// The role a user holds at the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Venue owner.
    Owner,
    /// Floor manager.
    Manager,
    /// Back-of-house and floor staff.
    Staff,
    /// Cast member who hosts customers.
    Cast,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 4] = [Role::Owner, Role::Manager, Role::Staff, Role::Cast];

    /// Returns the wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::Cast => "cast",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role: {s}"))
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The identity provider's id for the user.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email address.
    pub email: String,
    /// The user's role.
    pub role: Role,
    /// When the user was registered.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// When the user was last modified.
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = String;
    const COLLECTION: &'static str = "users";

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// A cast member as offered in selection lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cast {
    /// The cast member's user id.
    pub id: String,
    /// The cast member's display name.
    pub name: String,
}

impl From<&User> for Cast {
    fn from(user: &User) -> Self {
        Cast {
            id: user.id.clone(),
            name: user.name.clone(),
        }
    }
}
