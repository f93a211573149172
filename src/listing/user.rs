//! User registration and the user list.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;

use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{Cast, Role, User};

use super::non_blank;

/// `local@domain.tld` with no whitespace or extra `@`.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern for email")
});

/// Six or more ASCII letters and digits.
static PASSWORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{6,}$").expect("Invalid regex pattern for password")
});

/// A registration form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    /// Display name; required.
    #[serde(default)]
    pub name: String,
    /// Login email address.
    #[serde(default)]
    pub email: String,
    /// Login password. Validated, then handed to the identity provider.
    #[serde(default)]
    pub password: String,
    /// Role to register.
    pub role: Role,
}

impl Registration {
    /// Validates the form and builds the user record for `id`.
    ///
    /// The password is checked but never copied into the user.
    ///
    /// # Errors
    ///
    /// [`BackofficeError::Validation`] naming the first invalid field.
    pub fn into_user(self, id: impl Into<String>, now: DateTime<Utc>) -> BackofficeResult<User> {
        let name = non_blank(Some(&self.name))
            .ok_or_else(|| BackofficeError::validation("name", "name is required"))?;
        let email = self.email.trim().to_string();
        validate_email(&email)?;
        validate_password(&self.password)?;

        Ok(User {
            id: id.into(),
            name,
            email,
            role: self.role,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Checks an email has the shape `local@domain.tld` with no whitespace.
///
/// # Examples
///
/// ```
/// use venue_backoffice::listing::validate_email;
///
/// assert!(validate_email("mika@example.com").is_ok());
/// assert!(validate_email("mika@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> BackofficeResult<()> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(BackofficeError::validation(
            "email",
            "email must look like name@example.com",
        ))
    }
}

/// Checks a password is at least six ASCII letters or digits and mixes
/// lower case, upper case and digits.
pub fn validate_password(password: &str) -> BackofficeResult<()> {
    // The pattern fixes the alphabet and length; regex has no lookahead for the mix
    let valid = PASSWORD_PATTERN.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(BackofficeError::validation(
            "password",
            "password must be at least 6 letters and digits mixing upper case, lower case and digits",
        ))
    }
}

/// Fails if another user already registered `email`.
pub fn ensure_unique_email(users: &[User], email: &str) -> BackofficeResult<()> {
    let email = email.trim();
    if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
        Err(BackofficeError::validation("email", "email is already registered"))
    } else {
        Ok(())
    }
}

/// Keeps users holding `role`, or everyone when `role` is `None`.
pub fn filter_by_role(users: Vec<User>, role: Option<Role>) -> Vec<User> {
    match role {
        Some(role) => users.into_iter().filter(|u| u.role == role).collect(),
        None => users,
    }
}

/// Returns the cast members among `users`.
pub fn casts(users: &[User]) -> Vec<Cast> {
    users
        .iter()
        .filter(|u| u.role == Role::Cast)
        .map(Cast::from)
        .collect()
}

/// Returns the name of the cast member with `id`.
pub fn cast_name(users: &[User], id: &str) -> Option<String> {
    users
        .iter()
        .find(|u| u.id == id && u.role == Role::Cast)
        .map(|u| u.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-12-01T00:00:00Z").unwrap()
    }

    fn registration(email: &str, password: &str, role: Role) -> Registration {
        Registration {
            name: "Mika".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        }
    }

    fn make_user(id: &str, name: &str, role: Role) -> User {
        registration(&format!("{id}@example.com"), "Passw0rd", role)
            .into_user(id, now())
            .map(|mut u| {
                u.name = name.to_string();
                u
            })
            .unwrap()
    }

    #[test]
    fn test_registration_builds_user() {
        let user = registration(" mika@example.com ", "Abc123", Role::Cast)
            .into_user("uid-1", now())
            .unwrap();

        assert_eq!(user.id, "uid-1");
        assert_eq!(user.email, "mika@example.com");
        assert_eq!(user.role, Role::Cast);
        assert_eq!(user.created_at, now());
        assert_eq!(user.updated_at, now());
    }

    #[test]
    fn test_registration_requires_name() {
        let mut form = registration("mika@example.com", "Abc123", Role::Cast);
        form.name = "  ".to_string();
        match form.into_user("uid", now()) {
            Err(BackofficeError::Validation { field, .. }) => assert_eq!(field, "name"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_email_shapes() {
        for valid in ["a@b.c", "first.last@club.example.jp", "x+y@d.co", "a@b..c"] {
            assert!(validate_email(valid).is_ok(), "{valid} should be valid");
        }
        for invalid in ["", "a@b", "@b.c", "a@.c", "a@b.", "a b@c.d", "a@b@c.d", "abc.de"] {
            assert!(validate_email(invalid).is_err(), "{invalid} should be invalid");
        }
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Abc123").is_ok());
        assert!(validate_password("zzzzzzZ9").is_ok());

        assert!(validate_password("Ab1").is_err());
        assert!(validate_password("abc123").is_err());
        assert!(validate_password("ABC123").is_err());
        assert!(validate_password("Abcdef").is_err());
        assert!(validate_password("Abc 123").is_err());
        assert!(validate_password("Abc12!").is_err());
        assert!(validate_password("Äbc123").is_err());
        // Non-ASCII digits do not count
        assert!(validate_password("Abcd1٣").is_err());
    }

    #[test]
    fn test_unique_email_ignores_case() {
        let users = vec![make_user("u1", "Mika", Role::Cast)];
        assert!(ensure_unique_email(&users, "U1@Example.com").is_err());
        assert!(ensure_unique_email(&users, "u2@example.com").is_ok());
    }

    #[test]
    fn test_filter_and_cast_projection() {
        let users = vec![
            make_user("o", "Owner", Role::Owner),
            make_user("c1", "Mika", Role::Cast),
            make_user("s", "Staff", Role::Staff),
            make_user("c2", "Yuna", Role::Cast),
        ];

        assert_eq!(filter_by_role(users.clone(), Some(Role::Staff)).len(), 1);
        assert_eq!(filter_by_role(users.clone(), None).len(), 4);

        let cast_list = casts(&users);
        assert_eq!(
            cast_list,
            vec![
                Cast {
                    id: "c1".to_string(),
                    name: "Mika".to_string()
                },
                Cast {
                    id: "c2".to_string(),
                    name: "Yuna".to_string()
                },
            ]
        );
        assert_eq!(cast_name(&users, "c2").as_deref(), Some("Yuna"));
        assert_eq!(cast_name(&users, "s"), None);
    }
}
