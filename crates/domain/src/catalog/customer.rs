use chrono::{DateTime, Utc};
use common::CustomerId;
use serde::{Deserialize, Serialize};
use store::Entity;

/// A registered customer, unique by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub(crate) id: Option<CustomerId>,
    pub(crate) email: String,
    pub name: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Option<CustomerId> {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn entity_type() -> &'static str {
        "Customer"
    }

    fn id(&self) -> Option<CustomerId> {
        self.id
    }

    fn set_id(&mut self, id: CustomerId) {
        self.id = Some(id);
    }
}

/// Checks an address against `local@domain.tld`.
///
/// Local part and domain may contain ASCII letters, digits, `_`, `.` and
/// `-`; the top-level domain must be at least two ASCII letters.
pub fn is_valid_email(email: &str) -> bool {
    fn allowed(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !local.is_empty()
        && local.chars().all(allowed)
        && !host.is_empty()
        && host.chars().all(allowed)
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}
