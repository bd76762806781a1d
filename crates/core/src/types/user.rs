//! Canonical user and address records.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// Postal address attached to a user profile or an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Address {
    /// True when every component is empty (the backend often sends an
    /// address object with all-blank fields instead of omitting it).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.zip_code.is_empty()
            && self.country.is_empty()
    }
}

/// Canonical user record.
///
/// `name` is always populated; `first_name`/`last_name` are kept when the
/// backend provided them separately so profile forms can round-trip them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: Address,
    /// Derived at normalization time: true when the raw record carried
    /// `isAdmin: true` *or* `role: "admin"`. Persisted denormalized so a
    /// restart does not need to re-derive it from a possibly-changed role.
    pub is_admin: bool,
    pub role: String,
}

impl User {
    /// Apply a partial profile update.
    ///
    /// `None` fields mean "leave as-is". Clearing a field requires the
    /// backend's canonical response, not a patch.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = Some(first_name);
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = Some(last_name);
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
    }
}

/// Partial user update, as submitted by the profile form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_user() -> User {
        User {
            id: UserId::new("u-1"),
            name: "Ada Lovelace".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: "ada@example.com".to_string(),
            phone: "5551234567".to_string(),
            address: Address::default(),
            is_admin: false,
            role: "customer".to_string(),
        }
    }

    #[test]
    fn patch_overwrites_only_provided_fields() {
        let mut user = base_user();
        user.apply(UserPatch {
            phone: Some("5559876543".to_string()),
            ..UserPatch::default()
        });
        assert_eq!(user.phone, "5559876543");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.name, "Ada Lovelace");
    }

    #[test]
    fn empty_address_detection() {
        assert!(Address::default().is_empty());
        let addr = Address {
            city: "Portland".to_string(),
            ..Address::default()
        };
        assert!(!addr.is_empty());
    }
}
