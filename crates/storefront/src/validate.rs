//! Field-level validation for user-submitted forms.
//!
//! Validation runs client-side before a request is sent. All fields are
//! checked in one pass so the caller can render every problem at once
//! instead of revealing them one submission at a time.

use serde::Serialize;

use copperleaf_core::UserPatch;

/// Maximum length of an email address we will send to the backend.
const MAX_EMAIL_LEN: usize = 254;

/// Acceptable digit counts for a phone number after stripping formatting.
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

/// Acceptable lengths for a postal code.
const ZIP_LEN: std::ops::RangeInclusive<usize> = 3..=10;

/// A single validation failure, addressed to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a profile update before submission.
///
/// Only fields actually present in the patch are checked; `None` means the
/// field is not being changed.
///
/// # Errors
///
/// Returns every failure found, in field order.
pub fn validate_profile(patch: &UserPatch) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(name) = &patch.name
        && name.trim().is_empty()
    {
        errors.push(FieldError::new("name", "Name cannot be empty"));
    }

    if let Some(email) = &patch.email
        && !is_valid_email(email)
    {
        errors.push(FieldError::new("email", "Enter a valid email address"));
    }

    if let Some(phone) = &patch.phone
        && !is_valid_phone(phone)
    {
        errors.push(FieldError::new("phone", "Enter a valid phone number"));
    }

    if let Some(address) = &patch.address {
        let zip = address.zip_code.trim();
        if !zip.is_empty() && !is_valid_zip(zip) {
            errors.push(FieldError::new("zipCode", "Enter a valid postal code"));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Intentionally shallow: one `@` with a non-empty local part and a
/// non-empty domain. The backend owns real address verification.
fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && !domain.contains('@')
}

/// Accepts digits with common formatting (`+`, `-`, spaces, parentheses);
/// counts only the digits.
fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    if phone.is_empty() {
        return false;
    }
    let mut digits = 0;
    for c in phone.chars() {
        match c {
            '0'..='9' => digits += 1,
            '+' | '-' | ' ' | '(' | ')' => {}
            _ => return false,
        }
    }
    PHONE_DIGITS.contains(&digits)
}

fn is_valid_zip(zip: &str) -> bool {
    ZIP_LEN.contains(&zip.len())
        && zip
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use copperleaf_core::Address;

    #[test]
    fn empty_patch_is_valid() {
        assert!(validate_profile(&UserPatch::default()).is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let patch = UserPatch {
            name: Some("   ".to_string()),
            ..UserPatch::default()
        };
        let errors = validate_profile(&patch).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn email_requires_local_and_domain() {
        for bad in ["", "no-at-sign", "@example.com", "user@", "a@b@c"] {
            let patch = UserPatch {
                email: Some(bad.to_string()),
                ..UserPatch::default()
            };
            assert!(validate_profile(&patch).is_err(), "accepted {bad:?}");
        }
        let patch = UserPatch {
            email: Some("ada@example.com".to_string()),
            ..UserPatch::default()
        };
        assert!(validate_profile(&patch).is_ok());
    }

    #[test]
    fn phone_counts_digits_and_allows_formatting() {
        let ok = UserPatch {
            phone: Some("+1 (555) 123-4567".to_string()),
            ..UserPatch::default()
        };
        assert!(validate_profile(&ok).is_ok());

        let too_short = UserPatch {
            phone: Some("12345".to_string()),
            ..UserPatch::default()
        };
        assert!(validate_profile(&too_short).is_err());

        let letters = UserPatch {
            phone: Some("555-CALL-NOW".to_string()),
            ..UserPatch::default()
        };
        assert!(validate_profile(&letters).is_err());
    }

    #[test]
    fn multiple_failures_are_all_reported() {
        let patch = UserPatch {
            name: Some(String::new()),
            email: Some("nope".to_string()),
            phone: Some("123".to_string()),
            ..UserPatch::default()
        };
        let errors = validate_profile(&patch).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "phone"]);
    }

    #[test]
    fn empty_zip_means_not_provided() {
        let patch = UserPatch {
            address: Some(Address {
                zip_code: String::new(),
                ..Address::default()
            }),
            ..UserPatch::default()
        };
        assert!(validate_profile(&patch).is_ok());

        let bad = UserPatch {
            address: Some(Address {
                zip_code: "!!".to_string(),
                ..Address::default()
            }),
            ..UserPatch::default()
        };
        assert!(validate_profile(&bad).is_err());
    }
}
