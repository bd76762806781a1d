//! User record normalization, including the `is_admin` derivation.

use serde_json::{Map, Value};

use copperleaf_core::{User, UserId};

use super::{bool_field, string_field, unwrap_record, ShapeError};
use crate::normalize::orders::normalize_address;

const ENVELOPE_KEYS: &[&str] = &["user", "profile", "data"];

const ID_KEYS: &[&str] = &["id", "_id", "userId"];
const NAME_KEYS: &[&str] = &["name", "fullName", "userName"];
const FIRST_NAME_KEYS: &[&str] = &["firstName", "first_name"];
const LAST_NAME_KEYS: &[&str] = &["lastName", "last_name"];
const EMAIL_KEYS: &[&str] = &["email", "emailAddress"];
const PHONE_KEYS: &[&str] = &["phone", "phoneNumber", "mobile"];
const ROLE_KEYS: &[&str] = &["role", "userRole"];
const ADMIN_FLAG_KEYS: &[&str] = &["isAdmin", "is_admin", "admin"];

/// Keys whose presence marks an object as a plausible user record. An
/// object with none of these (say, an error body) is a shape mismatch, not
/// a user with all defaults.
const RECOGNITION_KEYS: &[&str] = &[
    "id", "_id", "userId", "name", "firstName", "email", "role", "isAdmin",
];

/// Normalize a profile payload into a canonical [`User`].
///
/// Unlike the list normalizers this can fail: the auth flow needs to
/// distinguish "backend answered with something that is not a user" (fall
/// back to the cached session) from a merely sparse record (fill defaults).
///
/// # Errors
///
/// Returns [`ShapeError`] when the payload is not an object or carries none
/// of the recognized user keys.
pub fn normalize_user(payload: &Value) -> Result<User, ShapeError> {
    let obj = unwrap_record(payload, ENVELOPE_KEYS).ok_or(ShapeError { entity: "user" })?;
    if !RECOGNITION_KEYS.iter().any(|key| obj.contains_key(*key)) {
        return Err(ShapeError { entity: "user" });
    }

    let first_name = string_field(obj, FIRST_NAME_KEYS);
    let last_name = string_field(obj, LAST_NAME_KEYS);
    let email = string_field(obj, EMAIL_KEYS).unwrap_or_default();
    let name = resolve_name(obj, first_name.as_deref(), last_name.as_deref(), &email);

    let role = string_field(obj, ROLE_KEYS).unwrap_or_else(|| "customer".to_string());
    // Derived once here; persisted denormalized by the session cache so a
    // reload does not re-derive admin status from a possibly-changed role.
    let is_admin = bool_field(obj, ADMIN_FLAG_KEYS) || role == "admin";

    Ok(User {
        id: string_field(obj, ID_KEYS).map_or_else(UserId::synthesize, UserId::new),
        name,
        first_name,
        last_name,
        email,
        phone: string_field(obj, PHONE_KEYS).unwrap_or_default(),
        address: normalize_address(obj),
        is_admin,
        role,
    })
}

/// Display name: explicit `name`, else first+last, else the email local
/// part, else a fixed fallback.
fn resolve_name(
    obj: &Map<String, Value>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: &str,
) -> String {
    if let Some(name) = string_field(obj, NAME_KEYS) {
        return name;
    }
    match (first_name, last_name) {
        (Some(first), Some(last)) => return format!("{first} {last}"),
        (Some(first), None) => return first.to_string(),
        _ => {}
    }
    email
        .split('@')
        .next()
        .filter(|local| !local.is_empty())
        .map_or_else(|| "Customer".to_string(), ToString::to_string)
}
