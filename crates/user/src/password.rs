use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use validator::ValidationErrors;

pub const MIN_LENGTH: usize = 8;
const MAX_SIMILARITY: f64 = 0.7;

static COMMON_PASSWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    include_str!("common-passwords.txt")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
});

/// Account values a password may not resemble.
#[derive(Default, Clone, Copy)]
pub struct UserAttributes<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

impl<'a> UserAttributes<'a> {
    fn named(&self) -> [(&'static str, &'a str); 4] {
        [
            ("username", self.username),
            ("first name", self.first_name),
            ("last name", self.last_name),
            ("email address", self.email),
        ]
    }
}

pub fn hash(password: &str) -> nikjin_shared::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify(password: &str, hash: &str) -> nikjin_shared::Result<bool> {
    let parsed_hash = PasswordHash::new(hash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Twice the shared characters over the total length, ignoring order.
fn quick_ratio(a: &str, b: &str) -> f64 {
    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }

    let mut matches = 0;
    for c in a.chars() {
        if let Some(count) = available.get_mut(&c) {
            if *count > 0 {
                *count -= 1;
                matches += 1;
            }
        }
    }

    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    2.0 * matches as f64 / total as f64
}

/// Short values can not be compared against much longer passwords.
fn exceeds_length_ratio(password_len: usize, value_len: usize) -> bool {
    password_len >= 10 * value_len && (value_len as f64) < MAX_SIMILARITY / 2.0 * password_len as f64
}

/// Name of the first attribute the password resembles, comparing against the
/// whole value and each of its word-separated parts.
fn similar_attribute(password: &str, attributes: &UserAttributes<'_>) -> Option<&'static str> {
    let password = password.to_lowercase();
    let password_len = password.chars().count();

    attributes.named().into_iter().find_map(|(name, value)| {
        let value = value.trim().to_lowercase();
        if value.is_empty() {
            return None;
        }

        value
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|part| !part.is_empty())
            .chain([value.as_str()])
            .filter(|part| !exceeds_length_ratio(password_len, part.chars().count()))
            .any(|part| quick_ratio(&password, part) >= MAX_SIMILARITY)
            .then_some(name)
    })
}

/// Password strength rules applied on registration, reported against `field`.
pub fn check_strength(
    errors: &mut ValidationErrors,
    field: &'static str,
    password: &str,
    attributes: &UserAttributes<'_>,
) {
    if let Some(name) = similar_attribute(password, attributes) {
        nikjin_shared::add_field_error(
            errors,
            field,
            "password_too_similar",
            format!("The password is too similar to the {name}."),
        );
    }

    if password.chars().count() < MIN_LENGTH {
        nikjin_shared::add_field_error(
            errors,
            field,
            "password_too_short",
            format!(
                "This password is too short. It must contain at least {MIN_LENGTH} characters."
            ),
        );
    }

    if COMMON_PASSWORDS.contains(password.trim().to_lowercase().as_str()) {
        nikjin_shared::add_field_error(
            errors,
            field,
            "password_too_common",
            "This password is too common.",
        );
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        nikjin_shared::add_field_error(
            errors,
            field,
            "password_entirely_numeric",
            "This password is entirely numeric.",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(password: &str, attributes: UserAttributes<'_>) -> Vec<String> {
        let mut errors = ValidationErrors::new();
        check_strength(&mut errors, "password", password, &attributes);

        errors
            .field_errors()
            .into_values()
            .flat_map(|errs| errs.iter().filter_map(|e| e.message.as_ref().map(|m| m.to_string())))
            .collect()
    }

    fn username(username: &str) -> UserAttributes<'_> {
        UserAttributes {
            username,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_reasonable_password() {
        let john = UserAttributes {
            username: "john",
            first_name: "John",
            last_name: "Doe",
            email: "john@example.com",
        };
        assert!(messages("correct-horse-battery", john).is_empty());
        assert!(messages("s3cure-passphrase", john).is_empty());
    }

    #[test]
    fn rejects_weak_passwords() {
        assert_eq!(
            messages("9081726", username("john")),
            vec![
                "This password is too short. It must contain at least 8 characters.",
                "This password is entirely numeric.",
            ]
        );
        assert_eq!(messages("Password123", username("john")), vec!["This password is too common."]);
        assert_eq!(messages("letmein2023", username("john")), vec!["This password is too common."]);
        assert_eq!(
            messages("johnsmith", username("JohnSmith")),
            vec!["The password is too similar to the username."]
        );
    }

    #[test]
    fn rejects_passwords_similar_to_any_attribute() {
        assert_eq!(
            messages("johnsmith1", username("john_smith")),
            vec!["The password is too similar to the username."]
        );
        assert_eq!(
            messages(
                "smithers1",
                UserAttributes {
                    username: "jdoe",
                    first_name: "John",
                    last_name: "Smithers",
                    email: "",
                }
            ),
            vec!["The password is too similar to the last name."]
        );
        assert_eq!(
            messages(
                "jdoe@corp.io",
                UserAttributes {
                    username: "x",
                    email: "jdoe@corp.io",
                    ..Default::default()
                }
            ),
            vec!["The password is too similar to the email address."]
        );
    }

    #[test]
    fn test_quick_ratio() {
        assert_eq!(quick_ratio("abcd", "abcd"), 1.0);
        assert_eq!(quick_ratio("abcd", "dcba"), 1.0);
        assert_eq!(quick_ratio("abcd", "wxyz"), 0.0);
        assert_eq!(quick_ratio("", ""), 1.0);
    }

    #[test]
    fn common_list_is_loaded() {
        assert!(COMMON_PASSWORDS.len() > 1000);
        assert!(COMMON_PASSWORDS.contains("qwerty123"));
    }

    #[test]
    fn hash_and_verify() -> nikjin_shared::Result<()> {
        let hashed = hash("s3cret-pass")?;
        assert!(verify("s3cret-pass", &hashed)?);
        assert!(!verify("other-pass", &hashed)?);

        Ok(())
    }
}
