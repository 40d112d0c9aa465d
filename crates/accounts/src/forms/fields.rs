//! Field cleaning shared by the account forms.

use unicode_normalization::UnicodeNormalization;

use super::FormErrors;

/// Longest email accepted by any form.
pub const EMAIL_MAX_LENGTH: usize = 254;

pub(super) const REQUIRED: &str = "This field is required.";
const INVALID_EMAIL: &str = "Enter a valid email address.";

/// Canonical form of an email: trimmed, NFKC normalized, domain lowercased.
///
/// The local part keeps its case.
pub fn normalize_email(raw: &str) -> String {
    let normalized: String = raw.trim().nfkc().collect();
    match normalized.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => normalized,
    }
}

/// Clean an email field, recording errors under `field`.
pub(super) fn clean_email(
    raw: Option<&str>,
    field: &str,
    max_length: usize,
    errors: &mut FormErrors,
) -> Option<String> {
    let value = raw.map(normalize_email).filter(|v| !v.is_empty());
    let Some(value) = value else {
        errors.add(field, REQUIRED);
        return None;
    };

    let length = value.chars().count();
    if length > max_length {
        errors.add(
            field,
            format!("Ensure this value has at most {max_length} characters (it has {length})."),
        );
        return None;
    }
    if !is_valid_email(&value) {
        errors.add(field, INVALID_EMAIL);
        return None;
    }
    Some(value)
}

/// Clean a password field as submitted. Surrounding whitespace is part of
/// the password, so only a missing or empty value is an error.
pub(super) fn clean_password(
    raw: Option<&str>,
    field: &str,
    errors: &mut FormErrors,
) -> Option<String> {
    match raw {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => {
            errors.add(field, REQUIRED);
            None
        }
    }
}

/// Clean a plain text password field: surrounding whitespace is stripped
/// before the required check.
pub(super) fn clean_stripped_password(
    raw: Option<&str>,
    field: &str,
    errors: &mut FormErrors,
) -> Option<String> {
    clean_password(raw.map(str::trim), field, errors)
}

fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || local.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    if !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_domain_only() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "Jane.Doe@example.com");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn normalize_applies_nfkc() {
        // Fullwidth letters fold to ASCII.
        assert_eq!(normalize_email("ｊａｎｅ@example.com"), "jane@example.com");
    }

    #[test]
    fn valid_and_invalid_addresses() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("user@-example.com"));
        assert!(!is_valid_email("us er@example.com"));
    }

    #[test]
    fn missing_email_is_required() {
        let mut errors = FormErrors::new();
        assert_eq!(clean_email(None, "email", 254, &mut errors), None);
        assert_eq!(clean_email(Some("   "), "email", 254, &mut errors), None);
        assert_eq!(errors.field("email"), [REQUIRED, REQUIRED]);
    }

    #[test]
    fn long_email_reports_length() {
        let mut errors = FormErrors::new();
        let email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(clean_email(Some(&email), "email", 254, &mut errors), None);
        assert_eq!(
            errors.field("email"),
            ["Ensure this value has at most 254 characters (it has 262)."]
        );
    }

    #[test]
    fn password_keeps_surrounding_whitespace() {
        let mut errors = FormErrors::new();
        assert_eq!(
            clean_password(Some(" secret "), "password1", &mut errors),
            Some(" secret ".to_string())
        );
        assert_eq!(
            clean_password(Some("  "), "password1", &mut errors),
            Some("  ".to_string())
        );
        assert_eq!(clean_password(Some(""), "password1", &mut errors), None);
        assert_eq!(clean_password(None, "password1", &mut errors), None);
        assert_eq!(errors.field("password1"), [REQUIRED, REQUIRED]);
    }

    #[test]
    fn stripped_password_drops_surrounding_whitespace() {
        let mut errors = FormErrors::new();
        assert_eq!(
            clean_stripped_password(Some(" secret "), "password1", &mut errors),
            Some("secret".to_string())
        );
        assert_eq!(
            clean_stripped_password(Some(" \t "), "password1", &mut errors),
            None
        );
        assert_eq!(errors.field("password1"), [REQUIRED]);
    }
}
