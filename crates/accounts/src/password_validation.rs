//! Strength checks applied to new passwords on the public sign-up and
//! password-change flows.

use serde::{Deserialize, Serialize};

/// Lowercased passwords rejected as too common.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "passw0rd",
    "123456789",
    "12345678",
    "1234567890",
    "qwertyuiop",
    "qwerty123",
    "1q2w3e4r",
    "1qaz2wsx",
    "abc12345",
    "abcd1234",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "welcome1",
    "letmein1",
    "trustno1",
    "superman",
    "dragon123",
    "monkey123",
    "whatever",
    "changeme",
    "administrator",
    "starwars",
    "computer",
    "internet",
];

/// Shortest email local part considered when checking similarity.
const MIN_SIMILARITY_PART: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    /// Describe the rules a new password has to follow.
    pub fn help_texts(&self) -> Vec<String> {
        vec![
            "Your password can't be too similar to your email.".to_string(),
            format!(
                "Your password must contain at least {} characters.",
                self.min_length
            ),
            "Your password can't be a commonly used password.".to_string(),
            "Your password can't be entirely numeric.".to_string(),
        ]
    }

    /// Return every rule the password breaks, in a stable order.
    ///
    /// `email` is the address the password belongs to, when known.
    pub fn validate(&self, password: &str, email: Option<&str>) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(email) = email
            && too_similar(password, email)
        {
            errors.push("The password is too similar to the email.".to_string());
        }
        if password.chars().count() < self.min_length {
            errors.push(format!(
                "This password is too short. It must contain at least {} characters.",
                self.min_length
            ));
        }
        if COMMON_PASSWORDS.contains(&password.trim().to_lowercase().as_str()) {
            errors.push("This password is too common.".to_string());
        }
        if !password.is_empty() && password.chars().all(char::is_numeric) {
            errors.push("This password is entirely numeric.".to_string());
        }

        errors
    }
}

fn too_similar(password: &str, email: &str) -> bool {
    if password.is_empty() {
        return false;
    }
    let password = password.to_lowercase();
    let email = email.to_lowercase();
    if password == email {
        return true;
    }
    let local = email.split('@').next().unwrap_or_default();
    local
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| part.chars().count() >= MIN_SIMILARITY_PART)
        .any(|part| password.contains(part) || part.contains(password.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_texts_follow_min_length() {
        let texts = PasswordPolicy { min_length: 12 }.help_texts();
        assert_eq!(texts.len(), 4);
        assert_eq!(texts[1], "Your password must contain at least 12 characters.");
    }

    #[test]
    fn strong_password_passes() {
        let policy = PasswordPolicy::default();
        assert!(
            policy
                .validate("tangerine-Velvet-42", Some("alice@example.com"))
                .is_empty()
        );
    }

    #[test]
    fn short_password_reports_min_length() {
        let errors = PasswordPolicy { min_length: 10 }.validate("kq8!zpX", None);
        assert_eq!(
            errors,
            ["This password is too short. It must contain at least 10 characters."]
        );
    }

    #[test]
    fn numeric_and_common_are_both_reported() {
        let errors = PasswordPolicy::default().validate("123456789", None);
        assert_eq!(
            errors,
            [
                "This password is too common.",
                "This password is entirely numeric."
            ]
        );
    }

    #[test]
    fn similar_to_email_local_part() {
        let errors =
            PasswordPolicy::default().validate("jane.doe-2024!", Some("jane.doe@example.com"));
        assert_eq!(errors, ["The password is too similar to the email."]);
    }

    #[test]
    fn short_local_parts_are_ignored() {
        let errors = PasswordPolicy::default().validate("xy-Quartz-991", Some("xy@example.com"));
        assert!(errors.is_empty());
    }
}
