// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Registration and profile input checks.
//!
//! Every rule is evaluated and all failures are reported together.

use crate::error::ValidationErrors;

use super::model::{RegisterRequest, UpdateProfileRequest};

const MIN_PASSWORD_LEN: usize = 8;
const NAME_LEN: std::ops::RangeInclusive<usize> = 2..=100;

/// Returns `true` for `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Returns `true` if the trimmed name is 2 to 100 characters long.
pub fn is_valid_name(name: &str) -> bool {
    NAME_LEN.contains(&name.trim().chars().count())
}

/// Adds one error per unmet password rule.
pub fn check_password(password: &str, errors: &mut ValidationErrors) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", "Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.add("password", "Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.add("password", "Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.add("password", "Password must contain at least one number");
    }
}

/// Validates a registration request.
pub fn validate_registration(request: &RegisterRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if !is_valid_email(&request.email) {
        errors.add("email", "Invalid email format");
    }
    check_password(&request.password, &mut errors);
    if !is_valid_name(&request.first_name) {
        errors.add("firstName", "First name must be between 2 and 100 characters");
    }
    if !is_valid_name(&request.last_name) {
        errors.add("lastName", "Last name must be between 2 and 100 characters");
    }

    errors.into_result(())
}

/// Validates the fields present in a profile update.
pub fn validate_profile_update(request: &UpdateProfileRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if request.first_name.as_deref().is_some_and(|n| !is_valid_name(n)) {
        errors.add("firstName", "First name must be between 2 and 100 characters");
    }
    if request.last_name.as_deref().is_some_and(|n| !is_valid_name(n)) {
        errors.add("lastName", "Last name must be between 2 and 100 characters");
    }

    errors.into_result(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str, first: &str, last: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada@.com"));
        assert!(!is_valid_email("ada@example."));
    }

    #[test]
    fn test_name_length() {
        assert!(is_valid_name("Al"));
        assert!(is_valid_name("  Bo  "));
        assert!(!is_valid_name(" A "));
        assert!(!is_valid_name(&"x".repeat(101)));
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&request("ada@example.com", "Secret123", "Ada", "Lovelace")).is_ok());
    }

    #[test]
    fn test_all_errors_collected() {
        let errors = validate_registration(&request("bad", "short", "A", "")).unwrap_err();

        let messages: Vec<_> = errors.fields.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Invalid email format",
                "Password must be at least 8 characters long",
                "Password must contain at least one uppercase letter",
                "Password must contain at least one number",
                "First name must be between 2 and 100 characters",
                "Last name must be between 2 and 100 characters",
            ]
        );
    }

    #[test]
    fn test_profile_update_checks_present_fields_only() {
        let ok = UpdateProfileRequest {
            first_name: Some("Grace".to_string()),
            last_name: None,
        };
        assert!(validate_profile_update(&ok).is_ok());

        let bad = UpdateProfileRequest {
            first_name: None,
            last_name: Some("H".to_string()),
        };
        assert_eq!(validate_profile_update(&bad).unwrap_err().len(), 1);
    }
}
