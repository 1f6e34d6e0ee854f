//! Input validation for registration payloads.

use regex::Regex;

use crate::errors::{UserError, UserResult};

const MAX_EMAIL_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_NAME_LEN: usize = 50;

/// Validate email format and length.
pub fn validate_email(email: &str) -> UserResult<()> {
    // The regex is static and known-good; a compile failure is a programmer
    // error surfaced in tests, not a runtime condition.
    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .map_err(|_| UserError::validation("invalid email regex"))?;

    if email.len() > MAX_EMAIL_LEN {
        return Err(UserError::validation("email too long"));
    }
    if !email_regex.is_match(email) {
        return Err(UserError::validation("invalid email format"));
    }

    Ok(())
}

/// Validate password length bounds.
pub fn validate_password(password: &str) -> UserResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(UserError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(UserError::validation(format!(
            "password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }

    Ok(())
}

/// Validate a display name: non-empty after trimming, bounded, no control
/// characters.
pub fn validate_name(name: &str) -> UserResult<()> {
    if name.trim().is_empty() {
        return Err(UserError::validation("name cannot be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(UserError::validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(UserError::validation("name contains invalid characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name+tag@domain.co.uk").is_ok());

        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("test@").is_err());
        assert!(validate_email(&format!("{}@example.com", "a".repeat(250))).is_err());
    }

    #[test]
    fn password_validation() {
        assert!(validate_password("longenough").is_ok());

        assert!(validate_password("short").is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("Alice Example").is_ok());
        assert!(validate_name("用户名").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("line\nbreak").is_err());
        assert!(validate_name(&"a".repeat(51)).is_err());
    }
}
