//! Registration input validation.
//!
//! Built once at startup and handed to the registrar; there is no global
//! validator state.

use regex::Regex;

use common::{AppError, AppResult};
use domain::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

use crate::service::Registration;

const NAME_PATTERN: &str = r"^[\p{L}][\p{L}\p{M}'\-\s]*$";
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$";

/// Validates registration input before any work is done.
#[derive(Debug, Clone)]
pub struct RegistrationValidator {
    name: Regex,
    email: Regex,
}

impl RegistrationValidator {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            name: compile(NAME_PATTERN)?,
            email: compile(EMAIL_PATTERN)?,
        })
    }

    /// Check every field; all violations are reported together.
    pub fn validate(&self, input: &Registration) -> AppResult<()> {
        let mut errors = Vec::new();

        self.check_name("first_name", &input.first_name, &mut errors);
        self.check_name("last_name", &input.last_name, &mut errors);

        let country = input.country.trim();
        if country.is_empty() {
            errors.push("country is required".to_string());
        } else if country.chars().count() > MAX_NAME_LENGTH {
            errors.push(format!("country must be at most {} characters", MAX_NAME_LENGTH));
        }

        let email = input.email.trim();
        if email.is_empty() {
            errors.push("email is required".to_string());
        } else if email.chars().count() > MAX_EMAIL_LENGTH {
            errors.push(format!("email must be at most {} characters", MAX_EMAIL_LENGTH));
        } else if !self.email.is_match(email) {
            errors.push("email is not a valid address".to_string());
        }

        if let Err(msg) = check_password(&input.password) {
            errors.push(msg);
        }
        if input.password != input.password_confirmation {
            errors.push("password_confirmation must match password".to_string());
        }

        if let Some(username) = &input.username {
            let len = username.trim().chars().count();
            if len > MAX_NAME_LENGTH {
                errors.push(format!("username must be at most {} characters", MAX_NAME_LENGTH));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(errors.join("; ")))
        }
    }

    fn check_name(&self, field: &str, value: &str, errors: &mut Vec<String>) {
        let value = value.trim();
        if value.is_empty() {
            errors.push(format!("{} is required", field));
        } else if value.chars().count() > MAX_NAME_LENGTH {
            errors.push(format!("{} must be at most {} characters", field, MAX_NAME_LENGTH));
        } else if !self.name.is_match(value) {
            errors.push(format!("{} contains invalid characters", field));
        }
    }
}

fn compile(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern).map_err(|e| AppError::internal(format!("invalid pattern: {e}")))
}

/// Password policy: length bounds plus lower, upper, digit and symbol.
fn check_password(password: &str) -> Result<(), String> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(format!(
            "password must be between {} and {} characters",
            MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
        ));
    }

    let (mut lower, mut upper, mut digit, mut special) = (false, false, false, false);
    for c in password.chars() {
        if c.is_lowercase() {
            lower = true;
        } else if c.is_uppercase() {
            upper = true;
        } else if c.is_numeric() {
            digit = true;
        } else if !c.is_alphanumeric() && !c.is_whitespace() {
            special = true;
        }
    }

    if lower && upper && digit && special {
        Ok(())
    } else {
        Err("password must contain lower-case, upper-case, digit and symbol characters"
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Registration {
        Registration {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            country: "New Zealand".to_string(),
            email: "ann@example.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            password_confirmation: "Str0ng!Pass".to_string(),
            username: None,
        }
    }

    fn message(result: AppResult<()>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_registration() {
        let validator = RegistrationValidator::new().unwrap();
        assert!(validator.validate(&valid()).is_ok());
    }

    #[test]
    fn test_unicode_names_accepted() {
        let validator = RegistrationValidator::new().unwrap();
        let input = Registration {
            first_name: "Zoë".to_string(),
            last_name: "O'Brien-Núñez".to_string(),
            ..valid()
        };
        assert!(validator.validate(&input).is_ok());
    }

    #[test]
    fn test_name_must_start_with_letter() {
        let validator = RegistrationValidator::new().unwrap();
        let input = Registration {
            first_name: "-Ann".to_string(),
            ..valid()
        };
        assert!(message(validator.validate(&input)).contains("first_name"));
    }

    #[test]
    fn test_weak_password_rejected() {
        let validator = RegistrationValidator::new().unwrap();
        let input = Registration {
            password: "alllowercase1!".to_string(),
            password_confirmation: "alllowercase1!".to_string(),
            ..valid()
        };
        assert!(message(validator.validate(&input)).contains("password"));
    }

    #[test]
    fn test_short_password_rejected() {
        let validator = RegistrationValidator::new().unwrap();
        let input = Registration {
            password: "Aa1!".to_string(),
            password_confirmation: "Aa1!".to_string(),
            ..valid()
        };
        assert!(message(validator.validate(&input)).contains("between 8 and 72"));
    }

    #[test]
    fn test_confirmation_mismatch() {
        let validator = RegistrationValidator::new().unwrap();
        let input = Registration {
            password_confirmation: "Str0ng!Pasz".to_string(),
            ..valid()
        };
        assert!(message(validator.validate(&input)).contains("password_confirmation"));
    }

    #[test]
    fn test_invalid_email() {
        let validator = RegistrationValidator::new().unwrap();
        let input = Registration {
            email: "ann@localhost".to_string(),
            ..valid()
        };
        assert!(message(validator.validate(&input)).contains("email"));
    }

    #[test]
    fn test_missing_country_and_long_username_reported_together() {
        let validator = RegistrationValidator::new().unwrap();
        let input = Registration {
            country: " ".to_string(),
            username: Some("x".repeat(101)),
            ..valid()
        };
        let msg = message(validator.validate(&input));
        assert!(msg.contains("country is required"));
        assert!(msg.contains("username"));
    }
}
