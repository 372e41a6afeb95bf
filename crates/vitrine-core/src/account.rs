//! # Account Forms
//!
//! Login and registration forms and the password strength meter.
//!
//! There is no identity provider behind these forms. They are validated
//! here and then handed to the simulated backend.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{validate_email, validate_required, ValidationResult};

// =============================================================================
// Password Strength
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    Weak,
    Fair,
    Good,
    Strong,
}

/// Strength meter reading. One point each for: at least 8 characters, an
/// uppercase letter, a digit, a non-alphanumeric character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PasswordStrength {
    /// 0 - 4
    pub score: u8,
    pub label: StrengthLabel,
}

impl PasswordStrength {
    pub fn of(password: &str) -> Self {
        let checks = [
            password.chars().count() >= 8,
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ];
        let score = checks.iter().filter(|&&passed| passed).count() as u8;

        let label = match score {
            0 | 1 => StrengthLabel::Weak,
            2 => StrengthLabel::Fair,
            3 => StrengthLabel::Good,
            _ => StrengthLabel::Strong,
        };

        Self { score, label }
    }
}

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

impl LoginForm {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub accept_terms: bool,
}

impl RegistrationForm {
    /// Terms are checked first: an unticked box blocks submission outright.
    pub fn validate(&self) -> ValidationResult<()> {
        if !self.accept_terms {
            return Err(ValidationError::NotAccepted {
                field: "acceptTerms".to_string(),
            });
        }

        validate_required("firstName", &self.first_name)?;
        validate_required("lastName", &self.last_name)?;
        validate_email(&self.email)?;

        if self.password.is_empty() {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            });
        }

        if self.password != self.confirm_password {
            return Err(ValidationError::Mismatch {
                field: "confirmPassword".to_string(),
                other: "password".to_string(),
            });
        }

        Ok(())
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegistrationForm {
        RegistrationForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "Engine#1843".to_string(),
            confirm_password: "Engine#1843".to_string(),
            accept_terms: true,
        }
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(PasswordStrength::of("").score, 0);
        assert_eq!(PasswordStrength::of("abc").label, StrengthLabel::Weak);
        assert_eq!(PasswordStrength::of("abcdefgh").score, 1);
        assert_eq!(PasswordStrength::of("Abcdefgh").label, StrengthLabel::Fair);
        assert_eq!(PasswordStrength::of("Abcdefg1").label, StrengthLabel::Good);

        let strong = PasswordStrength::of("Abcdef1!");
        assert_eq!(strong.score, 4);
        assert_eq!(strong.label, StrengthLabel::Strong);
    }

    #[test]
    fn test_login_requires_email_and_password() {
        let mut form = LoginForm {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            remember_me: false,
        };
        assert!(form.validate().is_ok());

        form.password.clear();
        assert_eq!(form.validate().unwrap_err().field(), "password");

        form.email = "ada".to_string();
        assert_eq!(form.validate().unwrap_err().field(), "email");
    }

    #[test]
    fn test_registration_validation() {
        assert!(registration().validate().is_ok());

        let mut form = registration();
        form.accept_terms = false;
        assert!(matches!(form.validate(), Err(ValidationError::NotAccepted { .. })));

        let mut form = registration();
        form.confirm_password = "engine#1843".to_string();
        assert!(matches!(form.validate(), Err(ValidationError::Mismatch { .. })));

        let mut form = registration();
        form.last_name = String::new();
        assert_eq!(form.validate().unwrap_err().field(), "lastName");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(registration().display_name(), "Ada Lovelace");
    }
}
