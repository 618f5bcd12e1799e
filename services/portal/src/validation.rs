//! Input checks the portal forms run before calling the identity store
//!
//! The identity store itself accepts any input; these helpers reject empty
//! or malformed form fields early with a message fit for display.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a form submission was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Username and email are required")]
    ProfileFieldsRequired,

    #[error("All password fields are required")]
    PasswordFieldsRequired,

    #[error("Email must be at most 254 characters long")]
    EmailTooLong,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("New passwords do not match")]
    PasswordMismatch,

    #[error("You must agree to the Terms and Conditions")]
    TermsNotAccepted,
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Required("Email"));
    }

    if email.len() > 254 {
        return Err(ValidationError::EmailTooLong);
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate the registration form
pub fn validate_registration(
    email: &str,
    username: &str,
    password: &str,
    confirm_password: &str,
    terms_accepted: bool,
) -> Result<(), ValidationError> {
    validate_email(email)?;

    if username.trim().is_empty() {
        return Err(ValidationError::Required("Username"));
    }

    if password.is_empty() {
        return Err(ValidationError::Required("Password"));
    }

    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    if !terms_accepted {
        return Err(ValidationError::TermsNotAccepted);
    }

    Ok(())
}

/// Validate the personal-information form
pub fn validate_profile_update(username: &str, email: &str) -> Result<(), ValidationError> {
    if username.is_empty() || email.is_empty() {
        return Err(ValidationError::ProfileFieldsRequired);
    }
    Ok(())
}

/// Validate the change-password form
pub fn validate_password_change(
    current_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    if current_password.is_empty() || new_password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::PasswordFieldsRequired);
    }

    if new_password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}

/// Validate the platform-side username typed into the link dialog
pub fn validate_platform_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::Required("Platform username"));
    }
    Ok(())
}
