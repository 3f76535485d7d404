//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum accepted email length (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Operator password length bounds.
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Outbound SMS payload bounds.
pub const MAX_SMS_MESSAGE_LENGTH: usize = 1000;
pub const MAX_SMS_RECIPIENT_LENGTH: usize = 50;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"(?i)^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("valid email regex");
}

/// Validates an operator email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Please enter a valid email address".into());
        Err(err)
    }
}

/// Validates an operator password against the configured length bounds.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&password.len()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_length");
        err.message = Some(
            format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )
            .into(),
        );
        Err(err)
    }
}

/// Validates an outbound SMS message body: non-empty after trimming, bounded length.
pub fn validate_sms_message(message: &str) -> Result<(), ValidationError> {
    let trimmed = message.trim();
    if trimmed.is_empty() || message.len() > MAX_SMS_MESSAGE_LENGTH {
        let mut err = ValidationError::new("sms_message");
        err.message = Some(
            format!(
                "Message must be non-empty and under {} characters",
                MAX_SMS_MESSAGE_LENGTH
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Validates an outbound SMS recipient: non-empty after trimming, bounded length.
pub fn validate_sms_recipient(recipient: &str) -> Result<(), ValidationError> {
    let trimmed = recipient.trim();
    if trimmed.is_empty() || recipient.len() > MAX_SMS_RECIPIENT_LENGTH {
        let mut err = ValidationError::new("sms_recipient");
        err.message = Some(
            format!(
                "Recipient must be non-empty and under {} characters",
                MAX_SMS_RECIPIENT_LENGTH
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_accepts_common_addresses() {
        assert!(validate_email("operator@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co").is_ok());
    }

    #[test]
    fn test_validate_email_rejects_malformed() {
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        let long_local = "a".repeat(250);
        assert!(validate_email(&format!("{}@example.com", long_local)).is_err());
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_sms_message_bounds() {
        assert!(validate_sms_message("hello").is_ok());
        assert!(validate_sms_message("   ").is_err());
        assert!(validate_sms_message(&"m".repeat(1001)).is_err());
        assert!(validate_sms_message(&"m".repeat(1000)).is_ok());
    }

    #[test]
    fn test_validate_sms_recipient_bounds() {
        assert!(validate_sms_recipient("+421900123456").is_ok());
        assert!(validate_sms_recipient("").is_err());
        assert!(validate_sms_recipient(&"9".repeat(51)).is_err());
    }
}
