use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Longest accepted address, in characters.
pub const MAX_EMAIL_LEN: usize = 125;

/// Field-level failure of the email input. Messages are shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email address is required :)")]
    Required,
    #[error("Invalid email address")]
    InvalidAddress,
    #[error("Email format is invalid")]
    InvalidFormat,
    #[error("Your Email is too long, shorten it :D")]
    TooLong,
}

// Common-case shape: dotted local part, dotted domain, alphabetic TLD.
static BASIC_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@(?:[A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("static email pattern")
});

// RFC 5322 addr-spec, including quoted local parts and address literals.
static RFC_5322_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r##"(?i-u)^(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*"##,
        r##"|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")"##,
        r##"@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?"##,
        r##"|\[(?:(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9]))\.){3}"##,
        r##"(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9])"##,
        r##"|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$"##,
    ))
    .expect("static email pattern")
});

fn has_basic_shape(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && BASIC_EMAIL.is_match(email)
}

/// Checks `email` against each rule in order; the first failure wins.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Required);
    }
    if !has_basic_shape(email) {
        return Err(ValidationError::InvalidAddress);
    }
    if !RFC_5322_EMAIL.is_match(email) {
        return Err(ValidationError::InvalidFormat);
    }
    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        for email in ["fan@example.com", "first.last+tag@mail.example.co.uk", "O'Neil@EXAMPLE.org"] {
            assert_eq!(validate_email(email), Ok(()), "{email}");
        }
    }

    #[test]
    fn test_rules_apply_in_order() {
        assert_eq!(validate_email(""), Err(ValidationError::Required));
        assert_eq!(validate_email("not-an-email"), Err(ValidationError::InvalidAddress));
        assert_eq!(validate_email(".fan@example.com"), Err(ValidationError::InvalidAddress));
        assert_eq!(validate_email("fan..club@example.com"), Err(ValidationError::InvalidAddress));
        assert_eq!(validate_email("fan@example.c"), Err(ValidationError::InvalidAddress));

        let long = format!("{}@example.com", "a".repeat(120));
        assert_eq!(validate_email(&long), Err(ValidationError::TooLong));
    }

    #[test]
    fn test_domain_labels() {
        assert_eq!(validate_email("fan.@example.com"), Err(ValidationError::InvalidAddress));
        assert_eq!(validate_email("fan-@example.com"), Ok(()));
        assert_eq!(validate_email("fan@-example.com"), Err(ValidationError::InvalidAddress));
        assert_eq!(validate_email("fan@example-.com"), Err(ValidationError::InvalidFormat));
    }

    #[test]
    fn test_case_folding_stays_ascii() {
        // KELVIN SIGN and LATIN SMALL LETTER LONG S fold to 'k' and 's' under Unicode rules.
        assert_eq!(validate_email("fan@example.co\u{212A}"), Err(ValidationError::InvalidAddress));
        assert_eq!(validate_email("\u{17F}an@example.com"), Err(ValidationError::InvalidAddress));
    }

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(ValidationError::Required.to_string(), "Email address is required :)");
        assert_eq!(ValidationError::TooLong.to_string(), "Your Email is too long, shorten it :D");
    }
}
