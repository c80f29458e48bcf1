//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::{i18n::supported_language, state::sequence::Color};

/// Validates that a pad identifier names a color (`red`, `Blue`, ...) or its key (`1`-`4`).
///
/// # Examples
///
/// ```ignore
/// validate_color("green") // Ok
/// validate_color("3")     // Ok
/// validate_color("pink")  // Err
/// ```
pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    if color.trim().is_empty() {
        let mut err = ValidationError::new("color_empty");
        err.message = Some("Color must not be empty".into());
        return Err(err);
    }

    if color.parse::<Color>().is_err() {
        let mut err = ValidationError::new("color_unknown");
        err.message = Some(
            format!("Unknown color `{color}` (expected red, blue, green, yellow or 1-4)").into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that a language code or locale maps onto a supported language.
pub fn validate_language(language: &str) -> Result<(), ValidationError> {
    if language.trim().is_empty() {
        let mut err = ValidationError::new("language_empty");
        err.message = Some("Language must not be empty".into());
        return Err(err);
    }

    if supported_language(language).is_none() {
        let mut err = ValidationError::new("language_unsupported");
        err.message = Some(format!("Unsupported language `{language}`").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_color_valid() {
        assert!(validate_color("red").is_ok());
        assert!(validate_color("YELLOW").is_ok());
        assert!(validate_color("4").is_ok());
    }

    #[test]
    fn test_validate_color_invalid() {
        assert!(validate_color("").is_err());
        assert!(validate_color("   ").is_err());
        assert!(validate_color("pink").is_err());
        assert!(validate_color("5").is_err());
    }

    #[test]
    fn test_validate_color_error_codes() {
        assert_eq!(validate_color("").unwrap_err().code, "color_empty");
        assert_eq!(validate_color("pink").unwrap_err().code, "color_unknown");
    }

    #[test]
    fn test_validate_language() {
        assert!(validate_language("ko").is_ok());
        assert!(validate_language("pt-BR").is_ok());
        assert_eq!(validate_language(" ").unwrap_err().code, "language_empty");
        assert_eq!(
            validate_language("tlh").unwrap_err().code,
            "language_unsupported"
        );
    }
}
