//! Request DTOs for the admin forms
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Role ids are platform snowflakes: ASCII digits only
#[allow(clippy::ptr_arg)]
fn validate_role_ids(ids: &Vec<String>) -> Result<(), ValidationError> {
    for id in ids {
        validate_snowflake(id)?;
    }
    Ok(())
}

fn validate_snowflake(id: &str) -> Result<(), ValidationError> {
    let id = id.trim();
    if id.is_empty() || id.len() > 20 || !id.bytes().all(|b| b.is_ascii_digit()) {
        let mut err = ValidationError::new("snowflake");
        err.message = Some(format!("'{id}' is not a valid id").into());
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Role list forms
// ============================================================================

/// Replace the auto-role list
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAutoRolesRequest {
    #[serde(default)]
    #[validate(
        length(max = 25, message = "At most 25 auto-roles"),
        custom(function = "validate_role_ids")
    )]
    pub role_ids: Vec<String>,
}

/// Replace the login-eligible role list
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLoginRolesRequest {
    #[serde(default)]
    #[validate(
        length(max = 50, message = "At most 50 login roles"),
        custom(function = "validate_role_ids")
    )]
    pub role_ids: Vec<String>,
}

// ============================================================================
// Birthday settings form
// ============================================================================

/// Replace the birthday automation settings
///
/// Absent or blank ids clear the value. An absent format restores the default.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBirthdaySettingsRequest {
    #[validate(custom(function = "validate_optional_snowflake"))]
    pub category_id: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Channel format must be 1-100 characters"))]
    pub channel_format: Option<String>,

    #[validate(custom(function = "validate_optional_snowflake"))]
    pub role_id: Option<String>,
}

fn validate_optional_snowflake(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Ok(());
    }
    validate_snowflake(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ids_must_be_numeric() {
        let ok = UpdateAutoRolesRequest {
            role_ids: vec!["123".into(), " 456 ".into()],
        };
        assert!(ok.validate().is_ok());

        let bad = UpdateAutoRolesRequest {
            role_ids: vec!["123".into(), "abc".into()],
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert!(UpdateLoginRolesRequest::default().validate().is_ok());
        let parsed: UpdateLoginRolesRequest = serde_json::from_str("{}").unwrap();
        assert!(parsed.role_ids.is_empty());
    }

    #[test]
    fn test_birthday_settings_validation() {
        let ok = UpdateBirthdaySettingsRequest {
            category_id: Some(String::new()),
            channel_format: Some("bday-{user}".into()),
            role_id: Some("42".into()),
        };
        assert!(ok.validate().is_ok());

        let bad_format = UpdateBirthdaySettingsRequest {
            channel_format: Some(String::new()),
            ..Default::default()
        };
        assert!(bad_format.validate().is_err());

        let bad_id = UpdateBirthdaySettingsRequest {
            role_id: Some("cake".into()),
            ..Default::default()
        };
        assert!(bad_id.validate().is_err());
    }
}
