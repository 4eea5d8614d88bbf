use crate::utils::error::{DeployError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Longest parameter name Parameter Store accepts.
pub const MAX_PARAMETER_PATH_LEN: usize = 2048;
/// ELBv2 limit on target group names.
pub const MAX_TARGET_GROUP_NAME_LEN: usize = 32;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
}

fn parameter_path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(/[A-Za-z0-9_.\-]+)+$").expect("valid regex"))
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DeployError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_list(field_name: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(DeployError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    for value in values {
        validate_non_empty_string(field_name, value)?;
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_numeric_string(field_name: &str, value: &str) -> Result<()> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a whole number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_env_var_name(field_name: &str, name: &str) -> Result<()> {
    if !env_var_pattern().is_match(name) {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Not a valid environment variable name".to_string(),
        });
    }
    Ok(())
}

pub fn validate_parameter_path(field_name: &str, path: &str) -> Result<()> {
    if path.len() > MAX_PARAMETER_PATH_LEN {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: format!(
                "Parameter path is longer than {} characters",
                MAX_PARAMETER_PATH_LEN
            ),
        });
    }

    if !parameter_path_pattern().is_match(path) {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Parameter path must start with '/' and contain only non-empty segments of letters, digits, '_', '.' or '-'".to_string(),
        });
    }

    Ok(())
}

pub fn validate_target_group_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;

    if name.len() > MAX_TARGET_GROUP_NAME_LEN {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: format!(
                "Target group name must be at most {} characters",
                MAX_TARGET_GROUP_NAME_LEN
            ),
        });
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Target group name can only contain letters, digits and hyphens".to_string(),
        });
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Target group name cannot start or end with a hyphen".to_string(),
        });
    }

    Ok(())
}

pub fn validate_unique<'a>(field_name: &str, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(DeployError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.to_string(),
                reason: "Duplicate entry".to_string(),
            });
        }
    }
    Ok(())
}
