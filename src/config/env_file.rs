//! Loader for the `env.yml` secret map:
//!
//! ```yaml
//! variables:
//!   DB_PASSWORD: /prod/app/db_password
//! ```

use crate::domain::model::{SecretEntry, SecretMapping};
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{
    validate_env_var_name, validate_parameter_path, validate_required_field, validate_unique,
};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct EnvFile {
    variables: Option<Mapping>,
}

pub fn load_secret_mapping<P: AsRef<Path>>(path: P) -> Result<SecretMapping> {
    let content = std::fs::read_to_string(&path)?;
    parse_secret_mapping(&content)
}

pub fn parse_secret_mapping(content: &str) -> Result<SecretMapping> {
    let file: EnvFile = serde_yaml::from_str(content)
        .map_err(|e| DeployError::config(format!("Malformed secret mapping file: {}", e)))?;

    let variables = validate_required_field("variables", &file.variables)?;

    let mut entries = Vec::with_capacity(variables.len());
    for (key, value) in variables {
        let variable = scalar_string("variables", key)?;
        let field = format!("variables.{}", variable);
        let path = scalar_string(&field, value)?;

        validate_env_var_name("variables", &variable)?;
        validate_parameter_path(&field, &path)?;

        entries.push(SecretEntry { variable, path });
    }

    validate_unique("variables", entries.iter().map(|e| e.variable.as_str()))?;

    Ok(SecretMapping::new(entries))
}

fn scalar_string(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Err(DeployError::MissingConfigError {
            field: field.to_string(),
        }),
        other => Err(DeployError::InvalidConfigValueError {
            field: field.to_string(),
            value: format!("{:?}", other),
            reason: "Expected a string".to_string(),
        }),
    }
}
