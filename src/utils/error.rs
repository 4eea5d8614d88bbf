use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Secret for {variable} could not be resolved at '{path}': {reason}")]
    SecretResolutionError {
        variable: String,
        path: String,
        reason: String,
    },

    #[error("{operation} failed ({code}): {message}")]
    InfrastructureError {
        operation: String,
        code: String,
        message: String,
    },
}

/// The three failure classes a deployment run can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    SecretResolution,
    Infrastructure,
}

impl ErrorKind {
    /// Process exit code for the invoking pipeline. Always non-zero.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Infrastructure => 1,
            ErrorKind::Config => 2,
            ErrorKind::SecretResolution => 3,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Config => "ConfigError",
            ErrorKind::SecretResolution => "SecretResolutionError",
            ErrorKind::Infrastructure => "InfrastructureError",
        };
        f.write_str(name)
    }
}

impl DeployError {
    pub fn config(message: impl Into<String>) -> Self {
        DeployError::ConfigError {
            message: message.into(),
        }
    }

    pub fn infrastructure(
        operation: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        DeployError::InfrastructureError {
            operation: operation.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::IoError(_)
            | DeployError::ConfigError { .. }
            | DeployError::MissingConfigError { .. }
            | DeployError::InvalidConfigValueError { .. } => ErrorKind::Config,
            DeployError::SecretResolutionError { .. } => ErrorKind::SecretResolution,
            DeployError::InfrastructureError { .. } => ErrorKind::Infrastructure,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Config => "Fix the deployment configuration or run parameters and rerun",
            ErrorKind::SecretResolution => {
                "Create the missing parameter in SSM Parameter Store and rerun"
            }
            ErrorKind::Infrastructure => {
                "Check the AWS error above; the run is safe to repeat once the cause is fixed"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DeployError::IoError(e) => format!("Could not read configuration: {}", e),
            DeployError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            DeployError::SecretResolutionError { variable, path, .. } => format!(
                "Parameter '{}' (for {}) does not exist in Parameter Store",
                path, variable
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
