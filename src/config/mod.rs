#[cfg(feature = "cli")]
pub mod cli;
pub mod env_file;
pub mod profile;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use profile::DeployProfile;

use crate::domain::model::{NetworkSettings, SecretMapping, ServiceSpec, TargetGroupSpec};
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONTAINER_PORT: u16 = 8000;
pub const DEFAULT_DESIRED_COUNT: u32 = 1;
pub const DEFAULT_CPU: &str = "256";
pub const DEFAULT_MEMORY: &str = "512";
pub const DEFAULT_EXECUTION_ROLE: &str = "ecsTaskExecutionRole";
pub const DEFAULT_HEALTH_CHECK_PATH: &str = "/";
pub const DEFAULT_HEALTH_CHECK_MATCHER: &str = "200-299";
pub const DEFAULT_LOG_STREAM_PREFIX: &str = "ecs";
const MAX_DESIRED_COUNT: u32 = 1000;

/// Values supplied by the invoking pipeline for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParameters {
    pub image: String,
    pub cluster: String,
    pub project: String,
    /// Defaults to `{project}-service`.
    pub service: Option<String>,
    pub vpc_id: String,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSettings {
    pub cpu: String,
    pub memory: String,
    pub execution_role: String,
    pub task_role: String,
    pub log_group: String,
    pub log_stream_prefix: String,
}

/// Validated desired state for one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub service: ServiceSpec,
    pub target_group: TargetGroupSpec,
    pub secrets: SecretMapping,
    pub task: TaskSettings,
    pub network: NetworkSettings,
}

impl DeploymentConfig {
    /// Reads the secret map and optional profile from disk and builds a
    /// validated configuration.
    pub fn load(
        params: RunParameters,
        env_file: impl AsRef<Path>,
        profile: Option<&Path>,
    ) -> Result<Self> {
        let secrets = env_file::load_secret_mapping(env_file)?;
        let profile = match profile {
            Some(path) => DeployProfile::from_file(path)?,
            None => DeployProfile::default(),
        };
        Self::build(params, secrets, profile)
    }

    pub fn build(
        params: RunParameters,
        secrets: SecretMapping,
        profile: DeployProfile,
    ) -> Result<Self> {
        let project = params.project.trim().to_string();
        let service_name = params
            .service
            .clone()
            .unwrap_or_else(|| format!("{}-service", project));
        let container_port = profile
            .service
            .container_port
            .unwrap_or(DEFAULT_CONTAINER_PORT);

        let service = ServiceSpec {
            project: project.clone(),
            service_name,
            cluster: params.cluster.trim().to_string(),
            image: params.image.trim().to_string(),
            container_port,
            desired_count: profile
                .service
                .desired_count
                .unwrap_or(DEFAULT_DESIRED_COUNT),
        };

        let target_group = TargetGroupSpec {
            name: profile
                .target_group
                .name
                .unwrap_or_else(|| format!("{}-tg", project)),
            vpc_id: params.vpc_id.trim().to_string(),
            port: container_port,
            health_check_path: profile
                .target_group
                .health_check_path
                .unwrap_or_else(|| DEFAULT_HEALTH_CHECK_PATH.to_string()),
            health_check_matcher: profile
                .target_group
                .health_check_matcher
                .unwrap_or_else(|| DEFAULT_HEALTH_CHECK_MATCHER.to_string()),
        };

        let execution_role = profile
            .task
            .execution_role
            .unwrap_or_else(|| DEFAULT_EXECUTION_ROLE.to_string());
        let task = TaskSettings {
            cpu: profile.task.cpu.unwrap_or_else(|| DEFAULT_CPU.to_string()),
            memory: profile
                .task
                .memory
                .unwrap_or_else(|| DEFAULT_MEMORY.to_string()),
            task_role: profile
                .task
                .task_role
                .unwrap_or_else(|| execution_role.clone()),
            execution_role,
            log_group: profile
                .logging
                .group
                .unwrap_or_else(|| format!("/ecs/{}", project)),
            log_stream_prefix: profile
                .logging
                .stream_prefix
                .unwrap_or_else(|| DEFAULT_LOG_STREAM_PREFIX.to_string()),
        };

        let network = NetworkSettings {
            subnets: clean_list(params.subnets),
            security_groups: clean_list(params.security_groups),
            assign_public_ip: profile.network.assign_public_ip.unwrap_or(true),
        };

        let config = Self {
            service,
            target_group,
            secrets,
            task,
            network,
        };
        config.validate()?;
        Ok(config)
    }
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn validate_identifier(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Only letters, digits, '-' and '_' are allowed".to_string(),
        });
    }
    Ok(())
}

impl Validate for DeploymentConfig {
    fn validate(&self) -> Result<()> {
        validate_identifier("project", &self.service.project)?;
        validate_identifier("service", &self.service.service_name)?;
        validate_non_empty_string("cluster", &self.service.cluster)?;

        validate_non_empty_string("image", &self.service.image)?;
        if self.service.image.chars().any(char::is_whitespace) {
            return Err(DeployError::InvalidConfigValueError {
                field: "image".to_string(),
                value: self.service.image.clone(),
                reason: "Image reference cannot contain whitespace".to_string(),
            });
        }

        validate_range("service.container_port", self.service.container_port, 1, u16::MAX)?;
        validate_range(
            "service.desired_count",
            self.service.desired_count,
            1,
            MAX_DESIRED_COUNT,
        )?;

        validate_target_group_name("target_group.name", &self.target_group.name)?;
        validate_non_empty_string("vpc_id", &self.target_group.vpc_id)?;
        if !self.target_group.health_check_path.starts_with('/') {
            return Err(DeployError::InvalidConfigValueError {
                field: "target_group.health_check_path".to_string(),
                value: self.target_group.health_check_path.clone(),
                reason: "Health check path must start with '/'".to_string(),
            });
        }
        validate_non_empty_string(
            "target_group.health_check_matcher",
            &self.target_group.health_check_matcher,
        )?;

        validate_numeric_string("task.cpu", &self.task.cpu)?;
        validate_numeric_string("task.memory", &self.task.memory)?;
        validate_non_empty_string("task.execution_role", &self.task.execution_role)?;
        validate_non_empty_string("task.task_role", &self.task.task_role)?;
        validate_non_empty_string("logging.group", &self.task.log_group)?;
        validate_non_empty_string("logging.stream_prefix", &self.task.log_stream_prefix)?;

        validate_non_empty_list("subnets", &self.network.subnets)?;
        validate_non_empty_list("security_groups", &self.network.security_groups)?;

        for entry in self.secrets.entries() {
            validate_env_var_name("variables", &entry.variable)?;
            validate_parameter_path(&format!("variables.{}", entry.variable), &entry.path)?;
        }
        validate_unique(
            "variables",
            self.secrets.entries().iter().map(|e| e.variable.as_str()),
        )?;

        tracing::debug!(project = %self.service.project, "deployment configuration validated");
        Ok(())
    }
}
