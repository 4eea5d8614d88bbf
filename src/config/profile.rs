use crate::utils::error::{DeployError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional per-project overrides of the deployment defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployProfile {
    #[serde(default)]
    pub service: ServiceProfile,
    #[serde(default)]
    pub task: TaskProfile,
    #[serde(default)]
    pub target_group: TargetGroupProfile,
    #[serde(default)]
    pub network: NetworkProfile,
    #[serde(default)]
    pub logging: LoggingProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceProfile {
    pub desired_count: Option<u32>,
    pub container_port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskProfile {
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub execution_role: Option<String>,
    pub task_role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetGroupProfile {
    pub name: Option<String>,
    pub health_check_path: Option<String>,
    pub health_check_matcher: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkProfile {
    pub assign_public_ip: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingProfile {
    pub group: Option<String>,
    pub stream_prefix: Option<String>,
}

impl DeployProfile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| DeployError::config(format!("Deploy profile parsing error: {}", e)))
    }

    /// Replaces `${VAR}` with the value of the environment variable. Unset
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("valid regex");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_profile() {
        let toml_content = r#"
[service]
desired_count = 2
container_port = 8080

[task]
cpu = "512"
memory = "1024"
execution_role = "deployExecutionRole"

[target_group]
health_check_path = "/health/"

[network]
assign_public_ip = false

[logging]
stream_prefix = "app"
"#;

        let profile = DeployProfile::from_toml_str(toml_content).unwrap();

        assert_eq!(profile.service.desired_count, Some(2));
        assert_eq!(profile.service.container_port, Some(8080));
        assert_eq!(profile.task.cpu.as_deref(), Some("512"));
        assert_eq!(profile.task.task_role, None);
        assert_eq!(profile.target_group.health_check_path.as_deref(), Some("/health/"));
        assert_eq!(profile.network.assign_public_ip, Some(false));
        assert_eq!(profile.logging.group, None);
    }

    #[test]
    fn test_empty_profile_is_default() {
        let profile = DeployProfile::from_toml_str("").unwrap();
        assert_eq!(profile, DeployProfile::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = DeployProfile::from_toml_str("[service]\nreplicas = 3\n");
        assert!(matches!(result, Err(DeployError::ConfigError { .. })));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ECS_DEPLOY_TEST_ROLE", "ciExecutionRole");

        let profile = DeployProfile::from_toml_str(
            "[task]\nexecution_role = \"${ECS_DEPLOY_TEST_ROLE}\"\ntask_role = \"${ECS_DEPLOY_TEST_UNSET}\"\n",
        )
        .unwrap();

        assert_eq!(profile.task.execution_role.as_deref(), Some("ciExecutionRole"));
        assert_eq!(
            profile.task.task_role.as_deref(),
            Some("${ECS_DEPLOY_TEST_UNSET}")
        );

        std::env::remove_var("ECS_DEPLOY_TEST_ROLE");
    }

    #[test]
    fn test_profile_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[service]\ndesired_count = 3\n")
            .unwrap();

        let profile = DeployProfile::from_file(temp_file.path()).unwrap();
        assert_eq!(profile.service.desired_count, Some(3));
    }
}
