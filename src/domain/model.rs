use serde::{Deserialize, Serialize};

/// AWS account and region the run operates in, used to build ARNs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountContext {
    pub account_id: String,
    pub region: String,
}

impl AccountContext {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
        }
    }

    pub fn role_arn(&self, role_name: &str) -> String {
        format!("arn:aws:iam::{}:role/{}", self.account_id, role_name)
    }

    /// `path` is a fully qualified parameter name and already starts with '/'.
    pub fn parameter_arn(&self, path: &str) -> String {
        format!(
            "arn:aws:ssm:{}:{}:parameter{}",
            self.region, self.account_id, path
        )
    }
}

/// Desired state of the managed service. Fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub project: String,
    pub service_name: String,
    pub cluster: String,
    pub image: String,
    pub container_port: u16,
    pub desired_count: u32,
}

impl ServiceSpec {
    /// Task definition family; revisions accumulate under it.
    pub fn family(&self) -> &str {
        &self.project
    }

    pub fn container_name(&self) -> String {
        format!("{}-container", self.project)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroupSpec {
    pub name: String,
    pub vpc_id: String,
    pub port: u16,
    pub health_check_path: String,
    pub health_check_matcher: String,
}

/// ARN of a target group that is known to exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetGroupHandle(pub String);

impl TargetGroupHandle {
    pub fn arn(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TargetGroupHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of an ensure-exists step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "handle", rename_all = "snake_case")]
pub enum Ensured<T> {
    Created(T),
    FoundUnchanged(T),
}

impl<T> Ensured<T> {
    pub fn handle(&self) -> &T {
        match self {
            Ensured::Created(h) | Ensured::FoundUnchanged(h) => h,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Ensured::Created(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretEntry {
    pub variable: String,
    pub path: String,
}

/// Environment variable -> Parameter Store path, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretMapping {
    entries: Vec<SecretEntry>,
}

impl SecretMapping {
    /// Callers are expected to have validated uniqueness of variable names.
    pub fn new(entries: Vec<SecretEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SecretEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Indirect value pointer handed to the container runtime. Holds the
/// parameter ARN, never the parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSecretRef {
    pub name: String,
    pub value_from: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    pub group: String,
    pub region: String,
    pub stream_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinitionSpec {
    pub family: String,
    pub container_name: String,
    pub image: String,
    pub container_port: u16,
    pub secrets: Vec<ResolvedSecretRef>,
    pub cpu: String,
    pub memory: String,
    pub execution_role_arn: String,
    pub task_role_arn: String,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinitionRevision {
    pub arn: String,
    pub family: String,
    pub revision: i32,
}

impl std::fmt::Display for TaskDefinitionRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.family, self.revision)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Missing,
    Active,
    Draining,
    Inactive,
}

impl ServiceStatus {
    pub fn from_platform(status: Option<&str>) -> Self {
        match status {
            Some("ACTIVE") => ServiceStatus::Active,
            Some("DRAINING") => ServiceStatus::Draining,
            Some("INACTIVE") => ServiceStatus::Inactive,
            _ => ServiceStatus::Missing,
        }
    }
}

/// Service as last observed on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    pub status: ServiceStatus,
    pub task_definition_arn: Option<String>,
    pub target_group_arns: Vec<String>,
    pub running_count: i32,
    pub desired_count: i32,
}

impl ServiceState {
    pub fn missing() -> Self {
        Self {
            status: ServiceStatus::Missing,
            task_definition_arn: None,
            target_group_arns: Vec::new(),
            running_count: 0,
            desired_count: 0,
        }
    }

    /// Deleted services linger as INACTIVE and are treated as absent.
    pub fn exists(&self) -> bool {
        !matches!(self.status, ServiceStatus::Missing | ServiceStatus::Inactive)
    }

    pub fn is_bound_to(&self, target_group: &TargetGroupHandle) -> bool {
        self.target_group_arns
            .iter()
            .any(|arn| arn == target_group.arn())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerBinding {
    pub target_group: TargetGroupHandle,
    pub container_name: String,
    pub container_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateServiceRequest {
    pub cluster: String,
    pub service_name: String,
    pub task_definition_arn: String,
    pub desired_count: u32,
    pub network: NetworkSettings,
    pub load_balancer: LoadBalancerBinding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateServiceRequest {
    pub cluster: String,
    pub service_name: String,
    pub task_definition_arn: String,
    pub force_new_deployment: bool,
    /// Only set when the service has to be rebound to the target group.
    pub load_balancer: Option<LoadBalancerBinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceOutcome {
    Created,
    Updated,
}

impl std::fmt::Display for ServiceOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceOutcome::Created => f.write_str("Created"),
            ServiceOutcome::Updated => f.write_str("Updated"),
        }
    }
}
