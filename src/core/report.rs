use crate::domain::model::{
    Ensured, ServiceOutcome, ServiceSpec, TargetGroupHandle, TaskDefinitionRevision,
};
use crate::utils::error::{DeployError, ErrorKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Stages of a deployment run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    LoadConfig,
    ConnectPlatform,
    ResolveSecrets,
    EnsureTargetGroup,
    RegisterTaskDefinition,
    ReconcileService,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::LoadConfig => "load configuration",
            Step::ConnectPlatform => "connect to AWS",
            Step::ResolveSecrets => "resolve secrets",
            Step::EnsureTargetGroup => "ensure target group",
            Step::RegisterTaskDefinition => "register task definition",
            Step::ReconcileService => "reconcile service",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("step '{step}' failed: {error}")]
pub struct StepFailure {
    pub step: Step,
    #[source]
    pub error: DeployError,
}

impl StepFailure {
    pub fn new(step: Step, error: DeployError) -> Self {
        Self { step, error }
    }

    pub fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentSummary {
    pub target_group: Ensured<TargetGroupHandle>,
    pub task_definition: TaskDefinitionRevision,
    pub outcome: ServiceOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub step: Step,
    pub kind: ErrorKind,
    pub message: String,
    pub suggestion: String,
}

/// Terminal report handed back to the invoking pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<DeploymentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReport>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn succeeded(spec: &ServiceSpec, summary: DeploymentSummary) -> Self {
        Self {
            status: RunStatus::Succeeded,
            service: Some(spec.service_name.clone()),
            cluster: Some(spec.cluster.clone()),
            image: Some(spec.image.clone()),
            summary: Some(summary),
            failure: None,
            finished_at: Utc::now(),
        }
    }

    /// `spec` is absent when the run failed before configuration was loaded.
    pub fn failed(spec: Option<&ServiceSpec>, failure: &StepFailure) -> Self {
        Self {
            status: RunStatus::Failed,
            service: spec.map(|s| s.service_name.clone()),
            cluster: spec.map(|s| s.cluster.clone()),
            image: spec.map(|s| s.image.clone()),
            summary: None,
            failure: Some(FailureReport {
                step: failure.step,
                kind: failure.error.kind(),
                message: failure.error.user_friendly_message(),
                suggestion: failure.error.recovery_suggestion().to_string(),
            }),
            finished_at: Utc::now(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match (&self.status, &self.failure) {
            (RunStatus::Succeeded, _) => 0,
            (RunStatus::Failed, Some(failure)) => failure.kind.exit_code(),
            (RunStatus::Failed, None) => 1,
        }
    }

    /// One-line human summary for stderr/stdout.
    pub fn summary_line(&self) -> String {
        match (&self.summary, &self.failure) {
            (Some(summary), _) => format!(
                "{} service '{}' in '{}' with task definition {}",
                summary.outcome,
                self.service.as_deref().unwrap_or_default(),
                self.cluster.as_deref().unwrap_or_default(),
                summary.task_definition
            ),
            (None, Some(failure)) => format!(
                "Deployment failed at step '{}' ({}): {}",
                failure.step, failure.kind, failure.message
            ),
            (None, None) => "Deployment finished without a result".to_string(),
        }
    }
}
