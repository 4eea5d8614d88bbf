use crate::domain::model::{
    CreateServiceRequest, ServiceState, TargetGroupHandle, TargetGroupSpec, TaskDefinitionRevision,
    TaskDefinitionSpec, UpdateServiceRequest,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Secret store lookups. Implementations must never fetch parameter values.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the reference (ARN) of the parameter at `path`, or `None` if
    /// no such parameter exists.
    async fn locate(&self, path: &str) -> Result<Option<String>>;
}

#[async_trait]
pub trait LoadBalancing: Send + Sync {
    async fn find_target_group(&self, name: &str) -> Result<Option<TargetGroupHandle>>;
    async fn create_target_group(&self, spec: &TargetGroupSpec) -> Result<TargetGroupHandle>;
}

#[async_trait]
pub trait ContainerOrchestration: Send + Sync {
    /// Always creates a new revision.
    async fn register_task_definition(
        &self,
        spec: &TaskDefinitionSpec,
    ) -> Result<TaskDefinitionRevision>;
    async fn describe_service(&self, cluster: &str, service_name: &str) -> Result<ServiceState>;
    async fn create_service(&self, request: &CreateServiceRequest) -> Result<()>;
    async fn update_service(&self, request: &UpdateServiceRequest) -> Result<()>;
}
