use crate::config::TaskSettings;
use crate::core::ContainerOrchestration;
use crate::domain::model::{
    AccountContext, LogSettings, ResolvedSecretRef, ServiceSpec, TaskDefinitionRevision,
    TaskDefinitionSpec,
};
use crate::utils::error::Result;

/// Registers a fresh task definition revision on every call. Revisions are
/// never looked up or reused, so redeploying an unchanged image is valid.
pub struct TaskDefinitionRegistrar<C: ContainerOrchestration> {
    orchestration: C,
    account: AccountContext,
}

impl<C: ContainerOrchestration> TaskDefinitionRegistrar<C> {
    pub fn new(orchestration: C, account: AccountContext) -> Self {
        Self {
            orchestration,
            account,
        }
    }

    pub async fn register(
        &self,
        service: &ServiceSpec,
        task: &TaskSettings,
        secrets: Vec<ResolvedSecretRef>,
    ) -> Result<TaskDefinitionRevision> {
        let spec = build_task_definition(service, task, &self.account, secrets);
        tracing::info!(
            family = %spec.family,
            image = %spec.image,
            secrets = spec.secrets.len(),
            "registering task definition"
        );

        let revision = self.orchestration.register_task_definition(&spec).await?;
        tracing::info!(arn = %revision.arn, revision = revision.revision, "registered task definition");

        Ok(revision)
    }
}

pub fn build_task_definition(
    service: &ServiceSpec,
    task: &TaskSettings,
    account: &AccountContext,
    secrets: Vec<ResolvedSecretRef>,
) -> TaskDefinitionSpec {
    TaskDefinitionSpec {
        family: service.family().to_string(),
        container_name: service.container_name(),
        image: service.image.clone(),
        container_port: service.container_port,
        secrets,
        cpu: task.cpu.clone(),
        memory: task.memory.clone(),
        execution_role_arn: account.role_arn(&task.execution_role),
        task_role_arn: account.role_arn(&task.task_role),
        log: LogSettings {
            group: task.log_group.clone(),
            region: account.region.clone(),
            stream_prefix: task.log_stream_prefix.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_task_definition_embeds_references() {
        let service = ServiceSpec {
            project: "app".to_string(),
            service_name: "app-svc".to_string(),
            cluster: "prod-cluster".to_string(),
            image: "registry/app:42".to_string(),
            container_port: 8000,
            desired_count: 1,
        };
        let task = TaskSettings {
            cpu: "256".to_string(),
            memory: "512".to_string(),
            execution_role: "ecsTaskExecutionRole".to_string(),
            task_role: "appTaskRole".to_string(),
            log_group: "/ecs/app".to_string(),
            log_stream_prefix: "ecs".to_string(),
        };
        let account = AccountContext::new("123456789012", "us-east-1");
        let secrets = vec![ResolvedSecretRef {
            name: "DB_PASSWORD".to_string(),
            value_from: account.parameter_arn("/prod/app/db_password"),
        }];

        let spec = build_task_definition(&service, &task, &account, secrets);

        assert_eq!(spec.family, "app");
        assert_eq!(spec.container_name, "app-container");
        assert_eq!(spec.image, "registry/app:42");
        assert_eq!(
            spec.execution_role_arn,
            "arn:aws:iam::123456789012:role/ecsTaskExecutionRole"
        );
        assert_eq!(spec.task_role_arn, "arn:aws:iam::123456789012:role/appTaskRole");
        assert_eq!(spec.log.region, "us-east-1");
        assert_eq!(spec.secrets[0].name, "DB_PASSWORD");
        assert_eq!(
            spec.secrets[0].value_from,
            "arn:aws:ssm:us-east-1:123456789012:parameter/prod/app/db_password"
        );
    }
}
