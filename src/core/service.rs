use crate::core::ContainerOrchestration;
use crate::domain::model::{
    CreateServiceRequest, LoadBalancerBinding, NetworkSettings, ServiceOutcome, ServiceSpec,
    TargetGroupHandle, TaskDefinitionRevision, UpdateServiceRequest,
};
use crate::utils::error::Result;

/// Converges the managed service onto a task definition revision and target
/// group. Returns once the platform has accepted the request; it does not
/// wait for tasks to become healthy.
pub struct ServiceReconciler<C: ContainerOrchestration> {
    orchestration: C,
}

impl<C: ContainerOrchestration> ServiceReconciler<C> {
    pub fn new(orchestration: C) -> Self {
        Self { orchestration }
    }

    pub async fn reconcile(
        &self,
        spec: &ServiceSpec,
        target_group: &TargetGroupHandle,
        revision: &TaskDefinitionRevision,
        network: &NetworkSettings,
    ) -> Result<ServiceOutcome> {
        let state = self
            .orchestration
            .describe_service(&spec.cluster, &spec.service_name)
            .await?;
        tracing::debug!(
            service = %spec.service_name,
            cluster = %spec.cluster,
            status = ?state.status,
            "observed service state"
        );

        let binding = LoadBalancerBinding {
            target_group: target_group.clone(),
            container_name: spec.container_name(),
            container_port: spec.container_port,
        };

        if !state.exists() {
            tracing::info!(service = %spec.service_name, "service does not exist, creating it");
            let request = CreateServiceRequest {
                cluster: spec.cluster.clone(),
                service_name: spec.service_name.clone(),
                task_definition_arn: revision.arn.clone(),
                desired_count: spec.desired_count,
                network: network.clone(),
                load_balancer: binding,
            };
            self.orchestration.create_service(&request).await?;
            return Ok(ServiceOutcome::Created);
        }

        let load_balancer = if state.is_bound_to(target_group) {
            None
        } else {
            tracing::warn!(
                service = %spec.service_name,
                bound = ?state.target_group_arns,
                target_group = %target_group,
                "service is not attached to the target group, rebinding"
            );
            Some(binding)
        };

        tracing::info!(
            service = %spec.service_name,
            previous = state.task_definition_arn.as_deref().unwrap_or("none"),
            "service exists, forcing a new deployment"
        );
        let request = UpdateServiceRequest {
            cluster: spec.cluster.clone(),
            service_name: spec.service_name.clone(),
            task_definition_arn: revision.arn.clone(),
            force_new_deployment: true,
            load_balancer,
        };
        self.orchestration.update_service(&request).await?;

        Ok(ServiceOutcome::Updated)
    }
}
