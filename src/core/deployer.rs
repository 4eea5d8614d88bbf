use crate::config::DeploymentConfig;
use crate::core::report::{DeploymentSummary, Step, StepFailure};
use crate::core::secrets::SecretResolver;
use crate::core::service::ServiceReconciler;
use crate::core::target_group::TargetGroupManager;
use crate::core::task_definition::TaskDefinitionRegistrar;
use crate::core::{ContainerOrchestration, LoadBalancing, SecretStore};
use crate::domain::model::AccountContext;
use crate::utils::error::DeployError;

/// Runs one reconciliation pass. Steps execute strictly in order and the
/// first failure ends the run; nothing already created is rolled back.
pub struct Deployer<S, L, C>
where
    S: SecretStore,
    L: LoadBalancing,
    C: ContainerOrchestration + Clone,
{
    secrets: SecretResolver<S>,
    target_groups: TargetGroupManager<L>,
    registrar: TaskDefinitionRegistrar<C>,
    reconciler: ServiceReconciler<C>,
}

impl<S, L, C> Deployer<S, L, C>
where
    S: SecretStore,
    L: LoadBalancing,
    C: ContainerOrchestration + Clone,
{
    pub fn new(secret_store: S, load_balancing: L, orchestration: C, account: AccountContext) -> Self {
        Self {
            secrets: SecretResolver::new(secret_store),
            target_groups: TargetGroupManager::new(load_balancing),
            registrar: TaskDefinitionRegistrar::new(orchestration.clone(), account),
            reconciler: ServiceReconciler::new(orchestration),
        }
    }

    pub async fn run(&self, config: &DeploymentConfig) -> Result<DeploymentSummary, StepFailure> {
        let service = &config.service;
        tracing::info!(
            project = %service.project,
            service = %service.service_name,
            cluster = %service.cluster,
            image = %service.image,
            "starting deployment"
        );

        let secrets = self
            .secrets
            .resolve(&config.secrets)
            .await
            .map_err(at(Step::ResolveSecrets))?;

        let target_group = self
            .target_groups
            .ensure(&config.target_group)
            .await
            .map_err(at(Step::EnsureTargetGroup))?;

        let task_definition = self
            .registrar
            .register(service, &config.task, secrets)
            .await
            .map_err(at(Step::RegisterTaskDefinition))?;

        let outcome = self
            .reconciler
            .reconcile(
                service,
                target_group.handle(),
                &task_definition,
                &config.network,
            )
            .await
            .map_err(at(Step::ReconcileService))?;

        tracing::info!(
            service = %service.service_name,
            outcome = %outcome,
            task_definition = %task_definition,
            "deployment request accepted by ECS"
        );

        Ok(DeploymentSummary {
            target_group,
            task_definition,
            outcome,
        })
    }
}

fn at(step: Step) -> impl FnOnce(DeployError) -> StepFailure {
    move |error| StepFailure::new(step, error)
}
