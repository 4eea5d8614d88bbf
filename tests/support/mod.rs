#![allow(dead_code)]

use async_trait::async_trait;
use ecs_deploy::core::{ContainerOrchestration, LoadBalancing, SecretStore};
use ecs_deploy::domain::model::{
    AccountContext, CreateServiceRequest, SecretEntry, SecretMapping, ServiceState, ServiceStatus,
    TargetGroupHandle, TargetGroupSpec, TaskDefinitionRevision, TaskDefinitionSpec,
    UpdateServiceRequest,
};
use ecs_deploy::{DeployError, DeployProfile, DeploymentConfig, Result, RunParameters};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const ACCOUNT_ID: &str = "123456789012";
pub const REGION: &str = "us-east-1";

pub fn account() -> AccountContext {
    AccountContext::new(ACCOUNT_ID, REGION)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub locate: usize,
    pub find_target_group: usize,
    pub create_target_group: usize,
    pub register_task_definition: usize,
    pub describe_service: usize,
    pub create_service: usize,
    pub update_service: usize,
}

#[derive(Debug, Clone)]
pub struct FakeService {
    pub cluster: String,
    pub name: String,
    pub status: ServiceStatus,
    pub task_definition_arn: String,
    pub target_group_arns: Vec<String>,
    pub desired_count: u32,
}

#[derive(Debug, Default)]
pub struct PlatformState {
    /// Parameter path -> value. Values exist only so tests can check they
    /// never leak.
    pub parameters: BTreeMap<String, String>,
    pub target_groups: Vec<(TargetGroupSpec, TargetGroupHandle)>,
    pub task_definitions: Vec<(TaskDefinitionRevision, TaskDefinitionSpec)>,
    pub services: Vec<FakeService>,
    pub updates: Vec<UpdateServiceRequest>,
    pub calls: CallCounts,
    /// Operation name that should be rejected by the platform.
    pub reject: Option<&'static str>,
}

impl PlatformState {
    pub fn active_services(&self, cluster: &str, name: &str) -> Vec<&FakeService> {
        self.services
            .iter()
            .filter(|s| s.cluster == cluster && s.name == name && s.status == ServiceStatus::Active)
            .collect()
    }

    pub fn latest_revision(&self) -> Option<&TaskDefinitionRevision> {
        self.task_definitions.last().map(|(rev, _)| rev)
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if self.reject == Some(operation) {
            return Err(DeployError::infrastructure(
                operation,
                "InvalidParameterException",
                "rejected by fake platform",
            ));
        }
        Ok(())
    }
}

/// In-memory stand-in for SSM, ELBv2 and ECS. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakePlatform {
    state: Arc<Mutex<PlatformState>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(self, path: &str, value: &str) -> Self {
        self.state()
            .parameters
            .insert(path.to_string(), value.to_string());
        self
    }

    pub fn with_service(self, service: FakeService) -> Self {
        self.state().services.push(service);
        self
    }

    pub fn with_target_group(self, spec: TargetGroupSpec, arn: &str) -> Self {
        self.state()
            .target_groups
            .push((spec, TargetGroupHandle(arn.to_string())));
        self
    }

    pub fn rejecting(self, operation: &'static str) -> Self {
        self.state().reject = Some(operation);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, PlatformState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> CallCounts {
        self.state().calls
    }
}

#[async_trait]
impl SecretStore for FakePlatform {
    async fn locate(&self, path: &str) -> Result<Option<String>> {
        let mut state = self.state();
        state.calls.locate += 1;
        state.check("DescribeParameters")?;
        Ok(state
            .parameters
            .contains_key(path)
            .then(|| account().parameter_arn(path)))
    }
}

#[async_trait]
impl LoadBalancing for FakePlatform {
    async fn find_target_group(&self, name: &str) -> Result<Option<TargetGroupHandle>> {
        let mut state = self.state();
        state.calls.find_target_group += 1;
        state.check("DescribeTargetGroups")?;
        Ok(state
            .target_groups
            .iter()
            .find(|(spec, _)| spec.name == name)
            .map(|(_, handle)| handle.clone()))
    }

    async fn create_target_group(&self, spec: &TargetGroupSpec) -> Result<TargetGroupHandle> {
        let mut state = self.state();
        state.calls.create_target_group += 1;
        state.check("CreateTargetGroup")?;
        let handle = TargetGroupHandle(format!(
            "arn:aws:elasticloadbalancing:{}:{}:targetgroup/{}/{:016x}",
            REGION,
            ACCOUNT_ID,
            spec.name,
            state.target_groups.len() + 1
        ));
        state.target_groups.push((spec.clone(), handle.clone()));
        Ok(handle)
    }
}

#[async_trait]
impl ContainerOrchestration for FakePlatform {
    async fn register_task_definition(
        &self,
        spec: &TaskDefinitionSpec,
    ) -> Result<TaskDefinitionRevision> {
        let mut state = self.state();
        state.calls.register_task_definition += 1;
        state.check("RegisterTaskDefinition")?;
        let revision = state
            .task_definitions
            .iter()
            .filter(|(rev, _)| rev.family == spec.family)
            .count() as i32
            + 1;
        let rev = TaskDefinitionRevision {
            arn: format!(
                "arn:aws:ecs:{}:{}:task-definition/{}:{}",
                REGION, ACCOUNT_ID, spec.family, revision
            ),
            family: spec.family.clone(),
            revision,
        };
        state.task_definitions.push((rev.clone(), spec.clone()));
        Ok(rev)
    }

    async fn describe_service(&self, cluster: &str, service_name: &str) -> Result<ServiceState> {
        let mut state = self.state();
        state.calls.describe_service += 1;
        state.check("DescribeServices")?;
        Ok(state
            .services
            .iter()
            .rev()
            .find(|s| s.cluster == cluster && s.name == service_name)
            .map(|s| ServiceState {
                status: s.status,
                task_definition_arn: Some(s.task_definition_arn.clone()),
                target_group_arns: s.target_group_arns.clone(),
                running_count: s.desired_count as i32,
                desired_count: s.desired_count as i32,
            })
            .unwrap_or_else(ServiceState::missing))
    }

    async fn create_service(&self, request: &CreateServiceRequest) -> Result<()> {
        let mut state = self.state();
        state.calls.create_service += 1;
        state.check("CreateService")?;
        if !state
            .active_services(&request.cluster, &request.service_name)
            .is_empty()
        {
            return Err(DeployError::infrastructure(
                "CreateService",
                "InvalidParameterException",
                "Creation of service was not idempotent.",
            ));
        }
        state.services.push(FakeService {
            cluster: request.cluster.clone(),
            name: request.service_name.clone(),
            status: ServiceStatus::Active,
            task_definition_arn: request.task_definition_arn.clone(),
            target_group_arns: vec![request.load_balancer.target_group.arn().to_string()],
            desired_count: request.desired_count,
        });
        Ok(())
    }

    async fn update_service(&self, request: &UpdateServiceRequest) -> Result<()> {
        let mut state = self.state();
        state.calls.update_service += 1;
        state.check("UpdateService")?;
        let service = state
            .services
            .iter_mut()
            .find(|s| {
                s.cluster == request.cluster
                    && s.name == request.service_name
                    && s.status == ServiceStatus::Active
            })
            .ok_or_else(|| {
                DeployError::infrastructure(
                    "UpdateService",
                    "ServiceNotActiveException",
                    "Service was not ACTIVE.",
                )
            })?;
        service.task_definition_arn = request.task_definition_arn.clone();
        if let Some(binding) = &request.load_balancer {
            service.target_group_arns = vec![binding.target_group.arn().to_string()];
        }
        state.updates.push(request.clone());
        Ok(())
    }
}

pub fn run_parameters() -> RunParameters {
    RunParameters {
        image: "registry/app:42".to_string(),
        cluster: "prod-cluster".to_string(),
        project: "app".to_string(),
        service: Some("app-svc".to_string()),
        vpc_id: "vpc-0abc".to_string(),
        subnets: vec!["subnet-a".to_string(), "subnet-b".to_string()],
        security_groups: vec!["sg-1".to_string()],
    }
}

pub fn db_password_mapping() -> SecretMapping {
    SecretMapping::new(vec![SecretEntry {
        variable: "DB_PASSWORD".to_string(),
        path: "/prod/app/db_password".to_string(),
    }])
}

pub fn deployment_config() -> DeploymentConfig {
    DeploymentConfig::build(
        run_parameters(),
        db_password_mapping(),
        DeployProfile::default(),
    )
    .unwrap()
}
