use crate::adapters::{build_error, missing_field, platform_error};
use crate::core::ContainerOrchestration;
use crate::domain::model::{
    CreateServiceRequest, LoadBalancerBinding, NetworkSettings, ServiceState, ServiceStatus,
    TaskDefinitionRevision, TaskDefinitionSpec, UpdateServiceRequest,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, Compatibility, ContainerDefinition, LaunchType,
    LoadBalancer, LogConfiguration, LogDriver, NetworkConfiguration, NetworkMode, PortMapping,
    Secret, TransportProtocol,
};
use aws_sdk_ecs::Client as EcsClient;

#[derive(Debug, Clone)]
pub struct EcsOrchestration {
    client: EcsClient,
}

impl EcsOrchestration {
    pub fn new(client: EcsClient) -> Self {
        Self { client }
    }
}

fn container_definition(spec: &TaskDefinitionSpec) -> Result<ContainerDefinition> {
    const OPERATION: &str = "RegisterTaskDefinition";

    let secrets = spec
        .secrets
        .iter()
        .map(|secret| {
            Secret::builder()
                .name(&secret.name)
                .value_from(&secret.value_from)
                .build()
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| build_error(OPERATION, e))?;

    let log_configuration = LogConfiguration::builder()
        .log_driver(LogDriver::Awslogs)
        .options("awslogs-group", &spec.log.group)
        .options("awslogs-region", &spec.log.region)
        .options("awslogs-stream-prefix", &spec.log.stream_prefix)
        .build()
        .map_err(|e| build_error(OPERATION, e))?;

    Ok(ContainerDefinition::builder()
        .name(&spec.container_name)
        .image(&spec.image)
        .essential(true)
        .port_mappings(
            PortMapping::builder()
                .container_port(i32::from(spec.container_port))
                .protocol(TransportProtocol::Tcp)
                .build(),
        )
        .set_secrets(Some(secrets))
        .log_configuration(log_configuration)
        .build())
}

fn network_configuration(network: &NetworkSettings) -> Result<NetworkConfiguration> {
    let assign_public_ip = if network.assign_public_ip {
        AssignPublicIp::Enabled
    } else {
        AssignPublicIp::Disabled
    };

    let awsvpc = AwsVpcConfiguration::builder()
        .set_subnets(Some(network.subnets.clone()))
        .set_security_groups(Some(network.security_groups.clone()))
        .assign_public_ip(assign_public_ip)
        .build()
        .map_err(|e| build_error("CreateService", e))?;

    Ok(NetworkConfiguration::builder()
        .awsvpc_configuration(awsvpc)
        .build())
}

fn load_balancer(binding: &LoadBalancerBinding) -> LoadBalancer {
    LoadBalancer::builder()
        .target_group_arn(binding.target_group.arn())
        .container_name(&binding.container_name)
        .container_port(i32::from(binding.container_port))
        .build()
}

#[async_trait]
impl ContainerOrchestration for EcsOrchestration {
    async fn register_task_definition(
        &self,
        spec: &TaskDefinitionSpec,
    ) -> Result<TaskDefinitionRevision> {
        let output = self
            .client
            .register_task_definition()
            .family(&spec.family)
            .network_mode(NetworkMode::Awsvpc)
            .requires_compatibilities(Compatibility::Fargate)
            .cpu(&spec.cpu)
            .memory(&spec.memory)
            .execution_role_arn(&spec.execution_role_arn)
            .task_role_arn(&spec.task_role_arn)
            .container_definitions(container_definition(spec)?)
            .send()
            .await
            .map_err(|e| platform_error("RegisterTaskDefinition", e))?;

        let task_definition = output
            .task_definition()
            .ok_or_else(|| missing_field("RegisterTaskDefinition", "a task definition"))?;
        let arn = task_definition
            .task_definition_arn()
            .ok_or_else(|| missing_field("RegisterTaskDefinition", "a task definition ARN"))?;

        Ok(TaskDefinitionRevision {
            arn: arn.to_string(),
            family: task_definition
                .family()
                .unwrap_or(spec.family.as_str())
                .to_string(),
            revision: task_definition.revision(),
        })
    }

    async fn describe_service(&self, cluster: &str, service_name: &str) -> Result<ServiceState> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .services(service_name)
            .send()
            .await
            .map_err(|e| platform_error("DescribeServices", e))?;

        // Unknown services come back under `failures` with reason MISSING.
        let Some(service) = output
            .services()
            .iter()
            .find(|s| s.service_name() == Some(service_name))
        else {
            return Ok(ServiceState::missing());
        };

        Ok(ServiceState {
            status: ServiceStatus::from_platform(service.status()),
            task_definition_arn: service.task_definition().map(str::to_string),
            target_group_arns: service
                .load_balancers()
                .iter()
                .filter_map(|lb| lb.target_group_arn())
                .map(str::to_string)
                .collect(),
            running_count: service.running_count(),
            desired_count: service.desired_count(),
        })
    }

    async fn create_service(&self, request: &CreateServiceRequest) -> Result<()> {
        self.client
            .create_service()
            .cluster(&request.cluster)
            .service_name(&request.service_name)
            .task_definition(&request.task_definition_arn)
            .launch_type(LaunchType::Fargate)
            .desired_count(i32::try_from(request.desired_count).unwrap_or(i32::MAX))
            .network_configuration(network_configuration(&request.network)?)
            .load_balancers(load_balancer(&request.load_balancer))
            .send()
            .await
            .map_err(|e| platform_error("CreateService", e))?;
        Ok(())
    }

    async fn update_service(&self, request: &UpdateServiceRequest) -> Result<()> {
        let mut update = self
            .client
            .update_service()
            .cluster(&request.cluster)
            .service(&request.service_name)
            .task_definition(&request.task_definition_arn)
            .force_new_deployment(request.force_new_deployment);

        if let Some(binding) = &request.load_balancer {
            update = update.load_balancers(load_balancer(binding));
        }

        update
            .send()
            .await
            .map_err(|e| platform_error("UpdateService", e))?;
        Ok(())
    }
}
