use crate::adapters::{missing_field, platform_error};
use crate::core::LoadBalancing;
use crate::domain::model::{TargetGroupHandle, TargetGroupSpec};
use crate::utils::error::Result;
use async_trait::async_trait;
use aws_sdk_elasticloadbalancingv2::types::{Matcher, ProtocolEnum, TargetTypeEnum};
use aws_sdk_elasticloadbalancingv2::Client as ElbClient;

#[derive(Debug, Clone)]
pub struct ElbTargetGroups {
    client: ElbClient,
}

impl ElbTargetGroups {
    pub fn new(client: ElbClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LoadBalancing for ElbTargetGroups {
    async fn find_target_group(&self, name: &str) -> Result<Option<TargetGroupHandle>> {
        match self.client.describe_target_groups().names(name).send().await {
            Ok(output) => Ok(output
                .target_groups()
                .iter()
                .find_map(|tg| tg.target_group_arn())
                .map(|arn| TargetGroupHandle(arn.to_string()))),
            Err(err)
                if err
                    .as_service_error()
                    .map(|e| e.is_target_group_not_found_exception())
                    .unwrap_or(false) =>
            {
                Ok(None)
            }
            Err(err) => Err(platform_error("DescribeTargetGroups", err)),
        }
    }

    async fn create_target_group(&self, spec: &TargetGroupSpec) -> Result<TargetGroupHandle> {
        // Fargate tasks in awsvpc mode register by IP.
        let output = self
            .client
            .create_target_group()
            .name(&spec.name)
            .protocol(ProtocolEnum::Http)
            .port(i32::from(spec.port))
            .vpc_id(&spec.vpc_id)
            .target_type(TargetTypeEnum::Ip)
            .health_check_protocol(ProtocolEnum::Http)
            .health_check_path(&spec.health_check_path)
            .matcher(
                Matcher::builder()
                    .http_code(&spec.health_check_matcher)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| platform_error("CreateTargetGroup", e))?;

        output
            .target_groups()
            .first()
            .and_then(|tg| tg.target_group_arn())
            .map(|arn| TargetGroupHandle(arn.to_string()))
            .ok_or_else(|| missing_field("CreateTargetGroup", "a target group ARN"))
    }
}
