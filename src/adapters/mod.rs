// Adapters layer: AWS SDK implementations of the platform ports.

pub mod ecs;
pub mod elbv2;
pub mod identity;
pub mod ssm;

pub use ecs::EcsOrchestration;
pub use elbv2::ElbTargetGroups;
pub use ssm::SsmSecretStore;

use crate::domain::model::AccountContext;
use crate::utils::error::{DeployError, Result};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ecs::config::Region;
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata};

/// Clients for the three platform APIs plus the account they act in.
#[derive(Debug, Clone)]
pub struct AwsPlatform {
    pub secrets: SsmSecretStore,
    pub load_balancing: ElbTargetGroups,
    pub orchestration: EcsOrchestration,
    pub account: AccountContext,
}

impl AwsPlatform {
    /// Loads credentials and region from the default provider chain (the
    /// instance role on the CI host).
    pub async fn connect(region: Option<String>) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;
        Self::from_sdk_config(&sdk_config).await
    }

    pub async fn from_sdk_config(config: &SdkConfig) -> Result<Self> {
        let region = config
            .region()
            .map(|r| r.to_string())
            .ok_or_else(|| DeployError::MissingConfigError {
                field: "region".to_string(),
            })?;

        let sts = aws_sdk_sts::Client::new(config);
        let account = identity::discover_account(&sts, region).await?;

        Ok(Self {
            secrets: SsmSecretStore::new(aws_sdk_ssm::Client::new(config), account.clone()),
            load_balancing: ElbTargetGroups::new(aws_sdk_elasticloadbalancingv2::Client::new(
                config,
            )),
            orchestration: EcsOrchestration::new(aws_sdk_ecs::Client::new(config)),
            account,
        })
    }
}

/// Converts an SDK failure into an infrastructure error carrying the AWS
/// error code.
pub(crate) fn platform_error<E>(operation: &str, err: E) -> DeployError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let code = err.code().unwrap_or("Unknown").to_string();
    DeployError::infrastructure(operation, code, DisplayErrorContext(&err).to_string())
}

pub(crate) fn build_error(operation: &str, err: impl std::fmt::Display) -> DeployError {
    DeployError::infrastructure(operation, "InvalidRequest", err.to_string())
}

pub(crate) fn missing_field(operation: &str, field: &str) -> DeployError {
    DeployError::infrastructure(
        operation,
        "MalformedResponse",
        format!("response did not include {}", field),
    )
}
