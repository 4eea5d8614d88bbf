use crate::adapters::{build_error, platform_error};
use crate::core::SecretStore;
use crate::domain::model::AccountContext;
use crate::utils::error::Result;
use async_trait::async_trait;
use aws_sdk_ssm::types::ParameterStringFilter;
use aws_sdk_ssm::Client as SsmClient;

const OPERATION: &str = "DescribeParameters";

/// Parameter Store lookups through `DescribeParameters`, which returns
/// metadata only.
#[derive(Debug, Clone)]
pub struct SsmSecretStore {
    client: SsmClient,
    account: AccountContext,
}

impl SsmSecretStore {
    pub fn new(client: SsmClient, account: AccountContext) -> Self {
        Self { client, account }
    }
}

#[async_trait]
impl SecretStore for SsmSecretStore {
    async fn locate(&self, path: &str) -> Result<Option<String>> {
        let filter = ParameterStringFilter::builder()
            .key("Name")
            .option("Equals")
            .values(path)
            .build()
            .map_err(|e| build_error(OPERATION, e))?;

        // A filtered page may be empty while a later page holds the match.
        let mut next_token: Option<String> = None;
        loop {
            let output = self
                .client
                .describe_parameters()
                .parameter_filters(filter.clone())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| platform_error(OPERATION, e))?;

            if output
                .parameters()
                .iter()
                .any(|parameter| parameter.name() == Some(path))
            {
                return Ok(Some(self.account.parameter_arn(path)));
            }

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => return Ok(None),
            }
        }
    }
}
