use crate::adapters::{missing_field, platform_error};
use crate::domain::model::AccountContext;
use crate::utils::error::Result;
use aws_sdk_sts::Client as StsClient;

/// Looks up the account of the active credentials.
pub async fn discover_account(client: &StsClient, region: String) -> Result<AccountContext> {
    let output = client
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| platform_error("GetCallerIdentity", e))?;

    let account_id = output
        .account()
        .ok_or_else(|| missing_field("GetCallerIdentity", "an account id"))?;

    tracing::info!(
        account = %account_id,
        region = %region,
        caller = output.arn().unwrap_or("unknown"),
        "resolved AWS identity"
    );

    Ok(AccountContext::new(account_id, region))
}
