use crate::core::SecretStore;
use crate::domain::model::{ResolvedSecretRef, SecretMapping};
use crate::utils::error::{DeployError, Result};

/// Turns the secret map into `valueFrom` pointers. Only checks that each
/// parameter exists; values stay in the store until the container starts.
pub struct SecretResolver<S: SecretStore> {
    store: S,
}

impl<S: SecretStore> SecretResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, mapping: &SecretMapping) -> Result<Vec<ResolvedSecretRef>> {
        let mut resolved = Vec::with_capacity(mapping.len());

        for entry in mapping.entries() {
            tracing::debug!(variable = %entry.variable, path = %entry.path, "checking parameter");

            match self.store.locate(&entry.path).await? {
                Some(arn) => resolved.push(ResolvedSecretRef {
                    name: entry.variable.clone(),
                    value_from: arn,
                }),
                None => {
                    return Err(DeployError::SecretResolutionError {
                        variable: entry.variable.clone(),
                        path: entry.path.clone(),
                        reason: "parameter not found".to_string(),
                    })
                }
            }
        }

        tracing::info!(count = resolved.len(), "resolved secret references");
        Ok(resolved)
    }
}
