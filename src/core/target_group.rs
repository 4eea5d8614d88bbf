use crate::core::LoadBalancing;
use crate::domain::model::{Ensured, TargetGroupHandle, TargetGroupSpec};
use crate::utils::error::Result;

pub struct TargetGroupManager<L: LoadBalancing> {
    load_balancing: L,
}

impl<L: LoadBalancing> TargetGroupManager<L> {
    pub fn new(load_balancing: L) -> Self {
        Self { load_balancing }
    }

    /// Existence is enforced, settings of an existing group are left alone.
    pub async fn ensure(&self, spec: &TargetGroupSpec) -> Result<Ensured<TargetGroupHandle>> {
        if let Some(handle) = self.load_balancing.find_target_group(&spec.name).await? {
            tracing::info!(name = %spec.name, arn = %handle, "found existing target group");
            return Ok(Ensured::FoundUnchanged(handle));
        }

        tracing::warn!(name = %spec.name, vpc = %spec.vpc_id, "target group missing, creating it");
        let handle = self.load_balancing.create_target_group(spec).await?;
        tracing::info!(name = %spec.name, arn = %handle, "created target group");

        Ok(Ensured::Created(handle))
    }
}
