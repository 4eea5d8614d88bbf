pub mod deployer;
pub mod report;
pub mod secrets;
pub mod service;
pub mod target_group;
pub mod task_definition;

pub use crate::domain::ports::{ContainerOrchestration, LoadBalancing, SecretStore};
pub use crate::utils::error::Result;
