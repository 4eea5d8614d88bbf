pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "aws")]
pub mod adapters;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "aws")]
pub use adapters::AwsPlatform;

pub use config::{DeployProfile, DeploymentConfig, RunParameters};
pub use crate::core::deployer::Deployer;
pub use crate::core::report::{DeploymentSummary, RunReport, Step, StepFailure};
pub use utils::error::{DeployError, ErrorKind, Result};
