use crate::config::{DeploymentConfig, RunParameters};
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "ecs-deploy")]
#[command(about = "Converge an ECS Fargate service, its target group and task definition")]
pub struct CliConfig {
    #[arg(long, help = "Container image URI, e.g. registry/repo:tag")]
    pub image: String,

    #[arg(long = "env-yml", help = "Path to the env.yml secret map")]
    pub env_file: PathBuf,

    #[arg(long)]
    pub vpc_id: String,

    #[arg(long)]
    pub cluster: String,

    #[arg(long, help = "Project name, used as prefix for AWS resource names")]
    pub project: String,

    #[arg(long, help = "Service name [default: <project>-service]")]
    pub service: Option<String>,

    #[arg(long, value_delimiter = ',', required = true)]
    pub subnets: Vec<String>,

    #[arg(long, value_delimiter = ',', required = true)]
    pub security_groups: Vec<String>,

    #[arg(long, help = "Optional TOML deploy profile")]
    pub profile: Option<PathBuf>,

    #[arg(long, help = "AWS region, overrides the default provider chain")]
    pub region: Option<String>,

    #[arg(long, help = "Print the run report as JSON on stdout")]
    pub json: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn run_parameters(&self) -> RunParameters {
        RunParameters {
            image: self.image.clone(),
            cluster: self.cluster.clone(),
            project: self.project.clone(),
            service: self.service.clone(),
            vpc_id: self.vpc_id.clone(),
            subnets: self.subnets.clone(),
            security_groups: self.security_groups.clone(),
        }
    }

    pub fn load_deployment(&self) -> Result<DeploymentConfig> {
        DeploymentConfig::load(
            self.run_parameters(),
            &self.env_file,
            self.profile.as_deref(),
        )
    }
}
