use clap::Parser;
use ecs_deploy::config::cli::LogFormat;
use ecs_deploy::utils::logger;
use ecs_deploy::{AwsPlatform, CliConfig, Deployer, RunReport, Step, StepFailure};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!(project = %cli.project, "Starting ecs-deploy");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let report = run(&cli).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let exit_code = report.exit_code();
    if exit_code == 0 {
        tracing::info!("✅ {}", report.summary_line());
        if !cli.json {
            println!("✅ {}", report.summary_line());
        }
        return Ok(());
    }

    if let Some(failure) = &report.failure {
        tracing::error!(
            step = %failure.step,
            kind = %failure.kind,
            "❌ deployment failed: {}",
            failure.message
        );
        eprintln!("❌ {}", report.summary_line());
        eprintln!("💡 {}", failure.suggestion);
    }
    std::process::exit(exit_code);
}

async fn run(cli: &CliConfig) -> RunReport {
    let config = match cli.load_deployment() {
        Ok(config) => config,
        Err(e) => return RunReport::failed(None, &StepFailure::new(Step::LoadConfig, e)),
    };

    let platform = match AwsPlatform::connect(cli.region.clone()).await {
        Ok(platform) => platform,
        Err(e) => {
            return RunReport::failed(
                Some(&config.service),
                &StepFailure::new(Step::ConnectPlatform, e),
            )
        }
    };

    let deployer = Deployer::new(
        platform.secrets,
        platform.load_balancing,
        platform.orchestration,
        platform.account,
    );

    match deployer.run(&config).await {
        Ok(summary) => RunReport::succeeded(&config.service, summary),
        Err(failure) => RunReport::failed(Some(&config.service), &failure),
    }
}
