use clap::Parser;
use gluon_client::app::diagnostics::{run_query, DiagnosticQuery};
use gluon_client::utils::logger;
use gluon_client::{connect, CliConfig, GluonError};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "Gluon request failed: {} (Category: {:?})",
            e,
            e.category()
        );
        tracing::debug!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("Gluon request failed: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(config: &CliConfig) -> Result<(), GluonError> {
    let settings = config.settings()?;
    let client = connect(&settings)?;
    let query = DiagnosticQuery::from(&config.command);

    let output = run_query(&client, &query).await?;
    println!("{}", output);
    Ok(())
}
