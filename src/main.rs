#[cfg(feature = "cli")]
use std::process::ExitCode;

#[cfg(feature = "cli")]
use clap::{CommandFactory, Parser};

#[cfg(feature = "cli")]
use github_commenter::cli::Cli;
#[cfg(feature = "cli")]
use github_commenter::utils::StdEnvProvider;
#[cfg(feature = "cli")]
use github_commenter::{CommenterError, Configuration, run};

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = cli.verbose.log_level_filter();
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Off) // Turn off all logs by default
        .filter(Some("github_commenter"), log_level) // Allow logs from this crate
        .filter(Some("octocrab"), log_level) // Allow logs from octocrab
        .init();

    let options = cli.options(&StdEnvProvider);
    let result = match Configuration::from_options(options) {
        Ok(configuration) => run(&configuration, std::io::stdin().lock()).await,
        Err(e) => Err(CommenterError::from(e)),
    };

    match result {
        Ok(outcome) => {
            log::debug!("github-commenter: {}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            if e.is_usage_error() {
                eprintln!("{}", Cli::command().render_help());
            }
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    println!("CLI feature not enabled. Build with --features cli to use the CLI.");
}
