//! azion-install - install the Azion CLI

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use installer_cli::{Cli, error_lines};
use installer_cli::ui::Output;
use installer_core::error::EXIT_FAILURE;
use installer_core::{InstallError, Installer, Reporter, SystemHost};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Arc::new(Output::new());

    // Dropping the pipeline future on Ctrl-C drops its workspace, which
    // removes the temporary directory before we exit. The signal branch is
    // polled first so the handler is installed before any work starts and
    // wins when both are ready.
    let result = tokio::select! {
        biased;
        Ok(()) = tokio::signal::ctrl_c() => Err(InstallError::Interrupted.into()),
        result = run(cli, output.clone()) => result,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            for line in error_lines(&err) {
                output.error(&line);
            }
            let code = err
                .downcast_ref::<InstallError>()
                .map_or(EXIT_FAILURE, InstallError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli, output: Arc<Output>) -> anyhow::Result<()> {
    let config = cli.into_config().context("Failed to build configuration")?;
    tracing::debug!(?config, "starting install");

    let installer = Installer::new(config, Arc::new(SystemHost), output);
    installer.run().await?;
    Ok(())
}
