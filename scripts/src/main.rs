use std::process;

use clap::Parser;
use marketplace_scripts::{
    cli::{parse_error_exit_code, Cli},
    commands::ScriptContext,
    constants::DEFAULT_LOG_FILTER,
    errors::ScriptError,
    utils::setup_client,
};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = parse_error_exit_code(&e);
            if code == 0 {
                e.exit();
            }

            let _ = e.print();
            process::exit(code);
        }
    };

    if let Err(e) = run(cli).await {
        error!("{e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        network,
        deployments_path,
        artifacts_path,
        project_root,
        skip_compile,
        artifact_names,
        command,
    } = cli;

    let ctx = ScriptContext {
        client: setup_client(&priv_key, &rpc_url)?,
        network,
        deployments_path,
        artifacts_path,
        project_root,
        skip_compile,
        artifact_names,
    };

    command.run(&ctx).await
}
