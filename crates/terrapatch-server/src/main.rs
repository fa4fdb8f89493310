use clap::Parser;
use std::process::ExitCode;
use terrapatch_server::{Cli, Command, ErrorBody};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so `patch` output on stdout stays clean JSON.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let json_errors = matches!(cli.command, Command::Patch(_));
    let result = match cli.command {
        Command::Serve(args) => terrapatch_server::serve(args.into()).await,
        Command::Patch(args) => terrapatch_server::write_patch(&args, &mut std::io::stdout().lock()),
        Command::Info(args) => terrapatch_server::write_info(&args, &mut std::io::stdout().lock()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            if json_errors {
                if let Ok(body) = serde_json::to_string(&ErrorBody::new(err.to_string())) {
                    println!("{body}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
