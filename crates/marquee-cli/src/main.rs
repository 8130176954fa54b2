//! `marquee` binary.

use std::{io::Write, process::ExitCode};

use clap::Parser;
use marquee_app::Runtime;
use marquee_cli::{
    CliError, TerminalDriver,
    logging::{self, LogFormat},
};
use marquee_client::{ClientConfig, DEFAULT_SERVER, HttpAuthority};
use tokio::io::BufReader;

/// Operator console for live-video overlays.
#[derive(Debug, Parser)]
#[command(name = "marquee", version, about)]
struct Args {
    /// Overlay authority base URL.
    #[arg(long, env = "MARQUEE_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// Log level when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = logging::init_logging(&args.log_level, args.log_format) {
        let _ = writeln!(std::io::stderr(), "marquee: {error}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "marquee stopped");
            ExitCode::FAILURE
        },
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let config = ClientConfig::new(&args.server)?;
    let authority = HttpAuthority::new(config.clone())?;
    tracing::info!(server = %config.base_url(), "marquee starting");

    let driver = TerminalDriver::new(BufReader::new(tokio::io::stdin()), std::io::stdout());
    let mut runtime = Runtime::new(driver, authority, config);
    runtime.run().await?;

    tracing::info!("marquee stopped");
    Ok(())
}
