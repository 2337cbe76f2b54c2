//! Switch Album Import - CLI entry point.

use std::process::ExitCode;

use clap::error::ErrorKind;
use tracing_subscriber::{fmt, EnvFilter};

use switch_album_import::{
    cli::{Args, USAGE},
    config::{validate_config, Config, RestoreMode},
    download::{self, DownloadState},
    error::{exit_codes, Result},
    output::{print_config_summary, print_error, print_run_summary, print_warning},
    wifi::NmcliBackend,
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse_normalized(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                    ExitCode::from(exit_codes::SUCCESS)
                }
                _ => {
                    let _ = e.print();
                    ExitCode::from(exit_codes::FAILURE)
                }
            };
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(e) => {
            if e.is_usage_error() {
                print_usage();
            }
            print_error(&format!("{}", e));
            ExitCode::from(exit_codes::FAILURE)
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Load configuration, then let the CLI override it
    let mut config = Config::load_or_default(args.config.as_deref())?;
    args.merge_into_config(&mut config);

    validate_config(&config)?;

    print_config_summary(
        &config.hotspot.ssid,
        &config.output_dir()?.display().to_string(),
        &config.options.gateway,
        &config.options.restore_mode.to_string(),
    );

    if config.options.restore_mode == RestoreMode::Disassociate {
        print_warning("The radio will not be power-cycled; the OS may not rejoin your usual network");
    }

    let mut state = DownloadState::new();
    let result = download::run(&config, NmcliBackend::new(), &mut state).await;
    print_run_summary(&state);

    result
}

fn print_usage() {
    println!("Usage: {}", USAGE);
}
