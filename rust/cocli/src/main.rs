// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cocli::{run_sign, SignConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// cocli - CoRIM command-line tool
#[derive(Parser, Debug)]
#[command(name = "cocli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// CoRIM manipulation
    Corim {
        #[command(subcommand)]
        command: CorimCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CorimCommands {
    /// Create a signed CoRIM from an unsigned, CBOR-encoded CoRIM using the supplied key
    ///
    /// Optionally include the signing certificate (--cert) and the certificate
    /// chain (--intermediates) in the COSE header.
    Sign(SignConfig),
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Corim {
            command: CorimCommands::Sign(config),
        } => {
            let output = run_sign(&config)?;
            println!(
                ">> {:?} signed and saved to {:?}",
                output.source.display().to_string(),
                output.destination.display().to_string()
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
