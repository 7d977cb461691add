//! Command line front end for Kinetic search urls.
//!
//! `kinetic url form.json` prints the url for a form given as JSON (`-` reads
//! stdin). `kinetic serve` accepts browser form posts and redirects them to
//! the search endpoint, or reports the url when running as a dry run.

use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kinetic::error::Result;
use kinetic::form::FormData;
use kinetic::serializer::FormQuerySerializer;
use kinetic::server::{AppState, router};
use kinetic::settings::Settings;

#[derive(Parser)]
#[command(name = "kinetic", version, about = "Builds Kinetic search urls from submitted forms")]
struct Cli {
    /// Settings file; defaults to an optional kinetic.{toml,json,yaml} in the working directory
    #[arg(short, long, env = "KINETIC_CONFIG_FILE")]
    config: Option<String>,
    /// Report urls instead of redirecting to them
    #[arg(long)]
    dry_run: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve form posts over HTTP
    Serve {
        /// Address to listen on, overrides the settings
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the url for a JSON encoded form
    Url {
        /// Path to the form, or - for stdin
        form: String,
    },
}

fn read_form(source: &str) -> Result<FormData> {
    let mut json = String::new();
    if source == "-" {
        std::io::stdin().read_to_string(&mut json)?;
    } else {
        json = std::fs::read_to_string(source)?;
    }
    FormData::from_json(&json)
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.server.dry_run |= cli.dry_run;
    let serializer = FormQuerySerializer::from_settings(&settings);
    match cli.command {
        Command::Url { form } => {
            let form = read_form(&form)?;
            let submission = serializer.submit(&form, settings.server.dry_run)?;
            info!(fields = form.len(), dry_run = submission.is_dry_run(), "url built");
            println!("{}", submission.url());
        }
        Command::Serve { bind } => {
            let bind = bind.unwrap_or(settings.server.bind);
            let state = Arc::new(AppState { serializer, dry_run: settings.server.dry_run });
            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!(address = %bind, dry_run = state.dry_run, "listening for search forms");
            axum::serve(listener, router(state)).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "kinetic failed");
            ExitCode::FAILURE
        }
    }
}
