use anyhow::Result;
use clap::{Parser, error::ErrorKind};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vatverify_core::{Config, ValidationReply, ViesClient};

const USAGE: &str = "usage: vatverify VATID";

#[derive(Parser)]
#[command(name = "vatverify", version)]
#[command(about = "Check an EU VAT number against the VIES registry")]
struct Cli {
    /// Country code followed by the VAT number, e.g. CZ28987373
    #[arg(allow_hyphen_values = true)]
    vat_id: String,
    /// Also print registrant name, address and request date
    #[arg(long)]
    details: bool,
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            println!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("Received an error while validating VAT: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let client = ViesClient::new(Config::default())?;
    let reply = client.lookup(&cli.vat_id)?;
    for line in report_lines(&reply, cli.details) {
        println!("{line}");
    }
    Ok(())
}

/// Outcome line, followed by non-empty registrant fields when `details` is set.
fn report_lines(reply: &ValidationReply, details: bool) -> Vec<String> {
    let mut lines = vec![reply.outcome().to_string()];
    if let (true, Some(result)) = (details, reply.result()) {
        let fields = [
            ("Name", result.name()),
            ("Address", result.address()),
            ("Request date", result.request_date()),
        ];
        lines.extend(
            fields
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(label, value)| format!("{label}: {value}")),
        );
    }
    lines
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
