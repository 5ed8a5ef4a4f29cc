use crate::{
    cli::actions::{Action, Format},
    service::parse_port_or_service,
    tls::TlsConfig,
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use std::{path::PathBuf, time::Duration};

/// Extract the output format shared by every subcommand
fn extract_format(matches: &ArgMatches) -> Result<Format> {
    matches
        .get_one::<String>("format")
        .map_or(Ok(Format::Text), |f| f.parse::<Format>().map_err(|e| anyhow!(e)))
}

/// Extract probe settings, a zero timeout means no deadline
fn extract_tls_config(matches: &ArgMatches) -> TlsConfig {
    let timeout = matches
        .get_one::<u64>("timeout")
        .copied()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    let ca = matches.get_one::<String>("ca").map(PathBuf::from);

    TlsConfig { ca, timeout }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("{name} is required"))
}

/// Number of `-v` flags, wherever they were given
#[must_use]
pub fn extract_verbosity(matches: &ArgMatches) -> u8 {
    matches
        .subcommand()
        .map_or(matches, |(_, sub)| sub)
        .get_count("verbose")
}

/// Convert `ArgMatches` into typed Action enum with validation
///
/// # Errors
///
/// Returns an error if the port is invalid or required parameters are missing
pub fn dispatch(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("validate", sub)) => {
            let host = required(sub, "mailhost")?.clone();
            let port = parse_port_or_service(required(sub, "port-or-service")?)?;

            Ok(Action::Validate {
                host,
                port,
                tls: extract_tls_config(sub),
                format: extract_format(sub)?,
            })
        }
        Some(("mx", sub)) => Ok(Action::Mx {
            domain: required(sub, "domain")?.clone(),
            format: extract_format(sub)?,
        }),
        Some(("reverse", sub)) => Ok(Action::Reverse {
            domain: required(sub, "domain")?.clone(),
            format: extract_format(sub)?,
        }),
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("a command is required")),
    }
}
