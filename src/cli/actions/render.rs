use super::Format;
use crate::{
    dns::{MxReport, ReverseReport},
    tls::Classification,
};
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

fn json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a certificate verdict
///
/// # Errors
///
/// Returns an error if JSON serialization fails
pub fn classification(result: &Classification, format: Format) -> Result<String> {
    if format == Format::Json {
        return json(result);
    }

    let mut out = format!("result: {}\n", result.status);
    writeln!(out, "  extended status: {}", result.extended_status)?;
    if let Some(domains) = &result.valid_for_domains {
        writeln!(out, "  valid for domains: {}", domains.join(", "))?;
    }
    Ok(out)
}

/// Render an MX report
///
/// # Errors
///
/// Returns an error if JSON serialization fails
pub fn mx(report: &MxReport, format: Format) -> Result<String> {
    if format == Format::Json {
        return json(report);
    }

    let mut out = String::new();
    writeln!(out, "servicing domain: {}", report.unique_roots.join(", "))?;
    writeln!(out, "full domains: {}", report.domains.join(", "))?;
    Ok(out)
}

/// Render a reverse lookup report
///
/// # Errors
///
/// Returns an error if JSON serialization fails
pub fn reverse(report: &ReverseReport, format: Format) -> Result<String> {
    if format == Format::Json {
        return json(report);
    }

    let ips: Vec<String> = report.ips.iter().map(ToString::to_string).collect();
    let mut out = String::new();
    writeln!(out, "cnames: {}", report.cnames.join(", "))?;
    writeln!(out, "ips: {}", ips.join(", "))?;
    writeln!(out, "reversed: {}", report.reversed.join(", "))?;
    Ok(out)
}
