use super::{system_resolver, trim_root, uniqueify};
use crate::error::Result;
use serde::Serialize;
use tracing::{debug, info};

/// MX exchanges of a mail domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MxReport {
    /// Exchange hosts, most preferred first
    pub domains: Vec<String>,
    /// Registrable domains (TLD+1) of the exchanges, first seen first
    pub unique_roots: Vec<String>,
}

/// Look up the MX records of `domain` and collapse them to root domains
///
/// # Errors
///
/// Returns an error if the resolver cannot be set up or the lookup fails
pub async fn mx_lookup(domain: &str) -> Result<MxReport> {
    let resolver = system_resolver()?;
    info!(domain, "resolving MX records");

    let lookup = resolver.mx_lookup(domain).await?;
    let domains = exchange_names(
        lookup
            .iter()
            .map(|mx| (mx.preference(), mx.exchange().to_utf8())),
    );
    debug!(count = domains.len(), "MX exchanges found");

    Ok(MxReport {
        unique_roots: unique_roots(&domains),
        domains,
    })
}

/// Exchange names ordered by preference
///
/// A null MX (exchange `.`) announces that the domain takes no mail and is
/// dropped.
fn exchange_names(records: impl IntoIterator<Item = (u16, String)>) -> Vec<String> {
    let mut exchanges: Vec<(u16, String)> = records
        .into_iter()
        .map(|(preference, exchange)| (preference, trim_root(&exchange)))
        .filter(|(_, name)| !name.is_empty())
        .collect();
    exchanges.sort_by_key(|(preference, _)| *preference);
    exchanges.into_iter().map(|(_, name)| name).collect()
}

/// Effective root domain of every name, deduplicated in first-seen order
///
/// Names the public suffix list cannot place (single labels, bare suffixes)
/// are kept whole.
#[must_use]
pub fn unique_roots(domains: &[String]) -> Vec<String> {
    uniqueify(domains.iter().map(|domain| root_domain(domain)))
}

fn root_domain(domain: &str) -> String {
    let domain = domain.trim_end_matches('.').to_lowercase();
    addr::parse_domain_name(&domain)
        .ok()
        .and_then(|name| name.root().map(str::to_string))
        .unwrap_or_else(|| domain.clone())
}
