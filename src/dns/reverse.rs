use super::{system_resolver, trim_root, uniqueify};
use crate::error::Result;
use futures::future::try_join_all;
use hickory_resolver::{
    TokioAsyncResolver,
    error::{ResolveError, ResolveErrorKind},
    proto::rr::{RData, RecordType},
};
use serde::Serialize;
use std::net::IpAddr;
use tracing::{debug, info};

/// Where a host name points and what its addresses claim to be
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReverseReport {
    /// First-level CNAME targets
    pub cnames: Vec<String>,
    /// Resolved addresses
    pub ips: Vec<IpAddr>,
    /// PTR names of all addresses, deduplicated
    pub reversed: Vec<String>,
}

/// Resolve `domain` forward, then reverse every address
///
/// # Errors
///
/// Returns an error if the resolver cannot be set up, the address lookup
/// fails, or any reverse lookup fails
pub async fn reverse_lookup(domain: &str) -> Result<ReverseReport> {
    let resolver = system_resolver()?;
    info!(domain, "resolving addresses and CNAMEs");

    let (cnames, ips) = tokio::try_join!(
        resolve_cnames(&resolver, domain),
        resolve_ips(&resolver, domain)
    )?;

    let hostname_lists = try_join_all(ips.iter().map(|ip| reverse_ip(&resolver, *ip))).await?;
    let reversed = uniqueify(hostname_lists.into_iter().flatten());
    debug!(count = reversed.len(), "reverse names found");

    Ok(ReverseReport {
        cnames,
        ips,
        reversed,
    })
}

async fn resolve_cnames(resolver: &TokioAsyncResolver, domain: &str) -> Result<Vec<String>> {
    match resolver.lookup(domain, RecordType::CNAME).await {
        Ok(lookup) => Ok(lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::CNAME(name) => Some(trim_root(&name.to_string())),
                _ => None,
            })
            .collect()),
        Err(err) if is_no_data(&err) => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

async fn resolve_ips(resolver: &TokioAsyncResolver, domain: &str) -> Result<Vec<IpAddr>> {
    let lookup = resolver.lookup_ip(domain).await?;
    Ok(lookup.iter().collect())
}

async fn reverse_ip(resolver: &TokioAsyncResolver, ip: IpAddr) -> Result<Vec<String>> {
    let lookup = resolver.reverse_lookup(ip).await?;
    Ok(lookup
        .iter()
        .map(|name| trim_root(&name.to_string()))
        .collect())
}

/// A name without records of the asked type is an empty answer, not a failure
fn is_no_data(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}
