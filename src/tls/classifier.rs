use super::{certificate::PeerCertificate, matcher::compare_servername};
use serde::Serialize;
use std::fmt;

const NO_VALID_CERTS: &str = "no-valid-certs";

/// Verdict on a certificate for the host the operator meant to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertStatus {
    /// No domain can rely on this certificate (untrusted chain or no names)
    Invalid,
    /// The certificate covers the target host
    Valid,
    /// The certificate is good, but for other domains
    InvalidForThisDomain,
}

impl fmt::Display for CertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Invalid => "invalid",
            Self::Valid => "valid",
            Self::InvalidForThisDomain => "invalid-for-this-domain",
        };
        f.write_str(s)
    }
}

/// What the handshake told us about the presented chain
#[derive(Debug, Clone, Default)]
pub struct VerificationOutcome {
    /// Whether the trust-chain validator accepted the chain, hostname aside
    pub chain_trusted: bool,
    /// Number of certificates the peer presented
    pub depth: usize,
    /// Name fields of the first certificate in the chain
    pub peer_certificate: Option<PeerCertificate>,
}

/// The auditor-facing result of a probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub status: CertStatus,
    pub extended_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_for_domains: Option<Vec<String>>,
}

impl Classification {
    fn invalid() -> Self {
        Self {
            status: CertStatus::Invalid,
            extended_status: NO_VALID_CERTS.to_string(),
            valid_for_domains: None,
        }
    }
}

/// Classify a verification outcome against the host being audited
///
/// `validForDomains` carries every name the certificate declares, not only
/// the ones matching `host`.
#[must_use]
pub fn classify(host: &str, outcome: &VerificationOutcome) -> Classification {
    if !outcome.chain_trusted {
        return Classification::invalid();
    }

    let Some(entries) = outcome
        .peer_certificate
        .as_ref()
        .and_then(PeerCertificate::names)
    else {
        return Classification::invalid();
    };

    let matched: Vec<&str> = entries
        .iter()
        .filter(|entry| compare_servername(host, entry))
        .map(String::as_str)
        .collect();

    let (status, extended_status) = if matched.is_empty() {
        (
            CertStatus::InvalidForThisDomain,
            format!("no entry covers {host}"),
        )
    } else {
        (CertStatus::Valid, format!("matched {}", matched.join(", ")))
    };

    Classification {
        status,
        extended_status,
        valid_for_domains: Some(entries),
    }
}
