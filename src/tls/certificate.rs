use anyhow::{Result, anyhow};
use x509_parser::{
    extensions::GeneralName,
    prelude::{FromDer, X509Certificate},
};

/// The name-bearing fields of a peer certificate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerCertificate {
    /// DNS-name entries of the subjectAltName extension, in certificate order
    pub subject_alt_names: Vec<String>,
    /// First CN attribute of the subject
    pub common_name: Option<String>,
}

impl PeerCertificate {
    /// Project a DER-encoded certificate onto its name fields
    ///
    /// # Errors
    ///
    /// Returns an error if the certificate or its subjectAltName extension
    /// cannot be parsed
    pub fn from_der(cert_der: &[u8]) -> Result<Self> {
        let (_, cert) = X509Certificate::from_der(cert_der)
            .map_err(|e| anyhow!("failed to parse certificate: {e}"))?;

        let subject_alt_names: Vec<String> = cert
            .subject_alternative_name()
            .map_err(|e| anyhow!("failed to parse subjectAltName: {e}"))?
            .map(|san| {
                san.value
                    .general_names
                    .iter()
                    .filter_map(|name| match name {
                        GeneralName::DNSName(dns) => Some((*dns).to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let common_name = cert
            .subject()
            .iter_common_name()
            .next()
            .and_then(|cn| cn.as_str().ok())
            .map(str::to_string);

        Ok(Self {
            subject_alt_names,
            common_name,
        })
    }

    /// Names the certificate claims, subjectAltName first
    ///
    /// A populated subjectAltName hides the Common Name entirely (RFC 2818
    /// section 3.1). Returns `None` when neither field carries a name.
    #[must_use]
    pub fn names(&self) -> Option<Vec<String>> {
        if !self.subject_alt_names.is_empty() {
            return Some(self.subject_alt_names.clone());
        }

        self.common_name
            .as_ref()
            .filter(|cn| !cn.is_empty())
            .map(|cn| vec![cn.clone()])
    }
}
