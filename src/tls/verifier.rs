use super::{
    certificate::PeerCertificate,
    classifier::{Classification, VerificationOutcome, classify},
};
use anyhow::{Result, anyhow};
use rustls::{
    CertificateError, DigitallySignedStruct, Error as TlsError, RootCertStore, SignatureScheme,
    client::{
        WebPkiServerVerifier,
        danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier},
    },
    pki_types::{CertificateDer, ServerName, UnixTime},
};
use std::{
    fmt,
    sync::{Arc, OnceLock},
};
use tracing::{debug, info, warn};

/// One-shot cell holding the verdict of a session
pub type Verdict = Arc<OnceLock<Classification>>;

/// A certificate verifier that lets every handshake proceed and records what
/// a strict validator would have thought of the chain.
///
/// The trust decision is taken by rustls's `WebPkiServerVerifier`, but its
/// answer never reaches the engine: `verify_server_cert` always accepts so
/// the chain can be inspected. The untouched outcome is classified against
/// the audited host and stored in a [`Verdict`] that can be settled once.
///
/// # Security
///
/// - Bypasses certificate validation on purpose
/// - Never use it for a connection that carries data
#[derive(Clone)]
pub struct CertCapturingVerifier {
    /// Host the operator meant to reach
    host: String,
    /// Settled by the first `verify_server_cert` call, later calls are ignored
    verdict: Verdict,
    /// Validator used only to compute chain trust
    inner_verifier: Arc<WebPkiServerVerifier>,
}

impl fmt::Debug for CertCapturingVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertCapturingVerifier")
            .field("host", &self.host)
            .field("verdict", &self.verdict)
            .field("inner_verifier", &"WebPkiServerVerifier")
            .finish()
    }
}

impl CertCapturingVerifier {
    /// Create a verifier for `host` with the given trust anchors
    ///
    /// # Errors
    ///
    /// Returns an error if the `WebPKI` verifier cannot be built
    pub fn new(host: &str, root_store: RootCertStore) -> Result<Self> {
        let inner_verifier = WebPkiServerVerifier::builder(Arc::new(root_store))
            .build()
            .map_err(|e| anyhow!("failed to build WebPKI verifier: {e}"))?;

        Ok(Self {
            host: host.to_string(),
            verdict: Arc::new(OnceLock::new()),
            inner_verifier,
        })
    }

    /// Handle on the verdict cell, shared with the session driver
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Arc::clone(&self.verdict)
    }

    /// The answer given to the TLS engine, whatever the chain looks like
    #[must_use]
    pub fn accept_override() -> ServerCertVerified {
        ServerCertVerified::assertion()
    }

    /// Run the real chain validation and reduce it to a boolean
    ///
    /// A name mismatch alone still counts as a trusted chain: hostname
    /// policy belongs to the classifier.
    fn chain_trusted(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> bool {
        match self.inner_verifier.verify_server_cert(
            end_entity,
            intermediates,
            server_name,
            ocsp_response,
            now,
        ) {
            Ok(_)
            | Err(TlsError::InvalidCertificate(
                CertificateError::NotValidForName | CertificateError::NotValidForNameContext { .. },
            )) => true,
            Err(err) => {
                debug!(host = %self.host, error = %err, "certificate chain not trusted");
                false
            }
        }
    }

    /// Store the verdict unless one was already recorded
    fn settle(&self, outcome: &VerificationOutcome) {
        let classification = classify(&self.host, outcome);
        if self.verdict.set(classification).is_err() {
            debug!(host = %self.host, "verdict already settled, ignoring certificate callback");
        } else {
            info!(host = %self.host, depth = outcome.depth, "certificate chain classified");
        }
    }
}

impl ServerCertVerifier for CertCapturingVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        if self.verdict.get().is_none() {
            let chain_trusted =
                self.chain_trusted(end_entity, intermediates, server_name, ocsp_response, now);

            let peer_certificate = match PeerCertificate::from_der(end_entity.as_ref()) {
                Ok(cert) => Some(cert),
                Err(err) => {
                    warn!(host = %self.host, error = %err, "unreadable peer certificate");
                    None
                }
            };

            self.settle(&VerificationOutcome {
                chain_trusted,
                depth: intermediates.len() + 1,
                peer_certificate,
            });
        }

        Ok(Self::accept_override())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner_verifier.supported_verify_schemes()
    }
}
