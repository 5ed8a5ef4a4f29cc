use super::{TlsConfig, classifier::Classification, driver::Session};
use crate::error::{Error, Result};
use rustls::{RootCertStore, pki_types::CertificateDer};
use rustls_pemfile::certs;
use std::{io::Cursor, path::Path, sync::OnceLock};
use tokio::{fs, net::TcpStream, time};
use tracing::{debug, info};

static CRYPTO_PROVIDER_INIT: OnceLock<()> = OnceLock::new();

/// Ensure the rustls crypto provider is initialized
///
/// This should be called before any TLS operations. It's safe to call
/// multiple times as initialization only happens once.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER_INIT.get_or_init(|| {
        if rustls::crypto::CryptoProvider::get_default().is_some() {
            return;
        }
        if let Err(err) = rustls::crypto::ring::default_provider().install_default() {
            // lost a race with another installer, whose provider is now in place
            debug!("crypto provider already installed: {err:?}");
        }
    });
}

/// Connect to `host:port`, complete a TLS handshake whatever the chain looks
/// like, and classify the certificate against `host`.
///
/// Uses the bundled `WebPKI` roots.
///
/// # Errors
///
/// Returns an error if the connection fails or is closed before the peer
/// presents a certificate
pub async fn validate_server_certificate(host: &str, port: u16) -> Result<Classification> {
    validate_server_certificate_with(host, port, &TlsConfig::default()).await
}

/// Same as [`validate_server_certificate`] with explicit trust anchors and
/// deadline
///
/// # Errors
///
/// Returns an error if the CA file cannot be loaded, the connection fails,
/// the peer hangs up before presenting a certificate or the deadline expires
pub async fn validate_server_certificate_with(
    host: &str,
    port: u16,
    tls: &TlsConfig,
) -> Result<Classification> {
    ensure_crypto_provider();

    let root_store = build_root_store(tls).await?;
    let session = Session::new(host, port, root_store)?;

    let probe = async {
        info!(host, port, "connecting");
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|source| Error::Transport {
                host: host.to_string(),
                port,
                source,
            })?;
        session.run(stream).await
    };

    match tls.timeout {
        Some(limit) => time::timeout(limit, probe)
            .await
            .map_err(|_| Error::Timeout(limit))?,
        None => probe.await,
    }
}

async fn build_root_store(tls: &TlsConfig) -> Result<RootCertStore> {
    let mut root_store: RootCertStore = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    if let Some(ca) = &tls.ca {
        let (added, ignored) = root_store.add_parsable_certificates(load_cert_chain(ca).await?);
        debug!(added, ignored, path = %ca.display(), "loaded extra trust anchors");
        if added == 0 {
            return Err(Error::Certificate(format!(
                "no usable certificates in {}",
                ca.display()
            )));
        }
    }

    Ok(root_store)
}

async fn load_cert_chain(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let data = fs::read(path).await.map_err(|e| {
        Error::Certificate(format!("failed to read certificate {}: {e}", path.display()))
    })?;
    let mut reader = Cursor::new(data);
    let parsed = certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Certificate(format!("invalid certificate PEM: {e}")))?;

    if parsed.is_empty() {
        return Err(Error::Certificate(format!(
            "no certificates found in {}",
            path.display()
        )));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_crypto_provider_init() {
        // Should not panic
        ensure_crypto_provider();
        ensure_crypto_provider(); // Second call should be idempotent
        assert!(rustls::crypto::CryptoProvider::get_default().is_some());
    }

    #[tokio::test]
    async fn test_default_roots_not_empty() {
        let store = build_root_store(&TlsConfig::default()).await.unwrap();
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_ca_file() {
        let tls = TlsConfig {
            ca: Some(PathBuf::from("/nonexistent/mailcert/ca.pem")),
            ..TlsConfig::default()
        };
        let result = build_root_store(&tls).await;
        assert!(matches!(result, Err(Error::Certificate(_))));
    }

    #[tokio::test]
    async fn test_invalid_server_name_fails_before_connecting() {
        let result = validate_server_certificate("not a host", 993).await;
        assert!(matches!(result, Err(Error::InvalidServerName(_))));
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_error() {
        // bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = validate_server_certificate("127.0.0.1", port).await;
        assert!(matches!(result, Err(Error::Transport { .. })));
    }
}
