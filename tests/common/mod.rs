#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use mailcert::tls::{TlsConfig, ensure_crypto_provider};
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyPair, KeyUsagePurpose,
};
use std::{io::Write, net::SocketAddr, sync::Arc, time::Duration};
use tempfile::NamedTempFile;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};
use tokio_rustls::{
    TlsAcceptor,
    rustls::{
        ServerConfig, SupportedProtocolVersion,
        pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer},
        version::{TLS12, TLS13},
    },
};

/// Certificate material served by a test server
pub struct TestPki {
    /// PEM of the issuing CA, empty for self-signed leaves
    pub ca_pem: String,
    pub chain: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
}

fn distinguished_name(cn: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, cn);
    dn.push(DnType::OrganizationName, "mailcert tests");
    dn
}

/// Leaf for `sans` signed by a fresh private CA
pub fn ca_signed(sans: &[&str]) -> TestPki {
    ca_signed_with(sans, |_| {})
}

/// Like [`ca_signed`], with `configure` adjusting the leaf before signing
pub fn ca_signed_with(sans: &[&str], configure: impl FnOnce(&mut CertificateParams)) -> TestPki {
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    ca_params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
        KeyUsagePurpose::DigitalSignature,
    ];
    ca_params.distinguished_name = distinguished_name("mailcert test CA");
    let ca_key = KeyPair::generate().unwrap();
    let ca_cert = ca_params.self_signed(&ca_key).unwrap();

    let sans: Vec<String> = sans.iter().map(ToString::to_string).collect();
    let mut leaf_params = CertificateParams::new(sans).unwrap();
    leaf_params.distinguished_name = distinguished_name("mailcert test leaf");
    leaf_params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
    configure(&mut leaf_params);
    let leaf_key = KeyPair::generate().unwrap();
    let leaf = leaf_params.signed_by(&leaf_key, &ca_cert, &ca_key).unwrap();

    TestPki {
        ca_pem: ca_cert.pem(),
        chain: vec![leaf.der().clone(), ca_cert.der().clone()],
        key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
    }
}

/// Self-signed leaf for `sans`
pub fn self_signed(sans: &[&str]) -> TestPki {
    let sans: Vec<String> = sans.iter().map(ToString::to_string).collect();
    let mut params = CertificateParams::new(sans).unwrap();
    params.distinguished_name = distinguished_name("mailcert self-signed");
    let key = KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();

    TestPki {
        ca_pem: String::new(),
        chain: vec![cert.der().clone()],
        key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.serialize_der())),
    }
}

/// Write the CA of `pki` to a temporary PEM file
pub fn ca_file(pki: &TestPki) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(pki.ca_pem.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Probe settings trusting the CA in `file` with a short deadline
pub fn trusting(file: &NamedTempFile) -> TlsConfig {
    TlsConfig {
        ca: Some(file.path().to_path_buf()),
        timeout: Some(Duration::from_secs(5)),
    }
}

/// Serve `pki` over TLS on a loopback port until the test ends
pub async fn spawn_tls_server(pki: TestPki) -> SocketAddr {
    spawn_tls_server_with_versions(pki, &[&TLS13, &TLS12]).await
}

/// Serve `pki` offering only the given protocol `versions`
pub async fn spawn_tls_server_with_versions(
    pki: TestPki,
    versions: &[&'static SupportedProtocolVersion],
) -> SocketAddr {
    ensure_crypto_provider();

    let config = ServerConfig::builder_with_protocol_versions(versions)
        .with_no_client_auth()
        .with_single_cert(pki.chain, pki.key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                // the probe hangs up mid-handshake, errors are expected
                let _ = acceptor.accept(stream).await;
            });
        }
    });

    addr
}

/// Accept connections, read the ClientHello, then close without answering
pub async fn spawn_hangup_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 16 * 1024];
                let _ = stream.read(&mut buf).await;
                let _ = stream.shutdown().await;
                // drain until the client goes away so no reset is sent
                while let Ok(n) = stream.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    addr
}

/// Accept connections and never say a word
pub async fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 16 * 1024];
                while let Ok(n) = stream.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    addr
}
