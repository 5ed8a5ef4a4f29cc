//! Error types for certificate probing and DNS lookups.

use std::{io, time::Duration};

use thiserror::Error;

/// Errors that can end a probe or a lookup.
///
/// A certificate that cannot be parsed is not an error: it is reported as an
/// `invalid` classification because the auditor needs to see it.
#[derive(Debug, Error)]
pub enum Error {
    /// The port or service token maps to neither a known service nor a port.
    #[error("bad port: {0}")]
    InvalidPort(String),

    /// The peer closed the transport before presenting a certificate chain.
    #[error("connection to {host}:{port} closed before a certificate was received")]
    ConnectionClosed { host: String, port: u16 },

    /// Connect, read or write failure on the transport.
    #[error("transport error talking to {host}:{port}: {source}")]
    Transport {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// The TLS engine gave up before the certificate chain was inspected.
    #[error("TLS handshake failed: {0}")]
    Handshake(#[from] rustls::Error),

    /// The host cannot be used as a TLS server name.
    #[error("invalid server name: {0}")]
    InvalidServerName(String),

    /// The caller imposed deadline expired.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Trust anchors could not be loaded.
    #[error("certificate error: {0}")]
    Certificate(String),

    /// DNS resolution failed.
    #[error("DNS lookup failed: {0}")]
    Resolve(#[from] hickory_resolver::error::ResolveError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
