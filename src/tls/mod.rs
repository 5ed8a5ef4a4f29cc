//! TLS certificate auditing for mail servers
//!
//! Connects to a server, lets the TLS handshake finish whatever the chain
//! looks like, and classifies the presented certificate against the host
//! the operator meant to reach. The verdict is advisory: it is meant for a
//! human auditor, never for an actual trust decision.
//!
//! # Module Organization
//!
//! - `matcher` - Hostname against one certificate name entry
//! - `certificate` - Name fields of a DER certificate
//! - `classifier` - Verification outcome to verdict
//! - `verifier` - Accept-everything verifier that records the verdict
//! - `driver` - Session event loop between transport and TLS engine
//! - `probe` - Public entry points
//! - `config` - Trust anchors and deadline
//!
//! # Example
//!
//! ```rust,ignore
//! use mailcert::tls::{CertStatus, validate_server_certificate};
//!
//! let result = validate_server_certificate("imap.example.com", 993).await?;
//! if result.status == CertStatus::InvalidForThisDomain {
//!     println!("certificate covers {:?}", result.valid_for_domains);
//! }
//! ```

pub mod certificate;
pub mod classifier;
pub mod config;
pub mod driver;
pub mod matcher;
pub mod probe;
pub mod verifier;

// Re-export commonly used types
pub use certificate::PeerCertificate;
pub use classifier::{CertStatus, Classification, VerificationOutcome, classify};
pub use config::TlsConfig;
pub use driver::Session;
pub use matcher::compare_servername;
pub use probe::{
    ensure_crypto_provider, validate_server_certificate, validate_server_certificate_with,
};
pub use verifier::CertCapturingVerifier;
