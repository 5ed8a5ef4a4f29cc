//! Audit the TLS certificates presented by mail servers.
//!
//! The verdict tells an operator whether a certificate is broken, valid for
//! the host they meant to reach, or valid but for other domains. It is
//! advisory and must never replace a fully validating TLS stack.

pub mod cli;
pub mod dns;
pub mod error;
pub mod service;
pub mod tls;

pub use error::{Error, Result};
