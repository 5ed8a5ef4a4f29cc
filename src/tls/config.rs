use std::{path::PathBuf, time::Duration};

/// Trust and deadline settings for a certificate probe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// PEM file with extra trust anchors, added to the bundled `WebPKI` roots
    pub ca: Option<PathBuf>,
    /// Deadline for connect plus handshake, none means wait forever
    pub timeout: Option<Duration>,
}

impl TlsConfig {
    /// Config with a deadline and the bundled roots only
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            ca: None,
            timeout: Some(timeout),
        }
    }
}
