pub mod render;
mod run;

use crate::tls::TlsConfig;
use std::str::FromStr;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON document
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

/// Action enum representing each possible command
#[derive(Debug)]
pub enum Action {
    Validate {
        host: String,
        port: u16,
        tls: TlsConfig,
        format: Format,
    },
    Mx {
        domain: String,
        format: Format,
    },
    Reverse {
        domain: String,
        format: Format,
    },
}

impl Action {
    /// Execute the action
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails to execute
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_from_str() {
        assert_eq!("text".parse::<Format>().unwrap(), Format::Text);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn test_format_default() {
        assert_eq!(Format::default(), Format::Text);
    }

    #[test]
    fn test_action_debug() {
        let action = Action::Validate {
            host: "imap.example.com".to_string(),
            port: 993,
            tls: TlsConfig::with_timeout(Duration::from_secs(10)),
            format: Format::Text,
        };

        let debug_str = format!("{action:?}");
        assert!(debug_str.contains("Validate"));
        assert!(debug_str.contains("imap.example.com"));
    }

    #[test]
    fn test_action_with_ca() {
        let action = Action::Validate {
            host: "smtp.example.com".to_string(),
            port: 465,
            tls: TlsConfig {
                ca: Some("/etc/ssl/private-ca.pem".into()),
                timeout: None,
            },
            format: Format::Json,
        };

        match action {
            Action::Validate { tls, format, .. } => {
                assert_eq!(tls.ca, Some("/etc/ssl/private-ca.pem".into()));
                assert_eq!(format, Format::Json);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
