use crate::error::{Error, Result};

/// Map a port number or a mail service name to a TCP port
///
/// Known names: `simap`/`imaps` (993), `imap` (143), `pops`/`pop3s`/`spop`
/// (995), `pop`/`pop3` (110), `ssmtp`/`smtps` (465), `smtp`/`submission`
/// (587) and `lowsmtp` (25).
///
/// # Errors
///
/// Returns [`Error::InvalidPort`] if the token is neither a known service nor
/// a port in `1..=65535`
pub fn parse_port_or_service(token: &str) -> Result<u16> {
    let port = match token {
        "simap" | "imaps" => 993,
        "imap" => 143,
        "pops" | "pop3s" | "spop" => 995,
        "pop" | "pop3" => 110,
        "ssmtp" | "smtps" => 465,
        "smtp" | "submission" => 587,
        "lowsmtp" => 25,
        _ => token
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| Error::InvalidPort(token.to_string()))?,
    };

    Ok(port)
}
