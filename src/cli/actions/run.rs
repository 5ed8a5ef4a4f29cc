use super::{Action, render};
use crate::{
    dns::{mx_lookup, reverse_lookup},
    tls::validate_server_certificate_with,
};
use anyhow::Context;

/// Execute the action's business logic by delegating to the appropriate module
pub async fn execute(action: Action) -> anyhow::Result<()> {
    let output = match action {
        Action::Validate {
            host,
            port,
            tls,
            format,
        } => {
            let result = validate_server_certificate_with(&host, port, &tls)
                .await
                .with_context(|| format!("failed to validate certificate of {host}:{port}"))?;
            render::classification(&result, format)?
        }
        Action::Mx { domain, format } => {
            let report = mx_lookup(&domain)
                .await
                .with_context(|| format!("MX lookup for {domain} failed"))?;
            render::mx(&report, format)?
        }
        Action::Reverse { domain, format } => {
            let report = reverse_lookup(&domain)
                .await
                .with_context(|| format!("reverse lookup for {domain} failed"))?;
            render::reverse(&report, format)?
        }
    };

    print!("{output}");
    Ok(())
}
