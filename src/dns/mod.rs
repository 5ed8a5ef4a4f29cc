//! DNS helpers used to decide which names a mail domain really lives under
//!
//! - `mx` - MX exchanges and their registrable root domains
//! - `reverse` - CNAMEs, addresses and PTR names of a host

pub mod mx;
pub mod reverse;

pub use mx::{MxReport, mx_lookup, unique_roots};
pub use reverse::{ReverseReport, reverse_lookup};

use crate::error::Result;
use hickory_resolver::TokioAsyncResolver;

/// Resolver configured from the system (`/etc/resolv.conf` on unix)
///
/// # Errors
///
/// Returns an error if the system resolver configuration cannot be read
pub fn system_resolver() -> Result<TokioAsyncResolver> {
    Ok(TokioAsyncResolver::tokio_from_system_conf()?)
}

/// Keep the first occurrence of every item, in order
pub(crate) fn uniqueify<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut unique: Vec<String> = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

/// Drop the trailing root label dot of a fully qualified name
pub(crate) fn trim_root(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniqueify_keeps_order() {
        let items = ["b", "a", "b", "c", "a"].map(String::from);
        assert_eq!(uniqueify(items), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_trim_root() {
        assert_eq!(trim_root("mx.example.com."), "mx.example.com");
        assert_eq!(trim_root("mx.example.com"), "mx.example.com");
    }
}
