/// Compare a server name with one certificate name entry.
///
/// Wildcards are only understood as the exact `*.` prefix, which stands for
/// one whole label: `*.example.com` covers `mail.example.com` but neither
/// `example.com` nor `a.b.example.com`. A `*` anywhere else is an ordinary
/// character, so `ma*.example.com` only matches itself.
///
/// Both sides are compared lower-cased. The function is total.
#[must_use]
pub fn compare_servername(servername: &str, entry: &str) -> bool {
    let servername = servername.to_lowercase();
    let entry = entry.to_lowercase();

    let Some(suffix) = entry.strip_prefix("*.") else {
        return entry == servername;
    };

    // drop the first label of the server name
    servername
        .split_once('.')
        .is_some_and(|(_, rest)| rest == suffix)
}
