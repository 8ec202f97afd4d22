//! Authenticated remote URLs.

use tagpush_config::Credentials;
use tracing::debug;
use url::Url;

/// Embeds the username and token into the repository URL.
///
/// Both values are percent-encoded into the authority, so
/// `https://host/repo.git` with `a@b.com` / `T` becomes
/// `https://a%40b.com:T@host/repo.git`. Credentials already present in the
/// URL (Bitbucket clone URLs carry `user@`) are replaced, not prefixed.
///
/// Non-HTTP remotes such as local paths or `ssh://` URLs are returned as-is.
#[must_use]
pub fn authenticated_url(credentials: &Credentials) -> String {
    let raw = credentials.repository_url.trim();

    let Ok(mut url) = Url::parse(raw) else {
        debug!("repository url is not a URL, using it verbatim");
        return raw.to_string();
    };

    if !matches!(url.scheme(), "http" | "https") {
        debug!(scheme = url.scheme(), "no credentials embedded for scheme");
        return raw.to_string();
    }

    if url.set_username(&credentials.username).is_err()
        || url.set_password(Some(&credentials.access_token)).is_err()
    {
        debug!("repository url cannot carry credentials, using it verbatim");
        return raw.to_string();
    }

    url.into()
}
