//! Origin that REST paths are resolved against.

use url::Url;

/// A base URL whose path always ends with `/`.
///
/// `Url::join` drops the last path segment of a base without a trailing
/// slash, so `http://api.local/v1` joined with `auth/login` would lose `v1`.
/// Leading slashes on joined paths are ignored for the same reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Wrap a URL, appending a trailing slash to its path if missing.
    #[must_use]
    pub fn new(mut url: Url) -> Self {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Self(url)
    }

    /// Parse and wrap a URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not an absolute URL.
    pub fn parse(value: &str) -> Result<Self, url::ParseError> {
        Url::parse(value).map(Self::new)
    }

    /// Resolve a relative path below the base.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined.
    pub fn join(&self, path: &str) -> Result<Url, url::ParseError> {
        self.0.join(path.trim_start_matches('/'))
    }

    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Url> for BaseUrl {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_join_keeps_base_path() {
        let base = BaseUrl::parse("http://api.local/v1").unwrap();
        assert_eq!(base.as_str(), "http://api.local/v1/");
        assert_eq!(base.join("auth/login").unwrap().path(), "/v1/auth/login");
        assert_eq!(base.join("/auth/login").unwrap().path(), "/v1/auth/login");
    }

    #[test]
    fn test_root_base() {
        let base = BaseUrl::parse("http://api.local").unwrap();
        assert_eq!(base.join("units").unwrap().as_str(), "http://api.local/units");
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(BaseUrl::parse("/v1").is_err());
    }
}
