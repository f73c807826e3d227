//! Supported UI locales.
//!
//! A locale governs UI text only. It is independent of authentication and of
//! tenant identity, and the same session is valid under every locale.

use serde::{Deserialize, Serialize};

/// Error returned when a locale code is not supported.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale: {0}")]
pub struct LocaleError(pub String);

/// A supported UI locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Brazilian Portuguese.
    #[default]
    Pt,
    /// English.
    En,
    /// Spanish.
    Es,
}

impl Locale {
    /// Every supported locale, in preference order.
    pub const ALL: [Self; 3] = [Self::Pt, Self::En, Self::Es];

    /// The code used in URL prefixes and the locale cookie.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Match an exact locale code (`pt`, `en`, `es`).
    ///
    /// Used for path segments and cookie values, which are always written by
    /// us in canonical form.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.as_str() == code)
    }

    /// Match a BCP 47 language tag by its primary subtag.
    ///
    /// `pt-BR`, `PT`, and `pt_br` all resolve to [`Locale::Pt`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.as_str().eq_ignore_ascii_case(primary))
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| LocaleError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_is_exact() {
        assert_eq!(Locale::from_code("pt"), Some(Locale::Pt));
        assert_eq!(Locale::from_code("PT"), None);
        assert_eq!(Locale::from_code("pt-BR"), None);
        assert_eq!(Locale::from_code(""), None);
    }

    #[test]
    fn test_from_tag_uses_primary_subtag() {
        assert_eq!(Locale::from_tag("pt-BR"), Some(Locale::Pt));
        assert_eq!(Locale::from_tag("EN-us"), Some(Locale::En));
        assert_eq!(Locale::from_tag("es_AR"), Some(Locale::Es));
        assert_eq!(Locale::from_tag("fr-FR"), None);
        assert_eq!(Locale::from_tag(""), None);
    }

    #[test]
    fn test_default_is_portuguese() {
        assert_eq!(Locale::default(), Locale::Pt);
    }
}
