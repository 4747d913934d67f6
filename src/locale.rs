//! Locale-prefixed path resolution.
//!
//! Paths follow an "as needed" prefix policy: the default locale is never
//! written as a path prefix, every other locale always is. Resolution never
//! fails; a first segment that is not a supported locale is simply part of
//! the logical path.

use serde::{Deserialize, Serialize};

/// Supported display languages.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Zh,
}

/// Default locale when neither the path nor configuration says otherwise.
pub const DEFAULT_LOCALE: Locale = Locale::En;

impl Locale {
    /// Every supported locale in presentation order.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Zh];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }

    /// Name of the language in that language, for the language switcher.
    pub fn display_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Zh => "中文",
        }
    }

    /// Exact match of a path segment against the supported set.
    pub fn from_segment(segment: &str) -> Option<Self> {
        Locale::ALL
            .into_iter()
            .find(|locale| locale.as_str() == segment)
    }

    /// Lenient parse for configuration and headers: case-insensitive, and
    /// region tags are ignored (`zh-CN` is `zh`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        Locale::from_segment(lang)
    }
}

/// A request path split into its locale and the locale-free logical path.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResolvedPath {
    pub locale: Locale,
    pub path: String,
}

/// Locale set plus default, driving path resolution and link generation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocaleRouting {
    default_locale: Locale,
}

impl Default for LocaleRouting {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl LocaleRouting {
    pub fn new(default_locale: Locale) -> Self {
        Self { default_locale }
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    pub fn locales(&self) -> &'static [Locale] {
        &Locale::ALL
    }

    /// Split `path` into (locale, logical path).
    ///
    /// A leading supported-locale segment selects that locale and is removed;
    /// otherwise the default locale applies and the whole path is logical.
    pub fn resolve(&self, path: &str) -> ResolvedPath {
        let normalized = normalize_path(path);
        let rest = &normalized[1..];
        let (segment, remainder) = match rest.find('/') {
            Some(pos) => (&rest[..pos], &rest[pos..]),
            None => (rest, ""),
        };

        match Locale::from_segment(segment) {
            Some(locale) => ResolvedPath {
                locale,
                path: if remainder.is_empty() {
                    "/".to_string()
                } else {
                    remainder.to_string()
                },
            },
            None => ResolvedPath {
                locale: self.default_locale,
                path: normalized,
            },
        }
    }

    /// Build the public path of `logical_path` in `locale`.
    pub fn localize(&self, locale: Locale, logical_path: &str) -> String {
        let path = normalize_path(logical_path);
        if locale == self.default_locale {
            path
        } else if path == "/" {
            format!("/{}", locale.as_str())
        } else {
            format!("/{}{}", locale.as_str(), path)
        }
    }

    /// The same page as `path`, in `target`.
    pub fn switch_locale(&self, path: &str, target: Locale) -> String {
        let resolved = self.resolve(path);
        self.localize(target, &resolved.path)
    }

    /// Public path of `logical_path` in every supported locale.
    pub fn alternates(&self, logical_path: &str) -> Vec<(Locale, String)> {
        Locale::ALL
            .into_iter()
            .map(|locale| (locale, self.localize(locale, logical_path)))
            .collect()
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_prefixed_and_bare_paths() {
        let routing = LocaleRouting::default();
        assert_eq!(
            routing.resolve("/zh/skills/weather"),
            ResolvedPath {
                locale: Locale::Zh,
                path: "/skills/weather".to_string()
            }
        );
        assert_eq!(routing.resolve("/zh").path, "/");
        assert_eq!(routing.resolve("/zh/").path, "/");
        assert_eq!(
            routing.resolve("/skills"),
            ResolvedPath {
                locale: Locale::En,
                path: "/skills".to_string()
            }
        );
        assert_eq!(routing.resolve("").path, "/");
    }

    #[test]
    fn unknown_segment_falls_back_to_default() {
        let routing = LocaleRouting::default();
        let resolved = routing.resolve("/fr/skills");
        assert_eq!(resolved.locale, Locale::En);
        assert_eq!(resolved.path, "/fr/skills");

        let resolved = routing.resolve("/ZH/skills");
        assert_eq!(resolved.locale, Locale::En);
        assert_eq!(resolved.path, "/ZH/skills");
    }

    #[test]
    fn explicit_default_prefix_is_still_understood() {
        let routing = LocaleRouting::default();
        let resolved = routing.resolve("/en/submit");
        assert_eq!(resolved.locale, Locale::En);
        assert_eq!(resolved.path, "/submit");
    }

    #[test]
    fn localize_omits_default_prefix_only() {
        let routing = LocaleRouting::default();
        assert_eq!(routing.localize(Locale::En, "/skills"), "/skills");
        assert_eq!(routing.localize(Locale::En, "/"), "/");
        assert_eq!(routing.localize(Locale::Zh, "/skills"), "/zh/skills");
        assert_eq!(routing.localize(Locale::Zh, "/"), "/zh");
        assert_eq!(routing.localize(Locale::Zh, "submit"), "/zh/submit");

        let zh_default = LocaleRouting::new(Locale::Zh);
        assert_eq!(zh_default.localize(Locale::Zh, "/skills"), "/skills");
        assert_eq!(zh_default.localize(Locale::En, "/skills"), "/en/skills");
    }

    #[test]
    fn switch_keeps_logical_path() {
        let routing = LocaleRouting::default();
        assert_eq!(
            routing.switch_locale("/categories/data", Locale::Zh),
            "/zh/categories/data"
        );
        assert_eq!(
            routing.switch_locale("/zh/categories/data", Locale::En),
            "/categories/data"
        );
    }

    #[test]
    fn lenient_parse_accepts_region_tags() {
        assert_eq!(Locale::parse("zh-CN"), Some(Locale::Zh));
        assert_eq!(Locale::parse(" EN_us "), Some(Locale::En));
        assert_eq!(Locale::parse("fr"), None);
        assert_eq!(Locale::parse(""), None);
    }
}
