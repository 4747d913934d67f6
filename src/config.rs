//! Site configuration resolved from the environment.
//!
//! Every setting has a default so the binaries run without any environment
//! at all. Values are read once at startup; nothing re-reads the environment
//! afterwards.

use crate::locale::{DEFAULT_LOCALE, Locale, LocaleRouting};
use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_SITE_URL: &str = "https://skillhub-teal.vercel.app";
pub const DEFAULT_SITE_NAME: &str = "SkillHub";
pub const DEFAULT_PORT: u16 = 3000;

const ENV_SITE_URL: &str = "SKILLHUB_SITE_URL";
const ENV_SITE_NAME: &str = "SKILLHUB_SITE_NAME";
const ENV_CATALOG: &str = "SKILLHUB_CATALOG";
const ENV_DEFAULT_LOCALE: &str = "SKILLHUB_DEFAULT_LOCALE";
const ENV_PORT: &str = "PORT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    /// Absolute site origin without a trailing slash.
    pub site_url: String,
    pub site_name: String,
    /// Catalog file to load instead of the built-in one.
    pub catalog_path: Option<PathBuf>,
    pub default_locale: Locale,
    pub port: u16,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            catalog_path: None,
            default_locale: DEFAULT_LOCALE,
            port: DEFAULT_PORT,
        }
    }
}

impl SiteConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(site_url) = get(ENV_SITE_URL) {
            config.site_url = normalize_site_url(&site_url)?;
        }
        if let Some(site_name) = get(ENV_SITE_NAME) {
            config.site_name = site_name;
        }
        config.catalog_path = get(ENV_CATALOG).map(PathBuf::from);
        if let Some(raw) = get(ENV_DEFAULT_LOCALE) {
            config.default_locale = Locale::parse(&raw)
                .with_context(|| format!("{ENV_DEFAULT_LOCALE}={raw} is not a supported locale"))?;
        }
        if let Some(raw) = get(ENV_PORT) {
            config.port = raw
                .parse()
                .with_context(|| format!("{ENV_PORT}={raw} is not a valid port"))?;
        }

        Ok(config)
    }

    pub fn routing(&self) -> LocaleRouting {
        LocaleRouting::new(self.default_locale)
    }

    /// Absolute URL of a public path.
    pub fn absolute_url(&self, path: &str) -> String {
        if path == "/" {
            self.site_url.clone()
        } else {
            format!("{}{}", self.site_url, path)
        }
    }
}

fn normalize_site_url(raw: &str) -> Result<String> {
    let parsed = url::Url::parse(raw).with_context(|| format!("{ENV_SITE_URL}={raw}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("{ENV_SITE_URL} must be an http(s) URL, got {raw}");
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = SiteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.absolute_url("/"), DEFAULT_SITE_URL);
        assert_eq!(
            config.absolute_url("/zh/skills"),
            format!("{DEFAULT_SITE_URL}/zh/skills")
        );
    }

    #[test]
    fn reads_overrides() {
        let config = SiteConfig::from_lookup(lookup(&[
            ("SKILLHUB_SITE_URL", "https://skills.example.org/"),
            ("SKILLHUB_DEFAULT_LOCALE", "zh-CN"),
            ("SKILLHUB_CATALOG", "/tmp/catalog.json"),
            ("PORT", "8080"),
            ("SKILLHUB_SITE_NAME", "  "),
        ]))
        .unwrap();
        assert_eq!(config.site_url, "https://skills.example.org");
        assert_eq!(config.default_locale, Locale::Zh);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/catalog.json")));
        assert_eq!(config.port, 8080);
        assert_eq!(config.site_name, DEFAULT_SITE_NAME);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(SiteConfig::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
        assert!(SiteConfig::from_lookup(lookup(&[("SKILLHUB_DEFAULT_LOCALE", "fr")])).is_err());
        assert!(SiteConfig::from_lookup(lookup(&[("SKILLHUB_SITE_URL", "ftp://x.org")])).is_err());
    }
}
