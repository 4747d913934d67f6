//! Per-locale message catalog.
//!
//! Messages live in `messages/{locale}.json`, grouped by namespace, and are
//! embedded in the binary. They are flattened into `namespace.key` tables and
//! checked once at startup: every locale must define the same keys, so a
//! missing translation fails at load instead of at render time.

use crate::catalog::Category;
use crate::locale::{DEFAULT_LOCALE, Locale};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

const BUILTIN_SOURCES: &[(Locale, &str)] = &[
    (Locale::En, include_str!("../messages/en.json")),
    (Locale::Zh, include_str!("../messages/zh.json")),
];

// Category slugs whose message key differs from the slug itself.
const CATEGORY_KEY_OVERRIDES: &[(&str, &str)] = &[("smart-home", "smartHome")];

/// Message key (in the `category` namespace) used to label a category slug.
///
/// Slugs without an override are their own key.
pub fn category_message_key(slug: &str) -> &str {
    CATEGORY_KEY_OVERRIDES
        .iter()
        .find(|(from, _)| *from == slug)
        .map(|(_, to)| *to)
        .unwrap_or(slug)
}

#[derive(Debug)]
/// Flattened message tables for every supported locale.
pub struct Messages {
    default_locale: Locale,
    tables: BTreeMap<Locale, BTreeMap<String, String>>,
}

static MESSAGES: OnceLock<Messages> = OnceLock::new();

/// The process message catalog, loading the built-in tables on first use.
pub fn messages() -> Result<&'static Messages> {
    if let Some(messages) = MESSAGES.get() {
        return Ok(messages);
    }
    let loaded = Messages::builtin()?;
    Ok(MESSAGES.get_or_init(|| loaded))
}

impl Messages {
    /// Load the tables embedded in the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_sources(BUILTIN_SOURCES, DEFAULT_LOCALE)
    }

    /// Parse one JSON document per locale and check key parity.
    pub fn from_sources(sources: &[(Locale, &str)], default_locale: Locale) -> Result<Self> {
        let mut tables = BTreeMap::new();
        for (locale, raw) in sources {
            let value: Value = serde_json::from_str(raw)
                .with_context(|| format!("parsing messages for {}", locale.as_str()))?;
            let mut table = BTreeMap::new();
            flatten_into(&value, String::new(), &mut table)
                .with_context(|| format!("flattening messages for {}", locale.as_str()))?;
            if tables.insert(*locale, table).is_some() {
                bail!("duplicate message table for {}", locale.as_str());
            }
        }

        for locale in Locale::ALL {
            if !tables.contains_key(&locale) {
                bail!("missing message table for {}", locale.as_str());
            }
        }

        let messages = Self {
            default_locale,
            tables,
        };
        messages.check_key_parity()?;
        Ok(messages)
    }

    fn check_key_parity(&self) -> Result<()> {
        let all_keys: BTreeSet<&str> = self
            .tables
            .values()
            .flat_map(|table| table.keys().map(String::as_str))
            .collect();

        let mut errors = Vec::new();
        for (locale, table) in &self.tables {
            for key in &all_keys {
                if !table.contains_key(*key) {
                    errors.push(format!("{} is missing message '{}'", locale.as_str(), key));
                }
            }
        }
        if !errors.is_empty() {
            bail!("message tables are out of sync:\n{}", errors.join("\n"));
        }
        Ok(())
    }

    /// Fail when a catalog category has no label in some locale.
    pub fn ensure_category_labels(&self, categories: &[Category]) -> Result<()> {
        let mut errors = Vec::new();
        for category in categories {
            let key = category_message_key(category.slug.as_str());
            for locale in Locale::ALL {
                if self.get(locale, "category", key).is_none() {
                    errors.push(format!(
                        "{} has no label for category '{}' (key category.{})",
                        locale.as_str(),
                        category.slug.as_str(),
                        key
                    ));
                }
            }
        }
        if !errors.is_empty() {
            bail!("missing category labels:\n{}", errors.join("\n"));
        }
        Ok(())
    }

    pub fn get(&self, locale: Locale, namespace: &str, key: &str) -> Option<&str> {
        self.tables
            .get(&locale)?
            .get(&format!("{namespace}.{key}"))
            .map(String::as_str)
    }

    /// Message text, falling back to the default locale and then to the
    /// dotted key itself.
    pub fn text(&self, locale: Locale, namespace: &str, key: &str) -> String {
        self.get(locale, namespace, key)
            .or_else(|| self.get(self.default_locale, namespace, key))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{namespace}.{key}"))
    }

    /// Message text with `{name}` placeholders substituted in argument order.
    pub fn format(
        &self,
        locale: Locale,
        namespace: &str,
        key: &str,
        args: &[(&str, String)],
    ) -> String {
        let mut text = self.text(locale, namespace, key);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    /// Display label for a category slug.
    pub fn category_label(&self, locale: Locale, slug: &str) -> String {
        self.text(locale, "category", category_message_key(slug))
    }

    /// Number of keys per locale.
    pub fn len(&self) -> usize {
        self.tables
            .get(&self.default_locale)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn flatten_into(value: &Value, prefix: String, out: &mut BTreeMap<String, String>) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(child, path, out)?;
            }
            Ok(())
        }
        Value::String(text) => {
            if prefix.is_empty() || !prefix.contains('.') {
                bail!("message '{prefix}' must live inside a namespace");
            }
            out.insert(prefix, text.clone());
            Ok(())
        }
        other => bail!("message '{prefix}' must be a string, got {other}"),
    }
}
