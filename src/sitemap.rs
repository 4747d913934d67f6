//! Crawler site index.
//!
//! One entry per locale for each static page, each category and each skill.
//! Skill entries carry the skill's `updatedAt`; every other entry is stamped
//! with the generation time.

use crate::catalog::CatalogIndex;
use crate::config::SiteConfig;
use crate::locale::Locale;
use crate::routes::Route;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: String,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

fn static_pages() -> [(Route, ChangeFrequency, f32); 3] {
    [
        (Route::Home, ChangeFrequency::Daily, 1.0),
        (Route::Skills { order: None }, ChangeFrequency::Daily, 0.9),
        (Route::Submit, ChangeFrequency::Monthly, 0.7),
    ]
}

const CATEGORY_PRIORITY: f32 = 0.8;
const SKILL_PRIORITY: f32 = 0.6;

/// Enumerate every indexable page.
pub fn build_sitemap(
    catalog: &CatalogIndex,
    config: &SiteConfig,
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let routing = config.routing();
    let generated = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let url_for = |route: &Route, locale: Locale| config.absolute_url(&route.href(&routing, locale));

    let mut entries = Vec::new();

    for locale in Locale::ALL {
        for (route, change_frequency, priority) in static_pages() {
            entries.push(SitemapEntry {
                url: url_for(&route, locale),
                last_modified: generated.clone(),
                change_frequency,
                priority,
            });
        }
    }

    for locale in Locale::ALL {
        for category in catalog.categories() {
            let route = Route::Category {
                slug: category.slug.0.clone(),
            };
            entries.push(SitemapEntry {
                url: url_for(&route, locale),
                last_modified: generated.clone(),
                change_frequency: ChangeFrequency::Weekly,
                priority: CATEGORY_PRIORITY,
            });
        }
    }

    for locale in Locale::ALL {
        for skill in catalog.skills() {
            let route = Route::Skill {
                slug: skill.slug.0.clone(),
            };
            entries.push(SitemapEntry {
                url: url_for(&route, locale),
                last_modified: skill_last_modified(&skill.updated_at, &generated),
                change_frequency: ChangeFrequency::Weekly,
                priority: SKILL_PRIORITY,
            });
        }
    }

    entries
}

fn skill_last_modified(updated_at: &str, fallback: &str) -> String {
    let date_part = updated_at.get(..10).unwrap_or(updated_at);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(err) => {
            tracing::warn!(updated_at, %err, "unparseable updatedAt; using generation time");
            fallback.to_string()
        }
    }
}

/// Render entries as a sitemaps.org `urlset` document.
pub fn render_sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>",
            escape_xml(&entry.url),
            escape_xml(&entry.last_modified),
            entry.change_frequency.as_str(),
            entry.priority
        );
    }
    out.push_str("</urlset>\n");
    out
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
