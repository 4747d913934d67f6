//! schema.org JSON-LD descriptors for search engines.
//!
//! Everything here is derived from the catalog and site configuration; the
//! builders return `serde_json::Value` ready to embed in a
//! `<script type="application/ld+json">` block.

use crate::catalog::{CatalogIndex, Skill};
use crate::config::SiteConfig;
use crate::locale::Locale;
use crate::routes::Route;
use serde_json::{Value, json};

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// A named link used by breadcrumb and item lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedItem {
    pub name: String,
    pub url: String,
}

/// Site identity plus the search action template.
pub fn website(config: &SiteConfig, description: &str) -> Value {
    let search = Route::Search {
        query: String::new(),
    };
    let search_url = config.absolute_url(&search.path());
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "WebSite",
        "name": config.site_name,
        "description": description,
        "url": config.site_url,
        "potentialAction": {
            "@type": "SearchAction",
            "target": {
                "@type": "EntryPoint",
                "urlTemplate": format!("{search_url}?q={{search_term_string}}"),
            },
            "query-input": "required name=search_term_string",
        },
    })
}

/// Detail-page descriptor for one skill.
///
/// `aggregateRating` is only emitted for rated skills.
pub fn software_application(skill: &Skill, url: &str) -> Value {
    let mut value = json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "SoftwareApplication",
        "name": skill.name,
        "description": skill.description,
        "url": url,
        "applicationCategory": "AI Agent Skill",
        "operatingSystem": "Any",
        "author": {
            "@type": "Person",
            "name": skill.author,
        },
        "offers": {
            "@type": "Offer",
            "price": "0",
            "priceCurrency": "USD",
        },
        "datePublished": skill.created_at,
        "dateModified": skill.updated_at,
    });
    if skill.rating > 0.0 {
        value["aggregateRating"] = json!({
            "@type": "AggregateRating",
            "ratingValue": skill.rating,
            "ratingCount": skill.rating_count,
            "bestRating": 5,
            "worstRating": 1,
        });
    }
    value
}

pub fn breadcrumb_list(items: &[LinkedItem]) -> Value {
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items
            .iter()
            .enumerate()
            .map(|(idx, item)| json!({
                "@type": "ListItem",
                "position": idx + 1,
                "name": item.name,
                "item": item.url,
            }))
            .collect::<Vec<_>>(),
    })
}

/// Ordered list descriptor with 1-based positions.
pub fn item_list(name: &str, description: &str, items: &[LinkedItem]) -> Value {
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "ItemList",
        "name": name,
        "description": description,
        "numberOfItems": items.len(),
        "itemListElement": items
            .iter()
            .enumerate()
            .map(|(idx, item)| json!({
                "@type": "ListItem",
                "position": idx + 1,
                "name": item.name,
                "url": item.url,
            }))
            .collect::<Vec<_>>(),
    })
}

/// Item list of the featured skills, linked in `locale`.
pub fn featured_item_list(
    catalog: &CatalogIndex,
    config: &SiteConfig,
    locale: Locale,
    name: &str,
    description: &str,
) -> Value {
    let routing = config.routing();
    let items: Vec<LinkedItem> = catalog
        .featured_skills()
        .into_iter()
        .map(|skill| LinkedItem {
            name: skill.name.clone(),
            url: config.absolute_url(
                &Route::Skill {
                    slug: skill.slug.0.clone(),
                }
                .href(&routing, locale),
            ),
        })
        .collect();
    item_list(name, description, &items)
}
