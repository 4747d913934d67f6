//! Typed routing surface.
//!
//! A request path is first split by the locale resolver; the logical path and
//! query string are then matched against the site's fixed set of pages.
//! Anything else is `Route::NotFound`, never an error.

use crate::locale::{Locale, LocaleRouting};
use serde::Serialize;
use url::form_urlencoded;

/// Listing hint accepted by `/skills?filter=` or `/skills?sort=`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingOrder {
    Featured,
    Popular,
    Recent,
}

impl ListingOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingOrder::Featured => "featured",
            ListingOrder::Popular => "popular",
            ListingOrder::Recent => "recent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "featured" => Some(ListingOrder::Featured),
            "popular" => Some(ListingOrder::Popular),
            "recent" => Some(ListingOrder::Recent),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Route {
    Home,
    Skills { order: Option<ListingOrder> },
    Skill { slug: String },
    Category { slug: String },
    Search { query: String },
    Submit,
    NotFound { path: String },
}

/// A fully resolved page request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PageRequest {
    pub locale: Locale,
    pub route: Route,
}

impl Route {
    /// Match a locale-free path plus optional raw query string.
    pub fn parse(logical_path: &str, query: Option<&str>) -> Route {
        let segments: Vec<&str> = logical_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["skills"] => Route::Skills {
                order: query_value(query, "filter")
                    .and_then(|value| ListingOrder::parse(&value))
                    .or_else(|| {
                        query_value(query, "sort").and_then(|value| ListingOrder::parse(&value))
                    }),
            },
            ["skills", slug] => Route::Skill {
                slug: slug.to_string(),
            },
            ["categories", slug] => Route::Category {
                slug: slug.to_string(),
            },
            ["search"] => Route::Search {
                query: query_value(query, "q").unwrap_or_default(),
            },
            ["submit"] => Route::Submit,
            _ => Route::NotFound {
                path: logical_path.to_string(),
            },
        }
    }

    /// Locale-free path (with query string, when the route carries one).
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Skills { order: None } => "/skills".to_string(),
            Route::Skills { order: Some(order) } => {
                format!("/skills?{}", encode_pair("filter", order.as_str()))
            }
            Route::Skill { slug } => format!("/skills/{slug}"),
            Route::Category { slug } => format!("/categories/{slug}"),
            Route::Search { query } if query.is_empty() => "/search".to_string(),
            Route::Search { query } => format!("/search?{}", encode_pair("q", query)),
            Route::Submit => "/submit".to_string(),
            Route::NotFound { path } => path.clone(),
        }
    }

    /// Public path of this route in `locale`.
    pub fn href(&self, routing: &LocaleRouting, locale: Locale) -> String {
        routing.localize(locale, &self.path())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Route::NotFound { .. })
    }
}

/// Resolve a raw request path and query into locale and route.
pub fn resolve_request(routing: &LocaleRouting, path: &str, query: Option<&str>) -> PageRequest {
    let resolved = routing.resolve(path);
    let route = Route::parse(&resolved.path, query);
    tracing::debug!(
        path,
        locale = resolved.locale.as_str(),
        route = ?route,
        "resolved page request"
    );
    PageRequest {
        locale: resolved.locale,
        route,
    }
}

fn query_value(query: Option<&str>, name: &str) -> Option<String> {
    let query = query?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn encode_pair(name: &str, value: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(name, value)
        .finish()
}
