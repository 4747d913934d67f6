//! Endpoint handlers

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, Uri, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;
use super::error::AppError;
use crate::locale::Locale;
use crate::routes::{Route, resolve_request};
use crate::sitemap::{build_sitemap, render_sitemap_xml};
use crate::structured_data::{self, LinkedItem};
use crate::submission::{Accepted, SkillCandidate, SubmissionIntake, ValidatingIntake};
use crate::views::{PageView, render_page};

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/sitemap.xml", get(sitemap))
        .route("/api/structured-data", get(json_ld))
        .route("/api/submit", post(submit))
        .fallback(page)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    skills: usize,
    categories: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        skills: state.catalog.len(),
        categories: state.catalog.categories().len(),
    })
}

async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let entries = build_sitemap(&state.catalog, &state.config, Utc::now());
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap_xml(&entries),
    )
}

#[derive(Debug, Default, Deserialize)]
struct ApiParams {
    locale: Option<String>,
    skill: Option<String>,
}

impl ApiParams {
    fn locale(&self, state: &AppState) -> Locale {
        self.locale
            .as_deref()
            .and_then(Locale::parse)
            .unwrap_or(state.config.default_locale)
    }
}

/// JSON-LD for the site, plus one skill's descriptors when `?skill=` names it.
async fn json_ld(
    State(state): State<AppState>,
    Query(params): Query<ApiParams>,
) -> Json<Value> {
    let locale = params.locale(&state);
    let messages = &state.messages;
    let config = &state.config;

    let mut body = serde_json::json!({
        "website": structured_data::website(config, &messages.text(locale, "home", "subtitle")),
        "featured": structured_data::featured_item_list(
            &state.catalog,
            config,
            locale,
            &messages.text(locale, "home", "featured"),
            &messages.text(locale, "home", "title"),
        ),
    });

    if let Some(skill) = params
        .skill
        .as_deref()
        .and_then(|slug| state.catalog.skill_by_slug(slug))
    {
        let url_of = |route: Route| config.absolute_url(&route.href(&state.routing, locale));
        let skill_url = url_of(Route::Skill {
            slug: skill.slug.0.clone(),
        });
        let mut crumbs = vec![LinkedItem {
            name: config.site_name.clone(),
            url: url_of(Route::Home),
        }];
        if state.catalog.category_by_slug(skill.category.as_str()).is_some() {
            crumbs.push(LinkedItem {
                name: messages.category_label(locale, skill.category.as_str()),
                url: url_of(Route::Category {
                    slug: skill.category.0.clone(),
                }),
            });
        }
        crumbs.push(LinkedItem {
            name: skill.name.clone(),
            url: skill_url.clone(),
        });
        body["skill"] = structured_data::software_application(skill, &skill_url);
        body["breadcrumbs"] = structured_data::breadcrumb_list(&crumbs);
    }

    Json(body)
}

/// Validate a submission; nothing is stored.
async fn submit(
    State(state): State<AppState>,
    Query(params): Query<ApiParams>,
    body: Bytes,
) -> Result<Json<Accepted>, AppError> {
    let candidate: SkillCandidate = serde_json::from_slice(&body)?;
    let intake = ValidatingIntake::new(&state.catalog);
    match intake.submit(&candidate) {
        Ok(accepted) => Ok(Json(accepted)),
        Err(errors) => Err(AppError::Validation(
            errors.localized(&state.messages, params.locale(&state)),
        )),
    }
}

/// Every other path is a localized page.
async fn page(State(state): State<AppState>, uri: Uri) -> (StatusCode, Json<PageView>) {
    let request = resolve_request(&state.routing, uri.path(), uri.query());
    let view = render_page(state.view_context(), &request);
    let status = StatusCode::from_u16(view.status).unwrap_or(StatusCode::OK);
    (status, Json(view))
}
