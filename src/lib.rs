//! Shared library for the SkillHub site.
//!
//! The crate exposes the skill catalog (loading, validation, queries), the
//! locale-aware routing surface, per-locale messages, and the builders for
//! page views, the sitemap, and JSON-LD. The `skillhub` CLI and the
//! `skillhub-server` HTTP binary are thin shells over these modules.

pub mod catalog;
pub mod config;
pub mod locale;
pub mod messages;
pub mod routes;
mod schema_loader;
pub mod server;
pub mod sitemap;
pub mod structured_data;
pub mod submission;
pub mod views;

pub use catalog::{
    CatalogIndex, Category, CategorySlug, Platform, Skill, SkillCard, SkillCatalog, SkillId,
    SkillSlug, load_catalog_from_path,
};
pub use config::SiteConfig;
pub use locale::{DEFAULT_LOCALE, Locale, LocaleRouting, ResolvedPath};
pub use messages::{Messages, category_message_key};
pub use routes::{PageRequest, Route, resolve_request};
pub use submission::{
    Accepted, SkillCandidate, SubmissionIntake, ValidatingIntake, ValidationErrors,
};
pub use views::{PageView, ViewContext, render_page};
