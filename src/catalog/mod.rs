//! Skill catalog wiring.
//!
//! This module wraps the JSON catalog under `data/catalog.json` so callers
//! can load a validated snapshot and query it. Types here mirror the schema
//! fields; callers use `CatalogIndex` for lookups and listings and the
//! `registry` for the process-wide instance.

pub mod identity;
pub mod index;
pub mod model;
pub mod registry;

pub use identity::{CategorySlug, Platform, SkillId, SkillSlug};
pub use index::{CatalogIndex, CategoryCount};
pub use model::{Category, Requirements, Skill, SkillCard, SkillCatalog, parse_catalog};

pub use model::load_catalog_from_path;
