//! Deserializable representation of `data/catalog.json`.
//!
//! The types mirror the catalog schema (camelCase field names included) so
//! the same structs serve as the wire shape of the JSON views. Use
//! `CatalogIndex` for validation and queries; use these structs directly when
//! the raw collection is needed.

use crate::catalog::identity::{CategorySlug, Platform, SkillId, SkillSlug};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Serialize)]
/// Full catalog document as stored on disk.
pub struct SkillCatalog {
    pub schema_version: String,
    pub categories: Vec<Category>,
    pub skills: Vec<Skill>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
/// One classification bucket. Its skill count is derived, never stored.
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: CategorySlug,
    pub icon: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
/// One installable capability package.
pub struct Skill {
    pub id: SkillId,
    pub slug: SkillSlug,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub category: CategorySlug,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub skill_url: String,
    pub install_count: u64,
    pub rating: f64,
    pub rating_count: u64,
    pub platform: Platform,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<Requirements>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
/// What a skill needs from the host before it works.
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platform: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auth: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Compact listing entry used by cards and list views.
pub struct SkillCard {
    pub slug: SkillSlug,
    pub name: String,
    pub description: String,
    pub category: CategorySlug,
    pub platform: Platform,
    pub install_count: u64,
    pub rating: f64,
    pub featured: bool,
}

impl Requirements {
    /// True when there is nothing worth showing in a requirements section.
    pub fn is_empty(&self) -> bool {
        self.env.is_empty()
            && self.tools.is_empty()
            && self.platform.is_empty()
            && self.auth.is_empty()
            && self.config.is_empty()
            && self.note.as_deref().is_none_or(|note| note.trim().is_empty())
    }
}

impl Skill {
    /// Create the compact card used in listings.
    pub fn card(&self) -> SkillCard {
        SkillCard {
            slug: self.slug.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            platform: self.platform,
            install_count: self.install_count,
            rating: self.rating,
            featured: self.featured,
        }
    }

    /// The instruction a user pastes into their agent to install the skill.
    pub fn install_command(&self) -> String {
        format!("Read {}", self.skill_url)
    }

    /// Requirements worth displaying, if any.
    pub fn requirements(&self) -> Option<&Requirements> {
        self.requires.as_ref().filter(|req| !req.is_empty())
    }
}

/// Parse a catalog document without additional validation.
pub fn parse_catalog(data: &str) -> Result<SkillCatalog> {
    let catalog: SkillCatalog = serde_json::from_str(data).context("parsing skill catalog")?;
    Ok(catalog)
}

/// Read and parse a catalog from disk without additional validation.
pub fn load_catalog_from_path(path: &Path) -> Result<SkillCatalog> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_catalog(&data)
}
