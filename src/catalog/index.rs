//! Indexed, read-only view of a skill catalog.
//!
//! The index enforces the expected catalog schema version and the structural
//! invariants the JSON Schema cannot express (unique slugs and ids), then
//! answers every listing query the site needs. Queries never fail: absence
//! is `None` or an empty `Vec`.

use crate::catalog::model::{Category, Skill, SkillCatalog, parse_catalog};
use crate::catalog::load_catalog_from_path;
use crate::schema_loader::{
    CompiledSchema, SchemaLoadOptions, compile_json_schema, load_json_schema_from_path,
};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

const CATALOG_SCHEMA_VERSION: &str = "skill_catalog_v1";
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");
const BUILTIN_SCHEMA: &str = include_str!("../../schema/skill_catalog.schema.json");
const SCHEMA_FILE: &str = "schema/skill_catalog.schema.json";

#[derive(Clone, Debug, PartialEq, Serialize)]
/// Category plus its live skill count.
pub struct CategoryCount<'a> {
    #[serde(flatten)]
    pub category: &'a Category,
    pub count: usize,
}

#[derive(Debug)]
/// Skill catalog plus derived lookups keyed by slug.
pub struct CatalogIndex {
    skills: Vec<Skill>,
    categories: Vec<Category>,
    skill_by_slug: BTreeMap<String, usize>,
    category_by_slug: BTreeMap<String, usize>,
}

impl CatalogIndex {
    /// Load the catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let schema = builtin_schema()?;
        Self::from_validated_str(BUILTIN_CATALOG, "builtin catalog", &schema)
    }

    /// Load and validate a catalog from disk.
    ///
    /// The schema is taken from `schema/` next to the catalog's parent
    /// directory when present, otherwise the embedded copy is used.
    pub fn load(path: &Path) -> Result<Self> {
        let schema = match resolve_catalog_schema_path(path) {
            Some(schema_path) => {
                let allowed = allowed_schema_versions();
                load_json_schema_from_path(
                    &schema_path,
                    SchemaLoadOptions {
                        allowed_versions: Some(&allowed),
                        ..Default::default()
                    },
                )
                .with_context(|| format!("loading catalog schema {}", schema_path.display()))?
            }
            None => builtin_schema()?,
        };
        tracing::debug!(
            schema_version = %schema.schema_version,
            catalog = %path.display(),
            "validating catalog"
        );

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("opening catalog {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        schema.validate(&value, &format!("skill catalog {}", path.display()))?;

        let catalog =
            load_catalog_from_path(path).with_context(|| format!("loading {}", path.display()))?;
        Self::from_catalog(catalog)
    }

    /// Build an index from an already-parsed catalog.
    ///
    /// Checks the structural invariants only; JSON Schema validation happens
    /// in `builtin`/`load`.
    pub fn from_catalog(catalog: SkillCatalog) -> Result<Self> {
        validate_schema_version(&catalog.schema_version)?;
        let category_by_slug = build_category_index(&catalog.categories)?;
        let skill_by_slug = build_skill_index(&catalog.skills)?;

        for skill in &catalog.skills {
            if !category_by_slug.contains_key(skill.category.as_str()) {
                tracing::warn!(
                    skill = skill.slug.as_str(),
                    category = skill.category.as_str(),
                    "skill references unknown category; it will not be listed under any category"
                );
            }
        }

        tracing::debug!(
            skills = catalog.skills.len(),
            categories = catalog.categories.len(),
            "catalog indexed"
        );

        Ok(Self {
            skills: catalog.skills,
            categories: catalog.categories,
            skill_by_slug,
            category_by_slug,
        })
    }

    fn from_validated_str(raw: &str, origin: &str, schema: &CompiledSchema) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).with_context(|| format!("parsing {origin}"))?;
        schema.validate(&value, origin)?;
        Self::from_catalog(parse_catalog(raw)?)
    }

    /// Every skill in insertion order.
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Every category in insertion order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Resolve a skill by slug.
    ///
    /// Returns `None` instead of erroring; callers render a not-found view.
    pub fn skill_by_slug(&self, slug: &str) -> Option<&Skill> {
        self.skill_by_slug.get(slug).map(|&idx| &self.skills[idx])
    }

    /// Resolve a category by slug.
    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.category_by_slug
            .get(slug)
            .map(|&idx| &self.categories[idx])
    }

    /// Skills whose category equals `slug`, in insertion order.
    ///
    /// Unknown categories yield an empty list.
    pub fn skills_by_category(&self, slug: &str) -> Vec<&Skill> {
        self.skills
            .iter()
            .filter(|skill| skill.category.as_str() == slug)
            .collect()
    }

    /// Live number of skills filed under `slug`.
    pub fn category_count(&self, slug: &str) -> usize {
        self.skills
            .iter()
            .filter(|skill| skill.category.as_str() == slug)
            .count()
    }

    /// Every category with its live count, in category order.
    pub fn categories_with_counts(&self) -> Vec<CategoryCount<'_>> {
        self.categories
            .iter()
            .map(|category| CategoryCount {
                category,
                count: self.category_count(category.slug.as_str()),
            })
            .collect()
    }

    /// Editorially featured skills, in insertion order.
    pub fn featured_skills(&self) -> Vec<&Skill> {
        self.skills.iter().filter(|skill| skill.featured).collect()
    }

    /// Skills ordered by install count (highest first), truncated to `limit`.
    ///
    /// The sort is stable, so equal counts keep insertion order.
    pub fn popular_skills(&self, limit: usize) -> Vec<&Skill> {
        let mut ranked: Vec<&Skill> = self.skills.iter().collect();
        ranked.sort_by(|a, b| b.install_count.cmp(&a.install_count));
        ranked.truncate(limit);
        ranked
    }

    /// Skills ordered by `updated_at` (newest first), truncated to `limit`.
    ///
    /// Dates compare as strings; ISO dates make that chronological.
    pub fn recent_skills(&self, limit: usize) -> Vec<&Skill> {
        let mut ranked: Vec<&Skill> = self.skills.iter().collect();
        ranked.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        ranked.truncate(limit);
        ranked
    }

    /// Case-insensitive substring search over name, description and tags.
    ///
    /// Blank queries match nothing. Results keep insertion order.
    pub fn search_skills(&self, query: &str) -> Vec<&Skill> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.skills
            .iter()
            .filter(|skill| {
                skill.name.to_lowercase().contains(&needle)
                    || skill.description.to_lowercase().contains(&needle)
                    || skill
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Other skills in the same category, excluding `skill` itself.
    pub fn related_skills(&self, skill: &Skill, limit: usize) -> Vec<&Skill> {
        self.skills
            .iter()
            .filter(|other| other.category == skill.category && other.id != skill.id)
            .take(limit)
            .collect()
    }
}

fn builtin_schema() -> Result<CompiledSchema> {
    let allowed = allowed_schema_versions();
    compile_json_schema(
        BUILTIN_SCHEMA,
        "builtin catalog schema",
        SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            ..Default::default()
        },
    )
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([CATALOG_SCHEMA_VERSION.to_string()])
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }

    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }

    Ok(())
}

fn build_category_index(categories: &[Category]) -> Result<BTreeMap<String, usize>> {
    let mut ids = BTreeSet::new();
    let mut map = BTreeMap::new();
    for (idx, category) in categories.iter().enumerate() {
        if category.slug.as_str().trim().is_empty() {
            bail!("encountered category with no slug");
        }
        if !ids.insert(category.id.as_str()) {
            bail!("duplicate category id {}", category.id);
        }
        if map.insert(category.slug.0.clone(), idx).is_some() {
            bail!("duplicate category slug {}", category.slug.as_str());
        }
    }
    Ok(map)
}

fn build_skill_index(skills: &[Skill]) -> Result<BTreeMap<String, usize>> {
    let mut ids = BTreeSet::new();
    let mut map = BTreeMap::new();
    for (idx, skill) in skills.iter().enumerate() {
        let slug = skill.slug.as_str();
        if slug.trim().is_empty() {
            bail!("encountered skill with no slug");
        }
        if !ids.insert(skill.id.as_str()) {
            bail!("duplicate skill id {}", skill.id.as_str());
        }
        if map.insert(slug.to_string(), idx).is_some() {
            bail!("duplicate skill slug {slug}");
        }
        if !skill.rating.is_finite() || !(0.0..=5.0).contains(&skill.rating) {
            bail!("skill {slug} has rating {} outside 0..=5", skill.rating);
        }
        if skill.skill_url.trim().is_empty() {
            bail!("skill {slug} has no skillUrl");
        }
    }
    Ok(map)
}

fn resolve_catalog_schema_path(catalog_path: &Path) -> Option<PathBuf> {
    let base = catalog_path.parent().and_then(|p| p.parent())?;
    let candidate = base.join(SCHEMA_FILE);
    candidate.is_file().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::identity::{CategorySlug, Platform, SkillId, SkillSlug};

    fn skill(id: &str, category: &str, installs: u64, updated: &str) -> Skill {
        Skill {
            id: SkillId(id.to_string()),
            slug: SkillSlug(format!("skill-{id}")),
            name: format!("Skill {id}"),
            description: "demo".to_string(),
            long_description: None,
            category: CategorySlug(category.to_string()),
            tags: Vec::new(),
            author: "tester".to_string(),
            author_url: None,
            github_url: None,
            skill_url: format!("https://example.com/{id}/SKILL.md"),
            install_count: installs,
            rating: 4.0,
            rating_count: 1,
            platform: Platform::Universal,
            featured: false,
            requires: None,
            created_at: "2025-01-01".to_string(),
            updated_at: updated.to_string(),
        }
    }

    fn catalog(skills: Vec<Skill>) -> SkillCatalog {
        SkillCatalog {
            schema_version: CATALOG_SCHEMA_VERSION.to_string(),
            categories: vec![Category {
                id: "1".to_string(),
                name: "Data".to_string(),
                slug: CategorySlug("data".to_string()),
                icon: "📊".to_string(),
                description: "data".to_string(),
            }],
            skills,
        }
    }

    #[test]
    fn builtin_catalog_loads() {
        let index = CatalogIndex::builtin().expect("builtin catalog is valid");
        assert!(!index.is_empty());
        assert!(index.category_by_slug("smart-home").is_some());
        for skill in index.skills() {
            assert!(
                index.category_by_slug(skill.category.as_str()).is_some(),
                "{} has dangling category",
                skill.slug.as_str()
            );
        }
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let mut dup = skill("2", "data", 1, "2025-01-01");
        dup.slug = SkillSlug("skill-1".to_string());
        let err = CatalogIndex::from_catalog(catalog(vec![skill("1", "data", 1, "2025-01-01"), dup]))
            .expect_err("duplicate slug should fail");
        assert!(err.to_string().contains("duplicate skill slug skill-1"));
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let mut bad = skill("1", "data", 1, "2025-01-01");
        bad.rating = 7.5;
        let err = CatalogIndex::from_catalog(catalog(vec![bad])).expect_err("rating too high");
        assert!(err.to_string().contains("outside 0..=5"));
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let mut doc = catalog(Vec::new());
        doc.schema_version = "skill_catalog_v9".to_string();
        let err = CatalogIndex::from_catalog(doc).expect_err("unknown version");
        assert!(err.to_string().contains("skill_catalog_v9"));
    }

    #[test]
    fn dangling_category_is_tolerated() {
        let index = CatalogIndex::from_catalog(catalog(vec![
            skill("1", "data", 1, "2025-01-01"),
            skill("2", "ghost", 1, "2025-01-01"),
        ]))
        .expect("dangling category degrades gracefully");
        assert_eq!(index.category_count("data"), 1);
        assert_eq!(index.skills_by_category("ghost").len(), 1);
        assert!(index.category_by_slug("ghost").is_none());
    }

    #[test]
    fn recent_orders_by_updated_at_with_stable_ties() {
        let index = CatalogIndex::from_catalog(catalog(vec![
            skill("1", "data", 1, "2025-01-05"),
            skill("2", "data", 1, "2025-02-01"),
            skill("3", "data", 1, "2025-01-05"),
        ]))
        .unwrap();
        let ids: Vec<&str> = index
            .recent_skills(10)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, ["2", "1", "3"]);
        assert_eq!(index.recent_skills(1).len(), 1);
    }

    #[test]
    fn related_excludes_self() {
        let index = CatalogIndex::from_catalog(catalog(vec![
            skill("1", "data", 1, "2025-01-01"),
            skill("2", "data", 1, "2025-01-01"),
            skill("3", "data", 1, "2025-01-01"),
        ]))
        .unwrap();
        let me = index.skill_by_slug("skill-2").unwrap();
        let related: Vec<&str> = index
            .related_skills(me, 3)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(related, ["1", "3"]);
    }

    #[test]
    fn search_matches_tags_case_insensitively() {
        let mut tagged = skill("1", "data", 1, "2025-01-01");
        tagged.tags = vec!["DuckDB".to_string()];
        let index = CatalogIndex::from_catalog(catalog(vec![tagged])).unwrap();
        assert_eq!(index.search_skills("duck").len(), 1);
        assert_eq!(index.search_skills("  DUCKDB ").len(), 1);
        assert!(index.search_skills("   ").is_empty());
        assert!(index.search_skills("postgres").is_empty());
    }
}
