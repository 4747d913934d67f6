#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use skillhub::{CatalogIndex, SkillCatalog};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn cli_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_skillhub"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// One fixture skill; everything not named here gets a fixed value.
pub struct FixtureSkill {
    pub slug: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub install_count: u64,
    pub featured: bool,
    pub updated_at: &'static str,
    pub tags: &'static [&'static str],
}

impl FixtureSkill {
    fn to_json(&self, idx: usize) -> Value {
        json!({
            "id": (idx + 1).to_string(),
            "slug": self.slug,
            "name": self.name,
            "description": format!("{} fixture skill", self.name),
            "category": self.category,
            "tags": self.tags,
            "author": "fixture",
            "skillUrl": format!("https://example.com/{}/SKILL.md", self.slug),
            "installCount": self.install_count,
            "rating": 4.0,
            "ratingCount": 10,
            "platform": "universal",
            "featured": self.featured,
            "createdAt": "2025-01-01",
            "updatedAt": self.updated_at,
        })
    }
}

/// A, B, C plus an orphan D whose category is not in the catalog.
///
/// A: 500 installs, featured. B: 900 installs. C: 100 installs, featured.
pub fn abc_skills() -> Vec<FixtureSkill> {
    vec![
        FixtureSkill {
            slug: "skill-a",
            name: "Alpha Notes",
            category: "data",
            install_count: 500,
            featured: true,
            updated_at: "2025-01-10",
            tags: &["notes"],
        },
        FixtureSkill {
            slug: "skill-b",
            name: "Beta Charts",
            category: "data",
            install_count: 900,
            featured: false,
            updated_at: "2025-02-01",
            tags: &["charts", "csv"],
        },
        FixtureSkill {
            slug: "skill-c",
            name: "Gamma Ledger",
            category: "finance",
            install_count: 100,
            featured: true,
            updated_at: "2025-01-20",
            tags: &["money"],
        },
        FixtureSkill {
            slug: "skill-d",
            name: "Delta Relic",
            category: "retired",
            install_count: 50,
            featured: false,
            updated_at: "2024-12-31",
            tags: &[],
        },
    ]
}

pub fn fixture_catalog_json(skills: &[FixtureSkill]) -> Value {
    json!({
        "schema_version": "skill_catalog_v1",
        "categories": [
            {"id": "1", "name": "Data", "slug": "data", "icon": "📊", "description": "Data tools"},
            {"id": "2", "name": "Finance", "slug": "finance", "icon": "💰", "description": "Money tools"},
            {"id": "3", "name": "Smart Home", "slug": "smart-home", "icon": "🏠", "description": "Home tools"},
        ],
        "skills": skills
            .iter()
            .enumerate()
            .map(|(idx, skill)| skill.to_json(idx))
            .collect::<Vec<_>>(),
    })
}

pub fn abc_index() -> CatalogIndex {
    let catalog: SkillCatalog = serde_json::from_value(fixture_catalog_json(&abc_skills()))
        .expect("fixture catalog parses");
    CatalogIndex::from_catalog(catalog).expect("fixture catalog indexes")
}

/// Write `value` to `catalog.json` inside a fresh temp dir.
pub fn write_catalog(value: &Value) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new().context("failed to allocate temp dir")?;
    let path = dir.path().join("catalog.json");
    write_json(&path, value)?;
    Ok((dir, path))
}

pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw).with_context(|| format!("writing {}", path.display()))
}

pub fn slugs(skills: &[&skillhub::Skill]) -> Vec<String> {
    skills.iter().map(|skill| skill.slug.0.clone()).collect()
}
