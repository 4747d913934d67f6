//! Process-wide catalog registry.
//!
//! The catalog is loaded once and shared as a `&'static` reference for the
//! rest of the process. Binaries call `install` at startup (after honoring a
//! catalog path override); library callers that never installed anything get
//! the built-in catalog on first access.

use crate::catalog::index::CatalogIndex;
use anyhow::{Result, bail};
use std::path::Path;
use std::sync::OnceLock;

static CATALOG: OnceLock<CatalogIndex> = OnceLock::new();

/// Install `index` as the process catalog.
///
/// Fails when a catalog was already installed or lazily loaded.
pub fn install(index: CatalogIndex) -> Result<&'static CatalogIndex> {
    if CATALOG.get().is_some() {
        bail!("catalog registry already initialized");
    }
    tracing::info!(
        skills = index.len(),
        categories = index.categories().len(),
        "catalog installed"
    );
    Ok(CATALOG.get_or_init(|| index))
}

/// Load the catalog from `path` (or the built-in copy) and install it.
pub fn install_from(path: Option<&Path>) -> Result<&'static CatalogIndex> {
    let index = match path {
        Some(path) => CatalogIndex::load(path)?,
        None => CatalogIndex::builtin()?,
    };
    install(index)
}

/// The process catalog, loading the built-in copy on first use.
pub fn catalog() -> Result<&'static CatalogIndex> {
    if let Some(index) = CATALOG.get() {
        return Ok(index);
    }
    let index = CatalogIndex::builtin()?;
    Ok(CATALOG.get_or_init(|| index))
}
