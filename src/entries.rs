//! Bundler input map and per-page template injection descriptors.
//!
//! # Output
//!
//! ```json
//! {
//!   "input": { "index": "/site/index.html", "about": "/site/about.html" },
//!   "pages": [
//!     {
//!       "entry": "/site/src/pages/about/about.js",
//!       "filename": "about.html",
//!       "template": "/site/about.html",
//!       "injectOptions": { "data": { "title": "About", "VITE_LANG": "en" } }
//!     }
//!   ]
//! }
//! ```

use crate::discover::Page;
use crate::overlay::Overlay;
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Flat key-value metadata document.
pub type Metadata = Map<String, Value>;

/// Slug → template path. Sorted by slug.
pub type InputMap = BTreeMap<String, PathBuf>;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed metadata JSON in `{0}`")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("metadata in `{0}` must be a JSON object")]
    NotObject(PathBuf),
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("page `{page}` metadata")]
    Metadata {
        page: String,
        #[source]
        source: MetadataError,
    },

    #[error("pages `{first}` and `{second}` both map to slug `{slug}`")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

/// Data handed to the HTML templating step for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    /// Script entry point
    pub entry: PathBuf,
    /// Output file, `<slug>.html`
    pub filename: String,
    pub template: PathBuf,
    pub inject_options: InjectOptions,
}

/// Template variables, nested the way templating plugins expect them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InjectOptions {
    pub data: Metadata,
}

/// Everything the bundler needs for one build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildPlan {
    pub input: InputMap,
    pub pages: Vec<PageDescriptor>,
}

/// Read and parse a metadata document. It must be a JSON object.
pub fn load_metadata(path: &Path) -> Result<Metadata, MetadataError> {
    let content =
        fs::read_to_string(path).map_err(|err| MetadataError::Io(path.to_path_buf(), err))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|err| MetadataError::Parse(path.to_path_buf(), err))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(MetadataError::NotObject(path.to_path_buf())),
    }
}

/// Overlay values win on key collision.
pub fn merge_overlay(mut metadata: Metadata, overlay: &Overlay) -> Metadata {
    for (key, value) in overlay {
        metadata.insert(key.clone(), Value::String(value.clone()));
    }
    metadata
}

/// Each slug may be claimed by one page only, otherwise two pages would
/// write the same output file.
pub fn check_unique_slugs(pages: &[Page]) -> Result<(), PlanError> {
    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();

    for page in pages {
        if let Some(first) = owners.insert(&page.slug, &page.name) {
            return Err(PlanError::DuplicateSlug {
                slug: page.slug.clone(),
                first: first.to_owned(),
                second: page.name.clone(),
            });
        }
    }

    Ok(())
}

/// One entry per page, keyed by slug.
pub fn build_input_map(pages: &[Page]) -> Result<InputMap, PlanError> {
    check_unique_slugs(pages)?;

    Ok(pages
        .iter()
        .map(|page| (page.slug.clone(), page.template.clone()))
        .collect())
}

/// Descriptor for a single page, with the overlay merged into its metadata.
pub fn describe_page(page: &Page, overlay: &Overlay) -> Result<PageDescriptor, MetadataError> {
    let metadata = load_metadata(&page.metadata)?;
    Ok(PageDescriptor {
        entry: page.entry.clone(),
        filename: page.filename(),
        template: page.template.clone(),
        inject_options: InjectOptions {
            data: merge_overlay(metadata, overlay),
        },
    })
}

/// Descriptors for all pages. Fails on the first bad metadata document.
pub fn describe_pages(pages: &[Page], overlay: &Overlay) -> Result<Vec<PageDescriptor>, PlanError> {
    check_unique_slugs(pages)?;

    pages
        .iter()
        .map(|page| {
            describe_page(page, overlay).map_err(|source| PlanError::Metadata {
                page: page.name.clone(),
                source,
            })
        })
        .collect()
}

/// Build the full plan. No partial plan is returned on error.
pub fn build_plan(pages: &[Page], overlay: &Overlay) -> Result<BuildPlan, PlanError> {
    let input = build_input_map(pages)?;
    let pages = describe_pages(pages, overlay)?;
    Ok(BuildPlan { input, pages })
}
