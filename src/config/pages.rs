//! `[pages]` section and `[[page]]` manifest entries.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a page's HTML template lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateLayout {
    /// `<root>/<slug>.html` at the project root (default).
    #[default]
    Root,
    /// `<pages>/<name>/<name>.html` next to the script and metadata.
    Page,
}

/// `[pages]` section in pagemap.toml - page discovery settings.
///
/// # Example
/// ```toml
/// [pages]
/// dir = "src/pages"
/// templates = "root"
/// home = "home"
/// root_slug = "index"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// Pages root directory, one subdirectory per page.
    #[serde(default = "defaults::pages::dir")]
    #[educe(Default = defaults::pages::dir())]
    pub dir: PathBuf,

    /// Template location.
    pub templates: TemplateLayout,

    /// Directory name that becomes the site root document.
    #[serde(default = "defaults::pages::home")]
    #[educe(Default = defaults::pages::home())]
    pub home: String,

    /// Slug of the site root document.
    #[serde(default = "defaults::pages::root_slug")]
    #[educe(Default = defaults::pages::root_slug())]
    pub root_slug: String,

    /// Sort scanned pages by name instead of keeping directory order.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub sort: bool,
}

/// One `[[page]]` entry of the declarative manifest.
///
/// Every path is optional and falls back to the conventional location.
///
/// # Example
/// ```toml
/// [[page]]
/// name = "home"
/// slug = "index"
/// template = "index.html"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageEntry {
    /// Page name (directory name under `[pages].dir`).
    pub name: String,

    /// Output slug; `<slug>.html` is the emitted filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// HTML template path, relative to project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Script entry path, relative to project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<PathBuf>,

    /// Metadata JSON path, relative to project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PathBuf>,
}
