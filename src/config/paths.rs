//! Centralized path resolution for page files.
//!
//! Single source of truth for where a page's template, script and metadata
//! live, so discovery and the manifest agree on naming conventions.
//!
//! # Architecture
//!
//! ```text
//! Config
//!     │
//!     └── layout() → PageLayout
//!                       │
//!                       ├── slug_for("home")      → "index"
//!                       ├── page_dir("about")     → /abs/src/pages/about
//!                       ├── metadata_for("about") → /abs/src/pages/about/about.json
//!                       ├── entry_for("about")    → /abs/src/pages/about/about.js
//!                       └── template_for(..)      → /abs/about.html
//! ```

use super::TemplateLayout;
use std::path::{Path, PathBuf};

/// Borrowed view of the page naming conventions.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout<'a> {
    /// Project root (templates live here in `root` layout)
    pub project_root: &'a Path,
    /// Pages root, one subdirectory per page
    pub pages_dir: &'a Path,
    pub templates: TemplateLayout,
    /// Reserved directory name mapped to `root_slug`
    pub home: &'a str,
    pub root_slug: &'a str,
    /// Sort scanned pages by name
    pub sort: bool,
}

impl<'a> PageLayout<'a> {
    /// Layout with default naming rules and the given roots.
    pub const fn new(project_root: &'a Path, pages_dir: &'a Path) -> Self {
        Self {
            project_root,
            pages_dir,
            templates: TemplateLayout::Root,
            home: "home",
            root_slug: "index",
            sort: true,
        }
    }

    /// Output slug for a page directory name.
    ///
    /// The home directory maps to the root document, everything else keeps
    /// its name.
    pub fn slug_for(&self, name: &str) -> String {
        if name == self.home {
            self.root_slug.to_owned()
        } else {
            name.to_owned()
        }
    }

    #[inline]
    pub fn page_dir(&self, name: &str) -> PathBuf {
        self.pages_dir.join(name)
    }

    /// `<pages>/<name>/<name>.json`
    #[inline]
    pub fn metadata_for(&self, name: &str) -> PathBuf {
        self.page_dir(name).join(format!("{name}.json"))
    }

    /// `<pages>/<name>/<name>.js`
    #[inline]
    pub fn entry_for(&self, name: &str) -> PathBuf {
        self.page_dir(name).join(format!("{name}.js"))
    }

    /// HTML template path for a page, depending on the template layout.
    ///
    /// | layout | path |
    /// |--------|------|
    /// | `root` | `<root>/<slug>.html` |
    /// | `page` | `<pages>/<name>/<name>.html` |
    pub fn template_for(&self, name: &str, slug: &str) -> PathBuf {
        match self.templates {
            TemplateLayout::Root => self.project_root.join(format!("{slug}.html")),
            TemplateLayout::Page => self.page_dir(name).join(format!("{name}.html")),
        }
    }

    /// Resolve a user-supplied path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}
