//! Page discovery by directory convention.
//!
//! A page is a subdirectory of the pages root holding `<name>.json` and
//! `<name>.js`, with a matching HTML template (see [`PageLayout`]).
//! Directories missing any of the three files are skipped without notice.
//!
//! ```text
//! src/pages/
//! ├── home/            → slug "index", template <root>/index.html
//! │   ├── home.js
//! │   └── home.json
//! ├── about/           → slug "about", template <root>/about.html
//! │   ├── about.js
//! │   └── about.json
//! └── drafts/          → skipped (no drafts.js)
//!     └── drafts.json
//! ```

use crate::config::{Config, PageLayout};
use crate::manifest::manifest_pages;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while locating pages.
#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("cannot read pages directory `{0}`")]
    ReadDir(PathBuf, #[source] std::io::Error),

    #[error("pages directory `{0}` is not a directory")]
    NotADirectory(PathBuf),

    #[error("error while scanning pages directory")]
    Walk(#[from] walkdir::Error),

    #[error("page `{page}` is missing its {kind} `{path}`")]
    MissingFile {
        page: String,
        kind: &'static str,
        path: PathBuf,
    },
}

/// A validated page: all three files exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Directory (or manifest) name
    pub name: String,
    /// Output base name, `<slug>.html` is written
    pub slug: String,
    /// HTML template
    pub template: PathBuf,
    /// Script entry point
    pub entry: PathBuf,
    /// Metadata JSON document
    pub metadata: PathBuf,
}

impl Page {
    /// Conventional page for a directory name.
    pub fn from_layout(name: &str, layout: &PageLayout) -> Self {
        let slug = layout.slug_for(name);
        Self {
            template: layout.template_for(name, &slug),
            entry: layout.entry_for(name),
            metadata: layout.metadata_for(name),
            name: name.to_owned(),
            slug,
        }
    }

    /// Output filename, `<slug>.html`.
    pub fn filename(&self) -> String {
        format!("{}.html", self.slug)
    }

    /// Required files with a label for diagnostics.
    pub fn required_files(&self) -> [(&'static str, &Path); 3] {
        [
            ("metadata", self.metadata.as_path()),
            ("script", self.entry.as_path()),
            ("template", self.template.as_path()),
        ]
    }

    /// First required file that does not exist.
    ///
    /// Only regular files (or symlinks to them) count: a directory named
    /// `about.js` leaves the page incomplete.
    pub fn missing_file(&self) -> Option<(&'static str, &Path)> {
        self.required_files()
            .into_iter()
            .find(|(_, path)| !path.is_file())
    }
}

/// Scan the pages root and return every complete page.
///
/// Order is by name when `layout.sort` is set, otherwise directory
/// enumeration order.
pub fn discover_pages(layout: &PageLayout) -> Result<Vec<Page>, DiscoverError> {
    let dir = layout.pages_dir;
    let meta = fs::metadata(dir).map_err(|err| DiscoverError::ReadDir(dir.to_path_buf(), err))?;
    if !meta.is_dir() {
        return Err(DiscoverError::NotADirectory(dir.to_path_buf()));
    }

    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true);
    if layout.sort {
        walker = walker.sort_by_file_name();
    }

    let mut pages = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        // Non UTF-8 names cannot be page names
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        let page = Page::from_layout(name, layout);
        if page.missing_file().is_none() {
            pages.push(page);
        }
    }

    Ok(pages)
}

/// Pages for this project: the `[[page]]` manifest when present, otherwise
/// a directory scan.
pub fn collect_pages(config: &Config) -> Result<Vec<Page>, DiscoverError> {
    let layout = config.layout();
    if config.has_manifest() {
        manifest_pages(&config.manifest, &layout)
    } else {
        discover_pages(&layout)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::TemplateLayout;
    use tempfile::TempDir;

    /// Project fixture with a `src/pages` root.
    pub struct Site {
        pub dir: TempDir,
        pub pages: PathBuf,
    }

    impl Site {
        pub fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let pages = dir.path().join("src/pages");
            fs::create_dir_all(&pages).unwrap();
            Self { dir, pages }
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        pub fn layout(&self) -> PageLayout<'_> {
            PageLayout::new(self.root(), &self.pages)
        }

        /// Write `<name>/<name>.json` with the given content.
        pub fn metadata(&self, name: &str, json: &str) -> &Self {
            let dir = self.pages.join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("{name}.json")), json).unwrap();
            self
        }

        /// Write `<name>/<name>.js`.
        pub fn script(&self, name: &str) -> &Self {
            let dir = self.pages.join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("{name}.js")), "import './style.css';\n").unwrap();
            self
        }

        /// Write `<root>/<slug>.html`.
        pub fn template(&self, slug: &str) -> &Self {
            fs::write(
                self.root().join(format!("{slug}.html")),
                "<title><%= title %></title>\n",
            )
            .unwrap();
            self
        }

        /// Complete page with root-level template.
        pub fn page(&self, name: &str, slug: &str) -> &Self {
            self.metadata(name, r#"{"title":"Page"}"#)
                .script(name)
                .template(slug)
        }
    }

    fn names(pages: &[Page]) -> Vec<&str> {
        pages.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_discover_home_and_about() {
        let site = Site::new();
        site.page("home", "index").page("about", "about");

        let pages = discover_pages(&site.layout()).unwrap();
        assert_eq!(names(&pages), vec!["about", "home"]);

        let home = pages.iter().find(|p| p.name == "home").unwrap();
        assert_eq!(home.slug, "index");
        assert_eq!(home.template, site.root().join("index.html"));
        assert_eq!(home.entry, site.pages.join("home/home.js"));
        assert_eq!(home.metadata, site.pages.join("home/home.json"));
        assert_eq!(home.filename(), "index.html");
    }

    #[test]
    fn test_page_missing_script_is_excluded() {
        let site = Site::new();
        site.page("home", "index");
        site.metadata("contact", "{}").template("contact");

        let pages = discover_pages(&site.layout()).unwrap();
        assert_eq!(names(&pages), vec!["home"]);
    }

    #[test]
    fn test_page_missing_metadata_is_excluded() {
        let site = Site::new();
        site.script("blog").template("blog");

        assert!(discover_pages(&site.layout()).unwrap().is_empty());
    }

    #[test]
    fn test_directory_in_place_of_file_is_excluded() {
        let site = Site::new();
        site.page("home", "index");
        site.metadata("about", "{}").template("about");
        fs::create_dir_all(site.pages.join("about/about.js")).unwrap();

        let pages = discover_pages(&site.layout()).unwrap();
        assert_eq!(names(&pages), vec!["home"]);
    }

    #[test]
    fn test_page_missing_template_is_excluded() {
        let site = Site::new();
        site.metadata("blog", "{}").script("blog");

        assert!(discover_pages(&site.layout()).unwrap().is_empty());
    }

    #[test]
    fn test_home_needs_root_document_template() {
        let site = Site::new();
        // home.html at the root does not count: home maps to index.html
        site.metadata("home", "{}").script("home").template("home");

        assert!(discover_pages(&site.layout()).unwrap().is_empty());
    }

    #[test]
    fn test_files_in_pages_root_are_ignored() {
        let site = Site::new();
        site.page("about", "about");
        fs::write(site.pages.join("README.md"), "notes").unwrap();

        let pages = discover_pages(&site.layout()).unwrap();
        assert_eq!(names(&pages), vec!["about"]);
    }

    #[test]
    fn test_metadata_is_not_parsed_during_discovery() {
        let site = Site::new();
        site.metadata("broken", "{ not json").script("broken").template("broken");

        let pages = discover_pages(&site.layout()).unwrap();
        assert_eq!(names(&pages), vec!["broken"]);
    }

    #[test]
    fn test_page_template_layout() {
        let site = Site::new();
        site.metadata("home", "{}").script("home");
        fs::write(site.pages.join("home/home.html"), "<html></html>").unwrap();

        let mut layout = site.layout();
        layout.templates = TemplateLayout::Page;

        let pages = discover_pages(&layout).unwrap();
        assert_eq!(names(&pages), vec!["home"]);
        assert_eq!(pages[0].slug, "index");
        assert_eq!(pages[0].template, site.pages.join("home/home.html"));
    }

    #[test]
    fn test_sorted_by_name() {
        let site = Site::new();
        for name in ["zeta", "alpha", "mid"] {
            site.page(name, name);
        }

        let pages = discover_pages(&site.layout()).unwrap();
        assert_eq!(names(&pages), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_unsorted_yields_same_set() {
        let site = Site::new();
        for name in ["zeta", "alpha", "mid"] {
            site.page(name, name);
        }
        let mut layout = site.layout();
        layout.sort = false;

        let pages = discover_pages(&layout).unwrap();
        let mut found = names(&pages);
        found.sort_unstable();
        assert_eq!(found, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_missing_pages_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let pages = dir.path().join("src/pages");
        let layout = PageLayout::new(dir.path(), &pages);

        let err = discover_pages(&layout).unwrap_err();
        assert!(matches!(err, DiscoverError::ReadDir(ref path, _) if *path == pages));
    }

    #[test]
    fn test_pages_path_is_a_file() {
        let dir = TempDir::new().unwrap();
        let pages = dir.path().join("pages");
        fs::write(&pages, "").unwrap();
        let layout = PageLayout::new(dir.path(), &pages);

        assert!(matches!(
            discover_pages(&layout),
            Err(DiscoverError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_empty_pages_dir() {
        let site = Site::new();
        assert!(discover_pages(&site.layout()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_reports_first_missing() {
        let site = Site::new();
        site.metadata("about", "{}");

        let page = Page::from_layout("about", &site.layout());
        let (kind, path) = page.missing_file().unwrap();
        assert_eq!(kind, "script");
        assert_eq!(path, site.pages.join("about/about.js"));
    }
}
