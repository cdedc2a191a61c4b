//! Pages declared explicitly with `[[page]]` entries.
//!
//! The manifest replaces directory scanning. Pages keep declaration order,
//! slugs may be set per page, and omitted paths fall back to the
//! conventional locations. A declared page with a missing file is an error.

use crate::config::{PageEntry, PageLayout};
use crate::discover::{DiscoverError, Page};

/// Resolve manifest entries into validated pages, in declaration order.
pub fn manifest_pages(
    entries: &[PageEntry],
    layout: &PageLayout,
) -> Result<Vec<Page>, DiscoverError> {
    entries
        .iter()
        .map(|entry| {
            let page = resolve_entry(entry, layout);
            match page.missing_file() {
                Some((kind, path)) => Err(DiscoverError::MissingFile {
                    page: page.name.clone(),
                    kind,
                    path: path.to_path_buf(),
                }),
                None => Ok(page),
            }
        })
        .collect()
}

/// Apply explicit paths and slug on top of the conventional page.
fn resolve_entry(entry: &PageEntry, layout: &PageLayout) -> Page {
    let mut page = Page::from_layout(&entry.name, layout);

    if let Some(slug) = &entry.slug {
        page.template = layout.template_for(&entry.name, slug);
        page.slug = slug.clone();
    }
    if let Some(template) = &entry.template {
        page.template = layout.resolve(template);
    }
    if let Some(script) = &entry.entry {
        page.entry = layout.resolve(script);
    }
    if let Some(metadata) = &entry.metadata {
        page.metadata = layout.resolve(metadata);
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::tests::Site;
    use std::{fs, path::PathBuf};

    fn entry(name: &str) -> PageEntry {
        PageEntry {
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let site = Site::new();
        site.page("zeta", "zeta").page("home", "index").page("alpha", "alpha");

        let entries = [entry("zeta"), entry("home"), entry("alpha")];
        let pages = manifest_pages(&entries, &site.layout()).unwrap();

        let names: Vec<_> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "home", "alpha"]);
        assert_eq!(pages[1].slug, "index");
    }

    #[test]
    fn test_explicit_slug() {
        let site = Site::new();
        site.metadata("landing", "{}").script("landing").template("index");

        let entries = [PageEntry {
            slug: Some("index".into()),
            ..entry("landing")
        }];
        let pages = manifest_pages(&entries, &site.layout()).unwrap();

        assert_eq!(pages[0].slug, "index");
        assert_eq!(pages[0].template, site.root().join("index.html"));
        assert_eq!(pages[0].filename(), "index.html");
    }

    #[test]
    fn test_explicit_paths() {
        let site = Site::new();
        fs::create_dir_all(site.root().join("views")).unwrap();
        fs::create_dir_all(site.root().join("data")).unwrap();
        fs::write(site.root().join("views/about.html"), "<html></html>").unwrap();
        fs::write(site.root().join("data/about.json"), "{}").unwrap();
        site.script("about");

        let entries = [PageEntry {
            template: Some(PathBuf::from("views/about.html")),
            metadata: Some(PathBuf::from("data/about.json")),
            ..entry("about")
        }];
        let pages = manifest_pages(&entries, &site.layout()).unwrap();

        assert_eq!(pages[0].template, site.root().join("views/about.html"));
        assert_eq!(pages[0].metadata, site.root().join("data/about.json"));
        assert_eq!(pages[0].entry, site.pages.join("about/about.js"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let site = Site::new();
        site.page("home", "index");
        site.metadata("about", "{}").template("about");

        let entries = [entry("home"), entry("about")];
        let err = manifest_pages(&entries, &site.layout()).unwrap_err();

        match err {
            DiscoverError::MissingFile { page, kind, path } => {
                assert_eq!(page, "about");
                assert_eq!(kind, "script");
                assert_eq!(path, site.pages.join("about/about.js"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pages_dir_not_required() {
        let site = Site::new();
        fs::write(site.root().join("a.html"), "").unwrap();
        fs::write(site.root().join("a.js"), "").unwrap();
        fs::write(site.root().join("a.json"), "{}").unwrap();
        fs::remove_dir_all(&site.pages).unwrap();

        let entries = [PageEntry {
            entry: Some(PathBuf::from("a.js")),
            metadata: Some(PathBuf::from("a.json")),
            ..entry("a")
        }];
        let pages = manifest_pages(&entries, &site.layout()).unwrap();
        assert_eq!(pages.len(), 1);
    }
}
