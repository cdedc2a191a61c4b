//! Project configuration management for `pagemap.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[pages]`   | Pages root, template layout, home/root naming  |
//! | `[env]`     | Environment overlay prefixes and `.env` files  |
//! | `[output]`  | JSON output formatting                         |
//! | `[[page]]`  | Explicit page manifest (disables scanning)     |
//!
//! # Example
//!
//! ```toml
//! [pages]
//! dir = "src/pages"
//! templates = "root"
//!
//! [env]
//! prefixes = ["VITE_"]
//!
//! [[page]]
//! name = "home"
//! slug = "index"
//! ```

pub mod defaults;
mod env;
mod error;
mod output;
mod pages;
mod paths;

pub use env::EnvConfig;
pub use error::ConfigError;
pub use output::OutputConfig;
pub use pages::{PageEntry, PagesConfig, TemplateLayout};
pub use paths::PageLayout;

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing pagemap.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Absolute project root (set after loading)
    #[serde(skip)]
    #[educe(Default = PathBuf::from("./"))]
    pub root: PathBuf,

    /// Page discovery settings
    #[serde(default)]
    pub pages: PagesConfig,

    /// Environment overlay settings
    #[serde(default)]
    pub env: EnvConfig,

    /// Output formatting
    #[serde(default)]
    pub output: OutputConfig,

    /// Explicit page manifest
    #[serde(default, rename = "page", skip_serializing_if = "Vec::is_empty")]
    pub manifest: Vec<PageEntry>,
}

impl Config {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        toml::from_str(&content).map_err(|err| ConfigError::Parse(path.to_path_buf(), err))
    }

    /// Load config for the given CLI invocation.
    ///
    /// A missing config file is not an error: defaults apply.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = resolve_root(cli.root.as_deref(), None);
        Self::load_at(&root, cli)
    }

    /// Load config from an already expanded and normalized project root.
    fn load_at(root: &Path, cli: &Cli) -> Result<Self> {
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli, root);
        Ok(config)
    }

    /// Naming conventions for page discovery.
    pub fn layout(&self) -> PageLayout<'_> {
        PageLayout {
            templates: self.pages.templates,
            home: &self.pages.home,
            root_slug: &self.pages.root_slug,
            sort: self.pages.sort,
            ..PageLayout::new(&self.root, &self.pages.dir)
        }
    }

    /// Whether pages come from `[[page]]` entries instead of a scan.
    #[inline]
    pub fn has_manifest(&self) -> bool {
        !self.manifest.is_empty()
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli, root: &Path) {
        Self::update_option(&mut self.pages.dir, cli.pages.as_ref());
        Self::update_option(&mut self.env.mode, cli.mode.as_ref());

        self.update_path_with_root(root, &cli.config);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config_file: &Path) {
        self.config_path = Self::normalize_path(&root.join(config_file));

        self.pages.dir = Self::normalize_path(&root.join(expand_tilde(&self.pages.dir, None)));
        self.env.dir = Self::normalize_path(&root.join(expand_tilde(&self.env.dir, None)));
        self.root = root.to_path_buf();
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate naming rules, overlay prefixes and manifest entries.
    pub fn validate(&self) -> Result<()> {
        Self::check_name("[pages.home]", &self.pages.home)?;
        Self::check_name("[pages.root_slug]", &self.pages.root_slug)?;

        if self.env.prefixes.iter().any(String::is_empty) {
            bail!(ConfigError::Validation(
                "[env.prefixes] must not contain an empty prefix".into()
            ));
        }

        if self.env.mode.is_empty() {
            bail!(ConfigError::Validation("[env.mode] must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for entry in &self.manifest {
            Self::check_name("[[page]].name", &entry.name)?;
            if let Some(slug) = &entry.slug {
                Self::check_name("[[page]].slug", slug)?;
            }
            if !seen.insert(entry.name.as_str()) {
                bail!(ConfigError::Validation(format!(
                    "[[page]] `{}` is declared more than once",
                    entry.name
                )));
            }
        }

        Ok(())
    }

    /// A page name or slug must be a single, non-empty path component.
    fn check_name(field: &str, name: &str) -> Result<()> {
        if name.is_empty() {
            bail!(ConfigError::Validation(format!("{field} must not be empty")));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            bail!(ConfigError::Validation(format!(
                "{field} `{name}` must be a plain name, not a path"
            )));
        }
        Ok(())
    }
}

/// Expand `--root` (default `./`) and make it absolute.
///
/// `home` replaces the user's home directory for `~` expansion.
fn resolve_root(root: Option<&Path>, home: Option<&Path>) -> PathBuf {
    let root = root.unwrap_or(Path::new("./"));
    Config::normalize_path(&expand_tilde(root, home))
}

/// Expand a leading `~` in a path.
fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    let expanded = match home {
        Some(home) => shellexpand::tilde_with_context(s, || home.to_str()),
        None => shellexpand::tilde(s),
    };
    PathBuf::from(expanded.into_owned())
}

// ============================================================================
// Tests
// ============================================================================
