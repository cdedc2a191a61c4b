//! `[env]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[env]` section in pagemap.toml - environment overlay settings.
///
/// # Example
/// ```toml
/// [env]
/// prefixes = ["VITE_", "PUBLIC_"]
/// dir = "."
/// mode = "production"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct EnvConfig {
    /// Only variables starting with one of these prefixes are exposed.
    #[serde(default = "defaults::env::prefixes")]
    #[educe(Default = defaults::env::prefixes())]
    pub prefixes: Vec<String>,

    /// Directory holding `.env` files.
    #[serde(default = "defaults::env::dir")]
    #[educe(Default = defaults::env::dir())]
    pub dir: PathBuf,

    /// Build mode selecting `.env.<mode>` files.
    #[serde(default = "defaults::env::mode")]
    #[educe(Default = defaults::env::mode())]
    pub mode: String,

    /// Read `.env` files. The process environment is always read.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub files: bool,
}
