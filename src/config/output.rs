//! `[output]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[output]` section in pagemap.toml - JSON output settings.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub pretty: bool,
}
