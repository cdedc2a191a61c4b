//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [pages] Section Defaults
// ============================================================================

pub mod pages {
    use std::path::PathBuf;

    pub fn dir() -> PathBuf {
        "src/pages".into()
    }

    pub fn home() -> String {
        "home".into()
    }

    pub fn root_slug() -> String {
        "index".into()
    }
}

// ============================================================================
// [env] Section Defaults
// ============================================================================

pub mod env {
    use std::path::PathBuf;

    pub fn prefixes() -> Vec<String> {
        vec!["VITE_".into()]
    }

    pub fn dir() -> PathBuf {
        ".".into()
    }

    pub fn mode() -> String {
        "production".into()
    }
}
