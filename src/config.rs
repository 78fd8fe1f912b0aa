//! Parser configuration.
//!
//! [`ParserConfig`] carries everything a parse needs from the outside world: where to look for
//! typesystem documents named by `load-typesystem`, where `import-file` falls back to, which API
//! version is being generated and how `since` versions are compared against it.
//!
//! ## Examples
//! ```rust
//! use typesys::config::ParserConfig;
//!
//! let config = ParserConfig::new()
//!     .with_api_version(4.5)
//!     .with_import_fallback_dir("snippets");
//! assert_eq!(config.api_version, Some(4.5));
//! ```

use std::env;
use std::path::PathBuf;

use crate::version::{self, VersionPolicy};

/// Environment variable holding extra typesystem search paths (platform path-list syntax).
pub const TYPESYS_PATH_ENV: &str = "TYPESYS_PATH";

/// Configuration options for parsing typesystem documents.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Directories searched, in order, for documents named by `load-typesystem`.
    pub typesystem_paths: Vec<PathBuf>,
    /// Second location searched by `import-file` when the name does not resolve as given.
    pub import_fallback_dir: Option<PathBuf>,
    /// API version being generated; `None` accepts every `since`.
    pub api_version: Option<f64>,
    /// Comparison between a tag's `since` and [`Self::api_version`].
    pub version_policy: VersionPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let typesystem_paths = env::var_os(TYPESYS_PATH_ENV)
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self {
            typesystem_paths,
            import_fallback_dir: None,
            api_version: None,
            version_policy: version::inclusive,
        }
    }
}

impl ParserConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a typesystem search directory.
    pub fn with_typesystem_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.typesystem_paths.push(path.into());
        self
    }

    /// Set the `import-file` fallback directory.
    pub fn with_import_fallback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.import_fallback_dir = Some(dir.into());
        self
    }

    /// Pin the API version being generated.
    pub fn with_api_version(mut self, version: f64) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Replace the `since` comparison.
    pub fn with_version_policy(mut self, policy: VersionPolicy) -> Self {
        self.version_policy = policy;
        self
    }

    /// Whether a tag introduced in `since` is part of the configured API.
    pub fn supports(&self, since: f64) -> bool {
        (self.version_policy)(since, self.api_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_fields() {
        let config = ParserConfig::new()
            .with_typesystem_path("a")
            .with_api_version(2.0)
            .with_version_policy(version::exclusive);
        assert!(config.typesystem_paths.ends_with(&[PathBuf::from("a")]));
        assert!(config.supports(1.0));
        assert!(!config.supports(2.0));
    }

    #[test]
    fn unpinned_version_supports_everything() {
        assert!(ParserConfig::new().supports(100.0));
    }
}
