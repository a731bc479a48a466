//! # Configuration
//!
//! Optional `docgraph.toml` settings. Values given on the command line take
//! precedence over the file, which takes precedence over built-in defaults.

use crate::{
    constants::{
        CONFIG_FILENAME, DEFAULT_BUILD_DIR, DEFAULT_PREPROCESS_BARRIER, DEFAULT_SOURCE_DIR,
        DEFAULT_TEMPLATE_PLACEHOLDER,
    },
    core::layout::{Layout, expand_path},
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Represents errors that can occur while loading `docgraph.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        /// The path to the file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The TOML content is invalid.
    #[error("Failed to parse TOML file at '{path}': {source}")]
    TomlParse {
        /// The path to the file that failed to parse.
        path: PathBuf,
        /// The underlying parsing error from the `toml` crate.
        #[source]
        source: toml::de::Error,
    },
    /// A path in the file could not be expanded.
    #[error("Invalid path '{value}' in '{path}': {message}")]
    PathExpansion {
        /// The configuration file.
        path: PathBuf,
        /// The raw value.
        value: String,
        /// Why the expansion failed.
        message: String,
    },
}

/// The raw content of `docgraph.toml`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Source directory. `~` and environment variables are expanded.
    pub src: Option<String>,
    /// Build directory. `~` and environment variables are expanded.
    pub build: Option<String>,
    /// Settings for the per-file rules.
    #[serde(default)]
    pub rules: RulesConfig,
}

/// The `[rules]` table.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Template used when a document declares no `html.template`.
    pub default_template: Option<String>,
    /// Barrier sentinel, relative to the build root.
    pub barrier: Option<String>,
}

/// Options of the per-file rule generator, defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOptions {
    /// Template used when a document declares none.
    pub default_template: String,
    /// Barrier sentinel, relative to the build root.
    pub barrier: String,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            default_template: DEFAULT_TEMPLATE_PLACEHOLDER.to_string(),
            barrier: DEFAULT_PREPROCESS_BARRIER.to_string(),
        }
    }
}

/// Everything a generation run needs, after merging CLI flags, config and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Source and build roots.
    pub layout: Layout,
    /// Options of the per-file rules.
    pub rules: RuleOptions,
}

impl ConfigFile {
    /// Parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, otherwise `docgraph.toml` from `cwd` if it exists.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = cwd.join(CONFIG_FILENAME);
                if !candidate.is_file() {
                    return Ok(None);
                }
                candidate
            }
        };
        log::debug!("Loading configuration from '{}'", path.display());
        let config = Self::load(&path)?;
        Ok(Some((path, config)))
    }
}

impl Settings {
    /// Merges CLI values over the config file over the defaults.
    pub fn resolve(
        cli_src: Option<PathBuf>,
        cli_build: Option<PathBuf>,
        config: Option<(PathBuf, ConfigFile)>,
    ) -> Result<Self, ConfigError> {
        let (config_path, config) = match config {
            Some((path, config)) => (path, config),
            None => (PathBuf::new(), ConfigFile::default()),
        };

        let expand = |value: &str| {
            expand_path(value).map_err(|e| ConfigError::PathExpansion {
                path: config_path.clone(),
                value: value.to_string(),
                message: e.to_string(),
            })
        };

        let source_root = match (cli_src, config.src.as_deref()) {
            (Some(cli), _) => cli,
            (None, Some(value)) => expand(value)?,
            (None, None) => PathBuf::from(DEFAULT_SOURCE_DIR),
        };
        let build_root = match (cli_build, config.build.as_deref()) {
            (Some(cli), _) => cli,
            (None, Some(value)) => expand(value)?,
            (None, None) => PathBuf::from(DEFAULT_BUILD_DIR),
        };

        let defaults = RuleOptions::default();
        let rules = RuleOptions {
            default_template: config
                .rules
                .default_template
                .unwrap_or(defaults.default_template),
            barrier: config.rules.barrier.unwrap_or(defaults.barrier),
        };

        Ok(Self {
            layout: Layout::new(source_root, build_root),
            rules,
        })
    }
}
