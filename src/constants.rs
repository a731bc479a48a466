// src/constants.rs

//! Shared constants: default directories, file suffixes and rule placeholders.

/// Default directory holding the source corpus.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Default directory where build artifacts are written.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Configuration file picked up from the working directory when `--config` is absent.
pub const CONFIG_FILENAME: &str = "docgraph.toml";

/// File suffixes (lowercase, without the dot) that make a file part of the corpus.
pub const DOCUMENT_SUFFIXES: &[&str] = &["md", "yml", "yaml"];

/// Suffix of the Markdown body file of a document.
pub const BODY_SUFFIX: &str = "md";

/// Suffixes of the sidecar metadata file, in lookup order.
pub const SIDECAR_SUFFIXES: &[&str] = &["yml", "yaml"];

/// Suffix of the sidecar files that receive a per-file build rule.
pub const RULE_SOURCE_SUFFIX: &str = "yml";

/// Suffix of the rendered output.
pub const RENDERED_SUFFIX: &str = "html";

/// Template used by the render stage when a document does not override it.
pub const DEFAULT_TEMPLATE_PLACEHOLDER: &str = "$(DEFAULT_TEMPLATE)";

/// Sentinel file, relative to the build root, marking that corpus-wide preprocessing finished.
pub const DEFAULT_PREPROCESS_BARRIER: &str = ".preprocessed";

/// Glob used to expand included directories when none is given.
pub const DEFAULT_INCLUDE_GLOB: &str = "*";
