// src/core/layout.rs

//! Source and build roots, and the mapping between them.

use anyhow::{Result, anyhow};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors raised while mapping source paths into the build tree.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The path does not live under the source root.
    #[error("Path '{path}' is not inside the source root '{root}'.")]
    OutsideSourceRoot {
        /// The rejected path.
        path: String,
        /// The source root it was checked against.
        root: String,
    },
}

/// The source and build roots of one generation run.
///
/// Every operation of the generator receives the layout explicitly; there is no
/// process-wide notion of "the" source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Root of the document corpus.
    pub source_root: PathBuf,
    /// Root the generated rules write into.
    pub build_root: PathBuf,
}

impl Layout {
    /// Creates a layout from the two roots, taken as given.
    pub fn new(source_root: impl Into<PathBuf>, build_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            build_root: build_root.into(),
        }
    }

    /// Returns `path` relative to the source root.
    pub fn relative_to_source<'a>(&self, path: &'a Path) -> Result<&'a Path, LayoutError> {
        path.strip_prefix(&self.source_root)
            .map_err(|_| LayoutError::OutsideSourceRoot {
                path: to_posix(path),
                root: to_posix(&self.source_root),
            })
    }

    /// Maps a source path to its location in the build tree, keeping the
    /// relative path and the suffix.
    ///
    /// `src/guide/intro.md` -> `build/guide/intro.md`
    pub fn build_path(&self, source: &Path) -> Result<String, LayoutError> {
        let relative = self.relative_to_source(source)?;
        Ok(to_posix(&self.build_root.join(relative)))
    }

    /// Same as [`Layout::build_path`] with the suffix replaced by `suffix`.
    pub fn build_path_with_suffix(&self, source: &Path, suffix: &str) -> Result<String, LayoutError> {
        let relative = self.relative_to_source(source)?;
        Ok(to_posix(&self.build_root.join(relative.with_extension(suffix))))
    }

    /// Whether a literal path written in a document already points into the
    /// build tree (absolute, or prefixed by the build root).
    pub fn is_build_literal(&self, literal: &Path) -> bool {
        let literal = strip_current_dir(literal);
        literal.is_absolute() || to_posix(literal).starts_with(&to_posix(&self.build_root))
    }

    /// Resolves a literal path relative to the source root.
    ///
    /// A literal that repeats the source root's own name as its first segment
    /// (`include('src/foo.md')`) is treated like one that omits it (`include('foo.md')`).
    pub fn resolve_source_literal(&self, literal: &Path) -> PathBuf {
        let literal = strip_current_dir(literal);
        let mut components = literal.components();
        if let (Some(Component::Normal(first)), Some(root_name)) =
            (literal.components().next(), self.source_root.file_name())
            && first == root_name
        {
            components.next();
        }
        let rest: PathBuf = components.collect();
        self.source_root.join(rest)
    }
}

/// Drops leading `./` segments, so `./src/a.md` reads like `src/a.md`.
pub fn strip_current_dir(literal: &Path) -> &Path {
    let mut components = literal.components();
    while components.clone().next() == Some(Component::CurDir) {
        components.next();
    }
    components.as_path()
}

/// Renders a path with forward slashes, the separator make expects.
pub fn to_posix(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        rendered.into_owned()
    } else {
        rendered.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Expands `~` and environment variables in a path coming from a config file.
pub fn expand_path(template: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(template)
        .map_err(|e| anyhow!("Failed to expand path '{}': {}", template, e))?;
    Ok(PathBuf::from(expanded.into_owned()))
}
