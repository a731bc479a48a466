//! # Metadata Loader
//!
//! Reads the metadata of a document from its Markdown front matter and its
//! YAML sidecar, merging both into a single [`DocumentMetadata`]. The generator
//! only talks to this module through the [`MetadataSource`] trait.

use crate::{
    constants::{BODY_SUFFIX, SIDECAR_SUFFIXES},
    core::layout::to_posix,
    models::DocumentMetadata,
};
use serde_yaml::{Mapping, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Represents errors that can occur while loading a document's metadata.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The file could not be read.
    #[error("Failed to read metadata from '{path}': {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The YAML content is invalid.
    #[error("Failed to parse YAML in '{path}': {source}")]
    Yaml {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying parsing error from `serde_yaml`.
        #[source]
        source: serde_yaml::Error,
    },
    /// The YAML content parsed, but is not a mapping.
    #[error("Metadata in '{path}' is not a mapping.")]
    NotAMapping {
        /// The offending file.
        path: PathBuf,
    },
}

/// Anything able to produce the metadata of a document given one of its files.
pub trait MetadataSource {
    /// Returns the merged metadata of the document `path` belongs to, or
    /// `None` when neither its body nor its sidecar carries any.
    fn load(&self, path: &Path) -> Result<Option<DocumentMetadata>, MetadataError>;
}

/// Loads metadata from the filesystem: `<base>.md` front matter plus
/// `<base>.yml` (or `<base>.yaml`), the sidecar winning on conflicts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMetadataLoader;

impl MetadataSource for FsMetadataLoader {
    fn load(&self, path: &Path) -> Result<Option<DocumentMetadata>, MetadataError> {
        let merged = match load_merged_mapping(path)? {
            Some(mapping) => mapping,
            None => return Ok(None),
        };
        let metadata = serde_yaml::from_value(Value::Mapping(merged)).map_err(|source| {
            MetadataError::Yaml {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Some(metadata))
    }
}

/// Loads and merges the raw mappings of the document `path` belongs to.
pub fn load_merged_mapping(path: &Path) -> Result<Option<Mapping>, MetadataError> {
    let body_path = path.with_extension(BODY_SUFFIX);
    let body = if body_path.is_file() {
        let content = read_file(&body_path)?;
        match extract_front_matter(&content) {
            Some(raw) => parse_mapping(raw.as_str(), &body_path)?,
            None => {
                log::trace!("No front matter found in '{}'", body_path.display());
                None
            }
        }
    } else {
        None
    };

    let sidecar_path = SIDECAR_SUFFIXES
        .iter()
        .map(|suffix| path.with_extension(suffix))
        .find(|candidate| candidate.is_file());
    let sidecar = match &sidecar_path {
        Some(sidecar_path) => parse_mapping(&read_file(sidecar_path)?, sidecar_path)?,
        None => None,
    };

    let (mut combined, sidecar) = match (body, sidecar) {
        (None, None) => return Ok(None),
        (Some(body), sidecar) => (body, sidecar),
        (None, Some(sidecar)) => return Ok(Some(sidecar)),
    };

    if let (Some(sidecar), Some(sidecar_path)) = (sidecar, sidecar_path) {
        for (key, value) in sidecar {
            if let Some(previous) = combined.get(&key)
                && *previous != value
            {
                log::warn!(
                    "Conflict for '{}', using value from {}",
                    describe_key(&key),
                    to_posix(&sidecar_path)
                );
            }
            combined.insert(key, value);
        }
    }

    Ok(Some(combined))
}

/// Extracts the raw YAML of a front matter block.
///
/// The first line must be `---` (a leading BOM is tolerated); the block ends at
/// the next `---` or `...` line, or at the end of the file.
pub fn extract_front_matter(content: &str) -> Option<String> {
    let mut lines = content.lines();
    let first = lines.next()?.trim_start_matches('\u{feff}');
    if first.trim() != "---" {
        return None;
    }

    let yaml_lines: Vec<&str> = lines
        .take_while(|line| {
            let trimmed = line.trim();
            trimmed != "---" && trimmed != "..."
        })
        .collect();
    Some(yaml_lines.join("\n"))
}

fn read_file(path: &Path) -> Result<String, MetadataError> {
    fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses YAML text that must be a mapping. Empty documents yield `None`.
fn parse_mapping(raw: &str, path: &Path) -> Result<Option<Mapping>, MetadataError> {
    let value: Value = serde_yaml::from_str(raw).map_err(|source| MetadataError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Null => Ok(None),
        Value::Mapping(mapping) => Ok(Some(mapping)),
        _ => Err(MetadataError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

fn describe_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extract_front_matter() {
        let raw = extract_front_matter("---\nid: intro\ntitle: Intro\n---\n# Body\n").unwrap();
        assert_eq!(raw, "id: intro\ntitle: Intro");
    }

    #[test]
    fn test_extract_front_matter_with_bom_and_dots_terminator() {
        let raw = extract_front_matter("\u{feff}---\nid: x\n...\nbody").unwrap();
        assert_eq!(raw, "id: x");
    }

    #[test]
    fn test_no_front_matter() {
        assert!(extract_front_matter("# Title\n---\nid: x\n---\n").is_none());
        assert!(extract_front_matter("").is_none());
    }

    #[test]
    fn test_load_missing_files_returns_none() {
        let dir = TempDir::new().unwrap();
        let result = FsMetadataLoader.load(&dir.path().join("ghost.md")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_markdown_without_front_matter_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.md");
        fs::write(&path, "just text").unwrap();
        assert!(FsMetadataLoader.load(&path).unwrap().is_none());
    }

    #[test]
    fn test_sidecar_overrides_front_matter() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("post.md"),
            "---\nid: draft\ntitle: Draft\n---\nbody",
        )
        .unwrap();
        fs::write(dir.path().join("post.yml"), "title: Example\n").unwrap();

        let meta = FsMetadataLoader
            .load(&dir.path().join("post.yml"))
            .unwrap()
            .unwrap();
        assert_eq!(meta.declared_id(), Some("draft"));
        assert_eq!(meta.title.as_deref(), Some("Example"));
    }

    #[test]
    fn test_yml_preferred_over_yaml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("doc.yml"), "id: from-yml\n").unwrap();
        fs::write(dir.path().join("doc.yaml"), "id: from-yaml\n").unwrap();

        let meta = FsMetadataLoader
            .load(&dir.path().join("doc.md"))
            .unwrap()
            .unwrap();
        assert_eq!(meta.declared_id(), Some("from-yml"));
    }

    #[test]
    fn test_empty_sidecar_yields_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.yml");
        fs::write(&path, "").unwrap();
        assert!(FsMetadataLoader.load(&path).unwrap().is_none());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yml");
        fs::write(&path, "id: [unclosed\n").unwrap();
        assert!(matches!(
            FsMetadataLoader.load(&path),
            Err(MetadataError::Yaml { .. })
        ));
    }

    #[test]
    fn test_scalar_sidecar_is_not_a_mapping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scalar.yml");
        fs::write(&path, "just a string\n").unwrap();
        assert!(matches!(
            FsMetadataLoader.load(&path),
            Err(MetadataError::NotAMapping { .. })
        ));
    }
}
