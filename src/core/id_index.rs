// src/core/id_index.rs

//! Index from document ids to the files that declare them.

use crate::{
    constants::DOCUMENT_SUFFIXES,
    core::{layout::Layout, metadata::MetadataSource},
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Maps document ids to the source file that first represented the document.
#[derive(Debug, Default, Clone)]
pub struct IdIndex {
    ids: HashMap<String, PathBuf>,
}

impl IdIndex {
    /// Returns the source path of the document with the given id.
    pub fn get(&self, id: &str) -> Option<&Path> {
        self.ids.get(id).map(PathBuf::as_path)
    }

    /// Whether a document with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Number of indexed ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no document was indexed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Records `id -> path`. An existing entry for the same id is replaced.
    pub fn insert(&mut self, id: String, path: PathBuf) {
        if let Some(previous) = self.ids.insert(id.clone(), path) {
            log::debug!(
                "Id '{}' was already assigned to '{}'; keeping the later document.",
                id,
                previous.display()
            );
        }
    }
}

/// Whether `path` has one of the suffixes that make a file part of the corpus.
pub fn is_document_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DOCUMENT_SUFFIXES
                .iter()
                .any(|suffix| ext.eq_ignore_ascii_case(suffix))
        })
}

/// Walks the source tree and returns every corpus file, in a stable order.
///
/// Entries that cannot be read are logged and skipped.
pub fn document_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry under '{}': {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_document_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Builds the id index of the corpus under `layout.source_root`.
///
/// Paired files (`post.md` + `post.yml`) are one document: only the first file
/// of each base name is looked at. A document without a declared id is keyed
/// by its file stem. Metadata failures are logged and never abort the walk.
pub fn collect_ids(layout: &Layout, loader: &dyn MetadataSource) -> IdIndex {
    let mut index = IdIndex::default();
    let mut processed: HashSet<PathBuf> = HashSet::new();

    for path in document_files(&layout.source_root) {
        let base = path.with_extension("");
        if !processed.insert(base) {
            continue;
        }

        let declared = match loader.load(&path) {
            Ok(Some(metadata)) => metadata.declared_id().map(str::to_string),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to parse metadata for '{}': {}", path.display(), e);
                None
            }
        };

        let id = match declared {
            Some(id) => id,
            None => match path.file_stem() {
                Some(stem) => stem.to_string_lossy().into_owned(),
                None => continue,
            },
        };
        log::trace!("Indexed id '{}' -> '{}'", id, path.display());
        index.insert(id, path);
    }

    log::debug!("Collected {} document ids", index.len());
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::FsMetadataLoader;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Layout) {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        let layout = Layout::new(src, dir.path().join("build"));
        (dir, layout)
    }

    #[test]
    fn test_declared_id_and_stem_fallback() {
        let (_dir, layout) = setup();
        let src = &layout.source_root;
        fs::write(src.join("quickstart.md"), "---\nid: qs\n---\nbody").unwrap();
        fs::create_dir_all(src.join("guide")).unwrap();
        fs::write(src.join("guide/intro.md"), "no front matter").unwrap();
        fs::write(src.join("notes.txt"), "ignored").unwrap();

        let index = collect_ids(&layout, &FsMetadataLoader);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("qs"), Some(src.join("quickstart.md").as_path()));
        assert_eq!(index.get("intro"), Some(src.join("guide/intro.md").as_path()));
        assert!(!index.contains("quickstart"));
    }

    #[test]
    fn test_paired_files_are_one_document() {
        let (_dir, layout) = setup();
        let src = &layout.source_root;
        fs::write(src.join("post.md"), "body").unwrap();
        fs::write(src.join("post.yml"), "id: the-post\n").unwrap();

        let index = collect_ids(&layout, &FsMetadataLoader);
        assert_eq!(index.len(), 1);
        // `post.md` sorts first and represents the pair.
        assert_eq!(index.get("the-post"), Some(src.join("post.md").as_path()));
    }

    #[test]
    fn test_bad_metadata_falls_back_to_stem() {
        let (_dir, layout) = setup();
        let src = &layout.source_root;
        fs::write(src.join("broken.yml"), "id: [oops\n").unwrap();
        fs::write(src.join("fine.md"), "---\nid: fine-doc\n---\n").unwrap();

        let index = collect_ids(&layout, &FsMetadataLoader);
        assert!(index.contains("broken"));
        assert!(index.contains("fine-doc"));
    }

    #[test]
    fn test_declared_id_survives_odd_shaped_fields() {
        let (_dir, layout) = setup();
        let src = &layout.source_root;
        fs::write(
            src.join("post.md"),
            "---\nid: real-id\ntitle: [Part, One]\n---\nbody",
        )
        .unwrap();
        fs::write(src.join("page.yml"), "id: page-id\nhtml: wide\n").unwrap();

        let index = collect_ids(&layout, &FsMetadataLoader);
        assert_eq!(index.get("real-id"), Some(src.join("post.md").as_path()));
        assert_eq!(index.get("page-id"), Some(src.join("page.yml").as_path()));
        assert!(!index.contains("post"));
        assert!(!index.contains("page"));
    }

    #[test]
    fn test_duplicate_ids_keep_last_document() {
        let (_dir, layout) = setup();
        let src = &layout.source_root;
        fs::write(src.join("a.md"), "---\nid: dup\n---\n").unwrap();
        fs::write(src.join("b.md"), "---\nid: dup\n---\n").unwrap();

        let index = collect_ids(&layout, &FsMetadataLoader);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("dup"), Some(src.join("b.md").as_path()));
    }

    #[test]
    fn test_uppercase_suffix_is_a_document() {
        assert!(is_document_file(Path::new("src/README.MD")));
        assert!(is_document_file(Path::new("src/a.YAML")));
        assert!(!is_document_file(Path::new("src/a.json")));
        assert!(!is_document_file(Path::new("src/Makefile")));
    }
}
