// src/core/assembler.rs

//! Assembles the corpus-wide dependency rules.

use crate::core::{
    cycles, extractor,
    id_index::{self, collect_ids},
    layout::Layout,
    metadata::MetadataSource,
};
use std::collections::BTreeSet;
use std::fs;

/// Returns the cross-document dependency rules of the corpus, cycle-free and
/// in sorted acceptance order.
///
/// The id index is built once; every corpus file is then read and scanned. A
/// file that cannot be read is logged and skipped.
pub fn generate_dependencies(layout: &Layout, loader: &dyn MetadataSource) -> Vec<String> {
    let index = collect_ids(layout, loader);
    let mut rules: BTreeSet<String> = BTreeSet::new();

    for path in id_index::document_files(&layout.source_root) {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to read file '{}': {}", path.display(), e);
                continue;
            }
        };

        let edges = extractor::extract_references(&path, &text, &index, layout);
        log::trace!("'{}' contributes {} candidate rules", path.display(), edges.len());
        rules.extend(edges);
    }

    log::debug!("Collected {} candidate dependency rules", rules.len());
    cycles::remove_cycles(&rules)
}
