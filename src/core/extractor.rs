// src/core/extractor.rs

//! Finds identifier references and inclusion calls in document text.

use crate::{
    core::{id_index::IdIndex, layout::Layout, resolver},
    models::{Edge, IncludeCall, Reference},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

lazy_static! {
    // {{ "quickstart" | link }}, {{ 'setup' | linktitle("#install") }}
    static ref LINK_FILTER_RE: Regex =
        Regex::new(r#"\{\{\s*["']([^"']+)["']\s*\|\s*link\w*"#).expect("valid link filter regex");

    // {{ link("quickstart") }}, {{ linkcap('setup', anchor="install") }}
    static ref LINK_GLOBAL_RE: Regex =
        Regex::new(r#"\{\{\s*link\w*\(\s*["']([^"']+)["']"#).expect("valid link global regex");

    static ref SCRIPT_BLOCK_RE: Regex =
        Regex::new(r"(?s)```python[ \t]*\r?\n(.*?)```").expect("valid script block regex");

    // The argument list stops at the first `)`; nested calls are not supported.
    static ref INCLUDE_CALL_RE: Regex =
        Regex::new(r"\b(include(?:_deflist_entry)?)\(\s*([^)]*)\)").expect("valid include regex");
}

/// Scans a document's raw text for identifier references and inclusion calls.
///
/// Identifier references come first (filter form, then global form), followed
/// by inclusion calls in the order their script blocks appear.
pub fn scan_references(text: &str) -> Vec<Reference> {
    let mut references: Vec<Reference> = LINK_FILTER_RE
        .captures_iter(text)
        .chain(LINK_GLOBAL_RE.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| Reference::Id(m.as_str().to_string()))
        .collect();

    for block in SCRIPT_BLOCK_RE.captures_iter(text).filter_map(|caps| caps.get(1)) {
        for caps in INCLUDE_CALL_RE.captures_iter(block.as_str()) {
            let call = caps
                .get(1)
                .and_then(|m| IncludeCall::from_name(m.as_str()));
            if let Some(call) = call {
                references.push(Reference::Include {
                    call,
                    args: caps.get(2).map_or("", |m| m.as_str()).to_string(),
                });
            }
        }
    }

    references
}

/// Returns every candidate edge contributed by the document at `path`.
///
/// Unknown ids are ignored without a diagnostic; malformed inclusion calls are
/// skipped by the resolver. Neither stops the scan of the rest of the text.
pub fn extract_references(
    path: &Path,
    text: &str,
    index: &IdIndex,
    layout: &Layout,
) -> BTreeSet<String> {
    let mut edges = BTreeSet::new();

    let src_build = match layout.build_path(path) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Skipping references of '{}': {}", path.display(), e);
            return edges;
        }
    };

    for reference in scan_references(text) {
        match reference {
            Reference::Id(id) => {
                let Some(target) = index.get(&id) else {
                    continue;
                };
                match layout.build_path(target) {
                    Ok(dep_build) => {
                        edges.insert(Edge::new(src_build.as_str(), dep_build).to_string());
                    }
                    Err(e) => log::debug!("Cannot map id '{}' to a build path: {}", id, e),
                }
            }
            Reference::Include { call, args } => {
                edges.extend(resolver::resolve_include(call, &args, &src_build, layout));
            }
        }
    }

    edges
}
