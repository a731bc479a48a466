// src/core/resolver.rs

//! Turns inclusion calls into build-tree dependencies.

use crate::{
    constants::DEFAULT_INCLUDE_GLOB,
    core::{
        arglist::parse_arglist,
        layout::{Layout, strip_current_dir, to_posix},
    },
    models::{Edge, IncludeCall},
};
use globset::{Glob, GlobMatcher};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Turns one inclusion call into `"<src_build>: <target>"` edges.
///
/// `raw_args` is the text between the call's parentheses. A malformed list is
/// logged at debug level and yields no edges.
pub fn resolve_include(
    call: IncludeCall,
    raw_args: &str,
    src_build: &str,
    layout: &Layout,
) -> Vec<String> {
    let args = match parse_arglist(raw_args) {
        Ok(args) => args,
        Err(e) => {
            log::debug!(
                "Ignoring malformed {}({}) in '{}': {}",
                call,
                raw_args,
                src_build,
                e
            );
            return Vec::new();
        }
    };

    let pattern = if call.accepts_glob() {
        args.keyword_literal("glob").unwrap_or(DEFAULT_INCLUDE_GLOB)
    } else {
        DEFAULT_INCLUDE_GLOB
    };
    let matcher = match Glob::new(pattern) {
        Ok(glob) => glob.compile_matcher(),
        Err(e) => {
            log::debug!("Ignoring {} call with invalid glob '{}': {}", call, pattern, e);
            return Vec::new();
        }
    };

    let mut rules = Vec::new();
    for literal in args.string_literals() {
        let literal = strip_current_dir(Path::new(literal));

        if layout.is_build_literal(literal) {
            for target in expand_targets(literal, &matcher) {
                rules.push(Edge::new(src_build, to_posix(&target)).to_string());
            }
            continue;
        }

        let source = layout.resolve_source_literal(literal);
        for target in expand_targets(&source, &matcher) {
            match layout.build_path(&target) {
                Ok(dep_build) => rules.push(Edge::new(src_build, dep_build).to_string()),
                Err(e) => log::debug!("Cannot map include target to the build tree: {}", e),
            }
        }
    }

    rules
}

/// Expands `path` into the files it designates: every file below it matching
/// `matcher` when it is a directory, the path itself otherwise.
///
/// Missing files are still returned, so the build tool reports them.
pub fn expand_targets(path: &Path, matcher: &GlobMatcher) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }

    WalkDir::new(path)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .strip_prefix(path)
                .is_ok_and(|relative| matcher.is_match(relative))
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}
