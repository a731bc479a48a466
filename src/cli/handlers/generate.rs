// src/cli/handlers/generate.rs

//! Prints the per-file rules and the dependency edges of a corpus.

use crate::{
    cli::Cli,
    constants::RULE_SOURCE_SUFFIX,
    core::{
        assembler,
        config::{ConfigFile, Settings},
        metadata::{FsMetadataLoader, MetadataSource},
        rule_gen,
    },
};
use anyhow::{Context, Result};
use std::{
    env,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors that stop a generation run before any output is produced.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The configured source directory is missing or not a directory.
    #[error("Directory does not exist: '{0}'")]
    MissingSourceDir(PathBuf),
}

/// The handler for a `docgraph` invocation.
/// Resolves the settings and writes the make rules to stdout.
pub fn handle(cli: Cli) -> Result<()> {
    let cwd = env::current_dir().context("Failed to determine the current directory")?;
    let config = ConfigFile::discover(cli.config.as_deref(), &cwd)?;
    let settings = Settings::resolve(cli.src, cli.build, config)?;
    log::debug!("Resolved settings: {:?}", settings);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&settings, &FsMetadataLoader, &mut out)?;
    out.flush().context("Failed to write rules to stdout")?;
    Ok(())
}

/// Writes the per-file rules of every `.yml` sidecar, then the dependency edges.
pub fn run(settings: &Settings, loader: &dyn MetadataSource, out: &mut dyn Write) -> Result<()> {
    let layout = &settings.layout;
    if !layout.source_root.is_dir() {
        log::error!(
            "Directory does not exist: '{}'",
            layout.source_root.display()
        );
        return Err(GenerateError::MissingSourceDir(layout.source_root.clone()).into());
    }

    for sidecar in sidecar_files(&layout.source_root) {
        let rule = rule_gen::generate_rule(&sidecar, layout, &settings.rules, loader)?;
        writeln!(out, "{}", rule)?;
    }

    for edge in assembler::generate_dependencies(layout, loader) {
        writeln!(out, "{}", edge)?;
    }
    Ok(())
}

/// All `.yml` files below `root`, in sorted walk order.
fn sidecar_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext == RULE_SOURCE_SUFFIX)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{config::RuleOptions, layout::Layout};
    use std::fs;
    use tempfile::TempDir;

    fn settings_for(dir: &TempDir) -> Settings {
        Settings {
            layout: Layout::new(dir.path().join("src"), dir.path().join("build")),
            rules: RuleOptions::default(),
        }
    }

    #[test]
    fn test_missing_source_dir() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let err = run(&settings_for(&dir), &FsMetadataLoader, &mut out).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerateError>(),
            Some(GenerateError::MissingSourceDir(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_sidecar_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("b")).unwrap();
        fs::write(src.join("z.yml"), "").unwrap();
        fs::write(src.join("a.yml"), "").unwrap();
        fs::write(src.join("a.md"), "").unwrap();
        fs::write(src.join("c.yaml"), "").unwrap();
        fs::write(src.join("b/inner.yml"), "").unwrap();

        let files = sidecar_files(&src);
        assert_eq!(
            files,
            vec![src.join("a.yml"), src.join("b/inner.yml"), src.join("z.yml")]
        );
    }

    #[test]
    fn test_rules_come_before_edges() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.md"), "See {{ \"b\" | link }}.").unwrap();
        fs::write(src.join("a.yml"), "id: a\n").unwrap();
        fs::write(src.join("b.md"), "---\nid: b\n---\nBody").unwrap();

        let mut out = Vec::new();
        run(&settings_for(&dir), &FsMetadataLoader, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let rule_pos = text.find("$(Q)process-yaml").unwrap();
        let edge = format!(
            "{}/a.md: {}/b.md",
            dir.path().join("build").display(),
            dir.path().join("build").display()
        );
        let edge_pos = text.find(&edge).unwrap();
        assert!(rule_pos < edge_pos);
        assert!(text.ends_with(&format!("{}\n", edge)));
    }
}
