// src/apply.rs
//! Filesystem mutation phase. Applies planned renames with files first,
//! then folders deepest-first, so a parent directory never moves out from
//! under its children. Each rename is a single `fs::rename`, no retries;
//! a failure is reported for that entry and processing continues.

use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::decision::{Action, Kind, PlannedChange};

/// Selective-application filters (`--apply` options). All default to "apply
/// everything".
#[derive(Debug, Default)]
pub struct ApplyFilters {
    /// Only entries whose name matches one of these globs (case-insensitive).
    pub include: Vec<String>,
    /// Entries whose name matches one of these globs are left alone.
    pub exclude: Vec<String>,
    pub files_only: bool,
    pub folders_only: bool,
    /// Only entries under this root-relative prefix.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Apply the `Renamed` subset of `changes` under `root`.
pub fn apply_changes(
    root: &Path,
    changes: &[PlannedChange],
    filters: &ApplyFilters,
) -> Result<ApplySummary> {
    let include = build_globset(&filters.include)?;
    let exclude = build_globset(&filters.exclude)?;

    let mut files: Vec<&PlannedChange> = Vec::new();
    let mut folders: Vec<&PlannedChange> = Vec::new();
    let mut summary = ApplySummary::default();

    for c in changes {
        if c.action != Action::Renamed {
            continue;
        }
        if !selected(c, filters, include.as_ref(), exclude.as_ref()) {
            summary.skipped += 1;
            continue;
        }
        match c.kind {
            Kind::File => files.push(c),
            Kind::Folder => folders.push(c),
        }
    }

    // Renaming a folder rewrites its children's paths, so children go first.
    folders.sort_by_key(|c| Reverse(c.original.components().count()));

    for c in files.iter().chain(folders.iter()) {
        let from = root.join(&c.original);
        let to = root.join(&c.target);
        if to.exists() {
            eprintln!(
                "error: target already exists, skipping {} {} -> {}",
                c.kind,
                from.display(),
                to.display()
            );
            summary.failed += 1;
            continue;
        }
        match fs::rename(&from, &to) {
            Ok(()) => {
                println!("{}: {} -> {}", c.kind, c.original.display(), c.target.display());
                summary.applied += 1;
            }
            Err(e) => {
                eprintln!(
                    "error renaming {} {} -> {}: {}",
                    c.kind,
                    from.display(),
                    to.display(),
                    e
                );
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

fn selected(
    c: &PlannedChange,
    filters: &ApplyFilters,
    include: Option<&GlobSet>,
    exclude: Option<&GlobSet>,
) -> bool {
    if filters.files_only && c.kind == Kind::Folder {
        return false;
    }
    if filters.folders_only && c.kind == Kind::File {
        return false;
    }
    if let Some(prefix) = &filters.path {
        if !c.original.starts_with(prefix) {
            return false;
        }
    }
    let name = c.original_file_name();
    if let Some(ex) = exclude {
        if ex.is_match(&name) {
            return false;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&name) {
            return false;
        }
    }
    true
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for p in patterns {
        let glob = GlobBuilder::new(p)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("invalid pattern `{p}`"))?;
        builder.add(glob);
    }
    Ok(Some(builder.build().context("building pattern set")?))
}

/* ================================== Tests ================================== */

#[cfg(test)]
mod tests {
    use super::*;

    fn change(kind: Kind, original: &str, target: &str) -> PlannedChange {
        PlannedChange {
            kind,
            original: PathBuf::from(original),
            target: PathBuf::from(target),
            action: Action::Renamed,
        }
    }

    #[test]
    fn filters_by_kind_and_pattern() {
        let filters = ApplyFilters {
            files_only: true,
            exclude: vec!["*.zip".into()],
            ..Default::default()
        };
        let inc = None;
        let exc = build_globset(&filters.exclude).unwrap();

        let file = change(Kind::File, "a b.txt", "000_a_b.txt");
        let zipped = change(Kind::File, "Archive.ZIP", "001_archive.ZIP");
        let folder = change(Kind::Folder, "Stuff", "000_stuff");

        assert!(selected(&file, &filters, inc, exc.as_ref()));
        // Case-insensitive, like the original matcher.
        assert!(!selected(&zipped, &filters, inc, exc.as_ref()));
        assert!(!selected(&folder, &filters, inc, exc.as_ref()));
    }

    #[test]
    fn filters_by_path_prefix() {
        let filters = ApplyFilters {
            path: Some(PathBuf::from("docs")),
            ..Default::default()
        };
        let inside = change(Kind::File, "docs/My Notes.md", "docs/000_my_notes.md");
        let outside = change(Kind::File, "src/My Notes.md", "src/000_my_notes.md");
        assert!(selected(&inside, &filters, None, None));
        assert!(!selected(&outside, &filters, None, None));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(build_globset(&["[".to_string()]).is_err());
    }

    #[test]
    fn renames_files_then_folders_deepest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("Outer Dir/Inner Dir")).unwrap();
        std::fs::write(root.join("Outer Dir/Inner Dir/a file.txt"), b"x").unwrap();

        let changes = vec![
            change(Kind::Folder, "Outer Dir", "000_outer_dir"),
            change(Kind::Folder, "Outer Dir/Inner Dir", "Outer Dir/000_inner_dir"),
            change(
                Kind::File,
                "Outer Dir/Inner Dir/a file.txt",
                "Outer Dir/Inner Dir/000_a_file.txt",
            ),
        ];
        let summary = apply_changes(root, &changes, &ApplyFilters::default()).unwrap();
        assert_eq!(summary.applied, 3);
        assert_eq!(summary.failed, 0);
        assert!(root
            .join("000_outer_dir/000_inner_dir/000_a_file.txt")
            .exists());
    }

    #[test]
    fn existing_target_fails_that_entry_only() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        std::fs::write(root.join("clash me.txt"), b"a").unwrap();
        std::fs::write(root.join("000_clash_me.txt"), b"b").unwrap();
        std::fs::write(root.join("fine.txt"), b"c").unwrap();

        let changes = vec![
            change(Kind::File, "clash me.txt", "000_clash_me.txt"),
            change(Kind::File, "fine.txt", "001_fine.txt"),
        ];
        let summary = apply_changes(root, &changes, &ApplyFilters::default()).unwrap();
        assert_eq!(summary.applied, 1);
        assert_eq!(summary.failed, 1);
        assert!(root.join("clash me.txt").exists());
        assert!(root.join("001_fine.txt").exists());
    }
}
