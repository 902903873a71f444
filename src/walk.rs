// src/walk.rs
//! Tree traversal: lists each directory, filters hidden/ignored entries,
//! and runs the sequencing engine once per (directory, kind) partition.
//!
//! The engine itself never sees a path or a filter; this module owns both.
//! Sibling directories are independent, so a failure in one is collected
//! and the walk carries on.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use ignore::WalkBuilder;

use crate::{
    decision::{Kind, PlannedChange},
    error::EngineError,
    sequence,
};

#[derive(Clone, Debug, Default)]
pub struct WalkOptions {
    /// Process entries whose name starts with `.` instead of skipping them.
    pub include_hidden: bool,
    /// Directory names pruned from the walk entirely (never descended into,
    /// never renamed).
    pub ignore_dirs: BTreeSet<String>,
}

/// A directory- or entry-scoped engine failure, reported but never fatal
/// for the rest of the tree.
#[derive(Debug)]
pub struct DirectoryFailure {
    pub dir: PathBuf,
    pub error: EngineError,
}

/// Everything one dry run produces. Paths are relative to the walk root.
#[derive(Debug, Default)]
pub struct TreePlan {
    pub changes: Vec<PlannedChange>,
    pub failures: Vec<DirectoryFailure>,
}

impl TreePlan {
    pub fn renamed_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| c.action == crate::decision::Action::Renamed)
            .count()
    }
}

/// Compute the full set of rename decisions for the tree rooted at `root`.
/// Folders are numbered before files within each directory, matching the
/// report layout; the two partitions never share a sequence.
pub fn plan_tree(root: &Path, opts: &WalkOptions) -> Result<TreePlan> {
    let mut plan = TreePlan::default();

    let include_hidden = opts.include_hidden;
    let ignore_dirs = opts.ignore_dirs.clone();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if !include_hidden && name.starts_with('.') {
                return false;
            }
            let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
            !(is_dir && ignore_dirs.contains(name.as_ref()))
        })
        .build();

    for dent in walker.filter_map(|e| e.ok()) {
        if !dent.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let dir = dent.path();
        let Ok(listing) = read_listing(dir, opts) else {
            continue; // unreadable directory, nothing to plan
        };
        let rel = dir.strip_prefix(root).unwrap_or(dir).to_path_buf();

        plan_partition(&mut plan, &rel, Kind::Folder, &listing.folders, &listing.reserved_folders);
        plan_partition(&mut plan, &rel, Kind::File, &listing.files, &listing.reserved_files);
    }

    Ok(plan)
}

fn plan_partition(
    plan: &mut TreePlan,
    rel: &Path,
    kind: Kind,
    names: &[String],
    reserved: &BTreeSet<String>,
) {
    if names.is_empty() {
        return;
    }
    match sequence::assign_sequences(kind, names, reserved) {
        Ok(partition) => {
            for (_, error) in partition.skipped {
                plan.failures.push(DirectoryFailure {
                    dir: rel.to_path_buf(),
                    error,
                });
            }
            for d in partition.decisions {
                plan.changes.push(PlannedChange {
                    kind,
                    original: rel.join(&d.original_name),
                    target: rel.join(&d.target_name),
                    action: d.action,
                });
            }
        }
        Err(error) => plan.failures.push(DirectoryFailure {
            dir: rel.to_path_buf(),
            error,
        }),
    }
}

#[derive(Default)]
struct DirListing {
    files: Vec<String>,
    folders: Vec<String>,
    /// On-disk names the engine must route around but never rename:
    /// hidden entries and ignored directories.
    reserved_files: BTreeSet<String>,
    reserved_folders: BTreeSet<String>,
}

fn read_listing(dir: &Path, opts: &WalkOptions) -> std::io::Result<DirListing> {
    let mut listing = DirListing::default();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type()?.is_dir();
        let hidden = name.starts_with('.');
        let ignored = is_dir && opts.ignore_dirs.contains(&name);

        if ignored || (hidden && !opts.include_hidden) {
            if is_dir {
                listing.reserved_folders.insert(name);
            } else {
                listing.reserved_files.insert(name);
            }
        } else if is_dir {
            listing.folders.push(name);
        } else {
            listing.files.push(name);
        }
    }
    Ok(listing)
}

/* ================================== Tests ================================== */
