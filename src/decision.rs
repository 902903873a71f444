// src/decision.rs
//! Core record types: entry kinds, rename actions, and the decisions the
//! engine hands to the reporting and apply collaborators.

use std::{fmt, path::PathBuf};

/// File vs. folder. Sequencing restarts at 000 for each kind, so a file and
/// a folder in the same directory may share a numeric prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    File,
    Folder,
}

impl Kind {
    /// Case-insensitive parse used by the plan-file reader. Unknown -> None.
    pub fn parse<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref().to_ascii_lowercase().as_str() {
            "file" => Some(Kind::File),
            "folder" => Some(Kind::Folder),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::File => "File",
            Kind::Folder => "Folder",
        })
    }
}

/// Outcome of one decision: `Unchanged` iff the target equals the original.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Renamed,
    Unchanged,
}

impl Action {
    pub fn parse<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref().to_ascii_lowercase().as_str() {
            "renamed" => Some(Action::Renamed),
            "unchanged" => Some(Action::Unchanged),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Renamed => "Renamed",
            Action::Unchanged => "Unchanged",
        })
    }
}

/// One engine decision for a single directory entry. Names only, no paths:
/// the engine has no idea where the directory lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameDecision {
    pub kind: Kind,
    pub original_name: String,
    pub target_name: String,
    pub action: Action,
}

/// A decision anchored in the tree: paths are relative to the walk root so
/// they survive a round trip through the plan file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedChange {
    pub kind: Kind,
    pub original: PathBuf,
    pub target: PathBuf,
    pub action: Action,
}

impl PlannedChange {
    /// Final path component of the original, for name-based filters.
    pub fn original_file_name(&self) -> String {
        self.original
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/* ================================== Tests ================================== */
