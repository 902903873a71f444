// src/report.rs
//! Rendering of rename decisions: tab-separated console stream, the
//! regenerated Markdown preview, and the editable plan file with its
//! parser. The Markdown artifacts are human previews, never state the
//! engine reads back.

use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;

use crate::{
    decision::{Action, Kind, PlannedChange},
    normalize,
};

/// `Type\tOriginal Name\tNew Name\tAction` on stdout.
pub fn print_console(changes: &[PlannedChange]) {
    println!("Type\tOriginal Name\tNew Name\tAction");
    for c in changes {
        println!(
            "{}\t{}\t{}\t{}",
            c.kind,
            c.original.display(),
            c.target.display(),
            c.action
        );
    }
}

/// Write (overwrite) the dry-run preview table.
pub fn write_preview(changes: &[PlannedChange], out: &Path) -> Result<()> {
    let mut f = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    writeln!(f, "# Standardization Preview")?;
    writeln!(f)?;
    writeln!(f, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(f)?;
    writeln!(f, "| Type | Original Name | New Name | Action |")?;
    writeln!(f, "|------|---------------|----------|--------|")?;
    for c in changes {
        writeln!(
            f,
            "| {} | {} | {} | {} |",
            c.kind,
            c.original.display(),
            c.target.display(),
            c.action
        )?;
    }
    Ok(())
}

/// Write the editable plan. Same table as the preview plus a Notes column;
/// the reader only acts on rows whose Action survives as `Renamed`.
pub fn write_plan(changes: &[PlannedChange], out: &Path) -> Result<()> {
    let mut f = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    writeln!(f, "# Standardization Plan (Editable)")?;
    writeln!(f)?;
    writeln!(f, "**Instructions:**")?;
    writeln!(f, "- Edit the 'New Name' column to customize the new names")?;
    writeln!(f, "- Delete entire rows to skip those changes")?;
    writeln!(f, "- Keep the table format intact")?;
    writeln!(f, "- Run `tidy-tree --execute` to apply changes from this file")?;
    writeln!(f)?;
    writeln!(f, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(f)?;
    writeln!(f, "| Type | Original Name | New Name | Action | Notes |")?;
    writeln!(f, "|------|---------------|----------|--------|-------|")?;
    for c in changes {
        let notes = if c.action == Action::Renamed {
            "editable"
        } else {
            ""
        };
        writeln!(
            f,
            "| {} | {} | {} | {} | {} |",
            c.kind,
            c.original.display(),
            c.target.display(),
            c.action,
            notes
        )?;
    }
    Ok(())
}

/// Parse an edited plan back into changes. Only well-formed rows with action
/// `Renamed` come back; everything else (headers, separators, deleted or
/// mangled rows) is skipped.
pub fn read_plan(path: &Path) -> Result<Vec<PlannedChange>> {
    let f = File::open(path).with_context(|| format!("opening plan {}", path.display()))?;
    let rdr = BufReader::new(f);

    let mut in_table = false;
    let mut changes = Vec::new();
    for line in rdr.lines() {
        let line = line.context("reading plan line")?;
        let line = line.trim();
        if !in_table {
            if line.starts_with("| Type |") || line.starts_with("|---") {
                in_table = true;
            }
            continue;
        }
        if !line.starts_with('|') || line.starts_with("|---") {
            continue;
        }
        let cells: Vec<&str> = line
            .trim_matches('|')
            .split('|')
            .map(str::trim)
            .collect();
        if cells.len() < 4 {
            continue;
        }
        let (Some(kind), Some(action)) = (Kind::parse(cells[0]), Action::parse(cells[3])) else {
            continue;
        };
        if action != Action::Renamed {
            continue;
        }
        changes.push(PlannedChange {
            kind,
            original: PathBuf::from(cells[1]),
            target: PathBuf::from(cells[2]),
            action,
        });
    }
    Ok(changes)
}

/// How many originals are already in target form. Reporting only; compliant
/// entries are still re-sequenced.
pub fn compliant_count(changes: &[PlannedChange]) -> usize {
    changes
        .iter()
        .filter(|c| normalize::is_compliant(&c.original_file_name(), c.kind))
        .count()
}

/* ================================== Tests ================================== */
