// src/commands.rs

use anyhow::{bail, Context, Result};
use std::{env, fs, path::PathBuf};

use crate::{
    apply::{self, ApplyFilters},
    report,
    walk::{self, TreePlan, WalkOptions},
};

const PREVIEW_FILE: &str = "standardization_preview.md";
const PLAN_FILE: &str = "standardization_plan.md";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Preview,
    Apply,
    Prepare,
    Execute,
}

struct CliArgs {
    mode: Mode,
    walk: WalkOptions,
    filters: ApplyFilters,
}

pub fn run_cli() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args
        .iter()
        .any(|a| a == "help" || a == "--help" || a == "-h")
    {
        print_help();
        return Ok(());
    }
    let cli = parse_args(&args)?;
    let cwd = env::current_dir().context("failed to get current_dir")?;

    match cli.mode {
        Mode::Preview => preview(&cwd, &cli),
        Mode::Apply => apply_now(&cwd, &cli),
        Mode::Prepare => prepare_plan(&cwd, &cli),
        Mode::Execute => execute_plan(&cwd),
    }
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut mode = Mode::Preview;
    let mut modes_seen = 0usize;
    let mut walk = WalkOptions::default();
    let mut filters = ApplyFilters::default();

    for arg in args {
        if let Some((key, value)) = arg.split_once('=') {
            match key {
                "--ignore" => {
                    walk.ignore_dirs.insert(value.to_string());
                }
                "--include" => filters.include.push(value.to_string()),
                "--exclude" => filters.exclude.push(value.to_string()),
                "--path" => filters.path = Some(PathBuf::from(value)),
                _ => bail!("unknown option: {key} (try `tidy-tree help`)"),
            }
            continue;
        }
        match arg.as_str() {
            "--apply" => {
                mode = Mode::Apply;
                modes_seen += 1;
            }
            "--prepare" => {
                mode = Mode::Prepare;
                modes_seen += 1;
            }
            "--execute" => {
                mode = Mode::Execute;
                modes_seen += 1;
            }
            "--include-hidden" => walk.include_hidden = true,
            "--files-only" => filters.files_only = true,
            "--folders-only" => filters.folders_only = true,
            other => bail!("unknown argument: {other} (try `tidy-tree help`)"),
        }
    }

    if modes_seen > 1 {
        bail!("--apply, --prepare and --execute are mutually exclusive");
    }
    if filters.files_only && filters.folders_only {
        bail!("--files-only and --folders-only are mutually exclusive");
    }
    Ok(CliArgs {
        mode,
        walk,
        filters,
    })
}

fn scan_tree(cwd: &std::path::Path, cli: &CliArgs) -> Result<TreePlan> {
    println!("Analyzing directory structure...");
    let plan = walk::plan_tree(cwd, &cli.walk).context("walking directory tree")?;
    for f in &plan.failures {
        let dir = if f.dir.as_os_str().is_empty() {
            ".".into()
        } else {
            f.dir.display().to_string()
        };
        eprintln!("warning: {dir}: {}", f.error);
    }
    Ok(plan)
}

fn preview(cwd: &std::path::Path, cli: &CliArgs) -> Result<()> {
    let plan = scan_tree(cwd, cli)?;
    let preview_path = cwd.join(PREVIEW_FILE);
    report::write_preview(&plan.changes, &preview_path)?;
    println!("Preview saved to {}", preview_path.display());
    println!();
    report::print_console(&plan.changes);

    let renamed = plan.renamed_count();
    let compliant = report::compliant_count(&plan.changes);
    if renamed > 0 {
        println!(
            "\nDry run complete: {renamed} items to standardize, {compliant} already compliant."
        );
        println!("\nNext steps:");
        println!("  tidy-tree --apply              # apply all changes");
        println!("  tidy-tree --prepare            # create an editable plan");
        println!("  tidy-tree --apply --files-only # targeted changes");
    } else {
        println!("\nNo changes needed - all items are already standardized.");
    }
    Ok(())
}

fn apply_now(cwd: &std::path::Path, cli: &CliArgs) -> Result<()> {
    let plan = scan_tree(cwd, cli)?;
    let preview_path = cwd.join(PREVIEW_FILE);
    report::write_preview(&plan.changes, &preview_path)?;
    println!("Preview saved to {}", preview_path.display());

    let summary = apply::apply_changes(cwd, &plan.changes, &cli.filters)?;
    println!(
        "\nApplied {} changes ({} skipped by filters, {} failed).",
        summary.applied, summary.skipped, summary.failed
    );
    Ok(())
}

fn prepare_plan(cwd: &std::path::Path, cli: &CliArgs) -> Result<()> {
    let plan = scan_tree(cwd, cli)?;
    let plan_path = cwd.join(PLAN_FILE);
    report::write_plan(&plan.changes, &plan_path)?;
    println!("Editable plan saved to {}", plan_path.display());

    let renamed = plan.renamed_count();
    if renamed > 0 {
        println!("\nFound {renamed} items to standardize.");
        println!("\nNext steps:");
        println!("  1. Edit the plan file to customize changes");
        println!("  2. Run `tidy-tree --execute` to apply your changes");
    } else {
        println!("\nNo changes needed - all items are already standardized.");
    }
    Ok(())
}

fn execute_plan(cwd: &std::path::Path) -> Result<()> {
    let plan_path = cwd.join(PLAN_FILE);
    if !plan_path.exists() {
        bail!(
            "plan file not found at {}. Run `tidy-tree --prepare` first.",
            plan_path.display()
        );
    }
    let changes = report::read_plan(&plan_path)?;
    if changes.is_empty() {
        println!("No changes found in plan file.");
        return Ok(());
    }

    println!("Applying {} changes from plan file...", changes.len());
    let summary = apply::apply_changes(cwd, &changes, &ApplyFilters::default())?;
    println!(
        "\nApplied {} changes ({} failed).",
        summary.applied, summary.failed
    );

    if summary.applied > 0 {
        fs::remove_file(&plan_path)
            .with_context(|| format!("cleaning up {}", plan_path.display()))?;
        println!("Cleaned up plan file: {}", plan_path.display());
    }
    Ok(())
}

fn print_help() {
    println!(
        r#"
tidy-tree: standardize file and folder names with 3-digit prefixes

USAGE:
    tidy-tree                     # Dry run: preview changes (console + standardization_preview.md)
    tidy-tree --apply             # Apply all changes
    tidy-tree --prepare           # Generate an editable plan (standardization_plan.md)
    tidy-tree --execute           # Apply changes from the edited plan
    tidy-tree help                # Show this message

WALK OPTIONS:
    --include-hidden              # Also process entries starting with '.'
    --ignore=NAME                 # Skip directory NAME entirely (repeatable)

SELECTIVE APPLICATION (with --apply):
    --files-only                  # Apply changes only to files
    --folders-only                # Apply changes only to folders
    --include=PATTERN             # Only items matching PATTERN (e.g. '*.pdf')
    --exclude=PATTERN             # Skip items matching PATTERN (e.g. '*.zip')
    --path=PREFIX                 # Only items under PREFIX (relative to cwd)

Every entry gets a zero-padded sequence prefix unique among siblings of its
kind, e.g. `Quarterly Report (Final).pdf` -> `000_quarterly_report_final_.pdf`.
Files and folders are numbered independently, and re-runs are stable.
"#
    );
}

/* ================================== Tests ================================== */
