// src/main.rs

pub mod apply;
pub mod commands;
pub mod decision;
pub mod error;
pub mod normalize;
pub mod report;
pub mod sequence;
pub mod walk;

use anyhow::Result;

fn main() -> Result<()> {
    commands::run_cli()
}
