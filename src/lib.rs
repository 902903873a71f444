// src/lib.rs
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod decision;
pub mod error;
pub mod normalize;
pub mod sequence;

pub mod walk;

pub mod apply;
pub mod report;

pub mod commands;
