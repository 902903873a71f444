// src/normalize.rs
//! Name normalization, independent of siblings.
//!
//! A raw entry name becomes a lowercase `[a-z0-9_]` base plus (for files) the
//! original extension with its case preserved. An existing `NNN_` prefix is
//! stripped first so re-runs never compound prefixes. Sequencing happens
//! later, in `sequence`.

use crate::decision::Kind;

/// Normalized base plus the original extension (leading dot included).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedName {
    pub base: String,
    pub extension: String,
}

impl NormalizedName {
    /// `"{seq:03}_{base}{extension}"`
    pub fn with_sequence(&self, seq: usize) -> String {
        format!("{:03}_{}{}", seq, self.base, self.extension)
    }

    /// Collision variant: `_n` inserted before the extension.
    pub fn with_suffix(&self, seq: usize, n: usize) -> String {
        format!("{:03}_{}_{}{}", seq, self.base, n, self.extension)
    }
}

/// Normalize one entry name. Folders keep no extension; for files only the
/// last dot delimits the extension, earlier dots belong to the stem and get
/// substituted like any other punctuation.
pub fn normalize(name: &str, kind: Kind) -> NormalizedName {
    let stripped = strip_seq_prefix(name);
    let (stem, ext) = match kind {
        Kind::File => split_extension(stripped),
        Kind::Folder => (stripped, ""),
    };
    NormalizedName {
        base: normalize_base(stem),
        extension: ext.to_string(),
    }
}

/// Lowercase, substitute anything outside `[a-z0-9_]` with `_`, collapse
/// runs of `_`. Idempotent: a produced base maps to itself.
pub fn normalize_base(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut prev_underscore = false;
    for ch in stem.chars() {
        let c = ch.to_ascii_lowercase();
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '_'
        };
        if c == '_' {
            if prev_underscore {
                continue;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
        out.push(c);
    }
    out
}

/// True iff the name is already in target form: `NNN_` followed by a stem
/// that equals its own normalization, extension untouched. Reporting helper
/// only; compliant names are still re-sequenced.
pub fn is_compliant(name: &str, kind: Kind) -> bool {
    if !has_seq_prefix(name) {
        return false;
    }
    let rest = &name[4..];
    let stem = match kind {
        Kind::File => split_extension(rest).0,
        Kind::Folder => rest,
    };
    stem == normalize_base(stem)
}

/// Drop one leading `NNN_` prefix, if present.
pub fn strip_seq_prefix(name: &str) -> &str {
    if has_seq_prefix(name) {
        &name[4..]
    } else {
        name
    }
}

fn has_seq_prefix(name: &str) -> bool {
    let b = name.as_bytes();
    b.len() >= 4 && b[..3].iter().all(u8::is_ascii_digit) && b[3] == b'_'
}

/// Split at the last dot. A dot at position 0 (dotfile) or at the very end
/// does not count as an extension separator.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 && i + 1 < name.len() => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}

/* ================================== Tests ================================== */
