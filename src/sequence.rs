// src/sequence.rs
//! Sequence assignment for one (directory, kind) partition.
//!
//! Entries are sorted by (normalized base, extension, original name) with
//! plain byte-wise comparison, then numbered 000, 001, ... in that order.
//! The sort key makes numbering independent of filesystem listing order and
//! of locale, so the same directory contents always produce the same names.

use std::collections::BTreeSet;

use crate::{
    decision::{Action, Kind, RenameDecision},
    error::EngineError,
    normalize::{self, NormalizedName},
};

/// 3-digit prefix space: at most 1000 entries of one kind per directory.
pub const KIND_CAPACITY: usize = 1000;

/// Result for one partition. `skipped` holds entries the bounded collision
/// search gave up on; they keep their on-disk name and the rest of the
/// partition is unaffected.
#[derive(Debug, Default)]
pub struct PartitionPlan {
    pub decisions: Vec<RenameDecision>,
    pub skipped: Vec<(String, EngineError)>,
}

/// Assign sequence numbers to every entry of one kind in one directory.
///
/// `reserved` names exist on disk in the same directory but are not part of
/// the batch (hidden or ignored siblings); generated targets must avoid
/// them. Decisions come back in increasing sequence order.
pub fn assign_sequences(
    kind: Kind,
    names: &[String],
    reserved: &BTreeSet<String>,
) -> Result<PartitionPlan, EngineError> {
    if names.len() > KIND_CAPACITY {
        return Err(EngineError::CapacityExceeded {
            kind,
            count: names.len(),
        });
    }

    let mut ranked: Vec<(&str, NormalizedName)> = names
        .iter()
        .map(|n| (n.as_str(), normalize::normalize(n, kind)))
        .collect();
    ranked.sort_by(|a, b| {
        (a.1.base.as_str(), a.1.extension.as_str(), a.0)
            .cmp(&(b.1.base.as_str(), b.1.extension.as_str(), b.0))
    });

    // Names a candidate must not hit: reserved on-disk names, targets already
    // claimed in this batch, and originals of entries still pending (those
    // still occupy their old name when the earlier renames apply).
    let mut taken: BTreeSet<String> = reserved.clone();
    let mut pending: BTreeSet<&str> = names.iter().map(String::as_str).collect();

    let mut plan = PartitionPlan::default();
    for (seq, (original, norm)) in ranked.into_iter().enumerate() {
        pending.remove(original); // reusing its own name is fine
        match free_candidate(seq, &norm, &taken, &pending, names.len()) {
            Some(target) => {
                taken.insert(target.clone());
                let action = if target == original {
                    Action::Unchanged
                } else {
                    Action::Renamed
                };
                plan.decisions.push(RenameDecision {
                    kind,
                    original_name: original.to_string(),
                    target_name: target,
                    action,
                });
            }
            None => plan.skipped.push((
                original.to_string(),
                EngineError::CollisionUnresolved {
                    name: original.to_string(),
                },
            )),
        }
    }
    Ok(plan)
}

/// Plain candidate first, then `_1`, `_2`, ... before the extension. The
/// suffix search is bounded by the batch size.
fn free_candidate(
    seq: usize,
    norm: &NormalizedName,
    taken: &BTreeSet<String>,
    pending: &BTreeSet<&str>,
    batch_len: usize,
) -> Option<String> {
    let free = |c: &str| !taken.contains(c) && !pending.contains(c);
    let plain = norm.with_sequence(seq);
    if free(&plain) {
        return Some(plain);
    }
    for n in 1..=batch_len {
        let candidate = norm.with_suffix(seq, n);
        if free(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/* ================================== Tests ================================== */

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_string()).collect()
    }

    fn plan(kind: Kind, v: &[&str]) -> PartitionPlan {
        assign_sequences(kind, &names(v), &BTreeSet::new()).unwrap()
    }

    fn targets(p: &PartitionPlan) -> Vec<&str> {
        p.decisions.iter().map(|d| d.target_name.as_str()).collect()
    }

    #[test]
    fn end_to_end_example() {
        let p = plan(
            Kind::File,
            &["Important Document (Final Version).pdf", "image-2023.jpg"],
        );
        assert_eq!(
            targets(&p),
            vec![
                "000_image_2023.jpg",
                "001_important_document_final_version_.pdf"
            ]
        );

        let p = plan(Kind::Folder, &["Old Project Folder"]);
        assert_eq!(targets(&p), vec!["000_old_project_folder"]);
    }

    #[test]
    fn reindex_removes_gaps() {
        let p = plan(Kind::File, &["000_first.txt", "005_third.txt", "new_file.txt"]);
        assert_eq!(
            targets(&p),
            vec!["000_first.txt", "001_new_file.txt", "002_third.txt"]
        );
        assert_eq!(p.decisions[0].action, Action::Unchanged);
        assert_eq!(p.decisions[1].action, Action::Renamed);
        assert_eq!(p.decisions[2].action, Action::Renamed);
    }

    #[test]
    fn sequences_are_dense_and_ordered() {
        let p = plan(Kind::File, &["q.txt", "b.txt", "Z.txt", "a a.txt", "m.txt"]);
        let seqs: Vec<&str> = p.decisions.iter().map(|d| &d.target_name[..3]).collect();
        assert_eq!(seqs, vec!["000", "001", "002", "003", "004"]);
        assert!(p.skipped.is_empty());
    }

    #[test]
    fn ordering_is_independent_of_input_order() {
        let a = plan(Kind::File, &["b.txt", "a.txt", "c.txt"]);
        let b = plan(Kind::File, &["c.txt", "b.txt", "a.txt"]);
        assert_eq!(a.decisions, b.decisions);
    }

    #[test]
    fn second_run_is_all_unchanged() {
        let first = plan(Kind::File, &["Notes (old).txt", "REPORT.PDF", "misc"]);
        let renamed: Vec<String> =
            first.decisions.iter().map(|d| d.target_name.clone()).collect();

        let second = assign_sequences(Kind::File, &renamed, &BTreeSet::new()).unwrap();
        assert!(second.decisions.iter().all(|d| d.action == Action::Unchanged));
        assert_eq!(targets(&second), renamed.iter().collect::<Vec<_>>());
    }

    #[test]
    fn capacity_boundary() {
        let exactly: Vec<String> = (0..1000).map(|i| format!("file_{i:04}.txt")).collect();
        let p = assign_sequences(Kind::File, &exactly, &BTreeSet::new()).unwrap();
        assert_eq!(p.decisions.len(), 1000);
        assert_eq!(p.decisions.last().unwrap().target_name[..3], *"999");

        let over: Vec<String> = (0..1001).map(|i| format!("file_{i:04}.txt")).collect();
        let err = assign_sequences(Kind::File, &over, &BTreeSet::new()).unwrap_err();
        assert_eq!(
            err,
            EngineError::CapacityExceeded {
                kind: Kind::File,
                count: 1001
            }
        );
    }

    #[test]
    fn reserved_name_forces_suffix() {
        let reserved: BTreeSet<String> = ["000_a.txt".to_string()].into();
        let p = assign_sequences(Kind::File, &names(&["A.txt"]), &reserved).unwrap();
        assert_eq!(targets(&p), vec!["000_a_1.txt"]);
    }

    #[test]
    fn pending_original_forces_suffix() {
        // "000_z.txt" would land on "001_z.txt", the current name of a later
        // entry. The suffix keeps the batch clobber-free in apply order.
        let p = plan(Kind::File, &["a.txt", "000_z.txt", "001_z.txt"]);
        assert_eq!(
            targets(&p),
            vec!["000_a.txt", "001_z_1.txt", "002_z.txt"]
        );
    }

    #[test]
    fn vacated_original_may_be_reused() {
        // The first decision frees "001_a.txt" before the second needs it.
        let p = plan(Kind::File, &["001_a.txt", "a.txt"]);
        assert_eq!(targets(&p), vec!["000_a.txt", "001_a.txt"]);
    }

    #[test]
    fn exhausted_suffix_search_skips_the_entry() {
        let reserved: BTreeSet<String> =
            ["000_a.txt".to_string(), "000_a_1.txt".to_string()].into();
        let p = assign_sequences(Kind::File, &names(&["A.txt"]), &reserved).unwrap();
        assert!(p.decisions.is_empty());
        assert_eq!(p.skipped.len(), 1);
        assert_eq!(p.skipped[0].0, "A.txt");
        assert!(matches!(
            p.skipped[0].1,
            EngineError::CollisionUnresolved { .. }
        ));
    }

    #[test]
    fn empty_base_still_sequences() {
        let p = plan(Kind::File, &["003_"]);
        assert_eq!(targets(&p), vec!["000_"]);

        let p = plan(Kind::Folder, &["007_", "Attic"]);
        assert_eq!(targets(&p), vec!["000_", "001_attic"]);
    }

    #[test]
    fn extension_breaks_base_ties() {
        let p = plan(Kind::File, &["x.txt", "x.TXT"]);
        // ".TXT" < ".txt" byte-wise.
        assert_eq!(targets(&p), vec!["000_x.TXT", "001_x.txt"]);
    }
}
