// src/error.rs

use crate::decision::Kind;
use thiserror::Error;

/// Engine-level failures. Both are directory- or entry-scoped: one bad
/// directory must not stop processing of the rest of the tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The 3-digit prefix space is exhausted for one (directory, kind)
    /// partition. Hard limit, not recoverable for that directory.
    #[error("{count} {kind} entries exceed the 1000-name sequence space")]
    CapacityExceeded { kind: Kind, count: usize },

    /// The bounded `_1`, `_2`, ... suffix search ran out before finding a
    /// free name. Fatal for that single entry only.
    #[error("no collision-free name found for `{name}`")]
    CollisionUnresolved { name: String },
}
