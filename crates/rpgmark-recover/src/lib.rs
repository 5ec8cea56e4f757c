#![deny(missing_docs)]

//! Recovery of watermarks from observed, possibly damaged, object graphs.
//!
//! Observed nodes are assembled into weakly connected candidates. Each
//! candidate is classified against the single-missing-edge damage table,
//! repaired on a private copy, validated into a Hamilton path and decoded.
//! A missing tree edge is never repaired; the representative forest recovers
//! the root's children instead.

mod assembly;
mod config;
mod forest;
mod observe;
mod partial;
mod pipeline;

pub use assembly::{assemble, candidates, nodes_from_graph, Candidate};
pub use config::RecoveryConfig;
pub use forest::{FixedElement, FixedRule, RepresentativeForest};
pub use observe::{ObservationBuffer, Snapshot};
pub use partial::{
    body_node_status, repair_candidate, BodyNodeStatus, DamageKind, HamiltonPath, PartialRpg, Rsst,
};
pub use pipeline::{
    classify_and_repair, decode, decode_with, recover_snapshot, CandidateOutcome, RecoveryReport,
};
