#![deny(missing_docs)]

//! Arena-backed directed graphs for the rpgmark watermarking engine.
//!
//! The [`Digraph`] stores vertices as dense indices and edges in never-reused
//! slots. Around it sit the traversals used by classification and repair,
//! canonical fingerprints, JSON/bincode payloads, DOT export and the
//! deterministic damage tooling used to simulate attacks.

mod damage;
mod digraph;
mod dot;
mod flags;
mod hash;
mod serialization;
mod traverse;

pub use damage::{apply_all, apply_damage, sample_deletion, shuffle_labels, EdgeDamage};
pub use digraph::Digraph;
pub use dot::graph_to_dot;
pub use flags::DigraphConfig;
pub use hash::canonical_hash;
pub use traverse::{dfs_preorder, is_weakly_connected, weakly_connected_components, Direction};

/// Re-export serialization helpers for downstream crates.
pub use serialization::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};
