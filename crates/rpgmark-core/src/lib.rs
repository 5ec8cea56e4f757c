#![deny(missing_docs)]
#![doc = "Core identifiers, node contracts and error types for the rpgmark watermarking engine."]

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, ErrorKind, RpgError};
pub use provenance::SchemaVersion;
pub use rng::{derive_substream_seed, RngHandle};

/// Identifier for a vertex, either an arena index or an observed object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(u64);

impl VertexId {
    /// Reserved identifier standing in for a sink that was never observed.
    pub const DUMMY_SINK: VertexId = VertexId(u64::MAX);

    /// Creates a new identifier from its raw integer representation.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    /// Returns whether this is the reserved placeholder sink.
    pub fn is_dummy(&self) -> bool {
        *self == Self::DUMMY_SINK
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_dummy() {
            write!(f, "dummy")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Identifier for an edge slot inside a graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Creates a new identifier from its raw integer representation.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Contract for objects discovered by a heap observer.
///
/// Implementors expose a stable identity and the references they hold to other
/// objects of the same kind, in the order the observer saw them. A canonical
/// watermark node holds at most two such references.
pub trait ObservedNode {
    /// Stable, comparable identity of the object.
    fn id(&self) -> VertexId;

    /// Outgoing references to objects of the same kind.
    fn outgoing_refs(&self) -> Vec<VertexId>;
}

/// Plain observed node, as produced by serializing a heap snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapNode {
    /// Identity of the object.
    pub id: VertexId,
    /// Outgoing same-kind references.
    #[serde(default)]
    pub refs: Vec<VertexId>,
}

impl HeapNode {
    /// Creates a node from raw identifiers.
    pub fn new(id: u64, refs: impl IntoIterator<Item = u64>) -> Self {
        Self {
            id: VertexId::from_raw(id),
            refs: refs.into_iter().map(VertexId::from_raw).collect(),
        }
    }
}

impl ObservedNode for HeapNode {
    fn id(&self) -> VertexId {
        self.id
    }

    fn outgoing_refs(&self) -> Vec<VertexId> {
        self.refs.clone()
    }
}

impl<T: ObservedNode + ?Sized> ObservedNode for &T {
    fn id(&self) -> VertexId {
        (**self).id()
    }

    fn outgoing_refs(&self) -> Vec<VertexId> {
        (**self).outgoing_refs()
    }
}
