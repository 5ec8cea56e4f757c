use rpgmark_core::provenance::SchemaVersion;

/// Configuration options that control the checks applied by [`Digraph`](crate::Digraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigraphConfig {
    /// Maximum outbound degree permitted for any vertex.
    pub max_out_degree: Option<usize>,
    /// Whether edges from a vertex to itself are accepted.
    pub allow_self_loops: bool,
    /// Schema version stored alongside serialized payloads.
    pub schema_version: SchemaVersion,
}

impl DigraphConfig {
    /// Configuration for graphs assembled from observed nodes.
    ///
    /// Observed graphs may carry degree anomalies and self references that
    /// classification has to report, so neither is rejected at insertion.
    pub fn observed() -> Self {
        Self {
            max_out_degree: None,
            allow_self_loops: true,
            ..Self::default()
        }
    }
}

impl Default for DigraphConfig {
    fn default() -> Self {
        Self {
            max_out_degree: Some(2),
            allow_self_loops: false,
            schema_version: SchemaVersion::CURRENT,
        }
    }
}
