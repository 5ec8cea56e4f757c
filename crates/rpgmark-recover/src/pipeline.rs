use rayon::prelude::*;
use rpgmark_codec::{bento_value, Strategy};
use rpgmark_core::errors::{structure_mismatch, unrepairable, ErrorInfo, RpgError};
use rpgmark_core::ObservedNode;
use rpgmark_graph::canonical_hash;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::assembly::{assemble, candidates, Candidate};
use crate::config::RecoveryConfig;
use crate::forest::RepresentativeForest;
use crate::observe::Snapshot;
use crate::partial::{repair_candidate, DamageKind, HamiltonPath};

/// Result of recovering one candidate component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
    /// The component decoded to a watermark.
    Recovered {
        /// Candidate index in assembly order.
        candidate: usize,
        /// Decoded value.
        watermark: u64,
        /// Damage found (and, for list edges, repaired).
        damage: DamageKind,
        /// Canonical hash of the repaired graph along its Hamilton path.
        fingerprint: String,
    },
    /// The component was rejected.
    Dropped {
        /// Candidate index in assembly order.
        candidate: usize,
        /// Why it was rejected.
        error: RpgError,
    },
}

impl CandidateOutcome {
    /// Candidate index in assembly order.
    pub fn candidate(&self) -> usize {
        match self {
            CandidateOutcome::Recovered { candidate, .. }
            | CandidateOutcome::Dropped { candidate, .. } => *candidate,
        }
    }

    /// Decoded value, if any.
    pub fn watermark(&self) -> Option<u64> {
        match self {
            CandidateOutcome::Recovered { watermark, .. } => Some(*watermark),
            CandidateOutcome::Dropped { .. } => None,
        }
    }
}

/// Everything recovered from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryReport {
    /// Observed nodes handed in.
    pub observed: usize,
    /// Components discarded before repair as implausibly sized.
    pub discarded: usize,
    /// One outcome per plausible component, in candidate order.
    pub outcomes: Vec<CandidateOutcome>,
}

impl RecoveryReport {
    /// Decoded values in candidate order.
    pub fn watermarks(&self) -> Vec<u64> {
        self.outcomes
            .iter()
            .filter_map(CandidateOutcome::watermark)
            .collect()
    }

    /// Number of recovered components.
    pub fn recovered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.watermark().is_some())
            .count()
    }
}

/// Single-candidate entry point: `nodes` must assemble into exactly one
/// plausible component, which is then classified, repaired and validated.
pub fn classify_and_repair<N: ObservedNode>(
    nodes: &[N],
) -> Result<(HamiltonPath, DamageKind), RpgError> {
    let found = candidates(nodes, 4)?;
    match found.as_slice() {
        [candidate] => repair_candidate(candidate),
        _ => Err(structure_mismatch("candidate-count", "expected exactly one candidate component")
            .with_context("candidates", found.len())
            .with_hint("use recover_snapshot for multi-component input")),
    }
}

/// Decodes a repaired path with the Bento strategy.
pub fn decode(path: &HamiltonPath, damage: DamageKind) -> Result<u64, RpgError> {
    decode_with(path, damage, Strategy::Bento)
}

/// Decodes a repaired path.
///
/// With a tree edge still missing only Bento decoding applies: the root's
/// children come from the representative forest, and `CrossCheck` falls back
/// to Bento. Otherwise the graph goes to the canonical decoders unchanged.
pub fn decode_with(
    path: &HamiltonPath,
    damage: DamageKind,
    strategy: Strategy,
) -> Result<u64, RpgError> {
    if !damage.tree_edge_missing() {
        return rpgmark_codec::decode_with(path.labeled(), strategy);
    }
    if strategy == Strategy::Chroni {
        return Err(unrepairable(
            "tree-edge-missing",
            "permutation inversion needs every tree edge",
        )
        .with_hint("decode with the bento strategy"));
    }
    let forest = RepresentativeForest::new(path, damage)?;
    let fixed = forest.fixed_element()?;
    let children = forest.root_children()?;
    debug!(fixed = fixed.vertex, rule = ?fixed.rule, children = children.len(), "root children recovered");
    bento_value(&children, path.bento_parameter())
}

/// Recovers every candidate of a finished snapshot.
///
/// A failing candidate is reported as dropped and never aborts the others.
/// Parallel and sequential runs produce the same report.
pub fn recover_snapshot<N: ObservedNode>(
    snapshot: &Snapshot<N>,
    config: &RecoveryConfig,
) -> Result<RecoveryReport, RpgError> {
    let nodes = snapshot.nodes();
    let assembled = assemble(nodes)?;
    let total = assembled.len();
    let plausible: Vec<Candidate> = assembled
        .into_iter()
        .filter(|candidate| candidate.is_plausible(config.min_vertices))
        .collect();
    let discarded = total - plausible.len();

    let outcomes = if config.parallel {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads.max(1));
        }
        let pool = builder.build().map_err(|err| {
            RpgError::Graph(ErrorInfo::new("thread-pool", err.to_string()))
        })?;
        let mut outcomes: Vec<CandidateOutcome> = pool.install(|| {
            plausible
                .par_iter()
                .map(|candidate| recover_candidate(candidate, config.strategy))
                .collect()
        });
        outcomes.sort_by_key(CandidateOutcome::candidate);
        outcomes
    } else {
        plausible
            .iter()
            .map(|candidate| recover_candidate(candidate, config.strategy))
            .collect()
    };

    let report = RecoveryReport {
        observed: nodes.len(),
        discarded,
        outcomes,
    };
    info!(
        observed = report.observed,
        candidates = report.outcomes.len(),
        discarded = report.discarded,
        recovered = report.recovered(),
        parallel = config.parallel,
        "snapshot recovered"
    );
    Ok(report)
}

fn recover_candidate(candidate: &Candidate, strategy: Strategy) -> CandidateOutcome {
    let attempt = repair_candidate(candidate).and_then(|(path, damage)| {
        let watermark = decode_with(&path, damage, strategy)?;
        let fingerprint = canonical_hash(path.labeled(), &path.labels())?;
        Ok((watermark, damage, fingerprint))
    });
    match attempt {
        Ok((watermark, damage, fingerprint)) => CandidateOutcome::Recovered {
            candidate: candidate.index(),
            watermark,
            damage,
            fingerprint,
        },
        Err(error) => {
            warn!(
                candidate = candidate.index(),
                vertices = candidate.vertex_count(),
                kind = ?error.kind(),
                code = %error.info().code,
                "candidate dropped"
            );
            CandidateOutcome::Dropped {
                candidate: candidate.index(),
                error,
            }
        }
    }
}
