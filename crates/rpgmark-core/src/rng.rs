//! Seeded RNG used to sample damage patterns reproducibly.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Deterministic RNG handle.
///
/// Wraps `StdRng` seeded from a caller supplied `u64`. Independent streams for
/// e.g. one damage trial per watermark are derived with [`derive_substream_seed`],
/// which hashes `(master_seed, substream)` with SipHash-1-3 under zero keys so
/// the mapping is identical on every platform.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates the handle for a numbered substream of `master_seed`.
    pub fn for_substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Draws a uniform index below `len`, or `None` for an empty range.
    pub fn index_below(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.gen_range(0..len))
        }
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Seed of damage trial `trial` under `master_seed`.
pub fn derive_substream_seed(master_seed: u64, trial: u64) -> u64 {
    let mut sip = SipHasher13::new_with_keys(0, 0);
    sip.write_u64(master_seed);
    sip.write_u64(trial);
    sip.finish()
}
