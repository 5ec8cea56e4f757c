//! Bitonic and self-inverting permutations.
//!
//! A watermark `w` with `n` bits maps to a bitonic permutation of `0..2n+1`
//! and from there to a self-inverting permutation (SIP) by pairing the ends
//! of the bitonic sequence inward. Decoding reverses both steps.

use rpgmark_core::errors::{invalid_input, ErrorInfo, RpgError};

use crate::bits::{bit_flip, bit_vector, bits_to_value};

/// Unordered pair `(low, high)` of a SIP; `low == high` is a fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cycle {
    low: usize,
    high: usize,
}

impl Cycle {
    /// Creates the cycle joining `a` and `b` in either order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// Smaller element.
    pub fn low(&self) -> usize {
        self.low
    }

    /// Larger element.
    pub fn high(&self) -> usize {
        self.high
    }

    /// Whether the cycle maps an element to itself.
    pub fn is_fixed_point(&self) -> bool {
        self.low == self.high
    }
}

/// Bitonic permutation of `0..2n+1` for the watermark `w`.
///
/// Builds `B* = 1^n . flip(bits) . 0` and returns the indices of its zeros in
/// ascending order followed by the indices of its ones in descending order.
pub fn bitonic(w: u64) -> Result<Vec<usize>, RpgError> {
    let bits = bit_vector(w)?;
    let mut extended = vec![1u8; bits.len()];
    extended.extend(bit_flip(&bits));
    extended.push(0);

    let mut sequence: Vec<usize> = (0..extended.len())
        .filter(|idx| extended[*idx] == 0)
        .collect();
    sequence.extend((0..extended.len()).rev().filter(|idx| extended[*idx] == 1));
    Ok(sequence)
}

/// Pairs `seq[i]` with `seq[len - 1 - i]` into the cycles of a SIP.
pub fn sip_from_bitonic(seq: &[usize]) -> Result<Vec<usize>, RpgError> {
    ensure_permutation(seq)?;
    let mut sip = vec![0usize; seq.len()];
    let (mut head, mut tail) = (0usize, seq.len() - 1);
    while head < tail {
        let (a, b) = (seq[head], seq[tail]);
        sip[a] = b;
        sip[b] = a;
        head += 1;
        tail -= 1;
    }
    if head == tail {
        sip[seq[head]] = seq[head];
    }
    Ok(sip)
}

/// SIP for the watermark `w`.
pub fn sip_from_value(w: u64) -> Result<Vec<usize>, RpgError> {
    sip_from_bitonic(&bitonic(w)?)
}

/// Whether `p[p[i]] == i` for every index, with every entry in range.
pub fn is_involution(p: &[usize]) -> bool {
    p.iter()
        .enumerate()
        .all(|(idx, image)| p.get(*image) == Some(&idx))
}

/// Cycles of a SIP in order of their first appearance in a left-to-right scan.
pub fn sip_cycles(sip: &[usize]) -> Result<Vec<Cycle>, RpgError> {
    let mut closed = vec![false; sip.len()];
    let mut cycles = Vec::new();
    for (idx, image) in sip.iter().copied().enumerate() {
        if image >= sip.len() {
            return Err(invalid_input("entry-out-of-range", "permutation entry out of range")
                .with_context("index", idx)
                .with_context("entry", image));
        }
        if sip[image] != idx {
            return Err(RpgError::NotInvolution(
                ErrorInfo::new("not-involution", "sip[sip[i]] != i")
                    .with_context("index", idx)
                    .with_context("image", image),
            ));
        }
        if !closed[idx] {
            cycles.push(Cycle::new(idx, image));
        }
        closed[image] = true;
    }
    Ok(cycles)
}

/// Reassembles the bitonic permutation a SIP was paired from.
///
/// Two-cycles are placed at mirrored ends and fixed points fill the front
/// sequentially.
pub fn decode_sip_to_bitonic(sip: &[usize]) -> Result<Vec<usize>, RpgError> {
    ensure_decodable_length(sip)?;
    let cycles = sip_cycles(sip)?;
    let mut seq = vec![0usize; sip.len()];
    let (mut head, mut tail) = (0usize, sip.len() - 1);
    for cycle in cycles {
        if cycle.is_fixed_point() {
            seq[head] = cycle.low();
            head += 1;
        } else {
            seq[head] = cycle.high();
            seq[tail] = cycle.low();
            head += 1;
            tail = tail.saturating_sub(1);
        }
    }
    Ok(seq)
}

/// Recovers the watermark encoded by a SIP.
pub fn decode_sip_to_w(sip: &[usize]) -> Result<u64, RpgError> {
    let seq = decode_sip_to_bitonic(sip)?;
    let n = (seq.len() - 1) / 2;
    let peak = seq
        .iter()
        .position(|value| *value == seq.len() - 1)
        .unwrap_or(seq.len() - 1);

    let mut extended = vec![1u8; seq.len()];
    for zero in &seq[..=peak] {
        extended[*zero] = 0;
    }
    bits_to_value(&bit_flip(&extended[n..2 * n]))
}

fn ensure_decodable_length(sip: &[usize]) -> Result<(), RpgError> {
    if sip.is_empty() {
        return Err(invalid_input("empty-permutation", "permutation is empty"));
    }
    if sip.len() < 3 {
        return Err(invalid_input("permutation-too-short", "a watermark SIP has at least 3 entries")
            .with_context("len", sip.len()));
    }
    if sip.len() % 2 == 0 {
        return Err(invalid_input("even-length", "a watermark SIP has odd length")
            .with_context("len", sip.len()));
    }
    Ok(())
}

fn ensure_permutation(seq: &[usize]) -> Result<(), RpgError> {
    if seq.is_empty() {
        return Err(invalid_input("empty-permutation", "permutation is empty"));
    }
    let mut seen = vec![false; seq.len()];
    for (idx, value) in seq.iter().copied().enumerate() {
        match seen.get(value).copied() {
            Some(false) => seen[value] = true,
            Some(true) => {
                return Err(invalid_input("duplicate-entry", "permutation repeats a value")
                    .with_context("index", idx)
                    .with_context("entry", value))
            }
            None => {
                return Err(invalid_input("entry-out-of-range", "permutation entry out of range")
                    .with_context("index", idx)
                    .with_context("entry", value))
            }
        }
    }
    Ok(())
}
