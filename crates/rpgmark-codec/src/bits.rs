//! Watermark values as most-significant-bit-first digit vectors.

use rpgmark_core::errors::{invalid_input, RpgError};

/// Base-2 digits of `w`, most significant first.
///
/// The length is `floor(log2 w) + 1`, computed from the leading zero count.
pub fn bit_vector(w: u64) -> Result<Vec<u8>, RpgError> {
    if w == 0 {
        return Err(invalid_input("zero-watermark", "the watermark must be positive")
            .with_hint("encode values starting at 1"));
    }
    let len = bit_length(w);
    Ok((0..len).rev().map(|shift| ((w >> shift) & 1) as u8).collect())
}

/// Number of significant bits of `w`; `0` for `w == 0`.
pub fn bit_length(w: u64) -> u32 {
    u64::BITS - w.leading_zeros()
}

/// Complements each digit.
pub fn bit_flip(bits: &[u8]) -> Vec<u8> {
    bits.iter().map(|bit| 1 - (bit & 1)).collect()
}

/// Sums the set digits as powers of two, most significant first.
pub fn bits_to_value(bits: &[u8]) -> Result<u64, RpgError> {
    if let Some(position) = bits.iter().position(|bit| *bit > 1) {
        return Err(invalid_input("not-a-bit", "digits must be 0 or 1")
            .with_context("position", position)
            .with_context("digit", bits[position]));
    }
    let significant = bits.iter().skip_while(|bit| **bit == 0).count();
    if significant > u64::BITS as usize {
        return Err(invalid_input("value-overflow", "bit vector exceeds 64 significant bits")
            .with_context("significant", significant));
    }
    Ok(bits
        .iter()
        .fold(0u64, |acc, bit| (acc << 1) | u64::from(*bit)))
}
