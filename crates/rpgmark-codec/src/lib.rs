#![deny(missing_docs)]

//! Encoding of watermark values into reducible permutation graphs and the two
//! canonical decoders that turn an intact graph back into its value.
//!
//! Encoding runs `w -> bits -> bitonic permutation -> SIP -> graph`. Graphs
//! handed to the decoders are in Bento labels: `0..=2n_B + 2` with the root at
//! the top label, the sink at `0` and list edges `i -> i - 1`. Canonical graphs
//! produced by [`encode`] already satisfy this; observed graphs get there
//! through repair and relabeling in `rpgmark-recover`.

pub mod bits;
mod builder;
mod decoder;
pub mod permutation;

pub use bits::{bit_flip, bit_length, bit_vector, bits_to_value};
pub use builder::{build_rpg, encode, max_didom, split_hamilton_path, CanonicalRpg};
pub use decoder::{
    bento_parameter, bento_value, decode_bento, decode_chroni, decode_with, Strategy,
};
pub use permutation::{
    bitonic, decode_sip_to_bitonic, decode_sip_to_w, is_involution, sip_cycles,
    sip_from_bitonic, sip_from_value, Cycle,
};
