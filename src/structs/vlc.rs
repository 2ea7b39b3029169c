//! The variable-length-code layer: a uniform `encode_index`/`decode_index`
//! pair driven by a cumulative-frequency vector, shared by the arithmetic,
//! unary, Rice and Golomb coders.
//!
//! Encode and decode sides are modeled as two separate traits rather than
//! one bidirectional trait: every VLC in this lab needs different state
//! while encoding (a `bits_to_follow` counter, say) than while decoding (a
//! `value` register), so splitting keeps each side's state local to its own
//! struct instead of carrying unused fields for the other direction. Each
//! implementation owns its bit stream the way `VPXBoolReader` owns its
//! upstream reader, rather than taking it as a per-call argument.

use crate::error::Result;

/// `cum[0]` is the total symbol mass; `cum[i] = sum of prob(j) for j >= i`;
/// `cum[ALPHA] = 0`. `prob(i) = cum[i-1] - cum[i]` for `i` in `1..=ALPHA`.
pub type CumFreq = [u16];

/// The encoding half of a variable-length coder.
pub trait VlcEncoder {
    /// Encodes the symbol at `index` (1-based) given the cumulative-count
    /// vector `cum`.
    fn encode_index(&mut self, index: usize, cum: &CumFreq) -> Result<()>;

    /// Flushes any residual state (trailing or deferred bits) once the
    /// stream ends.
    fn finish(&mut self) -> Result<()>;
}

/// The decoding half of a variable-length coder.
pub trait VlcDecoder {
    /// Decodes the next index using the cumulative-count vector `cum`.
    fn decode_index(&mut self, cum: &CumFreq) -> Result<usize>;
}
