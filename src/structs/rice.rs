//! Rice coder: unary quotient plus a `k`-bit remainder, with `k` estimated
//! on the fly from the model's cumulative-frequency vector.
//!
//! Reference: R. F. Rice, "Some Practical Universal Noiseless Coding
//! Techniques," JPL Publication 79-22, 1979.

use std::io::{Read, Write};

use super::bit_io::{BitReader, BitWriter};
use super::vlc::{CumFreq, VlcDecoder, VlcEncoder};
use crate::error::Result;

fn prob(cum: &CumFreq, x: usize) -> i32 {
    i32::from(cum[x - 1]) - i32::from(cum[x])
}

/// Estimates the Rice parameter `k` from the steepness of the probability
/// distribution's head. Capped at 7 (and floored at 3, since this bit
/// stream cannot represent unary runs longer than 32 bits without a
/// dedicated escape).
fn estimate_k(cum: &CumFreq) -> u32 {
    let mut k = 0u32;
    let mut i = 1usize;
    while prob(cum, i + 1) > prob(cum, i) / 2 {
        i += 1;
        k += 1;
        if k > 7 {
            break;
        }
    }
    k.max(3)
}

pub struct RiceEncoder<W> {
    bits: BitWriter<W>,
}

impl<W: Write> RiceEncoder<W> {
    pub fn new(writer: W) -> Self {
        RiceEncoder {
            bits: BitWriter::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.bits.into_inner()
    }
}

impl<W: Write> VlcEncoder for RiceEncoder<W> {
    fn encode_index(&mut self, index: usize, cum: &CumFreq) -> Result<()> {
        let k = estimate_k(cum);
        let m = 1u32 << k;
        let s = (index - 1) as u32;
        for _ in 0..(s / m) {
            self.bits.put_bit(true)?;
        }
        self.bits.put_bit(false)?;
        self.bits.put_bits(s, k)
    }

    fn finish(&mut self) -> Result<()> {
        self.bits.flush()
    }
}

pub struct RiceDecoder<R> {
    bits: BitReader<R>,
}

impl<R: Read> RiceDecoder<R> {
    pub fn new(reader: R) -> Self {
        RiceDecoder {
            bits: BitReader::new(reader),
        }
    }
}

impl<R: Read> VlcDecoder for RiceDecoder<R> {
    fn decode_index(&mut self, cum: &CumFreq) -> Result<usize> {
        let k = estimate_k(cum);
        let mut s = 0u32;
        while self.bits.get_bit()? {
            s += 1;
        }
        let x = self.bits.get_bits(k)?;
        s = (s << k) + x;
        Ok(s as usize + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::order0_model::Order0Model;

    #[test]
    fn round_trips_a_sequence_of_indices() {
        let mut model = Order0Model::new();
        let indices = [1usize, 5, 2, 200, 3, 256];
        let mut buf = Vec::new();
        {
            let mut enc = RiceEncoder::new(&mut buf);
            for &idx in &indices {
                enc.encode_index(idx, model.cum()).unwrap();
                model.update(idx);
            }
            enc.finish().unwrap();
        }
        let mut model = Order0Model::new();
        let mut dec = RiceDecoder::new(&buf[..]);
        for &idx in &indices {
            assert_eq!(dec.decode_index(model.cum()).unwrap(), idx);
            model.update(idx);
        }
    }
}
