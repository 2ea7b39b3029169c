//! Golomb coder: unary quotient over an adaptively estimated divisor `m`,
//! plus a truncated binary remainder.
//!
//! References: S. W. Golomb, IEEE Trans. Inf. Theory IT-12(3), 1966;
//! Witten, Moffat & Bell, "Managing Gigabytes", 2nd ed.

use std::io::{Read, Write};

use super::bit_io::{BitReader, BitWriter};
use super::vlc::{CumFreq, VlcDecoder, VlcEncoder};
use crate::error::Result;

/// Estimates `m` from how much more probable the single most likely symbol
/// is than the rest combined. Floored at 8 for the same reason `rice`
/// floors `k` at 3 (this bit stream cannot afford unbounded unary runs).
fn estimate_m(cum: &CumFreq) -> u32 {
    let total = f64::from(cum[0]);
    let head = f64::from(cum[0]) - f64::from(cum[1]);
    let m = 255.0 - (255.0 * head) / total;
    (m as u32).max(8)
}

/// `ceil(log2(m))`, computed without floating point.
fn bits_for(m: u32) -> u32 {
    if m <= 1 {
        0
    } else {
        32 - (m - 1).leading_zeros()
    }
}

pub struct GolombEncoder<W> {
    bits: BitWriter<W>,
}

impl<W: Write> GolombEncoder<W> {
    pub fn new(writer: W) -> Self {
        GolombEncoder {
            bits: BitWriter::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.bits.into_inner()
    }
}

impl<W: Write> VlcEncoder for GolombEncoder<W> {
    fn encode_index(&mut self, index: usize, cum: &CumFreq) -> Result<()> {
        let m = estimate_m(cum);
        let k = bits_for(m);
        let t = (1u32 << k) - m;
        let s = (index - 1) as u32;
        let r = s % m;

        for _ in 0..(s / m) {
            self.bits.put_bit(true)?;
        }
        self.bits.put_bit(false)?;

        if r < t {
            self.bits.put_bits(r, k - 1)
        } else {
            self.bits.put_bits(r + t, k)
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.bits.flush()
    }
}

pub struct GolombDecoder<R> {
    bits: BitReader<R>,
}

impl<R: Read> GolombDecoder<R> {
    pub fn new(reader: R) -> Self {
        GolombDecoder {
            bits: BitReader::new(reader),
        }
    }
}

impl<R: Read> VlcDecoder for GolombDecoder<R> {
    fn decode_index(&mut self, cum: &CumFreq) -> Result<usize> {
        let m = estimate_m(cum);
        let k = bits_for(m);
        let t = (1u32 << k) - m;

        let mut s = 0u32;
        while self.bits.get_bit()? {
            s += 1;
        }

        let x = self.bits.get_bits(k - 1)?;
        let s = if x < t {
            s * m + x
        } else {
            let x = x * 2 + self.bits.get_bit()? as u32;
            s * m + x - t
        };
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
            let mut enc = GolombEncoder::new(&mut buf);
            for &idx in &indices {
                enc.encode_index(idx, model.cum()).unwrap();
                model.update(idx);
            }
            enc.finish().unwrap();
        }
        let mut model = Order0Model::new();
        let mut dec = GolombDecoder::new(&buf[..]);
        for &idx in &indices {
            assert_eq!(dec.decode_index(model.cum()).unwrap(), idx);
            model.update(idx);
        }
    }
}
