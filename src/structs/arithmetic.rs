//! Binary arithmetic coder with Witten-Neal-Cleary carry-propagation
//! (E1/E2/E3) rescaling.
//!
//! Reference: I. H. Witten, R. M. Neal, and J. G. Cleary, "Arithmetic
//! coding for data compression," Commun. ACM, vol. 30, no. 6, 1987.
//!
//! The interval endpoints and the deferred-bit counter that the original C
//! implementation kept as file-scope statics are bundled here into
//! `ArithmeticEncoder`/`ArithmeticDecoder`, each owning the bit stream it
//! drives so an encode pass and a decode pass never share state.

use std::io::{Read, Write};

use super::bit_io::{BitReader, BitWriter};
use super::vlc::{CumFreq, VlcDecoder, VlcEncoder};
use crate::error::{CodecError, Result};

/// Coding precision in bits. Chosen so that `range >= 4 * cum[0]` whenever
/// the model obeys `cum[0] <= MAX_CUM` (see `order0_model`), which keeps the
/// E1/E2/E3 renormalisation loop from ever collapsing the interval.
const BIT_ACCURACY: u32 = 16;

const TOP: u32 = (1u32 << BIT_ACCURACY) - 1; // 0.999...
const QTR: u32 = TOP / 4 + 1; // 0.25
const HALF: u32 = QTR * 2; // 0.50
const THREE_QTR: u32 = QTR * 3; // 0.75

pub struct ArithmeticEncoder<W> {
    bits: BitWriter<W>,
    low: u32,
    high: u32,
    bits_to_follow: u32,
}

impl<W: Write> ArithmeticEncoder<W> {
    pub fn new(writer: W) -> Self {
        ArithmeticEncoder {
            bits: BitWriter::new(writer),
            low: 0,
            high: TOP,
            bits_to_follow: 0,
        }
    }

    /// Emits `bit`, followed by `bits_to_follow` bits of the opposite
    /// polarity, then clears the deferred-bit counter.
    fn bit_plus_follow(&mut self, bit: bool) -> Result<()> {
        self.bits.put_bit(bit)?;
        while self.bits_to_follow > 0 {
            self.bits.put_bit(!bit)?;
            self.bits_to_follow -= 1;
        }
        Ok(())
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.finish()?;
        self.bits.into_inner()
    }
}

impl<W: Write> VlcEncoder for ArithmeticEncoder<W> {
    fn encode_index(&mut self, index: usize, cum: &CumFreq) -> Result<()> {
        let range = u64::from(self.high - self.low) + 1;
        let total = u64::from(cum[0]);

        self.high = self.low + (range * u64::from(cum[index - 1]) / total) as u32 - 1;
        self.low += (range * u64::from(cum[index]) / total) as u32;

        loop {
            if self.high < HALF {
                self.bit_plus_follow(false)?;
            } else if self.low >= HALF {
                self.bit_plus_follow(true)?;
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= QTR && self.high < THREE_QTR {
                self.bits_to_follow += 1;
                self.low -= QTR;
                self.high -= QTR;
            } else {
                break;
            }
            self.low *= 2;
            self.high = self.high * 2 + 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.bits_to_follow += 1;
        if self.low < QTR {
            self.bit_plus_follow(false)?;
        } else {
            self.bit_plus_follow(true)?;
        }
        self.bits.flush()
    }
}

pub struct ArithmeticDecoder<R> {
    bits: BitReader<R>,
    low: u32,
    high: u32,
    value: u32,
}

impl<R: Read> ArithmeticDecoder<R> {
    pub fn new(reader: R) -> Result<Self> {
        let mut bits = BitReader::new(reader);
        let mut value = 0u32;
        for _ in 0..BIT_ACCURACY {
            value = value * 2 + bits.get_bit()? as u32;
        }
        Ok(ArithmeticDecoder {
            bits,
            low: 0,
            high: TOP,
            value,
        })
    }
}

impl<R: Read> VlcDecoder for ArithmeticDecoder<R> {
    fn decode_index(&mut self, cum: &CumFreq) -> Result<usize> {
        let range = u64::from(self.high - self.low) + 1;
        let total = u64::from(cum[0]);
        let target = ((u64::from(self.value - self.low) + 1) * total - 1) / range;

        let mut index = 1usize;
        while u64::from(cum[index]) > target {
            index += 1;
            if index >= cum.len() {
                return Err(CodecError::InvalidCode(
                    "arithmetic decoder: cumulative vector exhausted before target was found",
                ));
            }
        }

        self.high = self.low + (range * u64::from(cum[index - 1]) / total) as u32 - 1;
        self.low += (range * u64::from(cum[index]) / total) as u32;

        loop {
            if self.high < HALF {
                // E1: nothing to subtract.
            } else if self.low >= HALF {
                self.value -= HALF;
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= QTR && self.high < THREE_QTR {
                self.value -= QTR;
                self.low -= QTR;
                self.high -= QTR;
            } else {
                break;
            }
            self.low *= 2;
            self.high = self.high * 2 + 1;
            self.value = self.value * 2 + self.bits.get_bit()? as u32;
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::order0_model::Order0Model;

    fn round_trip(symbols: &[u8]) -> Vec<u8> {
        let mut model = Order0Model::new();
        let mut buf = Vec::new();
        {
            let mut enc = ArithmeticEncoder::new(&mut buf);
            for &s in symbols {
                let idx = model.find_index(s);
                enc.encode_index(idx, model.cum()).unwrap();
                model.update(idx);
            }
            let eos = model.find_eos_index();
            enc.encode_index(eos, model.cum()).unwrap();
            enc.finish().unwrap();
        }

        let mut model = Order0Model::new();
        let mut dec = ArithmeticDecoder::new(&buf[..]).unwrap();
        let mut out = Vec::new();
        loop {
            let idx = dec.decode_index(model.cum()).unwrap();
            if model.is_eos_index(idx) {
                break;
            }
            out.push(model.find_symbol(idx));
            model.update(idx);
        }
        out
    }

    #[test]
    fn round_trips_empty_input() {
        assert_eq!(round_trip(&[]), Vec::<u8>::new());
    }

    #[test]
    fn round_trips_single_byte() {
        assert_eq!(round_trip(b"A"), b"A".to_vec());
    }

    #[test]
    fn round_trips_repetitive_text() {
        let input = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_vec();
        assert_eq!(round_trip(&input), input);
    }

    #[test]
    fn round_trips_enough_symbols_to_force_a_model_rescale() {
        // MAX_CUM = 16383; incrementing one symbol repeatedly forces
        // cum[0] to hit the ceiling and the model to halve its counts.
        let input: Vec<u8> = (0..20000u32).map(|i| (i % 7) as u8).collect();
        assert_eq!(round_trip(&input), input);
    }
}
