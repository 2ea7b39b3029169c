//! Unary coder: `index` is written as `index - 1` set bits followed by a
//! cleared bit. Simplest member of the VLC family; ignores the
//! cumulative-frequency vector entirely.

use std::io::{Read, Write};

use super::bit_io::{BitReader, BitWriter};
use super::vlc::{CumFreq, VlcDecoder, VlcEncoder};
use crate::error::Result;

pub struct UnaryEncoder<W> {
    bits: BitWriter<W>,
}

impl<W: Write> UnaryEncoder<W> {
    pub fn new(writer: W) -> Self {
        UnaryEncoder {
            bits: BitWriter::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.bits.into_inner()
    }
}

impl<W: Write> VlcEncoder for UnaryEncoder<W> {
    fn encode_index(&mut self, index: usize, _cum: &CumFreq) -> Result<()> {
        for _ in 0..index - 1 {
            self.bits.put_bit(true)?;
        }
        self.bits.put_bit(false)
    }

    fn finish(&mut self) -> Result<()> {
        self.bits.flush()
    }
}

pub struct UnaryDecoder<R> {
    bits: BitReader<R>,
}

impl<R: Read> UnaryDecoder<R> {
    pub fn new(reader: R) -> Self {
        UnaryDecoder {
            bits: BitReader::new(reader),
        }
    }
}

impl<R: Read> VlcDecoder for UnaryDecoder<R> {
    fn decode_index(&mut self, _cum: &CumFreq) -> Result<usize> {
        let mut s = 0usize;
        while self.bits.get_bit()? {
            s += 1;
        }
        Ok(s + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_sequence_of_indices() {
        let indices = [1usize, 4, 2, 1, 9, 3];
        let cum: [u16; 0] = [];
        let mut buf = Vec::new();
        {
            let mut enc = UnaryEncoder::new(&mut buf);
            for &idx in &indices {
                enc.encode_index(idx, &cum).unwrap();
            }
            enc.finish().unwrap();
        }
        let mut dec = UnaryDecoder::new(&buf[..]);
        for &idx in &indices {
            assert_eq!(dec.decode_index(&cum).unwrap(), idx);
        }
    }
}
