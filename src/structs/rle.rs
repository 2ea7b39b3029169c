//! MNP-5 style run-length codec.
//!
//! Encodes a repeated byte as the byte itself, followed by a one-byte run
//! length (0..=255) counting *additional* repeats beyond the one just
//! written, followed — unless the run saturated the 255 cap — by the byte
//! that ended the run:
//!
//! ```text
//! input  output
//! -----  ------
//! ab     ab
//! aab    aa0b
//! aaab   aa1b
//! aaaab  aa2b
//! ```
//!
//! Typical use is as the stage right before an entropy coder in a pipeline
//! (`rle | mtf | ari`, say): it turns long runs into a handful of bytes so
//! the adaptive model downstream sees a less repetitive, more compressible
//! stream. Reference: M. Nelson and J.-L. Gailly, "The Data Compression
//! Book," 1995.
//!
//! The original C leaves one edge case loosely specified: what happens when
//! a run saturates the 255 cap exactly as a further repeat of the same byte
//! is waiting. This port always re-surfaces that byte as the next top-level
//! symbol (chunking a very long run into consecutive saturated segments)
//! rather than silently dropping it, so that `decode(encode(s)) == s` holds
//! for runs of any length, per the round-trip requirement this lab holds
//! every codec to.

use std::io::{Read, Write};

use crate::error::{read_err, write_err, Result};

const MAX_RUN: u16 = 255;

fn next_byte<R: Read>(input: &mut R, pushback: &mut Option<u8>) -> Result<Option<u8>> {
    if let Some(b) = pushback.take() {
        return Ok(Some(b));
    }
    let mut buf = [0u8; 1];
    match input.read(&mut buf).map_err(read_err)? {
        0 => Ok(None),
        _ => Ok(Some(buf[0])),
    }
}

pub fn encode_stream<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let mut pushback: Option<u8> = None;
    // Matches the original's `prev_symbol = 0` starting sentinel: harmless
    // even when the first real byte is 0x00, since the decoder applies the
    // identical rule.
    let mut prev: u8 = 0;

    while let Some(byte) = next_byte(&mut input, &mut pushback)? {
        output.write_all(&[byte]).map_err(write_err)?;

        if byte != prev {
            prev = byte;
            continue;
        }

        let mut run_length: u16 = 0;
        loop {
            match next_byte(&mut input, &mut pushback)? {
                Some(b) if b == byte && run_length < MAX_RUN => run_length += 1,
                Some(b) => {
                    pushback = Some(b);
                    break;
                }
                None => break,
            }
        }
        output.write_all(&[run_length as u8]).map_err(write_err)?;

        if run_length == MAX_RUN {
            // Saturated: whatever byte follows (possibly another `byte`,
            // left in `pushback`) is reprocessed as a fresh top-level
            // symbol on the next iteration instead of being discarded.
            prev = byte;
            continue;
        }

        match next_byte(&mut input, &mut pushback)? {
            Some(b) => {
                output.write_all(&[b]).map_err(write_err)?;
                prev = b;
            }
            None => break,
        }
    }
    Ok(())
}

pub fn decode_stream<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let mut prev: u8 = 0;
    let mut buf = [0u8; 1];

    loop {
        if input.read(&mut buf).map_err(read_err)? == 0 {
            break;
        }
        let byte = buf[0];
        output.write_all(&[byte]).map_err(write_err)?;

        if byte == prev {
            let mut len_buf = [0u8; 1];
            input.read_exact(&mut len_buf).map_err(read_err)?;
            for _ in 0..len_buf[0] {
                output.write_all(&[byte]).map_err(write_err)?;
            }
        }
        prev = byte;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(input: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        encode_stream(input, &mut out).unwrap();
        out
    }

    fn round_trip(input: &[u8]) -> Vec<u8> {
        let encoded = encode(input);
        let mut out = Vec::new();
        decode_stream(&encoded[..], &mut out).unwrap();
        out
    }

    #[test]
    fn matches_the_documented_wire_examples() {
        assert_eq!(encode(b"ab"), b"ab");
        assert_eq!(encode(b"aab"), vec![b'a', b'a', 0, b'b']);
        assert_eq!(encode(b"aaab"), vec![b'a', b'a', 1, b'b']);
        assert_eq!(encode(b"aaaab"), vec![b'a', b'a', 2, b'b']);
    }

    #[test]
    fn round_trips_empty_input() {
        assert_eq!(round_trip(b""), b"");
    }

    #[test]
    fn round_trips_a_leading_zero_byte_run() {
        assert_eq!(round_trip(&[0, 0, 0x41]), vec![0, 0, 0x41]);
    }

    #[test]
    fn round_trips_a_run_long_enough_to_saturate_the_cap() {
        let input = vec![b'x'; 600];
        assert_eq!(round_trip(&input), input);
    }

    #[test]
    fn round_trips_monotone_non_repeating_input() {
        let input: Vec<u8> = (0..=255u16).map(|i| i as u8).collect();
        assert_eq!(round_trip(&input), input);
    }
}
