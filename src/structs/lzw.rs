//! LZW dictionary coder with a growing code width and an open-addressed
//! hash dictionary.
//!
//! Reference: T. A. Welch, IEEE Computer 17, 8-19 (1984); M. Nelson and
//! J.-L. Gailly, The Data Compression Book, 1995.
//!
//! Codes start at 9 bits and widen by one bit every time the dictionary
//! crosses a power-of-two boundary, signalled in-band with [`BUMP_CODE`].
//! When the dictionary fills up entirely, [`FLUSH_CODE`] tells the decoder
//! to reset both the dictionary and the code width back to their initial
//! state. The encoder's dictionary is keyed by `(parent_code, next_byte)`
//! and probed with a XOR-based hash plus a multiplicative step on
//! collision; the decoder's dictionary is simpler, since a code is just an
//! index into it.

use std::io::{Read, Write};

use default_boxed::DefaultBoxed;

use super::bit_io::{BitReader, BitWriter};
use crate::error::{read_err, write_err, Result};

const MAX_CODE_SIZE_IN_BITS: u32 = 15;
const MAX_CODE: i32 = (1 << MAX_CODE_SIZE_IN_BITS) - 1;
const TABLE_SIZE: usize = 35023;
const END_OF_STREAM: i32 = 256;
const BUMP_CODE: i32 = 257;
const FLUSH_CODE: i32 = 258;
const FIRST_CODE: i32 = 259;
const UNUSED: i32 = -1;

#[derive(Clone, Copy, Default)]
struct Entry {
    code_value: i32,
    parent_code: i32,
    k: u8,
}

/// The encoder-side dictionary: a `(parent_code, k) -> code_value` map
/// implemented as an open-addressed hash table. `TABLE_SIZE` comfortably
/// exceeds `MAX_CODE` so every probe stays in bounds.
#[derive(DefaultBoxed)]
struct EncodeDictionary {
    entries: [Entry; TABLE_SIZE],
}

impl EncodeDictionary {
    fn reset(&mut self) {
        for e in self.entries.iter_mut() {
            e.code_value = UNUSED;
        }
    }

    /// Finds `parent_code`+`k` in the table, or the empty slot where it
    /// should be inserted. Collisions step by a parent/child-dependent
    /// offset rather than a fixed stride, to spread probes evenly.
    fn find_child_node(&self, parent_code: i32, k: u8) -> usize {
        let hashed = (i32::from(k) << (MAX_CODE_SIZE_IN_BITS - 8)) ^ parent_code;
        let mut index = hashed as usize;
        let offset = if index == 0 {
            1
        } else {
            TABLE_SIZE - index
        };
        loop {
            let e = &self.entries[index];
            if e.code_value == UNUSED {
                return index;
            }
            if e.parent_code == parent_code && e.k == k {
                return index;
            }
            if index >= offset {
                index -= offset;
            } else {
                index += TABLE_SIZE - offset;
            }
        }
    }
}

fn read_byte<R: Read>(input: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    match input.read(&mut buf).map_err(read_err)? {
        0 => Ok(None),
        _ => Ok(Some(buf[0])),
    }
}

pub fn encode_stream<R: Read, W: Write>(mut input: R, output: W) -> Result<()> {
    let mut dict = EncodeDictionary::default_boxed();
    dict.reset();
    let mut bits = BitWriter::new(output);

    let mut current_code_bits: u32 = 9;
    let mut next_w: i32 = FIRST_CODE;
    let mut next_bump_code: i32 = 511;

    let mut w: i32 = match read_byte(&mut input)? {
        Some(b) => i32::from(b),
        None => END_OF_STREAM,
    };

    while let Some(k) = read_byte(&mut input)? {
        let index = dict.find_child_node(w, k);
        if dict.entries[index].code_value != UNUSED {
            w = dict.entries[index].code_value;
            continue;
        }

        bits.put_bits(w as u32, current_code_bits)?;
        dict.entries[index] = Entry {
            code_value: next_w,
            parent_code: w,
            k,
        };
        next_w += 1;
        w = i32::from(k);

        if next_w > MAX_CODE {
            bits.put_bits(FLUSH_CODE as u32, current_code_bits)?;
            dict.reset();
            next_w = FIRST_CODE;
            current_code_bits = 9;
            next_bump_code = 511;
        } else if next_w > next_bump_code {
            bits.put_bits(BUMP_CODE as u32, current_code_bits)?;
            current_code_bits += 1;
            next_bump_code = (next_bump_code << 1) | 1;
        }
    }

    bits.put_bits(w as u32, current_code_bits)?;
    bits.put_bits(END_OF_STREAM as u32, current_code_bits)?;
    bits.flush()
}

/// Walks a code's parent chain back to its root byte, pushing characters
/// in last-emitted-first order (the caller reverses before writing out).
fn push_chain(stack: &mut Vec<u8>, dict: &[(i32, u8)], mut w: u32) {
    while w > 255 {
        let (parent, k) = dict[w as usize];
        stack.push(k);
        w = parent as u32;
    }
    stack.push(w as u8);
}

pub fn decode_stream<R: Read, W: Write>(input: R, mut output: W) -> Result<()> {
    let mut bits = BitReader::new(input);

    loop {
        let mut dict: Vec<(i32, u8)> = vec![(0, 0); (MAX_CODE + 1) as usize];
        let mut next_w: u32 = FIRST_CODE as u32;
        let mut current_code_bits: u32 = 9;

        let prev_code = bits.get_bits(current_code_bits)?;
        if prev_code as i32 == END_OF_STREAM {
            return Ok(());
        }
        output
            .write_all(&[prev_code as u8])
            .map_err(write_err)?;
        let mut prev_w = prev_code;
        let mut k = prev_code as u8;

        loop {
            let w = bits.get_bits(current_code_bits)?;
            if w as i32 == END_OF_STREAM {
                return Ok(());
            }
            if w as i32 == FLUSH_CODE {
                break;
            }
            if w as i32 == BUMP_CODE {
                current_code_bits += 1;
                continue;
            }

            let mut stack = Vec::new();
            if w >= next_w {
                // KwK exception: w isn't in the dictionary yet because the
                // encoder just defined it from prev_w's string plus its own
                // first byte.
                stack.push(k);
                push_chain(&mut stack, &dict, prev_w);
            } else {
                push_chain(&mut stack, &dict, w);
            }
            k = *stack.last().expect("push_chain always pushes at least one byte");
            for &b in stack.iter().rev() {
                output.write_all(&[b]).map_err(write_err)?;
            }

            dict[next_w as usize] = (prev_w as i32, k);
            next_w += 1;
            prev_w = w;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(input: &[u8]) -> Vec<u8> {
        let mut encoded = Vec::new();
        encode_stream(input, &mut encoded).unwrap();
        let mut decoded = Vec::new();
        decode_stream(&encoded[..], &mut decoded).unwrap();
        decoded
    }

    #[test]
    fn round_trips_empty_input() {
        assert_eq!(round_trip(b""), b"");
    }

    #[test]
    fn round_trips_a_single_byte() {
        assert_eq!(round_trip(b"x"), b"x");
    }

    #[test]
    fn round_trips_the_classic_wabba_example() {
        assert_eq!(round_trip(b"wabbawabbawabbawabbawoowoowoo"), &b"wabbawabbawabbawabbawoowoowoo"[..]);
    }

    #[test]
    fn round_trips_input_that_forces_a_code_width_bump() {
        let mut input = Vec::new();
        for i in 0..300u32 {
            input.extend_from_slice(format!("tok{i}-").as_bytes());
        }
        assert_eq!(round_trip(&input), input);
    }

    #[test]
    fn round_trips_a_kwk_pattern() {
        // "ABABA" forces the encoder to emit a code the decoder hasn't
        // defined yet: the classic CHAR+STRING+CHAR+STRING+CHAR exception.
        assert_eq!(round_trip(b"ABABA"), b"ABABA");
    }
}
