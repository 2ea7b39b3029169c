//! Two-pass static Huffman coder with an order-0 frequency model.
//!
//! Reference: D. A. Huffman, Proc. IRE 40, 1098-1101 (1952); M. Nelson and
//! J.-L. Gailly, The Data Compression Book, 1995.
//!
//! Pass one counts byte frequencies, scales them into `0..=255` (so the
//! header fits one byte per symbol), and writes a run-length-compressed
//! header of `(first, last, counts[first..=last])` triples terminated by a
//! zero `first` byte. Pass two builds the decoding tree from those same
//! scaled counts, walks it once to derive a code table, and emits each
//! input byte's code followed by the 257th symbol's code as an
//! end-of-stream marker. The decoder rebuilds the identical tree from the
//! header and walks it bit by bit for every symbol.
//!
//! The original buffers standard input to a named temp file so it can be
//! read twice; this port reads the whole input into memory instead, since
//! callers here already have it in hand before encoding starts.

use std::io::{Read, Write};

use super::bit_io::{BitReader, BitWriter};
use crate::error::{read_err, write_err, Result};

const END_OF_STREAM: usize = 256;
const NODE_COUNT: usize = 514;
/// Sentinel node count, guaranteed larger than any real weight.
const SENTINEL: usize = 513;

#[derive(Clone, Copy, Default)]
struct Node {
    count: u32,
    child_0: i32,
    child_1: i32,
}

#[derive(Clone, Copy, Default)]
struct Code {
    code: u32,
    bits: u32,
}

fn scale_counts(mut counts: [u64; 256]) -> [Node; NODE_COUNT] {
    let mut max_count = counts.iter().copied().max().unwrap_or(0);
    if max_count == 0 {
        // Guarantee at least one non-EOS leaf so the tree still has two
        // symbols to combine, even for empty input.
        counts[0] = 1;
        max_count = 1;
    }
    let divisor = max_count / 255 + 1;

    let mut nodes = [Node::default(); NODE_COUNT];
    for i in 0..256 {
        let mut c = (counts[i] / divisor) as u32;
        if c == 0 && counts[i] != 0 {
            c = 1;
        }
        nodes[i].count = c;
    }
    nodes[END_OF_STREAM].count = 1;
    nodes
}

/// Repeatedly merges the two lowest-weight active nodes until one remains,
/// and returns its index. `nodes[SENTINEL]` holds an unreachably large
/// count so the first two real comparisons always replace it.
fn build_tree(nodes: &mut [Node; NODE_COUNT]) -> usize {
    nodes[SENTINEL].count = 0xffff;
    let mut next_free = END_OF_STREAM + 1;
    loop {
        let mut min_1 = SENTINEL;
        let mut min_2 = SENTINEL;
        for i in 0..next_free {
            if nodes[i].count != 0 {
                if nodes[i].count < nodes[min_1].count {
                    min_2 = min_1;
                    min_1 = i;
                } else if nodes[i].count < nodes[min_2].count {
                    min_2 = i;
                }
            }
        }
        if min_2 == SENTINEL {
            break;
        }
        nodes[next_free].count = nodes[min_1].count + nodes[min_2].count;
        nodes[min_1].count = 0;
        nodes[min_2].count = 0;
        nodes[next_free].child_0 = min_1 as i32;
        nodes[next_free].child_1 = min_2 as i32;
        next_free += 1;
    }
    next_free - 1
}

fn convert_tree_to_code(
    nodes: &[Node; NODE_COUNT],
    codes: &mut [Code; END_OF_STREAM + 1],
    code_so_far: u32,
    bits: u32,
    node: usize,
) {
    if node <= END_OF_STREAM {
        codes[node] = Code {
            code: code_so_far,
            bits,
        };
        return;
    }
    let code_so_far = code_so_far << 1;
    let bits = bits + 1;
    convert_tree_to_code(nodes, codes, code_so_far, bits, nodes[node].child_0 as usize);
    convert_tree_to_code(nodes, codes, code_so_far | 1, bits, nodes[node].child_1 as usize);
}

/// Writes the scaled per-byte counts as `first, last, counts[first..=last]`
/// runs, skipping over gaps of more than three consecutive zero counts,
/// terminated by a zero `first`.
fn write_counts<W: Write>(nodes: &[Node; NODE_COUNT], out: &mut W) -> Result<()> {
    let count_at = |i: usize| nodes[i].count;

    let mut first = 0usize;
    while first < 255 && count_at(first) == 0 {
        first += 1;
    }
    while first < 256 {
        let mut last = first + 1;
        let next;
        loop {
            while last < 256 && count_at(last) != 0 {
                last += 1;
            }
            last -= 1;
            let mut n = last + 1;
            while n < 256 && count_at(n) == 0 {
                n += 1;
            }
            if n > 255 || n - last > 3 {
                next = n;
                break;
            }
            last = n;
        }
        out.write_all(&[first as u8]).map_err(write_err)?;
        out.write_all(&[last as u8]).map_err(write_err)?;
        for i in first..=last {
            out.write_all(&[count_at(i) as u8]).map_err(write_err)?;
        }
        first = next;
    }
    out.write_all(&[0u8]).map_err(write_err)?;
    Ok(())
}

fn read_u8<R: Read>(input: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    input.read_exact(&mut buf).map_err(read_err)?;
    Ok(buf[0])
}

fn read_counts<R: Read>(input: &mut R) -> Result<[Node; NODE_COUNT]> {
    let mut nodes = [Node::default(); NODE_COUNT];
    let mut first = read_u8(input)?;
    let mut last = read_u8(input)?;
    loop {
        for i in first..=last {
            nodes[i as usize].count = u32::from(read_u8(input)?);
        }
        first = read_u8(input)?;
        if first == 0 {
            break;
        }
        last = read_u8(input)?;
    }
    nodes[END_OF_STREAM].count = 1;
    Ok(nodes)
}

pub fn encode_stream<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let mut data = Vec::new();
    input.read_to_end(&mut data).map_err(read_err)?;

    let mut counts = [0u64; 256];
    for &b in &data {
        counts[b as usize] += 1;
    }

    let mut nodes = scale_counts(counts);
    write_counts(&nodes, &mut output)?;

    let root = build_tree(&mut nodes);
    let mut codes = [Code::default(); END_OF_STREAM + 1];
    convert_tree_to_code(&nodes, &mut codes, 0, 0, root);

    let mut bits = BitWriter::new(output);
    for &b in &data {
        let c = codes[b as usize];
        bits.put_bits(c.code, c.bits)?;
    }
    let eos = codes[END_OF_STREAM];
    bits.put_bits(eos.code, eos.bits)?;
    bits.flush()
}

pub fn decode_stream<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let mut nodes = read_counts(&mut input)?;
    let root = build_tree(&mut nodes);
    let mut bits = BitReader::new(input);

    loop {
        let mut node = root;
        while node > END_OF_STREAM {
            node = if bits.get_bit()? {
                nodes[node].child_1 as usize
            } else {
                nodes[node].child_0 as usize
            };
        }
        if node == END_OF_STREAM {
            break;
        }
        output.write_all(&[node as u8]).map_err(write_err)?;
    }
    Ok(())
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
    fn round_trips_a_single_repeated_byte() {
        assert_eq!(round_trip(&[b'z'; 50]), vec![b'z'; 50]);
    }

    #[test]
    fn round_trips_skewed_english_text() {
        let text = b"the quick brown fox jumps over the lazy dog, again and again";
        assert_eq!(round_trip(text), text);
    }

    #[test]
    fn round_trips_every_byte_value_exactly_once() {
        let input: Vec<u8> = (0..=255u16).map(|i| i as u8).collect();
        assert_eq!(round_trip(&input), input);
    }

    #[test]
    fn compresses_a_skewed_distribution_smaller_than_the_input() {
        let mut text = vec![b'a'; 1000];
        text.extend_from_slice(b"bcdefg");
        let mut encoded = Vec::new();
        encode_stream(&text[..], &mut encoded).unwrap();
        assert!(encoded.len() < text.len());
    }
}
