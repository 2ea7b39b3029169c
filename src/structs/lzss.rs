//! LZSS dictionary coder: a sliding-window match finder backed by a
//! lexicographically ordered binary search tree over the dictionary, one
//! node per window position.
//!
//! References: J. Ziv and A. Lempel, IEEE Trans. IT-23, 337-343 (1977);
//! J. A. Storer and T. G. Szymanski, J. ACM 29, 928-951 (1982); T. C. Bell,
//! IEEE Trans. COM-34, 1176-1182 (1986).
//!
//! Each output token is one flag bit followed by either an 8-bit literal
//! byte or a 12-bit dictionary position plus a 4-bit match length. The
//! dictionary doubles as the look-ahead buffer: both live in the same
//! 4096-byte circular `window`, and the tree is kept up to date one
//! position at a time as the window slides, exactly mirroring the
//! insert/delete dance the original match finder performs.

use std::io::{Read, Write};

use default_boxed::DefaultBoxed;

use super::bit_io::{BitReader, BitWriter};
use crate::error::Result;

const INDEX_SIZE: u32 = 12;
const WINDOW_SIZE: u32 = 1 << INDEX_SIZE;
const LENGTH_SIZE: u32 = 4;
const RAW_LOOK_AHEAD_SIZE: usize = 1 << LENGTH_SIZE;
/// How many literal bytes it takes to break even against one `ij` code.
const MIN_ENCODED_STRING_SIZE: usize = (1 + INDEX_SIZE as usize + LENGTH_SIZE as usize) / 9;
const LOOK_AHEAD_SIZE: usize = RAW_LOOK_AHEAD_SIZE + MIN_ENCODED_STRING_SIZE;
const TREE_ROOT: u32 = WINDOW_SIZE;
const END_OF_STREAM: u32 = 0;
const UNUSED: u32 = 0;

fn mod_window(a: u32) -> u32 {
    a & (WINDOW_SIZE - 1)
}

/// The sliding window plus the binary tree that indexes it. Sized for the
/// heap via [`default_boxed`] — `WINDOW_SIZE + 1` nodes of three `u32`
/// fields each is too large to build on the stack before moving it.
#[derive(DefaultBoxed)]
struct Dictionary {
    window: [u8; WINDOW_SIZE as usize],
    parent: [u32; WINDOW_SIZE as usize + 1],
    smaller_child: [u32; WINDOW_SIZE as usize + 1],
    larger_child: [u32; WINDOW_SIZE as usize + 1],
}

impl Dictionary {
    fn init_tree(&mut self, root: u32) {
        self.larger_child[TREE_ROOT as usize] = root;
        self.parent[root as usize] = TREE_ROOT;
        self.larger_child[root as usize] = UNUSED;
        self.smaller_child[root as usize] = UNUSED;
    }

    fn contract_node(&mut self, old_node: u32, new_node: u32) {
        self.parent[new_node as usize] = self.parent[old_node as usize];
        let parent = self.parent[old_node as usize] as usize;
        if self.larger_child[parent] == old_node {
            self.larger_child[parent] = new_node;
        } else {
            self.smaller_child[parent] = new_node;
        }
        self.parent[old_node as usize] = UNUSED;
    }

    fn replace_node(&mut self, old_node: u32, new_node: u32) {
        let parent = self.parent[old_node as usize] as usize;
        if self.smaller_child[parent] == old_node {
            self.smaller_child[parent] = new_node;
        } else {
            self.larger_child[parent] = new_node;
        }
        self.parent[new_node as usize] = self.parent[old_node as usize];
        self.smaller_child[new_node as usize] = self.smaller_child[old_node as usize];
        self.larger_child[new_node as usize] = self.larger_child[old_node as usize];
        self.parent[self.smaller_child[new_node as usize] as usize] = new_node;
        self.parent[self.larger_child[new_node as usize] as usize] = new_node;
        self.parent[old_node as usize] = UNUSED;
    }

    /// Descends first through `smaller_child`, then always `larger_child`,
    /// to find the in-order predecessor of `node`.
    fn find_next_node(&self, node: u32) -> u32 {
        let mut next = self.smaller_child[node as usize];
        while self.larger_child[next as usize] != UNUSED {
            next = self.larger_child[next as usize];
        }
        next
    }

    fn delete_string(&mut self, p: u32) {
        if self.parent[p as usize] == UNUSED {
            return;
        }
        if self.larger_child[p as usize] == UNUSED {
            self.contract_node(p, self.smaller_child[p as usize]);
        } else if self.smaller_child[p as usize] == UNUSED {
            self.contract_node(p, self.larger_child[p as usize]);
        } else {
            let replacement = self.find_next_node(p);
            self.delete_string(replacement);
            self.replace_node(p, replacement);
        }
    }

    /// Inserts `new_node` into the tree and returns the length and position
    /// of the longest match found against the existing dictionary.
    fn add_string(&mut self, new_node: u32) -> (usize, u32) {
        if new_node == END_OF_STREAM {
            return (0, 0);
        }
        let mut test_node = self.larger_child[TREE_ROOT as usize];
        let mut match_length = 0usize;
        let mut match_position = 0u32;

        loop {
            let mut i = 0usize;
            let mut delta: i32 = 0;
            while i < LOOK_AHEAD_SIZE {
                delta = i32::from(self.window[mod_window(new_node + i as u32) as usize])
                    - i32::from(self.window[mod_window(test_node + i as u32) as usize]);
                if delta != 0 {
                    break;
                }
                i += 1;
            }
            if i >= match_length {
                match_length = i;
                match_position = test_node;
                if match_length >= LOOK_AHEAD_SIZE {
                    self.replace_node(test_node, new_node);
                    return (match_length, match_position);
                }
            }
            let take_larger = delta >= 0;
            let child = if take_larger {
                self.larger_child[test_node as usize]
            } else {
                self.smaller_child[test_node as usize]
            };
            if child == UNUSED {
                if take_larger {
                    self.larger_child[test_node as usize] = new_node;
                } else {
                    self.smaller_child[test_node as usize] = new_node;
                }
                self.parent[new_node as usize] = test_node;
                self.larger_child[new_node as usize] = UNUSED;
                self.smaller_child[new_node as usize] = UNUSED;
                return (match_length, match_position);
            }
            test_node = child;
        }
    }
}

pub fn encode_stream<R: Read, W: Write>(mut input: R, output: W) -> Result<()> {
    let mut dict = Dictionary::default_boxed();
    let mut bits = BitWriter::new(output);

    let mut current_position: u32 = 1;
    let mut look_ahead_bytes = 0usize;
    let mut byte = [0u8; 1];
    for i in 0..LOOK_AHEAD_SIZE {
        if input.read(&mut byte).map_err(crate::error::read_err)? == 0 {
            break;
        }
        dict.window[(current_position as usize) + i] = byte[0];
        look_ahead_bytes = i + 1;
    }

    dict.init_tree(current_position);
    let mut match_length = 0usize;
    let mut match_position = 0u32;

    while look_ahead_bytes > 0 {
        if match_length > look_ahead_bytes {
            match_length = look_ahead_bytes;
        }

        let replace_count = if match_length <= MIN_ENCODED_STRING_SIZE {
            bits.put_bit(true)?;
            bits.put_bits(u32::from(dict.window[current_position as usize]), 8)?;
            1
        } else {
            bits.put_bit(false)?;
            bits.put_bits(match_position, INDEX_SIZE)?;
            bits.put_bits(
                (match_length - (MIN_ENCODED_STRING_SIZE + 1)) as u32,
                LENGTH_SIZE,
            )?;
            match_length
        };

        for _ in 0..replace_count {
            dict.delete_string(mod_window(current_position + LOOK_AHEAD_SIZE as u32));
            if input.read(&mut byte).map_err(crate::error::read_err)? == 0 {
                look_ahead_bytes -= 1;
            } else {
                dict.window[mod_window(current_position + LOOK_AHEAD_SIZE as u32) as usize] =
                    byte[0];
            }
            current_position = mod_window(current_position + 1);
            if look_ahead_bytes > 0 {
                let (len, pos) = dict.add_string(current_position);
                match_length = len;
                match_position = pos;
            }
        }
    }

    bits.put_bit(false)?;
    bits.put_bits(END_OF_STREAM, INDEX_SIZE)?;
    bits.flush()
}

pub fn decode_stream<R: Read, W: Write>(input: R, mut output: W) -> Result<()> {
    let mut window = vec![0u8; WINDOW_SIZE as usize].into_boxed_slice();
    let mut bits = BitReader::new(input);
    let mut current_position: u32 = 1;

    loop {
        if bits.get_bit()? {
            let c = bits.get_bits(8)? as u8;
            output.write_all(&[c]).map_err(crate::error::write_err)?;
            window[current_position as usize] = c;
            current_position = mod_window(current_position + 1);
        } else {
            let match_position = bits.get_bits(INDEX_SIZE)?;
            if match_position == END_OF_STREAM {
                break;
            }
            let match_length = bits.get_bits(LENGTH_SIZE)? as usize + MIN_ENCODED_STRING_SIZE;
            for i in 0..=match_length {
                let c = window[mod_window(match_position + i as u32) as usize];
                output.write_all(&[c]).map_err(crate::error::write_err)?;
                window[current_position as usize] = c;
                current_position = mod_window(current_position + 1);
            }
        }
    }
    Ok(())
}
