//! Top-level codec registry: maps a name on the command line onto one of
//! the coders in [`crate::structs`] and provides the `encode_stream`/
//! `decode_stream` entry points the CLI drives.
//!
//! Three families share this dispatcher: dictionary coders (LZSS, LZW)
//! and transforms (MTF, RLE, Huffman) already expose `encode_stream`/
//! `decode_stream` directly; the model-plus-VLC family (arithmetic,
//! unary, Rice, Golomb) does not, since the VLC layer only knows about
//! indices and cumulative-frequency vectors, so this module supplies the
//! order-0-model wiring that turns a byte stream into a sequence of
//! `encode_index`/`decode_index` calls. PPM is its own family again: it
//! owns its context model directly, so it gets a thin pass-through plus
//! the extra max-order argument every other codec ignores.

use std::io::{Read, Write};

use crate::error::{read_err, write_err, CodecError, Result};
use crate::structs::order0_model::Order0Model;
use crate::structs::vlc::{VlcDecoder, VlcEncoder};
use crate::structs::{arithmetic, golomb, huffman, lzss, lzw, mtf, ppm, rice, rle, unary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    Arith,
    Lzss,
    Lzw,
    Huffman,
    Unary,
    Rice,
    Golomb,
    Mtf,
    Rle,
    Ppm,
}

impl CodecKind {
    pub fn parse(name: &str) -> Result<Self> {
        Ok(match name {
            "arith" | "arithmetic" => CodecKind::Arith,
            "lzss" => CodecKind::Lzss,
            "lzw" => CodecKind::Lzw,
            "huffman" => CodecKind::Huffman,
            "unary" => CodecKind::Unary,
            "rice" => CodecKind::Rice,
            "golomb" => CodecKind::Golomb,
            "mtf" => CodecKind::Mtf,
            "rle" => CodecKind::Rle,
            "ppm" => CodecKind::Ppm,
            other => {
                return Err(CodecError::ArgumentError(format!(
                    "unknown codec '{other}' (expected one of: arith, lzss, lzw, huffman, unary, rice, golomb, mtf, rle, ppm)"
                )))
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            CodecKind::Arith => "arith",
            CodecKind::Lzss => "lzss",
            CodecKind::Lzw => "lzw",
            CodecKind::Huffman => "huffman",
            CodecKind::Unary => "unary",
            CodecKind::Rice => "rice",
            CodecKind::Golomb => "golomb",
            CodecKind::Mtf => "mtf",
            CodecKind::Rle => "rle",
            CodecKind::Ppm => "ppm",
        }
    }

    /// Whether this codec takes the PPM maximum-context-order argument.
    pub fn needs_max_order(&self) -> bool {
        matches!(self, CodecKind::Ppm)
    }

    /// Whether decoding this codec needs the original symbol count
    /// supplied out of band, since its wire format carries no terminator.
    pub fn needs_symbol_count_to_decode(&self) -> bool {
        matches!(self, CodecKind::Unary | CodecKind::Rice | CodecKind::Golomb | CodecKind::Ppm)
    }
}

/// Extra, codec-specific parameters gathered by the CLI before dispatch.
/// Most codecs ignore both fields; see [`CodecKind::needs_max_order`] and
/// [`CodecKind::needs_symbol_count_to_decode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecOptions {
    pub max_order: Option<u8>,
    pub symbol_count: Option<usize>,
}

fn missing_arg(what: &str) -> CodecError {
    CodecError::ArgumentError(format!("{what} is required for this codec"))
}

/// Drives `enc` over every byte of `input` through a fresh order-0 model,
/// then finishes the coder. Shared by unary, Rice and Golomb encoding.
fn encode_vlc_stream<R: Read, E: VlcEncoder>(mut input: R, mut enc: E) -> Result<()> {
    let mut model = Order0Model::new();
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte).map_err(read_err)? {
            0 => break,
            _ => {
                let idx = model.find_index(byte[0]);
                enc.encode_index(idx, model.cum())?;
                model.update(idx);
            }
        }
    }
    enc.finish()
}

/// Decodes exactly `symbol_count` indices from `dec` through a fresh
/// order-0 model. Shared by unary, Rice and Golomb decoding.
fn decode_vlc_stream<W: Write, D: VlcDecoder>(
    mut dec: D,
    mut output: W,
    symbol_count: usize,
) -> Result<()> {
    let mut model = Order0Model::new();
    for _ in 0..symbol_count {
        let idx = dec.decode_index(model.cum())?;
        output
            .write_all(&[model.find_symbol(idx)])
            .map_err(write_err)?;
        model.update(idx);
    }
    Ok(())
}

pub fn encode_stream<R: Read, W: Write>(
    kind: CodecKind,
    opts: &CodecOptions,
    mut input: R,
    output: W,
) -> Result<()> {
    match kind {
        CodecKind::Arith => {
            let mut model = Order0Model::new();
            let mut enc = arithmetic::ArithmeticEncoder::new(output);
            let mut byte = [0u8; 1];
            loop {
                match input.read(&mut byte).map_err(read_err)? {
                    0 => break,
                    _ => {
                        let idx = model.find_index(byte[0]);
                        enc.encode_index(idx, model.cum())?;
                        model.update(idx);
                    }
                }
            }
            let eos = model.find_eos_index();
            enc.encode_index(eos, model.cum())?;
            enc.into_inner().map(|_| ())
        }
        CodecKind::Lzss => lzss::encode_stream(input, output),
        CodecKind::Lzw => lzw::encode_stream(input, output),
        CodecKind::Huffman => huffman::encode_stream(input, output),
        CodecKind::Mtf => mtf::encode_stream(input, output),
        CodecKind::Rle => rle::encode_stream(input, output),
        CodecKind::Unary => encode_vlc_stream(input, unary::UnaryEncoder::new(output)),
        CodecKind::Rice => encode_vlc_stream(input, rice::RiceEncoder::new(output)),
        CodecKind::Golomb => encode_vlc_stream(input, golomb::GolombEncoder::new(output)),
        CodecKind::Ppm => {
            let max_order = opts.max_order.ok_or_else(|| missing_arg("a maximum context order"))?;
            ppm::encode_stream(input, output, max_order)
        }
    }
}

pub fn decode_stream<R: Read, W: Write>(
    kind: CodecKind,
    opts: &CodecOptions,
    input: R,
    mut output: W,
) -> Result<()> {
    match kind {
        CodecKind::Arith => {
            let mut model = Order0Model::new();
            let mut dec = arithmetic::ArithmeticDecoder::new(input)?;
            loop {
                let idx = dec.decode_index(model.cum())?;
                if model.is_eos_index(idx) {
                    break;
                }
                output
                    .write_all(&[model.find_symbol(idx)])
                    .map_err(write_err)?;
                model.update(idx);
            }
            Ok(())
        }
        CodecKind::Lzss => lzss::decode_stream(input, output),
        CodecKind::Lzw => lzw::decode_stream(input, output),
        CodecKind::Huffman => huffman::decode_stream(input, output),
        CodecKind::Mtf => mtf::decode_stream(input, output),
        CodecKind::Rle => rle::decode_stream(input, output),
        CodecKind::Unary => {
            let n = opts.symbol_count.ok_or_else(|| missing_arg("the original symbol count"))?;
            decode_vlc_stream(unary::UnaryDecoder::new(input), output, n)
        }
        CodecKind::Rice => {
            let n = opts.symbol_count.ok_or_else(|| missing_arg("the original symbol count"))?;
            decode_vlc_stream(rice::RiceDecoder::new(input), output, n)
        }
        CodecKind::Golomb => {
            let n = opts.symbol_count.ok_or_else(|| missing_arg("the original symbol count"))?;
            decode_vlc_stream(golomb::GolombDecoder::new(input), output, n)
        }
        CodecKind::Ppm => {
            let max_order = opts.max_order.ok_or_else(|| missing_arg("a maximum context order"))?;
            // `n` is the original stream length; ppm::decode_stream accounts
            // for the max_order-byte literal prefix internally.
            let n = opts.symbol_count.ok_or_else(|| missing_arg("the original symbol count"))?;
            ppm::decode_stream(input, output, max_order, n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_documented_name() {
        for name in ["arith", "lzss", "lzw", "huffman", "unary", "rice", "golomb", "mtf", "rle", "ppm"] {
            let kind = CodecKind::parse(name).unwrap();
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn rejects_an_unknown_name() {
        assert!(matches!(
            CodecKind::parse("bogus"),
            Err(CodecError::ArgumentError(_))
        ));
    }

    fn round_trip(kind: CodecKind, opts: &CodecOptions, input: &[u8]) -> Vec<u8> {
        let mut encoded = Vec::new();
        encode_stream(kind, opts, input, &mut encoded).unwrap();
        let mut decoded = Vec::new();
        decode_stream(kind, opts, &encoded[..], &mut decoded).unwrap();
        decoded
    }

    #[test]
    fn dispatches_arithmetic_round_trip() {
        let input = b"mississippi river";
        assert_eq!(round_trip(CodecKind::Arith, &CodecOptions::default(), input), input);
    }

    #[test]
    fn dispatches_lzss_round_trip() {
        let input = b"abcabcabcabcabc";
        assert_eq!(round_trip(CodecKind::Lzss, &CodecOptions::default(), input), input);
    }

    #[test]
    fn dispatches_huffman_round_trip() {
        let input = b"the quick brown fox";
        assert_eq!(round_trip(CodecKind::Huffman, &CodecOptions::default(), input), input);
    }

    #[test]
    fn dispatches_rle_round_trip() {
        let input = b"aaabbbbccccccd";
        assert_eq!(round_trip(CodecKind::Rle, &CodecOptions::default(), input), input);
    }

    #[test]
    fn dispatches_rice_round_trip_given_the_symbol_count() {
        let input = b"banana bandana";
        let opts = CodecOptions {
            symbol_count: Some(input.len()),
            ..Default::default()
        };
        assert_eq!(round_trip(CodecKind::Rice, &opts, input), input);
    }

    #[test]
    fn rice_decode_without_a_symbol_count_is_an_argument_error() {
        let mut encoded = Vec::new();
        encode_stream(CodecKind::Rice, &CodecOptions::default(), &b"x"[..], &mut encoded).unwrap();
        let mut decoded = Vec::new();
        let err = decode_stream(CodecKind::Rice, &CodecOptions::default(), &encoded[..], &mut decoded)
            .unwrap_err();
        assert!(matches!(err, CodecError::ArgumentError(_)));
    }

    #[test]
    fn dispatches_ppm_round_trip_given_order_and_symbol_count() {
        let input = b"abracadabra abracadabra";
        let opts = CodecOptions {
            max_order: Some(2),
            symbol_count: Some(input.len()),
        };
        let mut encoded = Vec::new();
        encode_stream(CodecKind::Ppm, &opts, &input[..], &mut encoded).unwrap();
        let mut decoded = Vec::new();
        decode_stream(CodecKind::Ppm, &opts, &encoded[..], &mut decoded).unwrap();
        assert_eq!(decoded, input);
    }
}
