//! Cross-codec round-trip coverage driven through the public dispatcher
//! in `codec_lab::codec`: empty input, single bytes, boundary-length
//! runs that force a dictionary flush or a window wrap, and seeded PRNG
//! slices.

use codec_lab::codec::{decode_stream, encode_stream, CodecKind, CodecOptions};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rstest::rstest;

/// Codecs whose wire format carries its own terminator, so decoding needs
/// no extra out-of-band argument.
const SELF_TERMINATING: [CodecKind; 6] = [
    CodecKind::Arith,
    CodecKind::Lzss,
    CodecKind::Lzw,
    CodecKind::Huffman,
    CodecKind::Mtf,
    CodecKind::Rle,
];

fn round_trip(kind: CodecKind, opts: &CodecOptions, input: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::new();
    encode_stream(kind, opts, input, &mut encoded).unwrap();
    let mut decoded = Vec::new();
    decode_stream(kind, opts, &encoded[..], &mut decoded).unwrap();
    decoded
}

fn prng_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);
    buf
}

#[rstest]
#[case(CodecKind::Arith)]
#[case(CodecKind::Lzss)]
#[case(CodecKind::Lzw)]
#[case(CodecKind::Huffman)]
#[case(CodecKind::Mtf)]
#[case(CodecKind::Rle)]
fn empty_input_round_trips(#[case] kind: CodecKind) {
    assert_eq!(round_trip(kind, &CodecOptions::default(), b""), b"");
}

#[rstest]
#[case(CodecKind::Arith)]
#[case(CodecKind::Lzss)]
#[case(CodecKind::Lzw)]
#[case(CodecKind::Huffman)]
#[case(CodecKind::Mtf)]
#[case(CodecKind::Rle)]
fn single_byte_round_trips(#[case] kind: CodecKind) {
    assert_eq!(round_trip(kind, &CodecOptions::default(), b"A"), b"A");
}

#[rstest]
#[case(CodecKind::Arith)]
#[case(CodecKind::Lzss)]
#[case(CodecKind::Lzw)]
#[case(CodecKind::Huffman)]
#[case(CodecKind::Mtf)]
#[case(CodecKind::Rle)]
fn all_zero_input_round_trips(#[case] kind: CodecKind) {
    let input = vec![0u8; 500];
    assert_eq!(round_trip(kind, &CodecOptions::default(), &input), input);
}

#[rstest]
#[case(CodecKind::Arith)]
#[case(CodecKind::Lzss)]
#[case(CodecKind::Lzw)]
#[case(CodecKind::Huffman)]
#[case(CodecKind::Mtf)]
#[case(CodecKind::Rle)]
fn monotone_sequence_round_trips(#[case] kind: CodecKind) {
    let input: Vec<u8> = (0..=255u16).cycle().take(1024).map(|b| b as u8).collect();
    assert_eq!(round_trip(kind, &CodecOptions::default(), &input), input);
}

#[test]
fn lzss_encodes_a_run_exactly_one_look_ahead_buffer_long() {
    // 17 bytes: one literal followed by one match covering the remainder,
    // per the look-ahead size the encoder uses.
    let input = b"AAAAAAAAAAAAAAAAA";
    assert_eq!(input.len(), 17);
    assert_eq!(round_trip(CodecKind::Lzss, &CodecOptions::default(), input), input);
}

#[test]
fn lzss_round_trips_input_wider_than_its_window() {
    let input = prng_bytes(0x1357_9bdf, 9000);
    assert_eq!(round_trip(CodecKind::Lzss, &CodecOptions::default(), &input), input);
}

#[test]
fn lzw_flushes_its_dictionary_on_a_long_repeated_byte_run() {
    let input = vec![b'X'; 32_800];
    assert_eq!(round_trip(CodecKind::Lzw, &CodecOptions::default(), &input), input);
}

#[test]
fn huffman_round_trips_to_be_or_not_to_be() {
    let input = b"TOBEORNOTTOBEORTOBEORNOT";
    assert_eq!(round_trip(CodecKind::Huffman, &CodecOptions::default(), input), input);
}

#[test]
fn arithmetic_round_trips_enough_symbols_to_force_a_model_rescale() {
    let input: Vec<u8> = (0..20_000u32).map(|i| (i % 11) as u8).collect();
    assert_eq!(round_trip(CodecKind::Arith, &CodecOptions::default(), &input), input);
}

#[rstest]
#[case(CodecKind::Arith)]
#[case(CodecKind::Lzss)]
#[case(CodecKind::Lzw)]
#[case(CodecKind::Huffman)]
#[case(CodecKind::Mtf)]
#[case(CodecKind::Rle)]
fn self_terminating_codecs_round_trip_a_prng_slice(#[case] kind: CodecKind) {
    let input = prng_bytes(0xC0DE_C1AB, 64 * 1024);
    assert_eq!(round_trip(kind, &CodecOptions::default(), &input), input);
}

#[rstest]
#[case(CodecKind::Unary)]
#[case(CodecKind::Rice)]
#[case(CodecKind::Golomb)]
fn explicit_length_vlcs_round_trip_a_prng_slice(#[case] kind: CodecKind) {
    let input = prng_bytes(0xC0DE_C1AB, 64 * 1024);
    let opts = CodecOptions {
        symbol_count: Some(input.len()),
        ..Default::default()
    };
    assert_eq!(round_trip(kind, &opts, &input), input);
}

#[test]
fn ppm_round_trips_a_prng_slice_at_order_3() {
    let input = prng_bytes(0xC0DE_C1AB, 4096);
    let max_order = 3u8;
    let opts = CodecOptions {
        max_order: Some(max_order),
        symbol_count: Some(input.len()),
    };
    let mut encoded = Vec::new();
    encode_stream(CodecKind::Ppm, &opts, &input[..], &mut encoded).unwrap();
    let mut decoded = Vec::new();
    decode_stream(CodecKind::Ppm, &opts, &encoded[..], &mut decoded).unwrap();
    assert_eq!(decoded, input);
}

#[test]
fn every_self_terminating_codec_is_covered_by_the_scenario_table() {
    assert_eq!(SELF_TERMINATING.len(), 6);
}
