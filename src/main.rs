//! Command-line entry point: selects a codec by name and mode, then
//! drives it between stdin/stdout or `--input`/`--output` files.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

use anyhow::{Context, Result};
use git_version::git_version;
use log::LevelFilter;

use codec_lab::codec::{self, CodecKind, CodecOptions};
use codec_lab::error::CodecError;

const GIT_VERSION: &str = git_version!(fallback = "unknown");

fn usage() -> String {
    format!(
        "codec_lab {GIT_VERSION}\n\n\
         usage: codec_lab <codec> <e|d> [options]\n\n\
         codecs: arith, lzss, lzw, huffman, unary, rice, golomb, mtf, rle, ppm\n\n\
         options:\n\
         \x20 --input PATH       read from PATH instead of stdin\n\
         \x20 --output PATH      write to PATH instead of stdout\n\
         \x20 --max-order N      maximum context order (ppm only)\n\
         \x20 --symbol-count N   original symbol count (required to decode unary/rice/golomb/ppm)\n\
         \x20 -v, --verbose      raise the log level to debug\n"
    )
}

fn run() -> Result<()> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{}", usage());
        return Ok(());
    }

    let verbose = args.contains(["-v", "--verbose"]);
    simple_logger::SimpleLogger::new()
        .with_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init()
        .context("failed to initialize logger")?;

    let input_path: Option<PathBuf> = args.opt_value_from_str("--input")?;
    let output_path: Option<PathBuf> = args.opt_value_from_str("--output")?;
    let max_order: Option<u8> = args.opt_value_from_str("--max-order")?;
    let symbol_count: Option<usize> = args.opt_value_from_str("--symbol-count")?;

    let free = args.finish();
    let mut free = free.into_iter();
    let codec_name = free
        .next()
        .ok_or_else(|| CodecError::ArgumentError("missing codec name".to_string()))?
        .into_string()
        .map_err(|_| CodecError::ArgumentError("codec name is not valid UTF-8".to_string()))?;
    let mode = free
        .next()
        .ok_or_else(|| {
            CodecError::ArgumentError(
                "missing mode: 'e' to encode, anything else to decode".to_string(),
            )
        })?
        .into_string()
        .map_err(|_| CodecError::ArgumentError("mode is not valid UTF-8".to_string()))?;

    let kind = CodecKind::parse(&codec_name)?;
    let encoding = mode.starts_with('e');

    if kind.needs_max_order() && max_order.is_none() {
        return Err(
            CodecError::ArgumentError(format!("{} requires --max-order", kind.name())).into(),
        );
    }
    if !encoding && kind.needs_symbol_count_to_decode() && symbol_count.is_none() {
        return Err(CodecError::ArgumentError(format!(
            "decoding {} requires --symbol-count",
            kind.name()
        ))
        .into());
    }

    let opts = CodecOptions {
        max_order,
        symbol_count,
    };

    log::debug!(
        "codec={} mode={} opts={:?}",
        kind.name(),
        if encoding { "encode" } else { "decode" },
        opts
    );

    let input: Box<dyn Read> = match input_path {
        Some(path) => Box::new(BufReader::new(
            File::open(&path).with_context(|| format!("opening input file {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let output: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(
            File::create(&path)
                .with_context(|| format!("creating output file {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    if encoding {
        codec::encode_stream(kind, &opts, input, output)
    } else {
        codec::decode_stream(kind, &opts, input, output)
    }
    .map_err(anyhow::Error::from)
}

fn main() -> ProcessExitCode {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        let code = err
            .downcast_ref::<CodecError>()
            .map(|e| e.exit_code() as u8)
            .unwrap_or(1);
        return ProcessExitCode::from(code);
    }
    ProcessExitCode::SUCCESS
}
