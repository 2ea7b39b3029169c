//! Strips a VIX container header and copies the remainder of stdin to
//! stdout verbatim.
//!
//! Reference: `vix2raw.c`. The header is a magic line, a two-line video
//! section, a two-line color section, and a two-line image section whose
//! trailing numbers are whitespace-delimited rather than one per line: a
//! `width height count` triple followed by `count` `x y` coordinate
//! pairs, mirroring the original's `scanf("%d %d %d", ...)` calls, which
//! consume leading whitespace and digits but stop right after the last
//! digit rather than eating the newline that follows it. One further
//! byte is then discarded (the original's trailing bare `getchar()`)
//! before the rest of the stream is copied through unexamined.

use std::io::{self, BufRead, Read, Write};

use anyhow::{bail, Context, Result};

fn peek_byte<R: BufRead>(input: &mut R) -> Result<Option<u8>> {
    let buf = input.fill_buf().context("reading from input")?;
    Ok(buf.first().copied())
}

/// Consumes bytes up to and including the next `\n`, or to EOF.
fn skip_line<R: BufRead>(input: &mut R) -> Result<()> {
    loop {
        match peek_byte(input)? {
            None => return Ok(()),
            Some(b) => {
                input.consume(1);
                if b == b'\n' {
                    return Ok(());
                }
            }
        }
    }
}

/// Mirrors `scanf("%d", ...)`: skips leading whitespace, then reads an
/// optional sign and decimal digits, leaving the first non-digit
/// unconsumed.
fn scan_int<R: BufRead>(input: &mut R) -> Result<i64> {
    while let Some(b) = peek_byte(input)? {
        if b.is_ascii_whitespace() {
            input.consume(1);
        } else {
            break;
        }
    }

    let mut negative = false;
    if let Some(b @ (b'-' | b'+')) = peek_byte(input)? {
        negative = b == b'-';
        input.consume(1);
    }

    let mut value: i64 = 0;
    let mut saw_digit = false;
    while let Some(b) = peek_byte(input)? {
        if b.is_ascii_digit() {
            value = value * 10 + i64::from(b - b'0');
            saw_digit = true;
            input.consume(1);
        } else {
            break;
        }
    }
    if !saw_digit {
        bail!("expected an integer in the VIX header");
    }
    Ok(if negative { -value } else { value })
}

fn run() -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    skip_line(&mut input)?; // magic number

    skip_line(&mut input)?; // video section
    skip_line(&mut input)?;

    skip_line(&mut input)?; // color section
    skip_line(&mut input)?;

    skip_line(&mut input)?; // image section
    skip_line(&mut input)?;

    let _width = scan_int(&mut input)?;
    let _height = scan_int(&mut input)?;
    let count = scan_int(&mut input)?;
    if count < 0 {
        bail!("VIX header declared a negative coordinate count");
    }
    for _ in 0..count {
        let _x = scan_int(&mut input)?;
        let _y = scan_int(&mut input)?;
    }

    let mut discarded = [0u8; 1];
    input.read(&mut discarded).context("reading from input")?;

    io::copy(&mut input, &mut output).context("copying remaining input to output")?;
    output.flush().context("flushing output")?;
    Ok(())
}

fn main() -> Result<()> {
    run()
}
