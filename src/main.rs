//! bitvote - encodes to or decodes from a redundant format which is
//! resistant to bit errors.
//!
//! Stdout carries only stream or payload bytes; all diagnostics go to
//! stderr. `RUST_LOG` selects verbosity (default `info`).

use anyhow::Context;
use bitvote::{codec, CodecConfig};
use clap::Parser;
use std::io::{self, BufWriter};

#[derive(Parser)]
#[command(name = "bitvote")]
#[command(
    about = "Encodes to or decodes from a redundant format which is resistant to bit errors",
    long_about = "Protects data against physical-media bit corruption by writing a heavily \
                  repeated length header followed by as many copies of the payload as the \
                  medium will hold. Decoding reconstructs each word by per-bit majority vote \
                  across every surviving copy."
)]
struct Cli {
    /// Decode a redundant stream from stdin instead of encoding.
    #[arg(short = 'd', long)]
    decode: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage and help both go to stderr with a non-zero exit;
            // stdout never carries anything but stream bytes.
            eprint!("{}", e.render());
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.decode {
        cmd_decode()
    } else {
        cmd_encode()
    }
}

fn cmd_encode() -> anyhow::Result<()> {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    codec::encode(&mut stdin, &mut stdout, &CodecConfig::default()).context("encoding stdin")?;

    Ok(())
}

fn cmd_decode() -> anyhow::Result<()> {
    let mut stdin = io::stdin().lock();
    let mut stdout = BufWriter::new(io::stdout().lock());

    // Stdin cannot seek, so the decoder buffers the body into memory.
    codec::decode(&mut stdin, &mut stdout).context("decoding stdin")?;

    Ok(())
}
