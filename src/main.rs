//! aiff2pcm8 - converts AIFF/AIFC audio into an 8-bit unsigned PCM array
//!
//! ```bash
//! aiff2pcm8 --dither input.aiff > output.h
//! ```
//!
//! produces a header that can be included directly in a microcontroller
//! sketch:
//!
//! ```c
//! input[] = { 127, 127, ... };
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use aiff2pcm8_lib::prelude::*;
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Reads 16- or 8-bit PCM AIFF/AIFC and outputs 8-bit unsigned PCM data
#[derive(Parser, Debug)]
#[command(name = "aiff2pcm8")]
#[command(version)]
struct Cli {
    /// Enable noise-shaped dither for 16-bit input
    #[arg(long)]
    dither: bool,

    /// Shape the quantization error without adding triangular noise
    #[arg(long, requires = "dither")]
    no_noise: bool,

    /// Seed for the dither noise, for reproducible output
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Declare the array as `prog_uchar name[] PROGMEM`
    #[arg(long)]
    progmem: bool,

    /// Write the array to a file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Input AIFF or AIFC file
    input: PathBuf,
}

impl Cli {
    fn dither_mode(&self) -> DitherMode {
        match (self.dither, self.no_noise) {
            (false, _) => DitherMode::Off,
            (true, false) => DitherMode::Triangular,
            (true, true) => DitherMode::Shaped,
        }
    }

    fn array_style(&self) -> ArrayStyle {
        if self.progmem {
            ArrayStyle::Progmem
        } else {
            ArrayStyle::Plain
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            // Usage errors (e.g. missing input path) exit with 1
            let _ = e.print();
            return ExitCode::from(1);
        }
        Err(e) => e.exit(),
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> R<()> {
    let converter = Converter::new(&cli.input)
        .dither(cli.dither_mode())
        .seed(cli.seed);

    let conversion = converter
        .run()
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    let info = &conversion.info;
    eprintln!("Sample rate: {}", info.sample_rate);
    eprintln!("Sample size: {}", info.sample_size());
    eprintln!("Frames: {}", info.frames);
    eprintln!("Channels: {}", info.channels);

    let array = conversion.to_array(&converter.array_name(), cli.array_style());
    match &cli.output {
        Some(path) => std::fs::write(path, array)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(array.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
