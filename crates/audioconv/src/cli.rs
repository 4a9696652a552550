use core::cell::Cell;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use termcolor::{ColorChoice, StandardStream};

use crate::batch::Runner;
use crate::bitrate::Bitrate;
use crate::config::Config;
use crate::format::Format;
use crate::out::{Colors, Out};
use crate::report::Terminal;

/// Convert audio files to another format using ffmpeg.
#[derive(Parser)]
pub struct Audioconv {
    /// Output file path for a single input, or an existing directory to
    /// write into when converting multiple files.
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Target format, like mp3, wav or ogg.
    #[arg(short = 'f', long, default_value = Format::DEFAULT)]
    format: Format,
    /// Audio bitrate, like 128k or 320k. If omitted, the bitrate of the
    /// source file is used.
    #[arg(short = 'b', long)]
    bitrate: Option<Bitrate>,
    /// If set, prints the full ffmpeg command of every conversion and the
    /// reason bitrate detection failed.
    #[arg(short = 'v', long)]
    verbose: bool,
    /// If set, prints what would be done without converting anything.
    #[arg(short = 'D', long)]
    dry_run: bool,
    /// Path to the ffmpeg binary used for conversions.
    #[arg(long, default_value = "ffmpeg", value_name = "PATH")]
    ffmpeg_bin: PathBuf,
    /// Path to the ffprobe binary used to detect source bitrates.
    #[arg(long, default_value = "ffprobe", value_name = "PATH")]
    ffprobe_bin: PathBuf,
    /// Input audio files.
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,
}

/// Entry for `audioconv`.
///
/// See [`crate`] documentation.
pub fn entry(opts: &Audioconv) -> Result<()> {
    let config = Config {
        inputs: opts.files.clone(),
        output: opts.output.clone(),
        format: opts.format.clone(),
        bitrate: opts.bitrate.clone(),
        ffmpeg: opts.ffmpeg_bin.clone(),
        ffprobe: opts.ffprobe_bin.clone(),
        dry_run: opts.dry_run,
        verbose: opts.verbose,
    };

    // Nothing is touched unless every output can be resolved.
    let plan = config.plan()?;
    let engine = config.engine();

    let indent = Cell::new(0);
    let cols = Colors::new();

    let o = StandardStream::stdout(ColorChoice::Auto);
    let mut o = o.lock();
    let e = StandardStream::stderr(ColorChoice::Auto);
    let mut e = e.lock();

    let mut terminal = Terminal::new(
        Out::new(&indent, &cols, &mut o),
        Out::new(&indent, &cols, &mut e),
        config.verbose,
    );

    Runner::new(&engine, &engine)
        .verbose(config.verbose)
        .dry_run(config.dry_run)
        .run(&plan, &mut terminal)?;

    Ok(())
}
