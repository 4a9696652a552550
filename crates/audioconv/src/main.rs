//! A tool to convert audio files to another format using ffmpeg.
//!
//! See the `audioconv` library documentation for more information.

use anyhow::Result;
use clap::Parser;

/// Convert audio files to another format using ffmpeg.
#[derive(Parser)]
#[command(author, version, about, max_term_width = 80)]
pub struct Opts {
    #[command(flatten)]
    inner: audioconv::cli::Audioconv,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    audioconv::cli::entry(&opts.inner)
}
