//! A tool to convert audio files to another format using ffmpeg.
//!
//! Every argument is treated as an input file. By default each file is
//! converted to mp3 next to its source, using the bitrate of the source as
//! reported by ffprobe:
//!
//! ```sh
//! audioconv song.flac intro.wav
//! ```
//!
//! The target format is set with `--format`, and an explicit bitrate with
//! `--bitrate`, in which case the source is never probed:
//!
//! ```sh
//! audioconv --format ogg --bitrate 192k song.flac
//! ```
//!
//! With `--output <path>`, a single input is written to exactly that path.
//! When converting multiple files the output has to be an existing
//! directory, in which case each file is written as `<dir>/<name>.<format>`.
//! Invalid combinations are rejected before anything is converted.
//!
//! Files are converted one at a time. A file which is missing or fails to
//! convert is reported and the rest of the batch carries on.
//!
//! <br>
//!
//! ## Usage
//!
//! Use `--dry-run` or `-D` to see what would be done:
//!
//! ```sh
//! audioconv --dry-run --output converted *.flac
//! ```
//!
//! Use `--verbose` to see the exact ffmpeg command used for each file.

pub mod batch;
pub mod bitrate;
pub mod cli;
mod config;
pub mod engine;
pub mod ffmpeg;
pub mod format;
mod out;
pub mod plan;
mod progress;
pub mod report;
mod shell;
