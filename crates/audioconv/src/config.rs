use std::path::PathBuf;

use crate::bitrate::Bitrate;
use crate::ffmpeg::Ffmpeg;
use crate::format::Format;
use crate::plan::{self, Plan, ValidationError};

/// Configuration for a batch of conversions.
pub(crate) struct Config {
    pub(crate) inputs: Vec<PathBuf>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) format: Format,
    pub(crate) bitrate: Option<Bitrate>,
    pub(crate) ffmpeg: PathBuf,
    pub(crate) ffprobe: PathBuf,
    pub(crate) dry_run: bool,
    pub(crate) verbose: bool,
}

impl Config {
    /// Validate inputs against the output and plan the batch.
    pub(crate) fn plan(&self) -> Result<Plan, ValidationError> {
        plan::plan(
            &self.inputs,
            self.output.as_deref(),
            &self.format,
            self.bitrate.as_ref(),
        )
    }

    /// Construct the engine used to probe and convert.
    pub(crate) fn engine(&self) -> Ffmpeg {
        Ffmpeg::new(&self.ffmpeg, &self.ffprobe)
    }
}
