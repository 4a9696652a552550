use std::path::Path;

use anyhow::Result;

use crate::bitrate::Bitrate;
use crate::format::Format;

/// Metadata about a source file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Overall bit rate in bits per second.
    pub bit_rate: Option<u64>,
}

/// A progress update from an ongoing conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Percent complete, if the engine knows it.
    pub percent: Option<f64>,
}

/// A single conversion handed to the engine.
#[derive(Debug, Clone, Copy)]
pub struct Job<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub format: &'a Format,
    pub bitrate: Option<&'a Bitrate>,
}

/// Queries metadata about source files.
pub trait Probe {
    fn probe(&self, path: &Path) -> Result<Metadata>;
}

/// Performs conversions.
pub trait Transcode {
    /// Describe the command which would perform the job.
    ///
    /// Unless `verbose` is set, paths may be abbreviated.
    fn describe(&self, job: &Job<'_>, verbose: bool) -> String;

    /// Perform the job, calling `progress` for every update.
    ///
    /// Returns once the conversion has either completed or failed.
    fn transcode(&self, job: &Job<'_>, progress: &mut dyn FnMut(Progress)) -> Result<()>;
}
