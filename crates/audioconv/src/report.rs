//! Status reporting for a batch.
//!
//! The runner never writes to the terminal directly. Everything it has to say
//! goes through [`Report`], so it can be rendered, recorded or ignored.

use std::borrow::Cow;
use std::io;
use std::path::Path;

use crate::bitrate::Bitrate;
use crate::out::{Out, blank, error, info, warn};
use crate::plan::{Collision, Request};

/// Something that happened while processing a batch.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// Processing of a batch is about to start.
    Batch { requests: &'a [Request] },
    /// More than one input writes to the same output.
    Collision { collision: &'a Collision },
    /// The input file does not exist and is skipped.
    Missing { input: &'a Path },
    /// The source bitrate could not be determined.
    ProbeFailed { input: &'a Path, reason: &'a str },
    /// Conversion of a file is about to start.
    Start {
        request: &'a Request,
        output: &'a Path,
        bitrate: Option<&'a Bitrate>,
    },
    /// The command which performs a conversion.
    Command {
        input: &'a Path,
        command: &'a str,
        dry_run: bool,
    },
    /// Percent complete for the current file.
    Progress { input: &'a Path, percent: u32 },
    /// The current file was converted.
    Done { input: &'a Path },
    /// The current file failed to convert.
    Failed { input: &'a Path, message: &'a str },
    /// Every file in the batch has been attempted.
    Finished,
}

/// Receiver of batch events.
pub trait Report {
    fn report(&mut self, event: Event<'_>) -> io::Result<()>;
}

/// Reports events to a terminal.
///
/// Missing inputs and failed conversions are written to `e`, everything else
/// to `o`.
pub(crate) struct Terminal<'a> {
    o: Out<'a>,
    e: Out<'a>,
    verbose: bool,
    progress: bool,
}

impl<'a> Terminal<'a> {
    pub(crate) fn new(o: Out<'a>, e: Out<'a>, verbose: bool) -> Self {
        Self {
            o,
            e,
            verbose,
            progress: false,
        }
    }
}

impl Report for Terminal<'_> {
    fn report(&mut self, event: Event<'_>) -> io::Result<()> {
        let progress = self.progress;
        self.progress = false;

        // Anything but a new percentage or completion goes on its own line.
        if progress && !matches!(event, Event::Progress { .. } | Event::Done { .. }) {
            self.o.end_progress()?;
        }

        match event {
            Event::Batch { requests } => {
                let o = &mut self.o;
                info!(o, "Processing the following {} files:", requests.len());
                let mut o = o.indent(1);

                for r in requests {
                    blank!(o, "- {}", name(&r.input));
                }
            }
            Event::Collision { collision } => {
                let o = &mut self.o;
                warn!(o, "Multiple inputs convert to {}:", collision.output.display());
                let mut o = o.indent(1);

                for input in &collision.inputs {
                    blank!(o, "- {}", input.display());
                }

                blank!(o, "Later conversions overwrite earlier ones.");
            }
            Event::Missing { input } => {
                let o = &mut self.e;
                error!(
                    o,
                    "Error: Input file \"{}\" does not exist. Skipping.",
                    input.display()
                );
            }
            Event::ProbeFailed { input, reason } => {
                let o = &mut self.o;
                warn!(
                    o,
                    "[{}] Warning: Could not detect source bitrate. Defaulting to encoder settings.",
                    name(input)
                );

                if self.verbose {
                    let mut o = o.indent(1);
                    blank!(o, "{reason}");
                }
            }
            Event::Start {
                request,
                output,
                bitrate,
            } => {
                let o = &mut self.o;
                blank!(o, "");
                info!(o, "Processing: {}", name(&request.input));
                blank!(o, "Target:     {}", name(output));

                match bitrate {
                    Some(bitrate) => blank!(o, "Bitrate:    {bitrate}"),
                    None => blank!(o, "Bitrate:    auto"),
                }
            }
            Event::Command {
                command, dry_run, ..
            } => {
                let mut o = self.o.indent(1);

                if dry_run {
                    warn!(o, "[dry-run] {command}");
                } else {
                    blank!(o, "{command}");
                }
            }
            Event::Progress { percent, .. } => {
                let mut o = self.o.indent(1);
                o.progress(format_args!("{percent}% done"))?;
                self.progress = true;
            }
            Event::Done { .. } => {
                let mut o = self.o.indent(1);

                // Pad to cover a leftover "100% done".
                if progress {
                    info!(o, "{:<9}", "Done!");
                } else {
                    info!(o, "Done!");
                }
            }
            Event::Failed { input, message } => {
                let o = &mut self.e;
                error!(o, "Failed to convert {}: {message}", input.display());
            }
            Event::Finished => {
                let o = &mut self.o;
                blank!(o, "");
                info!(o, "All files have been processed");
            }
        }

        Ok(())
    }
}

/// The file name of a path for display, or the whole path if it has none.
fn name(path: &Path) -> Cow<'_, str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}
