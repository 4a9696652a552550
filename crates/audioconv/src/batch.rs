//! Sequential processing of a planned batch.
//!
//! Failures are isolated per file: a missing input, a failed probe or a
//! failed conversion is reported and processing moves on to the next file.
//! The only errors which propagate are failures to report.

use std::fs;
use std::io;
use std::path::Path;

use crate::bitrate::Bitrate;
use crate::engine::{Job, Metadata, Probe, Progress, Transcode};
use crate::plan::{Plan, Request};
use crate::report::{Event, Report};

/// The result of processing a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file was converted.
    Converted,
    /// The file was not converted, but nothing went wrong.
    Skipped { reason: String },
    /// The conversion failed.
    Failed { message: String },
}

impl Outcome {
    #[inline]
    pub fn succeeded(&self) -> bool {
        matches!(self, Outcome::Converted)
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Converted => "done",
            Outcome::Skipped { reason } => reason,
            Outcome::Failed { message } => message,
        }
    }
}

/// Runs conversions one at a time.
pub struct Runner<'a> {
    probe: &'a dyn Probe,
    engine: &'a dyn Transcode,
    verbose: bool,
    dry_run: bool,
}

impl<'a> Runner<'a> {
    pub fn new(probe: &'a dyn Probe, engine: &'a dyn Transcode) -> Self {
        Self {
            probe,
            engine,
            verbose: false,
            dry_run: false,
        }
    }

    /// Report the full command of every conversion.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Report what would be done without converting anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process every request in the plan, in order.
    pub fn run(&self, plan: &Plan, report: &mut dyn Report) -> io::Result<()> {
        report.report(Event::Batch {
            requests: &plan.requests,
        })?;

        for collision in &plan.collisions {
            report.report(Event::Collision { collision })?;
        }

        for request in &plan.requests {
            self.process(request, report)?;
        }

        report.report(Event::Finished)
    }

    /// Process a single request.
    ///
    /// Only returns once the engine has finished with the file.
    pub fn process(&self, request: &Request, report: &mut dyn Report) -> io::Result<Outcome> {
        let input = request.input.as_path();

        if !input.exists() {
            report.report(Event::Missing { input })?;

            return Ok(Outcome::Skipped {
                reason: String::from("input does not exist"),
            });
        }

        let Some(output) = request.output.as_deref() else {
            return fail(input, "no output file name can be derived from the input", report);
        };

        if same_file(input, output) {
            return fail(input, "output path is the same as the input", report);
        }

        let bitrate = match &request.bitrate {
            Some(bitrate) => Some(bitrate.clone()),
            None => self.detect_bitrate(input, report)?,
        };

        report.report(Event::Start {
            request,
            output,
            bitrate: bitrate.as_ref(),
        })?;

        let job = Job {
            input,
            output,
            format: &request.format,
            bitrate: bitrate.as_ref(),
        };

        if self.verbose || self.dry_run {
            let command = self.engine.describe(&job, self.verbose);

            report.report(Event::Command {
                input,
                command: &command,
                dry_run: self.dry_run,
            })?;
        }

        if self.dry_run {
            return Ok(Outcome::Skipped {
                reason: String::from("dry run"),
            });
        }

        let mut last = None;
        let mut report_error = None;

        let result = self.engine.transcode(&job, &mut |p: Progress| {
            let Some(percent) = p.percent else {
                return;
            };

            let percent = percent.floor() as u32;

            if report_error.is_some() || last == Some(percent) {
                return;
            }

            last = Some(percent);

            if let Err(e) = report.report(Event::Progress { input, percent }) {
                report_error = Some(e);
            }
        });

        if let Some(e) = report_error {
            return Err(e);
        }

        match result {
            Ok(()) => {
                report.report(Event::Done { input })?;
                Ok(Outcome::Converted)
            }
            Err(e) => {
                let message = format!("{e:#}");

                report.report(Event::Failed {
                    input,
                    message: &message,
                })?;

                Ok(Outcome::Failed { message })
            }
        }
    }

    fn detect_bitrate(&self, input: &Path, report: &mut dyn Report) -> io::Result<Option<Bitrate>> {
        let reason = match self.probe.probe(input) {
            Ok(Metadata {
                bit_rate: Some(bps),
            }) => match Bitrate::from_bits_per_second(bps) {
                Some(bitrate) => return Ok(Some(bitrate)),
                None => format!("bit rate of {bps} bps is too low to use"),
            },
            Ok(Metadata { bit_rate: None }) => String::from("no bit rate reported"),
            Err(e) => format!("{e:#}"),
        };

        report.report(Event::ProbeFailed {
            input,
            reason: &reason,
        })?;

        Ok(None)
    }
}

fn fail(input: &Path, message: &str, report: &mut dyn Report) -> io::Result<Outcome> {
    report.report(Event::Failed { input, message })?;

    Ok(Outcome::Failed {
        message: message.to_owned(),
    })
}

/// Test if two existing paths refer to the same file, like `a.mp3` and
/// `./a.mp3`.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }

    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
