use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use crate::engine::{Job, Metadata, Probe, Progress, Transcode};
use crate::progress::Tracker;
use crate::shell::CommandLine;

/// An engine backed by the `ffmpeg` and `ffprobe` binaries.
pub struct Ffmpeg {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Ffmpeg {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    fn command(&self, job: &Job<'_>) -> Command {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(["-hide_banner", "-nostdin", "-nostats", "-y"]);
        cmd.args(["-progress", "pipe:1"]);
        cmd.arg("-i").arg(job.input);

        if let Some(bitrate) = job.bitrate {
            cmd.arg("-b:a").arg(bitrate.as_str());
        }

        cmd.args(["-map_metadata", "0"]);
        cmd.args(["-f", job.format.ffmpeg_format()]);
        cmd.arg(job.output);
        cmd
    }
}

impl Probe for Ffmpeg {
    fn probe(&self, path: &Path) -> Result<Metadata> {
        let output = Command::new(&self.ffprobe)
            .args(["-v", "error", "-print_format", "json", "-show_format", "-i"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .with_context(|| anyhow!("Failed to run {}", self.ffprobe.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);

            match last_line(stderr.lines()) {
                Some(line) => bail!("{}: {line}", output.status),
                None => bail!("{}", output.status),
            }
        }

        parse_probe(&output.stdout)
    }
}

impl Transcode for Ffmpeg {
    fn describe(&self, job: &Job<'_>, verbose: bool) -> String {
        let cmd = self.command(job);
        let mut line = CommandLine::new(&cmd);

        if !verbose {
            line.placeholder(self.ffmpeg.as_os_str(), "<ffmpeg>");
            line.placeholder(job.input.as_os_str(), "<from>");
            line.placeholder(job.output.as_os_str(), "<to>");
        }

        line.to_string()
    }

    fn transcode(&self, job: &Job<'_>, progress: &mut dyn FnMut(Progress)) -> Result<()> {
        let mut cmd = self.command(job);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| anyhow!("Failed to start {}", self.ffmpeg.display()))?;

        let stdout = child.stdout.take().context("Missing stdout of ffmpeg")?;
        let stderr = child.stderr.take().context("Missing stderr of ffmpeg")?;

        let last = thread::scope(|s| {
            let (tx, rx) = mpsc::channel();
            let progress_tx = tx.clone();

            s.spawn(move || forward(stdout, Line::Progress, &progress_tx));
            s.spawn(move || forward(stderr, Line::Diagnostic, &tx));

            let mut tracker = Tracker::default();
            let mut last = None;

            for line in rx {
                match line {
                    Line::Progress(line) => {
                        if let Some(p) = tracker.line(&line) {
                            progress(p);
                        }
                    }
                    Line::Diagnostic(line) => {
                        tracker.diagnostic(&line);

                        if !line.trim().is_empty() {
                            last = Some(line);
                        }
                    }
                }
            }

            last
        });

        let status = child.wait().context("Waiting for ffmpeg")?;

        if !status.success() {
            match last {
                Some(line) => bail!("{status}: {}", line.trim()),
                None => bail!("{status}"),
            }
        }

        Ok(())
    }
}

enum Line {
    Progress(String),
    Diagnostic(String),
}

fn forward(reader: impl Read, wrap: fn(String) -> Line, tx: &Sender<Line>) {
    for line in BufReader::new(reader).lines().map_while(Result::ok) {
        if tx.send(wrap(line)).is_err() {
            break;
        }
    }
}

fn last_line<'a>(lines: impl DoubleEndedIterator<Item = &'a str>) -> Option<&'a str> {
    lines.map(str::trim).rfind(|line| !line.is_empty())
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    bit_rate: Option<Number>,
}

/// ffprobe prints numbers as strings, but accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Integer(u64),
    Float(f64),
    Text(String),
}

impl Number {
    fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Integer(n) => Some(*n),
            Number::Float(n) if n.is_finite() && *n >= 0.0 => Some(*n as u64),
            Number::Float(..) => None,
            Number::Text(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| Number::Float(s.parse().ok()?).as_u64())
            }
        }
    }
}

fn parse_probe(bytes: &[u8]) -> Result<Metadata> {
    let output: ProbeOutput = serde_json::from_slice(bytes).context("Parsing ffprobe output")?;

    let bit_rate = output
        .format
        .and_then(|f| f.bit_rate)
        .and_then(|n| n.as_u64());

    Ok(Metadata { bit_rate })
}
