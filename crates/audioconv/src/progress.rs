//! Tracking of ffmpeg progress.
//!
//! Progress is read from the `key=value` blocks written by `-progress`, each
//! terminated by a `progress=continue` or `progress=end` line. The total
//! duration is only printed as a diagnostic, like:
//!
//! ```text
//!   Duration: 00:03:25.12, start: 0.000000, bitrate: 1411 kb/s
//! ```

use core::time::Duration;

use crate::engine::Progress;

#[derive(Default)]
pub(crate) struct Tracker {
    duration: Option<Duration>,
    out_time: Option<Duration>,
}

impl Tracker {
    /// Feed a diagnostic line. The first duration seen is the input's.
    pub(crate) fn diagnostic(&mut self, line: &str) {
        if self.duration.is_some() {
            return;
        }

        self.duration = parse_duration_line(line);
    }

    /// Feed a line of progress output, returning an update at the end of
    /// each block.
    pub(crate) fn line(&mut self, line: &str) -> Option<Progress> {
        let (key, value) = line.split_once('=')?;
        let value = value.trim();

        match key.trim() {
            // NB: `out_time_ms` is ignored, older versions report it in
            // microseconds.
            "out_time_us" => {
                if let Ok(us) = value.parse::<u64>() {
                    self.out_time = Some(Duration::from_micros(us));
                }
            }
            "out_time" => {
                if let Some(t) = parse_timestamp(value) {
                    self.out_time = Some(t);
                }
            }
            "progress" => {
                return Some(Progress {
                    percent: self.percent(),
                });
            }
            _ => {}
        }

        None
    }

    fn percent(&self) -> Option<f64> {
        let total = self.duration?.as_secs_f64();

        if total <= 0.0 {
            return None;
        }

        let done = self.out_time?.as_secs_f64();
        Some((done / total * 100.0).clamp(0.0, 100.0))
    }
}

fn parse_duration_line(line: &str) -> Option<Duration> {
    let rest = line.trim_start().strip_prefix("Duration:")?;
    let value = rest.split(',').next()?;
    parse_timestamp(value.trim())
}

/// Parse a timestamp like `01:02:03.45`.
fn parse_timestamp(s: &str) -> Option<Duration> {
    let mut it = s.splitn(3, ':');
    let hours = it.next()?.parse::<u64>().ok()?;
    let minutes = it.next()?.parse::<u64>().ok()?;
    let seconds = it.next()?.parse::<f64>().ok()?;

    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let whole = hours.checked_mul(3600)?.checked_add(minutes.checked_mul(60)?)?;
    let fraction = Duration::try_from_secs_f64(seconds).ok()?;
    Duration::from_secs(whole).checked_add(fraction)
}
