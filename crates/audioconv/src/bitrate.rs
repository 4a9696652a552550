use core::error::Error;
use core::fmt;
use core::str::FromStr;

#[derive(Debug, PartialEq, Eq)]
pub struct BitrateErr;

impl fmt::Display for BitrateErr {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bitrate cannot be empty")
    }
}

impl Error for BitrateErr {}

/// A bitrate passed to the encoder, like `192k`.
///
/// Explicit values are passed on verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitrate {
    value: String,
}

impl Bitrate {
    /// Derive a bitrate in kbps from bits per second, rounding down.
    ///
    /// Returns `None` if the result would be zero.
    pub fn from_bits_per_second(bps: u64) -> Option<Self> {
        let kbps = bps / 1000;

        if kbps == 0 {
            return None;
        }

        Some(Self {
            value: format!("{kbps}k"),
        })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Bitrate {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl FromStr for Bitrate {
    type Err = BitrateErr;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(BitrateErr);
        }

        Ok(Self {
            value: s.to_owned(),
        })
    }
}
