use core::error::Error;
use core::fmt;
use core::str::FromStr;

#[derive(Debug, PartialEq, Eq)]
pub enum FormatErr {
    Empty,
    Separator,
}

impl fmt::Display for FormatErr {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "format cannot be empty"),
            Self::Separator => write!(f, "format cannot contain a path separator"),
        }
    }
}

impl Error for FormatErr {}

/// The target format of a conversion.
///
/// This is the extension used for output files. Any value is accepted, it's
/// up to the engine to decide whether it knows how to produce it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Format {
    ext: String,
}

impl Format {
    pub const DEFAULT: &'static str = "mp3";

    /// The file extension of the format.
    #[inline]
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// The name of the muxer ffmpeg uses for the format.
    ///
    /// Most formats share the name of their extension.
    pub fn ffmpeg_format(&self) -> &str {
        match self.ext.as_str() {
            "aac" => "adts",
            "m4a" => "ipod",
            ext => ext,
        }
    }
}

impl Default for Format {
    #[inline]
    fn default() -> Self {
        Self {
            ext: Self::DEFAULT.to_owned(),
        }
    }
}

impl fmt::Display for Format {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ext.fmt(f)
    }
}

impl FromStr for Format {
    type Err = FormatErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(FormatErr::Empty);
        }

        if s.contains(['/', '\\']) {
            return Err(FormatErr::Separator);
        }

        Ok(Self { ext: s.to_owned() })
    }
}
