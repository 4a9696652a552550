use core::cell::Cell;
use core::fmt;

use std::io;

use termcolor::{Color, ColorSpec, WriteColor};

macro_rules! __log {
    ($log:ident, $o:ident, $($tt:tt)*) => {
        $o.$log(format_args!($($tt)*))?
    };
}

pub(crate) use __log;

macro_rules! __blank { ($($tt:tt)*) => { $crate::out::__log!(blank, $($tt)*) }; }
macro_rules! __info { ($($tt:tt)*) => { $crate::out::__log!(info, $($tt)*) }; }
macro_rules! __warn { ($($tt:tt)*) => { $crate::out::__log!(warn, $($tt)*) }; }
macro_rules! __error { ($($tt:tt)*) => { $crate::out::__log!(error, $($tt)*) }; }

pub(crate) use __blank as blank;
pub(crate) use __error as error;
pub(crate) use __info as info;
pub(crate) use __warn as warn;

pub(crate) struct Colors {
    info: ColorSpec,
    warn: ColorSpec,
    error: ColorSpec,
}

impl Colors {
    pub(crate) fn new() -> Self {
        let mut info = ColorSpec::new();
        info.set_fg(Some(Color::Green)).set_bold(true);

        let mut warn = ColorSpec::new();
        warn.set_fg(Some(Color::Yellow)).set_bold(true);

        let mut error = ColorSpec::new();
        error.set_fg(Some(Color::Red)).set_bold(true);

        Colors { info, warn, error }
    }
}

/// Indented and colored terminal output.
pub(crate) struct Out<'a> {
    change: usize,
    indent: &'a Cell<usize>,
    c: &'a Colors,
    o: &'a mut dyn WriteColor,
}

impl<'a> Out<'a> {
    pub(crate) fn new(indent: &'a Cell<usize>, c: &'a Colors, o: &'a mut dyn WriteColor) -> Self {
        Out {
            change: 0,
            indent,
            c,
            o,
        }
    }

    /// Indent output until the returned value is dropped.
    pub(crate) fn indent(&mut self, change: usize) -> Out<'_> {
        self.indent.set(self.indent.get() + change);

        Out {
            change,
            indent: self.indent,
            c: self.c,
            o: &mut *self.o,
        }
    }

    pub(crate) fn blank(&mut self, m: impl fmt::Display) -> io::Result<()> {
        self.prefix()?;
        writeln!(self.o, "{m}")?;
        self.o.flush()
    }

    pub(crate) fn info(&mut self, m: impl fmt::Display) -> io::Result<()> {
        self.colorize(Level::Info, m)
    }

    pub(crate) fn warn(&mut self, m: impl fmt::Display) -> io::Result<()> {
        self.colorize(Level::Warn, m)
    }

    pub(crate) fn error(&mut self, m: impl fmt::Display) -> io::Result<()> {
        self.colorize(Level::Error, m)
    }

    /// Write a line which is overwritten by whatever is written next.
    pub(crate) fn progress(&mut self, m: impl fmt::Display) -> io::Result<()> {
        self.prefix()?;
        write!(self.o, "{m}\r")?;
        self.o.flush()
    }

    /// Terminate a line written with [`Out::progress`].
    pub(crate) fn end_progress(&mut self) -> io::Result<()> {
        writeln!(self.o)?;
        self.o.flush()
    }

    fn prefix(&mut self) -> io::Result<()> {
        for _ in 0..self.indent.get() {
            self.o.write_all(b"  ")?;
        }

        Ok(())
    }

    fn colorize(&mut self, level: Level, m: impl fmt::Display) -> io::Result<()> {
        let c = self.c;

        let spec = match level {
            Level::Info => &c.info,
            Level::Warn => &c.warn,
            Level::Error => &c.error,
        };

        self.prefix()?;
        self.o.set_color(spec)?;
        write!(self.o, "{m}")?;
        self.o.reset()?;
        writeln!(self.o)?;
        self.o.flush()
    }
}

impl Drop for Out<'_> {
    #[inline]
    fn drop(&mut self) {
        self.indent.set(self.indent.get().saturating_sub(self.change));
    }
}

#[derive(Clone, Copy)]
enum Level {
    Info,
    Warn,
    Error,
}
