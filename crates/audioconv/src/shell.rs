use core::fmt;

use std::borrow::Cow;
use std::ffi::OsStr;
use std::process::Command;

/// Quote an argument so that it can be pasted into a POSIX shell.
pub(crate) fn quote(s: &OsStr) -> Cow<'_, str> {
    let s = s.to_string_lossy();

    if !s.is_empty() && !s.chars().any(needs_quoting) {
        return s;
    }

    let mut o = String::with_capacity(s.len() + 2);
    o.push('\'');

    for c in s.chars() {
        if c == '\'' {
            o.push_str("'\\''");
        } else {
            o.push(c);
        }
    }

    o.push('\'');
    Cow::Owned(o)
}

fn needs_quoting(c: char) -> bool {
    !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | ',' | '+' | '%'))
}

/// Displays a command, optionally substituting some arguments with short
/// placeholders like `<from>`.
pub(crate) struct CommandLine<'a> {
    cmd: &'a Command,
    placeholders: Vec<(&'a OsStr, &'static str)>,
}

impl<'a> CommandLine<'a> {
    pub(crate) fn new(cmd: &'a Command) -> Self {
        Self {
            cmd,
            placeholders: Vec::new(),
        }
    }

    /// Display `value` as `placeholder` wherever it appears as a whole
    /// argument.
    pub(crate) fn placeholder(&mut self, value: &'a OsStr, placeholder: &'static str) {
        self.placeholders.push((value, placeholder));
    }

    fn arg(&self, f: &mut fmt::Formatter<'_>, arg: &OsStr) -> fmt::Result {
        match self.placeholders.iter().find(|(value, _)| *value == arg) {
            Some((_, placeholder)) => f.write_str(placeholder),
            None => f.write_str(&quote(arg)),
        }
    }
}

impl fmt::Display for CommandLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.arg(f, self.cmd.get_program())?;

        for arg in self.cmd.get_args() {
            f.write_str(" ")?;
            self.arg(f, arg)?;
        }

        Ok(())
    }
}
