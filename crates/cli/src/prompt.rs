//! Line-oriented prompting over any reader/writer pair.

use core::fmt::Display;
use core::str::FromStr;
use std::io::{self, BufRead, Write};

/// Asks for one field at a time. `None` means the input has ended.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Shows `label` and returns the next line, trimmed. Bytes that are not
    /// UTF-8 become U+FFFD, so a numeric field re-prompts instead of failing.
    pub fn text(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }

    /// Shows `label` until the answer parses as `T`.
    pub fn parsed<T>(&mut self, label: &str) -> io::Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            let Some(raw) = self.text(label)? else {
                return Ok(None);
            };
            match raw.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(err) => writeln!(self.output, "Invalid input: {err}")?,
            }
        }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
