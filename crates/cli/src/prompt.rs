//! Line-oriented terminal input/output for the interactive menu.

use std::io::{self, BufRead, Write};

/// Reads answers from `input` and writes prompts and views to `output`.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` and read one line without its line ending.
    ///
    /// Returns `Ok(None)` at end of input.
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_string();
        Ok(Some(answer))
    }

    pub fn say(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        let text = text.as_ref();
        if text.ends_with('\n') {
            write!(self.output, "{text}")
        } else {
            writeln!(self.output, "{text}")
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
