//! Yes/no confirmation before destructive actions.

use std::io::{self, BufRead, Write};

pub struct Confirm<R, W> {
    input: R,
    output: W,
}

impl Confirm<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stderr(),
        }
    }
}

impl<R: BufRead, W: Write> Confirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks `question`; only an explicit "y"/"yes" confirms. EOF counts as no.
    pub fn ask(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{} [y/N] ", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}
