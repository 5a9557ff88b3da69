//! Interactive questions asked of the person running the tool.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};

pub trait Prompt {
    /// Returns the index of the chosen option.
    fn choose_one(&mut self, message: &str, options: &[String]) -> Result<usize>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    fn read_string(&mut self, message: &str) -> Result<String>;
}

/// Line-oriented prompt over any reader/writer pair.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read answer")?;
        if read == 0 {
            bail!("input closed while waiting for an answer");
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn choose_one(&mut self, message: &str, options: &[String]) -> Result<usize> {
        if options.is_empty() {
            bail!("no options to choose from for: {message}");
        }

        writeln!(self.output, "? {message}")?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {option}", index + 1)?;
        }

        loop {
            write!(self.output, "  Answer: ")?;
            self.output.flush()?;

            let answer = self.read_line()?;
            match answer.parse::<usize>() {
                Ok(choice) if (1..=options.len()).contains(&choice) => return Ok(choice - 1),
                _ => writeln!(self.output, "  Please enter a number from 1 to {}", options.len())?,
            }
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };

        loop {
            write!(self.output, "? {message} ({hint}) ")?;
            self.output.flush()?;

            let answer = self.read_line()?.to_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "  Please answer yes or no")?,
            }
        }
    }

    fn read_string(&mut self, message: &str) -> Result<String> {
        write!(self.output, "? {message}: ")?;
        self.output.flush()?;
        self.read_line()
    }
}
