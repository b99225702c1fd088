//! Interactive console prompts.
//!
//! Every prompt accepts `?` to print its help text and ask again; an empty
//! answer takes the default. End of input is treated as the user walking
//! away and surfaces as [`Error::Cancelled`].

use crate::error::{Error, Result};
use crate::validate::split_list;
use std::io::{self, BufRead, Write};

/// Source of interactive answers.
pub trait Prompter {
    /// Free text. With `required`, an empty answer and no default re-asks.
    fn text(&mut self, question: &str, default: Option<&str>, help: &str, required: bool)
    -> Result<String>;

    fn confirm(&mut self, question: &str, default: bool, help: &str) -> Result<bool>;

    /// Pick one of `options` by number or by exact label. Returns the index.
    fn choice(&mut self, question: &str, options: &[&str], default: usize, help: &str)
    -> Result<usize>;

    /// Integer no smaller than `min`.
    fn integer(&mut self, question: &str, default: u32, min: u32, help: &str) -> Result<u32>;

    /// Comma-separated values, trimmed, empties dropped.
    fn list(&mut self, question: &str, help: &str) -> Result<Vec<String>>;

    /// Shows a line of text outside any question, such as why an answer was
    /// not accepted.
    fn note(&mut self, message: &str) -> Result<()>;
}

/// Prompter over any line-oriented reader and writer.
pub struct StdinPrompter<R, W> {
    input: R,
    output: W,
}

impl StdinPrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints the question and reads one trimmed line.
    ///
    /// `?` prints `help` and asks again.
    fn ask(&mut self, question: &str, hint: &str, help: &str) -> Result<String> {
        loop {
            if hint.is_empty() {
                write!(self.output, "{question}: ")?;
            } else {
                write!(self.output, "{question} [{hint}]: ")?;
            }
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Err(Error::Cancelled);
            }
            let answer = line.trim();
            if answer == "?" {
                let help = if help.is_empty() { "No help available." } else { help };
                writeln!(self.output, "  {help}")?;
                continue;
            }
            return Ok(answer.to_string());
        }
    }
}

impl<R: BufRead, W: Write> Prompter for StdinPrompter<R, W> {
    fn text(
        &mut self,
        question: &str,
        default: Option<&str>,
        help: &str,
        required: bool,
    ) -> Result<String> {
        loop {
            let answer = self.ask(question, default.unwrap_or(""), help)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            match default {
                Some(d) if !d.is_empty() || !required => return Ok(d.to_string()),
                None if !required => return Ok(String::new()),
                _ => writeln!(self.output, "  A value is required.")?,
            }
        }
    }

    fn confirm(&mut self, question: &str, default: bool, help: &str) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let answer = self.ask(question, hint, help)?.to_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "  Please answer y or n.")?,
            }
        }
    }

    fn choice(
        &mut self,
        question: &str,
        options: &[&str],
        default: usize,
        help: &str,
    ) -> Result<usize> {
        writeln!(self.output, "{question}")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {option}", i + 1)?;
        }
        let default = default.min(options.len().saturating_sub(1));
        let hint = (default + 1).to_string();
        loop {
            let answer = self.ask("Choose", &hint, help)?;
            if answer.is_empty() {
                return Ok(default);
            }
            if let Ok(n) = answer.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return Ok(n - 1);
                }
            } else if let Some(i) = options.iter().position(|o| label_matches(o, &answer)) {
                return Ok(i);
            }
            writeln!(self.output, "  Enter a number between 1 and {}.", options.len())?;
        }
    }

    fn integer(&mut self, question: &str, default: u32, min: u32, help: &str) -> Result<u32> {
        let hint = default.to_string();
        loop {
            let answer = self.ask(question, &hint, help)?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<u32>() {
                Ok(n) if n >= min => return Ok(n),
                _ => writeln!(self.output, "  Enter a whole number of at least {min}.")?,
            }
        }
    }

    fn list(&mut self, question: &str, help: &str) -> Result<Vec<String>> {
        let answer = self.ask(question, "comma-separated, empty for none", help)?;
        Ok(split_list(&answer).map(str::to_string).collect())
    }

    fn note(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "  {message}")?;
        Ok(())
    }
}

/// Whole label or its first word, ignoring ASCII case.
fn label_matches(label: &str, answer: &str) -> bool {
    label.eq_ignore_ascii_case(answer)
        || label
            .split_whitespace()
            .next()
            .is_some_and(|word| word.eq_ignore_ascii_case(answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> StdinPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        StdinPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: StdinPrompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn empty_answer_takes_default() {
        let mut p = prompter("\n\n");
        assert_eq!(p.text("Output", Some("build"), "", false).unwrap(), "build");
        assert!(p.confirm("Console", true, "").unwrap());
    }

    #[test]
    fn question_mark_shows_help_and_reasks() {
        let mut p = prompter("?\nout\n");
        assert_eq!(p.text("Output", Some("build"), "Where files go", false).unwrap(), "out");
        let shown = transcript(p);
        assert!(shown.contains("Where files go"));
        assert_eq!(shown.matches("Output [build]: ").count(), 2);
    }

    #[test]
    fn required_text_reasks_on_empty() {
        let mut p = prompter("\nmain.py\n");
        assert_eq!(p.text("Entry", None, "", true).unwrap(), "main.py");
        assert!(transcript(p).contains("A value is required."));
    }

    #[test]
    fn choice_by_number_or_label() {
        let mut p = prompter("2\nnuitka\n\n9\n1\n");
        let options = ["Nuitka (native)", "PyInstaller"];
        assert_eq!(p.choice("Backend", &options, 0, "").unwrap(), 1);
        assert_eq!(p.choice("Backend", &options, 1, "").unwrap(), 0);
        assert_eq!(p.choice("Backend", &options, 1, "").unwrap(), 1);
        assert_eq!(p.choice("Backend", &options, 1, "").unwrap(), 0);
    }

    #[test]
    fn integer_enforces_minimum() {
        let mut p = prompter("0\nabc\n6\n");
        assert_eq!(p.integer("Jobs", 4, 1, "").unwrap(), 6);
        assert_eq!(transcript(p).matches("at least 1").count(), 2);
    }

    #[test]
    fn list_splits_and_trims() {
        let mut p = prompter(" numpy , ,pandas\n");
        assert_eq!(p.list("Exclude", "").unwrap(), vec!["numpy", "pandas"]);
    }

    #[test]
    fn end_of_input_cancels() {
        let mut p = prompter("");
        assert!(matches!(p.confirm("Go", true, ""), Err(Error::Cancelled)));
    }

    #[test]
    fn confirm_rejects_other_answers() {
        let mut p = prompter("maybe\nn\n");
        assert!(!p.confirm("Go", true, "").unwrap());
    }
}
