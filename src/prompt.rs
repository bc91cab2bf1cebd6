//! Interactive questions. Questions are written to any `Write` and answers are
//! read from any `BufRead`, so the whole dialogue can be driven from a test.
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::index::FileId;
use crate::partition::Policy;
use crate::styles::Palette;

/// An answer to a question, or the user's refusal to answer
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Answer<T> {
    /// A valid answer
    Chosen(T),
    /// A blank answer, `q`, or the end of input
    Declined,
}

/// The policies, in the order they are offered, with their descriptions.
pub const POLICY_MENU: [(Policy, &str); 3] = [
    (Policy::AddToAuthoritative, "add them to the preserved file and remove them from the others"),
    (Policy::LeaveUnchanged, "leave them where they are"),
    (Policy::RemoveFromAll, "remove them from every file"),
];

/// Reads answers from `input` and writes questions and reports to `out`.
pub struct Prompter<R, W> {
    input: R,
    out: W,
    palette: Palette,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Reports and questions on `out` are styled with `palette`.
    pub fn new(input: R, out: W, palette: Palette) -> Self {
        Prompter { input, out, palette }
    }

    /// How reports are to be styled
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Where reports go
    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Prints `question` and reads one line of input. Returns `None` at end of
    /// input, or when the answer is blank or `q`.
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.out, "{}", self.palette.title(question))?;
        self.out.flush()?;
        let mut answer = String::new();
        let read = self.input.read_line(&mut answer).context("Can't read answer")?;
        if read == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        let answer = answer.trim();
        if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        Ok(Some(answer.to_string()))
    }

    /// Asks for a number from 1 to `choices`, asking again until it gets one.
    fn ask_number(&mut self, question: &str, choices: usize) -> Result<Answer<usize>> {
        loop {
            let Some(answer) = self.ask(question)? else { return Ok(Answer::Declined) };
            match answer.parse::<usize>() {
                Ok(n) if (1..=choices).contains(&n) => return Ok(Answer::Chosen(n)),
                _ => writeln!(
                    self.out,
                    "{}",
                    self.palette.warning(format!("Please answer with a number from 1 to {choices}"))
                )?,
            }
        }
    }

    /// Asks which of `file_count` files is to be preserved.
    pub fn choose_file(&mut self, file_count: usize) -> Result<Answer<FileId>> {
        let question = format!("Number of the file to preserve (1-{file_count}, q to quit): ");
        Ok(match self.ask_number(&question, file_count)? {
            Answer::Chosen(n) => Answer::Chosen(n - 1),
            Answer::Declined => Answer::Declined,
        })
    }

    /// Asks what to do with duplicates the preserved file lacks.
    pub fn choose_policy(&mut self) -> Result<Answer<Policy>> {
        for (n, (_, description)) in POLICY_MENU.iter().enumerate() {
            writeln!(self.out, "  {}) {description}", self.palette.file(n + 1))?;
        }
        let question = format!("Your choice (1-{}, q to quit): ", POLICY_MENU.len());
        Ok(match self.ask_number(&question, POLICY_MENU.len())? {
            Answer::Chosen(n) => Answer::Chosen(POLICY_MENU[n - 1].0),
            Answer::Declined => Answer::Declined,
        })
    }

    /// Asks a yes/no question. Only `y` or `yes`, in any case, mean yes.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{question} [y/N] "))?;
        Ok(answer.map_or(false, |a| a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")))
    }
}
