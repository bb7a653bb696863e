use crate::error::SetupResult;
use dialoguer::{theme::ColorfulTheme, Input};
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

/// The only answer treated as "yes". Anything else, `S` and `si` included, is "no".
pub const YES: &str = "s";

pub fn is_affirmative(answer: &str) -> bool {
    answer.trim() == YES
}

/// Source of the answers that gate each step
pub trait Prompter {
    /// Ask a free-form question and return the trimmed answer
    fn ask(&mut self, prompt: &str) -> SetupResult<String>;

    /// Ask a yes/no question using the `(s/n)` convention
    fn confirm(&mut self, prompt: &str) -> SetupResult<bool> {
        let answer = self.ask(&format!("{} (s/n)", prompt))?;
        Ok(is_affirmative(&answer))
    }

    /// Wait for the user to press Enter
    fn pause(&mut self, prompt: &str) -> SetupResult<()> {
        self.ask(prompt).map(|_| ())
    }
}

/// Reads answers from the terminal.
///
/// On a TTY the prompt is rendered by `dialoguer`; when stdin is piped it falls
/// back to reading plain lines so answers can be scripted from a shell.
pub struct InteractivePrompter {
    theme: ColorfulTheme,
}

impl InteractivePrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn ask_plain(&self, prompt: &str) -> SetupResult<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}: ", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        // EOF reads as an empty answer
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

impl Default for InteractivePrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for InteractivePrompter {
    fn ask(&mut self, prompt: &str) -> SetupResult<String> {
        if !io::stdin().is_terminal() {
            return self.ask_plain(prompt);
        }

        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim().to_string())
    }
}

/// Replays fixed answers in order and records every prompt it was shown.
/// Once the answers run out every further question gets an empty answer.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> SetupResult<String> {
        self.asked.push(prompt.to_string());
        Ok(self
            .answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .unwrap_or_default())
    }
}
