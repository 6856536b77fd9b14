use rustyline::{
    Helper, completion::{Completer, Pair}, highlight::Highlighter, hint::Hinter, validate::Validator
};

use crate::parser::{COMMAND_PREFIX, command_names};

/// Completes and hints `:command` names. Prompts are left alone.
pub struct CommandCompleter {
    commands: Vec<String>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            commands: command_names(),
        }
    }

    /// The command word being typed, if the cursor is inside one.
    fn command_word<'a>(&self, line: &'a str, pos: usize) -> Option<&'a str> {
        let word = &line[..pos];
        if word.starts_with(COMMAND_PREFIX) && !word.contains(char::is_whitespace) {
            Some(word)
        } else {
            None
        }
    }

    fn matches<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.commands.iter().filter(move |cmd| cmd.starts_with(word))
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let Some(word) = self.command_word(line, pos) else {
            return Ok((pos, Vec::new()));
        };

        let matches: Vec<Pair> = self
            .matches(word)
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }

        let word = self.command_word(line, pos)?;
        if word.len() <= 1 {
            return None;
        }

        self.matches(word)
            .find(|cmd| cmd.len() > word.len())
            .map(|cmd| cmd[word.len()..].to_string())
    }
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}
