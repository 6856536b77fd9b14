use anyhow::Result;
use log::debug;
use strum::IntoEnumIterator;

use crate::config::Config;
use crate::fetcher::ResponseFetcher;
use crate::history::{Entry, HistoryStore};
use crate::output::OutputStreams;
use crate::parser::{Command, CommandKind};

#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Drives the prompt history from user commands and renders it.
pub struct Presenter<F: ResponseFetcher> {
    store: HistoryStore,
    fetcher: F,
    streams: OutputStreams,
    prompt_preview_len: usize,
    response_preview_len: usize,
}

impl<F: ResponseFetcher> Presenter<F> {
    pub fn new(fetcher: F, streams: OutputStreams, config: &Config) -> Self {
        Self {
            store: HistoryStore::new(),
            fetcher,
            streams,
            prompt_preview_len: config.prompt_preview_len,
            response_preview_len: config.response_preview_len,
        }
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        debug!("execute {:?}", command);

        match command {
            Command::Ask(prompt) => self.ask(&prompt),
            Command::Prev => {
                if self.store.step_prev() {
                    self.render();
                } else {
                    self.error("Already at the first prompt");
                }
            }
            Command::Next => {
                if self.store.step_next() {
                    self.render();
                } else {
                    self.error("Already at the latest prompt");
                }
            }
            Command::Jump(position) => {
                if position
                    .checked_sub(1)
                    .is_some_and(|index| self.store.jump_to(index))
                {
                    self.render();
                } else {
                    self.error(&format!(
                        "No prompt {} (history has {})",
                        position,
                        self.store.size()
                    ));
                }
            }
            Command::History => self.render_history(),
            Command::Show => self.render(),
            Command::Help => self.render_help(),
            Command::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    fn ask(&mut self, prompt: &str) {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            self.error("Please enter a prompt!");
            return;
        }

        self.streams.stdout.print("Generating...");
        match self.fetcher.fetch(prompt) {
            Ok(response) => {
                self.store.append(prompt, response);
                self.render();
            }
            Err(e) => self.error(&format!("Error: {e}")),
        }
    }

    /// Draws the current entry, the counter and the navigation state.
    pub fn render(&mut self) {
        let counter = format!(
            "Prompt {} of {}",
            self.store.current_index().map_or(0, |i| i + 1),
            self.store.size()
        );

        let body = match self.store.current() {
            Some(entry) => format!("Q: {}\nA: {}", entry.request(), entry.response()),
            None => "No prompt selected\nEnter a prompt to see the AI's response!".to_string(),
        };

        let nav = format!(
            "[{}] [{}]",
            if self.store.has_prev() { "< prev" } else { "  -   " },
            if self.store.has_next() { "next >" } else { "  -   " },
        );

        self.streams
            .stdout
            .print(&format!("{}\n{}\n{}", counter, body, nav));
    }

    fn render_history(&mut self) {
        if self.store.is_empty() {
            self.streams.stdout.print("No prompts submitted yet");
            return;
        }

        let current = self.store.current_index();
        let lines: Vec<String> = self
            .store
            .all_entries()
            .iter()
            .map(|entry| self.history_line(entry, current == Some(entry.index())))
            .collect();

        self.streams.stdout.print(&lines.join("\n"));
    }

    fn history_line(&self, entry: &Entry, active: bool) -> String {
        format!(
            "{} {:>3}. {}\n       {}",
            if active { "*" } else { " " },
            entry.index() + 1,
            preview(entry.request(), self.prompt_preview_len),
            preview(entry.response(), self.response_preview_len),
        )
    }

    fn render_help(&mut self) {
        let mut lines = vec!["Type a prompt and press Enter to ask.".to_string()];
        lines.extend(CommandKind::iter().map(|k| format!("  {}", k.usage())));
        self.streams.stdout.print(&lines.join("\n"));
    }

    /// Shows a failure to the user on the error stream.
    pub fn error(&mut self, message: &str) {
        self.streams.stderr.print(message);
    }
}

/// First `limit` characters of `text`, with `...` if anything was cut.
fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
