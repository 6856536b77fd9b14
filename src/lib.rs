use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config as EditorConfig, Editor};

pub mod completer {
    #[allow(clippy::module_inception)]
    mod completer;
    pub use completer::*;
}

pub mod config {
    #[allow(clippy::module_inception)]
    mod config;
    pub use config::*;
}

pub mod fetcher {
    #[allow(clippy::module_inception)]
    mod fetcher;
    pub use fetcher::*;
}

pub mod history {
    #[allow(clippy::module_inception)]
    mod history;
    pub use history::*;
}

pub mod output {
    #[allow(clippy::module_inception)]
    mod output;
    pub use output::*;
}

pub mod parser {
    #[allow(clippy::module_inception)]
    mod parser;
    pub use parser::*;
}

pub mod presenter {
    #[allow(clippy::module_inception)]
    mod presenter;
    pub use presenter::*;
}

use completer::CommandCompleter;
use config::Config;
use fetcher::GeminiFetcher;
use output::OutputStreams;
use parser::parse_line;
use presenter::{Flow, Presenter};

const PROMPT: &str = "> ";

pub fn run(config: Config) -> Result<()> {
    if config.usable_api_key().is_none() {
        log::warn!("GEMINI_API_KEY is not set; prompts will fail until it is configured");
    }

    let fetcher = GeminiFetcher::new(&config).context("cannot create HTTP client")?;
    let mut presenter = Presenter::new(fetcher, OutputStreams::default(), &config);

    let editor_config = EditorConfig::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl: Editor<CommandCompleter, DefaultHistory> = Editor::with_config(editor_config)?;
    rl.set_helper(Some(CommandCompleter::new()));

    presenter.render();

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        if !line.trim().is_empty() {
            let _ = rl.add_history_entry(line.as_str());
        }

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                presenter.error(&e.to_string());
                continue;
            }
        };

        match presenter.execute(command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => presenter.error(&e.to_string()),
        }
    }

    Ok(())
}
