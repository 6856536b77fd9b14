use anyhow::{Result, anyhow};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};

pub const COMMAND_PREFIX: char = ':';

#[derive(Debug, Clone, Copy, EnumString, EnumIter, PartialEq)]
pub enum CommandKind {
    #[strum(serialize = "prev", serialize = "p")]
    Prev,
    #[strum(serialize = "next", serialize = "n")]
    Next,
    #[strum(serialize = "jump", serialize = "j")]
    Jump,
    #[strum(serialize = "history", serialize = "h")]
    History,
    #[strum(serialize = "show", serialize = "s")]
    Show,
    #[strum(serialize = "help")]
    Help,
    #[strum(serialize = "exit", serialize = "quit", serialize = "q")]
    Exit,
}

impl CommandKind {
    pub fn name(&self) -> String {
        format!("{:?}", self).to_lowercase()
    }

    pub fn usage(&self) -> &'static str {
        match self {
            CommandKind::Prev => ":prev, :p        show the previous prompt",
            CommandKind::Next => ":next, :n        show the next prompt",
            CommandKind::Jump => ":jump N, :j N    show prompt number N",
            CommandKind::History => ":history, :h     list all prompts",
            CommandKind::Show => ":show, :s        show the current prompt again",
            CommandKind::Help => ":help            show this help",
            CommandKind::Exit => ":exit, :quit, :q leave",
        }
    }
}

/// Full `:`-prefixed names of every command, for completion.
pub fn command_names() -> Vec<String> {
    CommandKind::iter()
        .map(|k| format!("{}{}", COMMAND_PREFIX, k.name()))
        .collect()
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Ask(String),
    Prev,
    Next,
    /// 1-based, as shown to the user.
    Jump(usize),
    History,
    Show,
    Help,
    Exit,
}

/// Parses one input line. Blank lines give `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    match line.strip_prefix(COMMAND_PREFIX) {
        Some(rest) => parse_command(rest).map(Some),
        None => Ok(Some(Command::Ask(line.to_string()))),
    }
}

fn parse_command(input: &str) -> Result<Command> {
    let parts: Vec<&str> = input.split_ascii_whitespace().collect();
    let (name, args) = parts
        .split_first()
        .ok_or_else(|| anyhow!("Empty command"))?;

    let kind = name
        .parse::<CommandKind>()
        .map_err(|_| anyhow!("{}{}: unknown command", COMMAND_PREFIX, name))?;

    let command = match kind {
        CommandKind::Jump => return parse_jump(args),
        CommandKind::Prev => Command::Prev,
        CommandKind::Next => Command::Next,
        CommandKind::History => Command::History,
        CommandKind::Show => Command::Show,
        CommandKind::Help => Command::Help,
        CommandKind::Exit => Command::Exit,
    };

    if !args.is_empty() {
        return Err(anyhow!(
            "{}{}: unexpected argument '{}'",
            COMMAND_PREFIX,
            name,
            args.join(" ")
        ));
    }

    Ok(command)
}

fn parse_jump(args: &[&str]) -> Result<Command> {
    match args {
        [position] => {
            let position = position
                .parse::<usize>()
                .map_err(|_| anyhow!(":jump: '{}' is not a prompt number", position))?;
            if position == 0 {
                return Err(anyhow!(":jump: prompt numbers start at 1"));
            }
            Ok(Command::Jump(position))
        }
        [] => Err(anyhow!(":jump: prompt number missing")),
        _ => Err(anyhow!(":jump: expected a single prompt number")),
    }
}
