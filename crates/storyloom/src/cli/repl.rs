//! Parsing REPL input lines.

use std::path::PathBuf;
use storyloom::CursorSelection;

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text: send a turn
    Submit(String),
    /// `/undo`
    Undo,
    /// `/script`
    Script,
    /// `/assets`
    Assets,
    /// `/resolve NAME`: drop a discovered suggestion once handled
    Resolve(String),
    /// `/cursor START [END]`, or `/cursor` alone to clear
    Cursor(Option<CursorSelection>),
    /// `/save PATH`
    Save(PathBuf),
    /// `/analysis`
    Analysis,
    /// `/help`
    Help,
    /// `/quit` or `/exit`
    Quit,
    /// Blank line
    Empty,
    /// Unrecognized or malformed command, with a usage hint
    Invalid(String),
}

pub const HELP: &str = "\
Type a message to talk to the co-pilot. Commands:
  /undo               undo the last co-pilot edit
  /script             print the script
  /assets             list suggested assets
  /resolve NAME       mark a suggested asset as handled
  /cursor START [END] set the selection (character offsets); /cursor alone clears it
  /save PATH          write the script to a file
  /analysis           show the latest narrative analysis
  /help               show this help
  /quit               leave";

impl ReplCommand {
    /// Parse one input line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return ReplCommand::Submit(line.to_string());
        };

        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        match name {
            "undo" => ReplCommand::Undo,
            "script" => ReplCommand::Script,
            "assets" => ReplCommand::Assets,
            "analysis" => ReplCommand::Analysis,
            "help" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            "resolve" if !rest.is_empty() => ReplCommand::Resolve(rest.to_string()),
            "resolve" => ReplCommand::Invalid("usage: /resolve NAME".to_string()),
            "save" if !rest.is_empty() => ReplCommand::Save(PathBuf::from(rest)),
            "save" => ReplCommand::Invalid("usage: /save PATH".to_string()),
            "cursor" => parse_cursor(rest),
            other => ReplCommand::Invalid(format!("unknown command /{other}; try /help")),
        }
    }
}

fn parse_cursor(args: &str) -> ReplCommand {
    let offsets: Result<Vec<usize>, _> = args.split_whitespace().map(str::parse).collect();
    match offsets.as_deref() {
        Ok([]) => ReplCommand::Cursor(None),
        Ok([at]) => ReplCommand::Cursor(Some(CursorSelection::caret(*at))),
        Ok([start, end]) => ReplCommand::Cursor(Some(CursorSelection::new(*start, *end))),
        _ => ReplCommand::Invalid("usage: /cursor START [END]".to_string()),
    }
}
