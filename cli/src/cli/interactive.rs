// cli/src/cli/interactive.rs

// The interactive shell. Each line is split with shell quoting rules and
// parsed by the same clap tree as one-shot commands; the session lives in
// memory for the lifetime of the shell.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use log::warn;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io;
use std::path::PathBuf;

use crate::cli::cli::{dispatch, CliContext};
use crate::cli::commands::{CliArgs, Commands};
use crate::cli::help_display::{
    print_filtered_help_clap_generated, print_interactive_help, suggestions,
};
use crate::cli::render;

const PROMPT: &str = "hospital> ";
const HISTORY_FILE_NAME: &str = "history.txt";

/// A line of shell input, classified.
#[derive(Debug, PartialEq)]
pub enum CommandType {
    Run(Commands),
    Help(Option<String>),
    Clear,
    Exit,
    Empty,
    Invalid(String),
}

pub fn parse_command(input: &str) -> CommandType {
    let words = match shlex::split(input) {
        Some(words) => words,
        None => return CommandType::Invalid("Unbalanced quotes in input.".to_string()),
    };
    let Some(first) = words.first() else {
        return CommandType::Empty;
    };

    match first.to_lowercase().as_str() {
        "exit" | "quit" | "q" => return CommandType::Exit,
        "clear" | "clean" => return CommandType::Clear,
        "help" | "?" => {
            let filter = words[1..].join(" ");
            return CommandType::Help(if filter.is_empty() { None } else { Some(filter) });
        }
        _ => {}
    }

    let argv = std::iter::once("hospital-cli".to_string()).chain(words.iter().cloned());
    match CliArgs::try_parse_from(argv) {
        Ok(CliArgs { command: Some(Commands::Interactive), .. }) => {
            CommandType::Invalid("Already in interactive mode.".to_string())
        }
        Ok(CliArgs { command: Some(command), .. }) => CommandType::Run(command),
        Ok(CliArgs { command: None, .. }) => CommandType::Empty,
        Err(e) => {
            let close = suggestions(first);
            let known = close.iter().any(|s| s.split(' ').next() == Some(first.as_str()));
            if close.is_empty() || known {
                CommandType::Invalid(e.to_string())
            } else {
                let hint = format!("Unknown command '{}'. Did you mean '{}'?", first, close[0]);
                CommandType::Invalid(hint)
            }
        }
    }
}

fn history_path() -> Option<PathBuf> {
    rest_api::config::config_dir().map(|d| d.join(HISTORY_FILE_NAME))
}

pub fn clear_terminal_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}

fn print_welcome_screen(ctx: &CliContext) {
    println!("{}", "Hospital Portal".bold());
    if ctx.sandbox {
        println!("{}", "Sandbox backend: changes are lost when the shell exits.".yellow());
    }
    match &ctx.session {
        Some(session) => {
            println!("Signed in as {} ({}).", session.user.full_name(), session.role())
        }
        None => println!("Not signed in. Try 'doctor sign-in' or 'patient sign-in'."),
    }
    println!("Type 'help' for a list of commands, 'exit' to leave.");
}

pub async fn run_cli_interactive(ctx: &mut CliContext) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let history = history_path();
    if let Some(path) = &history {
        let _ = rl.load_history(path);
    }

    print_welcome_screen(ctx);

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Failed to read line: {}", e);
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        match parse_command(trimmed) {
            CommandType::Run(command) => {
                if let Err(e) = dispatch(ctx, command).await {
                    render::print_failure(&e);
                }
            }
            CommandType::Help(None) => print_interactive_help(),
            CommandType::Help(Some(filter)) => print_filtered_help_clap_generated(&filter)?,
            CommandType::Clear => clear_terminal_screen()?,
            CommandType::Exit => break,
            CommandType::Empty => {}
            CommandType::Invalid(message) => eprintln!("{}", message),
        }
    }

    if let Some(path) = &history {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Err(e) = rl.save_history(path) {
            warn!("Could not save shell history to {}: {}", path.display(), e);
        }
    }
    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{AdminArea, AdminRoomsAction, ProfileAction};
    use models::medical::ProfileField;

    #[test]
    fn shell_words_and_quotes() {
        match parse_command(r#"profile set address "3 Oak Lane""#) {
            CommandType::Run(Commands::Profile(w)) => assert_eq!(
                w.command,
                ProfileAction::Set { field: ProfileField::Address, value: "3 Oak Lane".into() }
            ),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(parse_command(r#"profile set name "open"#), CommandType::Invalid(_)));
    }

    #[test]
    fn builtins() {
        assert_eq!(parse_command("quit"), CommandType::Exit);
        assert_eq!(parse_command("CLEAR"), CommandType::Clear);
        assert_eq!(parse_command("help"), CommandType::Help(None));
        assert_eq!(
            parse_command("help admin rooms"),
            CommandType::Help(Some("admin rooms".into()))
        );
        assert_eq!(parse_command("   "), CommandType::Empty);
    }

    #[test]
    fn nested_admin_command() {
        match parse_command("admin rooms update room-101 --beds 6 --occupied 2") {
            CommandType::Run(Commands::Admin(w)) => match w.command {
                AdminArea::Rooms(r) => assert_eq!(
                    r.command,
                    AdminRoomsAction::Update { id: "room-101".into(), beds: 6, occupied: 2 }
                ),
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_nesting_and_typos() {
        assert_eq!(
            parse_command("interactive"),
            CommandType::Invalid("Already in interactive mode.".into())
        );
        match parse_command("apointments list") {
            CommandType::Invalid(message) => {
                assert!(message.contains("Did you mean 'appointments'"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
