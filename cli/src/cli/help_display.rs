// cli/src/cli/help_display.rs

// Help output for the interactive shell, built from the clap command tree.

use clap::{Command, CommandFactory};
use std::collections::HashSet;
use std::io;
use strsim::jaro_winkler;

use crate::cli::commands::CliArgs;

const SUGGESTION_THRESHOLD: f64 = 0.8;

pub fn print_help_clap_generated() -> io::Result<()> {
    CliArgs::command().print_help()
}

/// Every command path of the tree, e.g. "admin rooms add".
pub fn collect_command_paths(cmd: &Command, path: &mut Vec<String>, out: &mut HashSet<String>) {
    if !path.is_empty() {
        out.insert(path.join(" "));
    }
    for sub in cmd.get_subcommands() {
        path.push(sub.get_name().to_string());
        collect_command_paths(sub, path, out);
        path.pop();
    }
}

fn find_nested_subcommand_mut<'a>(
    cmd: &'a mut Command,
    segments: &[&str],
) -> Option<&'a mut Command> {
    let mut current = cmd;
    for segment in segments {
        current = current.find_subcommand_mut(segment)?;
    }
    Some(current)
}

/// Known command paths closest to `input`, best first.
pub fn suggestions(input: &str) -> Vec<String> {
    let mut paths = HashSet::new();
    collect_command_paths(&CliArgs::command(), &mut Vec::new(), &mut paths);
    let wanted = input.to_lowercase();
    let mut scored: Vec<(String, f64)> = paths
        .into_iter()
        .map(|p| {
            let score = jaro_winkler(&wanted, &p);
            (p, score)
        })
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(5).map(|(p, _)| p).collect()
}

/// Help for one command path, or suggestions when it does not exist.
pub fn print_filtered_help_clap_generated(filter: &str) -> io::Result<()> {
    let segments: Vec<&str> = filter.split_whitespace().collect();
    let mut root = CliArgs::command();
    if let Some(cmd) = find_nested_subcommand_mut(&mut root, &segments) {
        return cmd.print_help();
    }
    let close = suggestions(filter);
    if close.is_empty() {
        println!("No help found for '{}'.", filter);
        return print_help_clap_generated();
    }
    println!("No help found for '{}'. Did you mean one of these?", filter);
    for suggestion in close {
        println!("  {}", suggestion);
    }
    Ok(())
}

pub fn print_interactive_help() {
    println!("\nHospital CLI Commands:");
    println!("  doctor sign-in -e <email> -p <password>      - Sign in as doctor, staff or admin");
    println!("  patient sign-in -e <email> -p <password>     - Sign in as patient");
    println!("  doctor|patient sign-up --name .. --confirm .. - Create an account");
    println!("  sign-out | whoami                            - End or show the session");
    println!("  doctors                                      - Doctors available for booking");
    println!("  appointments list [--confirmed]              - Bookings or requests to handle");
    println!("  appointments book --doctor <id> --date <d> --time <t> --reason <text>");
    println!("  appointments confirm <id>                    - Confirm a request");
    println!("  records create <appointment> --prescription .. --invoice ..");
    println!("  records hospitalize <appointment> --room <id> --beds <n>");
    println!("                      --arrival <d> --departure <d>");
    println!("  rooms                                        - Rooms and free beds");
    println!("  availability add --day <day> --shift <shift> - Declare a shift (staff)");
    println!("  availability list                            - Your declared shifts");
    println!("  profile show | profile set <field> <value>   - View or edit your profile");
    println!("  diagnostics tools | upload <file>            - Diagnostic assistants (patients)");
    println!("  admin rooms|doctors|availability|records ... - Administration panels");
    println!("  config show | config url [service]           - Service configuration");
    println!("  clear | clean                                - Clear the terminal screen");
    println!("  help [command]                               - This help, or one command's");
    println!("  exit | quit | q                              - Leave the shell");
}
