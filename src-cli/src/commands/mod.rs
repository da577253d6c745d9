//! Shell commands
//!
//! Each input line maps to one intent or a shell-only action:
//! - `form`, `form <value>`, `home`, `inc`, `back`, `open <uri>` raise intents
//! - A bare number presses that button on the current screen
//! - `where [--json]`, `help`, `quit` never touch navigation

use transit_core::Intent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Intent(Intent),
    /// Press the n-th button (1-based) of the current screen
    Press(usize),
    Where { json: bool },
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Returns `None` for unknown or malformed commands.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let mut parts = input.splitn(2, ' ');
        let command = parts.next()?.to_lowercase();
        let rest = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if let Ok(index) = command.parse::<usize>() {
            return (index > 0 && rest.is_none()).then_some(ShellCommand::Press(index));
        }

        let parsed = match (command.as_str(), rest) {
            ("form" | "f", None) => ShellCommand::Intent(Intent::OpenForm),
            ("form" | "f", Some(value)) => ShellCommand::Intent(Intent::OpenFormFor(value)),
            ("home", None) => ShellCommand::Intent(Intent::OpenHome),
            ("inc" | "increment" | "+", None) => ShellCommand::Intent(Intent::Increment),
            ("back" | "b", None) => ShellCommand::Intent(Intent::Back),
            ("open" | "o", Some(uri)) => ShellCommand::Intent(Intent::OpenUri(uri)),
            ("where" | "w", None) => ShellCommand::Where { json: false },
            ("where" | "w", Some(flag)) if flag == "--json" => ShellCommand::Where { json: true },
            ("help" | "h" | "?", None) => ShellCommand::Help,
            ("quit" | "exit" | "q", None) => ShellCommand::Quit,
            _ => return None,
        };

        Some(parsed)
    }
}

pub const HELP: &str = "\
Commands:
  <n>            press button n on the current screen
  form [value]   open the Form, optionally binding `five`
  home           open Home
  inc            increment the current counter
  back           go back (exits at the start screen)
  open <uri>     follow a deep link or in-app path
  where [--json] show the current location
  quit           exit";
