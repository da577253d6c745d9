//! Shell state
use std::io::Write;

use transit_core::{App, Config, Outcome, Result};

use crate::commands::{ShellCommand, HELP};
use crate::render::TerminalRenderer;

/// Whether the shell keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct ShellState<W: Write> {
    app: App<TerminalRenderer<W>>,
}

impl<W: Write> ShellState<W> {
    pub fn new(config: &Config, out: W) -> Result<Self> {
        let app = App::new(config, TerminalRenderer::new(out))?;
        Ok(Self { app })
    }

    pub fn start(&mut self) -> Result<Flow> {
        let outcomes = self.app.start()?;
        for outcome in outcomes {
            self.report(&outcome);
        }
        Ok(Flow::Continue)
    }

    /// Run one input line
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        let Some(command) = ShellCommand::parse(line) else {
            self.say(&format!("Unknown command: {} (try `help`)", line.trim()));
            return Ok(Flow::Continue);
        };

        match command {
            ShellCommand::Intent(intent) => {
                let outcome = self.app.dispatch(intent)?;
                Ok(self.report(&outcome))
            }
            ShellCommand::Press(index) => {
                let intent = self
                    .app
                    .current_screen()
                    .and_then(|screen| screen.intents().get(index - 1).cloned());

                match intent {
                    Some(intent) => {
                        let outcome = self.app.dispatch(intent)?;
                        Ok(self.report(&outcome))
                    }
                    None => {
                        self.say(&format!("No button {}", index));
                        Ok(Flow::Continue)
                    }
                }
            }
            ShellCommand::Where { json } => {
                if let Some(snapshot) = self.app.snapshot() {
                    let line = if json {
                        serde_json::to_string(&snapshot)?
                    } else {
                        format!(
                            "{} (depth {}, count {})",
                            snapshot.path, snapshot.depth, snapshot.count
                        )
                    };
                    self.say(&line);
                }
                Ok(Flow::Continue)
            }
            ShellCommand::Help => {
                self.say(HELP);
                Ok(Flow::Continue)
            }
            ShellCommand::Quit => Ok(Flow::Exit),
        }
    }

    pub fn into_output(self) -> W {
        self.app.into_renderer().into_inner()
    }

    fn report(&mut self, outcome: &Outcome) -> Flow {
        match outcome {
            Outcome::Handled => Flow::Continue,
            Outcome::AtRoot => {
                self.say("Nothing to go back to, exiting");
                Flow::Exit
            }
            Outcome::NotFound(uri) => {
                self.say(&format!("No route for {}", uri));
                Flow::Continue
            }
            Outcome::Unavailable(intent) => {
                self.say(&format!("\"{}\" is not available here", intent.label()));
                Flow::Continue
            }
        }
    }

    fn say(&mut self, line: &str) {
        self.app.renderer_mut().write_line(line);
    }
}
