//! Plain-text renderer

use std::io::Write;

use transit_core::{Renderer, Screen};

pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write a shell message outside of any screen
    pub fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, screen: &Screen) -> std::io::Result<()> {
        match screen {
            Screen::Home { .. } => writeln!(self.out, "==== Home ====")?,
            Screen::Form { five, .. } => writeln!(self.out, "==== Form (five = {:?}) ====", five)?,
        }

        for (i, intent) in screen.intents().iter().enumerate() {
            writeln!(self.out, "[{}] {}", i + 1, intent.label())?;
        }

        writeln!(self.out, "{}", screen.count_line())?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, screen: &Screen) {
        if let Err(e) = self.draw(screen) {
            tracing::warn!("Failed to render screen: {}", e);
        }
    }
}
