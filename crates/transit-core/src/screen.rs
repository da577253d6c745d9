//! Screens and user intents
//!
//! A screen is plain data for the rendering collaborator: what to show and
//! which intents the user may trigger. Rendering never mutates state; it
//! hands intents back to [`crate::App`].

use serde::{Deserialize, Serialize};

use transit_navigation::Frame;
use transit_routes::RouteId;
use transit_state::CounterHolder;

/// Value carried by the Home screen's second button
const FORM_SHORTCUT_VALUE: &str = "12";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Intent {
    /// Bump the current screen's counter
    Increment,
    /// Open the Form with its default arguments
    OpenForm,
    /// Open the Form with `five` bound to the given value
    OpenFormFor(String),
    OpenHome,
    /// System back
    Back,
    /// Follow a deep link or in-app path
    OpenUri(String),
}

impl Intent {
    /// Button label
    pub fn label(&self) -> String {
        match self {
            Intent::Increment => "Increment count".to_string(),
            Intent::OpenForm => "Go to Form".to_string(),
            Intent::OpenFormFor(value) => format!("Go to Form {}", value),
            Intent::OpenHome => "Go Home".to_string(),
            Intent::Back => "Back".to_string(),
            Intent::OpenUri(uri) => format!("Open {}", uri),
        }
    }

    /// Intents the platform can raise on any screen
    pub fn is_global(&self) -> bool {
        matches!(self, Intent::Back | Intent::OpenUri(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "lowercase")]
pub enum Screen {
    Home { count: u64 },
    Form { five: String, count: u64 },
}

impl Screen {
    pub fn route(&self) -> RouteId {
        match self {
            Screen::Home { .. } => RouteId::Home,
            Screen::Form { .. } => RouteId::Form,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            Screen::Home { count } | Screen::Form { count, .. } => *count,
        }
    }

    /// Buttons offered by this screen, in display order
    pub fn intents(&self) -> Vec<Intent> {
        match self {
            Screen::Home { .. } => vec![
                Intent::OpenForm,
                Intent::OpenFormFor(FORM_SHORTCUT_VALUE.to_string()),
                Intent::Increment,
            ],
            Screen::Form { .. } => vec![Intent::OpenHome],
        }
    }

    /// Whether the user can raise `intent` here. Home's Form shortcut takes any value.
    pub fn offers(&self, intent: &Intent) -> bool {
        if intent.is_global() {
            return true;
        }

        match (self, intent) {
            (Screen::Home { .. }, Intent::OpenFormFor(_)) => true,
            _ => self.intents().contains(intent),
        }
    }

    /// Status line under the buttons
    pub fn count_line(&self) -> String {
        match self {
            Screen::Home { count } => format!("Count is: {}", count),
            Screen::Form { count, .. } => format!("The Count is: {}", count),
        }
    }
}

/// Build the screen for the current frame
pub fn screen_for(frame: &Frame, holder: &CounterHolder) -> Screen {
    match frame.route {
        RouteId::Home => home_screen(holder),
        RouteId::Form => form_screen(frame, holder),
    }
}

fn home_screen(holder: &CounterHolder) -> Screen {
    tracing::trace!("Home screen");
    Screen::Home {
        count: holder.value(),
    }
}

fn form_screen(frame: &Frame, holder: &CounterHolder) -> Screen {
    tracing::trace!("Form screen");
    Screen::Form {
        five: frame.args.get("five").unwrap_or_default().to_string(),
        count: holder.value(),
    }
}

/// Presentation layer. Implementations draw the screen and nothing else.
pub trait Renderer {
    fn render(&mut self, screen: &Screen);
}

/// Keeps every rendered screen, for tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub screens: Vec<Screen>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Screen> {
        self.screens.last()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, screen: &Screen) {
        self.screens.push(screen.clone());
    }
}
