//! Application coordinator
//!
//! Every state change happens on the caller's thread, one intent at a time.
//! A transition and the holder work it triggers finish before the next
//! intent is looked at.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use transit_navigation::{NavController, NavigationError};
use transit_routes::{RouteArgs, RouteError, RouteId, RouteTable};
use transit_state::{CounterHolder, SubscriptionId};

use crate::config::Config;
use crate::screen::{screen_for, Intent, Renderer, Screen};
use crate::Result;

/// Result of handling one intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Handled,
    /// Back was requested on the start frame; the shell decides whether to exit
    AtRoot,
    /// The link did not resolve; nothing changed
    NotFound(String),
    /// The current screen does not offer this intent
    Unavailable(Intent),
}

/// Where the app is, for display and JSON dumps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSnapshot {
    pub route: RouteId,
    pub args: RouteArgs,
    pub path: String,
    pub depth: usize,
    pub count: u64,
}

pub struct App<R: Renderer> {
    nav: NavController,
    renderer: R,
    queue: VecDeque<Intent>,
    /// Set by navigation and counter observers, cleared by each render
    dirty: Arc<AtomicBool>,
    /// Holder of the displayed screen and our subscription on it
    watched: Option<(CounterHolder, SubscriptionId)>,
    start_uri: Option<String>,
}

impl<R: Renderer> App<R> {
    pub fn new(config: &Config, renderer: R) -> Result<Self> {
        config.validate()?;

        let table = RouteTable::standard(&config.deep_link_scheme)?;

        let mut nav = NavController::new(table).with_holder_factory(RouteId::Form, || {
            let holder = CounterHolder::initialize(0);
            tracing::trace!(holder_id = %holder.holder_id(), "Form holder init");
            holder.increment();
            holder
        });

        nav.on_activate(RouteId::Form, |frame, holder| {
            tracing::trace!(
                five = frame.args.get("five").unwrap_or_default(),
                "Form activated"
            );
            holder.increment();
        });

        let dirty = Arc::new(AtomicBool::new(false));
        let dirty_on_nav = Arc::clone(&dirty);
        nav.subscribe(move |_| dirty_on_nav.store(true, Ordering::SeqCst));

        Ok(Self {
            nav,
            renderer,
            queue: VecDeque::new(),
            dirty,
            watched: None,
            start_uri: config.start_uri.clone(),
        })
    }

    /// Reset navigation to the start route and render it.
    ///
    /// A configured start link is queued and followed right away.
    pub fn start(&mut self) -> Result<Vec<Outcome>> {
        self.queue.clear();
        self.nav.start();
        self.refresh();

        if let Some(uri) = self.start_uri.clone() {
            self.enqueue(Intent::OpenUri(uri));
        }

        self.process_pending()
    }

    /// Queue an intent. Intents run strictly in the order they were queued.
    pub fn enqueue(&mut self, intent: Intent) {
        self.queue.push_back(intent);
    }

    /// Run every queued intent. Stops at the first error, leaving later
    /// intents queued.
    pub fn process_pending(&mut self) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::with_capacity(self.queue.len());

        while let Some(intent) = self.queue.pop_front() {
            let outcome = self.handle(intent)?;
            self.refresh();
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Queue one intent and run the queue; returns that intent's outcome
    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome> {
        self.enqueue(intent.clone());
        let outcome = self
            .process_pending()?
            .pop()
            .unwrap_or(Outcome::Unavailable(intent));
        Ok(outcome)
    }

    pub fn current_screen(&self) -> Option<Screen> {
        let frame = self.nav.current_frame()?;
        let holder = self.nav.current_holder()?;
        Some(screen_for(frame, &holder))
    }

    pub fn snapshot(&self) -> Option<AppSnapshot> {
        let frame = self.nav.current_frame()?;
        let holder = self.nav.current_holder()?;
        let path = self
            .nav
            .table()
            .build_path(frame.route, &frame.args)
            .unwrap_or_else(|_| frame.route.to_string());

        Some(AppSnapshot {
            route: frame.route,
            args: frame.args.clone(),
            path,
            depth: self.nav.depth(),
            count: holder.value(),
        })
    }

    /// Value of the application-scoped Home counter
    pub fn home_count(&self) -> Option<u64> {
        self.nav.app_holder(RouteId::Home).map(|h| h.value())
    }

    pub fn navigation(&self) -> &NavController {
        &self.nav
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(mut self) -> R {
        if let Some((holder, id)) = self.watched.take() {
            holder.unsubscribe(id);
        }
        self.renderer
    }

    fn handle(&mut self, intent: Intent) -> Result<Outcome> {
        if let Some(screen) = self.current_screen() {
            if !screen.offers(&intent) {
                tracing::debug!(intent = ?intent, route = %screen.route(), "Intent not offered");
                return Ok(Outcome::Unavailable(intent));
            }
        }

        tracing::debug!(intent = ?intent, "Handling intent");

        match intent {
            Intent::Increment => {
                let holder = self
                    .nav
                    .current_holder()
                    .ok_or(NavigationError::NotStarted)?;
                holder.increment();
            }
            Intent::OpenForm => {
                self.nav.navigate_to(RouteId::Form, RouteArgs::new())?;
            }
            Intent::OpenFormFor(value) => {
                self.nav
                    .navigate_to(RouteId::Form, RouteArgs::new().with("five", value))?;
            }
            Intent::OpenHome => {
                self.nav.navigate_to(RouteId::Home, RouteArgs::new())?;
            }
            Intent::Back => {
                if !self.nav.navigate_back() {
                    return Ok(Outcome::AtRoot);
                }
            }
            Intent::OpenUri(uri) => match self.nav.navigate_to_uri(&uri) {
                Ok(_) => {}
                Err(NavigationError::Route(RouteError::NotFound(_))) => {
                    return Ok(Outcome::NotFound(uri));
                }
                Err(e) => return Err(e.into()),
            },
        }

        Ok(Outcome::Handled)
    }

    /// Follow the current screen's holder and render if anything changed
    fn refresh(&mut self) {
        self.watch_current_holder();

        if self.dirty.swap(false, Ordering::SeqCst) {
            if let Some(screen) = self.current_screen() {
                self.renderer.render(&screen);
            }
        }
    }

    fn watch_current_holder(&mut self) {
        let Some(current) = self.nav.current_holder() else {
            return;
        };

        if let Some((holder, _)) = &self.watched {
            if holder.same_holder(&current) {
                return;
            }
        }

        if let Some((holder, id)) = self.watched.take() {
            holder.unsubscribe(id);
        }

        let dirty = Arc::clone(&self.dirty);
        let id = current.subscribe(move |_| dirty.store(true, Ordering::SeqCst));
        self.watched = Some((current, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::RecordingRenderer;

    fn app() -> App<RecordingRenderer> {
        let mut app = App::new(&Config::default(), RecordingRenderer::new()).unwrap();
        app.start().unwrap();
        app
    }

    #[test]
    fn test_start_renders_home() {
        let app = app();
        assert_eq!(app.renderer().screens, vec![Screen::Home { count: 0 }]);
        assert_eq!(app.home_count(), Some(0));

        let snapshot = app.snapshot().unwrap();
        assert_eq!(snapshot.route, RouteId::Home);
        assert!(snapshot.args.is_empty());
        assert_eq!(snapshot.path, "home");
        assert_eq!(snapshot.depth, 1);
    }

    #[test]
    fn test_form_excursion() {
        let mut app = app();
        app.dispatch(Intent::Increment).unwrap();
        assert_eq!(app.home_count(), Some(1));

        let outcome = app
            .dispatch(Intent::OpenFormFor("12".to_string()))
            .unwrap();
        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(
            app.current_screen(),
            Some(Screen::Form {
                five: "12".to_string(),
                count: 2
            })
        );

        assert_eq!(app.dispatch(Intent::Back).unwrap(), Outcome::Handled);
        assert_eq!(app.current_screen(), Some(Screen::Home { count: 1 }));
        assert_eq!(app.home_count(), Some(1));
        assert_eq!(app.dispatch(Intent::Back).unwrap(), Outcome::AtRoot);
    }

    #[test]
    fn test_one_render_per_intent() {
        let mut app = app();
        app.dispatch(Intent::Increment).unwrap();
        app.dispatch(Intent::OpenForm).unwrap();
        app.dispatch(Intent::OpenHome).unwrap();
        app.dispatch(Intent::Increment).unwrap();

        assert_eq!(
            app.renderer().screens,
            vec![
                Screen::Home { count: 0 },
                Screen::Home { count: 1 },
                Screen::Form {
                    five: String::new(),
                    count: 2
                },
                Screen::Home { count: 1 },
                Screen::Home { count: 2 },
            ]
        );
    }

    #[test]
    fn test_no_render_without_change() {
        let mut app = app();
        let before = app.renderer().screens.len();

        assert_eq!(app.dispatch(Intent::Back).unwrap(), Outcome::AtRoot);
        assert_eq!(
            app.dispatch(Intent::OpenUri("testing://nowhere".to_string()))
                .unwrap(),
            Outcome::NotFound("testing://nowhere".to_string())
        );
        assert_eq!(app.renderer().screens.len(), before);
        assert_eq!(app.navigation().depth(), 1);
    }

    #[test]
    fn test_unavailable_intent() {
        let mut app = app();
        app.dispatch(Intent::OpenForm).unwrap();

        let outcome = app.dispatch(Intent::Increment).unwrap();
        assert_eq!(outcome, Outcome::Unavailable(Intent::Increment));
        assert_eq!(app.current_screen().unwrap().count(), 2);
    }

    #[test]
    fn test_deep_links() {
        let mut app = app();

        app.dispatch(Intent::OpenUri("testing://one?two=x&five=9".to_string()))
            .unwrap();
        let first = app.snapshot().unwrap();

        app.dispatch(Intent::OpenUri("testing://three?four=y&five=9".to_string()))
            .unwrap();
        let second = app.snapshot().unwrap();

        assert_eq!(first.route, RouteId::Form);
        assert_eq!(first.args, second.args);
        assert_eq!(second.path, "form?five=9");
        assert_eq!(second.count, 2);
        assert_eq!(second.depth, 3);
    }

    #[test]
    fn test_queue_runs_in_order() {
        let mut app = app();
        app.enqueue(Intent::OpenForm);
        app.enqueue(Intent::OpenHome);
        app.enqueue(Intent::Increment);
        app.enqueue(Intent::Back);

        let outcomes = app.process_pending().unwrap();
        assert_eq!(outcomes, vec![Outcome::Handled; 4]);
        assert_eq!(app.snapshot().unwrap().route, RouteId::Form);
        assert_eq!(app.home_count(), Some(1));
    }

    #[test]
    fn test_start_uri() {
        let config = Config {
            start_uri: Some("testing://three?four=1&five=5".to_string()),
            ..Config::default()
        };
        let mut app = App::new(&config, RecordingRenderer::new()).unwrap();
        let outcomes = app.start().unwrap();

        assert_eq!(outcomes, vec![Outcome::Handled]);
        assert_eq!(app.navigation().depth(), 2);
        assert_eq!(
            app.renderer().last(),
            Some(&Screen::Form {
                five: "5".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn test_custom_scheme() {
        let config = Config {
            deep_link_scheme: "myapp".to_string(),
            ..Config::default()
        };
        let mut app = App::new(&config, RecordingRenderer::new()).unwrap();
        app.start().unwrap();

        assert_eq!(
            app.dispatch(Intent::OpenUri("myapp://one?five=1".to_string()))
                .unwrap(),
            Outcome::Handled
        );
        assert_eq!(
            app.dispatch(Intent::OpenUri("testing://one?five=1".to_string()))
                .unwrap(),
            Outcome::NotFound("testing://one?five=1".to_string())
        );
    }
}
