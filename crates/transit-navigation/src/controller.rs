//! Navigation controller
//!
//! Holds the back stack and the scoped state-holder registry. Frame-scoped
//! holders are keyed by [`FrameId`] and dropped with their frame;
//! application-scoped holders are keyed by [`RouteId`] and live as long as
//! the controller.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

use transit_routes::{RouteArgs, RouteId, RouteTable, StateScope};
use transit_state::CounterHolder;

use crate::error::NavigationError;
use crate::frame::{Frame, FrameId};
use crate::Result;

type HolderFactory = Box<dyn Fn() -> CounterHolder + Send + Sync>;
type ActivationHook = Box<dyn Fn(&Frame, &CounterHolder) + Send + Sync>;
type Listener = Box<dyn Fn(&Transition) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavEvent {
    /// Stack reset to the start frame
    Started,
    /// A frame was pushed and is now current
    Pushed,
    /// The top frame was popped; the one below is current again
    Popped,
}

/// What changed, handed to listeners after every transition
#[derive(Debug, Clone)]
pub struct Transition {
    pub event: NavEvent,
    /// The frame that is now current
    pub frame: Frame,
    /// State holder for the current frame
    pub holder: CounterHolder,
    /// True when `frame` was just created rather than returned to
    pub fresh_frame: bool,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct NavController {
    table: RouteTable,
    /// Bottom to top; the last frame is current
    stack: Vec<Frame>,
    frame_holders: HashMap<FrameId, CounterHolder>,
    app_holders: HashMap<RouteId, CounterHolder>,
    factories: HashMap<RouteId, HolderFactory>,
    activation_hooks: HashMap<RouteId, Vec<ActivationHook>>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl NavController {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            stack: Vec::new(),
            frame_holders: HashMap::new(),
            app_holders: HashMap::new(),
            factories: HashMap::new(),
            activation_hooks: HashMap::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Set how holders for `route` are created. Routes without a factory
    /// start at zero.
    pub fn with_holder_factory<F>(mut self, route: RouteId, factory: F) -> Self
    where
        F: Fn() -> CounterHolder + Send + Sync + 'static,
    {
        self.factories.insert(route, Box::new(factory));
        self
    }

    /// Run `hook` exactly once each time a frame of `route` is freshly pushed.
    ///
    /// Returning to an existing frame with `navigate_back` does not re-run it.
    pub fn on_activate<F>(&mut self, route: RouteId, hook: F)
    where
        F: Fn(&Frame, &CounterHolder) + Send + Sync + 'static,
    {
        self.activation_hooks
            .entry(route)
            .or_default()
            .push(Box::new(hook));
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&Transition) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Reset the stack to a single start frame.
    ///
    /// Frame-scoped holders are dropped; application-scoped ones survive.
    pub fn start(&mut self) -> Transition {
        self.stack.clear();
        self.frame_holders.clear();

        let start = self.table.start();
        let args = self
            .table
            .with_defaults(start, RouteArgs::new())
            .unwrap_or_default();

        tracing::info!(route = %start, "Navigation started");

        self.push_frame(start, args, NavEvent::Started)
    }

    /// Push a frame for `route`. Explicit `args` override declared defaults.
    pub fn navigate_to(&mut self, route: RouteId, args: RouteArgs) -> Result<Transition> {
        if self.stack.is_empty() {
            return Err(NavigationError::NotStarted);
        }
        if !self.table.contains(route) {
            return Err(NavigationError::UnknownRoute(route));
        }

        let args = self.table.with_defaults(route, args)?;
        Ok(self.push_frame(route, args, NavEvent::Pushed))
    }

    /// Resolve a deep link or in-app path and push it.
    ///
    /// An unresolvable input leaves the stack untouched.
    pub fn navigate_to_uri(&mut self, input: &str) -> Result<Transition> {
        if self.stack.is_empty() {
            return Err(NavigationError::NotStarted);
        }

        let resolution = self.table.resolve(input).map_err(|e| {
            tracing::warn!(input = %input, "Ignoring unresolvable navigation target");
            e
        })?;

        Ok(self.push_frame(resolution.route, resolution.args, NavEvent::Pushed))
    }

    /// Pop the current frame. Returns false, changing nothing, when only the
    /// start frame remains.
    pub fn navigate_back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            tracing::debug!("Nothing to go back to");
            return false;
        }

        let Some(popped) = self.stack.pop() else {
            return false;
        };
        self.frame_holders.remove(&popped.id);

        let Some(frame) = self.stack.last().cloned() else {
            return false;
        };

        tracing::info!(
            popped = %popped.route,
            visible_ms = (Utc::now() - popped.created_at).num_milliseconds(),
            route = %frame.route,
            depth = self.stack.len(),
            "Navigated back"
        );

        let holder = self.holder_for_frame(&frame);
        let transition = Transition {
            event: NavEvent::Popped,
            frame,
            holder,
            fresh_frame: false,
            depth: self.stack.len(),
        };
        self.notify(&transition);

        true
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.stack.last()
    }

    pub fn current_route(&self) -> Option<(RouteId, &RouteArgs)> {
        self.stack.last().map(|frame| (frame.route, &frame.args))
    }

    /// Frames from bottom (start) to top (current)
    pub fn back_stack(&self) -> &[Frame] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// State holder for a frame still on the stack
    pub fn holder_for(&self, frame_id: FrameId) -> Option<CounterHolder> {
        let frame = self.stack.iter().find(|f| f.id == frame_id)?;
        self.lookup_holder(frame)
    }

    pub fn current_holder(&self) -> Option<CounterHolder> {
        self.stack.last().and_then(|frame| self.lookup_holder(frame))
    }

    /// Application-scoped holder for `route`, if one has been created
    pub fn app_holder(&self, route: RouteId) -> Option<CounterHolder> {
        self.app_holders.get(&route).cloned()
    }

    fn push_frame(&mut self, route: RouteId, args: RouteArgs, event: NavEvent) -> Transition {
        let frame = Frame::new(route, args);
        let holder = self.holder_for_frame(&frame);
        self.stack.push(frame.clone());

        tracing::info!(
            route = %frame.route,
            frame_id = %frame.id,
            args = %frame.args,
            depth = self.stack.len(),
            "Route activated"
        );

        if let Some(hooks) = self.activation_hooks.get(&route) {
            for hook in hooks {
                hook(&frame, &holder);
            }
        }

        let transition = Transition {
            event,
            frame,
            holder,
            fresh_frame: true,
            depth: self.stack.len(),
        };
        self.notify(&transition);

        transition
    }

    /// Find or lazily create the holder for `frame` according to its route's scope
    fn holder_for_frame(&mut self, frame: &Frame) -> CounterHolder {
        if let Some(holder) = self.lookup_holder(frame) {
            return holder;
        }

        let holder = match self.factories.get(&frame.route) {
            Some(factory) => factory(),
            None => CounterHolder::initialize(0),
        };

        match self.scope_of(frame.route) {
            StateScope::Application => {
                self.app_holders.insert(frame.route, holder.clone());
            }
            StateScope::Frame => {
                self.frame_holders.insert(frame.id, holder.clone());
            }
        }

        tracing::debug!(
            route = %frame.route,
            holder_id = %holder.holder_id(),
            "Created state holder"
        );

        holder
    }

    fn lookup_holder(&self, frame: &Frame) -> Option<CounterHolder> {
        match self.scope_of(frame.route) {
            StateScope::Application => self.app_holders.get(&frame.route).cloned(),
            StateScope::Frame => self.frame_holders.get(&frame.id).cloned(),
        }
    }

    fn scope_of(&self, route: RouteId) -> StateScope {
        self.table
            .route(route)
            .map(|r| r.scope)
            .unwrap_or(StateScope::Frame)
    }

    fn notify(&self, transition: &Transition) {
        for (_, listener) in &self.listeners {
            listener(transition);
        }
    }
}
