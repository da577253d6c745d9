//! Route declarations

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteId {
    Home,
    Form,
}

impl RouteId {
    pub const ALL: [RouteId; 2] = [RouteId::Home, RouteId::Form];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteId::Home => "home",
            RouteId::Form => "form",
        }
    }
}

impl std::fmt::Display for RouteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RouteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(RouteId::Home),
            "form" => Ok(RouteId::Form),
            _ => Err(format!("Unknown route: {}", s)),
        }
    }
}

/// How long a route's state holder lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateScope {
    /// One holder for the whole application, reused on every visit
    Application,
    /// A fresh holder per pushed frame, dropped when the frame is popped
    Frame,
}

/// A declared route argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgSpec {
    pub name: String,
    pub default: Option<String>,
}

impl ArgSpec {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// Declaration of one navigation destination.
///
/// Patterns are kept as written; [`crate::RouteTable`] compiles and
/// validates them when the table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: RouteId,
    /// In-app path template, e.g. `form?five={five}`
    pub template: String,
    pub args: Vec<ArgSpec>,
    /// External URI patterns, tried in declaration order
    pub deep_links: Vec<String>,
    pub scope: StateScope,
}

impl Route {
    pub fn new(id: RouteId, template: impl Into<String>) -> Self {
        Self {
            id,
            template: template.into(),
            args: Vec::new(),
            deep_links: Vec::new(),
            scope: StateScope::Frame,
        }
    }

    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    pub fn deep_link(mut self, pattern: impl Into<String>) -> Self {
        self.deep_links.push(pattern.into());
        self
    }

    pub fn scope(mut self, scope: StateScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn arg_spec(&self, name: &str) -> Option<&ArgSpec> {
        self.args.iter().find(|spec| spec.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.arg_spec(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_id_round_trip_names() {
        for id in RouteId::ALL {
            assert_eq!(id.as_str().parse::<RouteId>().unwrap(), id);
        }
        assert!("Home".parse::<RouteId>().is_err());
        assert!("settings".parse::<RouteId>().is_err());
    }

    #[test]
    fn test_route_builder() {
        let route = Route::new(RouteId::Form, "form?five={five}")
            .arg(ArgSpec::with_default("five", ""))
            .deep_link("testing://one?five={five}")
            .scope(StateScope::Frame);

        assert!(route.declares("five"));
        assert!(!route.declares("two"));
        assert_eq!(route.arg_spec("five").unwrap().default.as_deref(), Some(""));
        assert_eq!(route.deep_links.len(), 1);
    }
}
