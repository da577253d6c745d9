//! Route table and resolution

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::args::RouteArgs;
use crate::error::RouteError;
use crate::pattern::{ParsedUri, Segment, UriPattern};
use crate::route::{ArgSpec, Route, RouteId, StateScope};
use crate::Result;

/// Scheme used by the application's deep links when none is configured
pub const DEFAULT_SCHEME: &str = "testing";

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Which declaration produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "index", rename_all = "snake_case")]
pub enum MatchSource {
    /// Index into the route's deep-link list
    DeepLink(usize),
    /// The route's in-app path template
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub route: RouteId,
    pub args: RouteArgs,
    pub via: MatchSource,
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    route: Route,
    template: UriPattern,
    deep_links: Vec<UriPattern>,
    defaults: RouteArgs,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    start: RouteId,
}

impl RouteTable {
    pub fn builder(start: RouteId) -> RouteTableBuilder {
        RouteTableBuilder {
            start,
            routes: Vec::new(),
        }
    }

    /// The application's navigation graph
    pub fn standard(scheme: &str) -> Result<Self> {
        Self::builder(RouteId::Home)
            .route(
                Route::new(RouteId::Form, "form?five={five}")
                    .arg(ArgSpec::with_default("five", ""))
                    .deep_link(format!("{}://one?two={{two}}&five={{five}}", scheme))
                    .deep_link(format!("{}://three?four={{four}}&five={{five}}", scheme))
                    .scope(StateScope::Frame),
            )
            .route(Route::new(RouteId::Home, "home").scope(StateScope::Application))
            .build()
    }

    pub fn start(&self) -> RouteId {
        self.start
    }

    pub fn contains(&self, id: RouteId) -> bool {
        self.compiled(id).is_some()
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.compiled(id).map(|c| &c.route)
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().map(|c| &c.route)
    }

    /// Merge `args` over the route's declared defaults
    pub fn with_defaults(&self, id: RouteId, args: RouteArgs) -> Result<RouteArgs> {
        let compiled = self.compiled(id).ok_or(RouteError::UnknownRoute(id))?;
        Ok(args.or_defaults(&compiled.defaults))
    }

    /// Resolve a deep link or in-app path to a route.
    ///
    /// Deep links are tried first across all routes in declaration order,
    /// then path templates. The first structural match wins.
    pub fn resolve(&self, input: &str) -> Result<Resolution> {
        let not_found = || RouteError::NotFound(input.to_string());
        let parsed = ParsedUri::parse(input).ok_or_else(not_found)?;

        for compiled in &self.routes {
            for (index, pattern) in compiled.deep_links.iter().enumerate() {
                if let Some(bound) = pattern.matches(&parsed) {
                    return Ok(self.finish(compiled, bound, MatchSource::DeepLink(index)));
                }
            }
        }

        for compiled in &self.routes {
            if let Some(bound) = compiled.template.matches(&parsed) {
                return Ok(self.finish(compiled, bound, MatchSource::Path));
            }
        }

        tracing::debug!(input = %input, "No route matched");
        Err(not_found())
    }

    /// Render the in-app path for a route, e.g. `form?five=12`.
    ///
    /// Query entries without a value are left out; a missing path value is an error.
    pub fn build_path(&self, id: RouteId, args: &RouteArgs) -> Result<String> {
        let compiled = self.compiled(id).ok_or(RouteError::UnknownRoute(id))?;

        let mut segments = Vec::with_capacity(compiled.template.segments().len());
        for segment in compiled.template.segments() {
            match segment {
                Segment::Literal(literal) => segments.push(literal.clone()),
                Segment::Placeholder(name) => {
                    let value = args.get(name).ok_or_else(|| RouteError::MissingArgument {
                        route: id,
                        name: name.clone(),
                    })?;
                    segments.push(utf8_percent_encode(value, COMPONENT).to_string());
                }
            }
        }

        let query: Vec<String> = compiled
            .template
            .query()
            .iter()
            .filter_map(|(key, value)| match value {
                Segment::Literal(literal) => Some(format!("{}={}", key, literal)),
                Segment::Placeholder(name) => args
                    .get(name)
                    .map(|v| format!("{}={}", key, utf8_percent_encode(v, COMPONENT))),
            })
            .collect();

        let mut path = segments.join("/");
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }
        Ok(path)
    }

    fn compiled(&self, id: RouteId) -> Option<&CompiledRoute> {
        self.routes.iter().find(|c| c.route.id == id)
    }

    fn finish(
        &self,
        compiled: &CompiledRoute,
        bound: std::collections::BTreeMap<String, String>,
        via: MatchSource,
    ) -> Resolution {
        // Placeholders the route does not declare (`two`, `four`) only shape the match
        let args: RouteArgs = bound
            .into_iter()
            .filter(|(name, _)| compiled.route.declares(name))
            .collect();

        let resolution = Resolution {
            route: compiled.route.id,
            args: args.or_defaults(&compiled.defaults),
            via,
        };

        tracing::debug!(
            route = %resolution.route,
            args = %resolution.args,
            via = ?resolution.via,
            "Resolved route"
        );

        resolution
    }
}

pub struct RouteTableBuilder {
    start: RouteId,
    routes: Vec<Route>,
}

impl RouteTableBuilder {
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Compile every pattern and check the table is consistent
    pub fn build(self) -> Result<RouteTable> {
        let mut compiled: Vec<CompiledRoute> = Vec::with_capacity(self.routes.len());

        for route in self.routes {
            if compiled.iter().any(|c| c.route.id == route.id) {
                return Err(RouteError::DuplicateRoute(route.id));
            }

            let template = UriPattern::parse(&route.template)?;
            if let Some(name) = template.placeholders().find(|name| !route.declares(name)) {
                return Err(RouteError::UnknownArgument {
                    route: route.id,
                    name: name.to_string(),
                });
            }

            let deep_links = route
                .deep_links
                .iter()
                .map(|pattern| UriPattern::parse(pattern))
                .collect::<Result<Vec<_>>>()?;

            let defaults: RouteArgs = route
                .args
                .iter()
                .filter_map(|spec| spec.default.as_ref().map(|d| (spec.name.clone(), d.clone())))
                .collect();

            compiled.push(CompiledRoute {
                route,
                template,
                deep_links,
                defaults,
            });
        }

        if !compiled.iter().any(|c| c.route.id == self.start) {
            return Err(RouteError::UnknownRoute(self.start));
        }

        Ok(RouteTable {
            routes: compiled,
            start: self.start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> RouteTable {
        RouteTable::standard(DEFAULT_SCHEME).unwrap()
    }

    #[test]
    fn test_standard_table() {
        let table = table();
        assert_eq!(table.start(), RouteId::Home);
        assert!(table.contains(RouteId::Home));
        assert!(table.contains(RouteId::Form));
        assert_eq!(table.route(RouteId::Home).unwrap().scope, StateScope::Application);
        assert_eq!(table.route(RouteId::Form).unwrap().scope, StateScope::Frame);
    }

    #[test]
    fn test_resolve_paths() {
        let table = table();

        let home = table.resolve("home").unwrap();
        assert_eq!(home.route, RouteId::Home);
        assert!(home.args.is_empty());
        assert_eq!(home.via, MatchSource::Path);

        let form = table.resolve("form").unwrap();
        assert_eq!(form.route, RouteId::Form);
        assert_eq!(form.args, RouteArgs::new().with("five", ""));

        let form = table.resolve("form?five=12").unwrap();
        assert_eq!(form.args.get("five"), Some("12"));
    }

    #[test]
    fn test_deep_link_equivalence() {
        let table = table();

        let one = table.resolve("testing://one?two=x&five=9").unwrap();
        let three = table.resolve("testing://three?four=y&five=9").unwrap();

        assert_eq!(one.route, RouteId::Form);
        assert_eq!(three.route, RouteId::Form);
        assert_eq!(one.args, RouteArgs::new().with("five", "9"));
        assert_eq!(one.args, three.args);
        assert_eq!(one.via, MatchSource::DeepLink(0));
        assert_eq!(three.via, MatchSource::DeepLink(1));
    }

    #[test]
    fn test_deep_link_defaults() {
        let table = table();
        let resolved = table.resolve("testing://one?two=x").unwrap();
        assert_eq!(resolved.args, RouteArgs::new().with("five", ""));
    }

    #[test]
    fn test_earlier_deep_link_wins() {
        let table = RouteTable::builder(RouteId::Home)
            .route(Route::new(RouteId::Home, "home").scope(StateScope::Application))
            .route(
                Route::new(RouteId::Form, "form?five={five}")
                    .arg(ArgSpec::with_default("five", ""))
                    .deep_link("app://x?a={five}")
                    .deep_link("app://x?b={five}"),
            )
            .build()
            .unwrap();

        let resolved = table.resolve("app://x?a=first&b=second").unwrap();
        assert_eq!(resolved.args.get("five"), Some("first"));
        assert_eq!(resolved.via, MatchSource::DeepLink(0));
    }

    #[test]
    fn test_not_found() {
        let table = table();
        for input in [
            "",
            "settings",
            "Home",
            "form/extra",
            "testing://two?five=1",
            "other://one?five=1",
            "not a uri://",
        ] {
            assert!(
                matches!(table.resolve(input), Err(RouteError::NotFound(_))),
                "expected NotFound for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_values_may_contain_scheme_separator() {
        let table = table();

        let form = table.resolve("form?five=http://x").unwrap();
        assert_eq!(form.route, RouteId::Form);
        assert_eq!(form.args.get("five"), Some("http://x"));

        let linked = table.resolve("testing://one?two=x&five=http://y").unwrap();
        assert_eq!(linked.via, MatchSource::DeepLink(0));
        assert_eq!(linked.args.get("five"), Some("http://y"));
    }

    #[test]
    fn test_build_rejects_inconsistent_tables() {
        let duplicate = RouteTable::builder(RouteId::Home)
            .route(Route::new(RouteId::Home, "home"))
            .route(Route::new(RouteId::Home, "home2"))
            .build();
        assert_eq!(duplicate.unwrap_err(), RouteError::DuplicateRoute(RouteId::Home));

        let missing_start = RouteTable::builder(RouteId::Home)
            .route(Route::new(RouteId::Form, "form"))
            .build();
        assert_eq!(missing_start.unwrap_err(), RouteError::UnknownRoute(RouteId::Home));

        let undeclared = RouteTable::builder(RouteId::Form)
            .route(Route::new(RouteId::Form, "form?five={five}"))
            .build();
        assert!(matches!(undeclared, Err(RouteError::UnknownArgument { .. })));

        let bad_link = RouteTable::builder(RouteId::Home)
            .route(Route::new(RouteId::Home, "home").deep_link("testing://one?five={five"))
            .build();
        assert!(matches!(bad_link, Err(RouteError::InvalidPattern { .. })));
    }

    #[test]
    fn test_build_path() {
        let table = table();
        assert_eq!(table.build_path(RouteId::Home, &RouteArgs::new()).unwrap(), "home");
        assert_eq!(
            table
                .build_path(RouteId::Form, &RouteArgs::new().with("five", "12"))
                .unwrap(),
            "form?five=12"
        );
        assert_eq!(table.build_path(RouteId::Form, &RouteArgs::new()).unwrap(), "form");
        assert_eq!(
            table
                .build_path(RouteId::Form, &RouteArgs::new().with("five", "a b&c"))
                .unwrap(),
            "form?five=a%20b%26c"
        );
    }

    #[test]
    fn test_build_path_requires_path_values() {
        let table = RouteTable::builder(RouteId::Home)
            .route(Route::new(RouteId::Home, "home"))
            .route(Route::new(RouteId::Form, "item/{id}").arg(ArgSpec::required("id")))
            .build()
            .unwrap();

        assert_eq!(
            table.build_path(RouteId::Form, &RouteArgs::new()),
            Err(RouteError::MissingArgument {
                route: RouteId::Form,
                name: "id".to_string(),
            })
        );
        assert_eq!(
            table
                .build_path(RouteId::Form, &RouteArgs::new().with("id", "a/b"))
                .unwrap(),
            "item/a%2Fb"
        );

        let resolved = table.resolve("item/42").unwrap();
        assert_eq!(resolved.args, RouteArgs::new().with("id", "42"));
    }

    #[test]
    fn test_with_defaults() {
        let table = table();
        let args = table.with_defaults(RouteId::Form, RouteArgs::new()).unwrap();
        assert_eq!(args, RouteArgs::new().with("five", ""));

        let args = table
            .with_defaults(RouteId::Form, RouteArgs::new().with("five", "7"))
            .unwrap();
        assert_eq!(args.get("five"), Some("7"));
    }

    proptest! {
        #[test]
        fn test_built_paths_resolve_back(five in "\\PC*") {
            let table = table();
            let args = RouteArgs::new().with("five", five.clone());
            let path = table.build_path(RouteId::Form, &args).unwrap();

            let resolved = table.resolve(&path).unwrap();
            prop_assert_eq!(resolved.route, RouteId::Form);
            prop_assert_eq!(resolved.args.get("five"), Some(five.as_str()));
        }
    }
}
