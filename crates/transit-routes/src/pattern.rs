//! URI pattern parsing and matching
//!
//! Grammar, shared by path templates and deep links:
//! ```text
//! [scheme "://" host] ["/"] segment ("/" segment)* ["?" key "=" value ("&" key "=" value)*]
//! segment, value := literal | "{" name "}"
//! ```
//! Path placeholders bind exactly one non-empty segment. Query placeholders
//! are optional; literal query values must be present and equal.

use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;
use url::Url;

use crate::error::RouteError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriPattern {
    /// Lowercased scheme, `None` for in-app paths
    scheme: Option<String>,
    host: Option<String>,
    segments: Vec<Segment>,
    query: Vec<(String, Segment)>,
}

impl UriPattern {
    /// Parse a pattern such as `testing://one?two={two}&five={five}` or `form?five={five}`
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        let (scheme, rest) = match split_scheme(trimmed) {
            Some((scheme, rest)) => {
                if !is_valid_scheme(scheme) {
                    return Err(invalid("scheme is not valid"));
                }
                (Some(scheme.to_ascii_lowercase()), rest)
            }
            None => (None, trimmed),
        };

        let (before_query, query_str) = match rest.split_once('?') {
            Some((before, query)) => (before, Some(query)),
            None => (rest, None),
        };

        let (host, path) = if scheme.is_some() {
            match before_query.find('/') {
                Some(idx) => (Some(before_query[..idx].to_string()), &before_query[idx..]),
                None => (Some(before_query.to_string()), ""),
            }
        } else {
            (None, before_query)
        };

        if host.as_deref().is_some_and(|h| h.contains(['{', '}'])) {
            return Err(invalid("host cannot contain placeholders"));
        }

        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| parse_segment(s).map_err(|reason| invalid(reason.as_str())))
            .collect::<Result<Vec<_>>>()?;

        let mut query = Vec::new();
        if let Some(query_str) = query_str {
            for pair in query_str.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                if key.is_empty() || key.contains(['{', '}']) {
                    return Err(invalid("query key must be a non-empty literal"));
                }
                let value = parse_segment(value).map_err(|reason| invalid(reason.as_str()))?;
                query.push((key.to_string(), value));
            }
        }

        Ok(Self {
            scheme,
            host,
            segments,
            query,
        })
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Every placeholder name, path first then query
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .chain(self.query.iter().map(|(_, value)| value))
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
    }

    /// Structural match. Returns every bound placeholder, declared or not.
    pub(crate) fn matches(&self, input: &ParsedUri) -> Option<BTreeMap<String, String>> {
        if self.scheme != input.scheme {
            return None;
        }
        if self.scheme.is_some() && self.host.as_deref().unwrap_or("") != input.host {
            return None;
        }
        if self.segments.len() != input.segments.len() {
            return None;
        }

        let mut bound = BTreeMap::new();

        for (expected, actual) in self.segments.iter().zip(&input.segments) {
            match expected {
                Segment::Literal(literal) if literal == actual => {}
                Segment::Literal(_) => return None,
                Segment::Placeholder(name) => {
                    bound.insert(name.clone(), actual.clone());
                }
            }
        }

        for (key, expected) in &self.query {
            let actual = input
                .query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v);

            match (expected, actual) {
                (Segment::Literal(literal), Some(value)) if literal == value => {}
                (Segment::Literal(_), _) => return None,
                (Segment::Placeholder(name), Some(value)) => {
                    bound.insert(name.clone(), value.clone());
                }
                (Segment::Placeholder(_), None) => {}
            }
        }

        Some(bound)
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn query(&self) -> &[(String, Segment)] {
        &self.query
    }
}

/// Split `scheme://rest` when the separator comes before any query or fragment.
/// A `://` inside a query value belongs to that value.
fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let head = input.find(['?', '#']).unwrap_or(input.len());
    let idx = input[..head].find("://")?;
    Some((&input[..idx], &input[idx + 3..]))
}

fn is_valid_scheme(scheme: &str) -> bool {
    scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn parse_segment(raw: &str) -> std::result::Result<Segment, String> {
    if let Some(name) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        if name.is_empty() {
            return Err("placeholder name is empty".to_string());
        }
        if name.contains(['{', '}']) {
            return Err(format!("unbalanced braces in {}", raw));
        }
        return Ok(Segment::Placeholder(name.to_string()));
    }

    if raw.contains(['{', '}']) {
        return Err(format!("unbalanced braces in {}", raw));
    }

    Ok(Segment::Literal(raw.to_string()))
}

/// Incoming URI or in-app path, split and percent-decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedUri {
    pub scheme: Option<String>,
    pub host: String,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
}

impl ParsedUri {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if split_scheme(input).is_some_and(|(scheme, _)| is_valid_scheme(scheme)) {
            let url = Url::parse(input).ok()?;
            return Some(Self {
                scheme: Some(url.scheme().to_string()),
                host: url.host_str().unwrap_or("").to_string(),
                segments: split_path(url.path()),
                query: url
                    .query_pairs()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect(),
            });
        }

        let without_fragment = input.split('#').next().unwrap_or(input);
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => (without_fragment, ""),
        };

        Some(Self {
            scheme: None,
            host: String::new(),
            segments: split_path(path),
            query: url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        })
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect()
}
