//! Radix tree path matcher
//!
//! This module provides the compiled matcher the [`Router`](super::Router)
//! caches. It is a segment-level radix tree (compact prefix tree) built from
//! a snapshot of the flattened route list, giving O(k) lookups where k is the
//! number of path segments.
//!
//! ## Implementation Details
//!
//! - Each node represents one path segment
//! - Static segments (e.g., `users`) match exactly and are tried first
//! - Parameter segments (e.g., `{id}`) match any single segment; the search
//!   backtracks into them when the static branch does not produce a route
//! - Routes are stored at terminal nodes, one endpoint per HTTP method
//!
//! A lookup has three outcomes: a route for the method, a path that exists
//! only for other methods (used to build the `Allow` header of a 405), or no
//! match at all.
//!
//! ## Example
//!
//! ```rust,ignore
//! let matcher = RadixMatcher::compile(router.routes().into_iter().cloned().map(Arc::new))?;
//! match matcher.lookup(&Method::GET, "/users/123") {
//!     MatchOutcome::Found { route, params } => println!("{} {:?}", route.path(), params.get("id")),
//!     MatchOutcome::MethodNotAllowed { allowed } => println!("allowed: {allowed:?}"),
//!     MatchOutcome::NotFound => println!("404"),
//! }
//! ```

use http::Method;
use std::fmt;
use std::sync::Arc;

use super::Route;
use crate::message::PathParams;

/// Result of [`RadixMatcher::lookup`].
#[derive(Debug)]
pub enum MatchOutcome {
    /// A route is registered for the method and path.
    Found {
        route: Arc<Route>,
        params: PathParams,
    },
    /// No route pattern matches the path.
    NotFound,
    /// Patterns match the path, but only for these methods (flatten order, deduplicated).
    MethodNotAllowed { allowed: Vec<Method> },
}

/// A route set that cannot be compiled into a matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherError {
    /// The path pattern has malformed placeholder syntax.
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// What is wrong with it
        reason: &'static str,
    },
    /// Two routes share the same method and the same pattern.
    DuplicateRoute {
        /// Method registered twice
        method: Method,
        /// Pattern registered twice
        pattern: String,
    },
}

impl fmt::Display for MatcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid route pattern '{}': {}", pattern, reason)
            }
            MatcherError::DuplicateRoute { method, pattern } => {
                write!(
                    f,
                    "cannot register two routes matching '{}' for method {}",
                    pattern, method
                )
            }
        }
    }
}

impl std::error::Error for MatcherError {}

/// One parsed pattern segment.
enum Segment<'a> {
    Static(&'a str),
    Param(&'a str),
}

/// Split a pattern into segments, validating placeholder syntax.
fn parse_pattern(pattern: &str) -> Result<Vec<Segment<'_>>, MatcherError> {
    let invalid = |reason| MatcherError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };

    split_path(pattern)
        .into_iter()
        .map(|segment| {
            if segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}') {
                let name = &segment[1..segment.len() - 1];
                if name.is_empty() {
                    return Err(invalid("placeholder name is empty"));
                }
                if name.contains(['{', '}']) {
                    return Err(invalid("placeholders cannot be nested"));
                }
                Ok(Segment::Param(name))
            } else if segment.contains(['{', '}']) {
                Err(invalid("a placeholder must span a whole path segment"))
            } else {
                Ok(Segment::Static(segment))
            }
        })
        .collect()
}

/// Path segments without the empty pieces produced by leading or doubled slashes.
///
/// A trailing slash is kept as a final empty segment, so `/docs` and `/docs/`
/// are distinct paths. The root path `/` has no segments.
fn split_path(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if !segments.is_empty() && path.ends_with('/') {
        segments.push("");
    }
    segments
}

/// Route stored at a terminal node.
#[derive(Debug, Clone)]
struct Endpoint {
    method: Method,
    /// Position in the flattened route list
    order: usize,
    route: Arc<Route>,
}

/// Node in the radix tree
///
/// Each node represents a segment of a URL path. Static children and
/// parameter children are kept apart so that static segments win over
/// placeholders at the same position.
#[derive(Debug, Clone, Default)]
struct RadixNode {
    /// The path segment this node represents (without slashes)
    segment: String,
    /// Parameter name if this segment is a placeholder (e.g., "{id}" -> Some("id"))
    param_name: Option<Arc<str>>,
    /// Routes terminating at this node, in registration order
    endpoints: Vec<Endpoint>,
    /// Child nodes for static segments
    children: Vec<RadixNode>,
    /// Child nodes for placeholders. Different placeholder names at the same
    /// position (e.g. `/users/{id}/posts` vs `/users/{user_id}/comments`) get
    /// separate nodes so each route extracts its own names.
    param_children: Vec<RadixNode>,
}

impl RadixNode {
    fn new_static(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            ..Self::default()
        }
    }

    fn new_param(name: &str) -> Self {
        Self {
            param_name: Some(Arc::from(name)),
            ..Self::default()
        }
    }

    /// Insert an endpoint. Returns `false` when the node already has one for the method.
    fn insert(&mut self, segments: &[Segment<'_>], endpoint: Endpoint) -> bool {
        let Some((segment, remaining)) = segments.split_first() else {
            if self.endpoints.iter().any(|e| e.method == endpoint.method) {
                return false;
            }
            self.endpoints.push(endpoint);
            return true;
        };

        match segment {
            Segment::Param(name) => {
                let existing = self
                    .param_children
                    .iter()
                    .position(|c| c.param_name.as_deref() == Some(*name));
                let idx = existing.unwrap_or_else(|| {
                    self.param_children.push(RadixNode::new_param(name));
                    self.param_children.len() - 1
                });
                self.param_children[idx].insert(remaining, endpoint)
            }
            Segment::Static(name) => {
                let existing = self.children.iter().position(|c| c.segment == *name);
                let idx = existing.unwrap_or_else(|| {
                    self.children.push(RadixNode::new_static(name));
                    self.children.len() - 1
                });
                self.children[idx].insert(remaining, endpoint)
            }
        }
    }

    /// Find the route for `method`, pushing extracted variables onto `params`.
    fn search(
        &self,
        segments: &[&str],
        method: &Method,
        params: &mut PathParams,
    ) -> Option<Arc<Route>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self
                .endpoints
                .iter()
                .find(|e| e.method == *method)
                .map(|e| Arc::clone(&e.route));
        };

        // First, try exact match with static children
        for child in &self.children {
            if child.segment == *segment {
                if let Some(route) = child.search(remaining, method, params) {
                    return Some(route);
                }
            }
        }

        // If no exact match, try all parameter children. A placeholder never
        // matches the empty segment left by a trailing slash.
        if segment.is_empty() {
            return None;
        }
        for param_child in &self.param_children {
            if let Some(name) = &param_child.param_name {
                let mark = params.len();
                params.push(Arc::clone(name), (*segment).to_string());
                if let Some(route) = param_child.search(remaining, method, params) {
                    return Some(route);
                }
                // Backtrack: remove the parameter if the search fails
                params.truncate(mark);
            }
        }

        None
    }

    /// Collect `(order, method)` of every endpoint whose pattern matches the path.
    fn collect_allowed(&self, segments: &[&str], out: &mut Vec<(usize, Method)>) {
        let Some((segment, remaining)) = segments.split_first() else {
            out.extend(self.endpoints.iter().map(|e| (e.order, e.method.clone())));
            return;
        };

        for child in self.children.iter().filter(|c| c.segment == *segment) {
            child.collect_allowed(remaining, out);
        }
        if segment.is_empty() {
            return;
        }
        for param_child in &self.param_children {
            param_child.collect_allowed(remaining, out);
        }
    }
}

/// Compiled, immutable matcher over a snapshot of the route list.
///
/// # Performance
///
/// - Insertion: O(k) where k is the number of pattern segments
/// - Lookup: O(k) in the common case; backtracking only revisits branches
///   where static and parameter children overlap
#[derive(Debug, Clone)]
pub struct RadixMatcher {
    root: RadixNode,
    routes_count: usize,
}

impl RadixMatcher {
    /// Build a matcher from routes in flatten order.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError`] for malformed placeholders or when two routes
    /// share a method and an identical pattern.
    pub fn compile<I>(routes: I) -> Result<Self, MatcherError>
    where
        I: IntoIterator<Item = Arc<Route>>,
    {
        let mut root = RadixNode::default();
        let mut routes_count = 0;

        for (order, route) in routes.into_iter().enumerate() {
            let segments = parse_pattern(route.path())?;
            let method = route.method().as_http();
            let endpoint = Endpoint {
                method: method.clone(),
                order,
                route: Arc::clone(&route),
            };
            if !root.insert(&segments, endpoint) {
                return Err(MatcherError::DuplicateRoute {
                    method,
                    pattern: route.path().to_string(),
                });
            }
            routes_count += 1;
        }

        Ok(Self { root, routes_count })
    }

    /// Resolve a method and request path.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> MatchOutcome {
        let segments = split_path(path);

        let mut params = PathParams::new();
        if let Some(route) = self.root.search(&segments, method, &mut params) {
            return MatchOutcome::Found { route, params };
        }

        let mut candidates = Vec::new();
        self.root.collect_allowed(&segments, &mut candidates);
        if candidates.is_empty() {
            return MatchOutcome::NotFound;
        }

        candidates.sort_by_key(|(order, _)| *order);
        let mut allowed: Vec<Method> = Vec::with_capacity(candidates.len());
        for (_, m) in candidates {
            if !allowed.contains(&m) {
                allowed.push(m);
            }
        }
        MatchOutcome::MethodNotAllowed { allowed }
    }

    /// Number of routes compiled into the matcher.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes_count == 0
    }
}
