//! Router core module - request lifecycle and matcher cache.

use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::radix::{MatchOutcome, MatcherError, RadixMatcher};
use super::{Group, Route};
use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::exception::{ExceptionTranslator, Propagate};
use crate::handler::Handler;
use crate::message::{Request, RequestExt, Response, ResponseExt};
use crate::method::RequestMethod;
use crate::middleware::Middleware;

/// Matcher compiled from one generation of the route tree.
struct CompiledRoutes {
    generation: u64,
    matcher: Result<RadixMatcher, MatcherError>,
}

/// The root group and the entry point for requests.
///
/// Setup (`add_route`, `add_group`, `add_middleware`, and anything done
/// through the handles they return) needs `&mut Router`; request handling
/// needs only `&Router`, so a configured router can be shared across threads
/// behind an `Arc`.
///
/// Every setup call bumps a generation counter. The compiled matcher records
/// the generation it was built from and is rebuilt lazily by the first
/// request that sees a newer one.
pub struct Router {
    root: Group,
    translator: Arc<dyn ExceptionTranslator>,
    config: RouterConfig,
    generation: u64,
    compiled: ArcSwapOption<CompiledRoutes>,
    rebuild_lock: Mutex<()>,
    builds: AtomicUsize,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Router without exception translation: failures are returned from
    /// [`Router::handle`] as `Err`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Group::default(),
            translator: Arc::new(Propagate),
            config: RouterConfig::default(),
            generation: 0,
            compiled: ArcSwapOption::empty(),
            rebuild_lock: Mutex::new(()),
            builds: AtomicUsize::new(0),
        }
    }

    /// Translate failures into responses with `translator`.
    #[must_use]
    pub fn with_translator<T: ExceptionTranslator + 'static>(mut self, translator: T) -> Self {
        self.translator = Arc::new(translator);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register a route at the root. See [`Group::add_route`].
    pub fn add_route<H: Handler + 'static>(
        &mut self,
        method: RequestMethod,
        path: &str,
        handler: H,
    ) -> &mut Route {
        self.touch();
        self.root.add_route(method, path, handler)
    }

    /// Register a route with a shared handler. See [`Group::add_shared_route`].
    pub fn add_shared_route(
        &mut self,
        method: RequestMethod,
        path: &str,
        handler: Arc<dyn Handler>,
    ) -> &mut Route {
        self.touch();
        self.root.add_shared_route(method, path, handler)
    }

    /// Get or create a top-level group. See [`Group::add_group`].
    pub fn add_group(&mut self, prefix: &str) -> &mut Group {
        self.touch();
        self.root.add_group(prefix)
    }

    /// Add middleware to every route, existing and future.
    pub fn add_middleware<M: Middleware + 'static>(&mut self, middleware: M) -> &mut Self {
        self.touch();
        self.root.add_middleware(middleware);
        self
    }

    /// Flattened route list, in the order the matcher is compiled from.
    pub fn routes(&self) -> Vec<&Route> {
        self.root.routes()
    }

    /// Number of times the matcher has been compiled.
    pub fn matcher_builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Handle a request: match, run the route's chain, translate failures.
    ///
    /// # Errors
    ///
    /// Only when the configured translator declines a failure. With the
    /// default [`Propagate`] that is every failure: a [`RouterError`] for
    /// 404/405/500 raised by the router, or whatever the handler or
    /// middleware returned.
    pub fn handle(&self, request: Request) -> anyhow::Result<Response> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let start = Instant::now();

        self.log_request(&request);

        let response = match self.dispatch(request) {
            Ok(response) => response,
            Err(failure) => self.translator.handle(failure)?,
        };

        let elapsed = start.elapsed();
        self.log_response(&method, &uri, &response);
        if let Some(threshold) = self.config.slow_request_threshold() {
            if elapsed >= threshold {
                warn!(
                    method = %method,
                    uri = %uri,
                    status = response.status().as_u16(),
                    duration_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                    "Slow request"
                );
            }
        }

        Ok(response)
    }

    fn dispatch(&self, request: Request) -> anyhow::Result<Response> {
        let compiled = self.compiled_routes();
        let matcher = match &compiled.matcher {
            Ok(matcher) => matcher,
            Err(err) => return Err(RouterError::internal().with_source(err.clone()).into()),
        };

        match matcher.lookup(request.method(), request.uri().path()) {
            MatchOutcome::Found { route, params } => route.handle(request.with_attribute(params)),
            MatchOutcome::NotFound => Err(RouterError::not_found().into()),
            MatchOutcome::MethodNotAllowed { allowed } => {
                Err(RouterError::method_not_allowed(&allowed).into())
            }
        }
    }

    /// Current matcher, compiling it first when the tree changed since the last build.
    fn compiled_routes(&self) -> Arc<CompiledRoutes> {
        if let Some(compiled) = self.current() {
            return compiled;
        }

        let _guard = self
            .rebuild_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Another request may have rebuilt while we waited for the lock
        if let Some(compiled) = self.current() {
            return compiled;
        }

        let routes = self.routes();
        let routes_count = routes.len();
        let matcher = RadixMatcher::compile(routes.into_iter().map(|r| Arc::new(r.clone())));
        match &matcher {
            Ok(_) => info!(
                routes_count,
                generation = self.generation,
                "Routing table compiled"
            ),
            Err(err) => warn!(
                routes_count,
                generation = self.generation,
                error = %err,
                "Routing table failed to compile"
            ),
        }

        let compiled = Arc::new(CompiledRoutes {
            generation: self.generation,
            matcher,
        });
        self.compiled.store(Some(Arc::clone(&compiled)));
        self.builds.fetch_add(1, Ordering::Relaxed);
        compiled
    }

    fn current(&self) -> Option<Arc<CompiledRoutes>> {
        self.compiled
            .load_full()
            .filter(|c| c.generation == self.generation)
    }

    /// Mark the route tree as changed.
    fn touch(&mut self) {
        self.generation += 1;
    }

    fn log_request(&self, request: &Request) {
        debug!(
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
            headers = ?self.config.log_headers.then(|| request.headers()),
            body = ?self.config.log_bodies.then(|| request.body()),
            "Router request"
        );
    }

    fn log_response(&self, method: &http::Method, uri: &http::Uri, response: &Response) {
        debug!(
            method = %method,
            uri = %uri,
            status = response.status().as_u16(),
            reason = %response.reason_phrase(),
            headers = ?self.config.log_headers.then(|| response.headers()),
            body = ?self.config.log_bodies.then(|| response.body()),
            "Router response"
        );
    }
}

impl Handler for Router {
    fn handle(&self, request: Request) -> anyhow::Result<Response> {
        Router::handle(self, request)
    }
}
