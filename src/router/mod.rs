//! # Router Module
//!
//! Route registration, middleware layering and request dispatch.
//!
//! ## Overview
//!
//! - [`Router`] is the root [`Group`] and the entry point for requests
//! - [`Group`] is a prefix scope owning routes and nested groups
//! - [`Route`] is one method + path + handler with its middleware chain
//! - [`RadixMatcher`] is the compiled path matcher the router caches
//!
//! ## Middleware Ordering
//!
//! Middleware runs outermost first on the way in and innermost first on the
//! way out. A route's chain is fixed when middleware is added, never
//! recomputed at dispatch time:
//!
//! 1. A new route (or group) starts with a copy of its group's chain.
//! 2. Middleware added to a group is appended to the group and pushed into
//!    every child group and route that already exists.
//! 3. Middleware added to a route is appended to that route only.
//!
//! So a chain is always in registration order, and middleware added to an
//! ancestor after a route gained its own middleware runs inside it.
//!
//! ## Example
//!
//! ```rust
//! use layered_router::handler::handler_fn;
//! use layered_router::message::{Request, RequestExt, Response};
//! use layered_router::middleware::TracingMiddleware;
//! use layered_router::{RequestMethod, Router};
//!
//! let mut router = Router::new();
//! router.add_middleware(TracingMiddleware);
//! router.add_group("/users").add_route(
//!     RequestMethod::Get,
//!     "/{id}",
//!     handler_fn(|req| {
//!         let id = req.path_param("id").unwrap_or_default().to_string();
//!         Ok(Response::new(id))
//!     }),
//! );
//!
//! let request = http::Request::builder()
//!     .uri("/users/42")
//!     .body(String::new())
//!     .unwrap();
//! let response = router.handle(request).unwrap();
//! assert_eq!(response.body(), "42");
//! ```

mod core;
mod group;
mod radix;
mod route;

pub use core::Router;
pub use group::Group;
pub use radix::{MatchOutcome, MatcherError, RadixMatcher};
pub use route::Route;
