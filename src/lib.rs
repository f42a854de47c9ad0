//! # layered-router
//!
//! **layered-router** is a synchronous HTTP request router with group-scoped
//! middleware and exception translation.
//!
//! ## Overview
//!
//! Applications register routes (method + path pattern + handler) on a
//! [`Router`], optionally inside nested [`Group`]s that share a path prefix and
//! a middleware stack. A request is matched against the compiled route table,
//! path variables are attached to it, and the matched route's middleware chain
//! runs around the handler. Every failure raised along the way is handed to the
//! router's [`ExceptionTranslator`].
//!
//! ## Architecture
//!
//! - **[`method`]** - the closed set of supported request methods
//! - **[`message`]** - request/response types and copy-on-write helpers
//! - **[`handler`]** - the terminal [`Handler`] abstraction
//! - **[`middleware`]** - the [`Middleware`] trait, chains and built-ins
//! - **[`router`]** - routes, groups, the radix matcher and the router itself
//! - **[`error`]** - [`RouterError`], the HTTP-status-carrying failure
//! - **[`exception`]** - translating failures into responses
//! - **[`config`]** - diagnostics configuration from env or YAML
//! - **[`ids`]** - ULID request identifiers
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Router
//!     participant Matcher as RadixMatcher
//!     participant Route
//!     participant MW as Middleware
//!     participant Handler
//!     participant Translator as ExceptionTranslator
//!
//!     Caller->>Router: handle(request)
//!     Router->>Matcher: lookup(method, path)
//!     alt route found
//!         Matcher-->>Router: Found { route, params }
//!         Router->>Route: handle(request + PathParams)
//!         Route->>MW: process(request, next)
//!         MW->>Handler: next.handle(request)
//!         Handler-->>MW: response
//!         MW-->>Route: response
//!         Route-->>Router: response
//!     else no route
//!         Matcher-->>Router: NotFound / MethodNotAllowed
//!         Router->>Translator: handle(RouterError)
//!         Translator-->>Router: error response
//!     end
//!     Router-->>Caller: response
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use layered_router::handler::handler_fn;
//! use layered_router::message::{Request, Response};
//! use layered_router::{ExceptionResponse, RequestMethod, Router};
//!
//! let mut router = Router::new().with_translator(ExceptionResponse::new());
//! router.add_route(
//!     RequestMethod::Get,
//!     "/health",
//!     handler_fn(|_req| Ok(Response::new("ok".to_string()))),
//! );
//!
//! let request = http::Request::builder().uri("/missing").body(String::new()).unwrap();
//! let response = router.handle(request).unwrap();
//! assert_eq!(response.status(), 404);
//! ```
//!
//! ## Runtime Considerations
//!
//! Setup takes `&mut Router`; handling takes `&Router`. Once configured, a
//! router can be wrapped in an `Arc` and shared across threads. The matcher is
//! compiled lazily on the first request after a change and cached until the
//! next change.

pub mod config;
pub mod error;
pub mod exception;
pub mod handler;
pub mod ids;
pub mod message;
pub mod method;
pub mod middleware;
pub mod router;

pub use config::RouterConfig;
pub use error::{ErrorKind, RouterError};
pub use exception::{ExceptionResponse, ExceptionTranslator};
pub use handler::Handler;
pub use message::{PathParams, Request, RequestExt, Response, ResponseExt};
pub use method::RequestMethod;
pub use middleware::{Middleware, MiddlewareChain};
pub use router::{Group, Route, Router};
