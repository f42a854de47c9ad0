use http::StatusCode;
use layered_router::{RequestMethod, Router};

mod common;
use common::capture::TestTracing;
use common::fixtures::{echo, request, Tag};

/// Routes and groups registered both before and after router-wide middleware.
fn layered_router() -> Router {
    let mut router = Router::new();

    router.add_route(RequestMethod::Get, "/without-route-middleware/before", echo());
    router
        .add_route(RequestMethod::Get, "/with-route-middleware/before", echo())
        .add_middleware(Tag("route-middleware-before"));
    router
        .add_group("/without-group-middleware")
        .add_route(RequestMethod::Get, "/before", echo());
    router
        .add_group("/with-group-middleware")
        .add_route(RequestMethod::Get, "/before", echo())
        .add_middleware(Tag("group-middleware-before"));

    router.add_middleware(Tag("all-middleware"));

    router.add_route(RequestMethod::Get, "/without-route-middleware/after", echo());
    router
        .add_route(RequestMethod::Get, "/with-route-middleware/after", echo())
        .add_middleware(Tag("route-middleware-after"));
    router
        .add_group("/without-group-middleware")
        .add_route(RequestMethod::Get, "/after", echo());
    router
        .add_group("/with-group-middleware")
        .add_route(RequestMethod::Get, "/after", echo())
        .add_middleware(Tag("group-middleware-after"));

    router
}

fn assert_lifecycle(tracing: &TestTracing, middleware_count: usize) {
    let mut expected = vec!["Router request".to_string()];
    expected.extend(std::iter::repeat("Executing middleware".to_string()).take(middleware_count));
    expected.push("Executing handler".to_string());
    expected.push("Router response".to_string());
    assert_eq!(tracing.lifecycle(), expected);
}

#[test]
fn test_route_without_middleware_before_generic_middleware() {
    let router = layered_router();
    let tracing = TestTracing::init();

    let response = router
        .handle(request("GET", "/without-route-middleware/before"))
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.body(),
        "/without-route-middleware/before;all-middleware,pre-handle;all-middleware,post-handle"
    );
    assert_lifecycle(&tracing, 1);
}

#[test]
fn test_route_with_middleware_before_generic_middleware() {
    let router = layered_router();
    let tracing = TestTracing::init();

    let response = router
        .handle(request("GET", "/with-route-middleware/before"))
        .unwrap();
    assert_eq!(
        response.body(),
        "/with-route-middleware/before\
         ;route-middleware-before,pre-handle\
         ;all-middleware,pre-handle\
         ;all-middleware,post-handle\
         ;route-middleware-before,post-handle"
    );
    assert_lifecycle(&tracing, 2);

    let executed: Vec<String> = tracing
        .with_message("Executing middleware")
        .iter()
        .filter_map(|r| r.field("middleware").map(str::to_string))
        .collect();
    assert_eq!(executed, vec!["route-middleware-before", "all-middleware"]);
}

#[test]
fn test_group_without_middleware_before_generic_middleware() {
    let router = layered_router();
    let tracing = TestTracing::init();

    let response = router
        .handle(request("GET", "/without-group-middleware/before"))
        .unwrap();
    assert_eq!(
        response.body(),
        "/without-group-middleware/before;all-middleware,pre-handle;all-middleware,post-handle"
    );
    assert_lifecycle(&tracing, 1);
}

#[test]
fn test_group_with_middleware_before_generic_middleware() {
    let router = layered_router();
    let tracing = TestTracing::init();

    let response = router
        .handle(request("GET", "/with-group-middleware/before"))
        .unwrap();
    assert_eq!(
        response.body(),
        "/with-group-middleware/before\
         ;group-middleware-before,pre-handle\
         ;all-middleware,pre-handle\
         ;all-middleware,post-handle\
         ;group-middleware-before,post-handle"
    );
    assert_lifecycle(&tracing, 2);
}

#[test]
fn test_route_without_middleware_after_generic_middleware() {
    let router = layered_router();
    let tracing = TestTracing::init();

    let response = router
        .handle(request("GET", "/without-route-middleware/after"))
        .unwrap();
    assert_eq!(
        response.body(),
        "/without-route-middleware/after;all-middleware,pre-handle;all-middleware,post-handle"
    );
    assert_lifecycle(&tracing, 1);
}

#[test]
fn test_route_with_middleware_after_generic_middleware() {
    let router = layered_router();
    let tracing = TestTracing::init();

    let response = router
        .handle(request("GET", "/with-route-middleware/after"))
        .unwrap();
    assert_eq!(
        response.body(),
        "/with-route-middleware/after\
         ;all-middleware,pre-handle\
         ;route-middleware-after,pre-handle\
         ;route-middleware-after,post-handle\
         ;all-middleware,post-handle"
    );
    assert_lifecycle(&tracing, 2);
}

#[test]
fn test_group_without_middleware_after_generic_middleware() {
    let router = layered_router();
    let tracing = TestTracing::init();

    let response = router
        .handle(request("GET", "/without-group-middleware/after"))
        .unwrap();
    assert_eq!(
        response.body(),
        "/without-group-middleware/after;all-middleware,pre-handle;all-middleware,post-handle"
    );
    assert_lifecycle(&tracing, 1);
}

#[test]
fn test_group_with_middleware_after_generic_middleware() {
    let router = layered_router();
    let tracing = TestTracing::init();

    let response = router
        .handle(request("GET", "/with-group-middleware/after"))
        .unwrap();
    assert_eq!(
        response.body(),
        "/with-group-middleware/after\
         ;all-middleware,pre-handle\
         ;group-middleware-after,pre-handle\
         ;group-middleware-after,post-handle\
         ;all-middleware,post-handle"
    );
    assert_lifecycle(&tracing, 2);
}

#[test]
fn test_group_middleware_added_after_subgroup() {
    let mut router = Router::new();
    let api = router.add_group("/api");
    api.add_group("/v1")
        .add_route(RequestMethod::Get, "/items", echo());
    api.add_middleware(Tag("api"));
    router.add_middleware(Tag("outer"));

    let response = router.handle(request("GET", "/api/v1/items")).unwrap();
    assert_eq!(
        response.body(),
        "/api/v1/items;api,pre-handle;outer,pre-handle;outer,post-handle;api,post-handle"
    );
}

#[test]
fn test_middleware_short_circuits_chain() {
    use layered_router::middleware::middleware_fn;
    use layered_router::{Response, ResponseExt};

    let mut router = Router::new();
    router
        .add_route(RequestMethod::Get, "/guarded", echo())
        .add_middleware(
            middleware_fn(|_req, _next| {
                Ok(Response::new(String::new()).with_status(StatusCode::FORBIDDEN, "Forbidden"))
            })
            .named("deny"),
        )
        .add_middleware(Tag("never"));

    let tracing = TestTracing::init();
    let response = router.handle(request("GET", "/guarded")).unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.body().is_empty());
    assert_eq!(
        tracing.lifecycle(),
        vec!["Router request", "Executing middleware", "Router response"]
    );
}
