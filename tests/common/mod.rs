#![allow(dead_code)]

pub mod capture {
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    /// One captured event.
    #[derive(Debug, Clone)]
    pub struct Record {
        pub level: Level,
        pub message: String,
        pub fields: HashMap<String, String>,
    }

    impl Record {
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    #[derive(Default)]
    struct FieldVisitor {
        message: String,
        fields: HashMap<String, String>,
    }

    impl Visit for FieldVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.record(field, value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.record(field, format!("{value:?}"));
        }
    }

    impl FieldVisitor {
        fn record(&mut self, field: &Field, value: String) {
            if field.name() == "message" {
                self.message = value;
            } else {
                self.fields.insert(field.name().to_string(), value);
            }
        }
    }

    struct CaptureLayer {
        records: Arc<Mutex<Vec<Record>>>,
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = FieldVisitor::default();
            event.record(&mut visitor);
            self.records.lock().unwrap().push(Record {
                level: *event.metadata().level(),
                message: visitor.message,
                fields: visitor.fields,
            });
        }
    }

    /// Captures every event on the current thread while alive.
    pub struct TestTracing {
        records: Arc<Mutex<Vec<Record>>>,
        _guard: tracing::subscriber::DefaultGuard,
    }

    impl TestTracing {
        pub fn init() -> Self {
            let records = Arc::new(Mutex::new(Vec::new()));
            let layer = CaptureLayer {
                records: Arc::clone(&records),
            };
            let subscriber = Registry::default().with(layer);
            let guard = tracing::subscriber::set_default(subscriber);
            Self {
                records,
                _guard: guard,
            }
        }

        pub fn records(&self) -> Vec<Record> {
            self.records.lock().unwrap().clone()
        }

        /// Messages of the per-request lifecycle, without matcher compilation.
        pub fn lifecycle(&self) -> Vec<String> {
            self.records()
                .into_iter()
                .filter(|r| r.message != "Routing table compiled")
                .map(|r| r.message)
                .collect()
        }

        pub fn with_message(&self, message: &str) -> Vec<Record> {
            self.records()
                .into_iter()
                .filter(|r| r.message == message)
                .collect()
        }

        pub fn clear(&self) {
            self.records.lock().unwrap().clear();
        }
    }
}

pub mod fixtures {
    use layered_router::handler::{handler_fn, Handler};
    use layered_router::message::{Request, RequestExt, Response, ResponseExt};
    use layered_router::middleware::Middleware;

    /// Trail of `;tag,pre-handle` markers left on the request by [`Tag`].
    #[derive(Debug, Clone, Default)]
    pub struct Trail(pub String);

    /// Marks the request on the way in and the response body on the way out.
    pub struct Tag(pub &'static str);

    impl Middleware for Tag {
        fn process(&self, request: Request, next: &dyn Handler) -> anyhow::Result<Response> {
            let mut trail = request.attribute::<Trail>().cloned().unwrap_or_default();
            trail.0.push_str(&format!(";{},pre-handle", self.0));

            let response = next.handle(request.with_attribute(trail))?;
            let body = format!("{};{},post-handle", response.body(), self.0);
            Ok(response.with_body(body))
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    /// Answers 200 with the request path followed by the middleware trail.
    pub fn echo() -> impl Handler {
        handler_fn(|req| {
            let trail = req
                .attribute::<Trail>()
                .map(|t| t.0.clone())
                .unwrap_or_default();
            Ok(Response::new(format!("{}{}", req.uri().path(), trail)))
        })
        .named("echo")
    }

    pub fn request(method: &str, path: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(path)
            .body(String::new())
            .unwrap()
    }
}
