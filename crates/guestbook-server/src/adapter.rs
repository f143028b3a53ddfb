//! Composable request adapters.
//!
//! An [`Adapter`] wraps a handler with additional behavior and returns a new
//! handler; [`adapt`] folds an ordered list of adapters around a terminal
//! handler.  Handlers are boxed tower services, so the chain composes with
//! everything else in the axum/tower ecosystem.
//!
//! The one production adapter, [`WithSession`], opens a store session for
//! each request, attaches it to the request's extensions, and releases it
//! after the inner handler has returned.  Extensions die with the request,
//! so the per-request association cannot leak into any other request.

use std::convert::Infallible;

use axum::extract::Request;
use axum::response::Response;
use tower::util::BoxCloneService;
use tower::{service_fn, ServiceExt};

use guestbook_store::Store;

/// A request handler, boxed so adapters can wrap it uniformly.
pub type BoxHandler = BoxCloneService<Request, Response, Infallible>;

/// Wraps a handler with cross-cutting behavior, returning a new handler.
pub trait Adapter: Send + Sync {
    fn wrap(&self, next: BoxHandler) -> BoxHandler;
}

/// Compose `adapters` around `handler`.
///
/// The first adapter in the slice becomes the outermost wrapper: it sees
/// the raw request first and the final response last.
pub fn adapt(handler: BoxHandler, adapters: &[Box<dyn Adapter>]) -> BoxHandler {
    adapters
        .iter()
        .rev()
        .fold(handler, |inner, adapter| adapter.wrap(inner))
}

/// Adapter that scopes a store session to each request.
pub struct WithSession {
    store: Store,
}

impl WithSession {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Adapter for WithSession {
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        let store = self.store.clone();
        BoxCloneService::new(service_fn(move |mut req: Request| {
            let session = store.session();
            req.extensions_mut().insert(session.clone());
            let next = next.clone();
            async move {
                let response = next.oneshot(req).await;
                // The session is released here, after the inner handler has
                // returned -- success or error alike.
                drop(session);
                response
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use guestbook_store::Session;

    fn ok_terminal(trace: Arc<Mutex<Vec<&'static str>>>) -> BoxHandler {
        BoxCloneService::new(service_fn(move |_req: Request| {
            trace.lock().unwrap().push("terminal");
            async move { Ok::<_, Infallible>(StatusCode::OK.into_response()) }
        }))
    }

    struct Tag {
        name: &'static str,
        trace: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Adapter for Tag {
        fn wrap(&self, next: BoxHandler) -> BoxHandler {
            let name = self.name;
            let trace = Arc::clone(&self.trace);
            BoxCloneService::new(service_fn(move |req: Request| {
                trace.lock().unwrap().push(name);
                let next = next.clone();
                async move { next.oneshot(req).await }
            }))
        }
    }

    fn empty_request() -> Request {
        axum::http::Request::builder()
            .uri("/comments")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_adapter_is_outermost() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let adapters: Vec<Box<dyn Adapter>> = vec![
            Box::new(Tag {
                name: "outer",
                trace: Arc::clone(&trace),
            }),
            Box::new(Tag {
                name: "inner",
                trace: Arc::clone(&trace),
            }),
        ];
        let handler = adapt(ok_terminal(Arc::clone(&trace)), &adapters);

        let response = handler.oneshot(empty_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*trace.lock().unwrap(), ["outer", "inner", "terminal"]);
    }

    #[tokio::test]
    async fn test_no_adapters_is_just_the_handler() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let handler = adapt(ok_terminal(Arc::clone(&trace)), &[]);

        let response = handler.oneshot(empty_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*trace.lock().unwrap(), ["terminal"]);
    }

    #[tokio::test]
    async fn test_with_session_attaches_and_releases() {
        let store = Store::in_memory();
        let saw_session = Arc::new(Mutex::new(false));

        let seen = Arc::clone(&saw_session);
        let terminal = BoxCloneService::new(service_fn(move |req: Request| {
            *seen.lock().unwrap() = req.extensions().get::<Session>().is_some();
            async move { Ok::<_, Infallible>(StatusCode::OK.into_response()) }
        }));

        let adapters: Vec<Box<dyn Adapter>> = vec![Box::new(WithSession::new(store.clone()))];
        let handler = adapt(terminal, &adapters);

        handler.oneshot(empty_request()).await.unwrap();

        assert!(*saw_session.lock().unwrap());
        assert_eq!(store.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_session_released_on_error_response() {
        let store = Store::in_memory();

        let terminal = BoxCloneService::new(service_fn(|_req: Request| async move {
            Ok::<_, Infallible>(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }));

        let adapters: Vec<Box<dyn Adapter>> = vec![Box::new(WithSession::new(store.clone()))];
        let handler = adapt(terminal, &adapters);

        let response = handler.oneshot(empty_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.active_sessions(), 0);
    }
}
