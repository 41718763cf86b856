//! # Callback Middleware
//!
//! Framework-neutral form of the guard: a [`Middleware`] is built from a
//! schema, an optional explicit verb, and a violation handler, and is then
//! invoked once per request with the request, the response, and a
//! continuation.
//!
//! Exactly one of the continuation or the violation handler runs per
//! request. The handler receives the continuation too and may choose to
//! call it, e.g. to log and pass through.

use std::fmt;

use reqcheck_core::{Method, RequestData};

use crate::guard::{Guard, Verdict};
use crate::schema::Schema;

/// Continuation handed to a violation handler.
pub type Proceed<'a> = Box<dyn FnOnce() + 'a>;

type ViolationHandler<Req, Res> =
    dyn for<'a> Fn(&str, &mut Req, &mut Res, Proceed<'a>) + Send + Sync;

/// A request a [`Middleware`] can check.
pub trait GuardedRequest {
    /// The request verb.
    fn method(&self) -> Method;

    /// The request's query and body data, normalized in place.
    fn data_mut(&mut self) -> &mut RequestData;
}

/// A verb and its data, for hosts that have no request type of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainRequest {
    pub method: Method,
    pub data: RequestData,
}

impl PlainRequest {
    /// Create a request.
    pub fn new(method: Method, data: RequestData) -> Self {
        Self { method, data }
    }
}

impl GuardedRequest for PlainRequest {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn data_mut(&mut self) -> &mut RequestData {
        &mut self.data
    }
}

/// A guard paired with a violation handler.
pub struct Middleware<Req, Res> {
    guard: Guard,
    on_violation: Box<ViolationHandler<Req, Res>>,
}

impl<Req: GuardedRequest, Res> Middleware<Req, Res> {
    /// Build a middleware. `on_violation` receives the joined diagnostics.
    pub fn new<F>(schema: Schema, verb: Option<Method>, on_violation: F) -> Self
    where
        F: for<'a> Fn(&str, &mut Req, &mut Res, Proceed<'a>) + Send + Sync + 'static,
    {
        Self {
            guard: Guard::new(schema, verb),
            on_violation: Box::new(on_violation),
        }
    }

    /// The underlying guard.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    /// Check one request, then run either `proceed` or the violation handler.
    pub fn handle<'a, P>(&self, request: &mut Req, response: &mut Res, proceed: P)
    where
        P: FnOnce() + 'a,
    {
        let method = request.method();
        match self.guard.check(&method, request.data_mut()) {
            Verdict::Proceed => proceed(),
            Verdict::Violation(message) => {
                (self.on_violation)(&message, request, response, Box::new(proceed))
            }
        }
    }
}

impl<Req, Res> fmt::Debug for Middleware<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use reqcheck_core::Source;
    use serde_json::json;

    #[derive(Default)]
    struct Response {
        status: u16,
        body: String,
    }

    fn reject_with_400() -> Middleware<PlainRequest, Response> {
        Middleware::new(
            Schema::from_value(&json!(["a"])).unwrap(),
            None,
            |message, _req, res: &mut Response, _proceed| {
                res.status = 400;
                res.body = message.to_string();
            },
        )
    }

    #[test]
    fn proceeds_exactly_once_when_satisfied() {
        let mw = reject_with_400();
        let mut data = RequestData::new();
        data.insert(Source::Query, "a", "1");
        let mut req = PlainRequest::new(Method::Get, data);
        let mut res = Response::default();
        let calls = Cell::new(0);
        mw.handle(&mut req, &mut res, || calls.set(calls.get() + 1));
        assert_eq!(calls.get(), 1);
        assert_eq!(res.status, 0);
    }

    #[test]
    fn violation_handler_runs_instead_of_proceed() {
        let mw = reject_with_400();
        let mut req = PlainRequest::new(Method::Get, RequestData::new());
        let mut res = Response::default();
        let calls = Cell::new(0);
        mw.handle(&mut req, &mut res, || calls.set(calls.get() + 1));
        assert_eq!(calls.get(), 0);
        assert_eq!(res.status, 400);
        assert_eq!(res.body, "a must be given.");
    }

    #[test]
    fn handler_may_pass_through() {
        let mw: Middleware<PlainRequest, Response> = Middleware::new(
            Schema::from_value(&json!(["a"])).unwrap(),
            None,
            |_message, _req, _res, proceed| proceed(),
        );
        let mut req = PlainRequest::new(Method::Get, RequestData::new());
        let mut res = Response::default();
        let calls = Cell::new(0);
        mw.handle(&mut req, &mut res, || calls.set(calls.get() + 1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn request_data_is_normalized_before_proceeding() {
        let mw: Middleware<PlainRequest, Response> = Middleware::new(
            Schema::from_value(&json!([{ "$int": "n" }])).unwrap(),
            Some(Method::Post),
            |_, _, _, _| {},
        );
        let mut data = RequestData::new();
        data.insert(Source::Body, "n", "7");
        let mut req = PlainRequest::new(Method::Post, data);
        mw.handle(&mut req, &mut Response::default(), || {});
        assert_eq!(req.data.get(Source::Body, "n").and_then(|v| v.as_i64()), Some(7));
    }
}
