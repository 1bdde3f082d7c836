use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// HTTP verbs a route may bind to. Serialized uppercase (`"GET"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
    Put,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Put => "PUT",
        };
        f.write_str(s)
    }
}

/// Transport-agnostic request view handed to route handlers.
///
/// The HTTP binding collaborator fills `params` from `:param` path segments
/// and `query` from the query string.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

impl RouteRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status code plus JSON body produced by a route handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub status: u16,
    pub body: Value,
}

impl RouteResponse {
    /// 200 with a JSON body.
    pub fn json(body: impl Serialize) -> crate::Result<Self> {
        Ok(Self {
            status: 200,
            body: serde_json::to_value(body)?,
        })
    }

    /// 201 with a JSON body.
    pub fn created(body: impl Serialize) -> crate::Result<Self> {
        Ok(Self {
            status: 201,
            body: serde_json::to_value(body)?,
        })
    }

    /// 404 with `{"error": message}`.
    pub fn not_found(message: &str) -> Self {
        Self {
            status: 404,
            body: json!({ "error": message }),
        }
    }

    /// Arbitrary error status with `{"error": message}`.
    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

pub type RouteFuture = BoxFuture<'static, crate::Result<RouteResponse>>;

/// Boxed async route handler. Cloning shares the underlying closure.
pub type RouteHandler = Arc<dyn Fn(RouteRequest) -> RouteFuture + Send + Sync>;

/// One route a module contributes through the `route-provider` capability.
///
/// `middleware` holds symbolic keys the HTTP binding resolves against its own
/// middleware table; unresolved keys degrade to a logged pass-through no-op
/// on the binding side, never a failure here.
#[derive(Clone)]
pub struct RouteDefinition {
    pub method: HttpMethod,
    /// Path template, may contain `:param` segments.
    pub path: String,
    pub handler: RouteHandler,
    pub middleware: Vec<String>,
    /// Free-form metadata for bindings and tooling.
    pub meta: serde_json::Map<String, Value>,
}

impl RouteDefinition {
    pub fn new<F, Fut>(method: HttpMethod, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(RouteRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<RouteResponse>> + Send + 'static,
    {
        Self {
            method,
            path: path.into(),
            handler: Arc::new(move |req| Box::pin(handler(req))),
            middleware: Vec::new(),
            meta: serde_json::Map::new(),
        }
    }

    pub fn middleware(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.middleware = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Invoke the handler.
    pub async fn call(&self, request: RouteRequest) -> crate::Result<RouteResponse> {
        (self.handler)(request).await
    }
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("middleware", &self.middleware)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}
