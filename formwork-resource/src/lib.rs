//! Generic CRUD routes over the `database-adapter` capability.
//!
//! On load the module resolves the data provider and registers a
//! `route-provider` capability contributing six transport-agnostic routes:
//!
//! | method | path | behavior |
//! |---|---|---|
//! | GET | `/schema` | introspected schema |
//! | GET | `/resources/:resource` | paged list; `page`/`limit`/`sort`/`q` plus residual filters |
//! | GET | `/resources/:resource/:id` | one record, 404 on miss |
//! | POST | `/resources/:resource` | create, 201 |
//! | PATCH | `/resources/:resource/:id` | partial update |
//! | DELETE | `/resources/:resource/:id` | remove |
//!
//! Every route carries the `admin-auth` middleware key for the HTTP binding
//! to resolve. When `database-adapter` is absent the module logs the problem
//! and skips registration; that is a degradation of this module only, never
//! a startup failure.

use async_trait::async_trait;
use formwork_runtime::{Capability, CmsModule, ModuleContext, ROUTE_PROVIDER};
use formwork_types::{
    DataProvider, Error, FindQuery, HttpMethod, ModuleManifest, Pairing, PairingStrength,
    RouteDefinition, RouteProvider, RouteRequest, RouteResponse, SortSpec,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::error;

const ADMIN_AUTH: &str = "admin-auth";

/// Route provider handing out a fixed route table.
struct ResourceRoutes {
    routes: Vec<RouteDefinition>,
}

impl RouteProvider for ResourceRoutes {
    fn routes(&self) -> Vec<RouteDefinition> {
        self.routes.clone()
    }
}

/// The module. Register it after a database-backing module.
pub struct ResourceModule;

#[async_trait]
impl CmsModule for ResourceModule {
    fn manifest(&self) -> ModuleManifest {
        ModuleManifest::new("resource-module", "0.1.0")
            .provides(["route-provider"])
            .requires(["database-adapter"])
            .pairs_with(
                "mock-db",
                Pairing::new(
                    "supplies the database-adapter capability these routes expose",
                    PairingStrength::Recommended,
                ),
            )
    }

    async fn load(&self, context: &ModuleContext) -> anyhow::Result<()> {
        let Some(db) = context.data_provider() else {
            error!(
                module = %context.module_name(),
                "database-adapter not found, resource routes not registered"
            );
            return Ok(());
        };

        let routes = build_routes(db);
        context.register(
            ROUTE_PROVIDER,
            Capability::RouteProvider(Arc::new(ResourceRoutes { routes })),
        );
        Ok(())
    }
}

/// Build the CRUD route table over a provider handle.
///
/// Public so embedders can mount the same table over a provider of their own
/// without going through the module loader.
pub fn build_routes(db: Arc<dyn DataProvider>) -> Vec<RouteDefinition> {
    let introspect_db = Arc::clone(&db);
    let list_db = Arc::clone(&db);
    let get_db = Arc::clone(&db);
    let create_db = Arc::clone(&db);
    let update_db = Arc::clone(&db);
    let delete_db = db;

    vec![
        RouteDefinition::new(HttpMethod::Get, "/schema", move |_req| {
            let db = Arc::clone(&introspect_db);
            async move {
                let schema = db.introspect().await?;
                RouteResponse::json(schema)
            }
        })
        .middleware([ADMIN_AUTH]),
        RouteDefinition::new(HttpMethod::Get, "/resources/:resource", move |req: RouteRequest| {
            let db = Arc::clone(&list_db);
            async move {
                let resource = require_param(&req, "resource")?;
                let query = query_from_request(&req)?;
                let result = db.find(&resource, query).await?;
                RouteResponse::json(result)
            }
        })
        .middleware([ADMIN_AUTH]),
        RouteDefinition::new(HttpMethod::Get, "/resources/:resource/:id", move |req: RouteRequest| {
            let db = Arc::clone(&get_db);
            async move {
                let resource = require_param(&req, "resource")?;
                let id = id_from_request(&req)?;
                match db.find_by_id(&resource, &id).await? {
                    Some(record) => RouteResponse::json(record),
                    None => Ok(RouteResponse::not_found("Not found")),
                }
            }
        })
        .middleware([ADMIN_AUTH]),
        RouteDefinition::new(HttpMethod::Post, "/resources/:resource", move |req: RouteRequest| {
            let db = Arc::clone(&create_db);
            async move {
                let resource = require_param(&req, "resource")?;
                let body = req.body.unwrap_or_else(|| json!({}));
                let record = db.create(&resource, body).await?;
                RouteResponse::created(record)
            }
        })
        .middleware([ADMIN_AUTH]),
        RouteDefinition::new(HttpMethod::Patch, "/resources/:resource/:id", move |req: RouteRequest| {
            let db = Arc::clone(&update_db);
            async move {
                let resource = require_param(&req, "resource")?;
                let id = id_from_request(&req)?;
                let body = req.body.unwrap_or_else(|| json!({}));
                match db.update(&resource, &id, body).await {
                    Ok(record) => RouteResponse::json(record),
                    Err(Error::NotFound { .. }) => Ok(RouteResponse::not_found("Not found")),
                    Err(err) => Err(err),
                }
            }
        })
        .middleware([ADMIN_AUTH]),
        RouteDefinition::new(HttpMethod::Delete, "/resources/:resource/:id", move |req: RouteRequest| {
            let db = Arc::clone(&delete_db);
            async move {
                let resource = require_param(&req, "resource")?;
                let id = id_from_request(&req)?;
                let ack = db.delete(&resource, &id).await?;
                RouteResponse::json(ack)
            }
        })
        .middleware([ADMIN_AUTH]),
    ]
}

fn require_param(req: &RouteRequest, name: &str) -> formwork_types::Result<String> {
    req.params
        .get(name)
        .cloned()
        .ok_or_else(|| Error::Provider(format!("missing route parameter ':{name}'")))
}

/// Path ids arrive as strings; numeric-looking ones are passed to the
/// provider as numbers so strict backends match seeded integer ids.
fn id_from_request(req: &RouteRequest) -> formwork_types::Result<Value> {
    let raw = require_param(req, "id")?;
    Ok(match raw.parse::<i64>() {
        Ok(n) => json!(n),
        Err(_) => Value::String(raw),
    })
}

/// Split the query string into the well-known find options and a residual
/// equality filter.
fn query_from_request(req: &RouteRequest) -> formwork_types::Result<FindQuery> {
    let mut query = FindQuery::default();
    for (key, value) in &req.query {
        match key.as_str() {
            "page" => query.page = value.parse().ok(),
            "limit" => query.limit = value.parse().ok(),
            "sort" => query.sort = Some(value.parse::<SortSpec>()?),
            "q" => query.q = Some(value.clone()),
            _ => {
                query.filter.insert(key.clone(), Value::String(value.clone()));
            }
        }
    }
    Ok(query)
}
