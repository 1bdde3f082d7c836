//! In-memory `database-adapter` module.
//!
//! Backs the admin scaffold with a seeded, non-persistent store so the full
//! schema-to-CRUD flow works without any external database. On load the
//! module registers [`MockDataProvider`] under the `database-adapter`
//! capability and publishes the introspected schema to the
//! `database.schema` state key.
//!
//! Everything lives in process memory and is lost on restart.

use async_trait::async_trait;
use formwork_runtime::{Capability, CmsModule, DATABASE_ADAPTER, ModuleContext};
use formwork_types::{
    DataProvider, DeleteAck, Entity, Error, Field, FindQuery, FindResult, ModuleManifest,
    PaginatedResponse, Result, Schema, SortDirection,
};
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

const DEFAULT_LIMIT: u64 = 10;

/// The seeded demo schema: a `users` entity and a `posts` entity related
/// through `authorId`.
pub fn default_schema() -> Schema {
    Schema::new(vec![
        Entity::new(
            "users",
            vec![
                Field::number("id").required(),
                Field::text("name").label("Full Name").required().min_length(2),
                Field::text("email").label("Email Address").required(),
                Field::boolean("isActive").label("Active User"),
                Field::select(
                    "role",
                    vec!["admin".into(), "editor".into(), "viewer".into()],
                ),
            ],
        ),
        Entity::new(
            "posts",
            vec![
                Field::number("id").required(),
                Field::text("title").required(),
                Field::text("content"),
                Field::date("publishedAt"),
                Field::relation("authorId", "users", "name"),
            ],
        ),
    ])
}

fn default_tables() -> HashMap<String, Vec<Value>> {
    HashMap::from([
        (
            "users".to_string(),
            vec![
                json!({"id": 1, "name": "Alice Admin", "email": "alice@example.com", "isActive": true, "role": "admin"}),
                json!({"id": 2, "name": "Bob Builder", "email": "bob@example.com", "isActive": false, "role": "editor"}),
            ],
        ),
        (
            "posts".to_string(),
            vec![
                json!({"id": 1, "title": "Hello World", "content": "First post", "publishedAt": "2023-01-01", "authorId": 1}),
            ],
        ),
    ])
}

/// In-memory [`DataProvider`] with equality filters, case-insensitive
/// full-text `q`, `field:asc|desc` sorting, and 1-based pagination.
///
/// Unknown entities behave like empty tables on the read path (matching how
/// an admin UI probes resources); `create` materializes the table.
pub struct MockDataProvider {
    schema: Schema,
    tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl MockDataProvider {
    /// Provider seeded with the demo users/posts data.
    pub fn new() -> Self {
        Self::with_seed(default_schema(), default_tables())
    }

    /// Provider over a caller-supplied schema and table set.
    pub fn with_seed(schema: Schema, tables: HashMap<String, Vec<Value>>) -> Self {
        Self {
            schema,
            tables: RwLock::new(tables),
        }
    }
}

impl Default for MockDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataProvider for MockDataProvider {
    async fn introspect(&self) -> Result<Schema> {
        Ok(self.schema.clone())
    }

    async fn find(&self, entity: &str, query: FindQuery) -> Result<FindResult> {
        let mut rows = {
            let tables = self.tables.read().expect("mock tables poisoned");
            tables.get(entity).cloned().unwrap_or_default()
        };

        rows.retain(|row| {
            query
                .filter
                .iter()
                .all(|(field, want)| row.get(field).is_some_and(|have| loose_eq(have, want)))
        });

        if let Some(q) = &query.q {
            let needle = q.to_lowercase();
            rows.retain(|row| {
                row.as_object().is_some_and(|obj| {
                    obj.values().any(|v| {
                        v.as_str()
                            .is_some_and(|s| s.to_lowercase().contains(&needle))
                    })
                })
            });
        }

        if let Some(sort) = &query.sort {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let total = rows.len() as u64;
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
        let start = (page - 1).saturating_mul(limit) as usize;
        let data: Vec<Value> = rows
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();

        Ok(FindResult::Page(PaginatedResponse {
            data,
            total,
            page,
            limit,
        }))
    }

    async fn find_by_id(&self, entity: &str, id: &Value) -> Result<Option<Value>> {
        let tables = self.tables.read().expect("mock tables poisoned");
        Ok(tables
            .get(entity)
            .and_then(|rows| rows.iter().find(|row| id_matches(row, id)).cloned()))
    }

    async fn create(&self, entity: &str, data: Value) -> Result<Value> {
        let Value::Object(mut record) = data else {
            return Err(Error::Provider(format!(
                "create expects a JSON object for entity '{entity}'"
            )));
        };

        let mut tables = self.tables.write().expect("mock tables poisoned");
        let table = tables.entry(entity.to_string()).or_default();
        let next_id = table
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;
        record.insert("id".to_string(), json!(next_id));

        let record = Value::Object(record);
        table.push(record.clone());
        Ok(record)
    }

    async fn update(&self, entity: &str, id: &Value, data: Value) -> Result<Value> {
        let Value::Object(patch) = data else {
            return Err(Error::Provider(format!(
                "update expects a JSON object for entity '{entity}'"
            )));
        };

        let mut tables = self.tables.write().expect("mock tables poisoned");
        let rows = tables
            .get_mut(entity)
            .ok_or_else(|| Error::UnknownEntity(entity.to_string()))?;
        let row = rows
            .iter_mut()
            .find(|row| id_matches(row, id))
            .ok_or_else(|| Error::NotFound {
                entity: entity.to_string(),
                id: value_to_string(id),
            })?;

        if let Value::Object(fields) = row {
            for (key, value) in patch {
                // The id is provider-assigned and not patchable
                if key != "id" {
                    fields.insert(key, value);
                }
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, entity: &str, id: &Value) -> Result<DeleteAck> {
        let mut tables = self.tables.write().expect("mock tables poisoned");
        let removed = match tables.get_mut(entity) {
            Some(rows) => {
                let before = rows.len();
                rows.retain(|row| !id_matches(row, id));
                rows.len() < before
            }
            None => false,
        };
        Ok(DeleteAck { success: removed })
    }
}

fn id_matches(row: &Value, id: &Value) -> bool {
    row.get("id").is_some_and(|have| loose_eq(have, id))
}

/// Equality that tolerates the string-typed values HTTP query and path
/// parameters arrive as ("1" matches 1, "true" matches true).
fn loose_eq(have: &Value, want: &Value) -> bool {
    if have == want {
        return true;
    }
    match want {
        Value::String(s) => value_to_string(have) == *s,
        _ => false,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(0.0)
            .total_cmp(&y.as_f64().unwrap_or(0.0)),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(_), Some(_)) | (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
    }
}

/// Module wrapper: registers the provider and broadcasts the schema.
pub struct MockDbModule;

#[async_trait]
impl CmsModule for MockDbModule {
    fn manifest(&self) -> ModuleManifest {
        ModuleManifest::new("mock-db", "0.1.0")
            .provides(["database-adapter", "introspection"])
            .publishes("database.schema", "The current database schema")
    }

    async fn load(&self, context: &ModuleContext) -> anyhow::Result<()> {
        let provider = Arc::new(MockDataProvider::new());
        context.register(DATABASE_ADAPTER, Capability::DataProvider(provider.clone()));

        let schema = provider.introspect().await?;
        context.publish("database.schema", serde_json::to_value(&schema)?);

        info!(entities = schema.entities.len(), "mock database registered");
        Ok(())
    }
}
