//! Core type definitions for Formwork.
//!
//! This crate defines the backend-agnostic contracts that every Formwork
//! module and UI layer depends on:
//! - [`Schema`], [`Entity`], [`Field`] — the abstract vocabulary describing a
//!   data collection and its attributes, independent of storage backend
//! - [`ModuleManifest`] — static metadata describing a module's identity,
//!   capabilities, and compatibility hints
//! - [`DataProvider`], [`RouteProvider`], [`PaymentProvider`] — the
//!   capability contracts resolved by name at module load time
//! - [`FindQuery`] / [`PaginatedResponse`] — the query and pagination shapes
//!   shared by providers and route handlers
//! - [`RouteDefinition`] — transport-agnostic route descriptions an external
//!   HTTP binding turns into real endpoints
//!
//! All domain-specific behavior (storage, rendering, transport) belongs in
//! modules, not here.

mod manifest;
mod payment;
mod provider;
mod query;
mod routes;
mod schema;

pub use manifest::{ModuleManifest, Pairing, PairingStrength};
pub use payment::{PaymentIntent, PaymentOptions, PaymentStatus, PaymentVerification};
pub use provider::{DataProvider, PaymentProvider, RouteProvider};
pub use query::{DeleteAck, FindQuery, FindResult, PaginatedResponse, SortDirection, SortSpec};
pub use routes::{HttpMethod, RouteDefinition, RouteFuture, RouteHandler, RouteRequest, RouteResponse};
pub use schema::{Entity, Field, FieldConstraints, FieldRelation, FieldType, Schema, SchemaError};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by provider implementations and contract helpers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("record not found: {entity}/{id}")]
    NotFound { entity: String, id: String },

    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("invalid sort spec: {0}")]
    InvalidSort(String),

    #[error("provider error: {0}")]
    Provider(String),
}
