use crate::{
    DeleteAck, FindQuery, FindResult, PaymentIntent, PaymentOptions, PaymentVerification, Result,
    RouteDefinition, Schema,
};
use async_trait::async_trait;
use serde_json::Value;

/// The abstract backend contract registered under the `database-adapter`
/// capability name.
///
/// The runtime treats implementations as opaque: it resolves them by name
/// and assumes nothing about how (or whether) pagination, full-text search,
/// sorting, or filtering are honored.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Describe the backend's entities. Consumers treat the returned schema
    /// as an immutable snapshot.
    async fn introspect(&self) -> Result<Schema>;

    /// Query records of an entity.
    async fn find(&self, entity: &str, query: FindQuery) -> Result<FindResult>;

    /// Fetch one record by id, or `None` when absent.
    async fn find_by_id(&self, entity: &str, id: &Value) -> Result<Option<Value>>;

    /// Insert a record and return it (with any provider-assigned fields).
    async fn create(&self, entity: &str, data: Value) -> Result<Value>;

    /// Apply a partial update and return the updated record.
    async fn update(&self, entity: &str, id: &Value, data: Value) -> Result<Value>;

    /// Remove a record.
    async fn delete(&self, entity: &str, id: &Value) -> Result<DeleteAck>;
}

/// Contract behind the `route-provider` capability: a module's contribution
/// of transport-agnostic routes.
pub trait RouteProvider: Send + Sync {
    fn routes(&self) -> Vec<RouteDefinition>;
}

/// Contract behind the `payment-provider` capability.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Mint a payment intent for an order.
    async fn initiate_payment(
        &self,
        order_id: &str,
        options: PaymentOptions,
    ) -> Result<PaymentIntent>;

    /// Check a submitted transaction hash against an order.
    async fn verify_payment(
        &self,
        transaction_hash: &str,
        order_id: &str,
    ) -> Result<PaymentVerification>;
}
