use serde::{Deserialize, Serialize};

/// Caller-supplied overrides when initiating a payment.
///
/// Absent values are filled in by the provider's configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// A payment request minted by a `payment-provider`, handed to a wallet
/// signer (Solana/EVM) by the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub order_id: String,
    pub payment_address: String,
    pub amount: f64,
    pub currency: String,
    pub network: String,
    pub nonce: String,
}

/// Outcome of checking a submitted transaction against an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub transaction_hash: String,
    pub order_id: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Failed,
}
