//! Mock `payment-provider` module.
//!
//! Stands in for a real crypto payment backend during development: mints
//! deterministic payment intents (uuid nonces aside) and verifies any
//! non-empty transaction hash. Wallet signing and on-chain verification are
//! external collaborators reached through the same [`PaymentProvider`]
//! contract, so swapping this module for a real one changes no consumer.

use async_trait::async_trait;
use formwork_runtime::{Capability, CmsModule, ModuleContext, PAYMENT_PROVIDER};
use formwork_types::{
    Error, ModuleManifest, PaymentIntent, PaymentOptions, PaymentProvider, PaymentStatus,
    PaymentVerification, Result,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Module config, read from the loader's per-module config value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentsConfig {
    pub network: String,
    pub currency: String,
    pub payment_address: String,
    /// Used when the caller does not pass an amount.
    pub default_amount: f64,
    /// When false, verifications of well-formed hashes report `pending`
    /// instead of `confirmed`, mimicking a chain that has not finalized.
    pub auto_confirm: bool,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            network: "solana-devnet".into(),
            currency: "SOL".into(),
            payment_address: "FoRmWoRkDemoPayment1111111111111111111111111".into(),
            default_amount: 0.1,
            auto_confirm: true,
        }
    }
}

/// Mock [`PaymentProvider`] driven entirely by its config.
pub struct MockPaymentProvider {
    config: PaymentsConfig,
}

impl MockPaymentProvider {
    pub fn new(config: PaymentsConfig) -> Self {
        Self { config }
    }
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new(PaymentsConfig::default())
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn initiate_payment(
        &self,
        order_id: &str,
        options: PaymentOptions,
    ) -> Result<PaymentIntent> {
        if order_id.is_empty() {
            return Err(Error::Provider("order id must not be empty".into()));
        }
        Ok(PaymentIntent {
            order_id: order_id.to_string(),
            payment_address: self.config.payment_address.clone(),
            amount: options.amount.unwrap_or(self.config.default_amount),
            currency: options
                .currency
                .unwrap_or_else(|| self.config.currency.clone()),
            network: self.config.network.clone(),
            nonce: Uuid::new_v4().simple().to_string(),
        })
    }

    async fn verify_payment(
        &self,
        transaction_hash: &str,
        order_id: &str,
    ) -> Result<PaymentVerification> {
        let status = if transaction_hash.is_empty() {
            PaymentStatus::Failed
        } else if self.config.auto_confirm {
            PaymentStatus::Confirmed
        } else {
            PaymentStatus::Pending
        };
        Ok(PaymentVerification {
            transaction_hash: transaction_hash.to_string(),
            order_id: order_id.to_string(),
            status,
        })
    }
}

/// Module wrapper: reads its config and registers the provider.
pub struct PaymentsModule;

#[async_trait]
impl CmsModule for PaymentsModule {
    fn manifest(&self) -> ModuleManifest {
        ModuleManifest::new("crypto-payments", "0.1.0").provides(["payment-provider"])
    }

    async fn load(&self, context: &ModuleContext) -> anyhow::Result<()> {
        let config: PaymentsConfig = context.config_as()?;
        info!(network = %config.network, currency = %config.currency, "payment provider registered");

        context.register(
            PAYMENT_PROVIDER,
            Capability::PaymentProvider(Arc::new(MockPaymentProvider::new(config))),
        );
        Ok(())
    }
}
