//! Transaction defaults.
//!
//! A [`TransactionConfig`] holds the gas and expiry settings every new
//! transaction starts from. It loads from JSON, and any field left out of
//! the document keeps its default.
//!
//! ```rust
//! use aptos_txn_core::config::TransactionConfig;
//! use aptos_txn_core::types::ChainId;
//!
//! let config = TransactionConfig::from_json_str(r#"{ "gas_unit_price": 150 }"#).unwrap();
//! assert_eq!(config.gas_unit_price, 150);
//! assert_eq!(config.max_gas_amount, 200_000);
//! assert_eq!(config.chain_id, ChainId::Testnet);
//! ```

use crate::error::{AptosError, AptosResult};
use crate::types::ChainId;
use serde::{Deserialize, Serialize};

/// Default maximum gas amount.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 200_000;
/// Default gas unit price in octas.
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 100;
/// Default transaction expiration time in seconds.
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 600;

/// Gas and expiry settings applied to new transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Maximum gas units a transaction may consume.
    pub max_gas_amount: u64,
    /// Price per gas unit in octas.
    pub gas_unit_price: u64,
    /// Seconds from build time until the transaction expires.
    pub expiration_secs: u64,
    /// The target network.
    pub chain_id: ChainId,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            expiration_secs: DEFAULT_EXPIRATION_SECONDS,
            chain_id: ChainId::default(),
        }
    }
}

impl TransactionConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> AptosResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings no transaction could be built with.
    pub fn validate(&self) -> AptosResult<()> {
        if self.max_gas_amount == 0 {
            return Err(AptosError::Config("max_gas_amount must be positive".into()));
        }
        if self.expiration_secs == 0 {
            return Err(AptosError::Config("expiration_secs must be positive".into()));
        }
        Ok(())
    }

    /// Sets the maximum gas amount.
    #[must_use]
    pub fn with_max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = max_gas_amount;
        self
    }

    /// Sets the gas unit price.
    #[must_use]
    pub fn with_gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = gas_unit_price;
        self
    }

    /// Sets the expiration window in seconds.
    #[must_use]
    pub fn with_expiration_secs(mut self, expiration_secs: u64) -> Self {
        self.expiration_secs = expiration_secs;
        self
    }

    /// Sets the target network.
    #[must_use]
    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = chain_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransactionConfig::default();
        assert_eq!(config.max_gas_amount, 200_000);
        assert_eq!(config.gas_unit_price, 100);
        assert_eq!(config.expiration_secs, 600);
        assert_eq!(config.chain_id, ChainId::Testnet);
    }

    #[test]
    fn test_partial_json() {
        let config = TransactionConfig::from_json_str(r#"{"chain_id": 1, "expiration_secs": 30}"#)
            .unwrap();
        assert_eq!(config.chain_id, ChainId::Mainnet);
        assert_eq!(config.expiration_secs, 30);
        assert_eq!(config.gas_unit_price, DEFAULT_GAS_UNIT_PRICE);

        let empty = TransactionConfig::from_json_str("{}").unwrap();
        assert_eq!(empty, TransactionConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            TransactionConfig::from_json_str("{"),
            Err(AptosError::Json(_))
        ));
        assert!(matches!(
            TransactionConfig::from_json_str(r#"{"max_gas_amount": 0}"#),
            Err(AptosError::Config(_))
        ));
    }

    #[test]
    fn test_builder_setters() {
        let config = TransactionConfig::default()
            .with_max_gas_amount(5_000)
            .with_gas_unit_price(150)
            .with_expiration_secs(60)
            .with_chain_id(ChainId::Localnet);
        assert_eq!(config.max_gas_amount, 5_000);
        assert_eq!(config.gas_unit_price, 150);
        assert_eq!(config.expiration_secs, 60);
        assert_eq!(config.chain_id, ChainId::Localnet);

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(TransactionConfig::from_json_str(&json).unwrap(), config);
    }
}
