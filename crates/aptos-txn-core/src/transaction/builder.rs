//! Transaction builder.

use crate::account::Account;
use crate::config::TransactionConfig;
use crate::error::{AptosError, AptosResult};
use crate::transaction::authenticator::TransactionAuthenticator;
use crate::transaction::payload::TransactionPayload;
use crate::transaction::types::{RawTransaction, RawTransactionWithData, SignedTransaction};
use crate::types::{AccountAddress, ChainId};
use std::time::{SystemTime, UNIX_EPOCH};

/// A builder for constructing raw transactions.
///
/// Gas, expiry and chain settings start from a [`TransactionConfig`];
/// sender, sequence number and payload must always be set.
///
/// # Example
///
/// ```rust
/// use aptos_txn_core::codec::BcsCodec;
/// use aptos_txn_core::transaction::{EntryFunction, TransactionBuilder};
/// use aptos_txn_core::types::{AccountAddress, ChainId};
///
/// let payload = EntryFunction::from_function_id(
///     "0x1::aptos_account::transfer",
///     vec![],
///     vec![AccountAddress::TWO.to_bcs().unwrap(), 1000u64.to_bcs().unwrap()],
/// )
/// .unwrap();
///
/// let txn = TransactionBuilder::new()
///     .sender(AccountAddress::ONE)
///     .sequence_number(0)
///     .payload(payload.into())
///     .chain_id(ChainId::Testnet)
///     .build()
///     .unwrap();
/// assert_eq!(txn.max_gas_amount, 200_000);
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    sender: Option<AccountAddress>,
    sequence_number: Option<u64>,
    payload: Option<TransactionPayload>,
    max_gas_amount: u64,
    gas_unit_price: u64,
    expiration_secs: u64,
    expiration_timestamp_secs: Option<u64>,
    chain_id: ChainId,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&TransactionConfig::default())
    }

    /// Creates a builder seeded from `config`.
    #[must_use]
    pub fn from_config(config: &TransactionConfig) -> Self {
        Self {
            sender: None,
            sequence_number: None,
            payload: None,
            max_gas_amount: config.max_gas_amount,
            gas_unit_price: config.gas_unit_price,
            expiration_secs: config.expiration_secs,
            expiration_timestamp_secs: None,
            chain_id: config.chain_id,
        }
    }

    /// Sets the sender address.
    #[must_use]
    pub fn sender(mut self, sender: AccountAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Sets the sequence number.
    #[must_use]
    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    /// Sets the transaction payload.
    #[must_use]
    pub fn payload(mut self, payload: TransactionPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the maximum gas amount.
    #[must_use]
    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = max_gas_amount;
        self
    }

    /// Sets the gas unit price in octas.
    #[must_use]
    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = gas_unit_price;
        self
    }

    /// Sets an absolute expiration timestamp in seconds since Unix epoch.
    #[must_use]
    pub fn expiration_timestamp_secs(mut self, expiration_timestamp_secs: u64) -> Self {
        self.expiration_timestamp_secs = Some(expiration_timestamp_secs);
        self
    }

    /// Sets the expiration time relative to now.
    #[must_use]
    pub fn expiration_from_now(mut self, seconds: u64) -> Self {
        self.expiration_timestamp_secs = Some(now_secs().saturating_add(seconds));
        self
    }

    /// Sets the chain ID.
    #[must_use]
    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Builds the raw transaction.
    ///
    /// Without an explicit expiration the configured window is counted
    /// from now.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender, sequence number or payload is
    /// missing.
    pub fn build(self) -> AptosResult<RawTransaction> {
        let sender = self
            .sender
            .ok_or_else(|| AptosError::transaction("sender is required"))?;
        let sequence_number = self
            .sequence_number
            .ok_or_else(|| AptosError::transaction("sequence_number is required"))?;
        let payload = self
            .payload
            .ok_or_else(|| AptosError::transaction("payload is required"))?;
        let expiration_timestamp_secs = self
            .expiration_timestamp_secs
            .unwrap_or_else(|| now_secs().saturating_add(self.expiration_secs));

        Ok(RawTransaction::new(
            sender,
            sequence_number,
            payload,
            self.max_gas_amount,
            self.gas_unit_price,
            expiration_timestamp_secs,
            self.chain_id,
        ))
    }

    /// Builds a multi-agent transaction with the given secondary signers.
    ///
    /// # Errors
    ///
    /// Fails like [`build`](Self::build).
    pub fn build_multi_agent(
        self,
        secondary_signers: Vec<AccountAddress>,
    ) -> AptosResult<RawTransactionWithData> {
        Ok(RawTransactionWithData::new_multi_agent(
            self.build()?,
            secondary_signers,
        ))
    }

    /// Builds a fee-payer transaction. A missing fee payer is recorded as
    /// `0x0` and can be set later with
    /// [`RawTransactionWithData::set_fee_payer`].
    ///
    /// # Errors
    ///
    /// Fails like [`build`](Self::build).
    pub fn build_fee_payer(
        self,
        secondary_signers: Vec<AccountAddress>,
        fee_payer: Option<AccountAddress>,
    ) -> AptosResult<RawTransactionWithData> {
        Ok(RawTransactionWithData::new_fee_payer(
            self.build()?,
            secondary_signers,
            fee_payer,
        ))
    }
}

/// Signs a raw transaction with a single account.
///
/// # Errors
///
/// Returns an error if generating the signing message fails or if the account fails to sign.
pub fn sign_transaction(
    raw_txn: &RawTransaction,
    account: &dyn Account,
) -> AptosResult<SignedTransaction> {
    let authenticator = account.sign(&raw_txn.signing_message()?)?;
    Ok(SignedTransaction::new(
        raw_txn.clone(),
        TransactionAuthenticator::single_sender(authenticator),
    ))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Ed25519Account, MultiKeyAccount};
    use crate::crypto::{AnyPrivateKey, Ed25519PrivateKey, Secp256k1PrivateKey};
    use crate::transaction::payload::{Script, ScriptArgument};

    fn payload() -> TransactionPayload {
        Script::new(vec![0xa1, 0x1c, 0xeb, 0x0b], vec![], vec![ScriptArgument::U64(4)]).into()
    }

    #[test]
    fn test_builder_missing_fields() {
        let err = TransactionBuilder::new()
            .sequence_number(0)
            .payload(payload())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("sender"));

        let err = TransactionBuilder::new()
            .sender(AccountAddress::ONE)
            .payload(payload())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("sequence_number"));

        let err = TransactionBuilder::new()
            .sender(AccountAddress::ONE)
            .sequence_number(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, AptosError::Transaction(_)));
    }

    #[test]
    fn test_builder_uses_config() {
        let config = TransactionConfig::default()
            .with_max_gas_amount(10_000)
            .with_gas_unit_price(150)
            .with_expiration_secs(30)
            .with_chain_id(ChainId::Mainnet);
        let before = now_secs();
        let txn = TransactionBuilder::from_config(&config)
            .sender(AccountAddress::ONE)
            .sequence_number(3)
            .payload(payload())
            .build()
            .unwrap();
        assert_eq!(txn.max_gas_amount, 10_000);
        assert_eq!(txn.gas_unit_price, 150);
        assert_eq!(txn.chain_id, ChainId::Mainnet);
        assert!(txn.expiration_timestamp_secs >= before + 30);
        assert!(txn.expiration_timestamp_secs <= now_secs() + 30);
    }

    #[test]
    fn test_explicit_expiration_wins() {
        let txn = TransactionBuilder::new()
            .sender(AccountAddress::ONE)
            .sequence_number(0)
            .payload(payload())
            .expiration_timestamp_secs(42)
            .build()
            .unwrap();
        assert_eq!(txn.expiration_timestamp_secs, 42);
    }

    #[test]
    fn test_build_fee_payer_placeholder() {
        let data = TransactionBuilder::new()
            .sender(AccountAddress::ONE)
            .sequence_number(0)
            .payload(payload())
            .build_fee_payer(vec![AccountAddress::TWO], None)
            .unwrap();
        assert_eq!(data.fee_payer_address(), Some(AccountAddress::ZERO));
        assert_eq!(data.secondary_signer_addresses(), &[AccountAddress::TWO]);

        let data = TransactionBuilder::new()
            .sender(AccountAddress::ONE)
            .sequence_number(0)
            .payload(payload())
            .build_multi_agent(vec![AccountAddress::TWO, AccountAddress::THREE])
            .unwrap();
        assert_eq!(data.fee_payer_address(), None);
        assert_eq!(data.secondary_signer_addresses().len(), 2);
    }

    #[test]
    fn test_sign_transaction_variants() {
        let ed = Ed25519Account::generate();
        let raw = TransactionBuilder::new()
            .sender(ed.address())
            .sequence_number(0)
            .payload(payload())
            .build()
            .unwrap();
        let signed = sign_transaction(&raw, &ed).unwrap();
        assert_eq!(signed.authenticator.kind(), "ed25519");
        assert!(signed.verify_signature());

        let keys: Vec<AnyPrivateKey> = vec![
            Ed25519PrivateKey::generate().into(),
            Secp256k1PrivateKey::generate().into(),
        ];
        let multi = MultiKeyAccount::new(keys, 2).unwrap();
        let raw = TransactionBuilder::new()
            .sender(multi.address())
            .sequence_number(0)
            .payload(payload())
            .build()
            .unwrap();
        let signed = sign_transaction(&raw, &multi).unwrap();
        assert_eq!(signed.authenticator.kind(), "single_sender");
        assert!(signed.verify_signature());
    }
}
