//! Authenticator collection for multi-agent and fee-payer transactions.
//!
//! Every party signs the same `RawTransactionWithData` signing message,
//! usually on different machines. [`PartiallySigned`] holds the slots
//! while the authenticators arrive and assembles the final
//! [`SignedTransaction`] once they are all present.
//!
//! # Example
//!
//! ```rust
//! use aptos_txn_core::account::{Account, Ed25519Account};
//! use aptos_txn_core::transaction::{
//!     PartiallySigned, Script, ScriptArgument, TransactionBuilder,
//! };
//!
//! let sender = Ed25519Account::generate();
//! let sponsor = Ed25519Account::generate();
//!
//! let data = TransactionBuilder::new()
//!     .sender(sender.address())
//!     .sequence_number(0)
//!     .payload(Script::new(vec![0xa1, 0x1c, 0xeb, 0x0b], vec![], vec![ScriptArgument::U64(4)]).into())
//!     .build_fee_payer(vec![], Some(sponsor.address()))
//!     .unwrap();
//!
//! let mut pending = PartiallySigned::new(data);
//! pending.sign_as_sender(&sender).unwrap();
//! pending.sign_as_fee_payer(&sponsor).unwrap();
//! let signed = pending.finish().unwrap();
//! assert!(signed.verify_signature());
//! ```

use crate::account::Account;
use crate::error::{AptosError, AptosResult};
use crate::transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::transaction::types::{RawTransactionWithData, SignedTransaction};
use crate::types::AccountAddress;
use tracing::{debug, warn};

/// A multi-agent or fee-payer transaction whose authenticators are still
/// being collected.
#[derive(Debug, Clone)]
pub struct PartiallySigned {
    data: RawTransactionWithData,
    sender: Option<AccountAuthenticator>,
    secondaries: Vec<Option<AccountAuthenticator>>,
    fee_payer: Option<AccountAuthenticator>,
}

impl PartiallySigned {
    /// Starts collecting for `data`, with every slot empty.
    pub fn new(data: RawTransactionWithData) -> Self {
        let secondaries = vec![None; data.secondary_signer_addresses().len()];
        Self {
            data,
            sender: None,
            secondaries,
            fee_payer: None,
        }
    }

    /// The transaction being signed.
    pub fn data(&self) -> &RawTransactionWithData {
        &self.data
    }

    /// The message each party signs.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be encoded.
    pub fn signing_message(&self) -> AptosResult<Vec<u8>> {
        self.data.signing_message()
    }

    /// Stores the sender's authenticator, replacing any earlier one.
    pub fn add_sender(&mut self, authenticator: AccountAuthenticator) {
        self.sender = Some(authenticator);
    }

    /// Stores a secondary signer's authenticator in the slot for `address`.
    ///
    /// When an address is listed more than once, the first empty slot for
    /// it is filled.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is not a secondary signer or all of its
    /// slots are already filled.
    pub fn add_secondary(
        &mut self,
        address: AccountAddress,
        authenticator: AccountAuthenticator,
    ) -> AptosResult<()> {
        let slot = self
            .data
            .secondary_signer_addresses()
            .iter()
            .zip(self.secondaries.iter_mut())
            .find(|(candidate, slot)| **candidate == address && slot.is_none())
            .map(|(_, slot)| slot)
            .ok_or_else(|| {
                AptosError::composition(format!(
                    "{address} is not an unsigned secondary signer of this transaction"
                ))
            })?;
        *slot = Some(authenticator);
        Ok(())
    }

    /// Stores the fee payer's authenticator.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has no fee payer.
    pub fn add_fee_payer(&mut self, authenticator: AccountAuthenticator) -> AptosResult<()> {
        if self.data.fee_payer_address().is_none() {
            return Err(AptosError::composition(
                "transaction has no fee payer to authenticate",
            ));
        }
        self.fee_payer = Some(authenticator);
        Ok(())
    }

    /// Signs as the sender.
    ///
    /// # Errors
    ///
    /// Returns an error if `sender` is not the transaction sender or fails
    /// to sign.
    pub fn sign_as_sender(&mut self, sender: &dyn Account) -> AptosResult<()> {
        if sender.address() != self.data.sender() {
            return Err(AptosError::composition(format!(
                "{} is not the sender {}",
                sender.address(),
                self.data.sender()
            )));
        }
        let authenticator = sender.sign(&self.signing_message()?)?;
        self.add_sender(authenticator);
        Ok(())
    }

    /// Signs as the secondary signer with `signer`'s address.
    ///
    /// # Errors
    ///
    /// Returns an error if `signer` is not a pending secondary signer or
    /// fails to sign.
    pub fn sign_as_secondary(&mut self, signer: &dyn Account) -> AptosResult<()> {
        let authenticator = signer.sign(&self.signing_message()?)?;
        self.add_secondary(signer.address(), authenticator)
    }

    /// Signs as the fee payer.
    ///
    /// A `0x0` fee payer is first replaced by `fee_payer`'s address.
    /// Authenticators collected before that were made over the placeholder
    /// and still verify.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has no fee payer, names a
    /// different one, or signing fails.
    pub fn sign_as_fee_payer(&mut self, fee_payer: &dyn Account) -> AptosResult<()> {
        match self.data.fee_payer_address() {
            None => {
                return Err(AptosError::composition(
                    "transaction has no fee payer to authenticate",
                ))
            }
            Some(address) if address == AccountAddress::ZERO => {
                debug!(fee_payer = %fee_payer.address(), "Resolving placeholder fee payer");
                self.data.set_fee_payer(fee_payer.address());
            }
            Some(address) if address != fee_payer.address() => {
                return Err(AptosError::composition(format!(
                    "{} is not the fee payer {address}",
                    fee_payer.address()
                )))
            }
            Some(_) => {}
        }
        let authenticator = fee_payer.sign(&self.signing_message()?)?;
        self.fee_payer = Some(authenticator);
        Ok(())
    }

    /// Returns true once every required authenticator is present.
    pub fn is_complete(&self) -> bool {
        self.sender.is_some()
            && self.secondaries.iter().all(Option::is_some)
            && (self.data.fee_payer_address().is_none() || self.fee_payer.is_some())
    }

    /// Assembles the signed transaction.
    ///
    /// # Errors
    ///
    /// Returns a composition error naming the first missing party.
    pub fn finish(self) -> AptosResult<SignedTransaction> {
        let sender = self
            .sender
            .ok_or_else(|| AptosError::composition("missing sender authenticator"))?;
        let addresses = self.data.secondary_signer_addresses().to_vec();
        let secondaries = self
            .secondaries
            .into_iter()
            .zip(&addresses)
            .map(|(auth, address)| {
                auth.ok_or_else(|| {
                    AptosError::composition(format!(
                        "missing authenticator for secondary signer {address}"
                    ))
                })
            })
            .collect::<AptosResult<Vec<_>>>()?;

        let authenticator = match self.data.fee_payer_address() {
            None => TransactionAuthenticator::multi_agent(sender, addresses, secondaries)?,
            Some(fee_payer_address) => {
                let fee_payer = self
                    .fee_payer
                    .ok_or_else(|| AptosError::composition("missing fee payer authenticator"))?;
                if fee_payer_address == AccountAddress::ZERO {
                    warn!(
                        sender = %self.data.sender(),
                        "Fee payer address is still the 0x0 placeholder"
                    );
                }
                TransactionAuthenticator::fee_payer(
                    sender,
                    addresses,
                    secondaries,
                    fee_payer_address,
                    fee_payer,
                )?
            }
        };
        debug!(
            sender = %self.data.sender(),
            kind = authenticator.kind(),
            secondary_signers = authenticator.secondary_signer_addresses().len(),
            "Merged transaction authenticators"
        );
        Ok(SignedTransaction::new(self.data.into_raw_txn(), authenticator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Ed25519Account, SingleKeyAccount};
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::payload::{Script, ScriptArgument};

    fn builder(sender: AccountAddress) -> TransactionBuilder {
        TransactionBuilder::new()
            .sender(sender)
            .sequence_number(1)
            .payload(Script::new(vec![1, 2, 3], vec![], vec![ScriptArgument::Bool(true)]).into())
            .expiration_timestamp_secs(1_800_000_000)
    }

    #[test]
    fn test_multi_agent_collection() {
        let sender = Ed25519Account::generate();
        let second = SingleKeyAccount::generate_secp256k1();
        let data = builder(sender.address())
            .build_multi_agent(vec![second.address()])
            .unwrap();

        let mut pending = PartiallySigned::new(data);
        pending.sign_as_sender(&sender).unwrap();
        assert!(!pending.is_complete());
        pending.sign_as_secondary(&second).unwrap();
        assert!(pending.is_complete());

        let signed = pending.finish().unwrap();
        assert_eq!(signed.authenticator.kind(), "multi_agent");
        assert!(signed.verify_signature());
    }

    #[test]
    fn test_finish_names_missing_party() {
        let sender = Ed25519Account::generate();
        let second = Ed25519Account::generate();
        let data = builder(sender.address())
            .build_fee_payer(vec![second.address()], Some(AccountAddress::ONE))
            .unwrap();

        let pending = PartiallySigned::new(data.clone());
        let err = pending.finish().unwrap_err();
        assert!(err.to_string().contains("sender"));

        let mut pending = PartiallySigned::new(data.clone());
        pending.sign_as_sender(&sender).unwrap();
        let err = pending.finish().unwrap_err();
        assert!(err.to_string().contains(&second.address().to_string()));

        let mut pending = PartiallySigned::new(data);
        pending.sign_as_sender(&sender).unwrap();
        pending.sign_as_secondary(&second).unwrap();
        let err = pending.finish().unwrap_err();
        assert!(matches!(err, AptosError::Composition(_)));
        assert!(err.to_string().contains("fee payer"));
    }

    #[test]
    fn test_rejects_strangers() {
        let sender = Ed25519Account::generate();
        let stranger = Ed25519Account::generate();
        let data = builder(sender.address()).build_multi_agent(vec![]).unwrap();
        let mut pending = PartiallySigned::new(data);
        assert!(pending.sign_as_sender(&stranger).is_err());
        assert!(pending.sign_as_secondary(&stranger).is_err());
        assert!(pending.sign_as_fee_payer(&stranger).is_err());
    }

    #[test]
    fn test_placeholder_fee_payer_resolved_at_signing() {
        let sender = Ed25519Account::generate();
        let sponsor = Ed25519Account::generate();
        let data = builder(sender.address()).build_fee_payer(vec![], None).unwrap();

        let mut pending = PartiallySigned::new(data);
        pending.sign_as_sender(&sender).unwrap();
        pending.sign_as_fee_payer(&sponsor).unwrap();
        assert_eq!(pending.data().fee_payer_address(), Some(sponsor.address()));

        let signed = pending.finish().unwrap();
        assert_eq!(signed.authenticator.fee_payer_address(), Some(sponsor.address()));
        assert!(signed.verify_signature());
    }

    #[test]
    fn test_duplicate_secondary_fills_next_slot() {
        let sender = Ed25519Account::generate();
        let second = Ed25519Account::generate();
        let data = builder(sender.address())
            .build_multi_agent(vec![second.address(), second.address()])
            .unwrap();
        let mut pending = PartiallySigned::new(data);
        pending.sign_as_secondary(&second).unwrap();
        pending.sign_as_secondary(&second).unwrap();
        assert!(pending.sign_as_secondary(&second).is_err());
    }
}
