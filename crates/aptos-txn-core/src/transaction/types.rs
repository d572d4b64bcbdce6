//! Transaction types.

use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::crypto::{
    raw_transaction_salt, raw_transaction_with_data_salt, sha3_256_of, transaction_salt,
};
use crate::error::{AptosResult, CodecError};
use crate::transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::transaction::payload::TransactionPayload;
use crate::types::{AccountAddress, ChainId, HashValue};

fn salted(salt: &[u8; 32], body: Vec<u8>) -> Vec<u8> {
    let mut message = Vec::with_capacity(salt.len() + body.len());
    message.extend_from_slice(salt);
    message.extend_from_slice(&body);
    message
}

/// The raw transaction that a client signs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTransaction {
    /// Sender's address.
    pub sender: AccountAddress,
    /// Sequence number of this transaction.
    pub sequence_number: u64,
    /// The transaction payload.
    pub payload: TransactionPayload,
    /// Maximum gas units the sender is willing to pay.
    pub max_gas_amount: u64,
    /// Price per gas unit in octas.
    pub gas_unit_price: u64,
    /// Expiration time in seconds since Unix epoch.
    pub expiration_timestamp_secs: u64,
    /// Chain ID to prevent cross-chain replay.
    pub chain_id: ChainId,
}

impl RawTransaction {
    /// Creates a new raw transaction.
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        }
    }

    /// The bytes a single sender signs:
    /// `SHA3-256("APTOS::RawTransaction") ‖ BCS(self)`.
    pub fn signing_message(&self) -> AptosResult<Vec<u8>> {
        Ok(salted(raw_transaction_salt(), self.to_bcs()?))
    }
}

impl BcsCodec for RawTransaction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.value(&self.sender)?;
        serializer.u64(self.sequence_number);
        serializer.value(&self.payload)?;
        serializer.u64(self.max_gas_amount);
        serializer.u64(self.gas_unit_price);
        serializer.u64(self.expiration_timestamp_secs);
        serializer.value(&self.chain_id)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            sender: deserializer.value()?,
            sequence_number: deserializer.u64()?,
            payload: deserializer.value()?,
            max_gas_amount: deserializer.u64()?,
            gas_unit_price: deserializer.u64()?,
            expiration_timestamp_secs: deserializer.u64()?,
            chain_id: deserializer.value()?,
        })
    }
}

/// A raw transaction together with the other accounts that must sign it.
///
/// Every party signs the same [`signing_message`](Self::signing_message).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawTransactionWithData {
    /// A sender plus secondary signers.
    MultiAgent {
        /// The transaction.
        raw_txn: RawTransaction,
        /// Secondary signer addresses, in signing order.
        secondary_signer_addresses: Vec<AccountAddress>,
    },
    /// A sender, secondary signers and a fee payer.
    MultiAgentWithFeePayer {
        /// The transaction.
        raw_txn: RawTransaction,
        /// Secondary signer addresses, in signing order.
        secondary_signer_addresses: Vec<AccountAddress>,
        /// The account paying for gas. `0x0` until the fee payer is known.
        fee_payer_address: AccountAddress,
    },
}

impl RawTransactionWithData {
    const MULTI_AGENT: u32 = 0;
    const MULTI_AGENT_WITH_FEE_PAYER: u32 = 1;

    /// Creates a multi-agent transaction.
    pub fn new_multi_agent(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
    ) -> Self {
        Self::MultiAgent {
            raw_txn,
            secondary_signer_addresses,
        }
    }

    /// Creates a fee-payer transaction. Without a fee payer the address is
    /// left as `0x0`.
    pub fn new_fee_payer(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: Option<AccountAddress>,
    ) -> Self {
        Self::MultiAgentWithFeePayer {
            raw_txn,
            secondary_signer_addresses,
            fee_payer_address: fee_payer_address.unwrap_or(AccountAddress::ZERO),
        }
    }

    /// The wrapped transaction.
    pub fn raw_txn(&self) -> &RawTransaction {
        match self {
            Self::MultiAgent { raw_txn, .. } | Self::MultiAgentWithFeePayer { raw_txn, .. } => {
                raw_txn
            }
        }
    }

    /// Consumes `self`, returning the wrapped transaction.
    pub fn into_raw_txn(self) -> RawTransaction {
        match self {
            Self::MultiAgent { raw_txn, .. } | Self::MultiAgentWithFeePayer { raw_txn, .. } => {
                raw_txn
            }
        }
    }

    /// The transaction sender.
    pub fn sender(&self) -> AccountAddress {
        self.raw_txn().sender
    }

    /// Secondary signer addresses, in signing order.
    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            Self::MultiAgent {
                secondary_signer_addresses,
                ..
            }
            | Self::MultiAgentWithFeePayer {
                secondary_signer_addresses,
                ..
            } => secondary_signer_addresses,
        }
    }

    /// The fee payer address, for the fee-payer variant.
    pub fn fee_payer_address(&self) -> Option<AccountAddress> {
        match self {
            Self::MultiAgent { .. } => None,
            Self::MultiAgentWithFeePayer {
                fee_payer_address, ..
            } => Some(*fee_payer_address),
        }
    }

    /// Sets the fee payer, turning a multi-agent transaction into a
    /// fee-payer one if needed.
    ///
    /// This changes the signing message, so it must happen before anyone
    /// signs.
    pub fn set_fee_payer(&mut self, fee_payer: AccountAddress) {
        match self {
            Self::MultiAgentWithFeePayer {
                fee_payer_address, ..
            } => *fee_payer_address = fee_payer,
            Self::MultiAgent {
                raw_txn,
                secondary_signer_addresses,
            } => {
                *self = Self::MultiAgentWithFeePayer {
                    raw_txn: raw_txn.clone(),
                    secondary_signer_addresses: std::mem::take(secondary_signer_addresses),
                    fee_payer_address: fee_payer,
                };
            }
        }
    }

    /// The bytes every party signs:
    /// `SHA3-256("APTOS::RawTransactionWithData") ‖ BCS(self)`.
    pub fn signing_message(&self) -> AptosResult<Vec<u8>> {
        Ok(salted(raw_transaction_with_data_salt(), self.to_bcs()?))
    }
}

impl BcsCodec for RawTransactionWithData {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            Self::MultiAgent {
                raw_txn,
                secondary_signer_addresses,
            } => {
                serializer.variant(Self::MULTI_AGENT);
                serializer.value(raw_txn)?;
                serializer.sequence(secondary_signer_addresses)
            }
            Self::MultiAgentWithFeePayer {
                raw_txn,
                secondary_signer_addresses,
                fee_payer_address,
            } => {
                serializer.variant(Self::MULTI_AGENT_WITH_FEE_PAYER);
                serializer.value(raw_txn)?;
                serializer.sequence(secondary_signer_addresses)?;
                serializer.value(fee_payer_address)
            }
        }
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.variant()? {
            Self::MULTI_AGENT => Ok(Self::MultiAgent {
                raw_txn: deserializer.value()?,
                secondary_signer_addresses: deserializer.sequence()?,
            }),
            Self::MULTI_AGENT_WITH_FEE_PAYER => Ok(Self::MultiAgentWithFeePayer {
                raw_txn: deserializer.value()?,
                secondary_signer_addresses: deserializer.sequence()?,
                fee_payer_address: deserializer.value()?,
            }),
            index => Err(CodecError::unknown_variant("RawTransactionWithData", index).into()),
        }
    }
}

/// A signed transaction ready for submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The raw transaction.
    pub raw_txn: RawTransaction,
    /// The authenticator.
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Creates a new signed transaction.
    pub fn new(raw_txn: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self {
            raw_txn,
            authenticator,
        }
    }

    /// Returns the sender address.
    pub fn sender(&self) -> AccountAddress {
        self.raw_txn.sender
    }

    /// Returns the sequence number.
    pub fn sequence_number(&self) -> u64 {
        self.raw_txn.sequence_number
    }

    /// Computes the transaction hash:
    /// `SHA3-256(SHA3-256("APTOS::Transaction") ‖ 0x00 ‖ BCS(self))`.
    pub fn hash(&self) -> AptosResult<HashValue> {
        let bcs_bytes = self.to_bcs()?;
        // 0 is the user transaction variant of the ledger transaction enum.
        Ok(HashValue::new(sha3_256_of([
            &transaction_salt()[..],
            &[0u8][..],
            &bcs_bytes[..],
        ])))
    }

    /// Returns true if the authenticator is valid for this transaction.
    ///
    /// Multi-agent and fee-payer authenticators are checked against the
    /// `RawTransactionWithData` they imply. In a fee-payer transaction the
    /// sender and secondary signers may have signed while the fee payer was
    /// still `0x0`, so either form is accepted for them; the fee payer must
    /// have signed over its own address.
    pub fn verify_signature(&self) -> bool {
        match &self.authenticator {
            TransactionAuthenticator::MultiAgent {
                secondary_signer_addresses,
                ..
            } => RawTransactionWithData::new_multi_agent(
                self.raw_txn.clone(),
                secondary_signer_addresses.clone(),
            )
            .signing_message()
            .is_ok_and(|message| self.authenticator.verify(&message)),
            TransactionAuthenticator::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                if secondary_signer_addresses.len() != secondary_signers.len() {
                    return false;
                }
                let message_for = |fee_payer: AccountAddress| {
                    RawTransactionWithData::new_fee_payer(
                        self.raw_txn.clone(),
                        secondary_signer_addresses.clone(),
                        Some(fee_payer),
                    )
                    .signing_message()
                };
                let (Ok(signed), Ok(placeholder)) =
                    (message_for(*fee_payer_address), message_for(AccountAddress::ZERO))
                else {
                    return false;
                };
                let either = |auth: &AccountAuthenticator| {
                    auth.verify(&signed) || auth.verify(&placeholder)
                };
                fee_payer_signer.verify(&signed)
                    && either(sender)
                    && secondary_signers.iter().all(either)
            }
            _ => self
                .raw_txn
                .signing_message()
                .is_ok_and(|message| self.authenticator.verify(&message)),
        }
    }
}

impl BcsCodec for SignedTransaction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.value(&self.raw_txn)?;
        serializer.value(&self.authenticator)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            raw_txn: deserializer.value()?,
            authenticator: deserializer.value()?,
        })
    }
}
