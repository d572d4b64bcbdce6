//! Transaction building and signing.
//!
//! # Overview
//!
//! The transaction module supports several transaction types:
//!
//! - **Simple transactions** - Single sender, self-paid gas
//! - **Multi-agent transactions** - Multiple signers required
//! - **Sponsored transactions** - Fee payer pays gas on sender's behalf
//!
//! Single-sender transactions sign [`RawTransaction::signing_message`].
//! Multi-agent and sponsored ones wrap the raw transaction in a
//! [`RawTransactionWithData`], every party signs its signing message, and
//! [`PartiallySigned`] merges the results.
//!
//! # Example: Simple Transaction
//!
//! ```rust
//! use aptos_txn_core::account::{Account, Ed25519Account};
//! use aptos_txn_core::transaction::{sign_transaction, EntryFunction, TransactionBuilder};
//! use aptos_txn_core::codec::BcsCodec;
//! use aptos_txn_core::types::{AccountAddress, ChainId};
//!
//! let sender = Ed25519Account::generate();
//! let payload = EntryFunction::from_function_id(
//!     "0x1::aptos_account::transfer",
//!     vec![],
//!     vec![AccountAddress::TWO.to_bcs().unwrap(), 1000u64.to_bcs().unwrap()],
//! )
//! .unwrap();
//!
//! let raw_txn = TransactionBuilder::new()
//!     .sender(sender.address())
//!     .sequence_number(0)
//!     .payload(payload.into())
//!     .chain_id(ChainId::Testnet)
//!     .build()
//!     .unwrap();
//! let signed_txn = sign_transaction(&raw_txn, &sender).unwrap();
//! assert!(signed_txn.verify_signature());
//! ```

pub mod abi;
pub mod authenticator;
pub mod builder;
pub mod payload;
pub mod sponsored;
pub mod types;

pub use abi::{EntryFunctionAbi, GenericTypeParam, MoveModuleAbi};
pub use authenticator::{AccountAuthenticator, TransactionAuthenticator};
pub use builder::{sign_transaction, TransactionBuilder};
pub use payload::{
    EntryFunction, Multisig, MultisigTransactionPayload, Script, ScriptArgument,
    TransactionPayload,
};
pub use sponsored::PartiallySigned;
pub use types::{RawTransaction, RawTransactionWithData, SignedTransaction};
