//! # Aptos transaction core
//!
//! The offline half of an Aptos signing backend: everything needed to turn
//! a transaction description into signed, submittable bytes, with no
//! network access.
//!
//! ## Quick Start
//!
//! ```rust
//! use aptos_txn_core::account::{Account, Ed25519Account};
//! use aptos_txn_core::codec::BcsCodec;
//! use aptos_txn_core::signing::{sign_raw_transaction, transaction_hash};
//! use aptos_txn_core::transaction::{EntryFunction, TransactionBuilder};
//! use aptos_txn_core::types::AccountAddress;
//!
//! let account = Ed25519Account::generate();
//! let payload = EntryFunction::from_function_id(
//!     "0x1::aptos_account::transfer",
//!     vec![],
//!     vec![AccountAddress::TWO.to_bcs().unwrap(), 100u64.to_bcs().unwrap()],
//! )
//! .unwrap();
//! let raw_txn = TransactionBuilder::new()
//!     .sender(account.address())
//!     .sequence_number(0)
//!     .payload(payload.into())
//!     .build()
//!     .unwrap();
//!
//! let signed = sign_raw_transaction(
//!     &hex::encode(raw_txn.to_bcs().unwrap()),
//!     &account.private_key().to_hex(),
//! )
//! .unwrap();
//! let hash = transaction_hash(&signed).unwrap();
//! assert_eq!(hash.len(), 66);
//! ```
//!
//! ## Modules
//!
//! - [`codec`] - BCS serialization
//! - [`types`] - Addresses, chain IDs and Move type tags
//! - [`crypto`] - Signature schemes and key material
//! - [`account`] - Signers producing account authenticators
//! - [`transaction`] - Payloads, envelopes, authenticators and builders
//! - [`signing`] - Hex boundary functions
//! - [`config`] - Transaction defaults

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod account;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod signing;
pub mod transaction;
pub mod types;

pub use config::TransactionConfig;
pub use error::{AptosError, AptosResult, CodecError};

// Re-export commonly used types
pub use types::{AccountAddress, ChainId, HashValue};
