//! Core Aptos types.
//!
//! Addresses, chain IDs, hash values and the Move type descriptors used by
//! transaction payloads.

mod address;
mod chain_id;
mod hash;
mod move_types;

pub use address::{AccountAddress, ADDRESS_LENGTH};
pub use chain_id::ChainId;
pub use hash::{HashValue, HASH_LENGTH};
pub use move_types::{
    EntryFunctionId, Identifier, MoveModuleId, StructTag, TypeTag, MAX_TYPE_NESTING_DEPTH,
};
