//! ABI-driven entry function arguments.
//!
//! A module ABI, as served by a fullnode, lists each function's parameter
//! types as Move type strings. Given the ABI, JSON argument values can be
//! encoded to the BCS bytes an [`EntryFunction`] carries without the caller
//! knowing the wire format of each type.
//!
//! # Example
//!
//! ```rust
//! use aptos_txn_core::transaction::MoveModuleAbi;
//! use serde_json::json;
//!
//! let abi: MoveModuleAbi = serde_json::from_value(json!({
//!     "address": "0x1",
//!     "name": "aptos_account",
//!     "exposed_functions": [{
//!         "name": "transfer",
//!         "is_entry": true,
//!         "generic_type_params": [],
//!         "params": ["&signer", "address", "u64"]
//!     }]
//! }))
//! .unwrap();
//!
//! let entry = abi
//!     .entry_function("transfer", &[json!("0x2"), json!("1000")], &[])
//!     .unwrap();
//! assert_eq!(entry.args[1], 1000u64.to_le_bytes().to_vec());
//! ```

use crate::codec::{Serializer, U256};
use crate::crypto::decode_hex;
use crate::error::{AptosError, AptosResult};
use crate::transaction::payload::EntryFunction;
use crate::types::{AccountAddress, Identifier, MoveModuleId, TypeTag};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Move module ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveModuleAbi {
    /// The module address.
    pub address: AccountAddress,
    /// The module name.
    pub name: String,
    /// Exposed functions.
    #[serde(default)]
    pub exposed_functions: Vec<EntryFunctionAbi>,
}

impl MoveModuleAbi {
    /// The module ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the module name is not a valid identifier.
    pub fn module_id(&self) -> AptosResult<MoveModuleId> {
        Ok(MoveModuleId::new(self.address, Identifier::new(self.name.as_str())?))
    }

    /// Looks up a function by name.
    pub fn function(&self, name: &str) -> Option<&EntryFunctionAbi> {
        self.exposed_functions.iter().find(|f| f.name == name)
    }

    /// Builds a call to the entry function `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the function is missing or not an entry
    /// function, or if the arguments do not match its parameters.
    pub fn entry_function(
        &self,
        name: &str,
        args: &[Value],
        type_args: &[TypeTag],
    ) -> AptosResult<EntryFunction> {
        let function = self.function(name).ok_or_else(|| {
            AptosError::invalid_argument(format!("{}::{} has no function {name}", self.address, self.name))
        })?;
        if !function.is_entry {
            return Err(AptosError::invalid_argument(format!(
                "{}::{}::{name} is not an entry function",
                self.address, self.name
            )));
        }
        function.build_entry_function(&self.module_id()?, args, type_args)
    }
}

/// A function exposed by a Move module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionAbi {
    /// Function name.
    pub name: String,
    /// Whether this is an entry function.
    #[serde(default)]
    pub is_entry: bool,
    /// Generic type parameters.
    #[serde(default)]
    pub generic_type_params: Vec<GenericTypeParam>,
    /// Parameter types, including leading signers.
    #[serde(default)]
    pub params: Vec<String>,
}

/// Generic type parameter in a function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericTypeParam {
    /// Ability constraints on the type parameter.
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl EntryFunctionAbi {
    /// Parameters the caller supplies, with leading `signer`s removed.
    pub fn non_signer_params(&self) -> &[String] {
        let signers = self
            .params
            .iter()
            .take_while(|param| matches!(param.trim(), "signer" | "&signer"))
            .count();
        &self.params[signers..]
    }

    /// BCS-encodes `args` by this function's parameter types.
    ///
    /// `T0`, `T1`, ... in parameter types are replaced by `type_args`.
    ///
    /// # Errors
    ///
    /// Returns an error if the argument or type argument count is wrong, or
    /// a value cannot be read as its parameter type.
    pub fn encode_arguments(
        &self,
        args: &[Value],
        type_args: &[TypeTag],
    ) -> AptosResult<Vec<Vec<u8>>> {
        if type_args.len() != self.generic_type_params.len() {
            return Err(AptosError::invalid_argument(format!(
                "{} expects {} type arguments, got {}",
                self.name,
                self.generic_type_params.len(),
                type_args.len()
            )));
        }
        let params = self.non_signer_params();
        if args.len() != params.len() {
            return Err(AptosError::invalid_argument(format!(
                "{} expects {} arguments, got {}",
                self.name,
                params.len(),
                args.len()
            )));
        }
        params
            .iter()
            .zip(args)
            .enumerate()
            .map(|(position, (param, value))| {
                let tag = TypeTag::parse_with_generics(param, type_args)?;
                let mut serializer = Serializer::new();
                encode_value(&mut serializer, &tag, value).map_err(|e| {
                    AptosError::invalid_argument(format!("argument {position} ({param}): {e}"))
                })?;
                Ok(serializer.into_bytes())
            })
            .collect()
    }

    /// Builds an entry function payload for this function in `module`.
    ///
    /// # Errors
    ///
    /// Fails like [`encode_arguments`](Self::encode_arguments), or if the
    /// function name is not a valid identifier.
    pub fn build_entry_function(
        &self,
        module: &MoveModuleId,
        args: &[Value],
        type_args: &[TypeTag],
    ) -> AptosResult<EntryFunction> {
        let encoded = self.encode_arguments(args, type_args)?;
        Ok(EntryFunction::new(
            module.clone(),
            Identifier::new(self.name.as_str())?,
            type_args.to_vec(),
            encoded,
        ))
    }
}

fn mismatch(expected: &str, value: &Value) -> AptosError {
    AptosError::invalid_argument(format!("expected {expected}, got {value}"))
}

fn unsigned(value: &Value, type_name: &str, max: u128) -> AptosResult<u128> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().map(u128::from),
        Value::String(s) => s.trim().parse::<u128>().ok(),
        _ => None,
    }
    .ok_or_else(|| mismatch(type_name, value))?;
    if parsed > max {
        return Err(AptosError::invalid_argument(format!(
            "{parsed} does not fit in {type_name}"
        )));
    }
    Ok(parsed)
}

fn address(value: &Value) -> AptosResult<AccountAddress> {
    value
        .as_str()
        .ok_or_else(|| mismatch("an address string", value))?
        .parse()
}

fn encode_value(serializer: &mut Serializer, tag: &TypeTag, value: &Value) -> AptosResult<()> {
    match tag {
        TypeTag::Bool => serializer.bool(value.as_bool().ok_or_else(|| mismatch("bool", value))?),
        TypeTag::U8 => serializer.u8(unsigned(value, "u8", u8::MAX.into())? as u8),
        TypeTag::U16 => serializer.u16(unsigned(value, "u16", u16::MAX.into())? as u16),
        TypeTag::U32 => serializer.u32(unsigned(value, "u32", u32::MAX.into())? as u32),
        TypeTag::U64 => serializer.u64(unsigned(value, "u64", u64::MAX.into())? as u64),
        TypeTag::U128 => serializer.u128(unsigned(value, "u128", u128::MAX)?),
        TypeTag::U256 => {
            let parsed = match value {
                Value::Number(n) => n.as_u64().map(U256::from),
                Value::String(s) => Some(s.parse::<U256>()?),
                _ => None,
            }
            .ok_or_else(|| mismatch("u256", value))?;
            serializer.u256(&parsed);
        }
        TypeTag::Address => serializer.fixed_bytes(address(value)?.as_bytes()),
        TypeTag::Signer => {
            return Err(AptosError::invalid_argument(
                "signer parameters are supplied by the transaction, not as arguments",
            ))
        }
        TypeTag::Vector(element) => match (element.as_ref(), value) {
            (TypeTag::U8, Value::String(s)) => serializer.write_bytes(&decode_hex(s)?)?,
            (_, Value::Array(items)) => {
                serializer.length(items.len())?;
                for item in items {
                    encode_value(serializer, element, item)?;
                }
            }
            _ => return Err(mismatch("an array", value)),
        },
        TypeTag::Struct(tag) if tag.is_string() => {
            serializer.write_string(value.as_str().ok_or_else(|| mismatch("a string", value))?)?;
        }
        TypeTag::Struct(tag) if tag.is_object() => {
            serializer.fixed_bytes(address(value)?.as_bytes());
        }
        TypeTag::Struct(tag) => {
            let inner = tag.option_inner().ok_or_else(|| {
                AptosError::invalid_argument(format!("struct arguments of type {tag} are not supported"))
            })?;
            match value {
                Value::Null => serializer.length(0)?,
                Value::Array(items) if items.is_empty() => serializer.length(0)?,
                Value::Array(items) if items.len() == 1 => {
                    serializer.length(1)?;
                    encode_value(serializer, inner, &items[0])?;
                }
                Value::Array(_) => return Err(mismatch("an option of at most one value", value)),
                some => {
                    serializer.length(1)?;
                    encode_value(serializer, inner, some)?;
                }
            }
        }
    }
    Ok(())
}
