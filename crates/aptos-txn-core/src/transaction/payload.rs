//! Transaction payloads.

use crate::codec::{BcsCodec, Deserializer, Serializer, U256};
use crate::error::{AptosResult, CodecError};
use crate::types::{AccountAddress, EntryFunctionId, Identifier, MoveModuleId, TypeTag};

/// What a transaction executes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Run inline script bytecode.
    Script(Script),
    /// Call an `entry` function of a published module.
    EntryFunction(EntryFunction),
    /// Execute or vote on a multisig account transaction.
    Multisig(Multisig),
}

impl TransactionPayload {
    const SCRIPT: u32 = 0;
    const MODULE_BUNDLE: u32 = 1;
    const ENTRY_FUNCTION: u32 = 2;
    const MULTISIG: u32 = 3;

    /// The variant name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Script(_) => "script",
            Self::EntryFunction(_) => "entry_function",
            Self::Multisig(_) => "multisig",
        }
    }
}

impl From<Script> for TransactionPayload {
    fn from(script: Script) -> Self {
        Self::Script(script)
    }
}

impl From<EntryFunction> for TransactionPayload {
    fn from(entry_function: EntryFunction) -> Self {
        Self::EntryFunction(entry_function)
    }
}

impl From<Multisig> for TransactionPayload {
    fn from(multisig: Multisig) -> Self {
        Self::Multisig(multisig)
    }
}

impl BcsCodec for TransactionPayload {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            Self::Script(script) => {
                serializer.variant(Self::SCRIPT);
                serializer.value(script)
            }
            Self::EntryFunction(entry_function) => {
                serializer.variant(Self::ENTRY_FUNCTION);
                serializer.value(entry_function)
            }
            Self::Multisig(multisig) => {
                serializer.variant(Self::MULTISIG);
                serializer.value(multisig)
            }
        }
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.variant()? {
            Self::SCRIPT => Ok(Self::Script(deserializer.value()?)),
            Self::MODULE_BUNDLE => Err(CodecError::Unsupported {
                type_name: "TransactionPayload",
                index: Self::MODULE_BUNDLE,
            }
            .into()),
            Self::ENTRY_FUNCTION => Ok(Self::EntryFunction(deserializer.value()?)),
            Self::MULTISIG => Ok(Self::Multisig(deserializer.value()?)),
            index => Err(CodecError::unknown_variant("TransactionPayload", index).into()),
        }
    }
}

/// Script bytecode with its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    /// Compiled Move bytecode.
    pub code: Vec<u8>,
    /// Type arguments.
    pub type_args: Vec<TypeTag>,
    /// Typed arguments.
    pub args: Vec<ScriptArgument>,
}

impl Script {
    /// Creates a script payload.
    pub fn new(code: Vec<u8>, type_args: Vec<TypeTag>, args: Vec<ScriptArgument>) -> Self {
        Self {
            code,
            type_args,
            args,
        }
    }
}

impl BcsCodec for Script {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.write_bytes(&self.code)?;
        serializer.sequence(&self.type_args)?;
        serializer.sequence(&self.args)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            code: deserializer.read_bytes()?,
            type_args: deserializer.sequence()?,
            args: deserializer.sequence()?,
        })
    }
}

/// A script argument. Unlike entry function arguments these carry their
/// own type tag on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptArgument {
    /// `u8`
    U8(u8),
    /// `u64`
    U64(u64),
    /// `u128`
    U128(u128),
    /// `address`
    Address(AccountAddress),
    /// `vector<u8>`
    U8Vector(Vec<u8>),
    /// `bool`
    Bool(bool),
    /// `u16`
    U16(u16),
    /// `u32`
    U32(u32),
    /// `u256`
    U256(U256),
    /// Any other value, already BCS encoded.
    Serialized(Vec<u8>),
}

impl ScriptArgument {
    fn variant_index(&self) -> u32 {
        match self {
            Self::U8(_) => 0,
            Self::U64(_) => 1,
            Self::U128(_) => 2,
            Self::Address(_) => 3,
            Self::U8Vector(_) => 4,
            Self::Bool(_) => 5,
            Self::U16(_) => 6,
            Self::U32(_) => 7,
            Self::U256(_) => 8,
            Self::Serialized(_) => 9,
        }
    }
}

impl BcsCodec for ScriptArgument {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.variant(self.variant_index());
        match self {
            Self::U8(v) => serializer.u8(*v),
            Self::U64(v) => serializer.u64(*v),
            Self::U128(v) => serializer.u128(*v),
            Self::Address(v) => serializer.value(v)?,
            Self::U8Vector(v) | Self::Serialized(v) => serializer.write_bytes(v)?,
            Self::Bool(v) => serializer.bool(*v),
            Self::U16(v) => serializer.u16(*v),
            Self::U32(v) => serializer.u32(*v),
            Self::U256(v) => serializer.u256(v),
        }
        Ok(())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(match deserializer.variant()? {
            0 => Self::U8(deserializer.u8()?),
            1 => Self::U64(deserializer.u64()?),
            2 => Self::U128(deserializer.u128()?),
            3 => Self::Address(deserializer.value()?),
            4 => Self::U8Vector(deserializer.read_bytes()?),
            5 => Self::Bool(deserializer.bool()?),
            6 => Self::U16(deserializer.u16()?),
            7 => Self::U32(deserializer.u32()?),
            8 => Self::U256(deserializer.u256()?),
            9 => Self::Serialized(deserializer.read_bytes()?),
            index => return Err(CodecError::unknown_variant("ScriptArgument", index).into()),
        })
    }
}

/// A call to a published `entry` function.
///
/// Arguments are BCS encoded ahead of time; their types come from the
/// function's ABI, not from the payload.
///
/// # Example
///
/// ```rust
/// use aptos_txn_core::codec::BcsCodec;
/// use aptos_txn_core::transaction::EntryFunction;
/// use aptos_txn_core::types::{AccountAddress, TypeTag};
///
/// let recipient = AccountAddress::from_hex("0x123").unwrap();
/// let payload = EntryFunction::from_function_id(
///     "0x1::coin::transfer",
///     vec![TypeTag::aptos_coin()],
///     vec![recipient.to_bcs().unwrap(), 1000u64.to_bcs().unwrap()],
/// )
/// .unwrap();
/// assert_eq!(payload.function.as_str(), "transfer");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFunction {
    /// The module declaring the function.
    pub module: MoveModuleId,
    /// The function name.
    pub function: Identifier,
    /// Type arguments.
    pub type_args: Vec<TypeTag>,
    /// BCS-encoded arguments, one per non-signer parameter.
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    /// Creates an entry function payload.
    pub fn new(
        module: MoveModuleId,
        function: Identifier,
        type_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            module,
            function,
            type_args,
            args,
        }
    }

    /// Creates an entry function payload from `address::module::function`.
    pub fn from_function_id(
        function_id: &str,
        type_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> AptosResult<Self> {
        let EntryFunctionId { module, name } = EntryFunctionId::from_str_strict(function_id)?;
        Ok(Self::new(module, name, type_args, args))
    }

    /// The fully qualified function ID.
    pub fn function_id(&self) -> EntryFunctionId {
        EntryFunctionId::new(self.module.clone(), self.function.clone())
    }
}

impl BcsCodec for EntryFunction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.value(&self.module)?;
        serializer.value(&self.function)?;
        serializer.sequence(&self.type_args)?;
        serializer.length(self.args.len())?;
        for arg in &self.args {
            serializer.write_bytes(arg)?;
        }
        Ok(())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        let module = deserializer.value()?;
        let function = deserializer.value()?;
        let type_args = deserializer.sequence()?;
        let len = deserializer.length()?;
        let mut args = Vec::with_capacity(len.min(deserializer.remaining()));
        for _ in 0..len {
            args.push(deserializer.read_bytes()?);
        }
        Ok(Self {
            module,
            function,
            type_args,
            args,
        })
    }
}

/// The inner payload of a multisig account transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultisigTransactionPayload {
    /// An entry function call.
    EntryFunction(EntryFunction),
}

impl BcsCodec for MultisigTransactionPayload {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            Self::EntryFunction(entry_function) => {
                serializer.variant(0);
                serializer.value(entry_function)
            }
        }
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.variant()? {
            0 => Ok(Self::EntryFunction(deserializer.value()?)),
            index => Err(CodecError::unknown_variant("MultisigTransactionPayload", index).into()),
        }
    }
}

/// A transaction executed on behalf of a multisig account.
///
/// Without an inline payload the chain executes the payload stored when
/// the multisig transaction was proposed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Multisig {
    /// The multisig account.
    pub multisig_address: AccountAddress,
    /// The payload, if not already stored on chain.
    pub transaction_payload: Option<MultisigTransactionPayload>,
}

impl Multisig {
    /// Creates a multisig payload.
    pub fn new(
        multisig_address: AccountAddress,
        transaction_payload: Option<MultisigTransactionPayload>,
    ) -> Self {
        Self {
            multisig_address,
            transaction_payload,
        }
    }
}

impl BcsCodec for Multisig {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.value(&self.multisig_address)?;
        serializer.option(self.transaction_payload.as_ref())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            multisig_address: deserializer.value()?,
            transaction_payload: deserializer.option()?,
        })
    }
}
