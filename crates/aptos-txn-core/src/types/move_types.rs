//! Move type system representations.
//!
//! [`TypeTag`] describes a Move type: a primitive, a vector, or a struct
//! with ordered type parameters. Tags parse from and print to canonical
//! strings such as `vector<0x1::option::Option<u64>>`, and encode in BCS
//! with a ULEB128 variant index.
//!
//! # Security
//!
//! Parsing and decoding enforce length and nesting limits so untrusted
//! input cannot cause unbounded recursion.

use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::error::{AptosError, AptosResult, CodecError};
use crate::types::AccountAddress;
use std::fmt;
use std::str::FromStr;

/// Maximum length of a type tag string.
const MAX_TYPE_TAG_LENGTH: usize = 1024;

/// Maximum length of a Move identifier.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Maximum nesting of vectors and type arguments.
pub const MAX_TYPE_NESTING_DEPTH: usize = 8;

/// A validated Move identifier (module, struct or function name).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validates and wraps an identifier.
    ///
    /// Identifiers start with an ASCII letter or `_` and continue with ASCII
    /// alphanumerics or `_`.
    pub fn new(s: impl Into<String>) -> AptosResult<Self> {
        let s = s.into();
        if s.len() > MAX_IDENTIFIER_LENGTH {
            return Err(AptosError::InvalidIdentifier(format!(
                "identifier too long: {} bytes (max {})",
                s.len(),
                MAX_IDENTIFIER_LENGTH
            )));
        }
        let Some(first) = s.chars().next() else {
            return Err(AptosError::InvalidIdentifier(
                "identifier cannot be empty".into(),
            ));
        };
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(AptosError::InvalidIdentifier(format!(
                "identifier must start with letter or underscore: {s}"
            )));
        }
        if s == "_" || !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AptosError::InvalidIdentifier(format!(
                "identifier contains invalid characters: {s}"
            )));
        }
        Ok(Self(s))
    }

    fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Identifier {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl BcsCodec for Identifier {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.write_string(&self.0)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::new(deserializer.read_string()?)
    }
}

/// A module identifier such as `0x1::coin`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MoveModuleId {
    /// The account that published the module.
    pub address: AccountAddress,
    /// The module name.
    pub name: Identifier,
}

impl MoveModuleId {
    /// Creates a module ID.
    pub fn new(address: AccountAddress, name: Identifier) -> Self {
        Self { address, name }
    }

    /// Parses `address::name`.
    pub fn from_str_strict(s: &str) -> AptosResult<Self> {
        let parts: Vec<&str> = s.trim().split("::").collect();
        let [address, name] = parts.as_slice() else {
            return Err(AptosError::InvalidTypeTag(format!(
                "invalid module ID format: {s}"
            )));
        };
        Ok(Self {
            address: AccountAddress::from_str(address.trim())?,
            name: Identifier::new(name.trim())?,
        })
    }
}

impl fmt::Display for MoveModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

impl FromStr for MoveModuleId {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_strict(s)
    }
}

impl BcsCodec for MoveModuleId {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.value(&self.address)?;
        serializer.value(&self.name)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            address: deserializer.value()?,
            name: deserializer.value()?,
        })
    }
}

/// A fully qualified struct type with its type arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructTag {
    /// The account that published the module.
    pub address: AccountAddress,
    /// The module name.
    pub module: Identifier,
    /// The struct name.
    pub name: Identifier,
    /// Type arguments in declaration order.
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    /// Creates a struct tag.
    pub fn new(
        address: AccountAddress,
        module: Identifier,
        name: Identifier,
        type_args: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module,
            name,
            type_args,
        }
    }

    fn framework(module: &'static str, name: &'static str, type_args: Vec<TypeTag>) -> Self {
        Self {
            address: AccountAddress::ONE,
            module: Identifier::from_static(module),
            name: Identifier::from_static(name),
            type_args,
        }
    }

    /// `0x1::string::String`
    pub fn string() -> Self {
        Self::framework("string", "String", vec![])
    }

    /// `0x1::option::Option<T>`
    pub fn option(inner: TypeTag) -> Self {
        Self::framework("option", "Option", vec![inner])
    }

    /// `0x1::object::Object<T>`
    pub fn object(inner: TypeTag) -> Self {
        Self::framework("object", "Object", vec![inner])
    }

    /// `0x1::aptos_coin::AptosCoin`
    pub fn aptos_coin() -> Self {
        Self::framework("aptos_coin", "AptosCoin", vec![])
    }

    fn is_framework(&self, module: &str, name: &str) -> bool {
        self.address == AccountAddress::ONE
            && self.module.as_str() == module
            && self.name.as_str() == name
    }

    /// True for `0x1::string::String`.
    pub fn is_string(&self) -> bool {
        self.is_framework("string", "String") && self.type_args.is_empty()
    }

    /// Returns `T` for `0x1::option::Option<T>`.
    pub fn option_inner(&self) -> Option<&TypeTag> {
        match self.type_args.as_slice() {
            [inner] if self.is_framework("option", "Option") => Some(inner),
            _ => None,
        }
    }

    /// True for `0x1::object::Object<T>`.
    pub fn is_object(&self) -> bool {
        self.is_framework("object", "Object") && self.type_args.len() == 1
    }

    fn serialize_with_depth(&self, serializer: &mut Serializer, depth: usize) -> AptosResult<()> {
        serializer.value(&self.address)?;
        serializer.value(&self.module)?;
        serializer.value(&self.name)?;
        serializer.length(self.type_args.len())?;
        for arg in &self.type_args {
            arg.serialize_with_depth(serializer, depth + 1)?;
        }
        Ok(())
    }

    fn deserialize_with_depth(deserializer: &mut Deserializer<'_>, depth: usize) -> AptosResult<Self> {
        let address = deserializer.value()?;
        let module = deserializer.value()?;
        let name = deserializer.value()?;
        let len = deserializer.length()?;
        let mut type_args = Vec::with_capacity(len.min(deserializer.remaining()));
        for _ in 0..len {
            type_args.push(TypeTag::deserialize_with_depth(deserializer, depth + 1)?);
        }
        Ok(Self {
            address,
            module,
            name,
            type_args,
        })
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl FromStr for StructTag {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match TypeTag::from_str(s)? {
            TypeTag::Struct(tag) => Ok(*tag),
            other => Err(AptosError::InvalidTypeTag(format!(
                "expected a struct type, got {other}"
            ))),
        }
    }
}

impl BcsCodec for StructTag {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.serialize_with_depth(serializer, 0)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::deserialize_with_depth(deserializer, 0)
    }
}

/// A Move type.
///
/// Variant order matches the on-chain discriminants; `U16`, `U32` and
/// `U256` were appended after `Struct`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `bool`
    Bool,
    /// `u8`
    U8,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `address`
    Address,
    /// `signer`
    Signer,
    /// `vector<T>`
    Vector(Box<TypeTag>),
    /// A struct type.
    Struct(Box<StructTag>),
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u256`
    U256,
}

impl TypeTag {
    /// `vector<element>`
    pub fn vector(element: TypeTag) -> Self {
        Self::Vector(Box::new(element))
    }

    /// Wraps a struct tag.
    pub fn struct_tag(tag: StructTag) -> Self {
        Self::Struct(Box::new(tag))
    }

    /// `0x1::string::String`
    pub fn string() -> Self {
        Self::struct_tag(StructTag::string())
    }

    /// `0x1::option::Option<inner>`
    pub fn option(inner: TypeTag) -> Self {
        Self::struct_tag(StructTag::option(inner))
    }

    /// `0x1::object::Object<inner>`
    pub fn object(inner: TypeTag) -> Self {
        Self::struct_tag(StructTag::object(inner))
    }

    /// `0x1::aptos_coin::AptosCoin`
    pub fn aptos_coin() -> Self {
        Self::struct_tag(StructTag::aptos_coin())
    }

    /// The BCS variant index of this tag.
    pub fn variant_index(&self) -> u32 {
        match self {
            Self::Bool => 0,
            Self::U8 => 1,
            Self::U64 => 2,
            Self::U128 => 3,
            Self::Address => 4,
            Self::Signer => 5,
            Self::Vector(_) => 6,
            Self::Struct(_) => 7,
            Self::U16 => 8,
            Self::U32 => 9,
            Self::U256 => 10,
        }
    }

    /// Parses a canonical type string.
    pub fn from_str_strict(s: &str) -> AptosResult<Self> {
        Self::parse_with_generics(s, &[])
    }

    /// Parses a type string in which `T0`, `T1`, ... refer to `generics`.
    ///
    /// Used for ABI parameter types of generic functions.
    pub fn parse_with_generics(s: &str, generics: &[TypeTag]) -> AptosResult<Self> {
        let s = s.trim();
        if s.len() > MAX_TYPE_TAG_LENGTH {
            return Err(AptosError::InvalidTypeTag(format!(
                "type tag too long: {} bytes (max {})",
                s.len(),
                MAX_TYPE_TAG_LENGTH
            )));
        }
        Parser { generics }.parse_type(s, 0)
    }

    /// Encodes with the same nesting limit the decoder enforces.
    fn serialize_with_depth(&self, serializer: &mut Serializer, depth: usize) -> AptosResult<()> {
        if depth > MAX_TYPE_NESTING_DEPTH {
            return Err(CodecError::OutOfRange(format!(
                "type tag nesting deeper than {MAX_TYPE_NESTING_DEPTH}"
            ))
            .into());
        }
        serializer.variant(self.variant_index());
        match self {
            Self::Vector(inner) => inner.serialize_with_depth(serializer, depth + 1),
            Self::Struct(tag) => tag.serialize_with_depth(serializer, depth),
            _ => Ok(()),
        }
    }

    fn deserialize_with_depth(deserializer: &mut Deserializer<'_>, depth: usize) -> AptosResult<Self> {
        if depth > MAX_TYPE_NESTING_DEPTH {
            return Err(CodecError::OutOfRange(format!(
                "type tag nesting deeper than {MAX_TYPE_NESTING_DEPTH}"
            ))
            .into());
        }
        Ok(match deserializer.variant()? {
            0 => Self::Bool,
            1 => Self::U8,
            2 => Self::U64,
            3 => Self::U128,
            4 => Self::Address,
            5 => Self::Signer,
            6 => Self::Vector(Box::new(Self::deserialize_with_depth(
                deserializer,
                depth + 1,
            )?)),
            7 => Self::Struct(Box::new(StructTag::deserialize_with_depth(
                deserializer,
                depth,
            )?)),
            8 => Self::U16,
            9 => Self::U32,
            10 => Self::U256,
            other => return Err(CodecError::unknown_variant("TypeTag", other).into()),
        })
    }
}

struct Parser<'g> {
    generics: &'g [TypeTag],
}

impl Parser<'_> {
    fn parse_type(&self, s: &str, depth: usize) -> AptosResult<TypeTag> {
        if depth > MAX_TYPE_NESTING_DEPTH {
            return Err(AptosError::InvalidTypeTag(format!(
                "type tag nesting too deep: {depth} levels (max {MAX_TYPE_NESTING_DEPTH})"
            )));
        }
        let s = s.trim();
        match s {
            "bool" => return Ok(TypeTag::Bool),
            "u8" => return Ok(TypeTag::U8),
            "u16" => return Ok(TypeTag::U16),
            "u32" => return Ok(TypeTag::U32),
            "u64" => return Ok(TypeTag::U64),
            "u128" => return Ok(TypeTag::U128),
            "u256" => return Ok(TypeTag::U256),
            "address" => return Ok(TypeTag::Address),
            "signer" => return Ok(TypeTag::Signer),
            _ => {}
        }

        if let Some(index) = s.strip_prefix('T').and_then(|n| n.parse::<usize>().ok()) {
            return self.generics.get(index).cloned().ok_or_else(|| {
                AptosError::InvalidTypeTag(format!("unbound generic type parameter {s}"))
            });
        }

        if let Some(rest) = s.strip_prefix("vector") {
            let rest = rest.trim_start();
            if let Some(inner) = rest.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
                let inner_tag = self.parse_type(inner, depth + 1)?;
                return Ok(TypeTag::vector(inner_tag));
            }
        }

        self.parse_struct(s, depth).map(TypeTag::struct_tag)
    }

    fn parse_struct(&self, s: &str, depth: usize) -> AptosResult<StructTag> {
        let (base, type_args_str) = match s.find('<') {
            Some(idx) => {
                let Some(args) = s[idx + 1..].strip_suffix('>') else {
                    return Err(AptosError::InvalidTypeTag(format!(
                        "malformed generic type: {s}"
                    )));
                };
                (&s[..idx], Some(args))
            }
            None => (s, None),
        };

        let parts: Vec<&str> = base.split("::").map(str::trim).collect();
        let [address, module, name] = parts.as_slice() else {
            return Err(AptosError::InvalidTypeTag(format!(
                "invalid struct type format (expected address::module::name): {s}"
            )));
        };

        let address = AccountAddress::from_str(address)
            .map_err(|e| AptosError::InvalidTypeTag(format!("{s}: {e}")))?;
        let type_args = match type_args_str {
            Some(args) => self.parse_type_args(args, depth)?,
            None => vec![],
        };

        Ok(StructTag {
            address,
            module: Identifier::new(*module)?,
            name: Identifier::new(*name)?,
            type_args,
        })
    }

    fn parse_type_args(&self, s: &str, depth: usize) -> AptosResult<Vec<TypeTag>> {
        if s.trim().is_empty() {
            return Err(AptosError::InvalidTypeTag(
                "empty type argument list".to_string(),
            ));
        }

        let mut result = Vec::new();
        let mut bracket_depth: usize = 0;
        let mut start = 0;

        for (i, c) in s.char_indices() {
            match c {
                '<' => bracket_depth += 1,
                '>' => {
                    bracket_depth = bracket_depth.checked_sub(1).ok_or_else(|| {
                        AptosError::InvalidTypeTag(format!("unbalanced '>' in {s}"))
                    })?;
                }
                ',' if bracket_depth == 0 => {
                    result.push(self.parse_type(&s[start..i], depth + 1)?);
                    start = i + 1;
                }
                _ => {}
            }
        }
        if bracket_depth != 0 {
            return Err(AptosError::InvalidTypeTag(format!("unbalanced '<' in {s}")));
        }
        result.push(self.parse_type(&s[start..], depth + 1)?);
        Ok(result)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{inner}>"),
            TypeTag::Struct(tag) => write!(f, "{tag}"),
        }
    }
}

impl FromStr for TypeTag {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_strict(s)
    }
}

impl BcsCodec for TypeTag {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.serialize_with_depth(serializer, 0)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::deserialize_with_depth(deserializer, 0)
    }
}

/// A fully qualified function such as `0x1::aptos_account::transfer`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryFunctionId {
    /// The module that declares the function.
    pub module: MoveModuleId,
    /// The function name.
    pub name: Identifier,
}

impl EntryFunctionId {
    /// Creates an entry function ID.
    pub fn new(module: MoveModuleId, name: Identifier) -> Self {
        Self { module, name }
    }

    /// Parses `address::module::function`.
    pub fn from_str_strict(s: &str) -> AptosResult<Self> {
        let parts: Vec<&str> = s.trim().split("::").map(str::trim).collect();
        let [address, module, name] = parts.as_slice() else {
            return Err(AptosError::InvalidTypeTag(format!(
                "invalid entry function ID format: {s}"
            )));
        };
        Ok(Self {
            module: MoveModuleId::new(AccountAddress::from_str(address)?, Identifier::new(*module)?),
            name: Identifier::new(*name)?,
        })
    }
}

impl fmt::Display for EntryFunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

impl FromStr for EntryFunctionId {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_strict(s)
    }
}
