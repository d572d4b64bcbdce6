//! Transaction authenticators.
//!
//! An [`AccountAuthenticator`] proves that one account approved a signing
//! message. A [`TransactionAuthenticator`] says who authorizes the
//! transaction as a whole: a single sender, a sender plus secondary
//! signers, or all of those plus a fee payer.

use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::crypto::{
    AnyPublicKey, AnySignature, AuthenticationKey, Ed25519PublicKey, Ed25519Signature,
    MultiEd25519PublicKey, MultiEd25519Signature, MultiKeyPublicKey, MultiKeySignature, PublicKey,
    SingleKeyAuthenticator, VerifyingKey,
};
use crate::error::{AptosError, AptosResult, CodecError};
use crate::types::AccountAddress;

/// One account's approval of a signing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountAuthenticator {
    /// A single Ed25519 key.
    Ed25519 {
        /// The signing key.
        public_key: Ed25519PublicKey,
        /// The signature.
        signature: Ed25519Signature,
    },
    /// A legacy k-of-n Ed25519 key.
    MultiEd25519 {
        /// The multi-key.
        public_key: MultiEd25519PublicKey,
        /// The aggregated signature.
        signature: MultiEd25519Signature,
    },
    /// A single key of any supported scheme.
    SingleKey {
        /// The key and its signature.
        authenticator: SingleKeyAuthenticator,
    },
    /// A k-of-n key of mixed schemes.
    MultiKey {
        /// The multi-key.
        public_key: MultiKeyPublicKey,
        /// Signatures from the participating keys.
        signature: MultiKeySignature,
    },
    /// A placeholder used for simulation. It never verifies.
    NoAccountAuthenticator,
}

impl AccountAuthenticator {
    const ED25519: u32 = 0;
    const MULTI_ED25519: u32 = 1;
    const SINGLE_KEY: u32 = 2;
    const MULTI_KEY: u32 = 3;
    const NO_ACCOUNT_AUTHENTICATOR: u32 = 4;

    /// Creates an Ed25519 authenticator.
    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }

    /// Creates a multi-Ed25519 authenticator.
    pub fn multi_ed25519(
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> Self {
        Self::MultiEd25519 {
            public_key,
            signature,
        }
    }

    /// Creates a single-key authenticator.
    pub fn single_key(public_key: AnyPublicKey, signature: AnySignature) -> Self {
        Self::SingleKey {
            authenticator: SingleKeyAuthenticator::new(public_key, signature),
        }
    }

    /// Creates a multi-key authenticator.
    pub fn multi_key(public_key: MultiKeyPublicKey, signature: MultiKeySignature) -> Self {
        Self::MultiKey {
            public_key,
            signature,
        }
    }

    /// Returns true if the authenticator's signature is valid for `message`.
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::SingleKey { authenticator } => authenticator.verify(message),
            Self::MultiKey {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::NoAccountAuthenticator => false,
        }
    }

    /// The authentication key of the signing account, if there is one.
    pub fn authentication_key(&self) -> Option<AuthenticationKey> {
        match self {
            Self::Ed25519 { public_key, .. } => Some(public_key.authentication_key()),
            Self::MultiEd25519 { public_key, .. } => Some(public_key.authentication_key()),
            Self::SingleKey { authenticator } => {
                Some(authenticator.public_key().authentication_key())
            }
            Self::MultiKey { public_key, .. } => Some(public_key.authentication_key()),
            Self::NoAccountAuthenticator => None,
        }
    }

    /// The variant name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ed25519 { .. } => "ed25519",
            Self::MultiEd25519 { .. } => "multi_ed25519",
            Self::SingleKey { .. } => "single_key",
            Self::MultiKey { .. } => "multi_key",
            Self::NoAccountAuthenticator => "no_account_authenticator",
        }
    }
}

impl BcsCodec for AccountAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.variant(Self::ED25519);
                serializer.value(public_key)?;
                serializer.value(signature)
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                serializer.variant(Self::MULTI_ED25519);
                serializer.value(public_key)?;
                serializer.value(signature)
            }
            Self::SingleKey { authenticator } => {
                serializer.variant(Self::SINGLE_KEY);
                serializer.value(authenticator)
            }
            Self::MultiKey {
                public_key,
                signature,
            } => {
                serializer.variant(Self::MULTI_KEY);
                serializer.value(public_key)?;
                serializer.value(signature)
            }
            Self::NoAccountAuthenticator => {
                serializer.variant(Self::NO_ACCOUNT_AUTHENTICATOR);
                Ok(())
            }
        }
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.variant()? {
            Self::ED25519 => Ok(Self::Ed25519 {
                public_key: deserializer.value()?,
                signature: deserializer.value()?,
            }),
            Self::MULTI_ED25519 => Ok(Self::MultiEd25519 {
                public_key: deserializer.value()?,
                signature: deserializer.value()?,
            }),
            Self::SINGLE_KEY => Ok(Self::SingleKey {
                authenticator: deserializer.value()?,
            }),
            Self::MULTI_KEY => Ok(Self::MultiKey {
                public_key: deserializer.value()?,
                signature: deserializer.value()?,
            }),
            Self::NO_ACCOUNT_AUTHENTICATOR => Ok(Self::NoAccountAuthenticator),
            index => Err(CodecError::unknown_variant("AccountAuthenticator", index).into()),
        }
    }
}

/// Authorization of a whole transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    /// A single Ed25519 sender.
    Ed25519 {
        /// The sender's key.
        public_key: Ed25519PublicKey,
        /// The sender's signature.
        signature: Ed25519Signature,
    },
    /// A single multi-Ed25519 sender.
    MultiEd25519 {
        /// The sender's multi-key.
        public_key: MultiEd25519PublicKey,
        /// The sender's aggregated signature.
        signature: MultiEd25519Signature,
    },
    /// A sender plus secondary signers.
    MultiAgent {
        /// The sender.
        sender: AccountAuthenticator,
        /// Secondary signer addresses, in the order they sign.
        secondary_signer_addresses: Vec<AccountAddress>,
        /// One authenticator per secondary signer address.
        secondary_signers: Vec<AccountAuthenticator>,
    },
    /// A sender, secondary signers and a separate fee payer.
    FeePayer {
        /// The sender.
        sender: AccountAuthenticator,
        /// Secondary signer addresses, in the order they sign.
        secondary_signer_addresses: Vec<AccountAddress>,
        /// One authenticator per secondary signer address.
        secondary_signers: Vec<AccountAuthenticator>,
        /// The account paying for gas.
        fee_payer_address: AccountAddress,
        /// The fee payer's authenticator.
        fee_payer_signer: AccountAuthenticator,
    },
    /// A single sender of any account type.
    SingleSender {
        /// The sender.
        sender: AccountAuthenticator,
    },
}

fn check_secondaries(
    secondary_signer_addresses: &[AccountAddress],
    secondary_signers: &[AccountAuthenticator],
) -> AptosResult<()> {
    if secondary_signer_addresses.len() != secondary_signers.len() {
        return Err(AptosError::composition(format!(
            "{} secondary signer addresses but {} secondary authenticators",
            secondary_signer_addresses.len(),
            secondary_signers.len()
        )));
    }
    Ok(())
}

impl TransactionAuthenticator {
    const ED25519: u32 = 0;
    const MULTI_ED25519: u32 = 1;
    const MULTI_AGENT: u32 = 2;
    const FEE_PAYER: u32 = 3;
    const SINGLE_SENDER: u32 = 4;

    /// Wraps a lone sender's authenticator.
    ///
    /// Ed25519 and multi-Ed25519 senders use their dedicated variants; every
    /// other account type goes through `SingleSender`.
    pub fn single_sender(sender: AccountAuthenticator) -> Self {
        match sender {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => Self::Ed25519 {
                public_key,
                signature,
            },
            AccountAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => Self::MultiEd25519 {
                public_key,
                signature,
            },
            sender => Self::SingleSender { sender },
        }
    }

    /// Creates a multi-agent authenticator.
    ///
    /// Secondary addresses and authenticators must pair up one to one.
    pub fn multi_agent(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    ) -> AptosResult<Self> {
        check_secondaries(&secondary_signer_addresses, &secondary_signers)?;
        Ok(Self::MultiAgent {
            sender,
            secondary_signer_addresses,
            secondary_signers,
        })
    }

    /// Creates a fee-payer authenticator.
    pub fn fee_payer(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    ) -> AptosResult<Self> {
        check_secondaries(&secondary_signer_addresses, &secondary_signers)?;
        Ok(Self::FeePayer {
            sender,
            secondary_signer_addresses,
            secondary_signers,
            fee_payer_address,
            fee_payer_signer,
        })
    }

    /// The sender's authenticator.
    pub fn sender(&self) -> AccountAuthenticator {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => AccountAuthenticator::ed25519(*public_key, *signature),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => AccountAuthenticator::multi_ed25519(public_key.clone(), signature.clone()),
            Self::MultiAgent { sender, .. }
            | Self::FeePayer { sender, .. }
            | Self::SingleSender { sender } => sender.clone(),
        }
    }

    /// Secondary signer addresses, empty for single-sender variants.
    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            Self::MultiAgent {
                secondary_signer_addresses,
                ..
            }
            | Self::FeePayer {
                secondary_signer_addresses,
                ..
            } => secondary_signer_addresses,
            _ => &[],
        }
    }

    /// The fee payer address, for the fee-payer variant.
    pub fn fee_payer_address(&self) -> Option<AccountAddress> {
        match self {
            Self::FeePayer {
                fee_payer_address, ..
            } => Some(*fee_payer_address),
            _ => None,
        }
    }

    /// True for variants signed over `RawTransactionWithData`.
    pub fn has_transaction_data(&self) -> bool {
        matches!(self, Self::MultiAgent { .. } | Self::FeePayer { .. })
    }

    /// Returns true only if every contained authenticator verifies
    /// `message`.
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::SingleSender { sender } => sender.verify(message),
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                secondary_signer_addresses.len() == secondary_signers.len()
                    && sender.verify(message)
                    && secondary_signers.iter().all(|auth| auth.verify(message))
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_signer,
                ..
            } => {
                secondary_signer_addresses.len() == secondary_signers.len()
                    && sender.verify(message)
                    && secondary_signers.iter().all(|auth| auth.verify(message))
                    && fee_payer_signer.verify(message)
            }
        }
    }

    /// The variant name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ed25519 { .. } => "ed25519",
            Self::MultiEd25519 { .. } => "multi_ed25519",
            Self::MultiAgent { .. } => "multi_agent",
            Self::FeePayer { .. } => "fee_payer",
            Self::SingleSender { .. } => "single_sender",
        }
    }
}

impl BcsCodec for TransactionAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.variant(Self::ED25519);
                serializer.value(public_key)?;
                serializer.value(signature)
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                serializer.variant(Self::MULTI_ED25519);
                serializer.value(public_key)?;
                serializer.value(signature)
            }
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                check_secondaries(secondary_signer_addresses, secondary_signers)?;
                serializer.variant(Self::MULTI_AGENT);
                serializer.value(sender)?;
                serializer.sequence(secondary_signer_addresses)?;
                serializer.sequence(secondary_signers)
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                check_secondaries(secondary_signer_addresses, secondary_signers)?;
                serializer.variant(Self::FEE_PAYER);
                serializer.value(sender)?;
                serializer.sequence(secondary_signer_addresses)?;
                serializer.sequence(secondary_signers)?;
                serializer.value(fee_payer_address)?;
                serializer.value(fee_payer_signer)
            }
            Self::SingleSender { sender } => {
                serializer.variant(Self::SINGLE_SENDER);
                serializer.value(sender)
            }
        }
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.variant()? {
            Self::ED25519 => Ok(Self::Ed25519 {
                public_key: deserializer.value()?,
                signature: deserializer.value()?,
            }),
            Self::MULTI_ED25519 => Ok(Self::MultiEd25519 {
                public_key: deserializer.value()?,
                signature: deserializer.value()?,
            }),
            Self::MULTI_AGENT => {
                let sender = deserializer.value()?;
                let secondary_signer_addresses = deserializer.sequence()?;
                let secondary_signers = deserializer.sequence()?;
                Self::multi_agent(sender, secondary_signer_addresses, secondary_signers)
            }
            Self::FEE_PAYER => {
                let sender = deserializer.value()?;
                let secondary_signer_addresses = deserializer.sequence()?;
                let secondary_signers = deserializer.sequence()?;
                let fee_payer_address = deserializer.value()?;
                let fee_payer_signer = deserializer.value()?;
                Self::fee_payer(
                    sender,
                    secondary_signer_addresses,
                    secondary_signers,
                    fee_payer_address,
                    fee_payer_signer,
                )
            }
            Self::SINGLE_SENDER => Ok(Self::SingleSender {
                sender: deserializer.value()?,
            }),
            index => Err(CodecError::unknown_variant("TransactionAuthenticator", index).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Ed25519PrivateKey, Secp256k1PrivateKey};

    fn ed25519_auth(key: &Ed25519PrivateKey, message: &[u8]) -> AccountAuthenticator {
        AccountAuthenticator::ed25519(key.public_key(), key.sign(message))
    }

    #[test]
    fn test_account_authenticator_variants() {
        let message = b"approve";
        let ed = Ed25519PrivateKey::generate();
        let secp = Secp256k1PrivateKey::generate();

        let auths = vec![
            ed25519_auth(&ed, message),
            AccountAuthenticator::single_key(secp.public_key().into(), secp.sign(message).into()),
            AccountAuthenticator::multi_ed25519(
                MultiEd25519PublicKey::new(vec![ed.public_key()], 1).unwrap(),
                MultiEd25519Signature::new(vec![(0, ed.sign(message))]).unwrap(),
            ),
            AccountAuthenticator::multi_key(
                MultiKeyPublicKey::new(vec![secp.public_key().into()], 1).unwrap(),
                MultiKeySignature::new(vec![(0, secp.sign(message).into())]).unwrap(),
            ),
        ];
        for (auth, tag) in auths.iter().zip([0u8, 2, 1, 3]) {
            assert!(auth.verify(message), "{} should verify", auth.kind());
            assert!(!auth.verify(b"other"));
            let bytes = auth.to_bcs().unwrap();
            assert_eq!(bytes[0], tag);
            assert_eq!(&AccountAuthenticator::from_bcs(&bytes).unwrap(), auth);
            assert!(auth.authentication_key().is_some());
        }
    }

    #[test]
    fn test_no_account_authenticator() {
        let auth = AccountAuthenticator::NoAccountAuthenticator;
        assert!(!auth.verify(b"anything"));
        assert_eq!(auth.to_bcs().unwrap(), vec![4]);
        assert_eq!(AccountAuthenticator::from_bcs(&[4]).unwrap(), auth);
        assert!(auth.authentication_key().is_none());
        assert!(AccountAuthenticator::from_bcs(&[5]).is_err());
    }

    #[test]
    fn test_single_sender_wrapping() {
        let ed = Ed25519PrivateKey::generate();
        let wrapped = TransactionAuthenticator::single_sender(ed25519_auth(&ed, b"m"));
        assert!(matches!(wrapped, TransactionAuthenticator::Ed25519 { .. }));
        assert_eq!(wrapped.to_bcs().unwrap()[0], 0);
        assert!(wrapped.verify(b"m"));

        let secp = Secp256k1PrivateKey::generate();
        let single_key =
            AccountAuthenticator::single_key(secp.public_key().into(), secp.sign(b"m").into());
        let wrapped = TransactionAuthenticator::single_sender(single_key.clone());
        assert_eq!(wrapped.to_bcs().unwrap()[0], 4);
        assert_eq!(wrapped.sender(), single_key);
        assert!(wrapped.verify(b"m"));
    }

    #[test]
    fn test_multi_agent_requires_all() {
        let message = b"together";
        let sender = Ed25519PrivateKey::generate();
        let second = Ed25519PrivateKey::generate();
        let intruder = Ed25519PrivateKey::generate();

        let auth = TransactionAuthenticator::multi_agent(
            ed25519_auth(&sender, message),
            vec![second.public_key().to_address()],
            vec![ed25519_auth(&second, message)],
        )
        .unwrap();
        assert!(auth.verify(message));

        let bytes = auth.to_bcs().unwrap();
        assert_eq!(bytes[0], 2);
        assert_eq!(TransactionAuthenticator::from_bcs(&bytes).unwrap(), auth);

        let forged = TransactionAuthenticator::multi_agent(
            ed25519_auth(&sender, message),
            vec![second.public_key().to_address()],
            vec![ed25519_auth(&intruder, b"something else")],
        )
        .unwrap();
        assert!(!forged.verify(message));
    }

    #[test]
    fn test_length_mismatch_is_composition_error() {
        let sender = Ed25519PrivateKey::generate();
        let result = TransactionAuthenticator::multi_agent(
            ed25519_auth(&sender, b"m"),
            vec![AccountAddress::ONE, AccountAddress::TWO],
            vec![ed25519_auth(&sender, b"m")],
        );
        assert!(matches!(result, Err(AptosError::Composition(_))));
    }

    #[test]
    fn test_fee_payer_round_trip() {
        let message = b"sponsored";
        let sender = Ed25519PrivateKey::generate();
        let payer = Ed25519PrivateKey::generate();
        let payer_address = payer.public_key().to_address();

        let auth = TransactionAuthenticator::fee_payer(
            ed25519_auth(&sender, message),
            vec![],
            vec![],
            payer_address,
            ed25519_auth(&payer, message),
        )
        .unwrap();
        assert!(auth.verify(message));
        assert_eq!(auth.fee_payer_address(), Some(payer_address));
        assert!(auth.has_transaction_data());

        let bytes = auth.to_bcs().unwrap();
        assert_eq!(bytes[0], 3);
        assert_eq!(TransactionAuthenticator::from_bcs(&bytes).unwrap(), auth);

        let bad_payer = TransactionAuthenticator::fee_payer(
            ed25519_auth(&sender, message),
            vec![],
            vec![],
            payer_address,
            AccountAuthenticator::NoAccountAuthenticator,
        )
        .unwrap();
        assert!(!bad_payer.verify(message));
    }

    #[test]
    fn test_unknown_transaction_authenticator_variant() {
        match TransactionAuthenticator::from_bcs(&[5]) {
            Err(AptosError::Codec(CodecError::UnknownVariant { index: 5, .. })) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
