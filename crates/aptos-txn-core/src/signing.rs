//! Hex-in, hex-out signing entry points.
//!
//! These functions are the surface a signing backend exposes. Every byte
//! payload crosses the boundary as hex: inputs may carry a `0x` prefix and
//! use either case, and outputs are always lowercase with `0x`.
//!
//! A sponsored transaction is assembled in three steps. Each party calls
//! [`sign_multi_agent`] on the same `RawTransactionWithData` and returns
//! its authenticator. [`merge_authenticators`] then builds the signed
//! transaction, and [`transaction_hash`] identifies it.

use crate::account::account_from_private_key;
use crate::codec::BcsCodec;
use crate::crypto::decode_hex;
use crate::error::{AptosError, AptosResult};
use crate::transaction::{
    sign_transaction, AccountAuthenticator, PartiallySigned, RawTransaction,
    RawTransactionWithData, SignedTransaction,
};
use crate::types::AccountAddress;
use tracing::{debug, info, warn};

fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn decode<T: BcsCodec>(hex_str: &str) -> AptosResult<T> {
    T::from_bcs(&decode_hex(hex_str)?)
}

/// Signs a BCS-encoded `RawTransaction` and returns the BCS-encoded
/// `SignedTransaction`.
///
/// `private_key` may be bare hex (read as Ed25519) or an AIP-80 string.
///
/// # Errors
///
/// Returns an error if the hex, the transaction or the key cannot be
/// decoded.
pub fn sign_raw_transaction(raw_txn_hex: &str, private_key: &str) -> AptosResult<String> {
    let raw_txn: RawTransaction = decode(raw_txn_hex)?;
    let account = account_from_private_key(private_key)?;
    if account.address() != raw_txn.sender {
        warn!(
            sender = %raw_txn.sender,
            signer = %account.address(),
            "Signing key does not derive the transaction sender's address"
        );
    }
    let signed = sign_transaction(&raw_txn, account.as_ref())?;
    info!(
        sender = %raw_txn.sender,
        sequence_number = raw_txn.sequence_number,
        authenticator = signed.authenticator.kind(),
        "Signed transaction"
    );
    Ok(encode_hex(&signed.to_bcs()?))
}

/// Signs a BCS-encoded `RawTransactionWithData` as one of its parties.
///
/// When `fee_payer` is given it is written into the transaction first,
/// turning a multi-agent transaction into a fee-payer one if needed. The
/// returned pair is the transaction that was actually signed and the
/// signer's `AccountAuthenticator`, both BCS hex.
///
/// # Errors
///
/// Returns an error if the hex, the transaction, the fee payer address or
/// the key cannot be decoded.
pub fn sign_multi_agent(
    raw_txn_with_data_hex: &str,
    private_key: &str,
    fee_payer: Option<&str>,
) -> AptosResult<(String, String)> {
    let mut data: RawTransactionWithData = decode(raw_txn_with_data_hex)?;
    if let Some(fee_payer) = fee_payer {
        let address: AccountAddress = fee_payer.parse()?;
        debug!(fee_payer = %address, "Setting fee payer before signing");
        data.set_fee_payer(address);
    }
    let account = account_from_private_key(private_key)?;
    let authenticator = account.sign(&data.signing_message()?)?;
    info!(
        sender = %data.sender(),
        signer = %account.address(),
        authenticator = authenticator.kind(),
        "Signed multi-agent transaction"
    );
    Ok((encode_hex(&data.to_bcs()?), encode_hex(&authenticator.to_bcs()?)))
}

/// Combines independently produced authenticators into a BCS-encoded
/// `SignedTransaction`.
///
/// `secondary_auths` must follow the order of the transaction's secondary
/// signer addresses. A fee payer authenticator is required exactly when
/// the transaction has a fee payer.
///
/// Bad signatures are not rejected. A transaction whose authenticators do
/// not verify is still returned, with a warning logged; call
/// [`SignedTransaction::verify_signature`] on the decoded result before
/// submitting it.
///
/// # Errors
///
/// Returns a composition error if the number of secondary authenticators
/// is wrong or a required authenticator is missing, and a decoding error
/// for malformed input. Failed verification is not an error.
pub fn merge_authenticators(
    raw_txn_with_data_hex: &str,
    sender_auth_hex: &str,
    fee_payer_auth_hex: Option<&str>,
    secondary_auths_hex: &[&str],
) -> AptosResult<String> {
    let data: RawTransactionWithData = decode(raw_txn_with_data_hex)?;
    let addresses = data.secondary_signer_addresses().to_vec();
    if addresses.len() != secondary_auths_hex.len() {
        return Err(AptosError::composition(format!(
            "transaction has {} secondary signers but {} authenticators were supplied",
            addresses.len(),
            secondary_auths_hex.len()
        )));
    }

    let mut pending = PartiallySigned::new(data);
    pending.add_sender(decode(sender_auth_hex)?);
    for (address, auth_hex) in addresses.into_iter().zip(secondary_auths_hex) {
        let authenticator: AccountAuthenticator = decode(auth_hex)?;
        pending.add_secondary(address, authenticator)?;
    }
    if let Some(fee_payer_auth_hex) = fee_payer_auth_hex {
        pending.add_fee_payer(decode(fee_payer_auth_hex)?)?;
    }

    let signed = pending.finish()?;
    if !signed.verify_signature() {
        warn!(
            sender = %signed.sender(),
            "Merged authenticators do not verify against the transaction"
        );
    }
    info!(
        sender = %signed.sender(),
        authenticator = signed.authenticator.kind(),
        "Merged transaction authenticators"
    );
    Ok(encode_hex(&signed.to_bcs()?))
}

/// Returns the hash of a BCS-encoded `SignedTransaction`.
///
/// # Errors
///
/// Returns an error if the input is not a valid signed transaction.
pub fn transaction_hash(signed_txn_hex: &str) -> AptosResult<String> {
    let signed: SignedTransaction = decode(signed_txn_hex)?;
    Ok(signed.hash()?.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, Ed25519Account};
    use crate::crypto::{AnyPrivateKey, Secp256k1PrivateKey};
    use crate::transaction::{Script, ScriptArgument, TransactionBuilder};

    fn raw_txn(sender: AccountAddress) -> RawTransaction {
        TransactionBuilder::new()
            .sender(sender)
            .sequence_number(9)
            .payload(Script::new(vec![0xab], vec![], vec![ScriptArgument::U64(4)]).into())
            .expiration_timestamp_secs(1_900_000_000)
            .build()
            .unwrap()
    }

    #[test]
    fn test_sign_raw_transaction() {
        let account = Ed25519Account::generate();
        let raw = raw_txn(account.address());
        let raw_hex = encode_hex(&raw.to_bcs().unwrap()).to_uppercase().replacen("0X", "0x", 1);

        let signed_hex = sign_raw_transaction(&raw_hex, &account.private_key().to_hex()).unwrap();
        assert!(signed_hex.starts_with("0x"));
        assert_eq!(signed_hex, signed_hex.to_lowercase());

        let signed: SignedTransaction = decode(&signed_hex).unwrap();
        assert_eq!(signed.raw_txn, raw);
        assert!(signed.verify_signature());

        let hash = transaction_hash(&signed_hex).unwrap();
        assert_eq!(hash, signed.hash().unwrap().to_hex());
        assert_eq!(hash.len(), 66);
    }

    #[test]
    fn test_sign_raw_transaction_secp256k1() {
        let key = AnyPrivateKey::from(Secp256k1PrivateKey::generate());
        let raw = raw_txn(key.public_key().to_address());
        let signed_hex =
            sign_raw_transaction(&encode_hex(&raw.to_bcs().unwrap()), &key.to_aip80()).unwrap();
        let signed: SignedTransaction = decode(&signed_hex).unwrap();
        assert_eq!(signed.authenticator.kind(), "single_sender");
        assert!(signed.verify_signature());
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(
            sign_raw_transaction("0xzz", "0x01"),
            Err(AptosError::Hex(_))
        ));
        assert!(sign_raw_transaction("0x00", "0x01").unwrap_err().is_codec_error());
        assert!(transaction_hash("0x").unwrap_err().is_codec_error());
    }

    #[test]
    fn test_sign_multi_agent_sets_fee_payer() {
        let sender = Ed25519Account::generate();
        let data = RawTransactionWithData::new_multi_agent(raw_txn(sender.address()), vec![]);
        let data_hex = encode_hex(&data.to_bcs().unwrap());

        let (signed_data_hex, auth_hex) = sign_multi_agent(
            &data_hex,
            &sender.private_key().to_hex(),
            Some("0x3"),
        )
        .unwrap();
        let signed_data: RawTransactionWithData = decode(&signed_data_hex).unwrap();
        assert_eq!(signed_data.fee_payer_address(), Some(AccountAddress::THREE));

        let auth: AccountAuthenticator = decode(&auth_hex).unwrap();
        assert!(auth.verify(&signed_data.signing_message().unwrap()));
        assert!(!auth.verify(&data.signing_message().unwrap()));
    }

    #[test]
    fn test_merge_rejects_wrong_secondary_count() {
        let sender = Ed25519Account::generate();
        let data = RawTransactionWithData::new_multi_agent(
            raw_txn(sender.address()),
            vec![AccountAddress::TWO],
        );
        let data_hex = encode_hex(&data.to_bcs().unwrap());
        let (_, sender_auth) =
            sign_multi_agent(&data_hex, &sender.private_key().to_hex(), None).unwrap();

        let err = merge_authenticators(&data_hex, &sender_auth, None, &[]).unwrap_err();
        assert!(matches!(err, AptosError::Composition(_)));

        let err = merge_authenticators(&data_hex, &sender_auth, Some(&sender_auth), &[&sender_auth])
            .unwrap_err();
        assert!(matches!(err, AptosError::Composition(_)));
    }

    #[test]
    fn test_merge_returns_unverified_transaction() {
        let sender = Ed25519Account::generate();
        let payer = Ed25519Account::generate();
        let data = RawTransactionWithData::new_fee_payer(raw_txn(sender.address()), vec![], None);
        let data_hex = encode_hex(&data.to_bcs().unwrap());
        let (_, sender_auth) =
            sign_multi_agent(&data_hex, &sender.private_key().to_hex(), None).unwrap();
        // Signed over the resolved address, merged into the unresolved one.
        let payer_address = payer.address().to_string();
        let (_, payer_auth) = sign_multi_agent(
            &data_hex,
            &payer.private_key().to_hex(),
            Some(&payer_address),
        )
        .unwrap();

        let signed_hex = merge_authenticators(&data_hex, &sender_auth, Some(&payer_auth), &[])
            .unwrap();
        let signed: SignedTransaction = decode(&signed_hex).unwrap();
        assert_eq!(signed.authenticator.fee_payer_address(), Some(AccountAddress::ZERO));
        assert!(!signed.verify_signature());
    }
}
