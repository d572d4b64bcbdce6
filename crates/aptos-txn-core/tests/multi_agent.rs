//! Multi-agent and fee-payer signing across independent parties.
//!
//! Each party only sees the hex-encoded transaction and its own key, the
//! way separate signing services would.

use aptos_txn_core::account::{account_from_private_key, Account};
use aptos_txn_core::codec::BcsCodec;
use aptos_txn_core::crypto::{AnyPrivateKey, Ed25519PrivateKey, Secp256k1PrivateKey};
use aptos_txn_core::signing::{merge_authenticators, sign_multi_agent, transaction_hash};
use aptos_txn_core::transaction::{
    EntryFunction, RawTransactionWithData, SignedTransaction, TransactionAuthenticator,
    TransactionBuilder,
};
use aptos_txn_core::types::{AccountAddress, ChainId};

struct Party {
    key: String,
    address: AccountAddress,
}

impl Party {
    fn ed25519() -> Self {
        Self::from_key(Ed25519PrivateKey::generate().to_hex())
    }

    fn secp256k1() -> Self {
        Self::from_key(AnyPrivateKey::from(Secp256k1PrivateKey::generate()).to_aip80())
    }

    fn from_key(key: String) -> Self {
        let address = account_from_private_key(&key).unwrap().address();
        Self { key, address }
    }

    fn sign(&self, data_hex: &str) -> String {
        sign_multi_agent(data_hex, &self.key, None).unwrap().1
    }
}

struct Scenario {
    sender: Party,
    secondaries: [Party; 2],
    fee_payer: Party,
}

impl Scenario {
    fn new() -> Self {
        Self {
            sender: Party::ed25519(),
            secondaries: [Party::secp256k1(), Party::ed25519()],
            fee_payer: Party::ed25519(),
        }
    }

    fn data(&self, fee_payer: Option<AccountAddress>) -> RawTransactionWithData {
        let payload = EntryFunction::from_function_id(
            "0x1::aptos_account::transfer",
            vec![],
            vec![
                AccountAddress::TWO.to_bcs().unwrap(),
                1_000u64.to_bcs().unwrap(),
            ],
        )
        .unwrap();
        TransactionBuilder::new()
            .sender(self.sender.address)
            .sequence_number(12)
            .payload(payload.into())
            .chain_id(ChainId::Testnet)
            .expiration_timestamp_secs(2_000_000_000)
            .build_fee_payer(
                self.secondaries.iter().map(|p| p.address).collect(),
                fee_payer,
            )
            .unwrap()
    }
}

fn to_hex(bytes: Vec<u8>) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn decode_signed(hex_str: &str) -> SignedTransaction {
    SignedTransaction::from_bcs(&hex::decode(hex_str.trim_start_matches("0x")).unwrap()).unwrap()
}

#[test]
fn test_merge_two_secondaries_and_fee_payer() {
    let scenario = Scenario::new();
    let data = scenario.data(Some(scenario.fee_payer.address));
    let data_hex = to_hex(data.to_bcs().unwrap());

    let sender_auth = scenario.sender.sign(&data_hex);
    let secondary_auths: Vec<String> = scenario
        .secondaries
        .iter()
        .map(|p| p.sign(&data_hex))
        .collect();
    let fee_payer_auth = scenario.fee_payer.sign(&data_hex);

    let secondary_refs: Vec<&str> = secondary_auths.iter().map(String::as_str).collect();
    let signed_hex =
        merge_authenticators(&data_hex, &sender_auth, Some(&fee_payer_auth), &secondary_refs)
            .unwrap();
    let signed = decode_signed(&signed_hex);

    assert_eq!(signed.raw_txn, *data.raw_txn());
    assert!(signed.verify_signature());
    assert!(signed.authenticator.verify(&data.signing_message().unwrap()));
    match &signed.authenticator {
        TransactionAuthenticator::FeePayer {
            secondary_signer_addresses,
            fee_payer_address,
            ..
        } => {
            assert_eq!(secondary_signer_addresses, data.secondary_signer_addresses());
            assert_eq!(*fee_payer_address, scenario.fee_payer.address);
        }
        other => panic!("expected a fee payer authenticator, got {other:?}"),
    }

    let hash = transaction_hash(&signed_hex).unwrap();
    assert_eq!(hash, signed.hash().unwrap().to_hex());
}

#[test]
fn test_any_wrong_signer_fails_verification() {
    let scenario = Scenario::new();
    let data = scenario.data(Some(scenario.fee_payer.address));
    let data_hex = to_hex(data.to_bcs().unwrap());
    let message = data.signing_message().unwrap();

    let honest = [
        scenario.sender.sign(&data_hex),
        scenario.secondaries[0].sign(&data_hex),
        scenario.secondaries[1].sign(&data_hex),
        scenario.fee_payer.sign(&data_hex),
    ];
    let impostor = Party::ed25519().sign(&data_hex);

    for replaced in 0..honest.len() {
        let mut auths = honest.clone();
        auths[replaced] = impostor.clone();
        let signed_hex =
            merge_authenticators(&data_hex, &auths[0], Some(&auths[3]), &[&auths[1], &auths[2]])
                .unwrap();
        let signed = decode_signed(&signed_hex);
        assert!(!signed.authenticator.verify(&message), "slot {replaced}");
        assert!(!signed.verify_signature(), "slot {replaced}");
    }
}

#[test]
fn test_swapped_secondaries_fail_verification() {
    let scenario = Scenario::new();
    let data = scenario.data(Some(scenario.fee_payer.address));
    let data_hex = to_hex(data.to_bcs().unwrap());

    let first = scenario.secondaries[0].sign(&data_hex);
    let second = scenario.secondaries[1].sign(&data_hex);
    let signed_hex = merge_authenticators(
        &data_hex,
        &scenario.sender.sign(&data_hex),
        Some(&scenario.fee_payer.sign(&data_hex)),
        &[&second, &first],
    )
    .unwrap();
    // Signatures alone verify; matching them to addresses is the chain's
    // authentication key check.
    let signed = decode_signed(&signed_hex);
    assert!(signed.verify_signature());
    let keys: Vec<_> = match &signed.authenticator {
        TransactionAuthenticator::FeePayer {
            secondary_signers, ..
        } => secondary_signers
            .iter()
            .map(|auth| auth.authentication_key().unwrap().account_address())
            .collect(),
        other => panic!("unexpected authenticator {other:?}"),
    };
    assert_eq!(
        keys,
        vec![scenario.secondaries[1].address, scenario.secondaries[0].address]
    );
}

#[test]
fn test_fee_payer_resolved_after_other_signatures() {
    let scenario = Scenario::new();
    let unresolved = scenario.data(None);
    let unresolved_hex = to_hex(unresolved.to_bcs().unwrap());
    assert_eq!(unresolved.fee_payer_address(), Some(AccountAddress::ZERO));

    let sender_auth = scenario.sender.sign(&unresolved_hex);
    let secondary_auths: Vec<String> = scenario
        .secondaries
        .iter()
        .map(|p| p.sign(&unresolved_hex))
        .collect();

    let fee_payer_address = scenario.fee_payer.address.to_string();
    let (resolved_hex, fee_payer_auth) = sign_multi_agent(
        &unresolved_hex,
        &scenario.fee_payer.key,
        Some(&fee_payer_address),
    )
    .unwrap();

    let signed_hex = merge_authenticators(
        &resolved_hex,
        &sender_auth,
        Some(&fee_payer_auth),
        &[&secondary_auths[0], &secondary_auths[1]],
    )
    .unwrap();
    let signed = decode_signed(&signed_hex);
    assert_eq!(
        signed.authenticator.fee_payer_address(),
        Some(scenario.fee_payer.address)
    );
    assert!(signed.verify_signature());
}

#[test]
fn test_multi_agent_without_fee_payer() {
    let scenario = Scenario::new();
    let data = RawTransactionWithData::new_multi_agent(
        scenario.data(None).into_raw_txn(),
        vec![scenario.secondaries[0].address],
    );
    let data_hex = to_hex(data.to_bcs().unwrap());

    let signed_hex = merge_authenticators(
        &data_hex,
        &scenario.sender.sign(&data_hex),
        None,
        &[&scenario.secondaries[0].sign(&data_hex)],
    )
    .unwrap();
    let signed = decode_signed(&signed_hex);
    assert_eq!(signed.authenticator.kind(), "multi_agent");
    assert!(signed.verify_signature());

    let err = merge_authenticators(&data_hex, &scenario.sender.sign(&data_hex), None, &[])
        .unwrap_err();
    assert!(err.to_string().contains("secondary"));
}
