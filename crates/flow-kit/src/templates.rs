//! Transaction templates.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::types::cadence::Value;
use crate::types::{AccountKey, Address, Transaction};

/// Cadence source of the account creation transaction.
///
/// Keys are passed as parallel arrays; contract code is hex-encoded.
pub const CREATE_ACCOUNT_TEMPLATE: &str = r#"transaction(
    publicKeys: [String],
    signatureAlgorithms: [UInt8],
    hashAlgorithms: [UInt8],
    weights: [UFix64],
    contracts: {String: String}
) {
    prepare(signer: auth(BorrowValue | Storage) &Account) {
        pre {
            publicKeys.length == signatureAlgorithms.length &&
            publicKeys.length == hashAlgorithms.length &&
            publicKeys.length == weights.length: "key argument lengths differ"
        }

        let account = Account(payer: signer)

        var i = 0
        while i < publicKeys.length {
            let publicKey = PublicKey(
                publicKey: publicKeys[i].decodeHex(),
                signatureAlgorithm: SignatureAlgorithm(rawValue: signatureAlgorithms[i])!
            )
            account.keys.add(
                publicKey: publicKey,
                hashAlgorithm: HashAlgorithm(rawValue: hashAlgorithms[i])!,
                weight: weights[i]
            )
            i = i + 1
        }

        for name in contracts.keys {
            account.contracts.add(name: name, code: contracts[name]!.decodeHex())
        }
    }
}
"#;

/// Build an unsigned transaction that creates an account holding `keys`
/// and deploying `contracts`, paid for and authorized by `payer`.
///
/// The caller still sets the proposal key, reference block and gas limit.
pub fn create_account(
    keys: &[AccountKey],
    contracts: &BTreeMap<String, Vec<u8>>,
    payer: Address,
) -> Result<Transaction, Error> {
    if keys.is_empty() {
        return Err(Error::InvalidTransaction(
            "account creation needs at least one key".into(),
        ));
    }

    let public_keys = Value::string_array(keys.iter().map(|k| k.public_key.to_hex()));
    let signature_algorithms = Value::Array(
        keys.iter()
            .map(|k| Value::UInt8(k.signature_algorithm.cadence_raw_value()))
            .collect(),
    );
    let hash_algorithms = Value::Array(
        keys.iter()
            .map(|k| Value::UInt8(k.hash_algorithm.cadence_raw_value()))
            .collect(),
    );
    let weights = Value::Array(
        keys.iter()
            .map(|k| Value::UFix64(k.weight_ufix64()))
            .collect(),
    );
    let contracts = Value::string_dictionary(
        contracts
            .iter()
            .map(|(name, code)| (name.clone(), hex::encode(code))),
    );

    let mut tx = Transaction::new(CREATE_ACCOUNT_TEMPLATE);
    tx.add_argument(&public_keys)?
        .add_argument(&signature_algorithms)?
        .add_argument(&hash_algorithms)?
        .add_argument(&weights)?
        .add_argument(&contracts)?;
    tx.set_payer(payer).add_authorizer(payer);
    Ok(tx)
}
