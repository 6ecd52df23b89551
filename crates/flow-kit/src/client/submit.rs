//! Envelope signing and submission.

use super::{AccessApi, Signer};
use crate::error::Error;
use crate::types::{Identifier, Transaction};

/// Sign the envelope of `tx` as its payer and attach the signature.
///
/// The signer's account must be the payer; in account creation it is also
/// the proposer and only authorizer, so one envelope signature covers all
/// three roles.
pub fn sign_envelope<S: Signer + ?Sized>(tx: &mut Transaction, signer: &S) -> Result<(), Error> {
    let address = signer.address();
    if address != tx.payer {
        return Err(Error::InvalidTransaction(format!(
            "envelope signer {} is not the payer {}",
            address, tx.payer
        )));
    }

    let signature = signer.sign(&tx.signable_envelope())?;
    tx.add_envelope_signature(address, signer.key_index(), signature)?;
    Ok(())
}

/// Validate, sign and submit `tx`, returning the transaction ID.
///
/// Errors are not retried here; transport retries happen inside the
/// Access API client.
pub async fn sign_and_submit<A, S>(
    api: &A,
    mut tx: Transaction,
    signer: &S,
) -> Result<Identifier, Error>
where
    A: AccessApi,
    S: Signer + ?Sized,
{
    tx.validate()?;
    sign_envelope(&mut tx, signer)?;

    let id = api.send_transaction(&tx).await?;
    tracing::info!(
        transaction_id = %id,
        proposer = %tx.proposal_key.address,
        sequence_number = tx.proposal_key.sequence_number,
        "Transaction submitted"
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemorySigner;
    use crate::testing;
    use crate::types::{Address, HashAlgorithm, PrivateKey, SignatureAlgorithm};

    fn setup() -> (Transaction, InMemorySigner) {
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaP256, &[4u8; 32]).unwrap();
        let address: Address = "01cf0e2f2f715450".parse().unwrap();

        let mut tx = Transaction::new("transaction { prepare(signer: &Account) {} }");
        tx.set_reference_block_id(testing::block(10).id())
            .set_proposal_key(address, 0, 0)
            .set_payer(address)
            .add_authorizer(address);

        let signer = InMemorySigner::new(address, 0, key, HashAlgorithm::Sha3_256);
        (tx, signer)
    }

    #[test]
    fn test_sign_envelope_verifies() {
        let (mut tx, signer) = setup();
        let message = tx.signable_envelope();
        sign_envelope(&mut tx, &signer).unwrap();

        assert_eq!(tx.envelope_signatures.len(), 1);
        let sig = &tx.envelope_signatures[0];
        assert_eq!(sig.address, signer.address());
        assert_eq!(sig.key_index, 0);
        assert!(
            signer
                .public_key()
                .verify(&message, &sig.signature, HashAlgorithm::Sha3_256)
        );
    }

    #[test]
    fn test_sign_envelope_rejects_non_payer() {
        let (mut tx, signer) = setup();
        tx.set_payer("02".parse().unwrap());
        let result = sign_envelope(&mut tx, &signer);
        assert!(matches!(result, Err(Error::InvalidTransaction(_))));
        assert!(tx.envelope_signatures.is_empty());
    }

    #[tokio::test]
    async fn test_sign_and_submit_returns_id() {
        let (tx, signer) = setup();
        let api = testing::StubAccessApi::new(testing::block(10)).with_account(testing::account(
            signer.address(),
            1000,
            signer.private_key(),
            HashAlgorithm::Sha3_256,
            0,
        ));

        let id = sign_and_submit(&api, tx, &signer).await.unwrap();
        let sent = api.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id(), id);
        assert_eq!(sent[0].envelope_signatures.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_sequence_number_rejected() {
        let (_, signer) = setup();
        let api = testing::StubAccessApi::new(testing::block(10)).with_account(testing::account(
            signer.address(),
            1000,
            signer.private_key(),
            HashAlgorithm::Sha3_256,
            3,
        ));

        // Build from the sponsor's current on-chain sequence number
        let sponsor = api.account_at_latest_block(&signer.address()).await.unwrap();
        let proposal = crate::client::proposal_key_for(&sponsor, 0).unwrap();
        assert_eq!(proposal.sequence_number, 3);

        let mut tx = Transaction::new("transaction { prepare(signer: &Account) {} }");
        tx.set_reference_block_id(testing::block(10).id())
            .set_proposal_key(proposal.address, proposal.key_index, proposal.sequence_number)
            .set_payer(signer.address())
            .add_authorizer(signer.address());

        sign_and_submit(&api, tx.clone(), &signer).await.unwrap();
        assert_eq!(
            api.account(&signer.address()).unwrap().keys[0].sequence_number,
            4
        );

        // Same sequence number again is stale
        let result = sign_and_submit(&api, tx, &signer).await;
        match result {
            Err(Error::Access(e)) => {
                assert!(e.is_invalid_proposal_key());
                assert!(matches!(
                    e,
                    crate::error::AccessError::InvalidProposalKey {
                        expected: 4,
                        actual: 3
                    }
                ));
            }
            other => panic!("Expected InvalidProposalKey, got {:?}", other),
        }
        assert_eq!(api.sent_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_sign_and_submit_rejects_invalid_transaction() {
        let (mut tx, signer) = setup();
        tx.reference_block_id = Identifier::ZERO;
        let api = testing::StubAccessApi::new(testing::block(10));

        let result = sign_and_submit(&api, tx, &signer).await;
        assert!(matches!(result, Err(Error::InvalidTransaction(_))));
        assert!(api.sent_transactions().is_empty());
    }
}
