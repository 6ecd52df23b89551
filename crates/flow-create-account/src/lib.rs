//! Create a new Flow account paid for by a sponsor account.
//!
//! [`run`] reads the latest sealed block and the sponsor account, generates
//! a key pair for the new account, submits the account creation transaction
//! signed by the sponsor, waits for it to be sealed and reports the new
//! address with its private key.

pub mod config;
pub mod error;
pub mod report;

use std::io::Write;

use flow_kit::{
    AccessApi, AccountCreationRequest, Address, Error, Identifier, InMemorySigner, PrivateKey,
    SealPoller, Signer, build_account_creation, generate_account_key, sign_and_submit,
};
use rand::{CryptoRng, RngCore};
use tokio_util::sync::CancellationToken;

pub use config::{Args, Config};
pub use error::CliError;
pub use report::Reporter;

/// What a successful run created.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub transaction_id: Identifier,
    pub address: Address,
    pub private_key: PrivateKey,
}

/// Create one account as described by `config`.
///
/// Progress goes to `out`. `cancel` aborts whichever network call or
/// seal wait is in progress.
pub async fn run<A, R, W>(
    config: &Config,
    api: &A,
    rng: &mut R,
    out: W,
    cancel: CancellationToken,
) -> Result<Outcome, CliError>
where
    A: AccessApi,
    R: RngCore + CryptoRng,
    W: Write,
{
    let mut reporter = Reporter::new(out);

    let block = until_cancelled(&cancel, "fetching the latest block", async {
        api.latest_block(true).await.map_err(Error::from)
    })
    .await?;
    reporter.block(&block)?;

    let sponsor = until_cancelled(&cancel, "fetching the sponsor account", async {
        api.account_at_latest_block(&config.sponsor_address)
            .await
            .map_err(Error::from)
    })
    .await?;
    reporter.sponsor(&sponsor)?;

    let signer = sponsor_signer(config, &sponsor)?;

    let new_key = generate_account_key(
        rng,
        config.new_key_signature_algorithm,
        config.new_key_hash_algorithm,
        config.key_weight,
    )
    .map_err(Error::from)?;
    if new_key.account_key.public_key == signer.public_key() {
        return Err(Error::KeyReuse.into());
    }

    let tx = build_account_creation(&AccountCreationRequest {
        sponsor: &sponsor,
        sponsor_key_index: config.sponsor_key_index,
        reference_block: &block,
        keys: vec![new_key.account_key.clone()],
        contracts: config.contracts.clone(),
        gas_limit: config.gas_limit,
    })?;

    let transaction_id = until_cancelled(
        &cancel,
        "submitting the transaction",
        sign_and_submit(api, tx, &signer),
    )
    .await?;

    let mut output_error = None;
    let result = SealPoller::new(api, config.poll.clone())
        .with_cancellation(cancel.clone())
        .wait_for_seal_with(transaction_id, |event| {
            if output_error.is_none() {
                output_error = reporter.poll_event(&event).err();
            }
        })
        .await?;
    if let Some(e) = output_error {
        return Err(e.into());
    }

    let address = result.created_address(&transaction_id);
    if address.is_zero() {
        tracing::warn!(
            transaction_id = %transaction_id,
            "Sealed transaction has no AccountCreated event"
        );
    }
    reporter.created(&address, &new_key.private_key)?;

    Ok(Outcome {
        transaction_id,
        address,
        private_key: new_key.private_key,
    })
}

/// Await `fut` unless `cancel` fires first.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    stage: &'static str,
    fut: impl Future<Output = Result<T, Error>>,
) -> Result<T, CliError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CliError::Cancelled(stage)),
        result = fut => Ok(result?),
    }
}

/// Signer for the sponsor key, checked against the key on chain.
fn sponsor_signer(
    config: &Config,
    sponsor: &flow_kit::Account,
) -> Result<InMemorySigner, CliError> {
    let key = sponsor
        .key(config.sponsor_key_index)
        .filter(|k| !k.revoked)
        .ok_or(Error::KeyNotFound {
            address: sponsor.address,
            key_index: config.sponsor_key_index,
        })?;

    if key.public_key != config.sponsor_private_key.public_key() {
        return Err(CliError::Config(format!(
            "sponsor private key does not match key {} of account {}",
            config.sponsor_key_index, sponsor.address
        )));
    }

    Ok(InMemorySigner::new(
        sponsor.address,
        key.index,
        config.sponsor_private_key.clone(),
        key.hash_algorithm,
    ))
}
