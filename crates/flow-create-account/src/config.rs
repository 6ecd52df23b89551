//! Command line flags and the validated run configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use flow_kit::{
    ACCOUNT_KEY_WEIGHT_THRESHOLD, Address, DEFAULT_ACCESS_API_URL, DEFAULT_GAS_LIMIT,
    HashAlgorithm, PollConfig, PrivateKey, RetryConfig, SignatureAlgorithm,
};

use crate::error::CliError;

/// Create a new Flow account paid for by a sponsor account.
#[derive(Parser, Debug, Clone)]
#[command(name = "flow-create-account", version, about)]
pub struct Args {
    /// Access API base URL
    #[arg(long, env = "FLOW_ACCESS_API", default_value = DEFAULT_ACCESS_API_URL)]
    pub access_api: String,

    /// Address of the account that pays for the new account
    #[arg(long, env = "FLOW_SPONSOR_ADDRESS")]
    pub sponsor_address: Address,

    /// Hex-encoded private key of the sponsor's signing key
    #[arg(long, env = "FLOW_SPONSOR_PRIVATE_KEY", hide_env_values = true)]
    pub sponsor_private_key: String,

    /// Index of the sponsor's signing key
    #[arg(long, env = "FLOW_SPONSOR_KEY_INDEX", default_value_t = 0)]
    pub sponsor_key_index: u32,

    /// Signature algorithm of the sponsor's private key
    #[arg(
        long,
        env = "FLOW_SPONSOR_SIGNATURE_ALGORITHM",
        default_value = "ECDSA_P256"
    )]
    pub sponsor_signature_algorithm: SignatureAlgorithm,

    /// Signature algorithm of the new account's key
    #[arg(
        long,
        env = "FLOW_NEW_KEY_SIGNATURE_ALGORITHM",
        default_value = "ECDSA_P256"
    )]
    pub signature_algorithm: SignatureAlgorithm,

    /// Hash algorithm of the new account's key
    #[arg(long, env = "FLOW_NEW_KEY_HASH_ALGORITHM", default_value = "SHA3_256")]
    pub hash_algorithm: HashAlgorithm,

    /// Weight of the new account's key (1-1000)
    #[arg(long, env = "FLOW_NEW_KEY_WEIGHT", default_value_t = ACCOUNT_KEY_WEIGHT_THRESHOLD)]
    pub key_weight: u32,

    /// Gas limit of the account creation transaction
    #[arg(long, env = "FLOW_GAS_LIMIT", default_value_t = DEFAULT_GAS_LIMIT)]
    pub gas_limit: u64,

    /// Contract to deploy to the new account, as NAME=PATH (repeatable)
    #[arg(long = "contract", value_name = "NAME=PATH")]
    pub contracts: Vec<String>,

    /// Delay between transaction status queries, in milliseconds
    #[arg(long, env = "FLOW_POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Maximum number of status queries (0 for no limit)
    #[arg(long, env = "FLOW_MAX_POLL_ATTEMPTS", default_value_t = 300)]
    pub max_poll_attempts: u32,

    /// Give up waiting for the seal after this many seconds (0 for no limit)
    #[arg(long, env = "FLOW_SEAL_TIMEOUT_SECS", default_value_t = 300)]
    pub seal_timeout_secs: u64,

    /// Retries for transient Access API failures
    #[arg(long, env = "FLOW_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub access_api: String,
    pub sponsor_address: Address,
    pub sponsor_private_key: PrivateKey,
    pub sponsor_key_index: u32,
    pub new_key_signature_algorithm: SignatureAlgorithm,
    pub new_key_hash_algorithm: HashAlgorithm,
    pub key_weight: u32,
    pub gas_limit: u64,
    /// Contract name to source code.
    pub contracts: BTreeMap<String, Vec<u8>>,
    pub poll: PollConfig,
    pub retry: RetryConfig,
}

impl Args {
    /// Validate the flags, decode the sponsor key and read contract files.
    pub fn into_config(self) -> Result<Config, CliError> {
        if self.access_api.trim().is_empty() {
            return Err(CliError::Config("access API URL is empty".to_string()));
        }

        let sponsor_private_key =
            PrivateKey::from_hex(self.sponsor_signature_algorithm, &self.sponsor_private_key)
                .map_err(|e| CliError::Config(format!("sponsor private key: {}", e)))?;

        if self.key_weight == 0 || self.key_weight > ACCOUNT_KEY_WEIGHT_THRESHOLD {
            return Err(CliError::Config(format!(
                "key weight {} is out of range (1..={})",
                self.key_weight, ACCOUNT_KEY_WEIGHT_THRESHOLD
            )));
        }
        if self.gas_limit == 0 {
            return Err(CliError::Config("gas limit must be positive".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(CliError::Config(
                "poll interval must be positive".to_string(),
            ));
        }

        let mut contracts = BTreeMap::new();
        for entry in &self.contracts {
            let (name, path) = parse_contract(entry)?;
            let code = std::fs::read(&path).map_err(|e| {
                CliError::Config(format!("contract {} ({}): {}", name, path.display(), e))
            })?;
            if contracts.insert(name.clone(), code).is_some() {
                return Err(CliError::Config(format!("contract {} given twice", name)));
            }
        }

        let poll = PollConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: (self.max_poll_attempts > 0).then_some(self.max_poll_attempts),
            timeout: (self.seal_timeout_secs > 0).then(|| Duration::from_secs(self.seal_timeout_secs)),
        };
        let retry = RetryConfig {
            max_retries: self.max_retries,
            ..RetryConfig::default()
        };

        Ok(Config {
            access_api: self.access_api.trim().to_string(),
            sponsor_address: self.sponsor_address,
            sponsor_private_key,
            sponsor_key_index: self.sponsor_key_index,
            new_key_signature_algorithm: self.signature_algorithm,
            new_key_hash_algorithm: self.hash_algorithm,
            key_weight: self.key_weight,
            gas_limit: self.gas_limit,
            contracts,
            poll,
            retry,
        })
    }
}

fn parse_contract(entry: &str) -> Result<(String, PathBuf), CliError> {
    let (name, path) = entry
        .split_once('=')
        .ok_or_else(|| CliError::Config(format!("contract '{}' is not NAME=PATH", entry)))?;
    let name = name.trim();

    let valid_name = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_name {
        return Err(CliError::Config(format!(
            "contract name '{}' is not a valid identifier",
            name
        )));
    }
    if path.is_empty() {
        return Err(CliError::Config(format!("contract {} has no path", name)));
    }

    Ok((name.to_string(), PathBuf::from(path)))
}
