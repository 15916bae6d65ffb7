//! Harness Configuration
//!
//! The harness never reads ambient state on its own. The process environment
//! is read exactly once, by [`HarnessConfig::from_env`], and the resulting
//! struct is handed to the harness at construction.
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `ANCHOR_PROVIDER_URL` | yes | Cluster moniker or RPC URL |
//! | `ANCHOR_WALLET` | yes | Path to the payer's JSON keypair file |
//! | `ESCROW_OPENBOOKS_COMMITMENT` | no | `processed`, `confirmed` (default) or `finalized` |
//! | `ESCROW_OPENBOOKS_CONFIRM_TIMEOUT_SECS` | no | Confirmation deadline, default 30 |
//! | `ESCROW_OPENBOOKS_IDL` | no | Path to the generated IDL for the program |

use crate::error::{HarnessError, HarnessResult};
use reqwest::Url;
use serde::Deserialize;
use solana_sdk::signature::{read_keypair_file, Keypair};
use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

// =============================================================================
// ENVIRONMENT KEYS
// =============================================================================

pub const PROVIDER_URL_VAR: &str = "ANCHOR_PROVIDER_URL";
pub const WALLET_VAR: &str = "ANCHOR_WALLET";
pub const COMMITMENT_VAR: &str = "ESCROW_OPENBOOKS_COMMITMENT";
pub const CONFIRM_TIMEOUT_VAR: &str = "ESCROW_OPENBOOKS_CONFIRM_TIMEOUT_SECS";
pub const IDL_VAR: &str = "ESCROW_OPENBOOKS_IDL";

/// Default confirmation deadline.
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// CLUSTER
// =============================================================================

/// Target cluster, parsed from a moniker or a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cluster {
    /// Local test validator on `127.0.0.1:8899`
    Localnet,
    Devnet,
    Testnet,
    Mainnet,
    /// Any other `http(s)` endpoint
    Custom(Url),
}

impl Cluster {
    /// JSON-RPC endpoint for the cluster.
    pub fn url(&self) -> String {
        match self {
            Cluster::Localnet => "http://127.0.0.1:8899".to_string(),
            Cluster::Devnet => "https://api.devnet.solana.com".to_string(),
            Cluster::Testnet => "https://api.testnet.solana.com".to_string(),
            Cluster::Mainnet => "https://api.mainnet-beta.solana.com".to_string(),
            Cluster::Custom(url) => url.to_string(),
        }
    }
}

impl FromStr for Cluster {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "" => Err(HarnessError::Network("cluster endpoint is empty".to_string())),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "mainnet" | "mainnet-beta" => Ok(Cluster::Mainnet),
            _ => {
                let url = Url::parse(s).map_err(|e| {
                    HarnessError::Network(format!("invalid cluster endpoint `{s}`: {e}"))
                })?;
                match url.scheme() {
                    "http" | "https" => Ok(Cluster::Custom(url)),
                    other => Err(HarnessError::Network(format!(
                        "unsupported endpoint scheme `{other}` in `{s}`"
                    ))),
                }
            }
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

// =============================================================================
// COMMITMENT
// =============================================================================

/// How far a transaction must progress before the call returns.
///
/// Ordered: `Processed < Confirmed < Finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    /// Name used by the JSON-RPC API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl FromStr for Commitment {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(HarnessError::Config(format!("unknown commitment `{other}`"))),
        }
    }
}

// =============================================================================
// HARNESS CONFIG
// =============================================================================

/// Everything the harness needs to reach the cluster.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub cluster: Cluster,
    /// JSON keypair file of the fee payer / signer
    pub wallet_path: PathBuf,
    pub commitment: Commitment,
    pub confirm_timeout: Duration,
    /// Generated IDL used to resolve the program handle, if any
    pub idl_path: Option<PathBuf>,
}

impl HarnessConfig {
    /// Config with default commitment and timeout and no IDL.
    pub fn new(cluster: Cluster, wallet_path: impl Into<PathBuf>) -> Self {
        Self {
            cluster,
            wallet_path: wallet_path.into(),
            commitment: Commitment::default(),
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
            idl_path: None,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> HarnessResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// * `Network` - provider URL unset or invalid
    /// * `Config` - wallet unset, or commitment/timeout malformed
    pub fn from_vars<F>(lookup: F) -> HarnessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cluster = lookup(PROVIDER_URL_VAR)
            .ok_or_else(|| HarnessError::Network(format!("{PROVIDER_URL_VAR} is not set")))?
            .parse::<Cluster>()?;

        let wallet_path = lookup(WALLET_VAR)
            .filter(|path| !path.trim().is_empty())
            .ok_or_else(|| HarnessError::Config(format!("{WALLET_VAR} is not set")))?;

        let mut config = Self::new(cluster, wallet_path);

        if let Some(commitment) = lookup(COMMITMENT_VAR) {
            config.commitment = commitment.parse()?;
        }

        if let Some(secs) = lookup(CONFIRM_TIMEOUT_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                HarnessError::Config(format!("invalid {CONFIRM_TIMEOUT_VAR} `{secs}`: {e}"))
            })?;
            if secs == 0 {
                return Err(HarnessError::Config(format!(
                    "{CONFIRM_TIMEOUT_VAR} must be greater than zero"
                )));
            }
            config.confirm_timeout = Duration::from_secs(secs);
        }

        config.idl_path = lookup(IDL_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    /// Load the payer keypair from `wallet_path`.
    pub fn load_payer(&self) -> HarnessResult<Keypair> {
        read_keypair_file(&self.wallet_path).map_err(|e| {
            HarnessError::Config(format!(
                "failed to read wallet {}: {}",
                self.wallet_path.display(),
                e
            ))
        })
    }
}
