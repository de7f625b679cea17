// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, default values, and the [`AppConfig`] loaded
//! from them once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `DATA_DIR` | Directory holding the record database | `./data` |
//! | `STORE_BACKEND` | Record store (`redb` or `memory`) | `redb` |
//! | `LEDGER_RPC_URL` | JSON-RPC endpoint of the EVM network | In-memory ledger when unset |
//! | `LEDGER_CHAIN_ID` | Chain id the RPC endpoint and relayed txs must match | `11155111` |
//! | `LEDGER_EXPLORER_URL` | Explorer for transaction links | `https://sepolia.etherscan.io` |
//! | `CONTRACT_ADDRESS` | Registration contract address | Required with `LEDGER_RPC_URL` |
//! | `ADMIN_PRIVATE_KEY` | Hex admin signing key | One of key/PEM required with `LEDGER_RPC_URL` |
//! | `ADMIN_KEY_PEM` | Path to a PEM admin signing key | |
//! | `LEDGER_CONFIRMATION_TIMEOUT_SECS` | Bound on confirmation waits | `120` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use alloy::primitives::Address;

use crate::blockchain::types::{SEPOLIA_CHAIN_ID, SEPOLIA_EXPLORER_URL};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Directory for the redb record database.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const STORE_BACKEND_ENV: &str = "STORE_BACKEND";

/// JSON-RPC endpoint. When unset the server runs against an in-memory
/// contract simulation.
pub const LEDGER_RPC_URL_ENV: &str = "LEDGER_RPC_URL";
pub const LEDGER_CHAIN_ID_ENV: &str = "LEDGER_CHAIN_ID";
pub const LEDGER_EXPLORER_URL_ENV: &str = "LEDGER_EXPLORER_URL";
pub const CONTRACT_ADDRESS_ENV: &str = "CONTRACT_ADDRESS";
pub const ADMIN_PRIVATE_KEY_ENV: &str = "ADMIN_PRIVATE_KEY";
pub const ADMIN_KEY_PEM_ENV: &str = "ADMIN_KEY_PEM";
pub const LEDGER_CONFIRMATION_TIMEOUT_ENV: &str = "LEDGER_CONFIRMATION_TIMEOUT_SECS";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("{0} must be set when LEDGER_RPC_URL is configured")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redb,
    Memory,
}

/// Where the admin signing key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum AdminKeySource {
    Hex(String),
    PemFile(PathBuf),
}

impl std::fmt::Debug for AdminKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hex(_) => f.write_str("Hex(<redacted>)"),
            Self::PemFile(path) => f.debug_tuple("PemFile").field(path).finish(),
        }
    }
}

/// Connection settings for the deployed registration contract.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub explorer_url: String,
    pub contract_address: Address,
    pub admin_key: AdminKeySource,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub store_backend: StoreBackend,
    /// `None` selects the in-memory ledger.
    pub chain: Option<ChainConfig>,
    pub confirmation_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var(PORT_ENV) {
            Some(raw) => parse(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: HOST_ENV,
                reason: e.to_string(),
            })?;

        let data_dir = PathBuf::from(var(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.into()));

        let store_backend = match var(STORE_BACKEND_ENV).as_deref() {
            None | Some("redb") => StoreBackend::Redb,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: STORE_BACKEND_ENV,
                    reason: format!("unknown backend '{other}' (expected redb or memory)"),
                })
            }
        };

        let confirmation_timeout = match var(LEDGER_CONFIRMATION_TIMEOUT_ENV) {
            Some(raw) => Duration::from_secs(parse(LEDGER_CONFIRMATION_TIMEOUT_ENV, &raw)?),
            None => DEFAULT_CONFIRMATION_TIMEOUT,
        };

        let chain = match var(LEDGER_RPC_URL_ENV) {
            None => None,
            Some(rpc_url) => {
                let chain_id = match var(LEDGER_CHAIN_ID_ENV) {
                    Some(raw) => parse(LEDGER_CHAIN_ID_ENV, &raw)?,
                    None => SEPOLIA_CHAIN_ID,
                };
                let explorer_url = var(LEDGER_EXPLORER_URL_ENV)
                    .unwrap_or_else(|| SEPOLIA_EXPLORER_URL.to_string());
                let contract_address = var(CONTRACT_ADDRESS_ENV)
                    .ok_or(ConfigError::Missing(CONTRACT_ADDRESS_ENV))
                    .and_then(|raw| parse(CONTRACT_ADDRESS_ENV, &raw))?;
                let admin_key = match (var(ADMIN_PRIVATE_KEY_ENV), var(ADMIN_KEY_PEM_ENV)) {
                    (Some(hex), _) => AdminKeySource::Hex(hex),
                    (None, Some(path)) => AdminKeySource::PemFile(PathBuf::from(path)),
                    (None, None) => return Err(ConfigError::Missing(ADMIN_PRIVATE_KEY_ENV)),
                };

                Some(ChainConfig {
                    rpc_url,
                    chain_id,
                    explorer_url,
                    contract_address,
                    admin_key,
                })
            }
        };

        Ok(Self {
            bind_addr,
            data_dir,
            store_backend,
            chain,
            confirmation_timeout,
        })
    }
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
