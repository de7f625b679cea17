// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger types and network constants.

use crate::models::{EnrollmentAction, TransactionResponse, WalletAddress};

/// EVM network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: String,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Block explorer URL
    pub explorer_url: String,
}

/// Ethereum Sepolia testnet chain id.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Sepolia block explorer.
pub const SEPOLIA_EXPLORER_URL: &str = "https://sepolia.etherscan.io";

impl NetworkConfig {
    /// Sepolia testnet reached through the given RPC endpoint.
    pub fn sepolia(rpc_url: impl Into<String>) -> Self {
        Self {
            name: "Sepolia".to_string(),
            chain_id: SEPOLIA_CHAIN_ID,
            rpc_url: rpc_url.into(),
            explorer_url: SEPOLIA_EXPLORER_URL.to_string(),
        }
    }

    /// Explorer link for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

/// Confirmed ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash (0x-prefixed)
    pub tx_hash: String,
    /// Block number where the transaction was included
    pub block_number: Option<u64>,
    /// Block explorer URL for the transaction
    pub explorer_url: Option<String>,
}

impl From<TxReceipt> for TransactionResponse {
    fn from(receipt: TxReceipt) -> Self {
        Self {
            success: true,
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
            explorer_url: receipt.explorer_url,
        }
    }
}

/// A decoded, client-signed student enrollment transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRequest {
    /// Recovered signer of the transaction.
    pub student: WalletAddress,
    pub action: EnrollmentAction,
    pub course_id: u64,
    /// EIP-2718 encoded signed transaction, broadcast as-is.
    pub raw: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_url_joins_explorer_and_hash() {
        let mut network = NetworkConfig::sepolia("http://localhost:8545");
        assert_eq!(network.tx_url("0xabc"), "https://sepolia.etherscan.io/tx/0xabc");

        network.explorer_url = "http://explorer.local/".into();
        assert_eq!(network.tx_url("0xabc"), "http://explorer.local/tx/0xabc");
    }

    #[test]
    fn receipt_converts_to_response() {
        let response: TransactionResponse = TxReceipt {
            tx_hash: "0x01".into(),
            block_number: Some(12),
            explorer_url: None,
        }
        .into();
        assert!(response.success);
        assert_eq!(response.tx_hash, "0x01");
        assert_eq!(response.block_number, Some(12));
    }
}
