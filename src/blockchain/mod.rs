// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! On-chain enrollment ledger.
//!
//! The registration contract is the system of record for which courses a
//! student has requested and which have been approved. This module provides:
//! - The [`Ledger`] trait used by handlers and the reconciler
//! - [`ContractLedger`], the JSON-RPC backed implementation
//! - [`InMemoryLedger`], a contract simulation for development and tests
//! - Decoding of client-signed enrollment transactions for relaying

pub mod client;
pub mod contract;
pub mod memory;
pub mod relay;
pub mod signing;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

use std::str::FromStr;

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::models::WalletAddress;

pub use client::ContractLedger;
pub use memory::InMemoryLedger;
pub use types::*;

/// Read and write access to the enrollment ledger.
///
/// Every write resolves only after the transaction is confirmed (or the
/// confirmation wait times out with [`LedgerError::ConfirmationTimeout`]).
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Address of the registration contract.
    fn contract_address(&self) -> Address;

    /// Chain the contract is deployed on; relayed transactions must match.
    fn chain_id(&self) -> u64;

    /// Course ids the student has requested but which are not yet approved.
    async fn pending_courses(&self, student: &WalletAddress) -> LedgerResult<Vec<u64>>;

    /// Course ids the student has been approved for.
    async fn approved_courses(&self, student: &WalletAddress) -> LedgerResult<Vec<u64>>;

    async fn is_admin(&self, account: &WalletAddress) -> LedgerResult<bool>;

    async fn approve_course(
        &self,
        student: &WalletAddress,
        course_id: u64,
    ) -> LedgerResult<TxReceipt>;

    async fn set_course_capacity(&self, course_id: u64, capacity: u64) -> LedgerResult<TxReceipt>;

    async fn add_admin(&self, account: &WalletAddress) -> LedgerResult<TxReceipt>;

    async fn remove_admin(&self, account: &WalletAddress) -> LedgerResult<TxReceipt>;

    /// Broadcast a student-signed addCourse/removeCourse transaction.
    async fn submit_enrollment(&self, request: &EnrollmentRequest) -> LedgerResult<TxReceipt>;

    /// Current block number, used for readiness checks.
    async fn block_number(&self) -> LedgerResult<u64>;
}

/// Errors that can occur during ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Course id out of range: {0}")]
    InvalidCourseId(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("RPC endpoint is on chain {actual}, expected {expected}")]
    WrongChain { expected: u64, actual: u64 },

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("Transaction {tx_hash} submitted; confirmation is still pending")]
    ConfirmationTimeout { tx_hash: String },
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Parse a wallet address into an EVM address.
pub fn parse_address(address: &WalletAddress) -> LedgerResult<Address> {
    Address::from_str(address.as_str())
        .map_err(|e| LedgerError::InvalidAddress(format!("{}: {}", address, e)))
}
