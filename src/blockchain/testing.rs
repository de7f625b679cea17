// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger doubles for fault injection in tests.

use alloy::primitives::Address;
use async_trait::async_trait;

use super::{EnrollmentRequest, Ledger, LedgerError, LedgerResult, TxReceipt, SEPOLIA_CHAIN_ID};
use crate::models::WalletAddress;

/// Ledger whose every call fails with the error built by `fault`.
pub(crate) struct FailingLedger {
    fault: fn() -> LedgerError,
}

impl FailingLedger {
    /// Fails the way an unreachable RPC node does.
    pub(crate) fn unreachable() -> Self {
        Self {
            fault: || LedgerError::RpcError("connection refused".into()),
        }
    }

    /// Writes are submitted but never confirm within the wait bound.
    pub(crate) fn stalled() -> Self {
        Self {
            fault: || LedgerError::ConfirmationTimeout {
                tx_hash: "0xfeed".into(),
            },
        }
    }

    fn fail<T>(&self) -> LedgerResult<T> {
        Err((self.fault)())
    }
}

#[async_trait]
impl Ledger for FailingLedger {
    fn contract_address(&self) -> Address {
        Address::ZERO
    }
    fn chain_id(&self) -> u64 {
        SEPOLIA_CHAIN_ID
    }
    async fn pending_courses(&self, _: &WalletAddress) -> LedgerResult<Vec<u64>> {
        self.fail()
    }
    async fn approved_courses(&self, _: &WalletAddress) -> LedgerResult<Vec<u64>> {
        self.fail()
    }
    async fn is_admin(&self, _: &WalletAddress) -> LedgerResult<bool> {
        self.fail()
    }
    async fn approve_course(&self, _: &WalletAddress, _: u64) -> LedgerResult<TxReceipt> {
        self.fail()
    }
    async fn set_course_capacity(&self, _: u64, _: u64) -> LedgerResult<TxReceipt> {
        self.fail()
    }
    async fn add_admin(&self, _: &WalletAddress) -> LedgerResult<TxReceipt> {
        self.fail()
    }
    async fn remove_admin(&self, _: &WalletAddress) -> LedgerResult<TxReceipt> {
        self.fail()
    }
    async fn submit_enrollment(&self, _: &EnrollmentRequest) -> LedgerResult<TxReceipt> {
        self.fail()
    }
    async fn block_number(&self) -> LedgerResult<u64> {
        self.fail()
    }
}
