// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process simulation of the registration contract.
//!
//! Used when no RPC endpoint is configured, and as the ledger double in
//! tests. Every write is "mined" immediately into a new block.

use std::collections::{HashMap, HashSet};

use alloy::primitives::{keccak256, Address};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EnrollmentRequest, Ledger, LedgerError, LedgerResult, TxReceipt, SEPOLIA_CHAIN_ID};
use crate::models::{EnrollmentAction, WalletAddress};

#[derive(Default)]
struct ContractState {
    capacities: HashMap<u64, u64>,
    pending: HashMap<WalletAddress, Vec<u64>>,
    approved: HashMap<WalletAddress, Vec<u64>>,
    admins: HashSet<WalletAddress>,
    block_number: u64,
}

impl ContractState {
    fn enrolled_count(&self, course_id: u64) -> u64 {
        self.approved
            .values()
            .filter(|ids| ids.contains(&course_id))
            .count() as u64
    }

    fn mine(&mut self) -> TxReceipt {
        self.block_number += 1;
        let tx_hash = keccak256(self.block_number.to_be_bytes()).to_string();
        TxReceipt {
            tx_hash,
            block_number: Some(self.block_number),
            explorer_url: None,
        }
    }
}

fn revert(reason: impl std::fmt::Display) -> LedgerError {
    LedgerError::ContractError(format!("execution reverted: {}", reason))
}

/// Contract simulation holding enrollment state in memory.
pub struct InMemoryLedger {
    contract: Address,
    chain_id: u64,
    state: RwLock<ContractState>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(Address::ZERO)
    }
}

impl InMemoryLedger {
    /// Simulated contract at `contract` on Sepolia.
    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            chain_id: SEPOLIA_CHAIN_ID,
            state: RwLock::new(ContractState::default()),
        }
    }

    /// Seed a pending enrollment without going through a transaction.
    pub async fn insert_pending(&self, student: &WalletAddress, course_id: u64) {
        let mut state = self.state.write().await;
        state
            .pending
            .entry(student.clone())
            .or_default()
            .push(course_id);
    }

    /// Seed an approved enrollment without going through a transaction.
    pub async fn insert_approved(&self, student: &WalletAddress, course_id: u64) {
        let mut state = self.state.write().await;
        state
            .approved
            .entry(student.clone())
            .or_default()
            .push(course_id);
    }

    pub async fn capacity(&self, course_id: u64) -> Option<u64> {
        self.state.read().await.capacities.get(&course_id).copied()
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    fn contract_address(&self) -> Address {
        self.contract
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn pending_courses(&self, student: &WalletAddress) -> LedgerResult<Vec<u64>> {
        let state = self.state.read().await;
        Ok(state.pending.get(student).cloned().unwrap_or_default())
    }

    async fn approved_courses(&self, student: &WalletAddress) -> LedgerResult<Vec<u64>> {
        let state = self.state.read().await;
        Ok(state.approved.get(student).cloned().unwrap_or_default())
    }

    async fn is_admin(&self, account: &WalletAddress) -> LedgerResult<bool> {
        Ok(self.state.read().await.admins.contains(account))
    }

    async fn approve_course(
        &self,
        student: &WalletAddress,
        course_id: u64,
    ) -> LedgerResult<TxReceipt> {
        let mut state = self.state.write().await;

        let capacity = state.capacities.get(&course_id).copied().unwrap_or(0);
        if state.enrolled_count(course_id) >= capacity {
            return Err(revert(format!("course {} is full", course_id)));
        }

        let pending = state.pending.entry(student.clone()).or_default();
        let Some(position) = pending.iter().position(|id| *id == course_id) else {
            return Err(revert(format!(
                "no pending request for course {}",
                course_id
            )));
        };
        pending.remove(position);
        state
            .approved
            .entry(student.clone())
            .or_default()
            .push(course_id);

        Ok(state.mine())
    }

    async fn set_course_capacity(&self, course_id: u64, capacity: u64) -> LedgerResult<TxReceipt> {
        let mut state = self.state.write().await;
        state.capacities.insert(course_id, capacity);
        Ok(state.mine())
    }

    async fn add_admin(&self, account: &WalletAddress) -> LedgerResult<TxReceipt> {
        let mut state = self.state.write().await;
        state.admins.insert(account.clone());
        Ok(state.mine())
    }

    async fn remove_admin(&self, account: &WalletAddress) -> LedgerResult<TxReceipt> {
        let mut state = self.state.write().await;
        if !state.admins.remove(account) {
            return Err(revert(format!("{} is not an admin", account)));
        }
        Ok(state.mine())
    }

    async fn submit_enrollment(&self, request: &EnrollmentRequest) -> LedgerResult<TxReceipt> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let course_id = request.course_id;

        match request.action {
            EnrollmentAction::Add => {
                if !state.capacities.contains_key(&course_id) {
                    return Err(revert(format!("course {} does not exist", course_id)));
                }
                let already = state
                    .pending
                    .get(&request.student)
                    .is_some_and(|ids| ids.contains(&course_id))
                    || state
                        .approved
                        .get(&request.student)
                        .is_some_and(|ids| ids.contains(&course_id));
                if already {
                    return Err(revert(format!("already enrolled in course {}", course_id)));
                }
                state
                    .pending
                    .entry(request.student.clone())
                    .or_default()
                    .push(course_id);
            }
            EnrollmentAction::Remove => {
                let mut removed = false;
                for lists in [&mut state.pending, &mut state.approved] {
                    if let Some(ids) = lists.get_mut(&request.student) {
                        let before = ids.len();
                        ids.retain(|id| *id != course_id);
                        removed |= ids.len() != before;
                    }
                }
                if !removed {
                    return Err(revert(format!("not enrolled in course {}", course_id)));
                }
            }
        }

        Ok(state.mine())
    }

    async fn block_number(&self) -> LedgerResult<u64> {
        Ok(self.state.read().await.block_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(
        student: &WalletAddress,
        action: EnrollmentAction,
        course_id: u64,
    ) -> EnrollmentRequest {
        EnrollmentRequest {
            student: student.clone(),
            action,
            course_id,
            raw: Vec::new(),
        }
    }

    #[tokio::test]
    async fn enrollment_lifecycle() {
        let ledger = InMemoryLedger::default();
        let student = WalletAddress::from("0xaa");

        ledger.set_course_capacity(7, 1).await.unwrap();
        ledger
            .submit_enrollment(&enrollment(&student, EnrollmentAction::Add, 7))
            .await
            .unwrap();
        assert_eq!(ledger.pending_courses(&student).await.unwrap(), vec![7]);

        let receipt = ledger.approve_course(&student, 7).await.unwrap();
        assert_eq!(receipt.block_number, Some(3));
        assert!(receipt.tx_hash.starts_with("0x"));
        assert!(ledger.pending_courses(&student).await.unwrap().is_empty());
        assert_eq!(ledger.approved_courses(&student).await.unwrap(), vec![7]);

        ledger
            .submit_enrollment(&enrollment(&student, EnrollmentAction::Remove, 7))
            .await
            .unwrap();
        assert!(ledger.approved_courses(&student).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn approval_requires_pending_request_and_capacity() {
        let ledger = InMemoryLedger::default();
        let a = WalletAddress::from("0xaa");
        let b = WalletAddress::from("0xbb");

        ledger.set_course_capacity(7, 1).await.unwrap();
        assert!(ledger.approve_course(&a, 7).await.is_err());

        ledger.insert_pending(&a, 7).await;
        ledger.insert_pending(&b, 7).await;
        ledger.approve_course(&a, 7).await.unwrap();

        let err = ledger.approve_course(&b, 7).await.unwrap_err();
        assert!(err.to_string().contains("full"));
    }

    #[tokio::test]
    async fn enrolling_in_unknown_course_reverts() {
        let ledger = InMemoryLedger::default();
        let student = WalletAddress::from("0xaa");
        let err = ledger
            .submit_enrollment(&enrollment(&student, EnrollmentAction::Add, 9))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ContractError(_)));
        assert_eq!(ledger.block_number().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn admin_management() {
        let ledger = InMemoryLedger::default();
        let admin = WalletAddress::from("0xAD");

        assert!(!ledger.is_admin(&admin).await.unwrap());
        ledger.add_admin(&admin).await.unwrap();
        assert!(ledger.is_admin(&admin).await.unwrap());
        ledger.remove_admin(&admin).await.unwrap();
        assert!(!ledger.is_admin(&admin).await.unwrap());
        assert!(ledger.remove_admin(&admin).await.is_err());
    }

    #[tokio::test]
    async fn transaction_hashes_are_unique() {
        let ledger = InMemoryLedger::default();
        let first = ledger.set_course_capacity(1, 10).await.unwrap();
        let second = ledger.set_course_capacity(1, 20).await.unwrap();
        assert_ne!(first.tx_hash, second.tx_hash);
        assert_eq!(ledger.capacity(1).await, Some(20));
    }
}
