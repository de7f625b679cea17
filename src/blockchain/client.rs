// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client for the course registration contract.

use std::future::Future;
use std::time::Duration;

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, U256},
    providers::{
        DynProvider, PendingTransactionBuilder, PendingTransactionError, Provider,
        ProviderBuilder,
    },
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;

use super::contract::{narrow_course_ids, ICourseRegistration};
use super::{parse_address, EnrollmentRequest, Ledger, LedgerError, LedgerResult};
use super::types::{NetworkConfig, TxReceipt};
use crate::models::WalletAddress;

type RegistrationContract = ICourseRegistration::ICourseRegistrationInstance<DynProvider>;

/// Ledger backed by the deployed registration contract.
///
/// Admin-class transactions are signed with the backend key held by the
/// provider's wallet filler.
pub struct ContractLedger {
    /// Network configuration
    network: NetworkConfig,
    /// Alloy HTTP provider with the admin wallet attached
    provider: DynProvider,
    contract: RegistrationContract,
    confirmation_timeout: Duration,
}

impl ContractLedger {
    /// Connect to the contract at `contract_address` on `network`.
    pub fn new(
        network: NetworkConfig,
        contract_address: Address,
        signer: PrivateKeySigner,
        confirmation_timeout: Duration,
    ) -> LedgerResult<Self> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| LedgerError::InvalidRpcUrl(e.to_string()))?;

        tracing::info!(
            network = %network.name,
            chain_id = network.chain_id,
            contract = %contract_address,
            admin = %signer.address(),
            "Connecting to registration contract"
        );

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self::with_provider(
            network,
            contract_address,
            provider,
            confirmation_timeout,
        ))
    }

    /// Use an already-built provider, e.g. one with a different transport.
    pub fn with_provider(
        network: NetworkConfig,
        contract_address: Address,
        provider: DynProvider,
        confirmation_timeout: Duration,
    ) -> Self {
        let contract = ICourseRegistration::new(contract_address, provider.clone());
        Self {
            network,
            provider,
            contract,
            confirmation_timeout,
        }
    }

    /// Check that the RPC endpoint serves the configured chain.
    pub async fn verify_chain(&self) -> LedgerResult<()> {
        let actual = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;

        if actual != self.network.chain_id {
            return Err(LedgerError::WrongChain {
                expected: self.network.chain_id,
                actual,
            });
        }
        Ok(())
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Wait for a submitted transaction to be mined, bounded by the
    /// configured timeout.
    async fn confirm(
        &self,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> LedgerResult<TxReceipt> {
        let tx_hash = pending.tx_hash().to_string();
        tracing::debug!(tx_hash = %tx_hash, "Waiting for confirmation");
        self.await_receipt(tx_hash, pending.get_receipt()).await
    }

    async fn await_receipt<F>(&self, tx_hash: String, receipt: F) -> LedgerResult<TxReceipt>
    where
        F: Future<Output = Result<TransactionReceipt, PendingTransactionError>>,
    {
        let receipt = tokio::time::timeout(self.confirmation_timeout, receipt)
            .await
            .map_err(|_| {
                tracing::warn!(tx_hash = %tx_hash, "Confirmation wait timed out");
                LedgerError::ConfirmationTimeout {
                    tx_hash: tx_hash.clone(),
                }
            })?
            .map_err(|e| LedgerError::TransactionFailed(e.to_string()))?;

        if !receipt.status() {
            return Err(LedgerError::Reverted(tx_hash));
        }

        Ok(TxReceipt {
            explorer_url: Some(self.network.tx_url(&tx_hash)),
            block_number: receipt.block_number,
            tx_hash,
        })
    }
}

fn contract_error(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::ContractError(e.to_string())
}

#[async_trait]
impl Ledger for ContractLedger {
    fn contract_address(&self) -> Address {
        *self.contract.address()
    }

    fn chain_id(&self) -> u64 {
        self.network.chain_id
    }

    async fn pending_courses(&self, student: &WalletAddress) -> LedgerResult<Vec<u64>> {
        let ids = self
            .contract
            .getPendingCourses(parse_address(student)?)
            .call()
            .await
            .map_err(contract_error)?;
        narrow_course_ids(ids)
    }

    async fn approved_courses(&self, student: &WalletAddress) -> LedgerResult<Vec<u64>> {
        let ids = self
            .contract
            .getApprovedCourses(parse_address(student)?)
            .call()
            .await
            .map_err(contract_error)?;
        narrow_course_ids(ids)
    }

    async fn is_admin(&self, account: &WalletAddress) -> LedgerResult<bool> {
        self.contract
            .isAdmin(parse_address(account)?)
            .call()
            .await
            .map_err(contract_error)
    }

    async fn approve_course(
        &self,
        student: &WalletAddress,
        course_id: u64,
    ) -> LedgerResult<TxReceipt> {
        let pending = self
            .contract
            .approveCourse(parse_address(student)?, U256::from(course_id))
            .send()
            .await
            .map_err(contract_error)?;
        self.confirm(pending).await
    }

    async fn set_course_capacity(&self, course_id: u64, capacity: u64) -> LedgerResult<TxReceipt> {
        let pending = self
            .contract
            .setCourseCapacity(U256::from(course_id), U256::from(capacity))
            .send()
            .await
            .map_err(contract_error)?;
        self.confirm(pending).await
    }

    async fn add_admin(&self, account: &WalletAddress) -> LedgerResult<TxReceipt> {
        let pending = self
            .contract
            .addAdmin(parse_address(account)?)
            .send()
            .await
            .map_err(contract_error)?;
        self.confirm(pending).await
    }

    async fn remove_admin(&self, account: &WalletAddress) -> LedgerResult<TxReceipt> {
        let pending = self
            .contract
            .removeAdmin(parse_address(account)?)
            .send()
            .await
            .map_err(contract_error)?;
        self.confirm(pending).await
    }

    async fn submit_enrollment(&self, request: &EnrollmentRequest) -> LedgerResult<TxReceipt> {
        let pending = self
            .provider
            .send_raw_transaction(&request.raw)
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;
        self.confirm(pending).await
    }

    async fn block_number(&self) -> LedgerResult<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))
    }
}
