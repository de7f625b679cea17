// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use course_registry_server::{
    api::router,
    blockchain::{
        signing::{signer_from_hex, signer_from_pem},
        ContractLedger, InMemoryLedger, Ledger, NetworkConfig, SEPOLIA_CHAIN_ID,
    },
    config::{AdminKeySource, AppConfig, ChainConfig, StoreBackend},
    logging::{init_tracing, LogFormat},
    state::AppState,
    storage::{InMemoryRecordStore, RecordStore, RedbRecordStore},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    init_tracing(LogFormat::from_env());

    if let Err(e) = run().await {
        error!(error = %e, "Course registry server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let config = AppConfig::from_env()?;

    let store = build_store(&config)?;
    let ledger = build_ledger(&config).await?;
    let app = router(AppState::new(store, ledger));

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Course registry listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}

fn build_store(config: &AppConfig) -> Result<Arc<dyn RecordStore>, BoxError> {
    match config.store_backend {
        StoreBackend::Redb => {
            std::fs::create_dir_all(&config.data_dir)?;
            let store = RedbRecordStore::open_in_dir(&config.data_dir)?;
            info!(data_dir = %config.data_dir.display(), "Opened redb record store");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory record store; records are lost on restart");
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
    }
}

async fn build_ledger(config: &AppConfig) -> Result<Arc<dyn Ledger>, BoxError> {
    let Some(chain) = &config.chain else {
        warn!("LEDGER_RPC_URL not set; using in-memory ledger simulation");
        return Ok(Arc::new(InMemoryLedger::default()));
    };

    let signer = load_signer(chain)?;
    let name = if chain.chain_id == SEPOLIA_CHAIN_ID {
        "Sepolia".to_string()
    } else {
        format!("chain-{}", chain.chain_id)
    };
    let network = NetworkConfig {
        name,
        chain_id: chain.chain_id,
        rpc_url: chain.rpc_url.clone(),
        explorer_url: chain.explorer_url.clone(),
    };
    let ledger = ContractLedger::new(
        network,
        chain.contract_address,
        signer,
        config.confirmation_timeout,
    )?;
    ledger.verify_chain().await?;
    info!(chain_id = chain.chain_id, "RPC endpoint chain verified");
    Ok(Arc::new(ledger))
}

fn load_signer(
    chain: &ChainConfig,
) -> Result<alloy::signers::local::PrivateKeySigner, BoxError> {
    let signer = match &chain.admin_key {
        AdminKeySource::Hex(hex) => signer_from_hex(hex)?,
        AdminKeySource::PemFile(path) => signer_from_pem(&std::fs::read(path)?)?,
    };
    Ok(signer)
}

async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    shutdown.cancel();
}
