// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::blockchain::{InMemoryLedger, Ledger};
use crate::reconcile::Reconciler;
use crate::storage::{InMemoryRecordStore, RecordStore};

/// Shared handler state: the record store and the ledger, constructed once
/// at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub ledger: Arc<dyn Ledger>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, ledger: Arc<dyn Ledger>) -> Self {
        Self { store, ledger }
    }

    pub fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(self.store.as_ref(), self.ledger.as_ref())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryLedger::default()),
        )
    }
}
