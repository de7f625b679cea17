// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Course Registry - course registration backend
//!
//! Students and courses live in an off-chain record store; enrollment
//! requests and approvals live in an EVM registration contract. The API
//! exposes both and merges them into display-ready views.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - Registration contract client, relay decoding, dev ledger
//! - `reconcile` - Ledger/store view merging
//! - `storage` - Record store (redb or in-memory)

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod reconcile;
pub mod state;
pub mod storage;
