// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Record Store
//!
//! Off-chain persistence for the two registry entities, [`Student`] and
//! [`Course`]. The store is the authority for identity and course metadata;
//! enrollment state lives on the ledger and is never copied here.
//!
//! ## Invariants
//!
//! - `Student.reg_number` is unique (insert of a duplicate fails with
//!   [`StoreError::Duplicate`] and leaves the existing record untouched)
//! - `Course.course_id` is unique
//! - Deletes are idempotent: removing a missing record is not an error
//! - Students enumerate in insertion order, courses in `course_id` order
//!
//! ## Backends
//!
//! - [`RedbRecordStore`]: embedded ACID database (production)
//! - [`InMemoryRecordStore`]: process-local maps (development and tests)

pub mod database;
pub mod memory;

use async_trait::async_trait;

use crate::models::{Course, LedgerStatus, Student, WalletAddress};

pub use database::RedbRecordStore;
pub use memory::InMemoryRecordStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Uniqueness constraint violated.
    #[error("{0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) fn duplicate_student(reg_number: &str) -> StoreError {
    StoreError::Duplicate(format!(
        "Student with registration number {reg_number} already exists"
    ))
}

pub(crate) fn duplicate_course(course_id: u64) -> StoreError {
    StoreError::Duplicate(format!("Course with id {course_id} already exists"))
}

/// Persistence for students and courses.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new student. Fails with `Duplicate` if the registration
    /// number is taken.
    async fn insert_student(&self, student: Student) -> StoreResult<()>;

    /// Exact match on both wallet and registration number.
    async fn find_student(
        &self,
        wallet_address: &WalletAddress,
        reg_number: &str,
    ) -> StoreResult<Option<Student>>;

    /// First student registered with this wallet, if any.
    async fn find_student_by_wallet(
        &self,
        wallet_address: &WalletAddress,
    ) -> StoreResult<Option<Student>>;

    async fn list_students(&self) -> StoreResult<Vec<Student>>;

    /// Returns whether a record was removed.
    async fn delete_student(&self, reg_number: &str) -> StoreResult<bool>;

    /// Insert a new course. Fails with `Duplicate` if the id is taken.
    async fn insert_course(&self, course: Course) -> StoreResult<()>;

    async fn get_course(&self, course_id: u64) -> StoreResult<Option<Course>>;

    /// Courses whose id is in `course_ids`. Missing ids are skipped.
    async fn find_courses(&self, course_ids: &[u64]) -> StoreResult<Vec<Course>>;

    async fn list_courses(&self) -> StoreResult<Vec<Course>>;

    /// Returns whether a record was removed.
    async fn delete_course(&self, course_id: u64) -> StoreResult<bool>;

    /// Update the ledger marker of an existing course.
    async fn set_course_ledger_status(
        &self,
        course_id: u64,
        status: LedgerStatus,
    ) -> StoreResult<Course>;

    /// Verify the backing store is reachable.
    async fn health_check(&self) -> StoreResult<()>;
}
