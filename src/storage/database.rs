// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded record database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `students`: insertion sequence → serialized Student
//! - `student_reg_index`: reg_number → insertion sequence (uniqueness)
//! - `courses`: course_id → serialized Course
//! - `store_meta`: key → u64 counters (`next_student_seq`)

use std::path::Path;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{duplicate_course, duplicate_student, RecordStore, StoreError, StoreResult};
use crate::models::{Course, LedgerStatus, Student, WalletAddress};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: insertion sequence → Student JSON bytes.
const STUDENTS: TableDefinition<u64, &[u8]> = TableDefinition::new("students");

/// Unique index: registration number → insertion sequence.
const STUDENT_REG_INDEX: TableDefinition<&str, u64> = TableDefinition::new("student_reg_index");

/// Primary table: course_id → Course JSON bytes.
const COURSES: TableDefinition<u64, &[u8]> = TableDefinition::new("courses");

/// Counters.
const STORE_META: TableDefinition<&str, u64> = TableDefinition::new("store_meta");

const NEXT_STUDENT_SEQ: &str = "next_student_seq";

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "registry.redb";

// =============================================================================
// RedbRecordStore
// =============================================================================

/// Record store persisted in a single redb file.
pub struct RedbRecordStore {
    db: Database,
}

impl RedbRecordStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STUDENTS)?;
            let _ = write_txn.open_table(STUDENT_REG_INDEX)?;
            let _ = write_txn.open_table(COURSES)?;
            let _ = write_txn.open_table(STORE_META)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Open the database file inside a data directory.
    pub fn open_in_dir(data_dir: &Path) -> StoreResult<Self> {
        Self::open(&data_dir.join(DATABASE_FILE))
    }

    fn read_students(&self) -> StoreResult<Vec<Student>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STUDENTS)?;

        let mut students = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            students.push(serde_json::from_slice(value.value())?);
        }
        Ok(students)
    }
}

#[async_trait]
impl RecordStore for RedbRecordStore {
    async fn insert_student(&self, student: Student) -> StoreResult<()> {
        let json = serde_json::to_vec(&student)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut index = write_txn.open_table(STUDENT_REG_INDEX)?;
            if index.get(student.reg_number.as_str())?.is_some() {
                return Err(duplicate_student(&student.reg_number));
            }

            let mut meta = write_txn.open_table(STORE_META)?;
            let seq = meta.get(NEXT_STUDENT_SEQ)?.map(|v| v.value()).unwrap_or(0);
            meta.insert(NEXT_STUDENT_SEQ, seq + 1)?;

            let mut students = write_txn.open_table(STUDENTS)?;
            students.insert(seq, json.as_slice())?;
            index.insert(student.reg_number.as_str(), seq)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    async fn find_student(
        &self,
        wallet_address: &WalletAddress,
        reg_number: &str,
    ) -> StoreResult<Option<Student>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(STUDENT_REG_INDEX)?;
        let Some(seq) = index.get(reg_number)?.map(|v| v.value()) else {
            return Ok(None);
        };

        let students = read_txn.open_table(STUDENTS)?;
        let student: Option<Student> = match students.get(seq)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };

        Ok(student.filter(|s| &s.wallet_address == wallet_address))
    }

    async fn find_student_by_wallet(
        &self,
        wallet_address: &WalletAddress,
    ) -> StoreResult<Option<Student>> {
        Ok(self
            .read_students()?
            .into_iter()
            .find(|s| &s.wallet_address == wallet_address))
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        self.read_students()
    }

    async fn delete_student(&self, reg_number: &str) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut index = write_txn.open_table(STUDENT_REG_INDEX)?;
            let seq = index.remove(reg_number)?.map(|v| v.value());
            match seq {
                Some(seq) => {
                    let mut students = write_txn.open_table(STUDENTS)?;
                    students.remove(seq)?;
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;
        Ok(removed)
    }

    async fn insert_course(&self, course: Course) -> StoreResult<()> {
        let json = serde_json::to_vec(&course)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut courses = write_txn.open_table(COURSES)?;
            if courses.get(course.course_id)?.is_some() {
                return Err(duplicate_course(course.course_id));
            }
            courses.insert(course.course_id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    async fn get_course(&self, course_id: u64) -> StoreResult<Option<Course>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COURSES)?;
        match table.get(course_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    async fn find_courses(&self, course_ids: &[u64]) -> StoreResult<Vec<Course>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COURSES)?;

        let mut ids = course_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut courses = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(value) = table.get(id)? {
                courses.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(courses)
    }

    async fn list_courses(&self) -> StoreResult<Vec<Course>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COURSES)?;

        let mut courses = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            courses.push(serde_json::from_slice(value.value())?);
        }
        Ok(courses)
    }

    async fn delete_course(&self, course_id: u64) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(COURSES)?;
            let removed = table.remove(course_id)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    async fn set_course_ledger_status(
        &self,
        course_id: u64,
        status: LedgerStatus,
    ) -> StoreResult<Course> {
        let write_txn = self.db.begin_write()?;
        let course = {
            let mut table = write_txn.open_table(COURSES)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = {
                let existing = table
                    .get(course_id)?
                    .ok_or_else(|| StoreError::NotFound(format!("Course {course_id}")))?;
                existing.value().to_vec()
            };

            let mut course: Course = serde_json::from_slice(&existing_bytes)?;
            course.ledger_status = status;

            let json = serde_json::to_vec(&course)?;
            table.insert(course_id, json.as_slice())?;
            course
        };
        write_txn.commit()?;
        Ok(course)
    }

    async fn health_check(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(STORE_META)?;
        Ok(())
    }
}
