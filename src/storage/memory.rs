// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory record store.
//!
//! Used for local development (`STORE_BACKEND=memory`) and as the default
//! store in tests. Nothing is persisted across restarts.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{duplicate_course, duplicate_student, RecordStore, StoreError, StoreResult};
use crate::models::{Course, LedgerStatus, Student, WalletAddress};

#[derive(Default)]
struct Tables {
    students: Vec<Student>,
    courses: BTreeMap<u64, Course>,
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert_student(&self, student: Student) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .students
            .iter()
            .any(|s| s.reg_number == student.reg_number)
        {
            return Err(duplicate_student(&student.reg_number));
        }
        tables.students.push(student);
        Ok(())
    }

    async fn find_student(
        &self,
        wallet_address: &WalletAddress,
        reg_number: &str,
    ) -> StoreResult<Option<Student>> {
        let tables = self.tables.read().await;
        Ok(tables
            .students
            .iter()
            .find(|s| &s.wallet_address == wallet_address && s.reg_number == reg_number)
            .cloned())
    }

    async fn find_student_by_wallet(
        &self,
        wallet_address: &WalletAddress,
    ) -> StoreResult<Option<Student>> {
        let tables = self.tables.read().await;
        Ok(tables
            .students
            .iter()
            .find(|s| &s.wallet_address == wallet_address)
            .cloned())
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        Ok(self.tables.read().await.students.clone())
    }

    async fn delete_student(&self, reg_number: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.students.len();
        tables.students.retain(|s| s.reg_number != reg_number);
        Ok(tables.students.len() != before)
    }

    async fn insert_course(&self, course: Course) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.courses.contains_key(&course.course_id) {
            return Err(duplicate_course(course.course_id));
        }
        tables.courses.insert(course.course_id, course);
        Ok(())
    }

    async fn get_course(&self, course_id: u64) -> StoreResult<Option<Course>> {
        Ok(self.tables.read().await.courses.get(&course_id).cloned())
    }

    async fn find_courses(&self, course_ids: &[u64]) -> StoreResult<Vec<Course>> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .values()
            .filter(|c| course_ids.contains(&c.course_id))
            .cloned()
            .collect())
    }

    async fn list_courses(&self) -> StoreResult<Vec<Course>> {
        Ok(self.tables.read().await.courses.values().cloned().collect())
    }

    async fn delete_course(&self, course_id: u64) -> StoreResult<bool> {
        Ok(self.tables.write().await.courses.remove(&course_id).is_some())
    }

    async fn set_course_ledger_status(
        &self,
        course_id: u64,
        status: LedgerStatus,
    ) -> StoreResult<Course> {
        let mut tables = self.tables.write().await;
        let Some(course) = tables.courses.get_mut(&course_id) else {
            return Err(StoreError::NotFound(format!("Course {course_id}")));
        };
        course.ledger_status = status;
        Ok(course.clone())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(reg: &str, wallet: &str) -> Student {
        Student {
            wallet_address: WalletAddress::from(wallet),
            name: "Ada".into(),
            reg_number: reg.into(),
        }
    }

    #[tokio::test]
    async fn duplicate_reg_number_is_rejected() {
        let store = InMemoryRecordStore::new();
        store.insert_student(student("R1", "0xaa")).await.unwrap();
        let err = store.insert_student(student("R1", "0xbb")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.list_students().await.unwrap()[0].wallet_address.as_str(), "0xaa");
    }

    #[tokio::test]
    async fn duplicate_wallets_are_allowed() {
        let store = InMemoryRecordStore::new();
        store.insert_student(student("R1", "0xaa")).await.unwrap();
        store.insert_student(student("R2", "0xAA")).await.unwrap();

        let first = store
            .find_student_by_wallet(&WalletAddress::from("0xaa"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.reg_number, "R1");
    }

    #[tokio::test]
    async fn deletes_are_idempotent() {
        let store = InMemoryRecordStore::new();
        assert!(!store.delete_student("missing").await.unwrap());
        assert!(!store.delete_course(99).await.unwrap());
    }
}
