// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reconciliation of ledger enrollment state with store course metadata.
//!
//! The ledger is authoritative for which course ids a student has pending
//! or approved; the record store is authoritative for course names. All
//! views that combine the two are built here so handlers never merge raw
//! ledger and store results themselves.

use std::collections::HashMap;

use crate::blockchain::{Ledger, LedgerError};
use crate::models::{
    CourseEntry, PendingApproval, StudentCourseView, WalletAddress, UNKNOWN_COURSE_NAME,
};
use crate::storage::{RecordStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Builds enriched enrollment views over a record store and a ledger.
pub struct Reconciler<'a> {
    store: &'a dyn RecordStore,
    ledger: &'a dyn Ledger,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn RecordStore, ledger: &'a dyn Ledger) -> Self {
        Self { store, ledger }
    }

    /// Pending and approved courses for one student, in ledger order.
    ///
    /// Course ids without a store record are labelled "Unknown". Any read
    /// failure aborts the whole view.
    pub async fn student_course_view(
        &self,
        wallet_address: &WalletAddress,
    ) -> ReconcileResult<StudentCourseView> {
        let (pending, approved) = tokio::try_join!(
            self.ledger.pending_courses(wallet_address),
            self.ledger.approved_courses(wallet_address),
        )?;

        let names = self
            .course_names(pending.iter().chain(approved.iter()).copied())
            .await?;

        Ok(StudentCourseView {
            pending: label(&pending, &names),
            approved: label(&approved, &names),
        })
    }

    /// Every pending (student, course) pair across all stored students.
    ///
    /// Issues one ledger read per student, in store enumeration order.
    pub async fn pending_approvals(&self) -> ReconcileResult<Vec<PendingApproval>> {
        let students = self.store.list_students().await?;

        let mut per_student = Vec::with_capacity(students.len());
        for student in students {
            let pending = self.ledger.pending_courses(&student.wallet_address).await?;
            per_student.push((student.wallet_address, pending));
        }

        let names = self
            .course_names(per_student.iter().flat_map(|(_, ids)| ids.iter().copied()))
            .await?;

        Ok(per_student
            .into_iter()
            .flat_map(|(student_address, ids)| {
                let names = &names;
                ids.into_iter().map(move |course_id| PendingApproval {
                    student_address: student_address.clone(),
                    course_id,
                    course_name: course_name(names, course_id),
                })
            })
            .collect())
    }

    /// Look up display names for a set of course ids in one store query.
    async fn course_names(
        &self,
        ids: impl Iterator<Item = u64>,
    ) -> ReconcileResult<HashMap<u64, String>> {
        let mut ids: Vec<u64> = ids.collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        ids.sort_unstable();
        ids.dedup();

        let courses = self.store.find_courses(&ids).await?;
        Ok(courses
            .into_iter()
            .map(|course| (course.course_id, course.name))
            .collect())
    }
}

fn course_name(names: &HashMap<u64, String>, course_id: u64) -> String {
    names
        .get(&course_id)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_COURSE_NAME.to_string())
}

fn label(ids: &[u64], names: &HashMap<u64, String>) -> Vec<CourseEntry> {
    ids.iter()
        .map(|&course_id| CourseEntry {
            course_id,
            course_name: course_name(names, course_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{testing::FailingLedger, InMemoryLedger};
    use crate::models::{Course, LedgerStatus, Student};
    use crate::storage::InMemoryRecordStore;

    fn course(id: u64, name: &str) -> Course {
        Course {
            course_id: id,
            name: name.into(),
            description: String::new(),
            capacity: 30,
            ledger_status: LedgerStatus::Confirmed,
        }
    }

    async fn add_student(store: &InMemoryRecordStore, reg: &str, wallet: &str) {
        store
            .insert_student(Student {
                wallet_address: WalletAddress::from(wallet),
                name: reg.to_lowercase(),
                reg_number: reg.into(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn view_resolves_names_for_mixed_case_wallet() {
        let store = InMemoryRecordStore::new();
        let ledger = InMemoryLedger::default();
        add_student(&store, "R1", "0xAA").await;
        store.insert_course(course(7, "CS101")).await.unwrap();
        ledger.insert_pending(&WalletAddress::from("0xaa"), 7).await;

        let view = Reconciler::new(&store, &ledger)
            .student_course_view(&WalletAddress::from("0xAA"))
            .await
            .unwrap();

        assert_eq!(
            view.pending,
            vec![CourseEntry {
                course_id: 7,
                course_name: "CS101".into()
            }]
        );
        assert!(view.approved.is_empty());
    }

    #[tokio::test]
    async fn unmatched_ids_are_unknown() {
        let store = InMemoryRecordStore::new();
        let ledger = InMemoryLedger::default();
        ledger.insert_pending(&WalletAddress::from("0xaa"), 7).await;

        let view = Reconciler::new(&store, &ledger)
            .student_course_view(&WalletAddress::from("0xaa"))
            .await
            .unwrap();

        assert_eq!(view.pending[0].course_name, UNKNOWN_COURSE_NAME);
    }

    #[tokio::test]
    async fn view_keeps_ledger_order() {
        let store = InMemoryRecordStore::new();
        let ledger = InMemoryLedger::default();
        let wallet = WalletAddress::from("0xaa");
        for (id, name) in [(1, "A"), (2, "B"), (3, "C")] {
            store.insert_course(course(id, name)).await.unwrap();
        }
        for id in [3, 1] {
            ledger.insert_approved(&wallet, id).await;
        }
        ledger.insert_pending(&wallet, 2).await;

        let view = Reconciler::new(&store, &ledger)
            .student_course_view(&wallet)
            .await
            .unwrap();

        let approved: Vec<_> = view.approved.iter().map(|e| e.course_name.as_str()).collect();
        assert_eq!(approved, vec!["C", "A"]);
        assert_eq!(view.pending[0].course_name, "B");
    }

    #[tokio::test]
    async fn ledger_failure_aborts_course_view() {
        let store = InMemoryRecordStore::new();
        store.insert_course(course(7, "CS101")).await.unwrap();
        let ledger = FailingLedger::unreachable();

        let err = Reconciler::new(&store, &ledger)
            .student_course_view(&WalletAddress::from("0xaa"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcileError::Ledger(LedgerError::RpcError(_))));
    }

    #[tokio::test]
    async fn pending_approvals_fan_out_in_store_order() {
        let store = InMemoryRecordStore::new();
        let ledger = InMemoryLedger::default();
        add_student(&store, "R1", "0xaa").await;
        add_student(&store, "R2", "0xbb").await;
        add_student(&store, "R3", "0xcc").await;
        store.insert_course(course(7, "CS101")).await.unwrap();
        ledger.insert_pending(&WalletAddress::from("0xcc"), 7).await;
        ledger.insert_pending(&WalletAddress::from("0xaa"), 9).await;
        ledger.insert_pending(&WalletAddress::from("0xaa"), 7).await;

        let approvals = Reconciler::new(&store, &ledger)
            .pending_approvals()
            .await
            .unwrap();

        let pairs: Vec<_> = approvals
            .iter()
            .map(|p| (p.student_address.as_str(), p.course_id, p.course_name.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("0xaa", 9, UNKNOWN_COURSE_NAME),
                ("0xaa", 7, "CS101"),
                ("0xcc", 7, "CS101"),
            ]
        );
    }

    #[tokio::test]
    async fn no_students_means_no_approvals() {
        let store = InMemoryRecordStore::new();
        let ledger = InMemoryLedger::default();
        let approvals = Reconciler::new(&store, &ledger)
            .pending_approvals()
            .await
            .unwrap();
        assert!(approvals.is_empty());
    }
}
