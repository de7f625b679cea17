// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the records kept in the off-chain store and the
//! request and response structures used by the REST API. All wire types
//! derive `Serialize`/`Deserialize` and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.
//!
//! JSON field names are camelCase (`walletAddress`, `regNumber`,
//! `courseId`) to match the registration frontend.
//!
//! ## Envelope
//!
//! Every response carries a `success` flag. Error responses are produced by
//! [`crate::error::ApiError`] as `{"success": false, "error": "..."}`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display name used when a course id reported by the ledger has no
/// matching record in the store.
pub const UNKNOWN_COURSE_NAME: &str = "Unknown";

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Lowercase-normalized wallet address.
///
/// Wallet addresses are the join key between the record store and the
/// ledger, so they are always compared in canonical lowercase form.
/// Construction through `From` trims and lowercases the input; no format
/// validation is done here. The ledger client validates addresses at its
/// own boundary.
///
/// # Example
///
/// ```rust,ignore
/// let addr = WalletAddress::from("0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12");
/// assert_eq!(addr.as_str(), "0x742d35cc6634c0532925a3b844bc9e7595f4ab12");
/// ```
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(WalletAddress::from(raw))
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress::from(value.as_str())
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.trim().to_lowercase())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Stored Records
// =============================================================================

/// A registered student.
///
/// Created and deleted by admins, never mutated. `reg_number` is unique;
/// `wallet_address` is not enforced unique by the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Wallet used on-chain by this student (lowercase).
    pub wallet_address: WalletAddress,
    /// Display name.
    pub name: String,
    /// Institution registration number, e.g. "20191181582".
    pub reg_number: String,
}

/// Whether the on-chain capacity transaction paired with a course has been
/// confirmed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    /// Stored off-chain, capacity not (yet) confirmed on-chain.
    Pending,
    /// Capacity transaction confirmed.
    Confirmed,
}

/// A course offered for registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course identifier, shared with the ledger.
    pub course_id: u64,
    /// Short code or label, e.g. "CS101".
    pub name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Capacity submitted to the ledger.
    pub capacity: u64,
    /// Confirmation state of the capacity transaction.
    pub ledger_status: LedgerStatus,
}

// =============================================================================
// Reconciled Views
// =============================================================================

/// A course id reported by the ledger, enriched with its display name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CourseEntry {
    pub course_id: u64,
    /// Course name from the store, or "Unknown".
    pub course_name: String,
}

/// A student's enrollment state as reported by the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StudentCourseView {
    /// Enrollment requests awaiting admin approval, in ledger order.
    pub pending: Vec<CourseEntry>,
    /// Approved enrollments, in ledger order.
    pub approved: Vec<CourseEntry>,
}

/// One (student, pending course) pair awaiting approval.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingApproval {
    pub student_address: WalletAddress,
    pub course_id: u64,
    pub course_name: String,
}

// =============================================================================
// Requests
// =============================================================================

/// Student login by wallet and registration number.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub wallet_address: WalletAddress,
    pub reg_number: String,
}

/// Request to register a new student.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentRequest {
    pub wallet_address: WalletAddress,
    pub name: String,
    pub reg_number: String,
}

/// Request to create a course and set its on-chain capacity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCourseRequest {
    pub course_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub capacity: u64,
}

/// Request to approve a pending enrollment on-chain.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveCourseRequest {
    pub student_address: WalletAddress,
    pub course_id: u64,
}

/// Request naming a wallet for admin management.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminAddressRequest {
    pub wallet_address: WalletAddress,
}

/// Client-signed enrollment transaction to relay to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelayEnrollmentRequest {
    /// 0x-prefixed hex of an EIP-2718 encoded signed transaction calling
    /// `addCourse(uint256)` or `removeCourse(uint256)`.
    pub signed_transaction: String,
}

// =============================================================================
// Responses
// =============================================================================

/// Bare success envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Confirmed ledger transaction summary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub success: bool,
    pub tx_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub student: Student,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentCoursesResponse {
    pub success: bool,
    pub pending: Vec<CourseEntry>,
    pub approved: Vec<CourseEntry>,
}

impl From<StudentCourseView> for StudentCoursesResponse {
    fn from(view: StudentCourseView) -> Self {
        Self {
            success: true,
            pending: view.pending,
            approved: view.approved,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CoursesResponse {
    pub success: bool,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentsResponse {
    pub success: bool,
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingApprovalsResponse {
    pub success: bool,
    pub pending_approvals: Vec<PendingApproval>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IsAdminResponse {
    pub success: bool,
    pub is_admin: bool,
}

/// Result of adding a course: the stored record plus the capacity
/// transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCourseResponse {
    pub success: bool,
    pub course: Course,
    pub tx_hash: String,
}

/// Result of a course ledger sync. `tx_hash` is absent when the course was
/// already confirmed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncCourseResponse {
    pub success: bool,
    pub course: Course,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// Student-side enrollment action carried by a relayed transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentAction {
    /// `addCourse(courseId)`: request enrollment.
    Add,
    /// `removeCourse(courseId)`: withdraw a request.
    Remove,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelayEnrollmentResponse {
    pub success: bool,
    pub action: EnrollmentAction,
    pub course_id: u64,
    pub tx_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_address_is_lowercased_and_trimmed() {
        let from_str: WalletAddress = " 0xAbC ".into();
        assert_eq!(from_str.as_str(), "0xabc");

        let from_string: WalletAddress = String::from("0xDEF").into();
        assert_eq!(from_string.as_str(), "0xdef");

        let to_string: String = WalletAddress::from("0xGHI").into();
        assert_eq!(to_string, "0xghi");
    }

    #[test]
    fn wallet_address_deserializes_normalized() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"walletAddress":"0xAA","regNumber":"R1"}"#).unwrap();
        assert_eq!(req.wallet_address, WalletAddress::from("0xaa"));
        assert_eq!(req.reg_number, "R1");
    }

    #[test]
    fn course_serializes_camel_case() {
        let course = Course {
            course_id: 7,
            name: "CS101".into(),
            description: "Intro".into(),
            capacity: 30,
            ledger_status: LedgerStatus::Pending,
        };
        let json = serde_json::to_value(&course).unwrap();
        assert_eq!(json["courseId"], 7);
        assert_eq!(json["ledgerStatus"], "pending");
    }

    #[test]
    fn add_course_request_description_defaults() {
        let req: AddCourseRequest =
            serde_json::from_str(r#"{"courseId":3,"name":"MA2","capacity":10}"#).unwrap();
        assert_eq!(req.description, "");
    }

    #[test]
    fn pending_approvals_response_uses_camel_case() {
        let resp = PendingApprovalsResponse {
            success: true,
            pending_approvals: vec![],
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"success":true,"pendingApprovals":[]}"#);
    }
}
