// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin endpoints for student/course records and ledger administration.
//!
//! Ledger writes issued here are signed with the backend admin key and
//! answer only after confirmation (bounded by the configured timeout).

use axum::{extract::State, Json};

use super::extract::{ApiJson, ApiPath};
use crate::{
    error::ApiError,
    models::{
        AddCourseRequest, AddCourseResponse, AddStudentRequest, AdminAddressRequest,
        ApproveCourseRequest, Course, CoursesResponse, IsAdminResponse, LedgerStatus,
        PendingApprovalsResponse, Student, StudentsResponse, SuccessResponse,
        SyncCourseResponse, TransactionResponse, WalletAddress,
    },
    state::AppState,
    storage::StoreError,
};

// ============================================================================
// Students
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/admin/add-student",
    request_body = AddStudentRequest,
    tag = "Admin",
    responses(
        (status = 200, body = SuccessResponse),
        (status = 400, description = "Registration number already exists")
    )
)]
pub async fn add_student(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddStudentRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let student = Student {
        wallet_address: request.wallet_address,
        name: request.name,
        reg_number: request.reg_number,
    };
    tracing::info!(
        wallet_address = %student.wallet_address,
        reg_number = %student.reg_number,
        "Adding student"
    );

    state.store.insert_student(student).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/admin/delete-student/{reg_number}",
    params(("reg_number" = String, Path, description = "Registration number")),
    tag = "Admin",
    responses((status = 200, body = SuccessResponse))
)]
pub async fn delete_student(
    State(state): State<AppState>,
    ApiPath(reg_number): ApiPath<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let removed = state.store.delete_student(&reg_number).await?;
    tracing::info!(reg_number = %reg_number, removed, "Deleted student");
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/api/admin/students",
    tag = "Admin",
    responses((status = 200, body = StudentsResponse))
)]
pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<StudentsResponse>, ApiError> {
    let students = state.store.list_students().await?;
    Ok(Json(StudentsResponse {
        success: true,
        students,
    }))
}

// ============================================================================
// Courses
// ============================================================================

/// Create a course record and set its capacity on-chain.
///
/// The record is stored first with `ledgerStatus: pending`. If the capacity
/// transaction fails the record stays pending and the ledger error is
/// returned; `sync-course` completes it later.
#[utoipa::path(
    post,
    path = "/api/admin/add-course",
    request_body = AddCourseRequest,
    tag = "Admin",
    responses(
        (status = 200, body = AddCourseResponse),
        (status = 400, description = "Course id already exists"),
        (status = 500, description = "Capacity transaction failed; course left pending"),
        (status = 504, description = "Capacity transaction submitted, confirmation pending")
    )
)]
pub async fn add_course(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddCourseRequest>,
) -> Result<Json<AddCourseResponse>, ApiError> {
    let course = Course {
        course_id: request.course_id,
        name: request.name,
        description: request.description,
        capacity: request.capacity,
        ledger_status: LedgerStatus::Pending,
    };
    state.store.insert_course(course.clone()).await?;

    let (course, tx_hash) = confirm_capacity(&state, course).await?;
    Ok(Json(AddCourseResponse {
        success: true,
        course,
        tx_hash,
    }))
}

/// Retry the capacity transaction for a course still marked pending.
#[utoipa::path(
    post,
    path = "/api/admin/sync-course/{course_id}",
    params(("course_id" = u64, Path, description = "Course identifier")),
    tag = "Admin",
    responses(
        (status = 200, body = SyncCourseResponse),
        (status = 404, description = "Unknown course")
    )
)]
pub async fn sync_course(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<u64>,
) -> Result<Json<SyncCourseResponse>, ApiError> {
    let course = state
        .store
        .get_course(course_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Course {course_id}")))?;

    if course.ledger_status == LedgerStatus::Confirmed {
        return Ok(Json(SyncCourseResponse {
            success: true,
            course,
            tx_hash: None,
        }));
    }

    let (course, tx_hash) = confirm_capacity(&state, course).await?;
    Ok(Json(SyncCourseResponse {
        success: true,
        course,
        tx_hash: Some(tx_hash),
    }))
}

/// Submit the stored capacity and mark the course confirmed on success.
async fn confirm_capacity(state: &AppState, course: Course) -> Result<(Course, String), ApiError> {
    let receipt = match state
        .ledger
        .set_course_capacity(course.course_id, course.capacity)
        .await
    {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::warn!(
                course_id = course.course_id,
                error = %e,
                "Capacity transaction failed; course left pending"
            );
            return Err(e.into());
        }
    };

    let course = match state
        .store
        .set_course_ledger_status(course.course_id, LedgerStatus::Confirmed)
        .await
    {
        Ok(course) => course,
        // Deleted while the transaction was in flight; the capacity is on-chain regardless.
        Err(StoreError::NotFound(_)) => {
            tracing::warn!(
                course_id = course.course_id,
                tx_hash = %receipt.tx_hash,
                "Course record removed before its capacity was confirmed"
            );
            Course {
                ledger_status: LedgerStatus::Confirmed,
                ..course
            }
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(
        course_id = course.course_id,
        capacity = course.capacity,
        tx_hash = %receipt.tx_hash,
        "Course capacity confirmed"
    );
    Ok((course, receipt.tx_hash))
}

/// Remove a course record. The on-chain capacity is left untouched.
#[utoipa::path(
    delete,
    path = "/api/admin/delete-course/{course_id}",
    params(("course_id" = u64, Path, description = "Course identifier")),
    tag = "Admin",
    responses((status = 200, body = SuccessResponse))
)]
pub async fn delete_course(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<u64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let removed = state.store.delete_course(course_id).await?;
    tracing::info!(course_id, removed, "Deleted course");
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/api/admin/courses",
    tag = "Admin",
    responses((status = 200, body = CoursesResponse))
)]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<CoursesResponse>, ApiError> {
    let courses = state.store.list_courses().await?;
    Ok(Json(CoursesResponse {
        success: true,
        courses,
    }))
}

// ============================================================================
// Enrollment approval
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/admin/approve-course",
    request_body = ApproveCourseRequest,
    tag = "Admin",
    responses(
        (status = 200, body = TransactionResponse),
        (status = 504, description = "Submitted, confirmation pending")
    )
)]
pub async fn approve_course(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ApproveCourseRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let receipt = state
        .ledger
        .approve_course(&request.student_address, request.course_id)
        .await?;
    tracing::info!(
        student = %request.student_address,
        course_id = request.course_id,
        tx_hash = %receipt.tx_hash,
        "Enrollment approved"
    );
    Ok(Json(receipt.into()))
}

#[utoipa::path(
    get,
    path = "/api/admin/pending-approvals",
    tag = "Admin",
    responses((status = 200, body = PendingApprovalsResponse))
)]
pub async fn pending_approvals(
    State(state): State<AppState>,
) -> Result<Json<PendingApprovalsResponse>, ApiError> {
    let pending_approvals = state.reconciler().pending_approvals().await?;
    Ok(Json(PendingApprovalsResponse {
        success: true,
        pending_approvals,
    }))
}

// ============================================================================
// Admin accounts
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/admin/add-admin",
    request_body = AdminAddressRequest,
    tag = "Admin",
    responses((status = 200, body = TransactionResponse))
)]
pub async fn add_admin(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AdminAddressRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let receipt = state.ledger.add_admin(&request.wallet_address).await?;
    tracing::info!(admin = %request.wallet_address, tx_hash = %receipt.tx_hash, "Admin added");
    Ok(Json(receipt.into()))
}

#[utoipa::path(
    post,
    path = "/api/admin/remove-admin",
    request_body = AdminAddressRequest,
    tag = "Admin",
    responses((status = 200, body = TransactionResponse))
)]
pub async fn remove_admin(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AdminAddressRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let receipt = state.ledger.remove_admin(&request.wallet_address).await?;
    tracing::info!(admin = %request.wallet_address, tx_hash = %receipt.tx_hash, "Admin removed");
    Ok(Json(receipt.into()))
}

#[utoipa::path(
    get,
    path = "/api/admin/is-admin/{wallet_address}",
    params(("wallet_address" = String, Path, description = "Wallet address (any case)")),
    tag = "Admin",
    responses((status = 200, body = IsAdminResponse))
)]
pub async fn is_admin(
    State(state): State<AppState>,
    ApiPath(wallet_address): ApiPath<WalletAddress>,
) -> Result<Json<IsAdminResponse>, ApiError> {
    let is_admin = state.ledger.is_admin(&wallet_address).await?;
    Ok(Json(IsAdminResponse {
        success: true,
        is_admin,
    }))
}
