// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student-facing endpoints.
//!
//! Login is a record lookup (wallet + registration number), not a
//! cryptographic authentication. Enrollment writes arrive as transactions
//! signed in the student's own wallet and are relayed after the signer is
//! matched to a registered student.

use axum::{extract::State, Json};

use super::extract::{ApiJson, ApiPath};
use crate::{
    blockchain::relay::decode_enrollment,
    error::ApiError,
    models::{
        LoginRequest, LoginResponse, RelayEnrollmentRequest, RelayEnrollmentResponse,
        StudentCoursesResponse, WalletAddress,
    },
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/student/login",
    request_body = LoginRequest,
    tag = "Student",
    responses(
        (status = 200, body = LoginResponse),
        (status = 404, description = "No student with this wallet and registration number")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    tracing::info!(
        wallet_address = %request.wallet_address,
        reg_number = %request.reg_number,
        "Student login"
    );

    let student = state
        .store
        .find_student(&request.wallet_address, &request.reg_number)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    Ok(Json(LoginResponse {
        success: true,
        student,
    }))
}

#[utoipa::path(
    get,
    path = "/api/student/courses/{wallet_address}",
    params(
        ("wallet_address" = String, Path, description = "Student wallet address (any case)")
    ),
    tag = "Student",
    responses((status = 200, body = StudentCoursesResponse))
)]
pub async fn get_courses(
    State(state): State<AppState>,
    ApiPath(wallet_address): ApiPath<WalletAddress>,
) -> Result<Json<StudentCoursesResponse>, ApiError> {
    let view = state
        .reconciler()
        .student_course_view(&wallet_address)
        .await?;
    Ok(Json(view.into()))
}

/// Relay a student-signed `addCourse`/`removeCourse` transaction.
///
/// The signer must be a registered student; the transaction is broadcast
/// unchanged and the response is sent once it is confirmed.
#[utoipa::path(
    post,
    path = "/api/student/enrollments",
    request_body = RelayEnrollmentRequest,
    tag = "Student",
    responses(
        (status = 200, body = RelayEnrollmentResponse),
        (status = 400, description = "Not an enrollment call for this contract and chain"),
        (status = 403, description = "Signer is not a registered student"),
        (status = 504, description = "Submitted, confirmation still pending")
    )
)]
pub async fn relay_enrollment(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RelayEnrollmentRequest>,
) -> Result<Json<RelayEnrollmentResponse>, ApiError> {
    let enrollment = decode_enrollment(
        &request.signed_transaction,
        state.ledger.contract_address(),
        state.ledger.chain_id(),
    )?;

    if state
        .store
        .find_student_by_wallet(&enrollment.student)
        .await?
        .is_none()
    {
        tracing::warn!(signer = %enrollment.student, "Enrollment from unregistered wallet");
        return Err(ApiError::forbidden(format!(
            "{} is not a registered student",
            enrollment.student
        )));
    }

    let receipt = state.ledger.submit_enrollment(&enrollment).await?;
    tracing::info!(
        student = %enrollment.student,
        action = ?enrollment.action,
        course_id = enrollment.course_id,
        tx_hash = %receipt.tx_hash,
        "Enrollment relayed"
    );

    Ok(Json(RelayEnrollmentResponse {
        success: true,
        action: enrollment.action,
        course_id: enrollment.course_id,
        tx_hash: receipt.tx_hash,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::StatusCode;

    use alloy::{
        primitives::{TxKind, U256},
        sol_types::SolCall,
    };

    use crate::blockchain::contract::ICourseRegistration;
    use crate::blockchain::relay::tests::{
        add_course_tx, sign_call, sign_call_on, student_signer, CONTRACT,
    };
    use crate::blockchain::{InMemoryLedger, Ledger};
    use crate::models::{EnrollmentAction, Student};
    use crate::storage::{InMemoryRecordStore, RecordStore};

    async fn state_with_student(wallet: &str) -> (AppState, Arc<InMemoryLedger>) {
        let store = Arc::new(InMemoryRecordStore::new());
        store
            .insert_student(Student {
                wallet_address: WalletAddress::from(wallet),
                name: "Ada".into(),
                reg_number: "R1".into(),
            })
            .await
            .unwrap();
        let ledger = Arc::new(InMemoryLedger::new(CONTRACT));
        (AppState::new(store, ledger.clone()), ledger)
    }

    #[tokio::test]
    async fn login_normalizes_wallet_case() {
        let (state, _) = state_with_student("0xaa").await;

        let Json(response) = login(
            State(state),
            ApiJson(LoginRequest {
                wallet_address: WalletAddress::from("0xAA"),
                reg_number: "R1".into(),
            }),
        )
        .await
        .expect("login succeeds");

        assert!(response.success);
        assert_eq!(response.student.reg_number, "R1");
    }

    #[tokio::test]
    async fn login_requires_both_fields_to_match() {
        let (state, _) = state_with_student("0xaa").await;

        let err = login(
            State(state),
            ApiJson(LoginRequest {
                wallet_address: WalletAddress::from("0xaa"),
                reg_number: "R2".into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Student not found");
    }

    #[tokio::test]
    async fn courses_view_uses_ledger_state() {
        let (state, ledger) = state_with_student("0xaa").await;
        ledger.insert_approved(&WalletAddress::from("0xaa"), 4).await;

        let Json(response) = get_courses(State(state), ApiPath(WalletAddress::from("0xAA")))
            .await
            .unwrap();

        assert!(response.pending.is_empty());
        assert_eq!(response.approved[0].course_id, 4);
        assert_eq!(response.approved[0].course_name, "Unknown");
    }

    #[tokio::test]
    async fn relays_enrollment_from_registered_student() {
        let signer = student_signer();
        let (state, ledger) = state_with_student(&signer.address().to_string()).await;
        ledger.set_course_capacity(7, 10).await.unwrap();

        let Json(response) = relay_enrollment(
            State(state),
            ApiJson(RelayEnrollmentRequest {
                signed_transaction: add_course_tx(&signer, 7),
            }),
        )
        .await
        .expect("relay succeeds");

        assert_eq!(response.action, EnrollmentAction::Add);
        assert_eq!(response.course_id, 7);
        let student = WalletAddress::from(signer.address().to_string());
        assert_eq!(ledger.pending_courses(&student).await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn rejects_enrollment_from_unregistered_wallet() {
        let (state, ledger) = state_with_student("0xaa").await;
        ledger.set_course_capacity(7, 10).await.unwrap();
        let signer = student_signer();

        let err = relay_enrollment(
            State(state),
            ApiJson(RelayEnrollmentRequest {
                signed_transaction: add_course_tx(&signer, 7),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::FORBIDDEN);
        let student = WalletAddress::from(signer.address().to_string());
        assert!(ledger.pending_courses(&student).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_transactions_for_another_contract() {
        let signer = student_signer();
        let store = Arc::new(InMemoryRecordStore::new());
        let state = AppState::new(store, Arc::new(InMemoryLedger::default()));

        let err = relay_enrollment(
            State(state),
            ApiJson(RelayEnrollmentRequest {
                signed_transaction: add_course_tx(&signer, 7),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn out_of_range_course_id_is_bad_request() {
        let signer = student_signer();
        let (state, _) = state_with_student(&signer.address().to_string()).await;
        let call = ICourseRegistration::addCourseCall {
            courseId: U256::MAX,
        };

        let err = relay_enrollment(
            State(state),
            ApiJson(RelayEnrollmentRequest {
                signed_transaction: sign_call(&signer, TxKind::Call(CONTRACT), call.abi_encode()),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("out of range"));
    }

    #[tokio::test]
    async fn rejects_transactions_signed_for_another_chain() {
        let signer = student_signer();
        let (state, ledger) = state_with_student(&signer.address().to_string()).await;
        ledger.set_course_capacity(7, 10).await.unwrap();
        let call = ICourseRegistration::addCourseCall {
            courseId: U256::from(7u64),
        };

        let err = relay_enrollment(
            State(state),
            ApiJson(RelayEnrollmentRequest {
                signed_transaction: sign_call_on(
                    1,
                    &signer,
                    TxKind::Call(CONTRACT),
                    call.abi_encode(),
                ),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let student = WalletAddress::from(signer.address().to_string());
        assert!(ledger.pending_courses(&student).await.unwrap().is_empty());
    }
}
