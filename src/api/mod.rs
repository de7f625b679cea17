// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AddCourseRequest, AddCourseResponse, AddStudentRequest, AdminAddressRequest,
        ApproveCourseRequest, Course, CourseEntry, CoursesResponse, EnrollmentAction,
        IsAdminResponse, LedgerStatus, LoginRequest, LoginResponse, PendingApproval,
        PendingApprovalsResponse, RelayEnrollmentRequest, RelayEnrollmentResponse, Student,
        StudentCoursesResponse, StudentsResponse, SuccessResponse, SyncCourseResponse,
        TransactionResponse, WalletAddress,
    },
    state::AppState,
};

pub mod admin;
pub mod extract;
pub mod health;
pub mod student;

pub fn router(state: AppState) -> Router {
    let student_routes = Router::new()
        .route("/login", post(student::login))
        .route("/courses/{wallet_address}", get(student::get_courses))
        .route("/enrollments", post(student::relay_enrollment));

    let admin_routes = Router::new()
        .route("/add-student", post(admin::add_student))
        .route("/delete-student/{reg_number}", delete(admin::delete_student))
        .route("/students", get(admin::list_students))
        .route("/add-course", post(admin::add_course))
        .route("/delete-course/{course_id}", delete(admin::delete_course))
        .route("/sync-course/{course_id}", post(admin::sync_course))
        .route("/courses", get(admin::list_courses))
        .route("/approve-course", post(admin::approve_course))
        .route("/pending-approvals", get(admin::pending_approvals))
        .route("/add-admin", post(admin::add_admin))
        .route("/remove-admin", post(admin::remove_admin))
        .route("/is-admin/{wallet_address}", get(admin::is_admin));

    let api_routes = Router::new()
        .nest("/api/student", student_routes)
        .nest("/api/admin", admin_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        student::login,
        student::get_courses,
        student::relay_enrollment,
        admin::add_student,
        admin::delete_student,
        admin::list_students,
        admin::add_course,
        admin::delete_course,
        admin::sync_course,
        admin::list_courses,
        admin::approve_course,
        admin::pending_approvals,
        admin::add_admin,
        admin::remove_admin,
        admin::is_admin,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            WalletAddress,
            Student,
            Course,
            LedgerStatus,
            CourseEntry,
            PendingApproval,
            EnrollmentAction,
            LoginRequest,
            AddStudentRequest,
            AddCourseRequest,
            ApproveCourseRequest,
            AdminAddressRequest,
            RelayEnrollmentRequest,
            SuccessResponse,
            TransactionResponse,
            LoginResponse,
            StudentCoursesResponse,
            CoursesResponse,
            StudentsResponse,
            PendingApprovalsResponse,
            IsAdminResponse,
            AddCourseResponse,
            SyncCourseResponse,
            RelayEnrollmentResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Student", description = "Student login, course views and enrollment relay"),
        (name = "Admin", description = "Student/course records and ledger administration"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
