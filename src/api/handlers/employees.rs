//! Employee CRUD request handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::EMPLOYEE_TAG;
use crate::api::dto::{CreateEmployeeRequest, EmployeeResponse, ErrorResponse, UpdateEmployeeRequest};
use crate::api::extract::{ApiJson, ApiPath};
use crate::error::AppResult;
use crate::state::AppState;

/// Creates employee routes.
///
/// # Routes
/// - `GET /employees`, `POST /employees`
/// - `GET /employees/{id}`, `PUT /employees/{id}`, `DELETE /employees/{id}`
pub fn employee_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_employees, create_employee))
        .routes(routes!(get_employee, update_employee, delete_employee))
}

/// GET /employees - List all employees
#[utoipa::path(
    get,
    path = "/employees",
    tag = EMPLOYEE_TAG,
    responses(
        (status = 200, description = "All employees", body = Vec<EmployeeResponse>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn list_employees(State(state): State<AppState>) -> AppResult<Json<Vec<EmployeeResponse>>> {
    let employees = state.services.employees.list_employees().await?;
    Ok(Json(
        employees.into_iter().map(EmployeeResponse::from).collect(),
    ))
}

/// POST /employees - Create an employee
#[utoipa::path(
    post,
    path = "/employees",
    tag = EMPLOYEE_TAG,
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "Email already registered or storage failure", body = ErrorResponse)
    )
)]
async fn create_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<EmployeeResponse>)> {
    let employee = state
        .services
        .employees
        .create_employee(req.into_new_employee())
        .await?;
    Ok((StatusCode::CREATED, Json(EmployeeResponse::from(employee))))
}

/// GET /employees/{id} - Get an employee by id
///
/// A missing employee is a 404 with an empty body.
#[utoipa::path(
    get,
    path = "/employees/{id}",
    tag = EMPLOYEE_TAG,
    params(
        ("id" = i64, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn get_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Response> {
    let response = match state.services.employees.get_employee(id).await? {
        Some(employee) => Json(EmployeeResponse::from(employee)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    };
    Ok(response)
}

/// PUT /employees/{id} - Update an employee
#[utoipa::path(
    put,
    path = "/employees/{id}",
    tag = EMPLOYEE_TAG,
    params(
        ("id" = i64, Path, description = "Employee id")
    ),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Email already registered or storage failure", body = ErrorResponse)
    )
)]
async fn update_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateEmployeeRequest>,
) -> AppResult<Json<EmployeeResponse>> {
    let employee = state
        .services
        .employees
        .update_employee(id, req.into_update_employee())
        .await?;
    Ok(Json(EmployeeResponse::from(employee)))
}

/// DELETE /employees/{id} - Delete an employee
///
/// Succeeds whether or not the employee existed.
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    tag = EMPLOYEE_TAG,
    params(
        ("id" = i64, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn delete_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.services.employees.delete_employee(id).await?;
    Ok(StatusCode::OK)
}
