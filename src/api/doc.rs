use utoipa::OpenApi;

pub const EMPLOYEE_TAG: &str = "Employees";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Service",
        description = "CRUD API for employee records",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
        )
    ),
    tags(
        (name = EMPLOYEE_TAG, description = "Employee management endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
