//! Middleware components for request processing.
//!
//! Request ID tracking, request logging, and the mapping from `AppError`
//! to HTTP responses.

mod error_handler;
mod logging;
mod request_id;

pub use error_handler::{error_to_status_code, handle_json_rejection, handle_path_rejection};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, current_request_id, request_id_middleware};
