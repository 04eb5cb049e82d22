use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// Unique violations become `AppError::Duplicate`; every other failure is a
/// storage failure and becomes `AppError::Database`.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info, operation)
            }
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: Box<dyn diesel::result::DatabaseErrorInformation + Send + Sync>,
        operation: &str,
    ) -> AppError {
        let message = info.message();

        if let DatabaseErrorKind::UniqueViolation = kind {
            if let Some((entity, field, value)) = ConstraintParser::parse_unique_violation(
                message,
                info.details(),
                info.constraint_name(),
            ) {
                return AppError::Duplicate {
                    entity: Self::singular(&entity),
                    field,
                    value,
                };
            }
            return AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Unique constraint violation: {}", message)),
            };
        }

        AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("Database error: {}", message)),
        }
    }

    /// Table names are plural; error entities are singular (`employees` -> `employee`).
    fn singular(table: &str) -> String {
        table.strip_suffix('s').unwrap_or(table).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    struct MockDatabaseErrorInfo {
        message: String,
        details: Option<String>,
        constraint_name: Option<String>,
    }

    impl diesel::result::DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            self.details.as_deref()
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint_name.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[test]
    fn test_convert_unique_violation_on_email() {
        let info = MockDatabaseErrorInfo {
            message: "duplicate key value violates unique constraint \"employees_email_key\""
                .to_string(),
            details: Some("Key (email)=(p12@email.com) already exists.".to_string()),
            constraint_name: Some("employees_email_key".to_string()),
        };
        let error = DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(info));

        match DatabaseErrorConverter::convert_diesel_error(error, "save employee") {
            AppError::Duplicate {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "employee");
                assert_eq!(field, "email");
                assert_eq!(value, "p12@email.com");
            }
            other => panic!("Expected Duplicate error, got: {:?}", other),
        }
    }

    #[test]
    fn test_convert_unparseable_unique_violation() {
        let info = MockDatabaseErrorInfo {
            message: "unique violation".to_string(),
            details: None,
            constraint_name: None,
        };
        let error = DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(info));

        let result = DatabaseErrorConverter::convert_diesel_error(error, "save employee");
        assert!(matches!(result, AppError::Database { .. }));
    }

    #[test]
    fn test_convert_other_database_error() {
        let info = MockDatabaseErrorInfo {
            message: "server closed the connection unexpectedly".to_string(),
            details: None,
            constraint_name: None,
        };
        let error =
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, Box::new(info));

        match DatabaseErrorConverter::convert_diesel_error(error, "list employees") {
            AppError::Database { operation, source } => {
                assert_eq!(operation, "list employees");
                assert!(source.to_string().contains("server closed the connection"));
            }
            other => panic!("Expected Database error, got: {:?}", other),
        }
    }

    #[test]
    fn test_convert_not_found_is_storage_failure() {
        let result = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find");
        assert!(matches!(result, AppError::Database { .. }));
    }
}
