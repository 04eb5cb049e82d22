//! Employee service for business logic operations.
//!
//! Owns the rules that sit between HTTP and storage: unique emails on
//! create, existence checks on update, and partial-update merging.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Employee, NewEmployee, UpdateEmployee};
use crate::repositories::EmployeeRepository;

/// Employee service wrapping a shared repository.
///
/// Cloning only bumps the repository's reference count.
#[derive(Clone)]
pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>) -> Self {
        Self { repo }
    }

    /// Creates a new employee.
    ///
    /// Any id on `new_employee` is discarded; storage assigns one.
    ///
    /// # Errors
    /// `AppError::Duplicate` if the email is already taken. Nothing is
    /// written in that case.
    pub async fn create_employee(&self, new_employee: NewEmployee) -> AppResult<Employee> {
        if self
            .repo
            .find_by_email(&new_employee.email)
            .await?
            .is_some()
        {
            warn!(email = %new_employee.email, "Rejected employee with duplicate email");
            return Err(AppError::duplicate_email(&new_employee.email));
        }

        let employee = self
            .repo
            .save(NewEmployee {
                id: None,
                ..new_employee
            })
            .await?;

        info!(employee_id = employee.id, email = %employee.email, "Employee created");
        Ok(employee)
    }

    /// Lists all employees.
    pub async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        self.repo.find_all().await
    }

    /// Gets an employee by id; absence is `Ok(None)`.
    pub async fn get_employee(&self, id: i64) -> AppResult<Option<Employee>> {
        let employee = self.repo.find_by_id(id).await?;
        if employee.is_none() {
            debug!(employee_id = id, "Employee not found");
        }
        Ok(employee)
    }

    /// Applies `changes` to the stored employee `id`.
    ///
    /// Fields left as `None` keep their stored value. The email is not
    /// re-checked here; a clash surfaces from storage as `AppError::Duplicate`.
    ///
    /// # Errors
    /// `AppError::NotFound` if no employee has this id.
    pub async fn update_employee(&self, id: i64, changes: UpdateEmployee) -> AppResult<Employee> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::employee_not_found(id))?;

        let employee = self.repo.save(changes.apply_to(current)).await?;

        info!(employee_id = employee.id, "Employee updated");
        Ok(employee)
    }

    /// Deletes an employee. Deleting a missing id succeeds.
    pub async fn delete_employee(&self, id: i64) -> AppResult<()> {
        self.repo.delete_by_id(id).await?;
        info!(employee_id = id, "Employee deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryEmployeeRepository;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> (EmployeeService, Arc<InMemoryEmployeeRepository>) {
        let repo = Arc::new(InMemoryEmployeeRepository::new());
        (EmployeeService::new(repo.clone()), repo)
    }

    fn pepe() -> NewEmployee {
        NewEmployee::new("Pepe", "Lopez", "p12@email.com")
    }

    /// Repository whose every call fails, counting `save` attempts.
    #[derive(Default)]
    struct FailingRepository {
        saves: AtomicUsize,
    }

    impl FailingRepository {
        fn failure(operation: &str) -> AppError {
            AppError::Database {
                operation: operation.to_string(),
                source: anyhow::anyhow!("connection refused"),
            }
        }
    }

    #[async_trait]
    impl EmployeeRepository for FailingRepository {
        async fn find_by_id(&self, _id: i64) -> AppResult<Option<Employee>> {
            Err(Self::failure("find employee by id"))
        }

        async fn find_by_email(&self, _email: &str) -> AppResult<Option<Employee>> {
            Err(Self::failure("find employee by email"))
        }

        async fn find_all(&self) -> AppResult<Vec<Employee>> {
            Err(Self::failure("list employees"))
        }

        async fn save(&self, _employee: NewEmployee) -> AppResult<Employee> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Err(Self::failure("save employee"))
        }

        async fn delete_by_id(&self, _id: i64) -> AppResult<()> {
            Err(Self::failure("delete employee"))
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (service, _) = service();

        let created = service.create_employee(pepe()).await.unwrap();
        let fetched = service.get_employee(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.first_name, "Pepe");
        assert_eq!(fetched.last_name, "Lopez");
        assert_eq!(fetched.email, "p12@email.com");
    }

    #[tokio::test]
    async fn test_create_ignores_supplied_id() {
        let (service, repo) = service();

        let created = service.create_employee(pepe().with_id(500)).await.unwrap();

        assert_eq!(created.id, 1);
        assert!(repo.find_by_id(500).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_email_leaves_storage_unchanged() {
        let (service, repo) = service();
        service.create_employee(pepe()).await.unwrap();

        let result = service
            .create_employee(NewEmployee::new("Otro", "Nombre", "p12@email.com"))
            .await;

        match result {
            Err(AppError::Duplicate {
                entity,
                field,
                value,
            }) => {
                assert_eq!(entity, "employee");
                assert_eq!(field, "email");
                assert_eq!(value, "p12@email.com");
            }
            other => panic!("Expected Duplicate error, got: {:?}", other),
        }
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (service, _) = service();
        assert!(service.get_employee(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (service, repo) = service();

        let result = service
            .update_employee(9, UpdateEmployee {
                first_name: Some("Raul".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_merges_partial_changes() {
        let (service, _) = service();
        let created = service.create_employee(pepe()).await.unwrap();

        let updated = service
            .update_employee(created.id, UpdateEmployee {
                email: Some("javier@gmail.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.first_name, "Pepe");
        assert_eq!(updated.last_name, "Lopez");
        assert_eq!(updated.email, "javier@gmail.com");
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_duplicate() {
        let (service, _) = service();
        service.create_employee(pepe()).await.unwrap();
        let juan = service
            .create_employee(NewEmployee::new("Juan", "Oliva", "jj22@email.com"))
            .await
            .unwrap();

        let result = service
            .update_employee(juan.id, UpdateEmployee {
                email: Some("p12@email.com".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let (service, _) = service();
        let created = service.create_employee(pepe()).await.unwrap();

        service.delete_employee(created.id).await.unwrap();

        assert!(service.get_employee(created.id).await.unwrap().is_none());
        assert!(service.delete_employee(created.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_storage_failures_propagate() {
        let repo = Arc::new(FailingRepository::default());
        let service = EmployeeService::new(repo.clone());

        assert!(matches!(
            service.create_employee(pepe()).await,
            Err(AppError::Database { .. })
        ));
        assert_eq!(repo.saves.load(Ordering::SeqCst), 0);
        assert!(service.list_employees().await.is_err());
        assert!(service.get_employee(1).await.is_err());
        assert!(service.update_employee(1, UpdateEmployee::default()).await.is_err());
        assert!(service.delete_employee(1).await.is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create(u8),
        Delete(u8),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![(0u8..6).prop_map(Op::Create), (0u8..6).prop_map(Op::Delete)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Sequential creates and deletes keep `list_employees` in step with
        /// the set of distinct emails currently stored.
        #[test]
        fn property_list_reflects_state(ops in prop::collection::vec(arb_op(), 0..30)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();

            runtime.block_on(async {
                let (service, _) = service();
                let mut expected: std::collections::BTreeMap<u8, i64> = Default::default();

                for op in ops {
                    match op {
                        Op::Create(n) => {
                            let email = format!("user{}@email.com", n);
                            let result = service
                                .create_employee(NewEmployee::new("First", "Last", email))
                                .await;
                            match (expected.contains_key(&n), result) {
                                (true, Err(AppError::Duplicate { .. })) => {}
                                (false, Ok(employee)) => {
                                    expected.insert(n, employee.id);
                                }
                                (_, other) => panic!("unexpected create outcome: {:?}", other),
                            }
                        }
                        Op::Delete(n) => {
                            let id = expected.remove(&n).unwrap_or(i64::MAX);
                            service.delete_employee(id).await.unwrap();
                        }
                    }

                    let listed = service.list_employees().await.unwrap();
                    assert_eq!(listed.len(), expected.len());
                }
            });
        }
    }
}
