use diesel::prelude::*;

/// Employee model for reading from database
/// Derives Queryable for SELECT operations and Selectable for type-safe column selection
#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Argument of a repository save.
///
/// `id = None` inserts a new row. `id = Some(..)` overwrites that row when it
/// exists; otherwise a new row with a storage-generated id is inserted.
/// Derives Insertable for INSERT and AsChangeset for the overwrite path
/// (the primary key is never part of the changeset).
#[derive(Debug, Insertable, AsChangeset, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::employees)]
pub struct NewEmployee {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl NewEmployee {
    /// Creates an employee that has not been persisted yet.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Same fields, targeting the given row id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Materializes the persisted form under the given id.
    pub fn into_employee(self, id: i64) -> Employee {
        Employee {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        }
    }
}

/// Partial update of an employee. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UpdateEmployee {
    /// Applies the present fields over `current`, keeping its id.
    pub fn apply_to(self, current: Employee) -> NewEmployee {
        NewEmployee {
            id: Some(current.id),
            first_name: self.first_name.unwrap_or(current.first_name),
            last_name: self.last_name.unwrap_or(current.last_name),
            email: self.email.unwrap_or(current.email),
        }
    }
}
