#![allow(async_fn_in_trait)]

use nippo_core::pagination::PageRequest;

use crate::domain::types::{Employee, EmployeeFilter, NewEmployee, SessionRecord};
use crate::error::EmployeeServiceError;

/// Repository for employee accounts.
pub trait EmployeeRepository: Send + Sync {
    /// Employees under `filter`, newest id first.
    async fn list(
        &self,
        filter: EmployeeFilter,
        page: PageRequest,
    ) -> Result<Vec<Employee>, EmployeeServiceError>;

    async fn count(&self, filter: EmployeeFilter) -> Result<u64, EmployeeServiceError>;

    /// Rows holding `code`, deleted ones included.
    async fn count_by_code(&self, code: &str) -> Result<u64, EmployeeServiceError>;

    /// The active employee holding `code`. Deleted rows never match.
    async fn find_active_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Employee>, EmployeeServiceError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, EmployeeServiceError>;

    /// Insert and return the stored row with its assigned id.
    async fn create(&self, employee: &NewEmployee) -> Result<Employee, EmployeeServiceError>;

    /// Persist every mutable column of `employee` (`id` and `created_at` are left alone).
    async fn update(&self, employee: &Employee) -> Result<(), EmployeeServiceError>;
}

/// Server-side session storage keyed by the session cookie value.
pub trait SessionStore: Send + Sync {
    /// Load a live session. Expired or unknown ids yield `None`.
    async fn load(&self, id: &str) -> Result<Option<SessionRecord>, EmployeeServiceError>;

    /// Store `record` under `id`, restarting its expiry clock.
    async fn save(&self, id: &str, record: &SessionRecord) -> Result<(), EmployeeServiceError>;

    async fn remove(&self, id: &str) -> Result<(), EmployeeServiceError>;
}
