use std::sync::LazyLock;

use crate::domain::repository::EmployeeRepository;
use crate::domain::types::Employee;
use crate::error::EmployeeServiceError;
use crate::infra::password::{hash_password, verify_password};

/// Verified against when no employee matches, so unknown codes cost one Argon2 run too.
static UNMATCHED_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("unmatched-employee-code").ok());

// ── Authenticate ─────────────────────────────────────────────────────────────

pub struct AuthenticateUseCase<R: EmployeeRepository> {
    pub repo: R,
}

impl<R: EmployeeRepository> AuthenticateUseCase<R> {
    /// The active employee holding `code` whose password is `password`.
    /// Unknown codes, deleted employees and wrong passwords all fail alike.
    pub async fn execute(
        &self,
        code: &str,
        password: &str,
    ) -> Result<Employee, EmployeeServiceError> {
        if code.is_empty() || password.is_empty() {
            return Err(EmployeeServiceError::InvalidCredentials);
        }
        let Some(employee) = self.repo.find_active_by_code(code).await? else {
            if let Some(hash) = UNMATCHED_HASH.as_deref() {
                let _ = verify_password(password, hash);
            }
            return Err(EmployeeServiceError::InvalidCredentials);
        };
        if !verify_password(password, &employee.password_hash)? {
            return Err(EmployeeServiceError::InvalidCredentials);
        }
        Ok(employee)
    }
}
