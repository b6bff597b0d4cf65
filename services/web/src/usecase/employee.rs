use chrono::Utc;

use nippo_core::pagination::{PageInfo, PageRequest};

use crate::domain::repository::EmployeeRepository;
use crate::domain::types::{
    Employee, EmployeeFilter, EmployeeForm, EmployeeStatus, NewEmployee, Role, validate_employee,
};
use crate::error::EmployeeServiceError;
use crate::infra::password::hash_password;

// ── ListEmployees ────────────────────────────────────────────────────────────

pub struct EmployeeListing {
    pub employees: Vec<Employee>,
    pub page: PageInfo,
}

pub struct ListEmployeesUseCase<R: EmployeeRepository> {
    pub repo: R,
}

impl<R: EmployeeRepository> ListEmployeesUseCase<R> {
    pub async fn execute(
        &self,
        filter: EmployeeFilter,
        page: PageRequest,
    ) -> Result<EmployeeListing, EmployeeServiceError> {
        let total = self.repo.count(filter).await?;
        let employees = self.repo.list(filter, page).await?;
        Ok(EmployeeListing {
            employees,
            page: PageInfo::new(page, total),
        })
    }
}

// ── GetEmployee ──────────────────────────────────────────────────────────────

pub struct GetEmployeeUseCase<R: EmployeeRepository> {
    pub repo: R,
}

impl<R: EmployeeRepository> GetEmployeeUseCase<R> {
    /// Look up an employee that has not been deleted.
    pub async fn execute(&self, id: i32) -> Result<Employee, EmployeeServiceError> {
        active_by_id(&self.repo, id).await
    }
}

async fn active_by_id<R: EmployeeRepository>(
    repo: &R,
    id: i32,
) -> Result<Employee, EmployeeServiceError> {
    repo.find_by_id(id)
        .await?
        .filter(Employee::is_active)
        .ok_or(EmployeeServiceError::EmployeeNotFound)
}

// ── RegisterEmployee ─────────────────────────────────────────────────────────

pub struct RegisterEmployeeUseCase<R: EmployeeRepository> {
    pub repo: R,
}

impl<R: EmployeeRepository> RegisterEmployeeUseCase<R> {
    pub async fn execute(&self, form: EmployeeForm) -> Result<Employee, EmployeeServiceError> {
        register(&self.repo, form).await
    }
}

async fn register<R: EmployeeRepository>(
    repo: &R,
    form: EmployeeForm,
) -> Result<Employee, EmployeeServiceError> {
    let code = form.code.trim();
    let code_taken = !code.is_empty() && repo.count_by_code(code).await? > 0;
    let errors = validate_employee(&form, code_taken, true);
    if !errors.is_empty() {
        return Err(EmployeeServiceError::InvalidInput(errors));
    }

    let employee = NewEmployee {
        code: code.to_owned(),
        name: form.name.trim().to_owned(),
        password_hash: hash_password(&form.password)?,
        role: role_of(&form),
        created_at: Utc::now(),
    };
    let created = repo.create(&employee).await?;
    tracing::info!(employee_id = created.id, code = %created.code, "employee registered");
    Ok(created)
}

// ── BootstrapAdmin ───────────────────────────────────────────────────────────

pub struct BootstrapAdminUseCase<R: EmployeeRepository> {
    pub repo: R,
}

impl<R: EmployeeRepository> BootstrapAdminUseCase<R> {
    /// Register an administrator when no employee row exists yet, deleted
    /// ones included. Returns `None` once the table has any row.
    pub async fn execute(
        &self,
        code: &str,
        name: &str,
        password: &str,
    ) -> Result<Option<Employee>, EmployeeServiceError> {
        if self.repo.count(EmployeeFilter::All).await? > 0 {
            return Ok(None);
        }
        let form = EmployeeForm {
            code: code.to_owned(),
            name: name.to_owned(),
            password: password.to_owned(),
            admin_flag: Some(Role::Admin.flag()),
        };
        register(&self.repo, form).await.map(Some)
    }
}

// ── UpdateEmployee ───────────────────────────────────────────────────────────

pub struct UpdateEmployeeUseCase<R: EmployeeRepository> {
    pub repo: R,
}

impl<R: EmployeeRepository> UpdateEmployeeUseCase<R> {
    /// Apply `form` to employee `id`. A blank password keeps the current one.
    pub async fn execute(
        &self,
        id: i32,
        form: EmployeeForm,
    ) -> Result<Employee, EmployeeServiceError> {
        let mut employee = active_by_id(&self.repo, id).await?;

        let code = form.code.trim();
        let code_taken = !code.is_empty()
            && code != employee.code
            && self.repo.count_by_code(code).await? > 0;
        let errors = validate_employee(&form, code_taken, false);
        if !errors.is_empty() {
            return Err(EmployeeServiceError::InvalidInput(errors));
        }

        employee.code = code.to_owned();
        employee.name = form.name.trim().to_owned();
        if !form.password.is_empty() {
            employee.password_hash = hash_password(&form.password)?;
        }
        employee.role = role_of(&form);
        employee.updated_at = Utc::now().max(employee.created_at);
        self.repo.update(&employee).await?;
        tracing::info!(employee_id = employee.id, "employee updated");
        Ok(employee)
    }
}

// ── DeleteEmployee ───────────────────────────────────────────────────────────

pub struct DeleteEmployeeUseCase<R: EmployeeRepository> {
    pub repo: R,
}

impl<R: EmployeeRepository> DeleteEmployeeUseCase<R> {
    /// Mark employee `id` as deleted. The row itself is kept.
    pub async fn execute(&self, id: i32) -> Result<(), EmployeeServiceError> {
        let mut employee = active_by_id(&self.repo, id).await?;
        employee.status = EmployeeStatus::Deleted;
        employee.updated_at = Utc::now().max(employee.created_at);
        self.repo.update(&employee).await?;
        tracing::info!(employee_id = employee.id, "employee deleted");
        Ok(())
    }
}

/// Validated forms always carry a known flag.
fn role_of(form: &EmployeeForm) -> Role {
    form.admin_flag
        .and_then(Role::from_flag)
        .unwrap_or(Role::General)
}
