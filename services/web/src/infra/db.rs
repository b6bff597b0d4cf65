use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use nippo_core::pagination::PageRequest;
use nippo_web_schema::employees;

use crate::domain::repository::EmployeeRepository;
use crate::domain::types::{Employee, EmployeeFilter, EmployeeStatus, NewEmployee, Role};
use crate::error::EmployeeServiceError;

// ── Employee repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEmployeeRepository {
    pub db: DatabaseConnection,
}

fn filtered(filter: EmployeeFilter) -> Select<employees::Entity> {
    let query = employees::Entity::find();
    match filter {
        EmployeeFilter::Active => query
            .filter(employees::Column::DeleteFlag.eq(EmployeeStatus::Active.flag())),
        EmployeeFilter::All => query,
    }
}

impl EmployeeRepository for DbEmployeeRepository {
    async fn list(
        &self,
        filter: EmployeeFilter,
        page: PageRequest,
    ) -> Result<Vec<Employee>, EmployeeServiceError> {
        let models = filtered(filter)
            .order_by_desc(employees::Column::Id)
            .offset(page.offset())
            .limit(page.per_page)
            .all(&self.db)
            .await
            .context("list employees")?;
        models.into_iter().map(employee_from_model).collect()
    }

    async fn count(&self, filter: EmployeeFilter) -> Result<u64, EmployeeServiceError> {
        let count = filtered(filter)
            .count(&self.db)
            .await
            .context("count employees")?;
        Ok(count)
    }

    async fn count_by_code(&self, code: &str) -> Result<u64, EmployeeServiceError> {
        let count = employees::Entity::find()
            .filter(employees::Column::Code.eq(code))
            .count(&self.db)
            .await
            .context("count employees by code")?;
        Ok(count)
    }

    async fn find_active_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Employee>, EmployeeServiceError> {
        let model = filtered(EmployeeFilter::Active)
            .filter(employees::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find active employee by code")?;
        model.map(employee_from_model).transpose()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, EmployeeServiceError> {
        let model = employees::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find employee by id")?;
        model.map(employee_from_model).transpose()
    }

    async fn create(&self, employee: &NewEmployee) -> Result<Employee, EmployeeServiceError> {
        let model = employees::ActiveModel {
            code: Set(employee.code.clone()),
            name: Set(employee.name.clone()),
            password: Set(employee.password_hash.clone()),
            admin_flag: Set(employee.role.flag()),
            created_at: Set(employee.created_at),
            updated_at: Set(employee.created_at),
            delete_flag: Set(EmployeeStatus::Active.flag()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create employee")?;
        employee_from_model(model)
    }

    async fn update(&self, employee: &Employee) -> Result<(), EmployeeServiceError> {
        employees::ActiveModel {
            id: Set(employee.id),
            code: Set(employee.code.clone()),
            name: Set(employee.name.clone()),
            password: Set(employee.password_hash.clone()),
            admin_flag: Set(employee.role.flag()),
            updated_at: Set(employee.updated_at),
            delete_flag: Set(employee.status.flag()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update employee")?;
        Ok(())
    }
}

fn employee_from_model(model: employees::Model) -> Result<Employee, EmployeeServiceError> {
    let role = Role::from_flag(model.admin_flag)
        .with_context(|| format!("employee {} has admin_flag {}", model.id, model.admin_flag))?;
    Ok(Employee {
        id: model.id,
        code: model.code,
        name: model.name,
        password_hash: model.password,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
        status: EmployeeStatus::from_flag(model.delete_flag),
    })
}
