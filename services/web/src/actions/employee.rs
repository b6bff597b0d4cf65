use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nippo_core::pagination::{PageInfo, PageRequest};

use crate::actions::{ACT_EMPLOYEE, CMD_INDEX};
use crate::controller::context::ActionContext;
use crate::controller::dispatch::CommandFuture;
use crate::controller::error::ActionError;
use crate::controller::params::{name, to_number};
use crate::controller::scope::{Key, attr};
use crate::controller::view::{Transition, View};
use crate::domain::types::{Employee, EmployeeFilter, EmployeeForm};
use crate::error::EmployeeServiceError;
use crate::usecase::employee::{
    DeleteEmployeeUseCase, GetEmployeeUseCase, ListEmployeesUseCase, RegisterEmployeeUseCase,
    UpdateEmployeeUseCase,
};

const DEFAULT_ROWS_PER_PAGE: u64 = 15;

// ── View models ──────────────────────────────────────────────────────────────

/// Employee as shown on list and detail pages.
#[derive(Serialize)]
pub struct EmployeeView {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub admin: bool,
    pub deleted: bool,
    #[serde(serialize_with = "nippo_core::serde::to_display_minutes")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "nippo_core::serde::to_display_minutes")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Employee> for EmployeeView {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id,
            code: e.code.clone(),
            name: e.name.clone(),
            admin: e.is_admin(),
            deleted: !e.is_active(),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Values shown in the registration and edit forms. Never carries a password.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EmployeeFormView {
    pub id: Option<i32>,
    pub code: String,
    pub name: String,
    pub admin_flag: Option<i32>,
}

impl From<&Employee> for EmployeeFormView {
    fn from(e: &Employee) -> Self {
        Self {
            id: Some(e.id),
            code: e.code.clone(),
            name: e.name.clone(),
            admin_flag: Some(e.role.flag()),
        }
    }
}

const EMPLOYEES: Key<Vec<EmployeeView>> = Key::new("employees");
const EMPLOYEE: Key<EmployeeView> = Key::new("employee");
const FORM: Key<EmployeeFormView> = Key::new("form");
const PAGE: Key<PageInfo> = Key::new("page");
const PAGES: Key<Vec<u64>> = Key::new("pages");
const FILTER: Key<&'static str> = Key::new("filter");

// ── Commands ─────────────────────────────────────────────────────────────────

pub fn index(ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move {
        let filter = EmployeeFilter::from_param(ctx.param(name::FILTER));
        let per_page = ctx
            .get_application(attr::ROWS_PER_PAGE)
            .unwrap_or(DEFAULT_ROWS_PER_PAGE);
        let usecase = ListEmployeesUseCase {
            repo: ctx.state().employee_repo(),
        };
        let listing = usecase
            .execute(filter, PageRequest::new(ctx.page(), per_page))
            .await?;

        let employees: Vec<EmployeeView> = listing.employees.iter().map(EmployeeView::from).collect();
        ctx.put_request(EMPLOYEES, &employees);
        ctx.put_request(PAGE, &listing.page);
        ctx.put_request(PAGES, &(1..=listing.page.last_page).collect());
        ctx.put_request(
            FILTER,
            &match filter {
                EmployeeFilter::Active => "active",
                EmployeeFilter::All => "all",
            },
        );
        Ok(Transition::forward(View::EMP_INDEX))
    })
}

pub fn entry_new(ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move {
        ctx.put_request(
            FORM,
            &EmployeeFormView {
                admin_flag: Some(0),
                ..Default::default()
            },
        );
        Ok(Transition::forward(View::EMP_NEW))
    })
}

pub fn create(ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move {
        ctx.check_token()?;

        let form = read_form(ctx);
        let usecase = RegisterEmployeeUseCase {
            repo: ctx.state().employee_repo(),
        };
        match usecase.execute(form.clone()).await {
            Ok(_) => {
                ctx.put_session(attr::FLUSH, &"Registration completed.".to_owned());
                Ok(Transition::redirect(ACT_EMPLOYEE, Some(CMD_INDEX)))
            }
            Err(EmployeeServiceError::InvalidInput(errors)) => {
                rejected(ctx, None, &form, &errors);
                Ok(Transition::forward(View::EMP_NEW))
            }
            Err(e) => Err(e.into()),
        }
    })
}

pub fn show(ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move {
        let id = employee_id(ctx)?;
        let usecase = GetEmployeeUseCase {
            repo: ctx.state().employee_repo(),
        };
        let employee = usecase.execute(id).await?;
        ctx.put_request(EMPLOYEE, &EmployeeView::from(&employee));
        Ok(Transition::forward(View::EMP_SHOW))
    })
}

pub fn edit(ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move {
        let id = employee_id(ctx)?;
        let usecase = GetEmployeeUseCase {
            repo: ctx.state().employee_repo(),
        };
        let employee = usecase.execute(id).await?;
        ctx.put_request(FORM, &EmployeeFormView::from(&employee));
        Ok(Transition::forward(View::EMP_EDIT))
    })
}

pub fn update(ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move {
        ctx.check_token()?;

        let id = employee_id(ctx)?;
        let form = read_form(ctx);
        let usecase = UpdateEmployeeUseCase {
            repo: ctx.state().employee_repo(),
        };
        match usecase.execute(id, form.clone()).await {
            Ok(_) => {
                ctx.put_session(attr::FLUSH, &"Update completed.".to_owned());
                Ok(Transition::redirect(ACT_EMPLOYEE, Some(CMD_INDEX)))
            }
            Err(EmployeeServiceError::InvalidInput(errors)) => {
                rejected(ctx, Some(id), &form, &errors);
                Ok(Transition::forward(View::EMP_EDIT))
            }
            Err(e) => Err(e.into()),
        }
    })
}

pub fn destroy(ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move {
        ctx.check_token()?;

        let id = employee_id(ctx)?;
        let usecase = DeleteEmployeeUseCase {
            repo: ctx.state().employee_repo(),
        };
        usecase.execute(id).await?;
        ctx.put_session(attr::FLUSH, &"Deletion completed.".to_owned());
        Ok(Transition::redirect(ACT_EMPLOYEE, Some(CMD_INDEX)))
    })
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn employee_id(ctx: &ActionContext) -> Result<i32, ActionError> {
    to_number(ctx.param(name::EMP_ID)).ok_or(ActionError::BadParameter(name::EMP_ID))
}

fn read_form(ctx: &ActionContext) -> EmployeeForm {
    EmployeeForm {
        code: ctx.param_trimmed(name::EMP_CODE),
        name: ctx.param_trimmed(name::EMP_NAME),
        password: ctx.param(name::EMP_PASS).unwrap_or_default().to_owned(),
        admin_flag: to_number(ctx.param(name::EMP_ADMIN_FLG)),
    }
}

/// Re-populate the form with the submitted values and the validation messages.
fn rejected(ctx: &mut ActionContext, id: Option<i32>, form: &EmployeeForm, errors: &Vec<String>) {
    tracing::debug!(count = errors.len(), "employee form rejected");
    ctx.put_request(attr::ERRORS, errors);
    ctx.put_request(
        FORM,
        &EmployeeFormView {
            id,
            code: form.code.clone(),
            name: form.name.clone(),
            admin_flag: form.admin_flag,
        },
    );
}
