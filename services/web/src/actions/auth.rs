use crate::actions::{ACT_AUTH, ACT_TOP, CMD_INDEX, CMD_SHOW_LOGIN};
use crate::controller::context::ActionContext;
use crate::controller::dispatch::CommandFuture;
use crate::controller::params::name;
use crate::controller::scope::{Key, attr};
use crate::controller::view::{Transition, View};
use crate::domain::types::LoginEmployee;
use crate::error::EmployeeServiceError;
use crate::usecase::auth::AuthenticateUseCase;

const LOGIN_ERROR: Key<bool> = Key::new("login_error");
const CODE: Key<String> = Key::new("code");

pub fn show_login(ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move {
        if ctx.login_employee().is_some() {
            return Ok(Transition::redirect(ACT_TOP, Some(CMD_INDEX)));
        }
        Ok(Transition::forward(View::LOGIN))
    })
}

pub fn login(ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move {
        ctx.check_token()?;

        let code = ctx.param_trimmed(name::EMP_CODE);
        let password = ctx.param(name::EMP_PASS).unwrap_or_default().to_owned();
        let usecase = AuthenticateUseCase {
            repo: ctx.state().employee_repo(),
        };

        match usecase.execute(&code, &password).await {
            Ok(employee) => {
                ctx.renew_session();
                ctx.put_session(attr::LOGIN_EMPLOYEE, &LoginEmployee::from(&employee));
                ctx.put_session(attr::FLUSH, &"Logged in.".to_owned());
                tracing::info!(employee_id = employee.id, "employee logged in");
                Ok(Transition::redirect(ACT_TOP, Some(CMD_INDEX)))
            }
            Err(EmployeeServiceError::InvalidCredentials) => {
                tracing::info!(%code, "login failed");
                ctx.put_request(LOGIN_ERROR, &true);
                ctx.put_request(CODE, &code);
                Ok(Transition::forward(View::LOGIN))
            }
            Err(e) => Err(e.into()),
        }
    })
}

pub fn logout(ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move {
        ctx.check_token()?;

        if let Some(employee) = ctx.login_employee() {
            tracing::info!(employee_id = employee.id, "employee logged out");
        }
        ctx.remove_session(attr::LOGIN_EMPLOYEE);
        ctx.put_session(attr::FLUSH, &"Logged out.".to_owned());
        Ok(Transition::redirect(ACT_AUTH, Some(CMD_SHOW_LOGIN)))
    })
}
