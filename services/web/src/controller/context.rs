use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::controller::csrf::tokens_match;
use crate::controller::error::ActionError;
use crate::controller::params::{self, Params, name};
use crate::controller::scope::{Key, RequestScope, SessionScope, attr};
use crate::domain::repository::EmployeeRepository;
use crate::domain::types::{Employee, LoginEmployee};
use crate::state::AppState;

/// Everything a command may touch while handling one request.
///
/// Built once per request by the front controller, before dispatch.
pub struct ActionContext {
    state: AppState,
    params: Params,
    request: RequestScope,
    session: SessionScope,
}

impl ActionContext {
    pub fn init(state: AppState, params: Params, session: SessionScope) -> Self {
        Self {
            state,
            params,
            request: RequestScope::default(),
            session,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Raw request parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Request parameter trimmed of surrounding whitespace, empty when absent.
    pub fn param_trimmed(&self, name: &str) -> String {
        self.param(name).map(str::trim).unwrap_or_default().to_owned()
    }

    pub fn put_request<T: Serialize>(&mut self, key: Key<T>, value: &T) {
        self.request.put(key, value);
    }

    pub fn put_session<T: Serialize>(&mut self, key: Key<T>, value: &T) {
        self.session.put(key, value);
    }

    pub fn remove_session<T>(&mut self, key: Key<T>) {
        self.session.remove(key);
    }

    pub fn get_application<T: DeserializeOwned>(&self, key: Key<T>) -> Option<T> {
        self.state.application.get(key)
    }

    /// The session's anti-forgery token, embedded in forms as `token`.
    pub fn token(&self) -> &str {
        self.session.csrf_token()
    }

    /// Verify the submitted `token` parameter against the session token.
    pub fn check_token(&self) -> Result<(), ActionError> {
        if tokens_match(self.param(name::TOKEN), self.token()) {
            Ok(())
        } else {
            Err(ActionError::InvalidToken)
        }
    }

    /// Page requested through the `page` parameter (1 by default).
    pub fn page(&self) -> u64 {
        params::page_number(self.param(name::PAGE))
    }

    pub fn login_employee(&self) -> Option<LoginEmployee> {
        self.session.login_employee()
    }

    /// Check the session's login against the employee's current row.
    ///
    /// A deleted or missing employee is logged out. A changed name, code or
    /// role replaces the session snapshot.
    pub async fn refresh_login(&mut self) -> Result<Option<LoginEmployee>, ActionError> {
        let Some(snapshot) = self.login_employee() else {
            return Ok(None);
        };
        let current = self
            .state
            .employee_repo()
            .find_by_id(snapshot.id)
            .await?
            .filter(Employee::is_active);

        match current {
            Some(employee) => {
                let fresh = LoginEmployee::from(&employee);
                if fresh != snapshot {
                    tracing::info!(employee_id = fresh.id, "login refreshed from stored employee");
                    self.session.put(attr::LOGIN_EMPLOYEE, &fresh);
                }
                Ok(Some(fresh))
            }
            None => {
                tracing::info!(employee_id = snapshot.id, "login dropped for inactive employee");
                self.session.remove(attr::LOGIN_EMPLOYEE);
                Ok(None)
            }
        }
    }

    /// Give the session a new id and token (see [`SessionScope::renew`]).
    pub fn renew_session(&mut self) {
        self.session.renew();
    }

    pub fn into_scopes(self) -> (RequestScope, SessionScope) {
        (self.request, self.session)
    }
}
