//! Command dispatch through an explicit allow-list.
//!
//! Each action registers the commands it answers to. A request naming an
//! action or command outside the registry is rejected before any handler code
//! runs.

use std::collections::BTreeMap;

use futures::future::BoxFuture;

use crate::controller::context::ActionContext;
use crate::controller::error::ActionError;
use crate::controller::params::name;
use crate::controller::view::Transition;
use crate::domain::types::LoginEmployee;

/// Action used when the request carries no `action` parameter.
pub const DEFAULT_ACTION: &str = "Top";
/// Command used when the request carries no `command` parameter.
pub const DEFAULT_COMMAND: &str = "index";

pub type CommandFuture<'a> = BoxFuture<'a, Result<Transition, ActionError>>;

/// A registered command handler.
pub type Command = for<'a> fn(&'a mut ActionContext) -> CommandFuture<'a>;

/// Who may run an action's commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Public,
    LoggedIn,
    Admin,
}

/// Where the guard sends a request that does not pass it.
#[derive(Debug, PartialEq, Eq)]
enum Admission {
    Admit,
    Login,
    Deny,
}

impl Guard {
    fn admit(self, employee: Option<&LoginEmployee>) -> Admission {
        match (self, employee) {
            (Guard::Public, _) => Admission::Admit,
            (_, None) => Admission::Login,
            (Guard::LoggedIn, Some(_)) => Admission::Admit,
            (Guard::Admin, Some(e)) if e.is_admin() => Admission::Admit,
            (Guard::Admin, Some(_)) => Admission::Deny,
        }
    }
}

/// A named group of commands for one resource.
pub struct Action {
    name: &'static str,
    guard: Guard,
    commands: BTreeMap<&'static str, Command>,
}

impl Action {
    pub fn new(name: &'static str, guard: Guard) -> Self {
        Self {
            name,
            guard,
            commands: BTreeMap::new(),
        }
    }

    pub fn command(mut self, name: &'static str, handler: Command) -> Self {
        self.commands.insert(name, handler);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn guard(&self) -> Guard {
        self.guard
    }

    /// Names of every command this action answers to.
    pub fn command_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }
}

/// Routes `action`/`command` parameters to registered handlers.
pub struct Dispatcher {
    actions: BTreeMap<&'static str, Action>,
    login: (&'static str, &'static str),
}

impl Dispatcher {
    /// `login` is the action/command pair that guarded actions redirect
    /// anonymous visitors to.
    pub fn new(login: (&'static str, &'static str)) -> Self {
        Self {
            actions: BTreeMap::new(),
            login,
        }
    }

    pub fn register(mut self, action: Action) -> Self {
        self.actions.insert(action.name, action);
        self
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Look up the handler for `action`/`command`.
    pub fn resolve(&self, action: &str, command: &str) -> Result<(&Action, Command), ActionError> {
        let entry = self
            .actions
            .get(action)
            .ok_or_else(|| ActionError::UnknownAction(action.to_owned()))?;
        let handler = entry
            .commands
            .get(command)
            .copied()
            .ok_or_else(|| ActionError::UnknownCommand {
                action: action.to_owned(),
                command: command.to_owned(),
            })?;
        Ok((entry, handler))
    }

    /// Run the command the request names. Never fails: errors are logged and
    /// turned into the generic error view.
    pub async fn dispatch(&self, ctx: &mut ActionContext) -> Transition {
        let action = ctx
            .param(name::ACTION)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ACTION)
            .to_owned();
        let command = ctx
            .param(name::COMMAND)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_COMMAND)
            .to_owned();

        match self.run(&action, &command, ctx).await {
            Ok(transition) => transition,
            Err(error) => {
                let status = error.status();
                if status.is_server_error() {
                    tracing::error!(
                        %action, %command, kind = error.kind(), error = ?error,
                        "command failed"
                    );
                } else {
                    tracing::warn!(
                        %action, %command, kind = error.kind(), error = %error,
                        "command rejected"
                    );
                }
                Transition::unknown_error(status)
            }
        }
    }

    async fn run(
        &self,
        action: &str,
        command: &str,
        ctx: &mut ActionContext,
    ) -> Result<Transition, ActionError> {
        let (entry, handler) = self.resolve(action, command)?;
        let employee = match entry.guard {
            Guard::Public => ctx.login_employee(),
            Guard::LoggedIn | Guard::Admin => ctx.refresh_login().await?,
        };
        match entry.guard.admit(employee.as_ref()) {
            Admission::Admit => handler(ctx).await,
            Admission::Login => {
                tracing::debug!(action, command, "login required");
                Ok(Transition::redirect(self.login.0, Some(self.login.1)))
            }
            Admission::Deny => Err(ActionError::Forbidden),
        }
    }
}
