//! Command handlers, grouped by action, and the registry that exposes them.

pub mod auth;
pub mod employee;
pub mod top;

use crate::controller::dispatch::{Action, Dispatcher, Guard};

pub const ACT_TOP: &str = "Top";
pub const ACT_EMPLOYEE: &str = "Employee";
pub const ACT_AUTH: &str = "Auth";

pub const CMD_INDEX: &str = "index";
pub const CMD_NEW: &str = "entryNew";
pub const CMD_CREATE: &str = "create";
pub const CMD_SHOW: &str = "show";
pub const CMD_EDIT: &str = "edit";
pub const CMD_UPDATE: &str = "update";
pub const CMD_DESTROY: &str = "destroy";
pub const CMD_SHOW_LOGIN: &str = "showLogin";
pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";

/// Every action and command reachable through the front controller.
pub fn registry() -> Dispatcher {
    Dispatcher::new((ACT_AUTH, CMD_SHOW_LOGIN))
        .register(Action::new(ACT_TOP, Guard::LoggedIn).command(CMD_INDEX, top::index))
        .register(
            Action::new(ACT_EMPLOYEE, Guard::Admin)
                .command(CMD_INDEX, employee::index)
                .command(CMD_NEW, employee::entry_new)
                .command(CMD_CREATE, employee::create)
                .command(CMD_SHOW, employee::show)
                .command(CMD_EDIT, employee::edit)
                .command(CMD_UPDATE, employee::update)
                .command(CMD_DESTROY, employee::destroy),
        )
        .register(
            Action::new(ACT_AUTH, Guard::Public)
                .command(CMD_SHOW_LOGIN, auth::show_login)
                .command(CMD_LOGIN, auth::login)
                .command(CMD_LOGOUT, auth::logout),
        )
}
