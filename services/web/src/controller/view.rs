//! Forward and redirect transitions.

use axum::http::StatusCode;
use tera::{Context, Tera};

/// Identifier of a view, e.g. `employees/index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View(&'static str);

impl View {
    pub const ERR_UNKNOWN: View = View("error/unknown");
    pub const TOP_INDEX: View = View("topPage/index");
    pub const LOGIN: View = View("login/login");
    pub const EMP_INDEX: View = View("employees/index");
    pub const EMP_NEW: View = View("employees/new");
    pub const EMP_SHOW: View = View("employees/show");
    pub const EMP_EDIT: View = View("employees/edit");

    pub const fn id(&self) -> &'static str {
        self.0
    }

    /// Template name the view renders from, relative to the templates directory.
    pub fn template(&self) -> String {
        format!("views/{}.html", self.0)
    }
}

/// What a command asks the front controller to do once it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Render `view` within the current request.
    Forward { view: View, status: StatusCode },
    /// Send the browser to `?action=..[&command=..]`; a new request follows.
    Redirect {
        action: &'static str,
        command: Option<&'static str>,
    },
}

impl Transition {
    pub fn forward(view: View) -> Self {
        Self::Forward {
            view,
            status: StatusCode::OK,
        }
    }

    pub fn redirect(action: &'static str, command: Option<&'static str>) -> Self {
        Self::Redirect { action, command }
    }

    /// The generic error page, answered with `status`.
    pub fn unknown_error(status: StatusCode) -> Self {
        Self::Forward {
            view: View::ERR_UNKNOWN,
            status,
        }
    }
}

/// `<context_path>/?action=<action>[&command=<command>]`
pub fn redirect_url(context_path: &str, action: &str, command: Option<&str>) -> String {
    let mut url = format!("{}/?action={}", context_path.trim_end_matches('/'), action);
    if let Some(command) = command {
        url.push_str("&command=");
        url.push_str(command);
    }
    url
}

pub fn render(templates: &Tera, view: View, context: &Context) -> Result<String, tera::Error> {
    templates.render(&view.template(), context)
}
