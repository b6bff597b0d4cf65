//! The single HTTP entry point and the machinery it drives.

pub mod context;
pub mod cookie;
pub mod csrf;
pub mod dispatch;
pub mod error;
pub mod params;
pub mod scope;
pub mod view;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::controller::context::ActionContext;
use crate::controller::params::Params;
use crate::controller::scope::{RequestScope, SessionScope, attr};
use crate::controller::view::{Transition, View, redirect_url, render};
use crate::domain::repository::SessionStore;
use crate::state::AppState;

/// `GET|POST /`: resolve `action`/`command`, run it, then forward or redirect.
pub async fn front_controller(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let Ok(body) = std::str::from_utf8(&body) else {
        return (StatusCode::BAD_REQUEST, "request body is not valid UTF-8").into_response();
    };
    let params = match Params::parse(query.as_deref(), Some(body)) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "malformed request parameters");
            return (StatusCode::BAD_REQUEST, "malformed request parameters").into_response();
        }
    };

    let session = match open_session(&state, &jar).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let mut ctx = ActionContext::init(state.clone(), params, session);
    let transition = state.dispatcher.dispatch(&mut ctx).await;
    let (mut request, mut session) = ctx.into_scopes();

    if matches!(transition, Transition::Forward { .. }) {
        if let Some(message) = session.take(attr::FLUSH) {
            request.put(attr::FLUSH, &message);
        }
    }

    if let Err(response) = persist_session(&state, &session).await {
        return response;
    }
    let jar = cookie::set_session_cookie(jar, session.id().to_owned());

    match transition {
        Transition::Forward { view, status } => match forward(&state, view, request, &session) {
            Ok(page) => (status, jar, page).into_response(),
            Err(response) => response,
        },
        Transition::Redirect { action, command } => {
            let location = redirect_url(&state.context_path, action, command);
            (StatusCode::FOUND, jar, [(header::LOCATION, location)]).into_response()
        }
    }
}

async fn open_session(state: &AppState, jar: &CookieJar) -> Result<SessionScope, Response> {
    let Some(id) = cookie::session_id(jar) else {
        return Ok(SessionScope::fresh());
    };
    match state.sessions.load(&id).await {
        Ok(Some(record)) => Ok(SessionScope::resume(id, record)),
        Ok(None) => Ok(SessionScope::fresh()),
        Err(e) => {
            tracing::error!(kind = e.kind(), error = ?e, "failed to load session");
            Err(internal_error())
        }
    }
}

async fn persist_session(state: &AppState, session: &SessionScope) -> Result<(), Response> {
    let result = async {
        if let Some(retired) = session.retired_id() {
            state.sessions.remove(retired).await?;
        }
        state.sessions.save(session.id(), session.record()).await
    }
    .await;
    result.map_err(|e| {
        tracing::error!(kind = e.kind(), error = ?e, "failed to save session");
        internal_error()
    })
}

/// Render `view` from the request scope plus the globals every layout needs.
fn forward(
    state: &AppState,
    view: View,
    request: RequestScope,
    session: &SessionScope,
) -> Result<Html<String>, Response> {
    let mut context = tera::Context::from_value(request.into_values().into()).map_err(|e| {
        tracing::error!(view = view.id(), error = %e, "failed to build template context");
        internal_error()
    })?;
    context.insert("context_path", &state.context_path);
    context.insert(
        "site_title",
        &state.application.get(attr::SITE_TITLE).unwrap_or_default(),
    );
    context.insert("login_employee", &session.login_employee());
    context.insert("token", session.csrf_token());

    render(&state.templates, view, &context).map(Html).map_err(|e| {
        tracing::error!(view = view.id(), error = ?e, "failed to render view");
        internal_error()
    })
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}
