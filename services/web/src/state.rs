use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tera::Tera;

use crate::controller::dispatch::Dispatcher;
use crate::controller::scope::ApplicationScope;
use crate::infra::db::DbEmployeeRepository;
use crate::infra::session::SessionBackend;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sessions: SessionBackend,
    pub templates: Arc<Tera>,
    pub dispatcher: Arc<Dispatcher>,
    pub application: Arc<ApplicationScope>,
    /// Prefix the application is mounted under, without a trailing slash.
    pub context_path: String,
}

impl AppState {
    pub fn employee_repo(&self) -> DbEmployeeRepository {
        DbEmployeeRepository {
            db: self.db.clone(),
        }
    }
}
