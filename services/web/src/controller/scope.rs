//! Request, session and application scopes.
//!
//! Every attribute is addressed through a [`Key<T>`] declared once with the
//! type of the value it holds. Values are kept as JSON so the request scope
//! can become a template context and the session scope can be persisted.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::controller::csrf::generate_token;
use crate::domain::types::{LoginEmployee, SessionRecord};

/// Name of a scope attribute, tagged with the type stored under it.
pub struct Key<T> {
    name: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _type: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}

/// Attribute keys shared across actions.
pub mod attr {
    use super::Key;
    use crate::domain::types::LoginEmployee;

    // request scope
    pub const ERRORS: Key<Vec<String>> = Key::new("errors");
    /// One-shot message shown on the next rendered page. Lives in session
    /// scope until a forward moves it into the request scope.
    pub const FLUSH: Key<String> = Key::new("flush");

    // session scope
    pub const LOGIN_EMPLOYEE: Key<LoginEmployee> = Key::new("login_employee");

    // application scope
    pub const ROWS_PER_PAGE: Key<u64> = Key::new("max_row");
    pub const SITE_TITLE: Key<String> = Key::new("site_title");
}

fn encode<T: Serialize>(key: Key<T>, value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::error!(key = key.name(), error = %e, "scope value is not serializable");
            None
        }
    }
}

fn decode<T: DeserializeOwned>(key: Key<T>, value: Option<&Value>) -> Option<T> {
    let value = value?;
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key = key.name(), error = %e, "scope value has unexpected shape");
            None
        }
    }
}

// ── Request scope ────────────────────────────────────────────────────────────

/// Attributes handed from a command to the view it forwards to.
#[derive(Debug, Default)]
pub struct RequestScope {
    values: Map<String, Value>,
}

impl RequestScope {
    pub fn put<T: Serialize>(&mut self, key: Key<T>, value: &T) {
        if let Some(v) = encode(key, value) {
            self.values.insert(key.name().to_owned(), v);
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: Key<T>) -> Option<T> {
        decode(key, self.values.get(key.name()))
    }

    pub fn into_values(self) -> Map<String, Value> {
        self.values
    }
}

// ── Session scope ────────────────────────────────────────────────────────────

const CSRF_TOKEN_LEN: usize = 32;

/// One client's session: its id, anti-forgery token and attributes.
#[derive(Debug)]
pub struct SessionScope {
    id: String,
    record: SessionRecord,
    retired_id: Option<String>,
}

impl SessionScope {
    /// A brand-new session with a fresh id and token.
    pub fn fresh() -> Self {
        Self {
            id: new_session_id(),
            record: SessionRecord {
                csrf_token: generate_token(CSRF_TOKEN_LEN),
                attributes: Map::new(),
            },
            retired_id: None,
        }
    }

    /// Continue a session loaded from the store.
    pub fn resume(id: String, record: SessionRecord) -> Self {
        Self {
            id,
            record,
            retired_id: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn csrf_token(&self) -> &str {
        &self.record.csrf_token
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    /// Id this session was known by before [`SessionScope::renew`], which the
    /// store must forget.
    pub fn retired_id(&self) -> Option<&str> {
        self.retired_id.as_deref()
    }

    /// Move the session to a new id and token, keeping its attributes.
    /// Called on login so a pre-login session id cannot be replayed.
    pub fn renew(&mut self) {
        let old = std::mem::replace(&mut self.id, new_session_id());
        if self.retired_id.is_none() {
            self.retired_id = Some(old);
        }
        self.record.csrf_token = generate_token(CSRF_TOKEN_LEN);
    }

    pub fn put<T: Serialize>(&mut self, key: Key<T>, value: &T) {
        if let Some(v) = encode(key, value) {
            self.record.attributes.insert(key.name().to_owned(), v);
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: Key<T>) -> Option<T> {
        decode(key, self.record.attributes.get(key.name()))
    }

    pub fn remove<T>(&mut self, key: Key<T>) {
        self.record.attributes.remove(key.name());
    }

    /// Remove and return the attribute in one step.
    pub fn take<T: DeserializeOwned>(&mut self, key: Key<T>) -> Option<T> {
        let value = self.record.attributes.remove(key.name());
        decode(key, value.as_ref())
    }

    pub fn login_employee(&self) -> Option<LoginEmployee> {
        self.get(attr::LOGIN_EMPLOYEE)
    }
}

fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// ── Application scope ────────────────────────────────────────────────────────

/// Process-wide attributes fixed at startup. Read-only once built.
#[derive(Debug, Default)]
pub struct ApplicationScope {
    values: Map<String, Value>,
}

impl ApplicationScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used while bootstrapping.
    pub fn with<T: Serialize>(mut self, key: Key<T>, value: &T) -> Self {
        if let Some(v) = encode(key, value) {
            self.values.insert(key.name().to_owned(), v);
        }
        self
    }

    pub fn get<T: DeserializeOwned>(&self, key: Key<T>) -> Option<T> {
        decode(key, self.values.get(key.name()))
    }
}
