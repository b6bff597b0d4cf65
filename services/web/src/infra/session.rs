use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::repository::SessionStore;
use crate::domain::types::SessionRecord;
use crate::error::EmployeeServiceError;

// ── In-process store ─────────────────────────────────────────────────────────

/// Sessions held in process memory. Used when no Redis URL is configured and in tests.
#[derive(Clone)]
pub struct MemorySessionStore {
    entries: Arc<RwLock<HashMap<String, (Instant, SessionRecord)>>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn poisoned() -> EmployeeServiceError {
        anyhow::anyhow!("session store lock poisoned").into()
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionRecord>, EmployeeServiceError> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries
            .get(id)
            .filter(|(expires_at, _)| *expires_at > Instant::now())
            .map(|(_, record)| record.clone()))
    }

    async fn save(&self, id: &str, record: &SessionRecord) -> Result<(), EmployeeServiceError> {
        let now = Instant::now();
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.retain(|_, (expires_at, _)| *expires_at > now);
        entries.insert(id.to_owned(), (now + self.ttl, record.clone()));
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), EmployeeServiceError> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.remove(id);
        Ok(())
    }
}

// ── Redis store ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisSessionStore {
    pub pool: Pool,
    pub ttl_secs: u64,
}

fn session_key(id: &str) -> String {
    format!("nippo_session:{}", id)
}

impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionRecord>, EmployeeServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| EmployeeServiceError::Internal(e.into()))?;
        let value: Option<Vec<u8>> = conn
            .get(session_key(id))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| {
                EmployeeServiceError::Internal(e.into())
            })?;
        value
            .map(|bytes| serde_json::from_slice(&bytes).context("decode session record"))
            .transpose()
            .map_err(EmployeeServiceError::Internal)
    }

    async fn save(&self, id: &str, record: &SessionRecord) -> Result<(), EmployeeServiceError> {
        let payload = serde_json::to_vec(record).context("encode session record")?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| EmployeeServiceError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(session_key(id), payload, self.ttl_secs)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| {
                EmployeeServiceError::Internal(e.into())
            })?;
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), EmployeeServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| EmployeeServiceError::Internal(e.into()))?;
        let (): () = conn
            .del(session_key(id))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| {
                EmployeeServiceError::Internal(e.into())
            })?;
        Ok(())
    }
}

// ── Backend selection ────────────────────────────────────────────────────────

/// The session store chosen at startup.
#[derive(Clone)]
pub enum SessionBackend {
    Memory(MemorySessionStore),
    Redis(RedisSessionStore),
}

impl SessionStore for SessionBackend {
    async fn load(&self, id: &str) -> Result<Option<SessionRecord>, EmployeeServiceError> {
        match self {
            Self::Memory(store) => store.load(id).await,
            Self::Redis(store) => store.load(id).await,
        }
    }

    async fn save(&self, id: &str, record: &SessionRecord) -> Result<(), EmployeeServiceError> {
        match self {
            Self::Memory(store) => store.save(id, record).await,
            Self::Redis(store) => store.save(id, record).await,
        }
    }

    async fn remove(&self, id: &str) -> Result<(), EmployeeServiceError> {
        match self {
            Self::Memory(store) => store.remove(id).await,
            Self::Redis(store) => store.remove(id).await,
        }
    }
}
