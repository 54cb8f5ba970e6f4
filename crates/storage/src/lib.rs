use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use sqlx::{Row, SqlitePool};
use yojana_core::{TurnRecord, UserProfile};

/// Key-value profile store: one record per user id, read at the start of a
/// turn and written back after each elicitation round. The caller assumes a
/// single in-flight writer per user id.
pub trait ProfileRepository: Send + Sync {
    async fn load_profile(&self, user_id: &str) -> Result<UserProfile>;
    async fn store_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()>;
}

/// Append-only conversation history. No read contract is required by the
/// decision pipeline.
pub trait ConversationLog: Send + Sync {
    async fn append_turn(&self, record: TurnRecord) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
    turns: Arc<RwLock<Vec<TurnRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> Vec<TurnRecord> {
        self.turns.read().clone()
    }
}

impl ProfileRepository for MemoryStore {
    async fn load_profile(&self, user_id: &str) -> Result<UserProfile> {
        Ok(self
            .profiles
            .read()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn store_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        self.profiles
            .write()
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }
}

impl ConversationLog for MemoryStore {
    async fn append_turn(&self, record: TurnRecord) -> Result<()> {
        self.turns.write().push(record);
        Ok(())
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("failed connecting to sqlite at {}", database_url))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
              user_id TEXT PRIMARY KEY,
              profile_json TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversation_turns (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              recorded_at TEXT NOT NULL,
              record_json TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl ProfileRepository for SqliteStore {
    async fn load_profile(&self, user_id: &str) -> Result<UserProfile> {
        let row = sqlx::query(
            r#"
            SELECT profile_json
            FROM profiles
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(UserProfile::default());
        };

        let profile_json: String = row.get("profile_json");
        Ok(serde_json::from_str(&profile_json).unwrap_or_default())
    }

    async fn store_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        let profile_json = serde_json::to_string(profile)?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, profile_json)
            VALUES (?1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET
              profile_json=excluded.profile_json
            "#,
        )
        .bind(user_id)
        .bind(profile_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl ConversationLog for SqliteStore {
    async fn append_turn(&self, record: TurnRecord) -> Result<()> {
        let record_json = serde_json::to_string(&record)?;

        sqlx::query(
            r#"
            INSERT INTO conversation_turns (recorded_at, record_json)
            VALUES (?1, ?2)
            "#,
        )
        .bind(record.recorded_at().to_rfc3339())
        .bind(record_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub async fn sqlite(database_url: &str) -> Result<Self> {
        let sqlite = SqliteStore::connect(database_url).await?;
        Ok(Self::Sqlite(sqlite))
    }
}

impl ProfileRepository for Store {
    async fn load_profile(&self, user_id: &str) -> Result<UserProfile> {
        match self {
            Store::Memory(store) => store.load_profile(user_id).await,
            Store::Sqlite(store) => store.load_profile(user_id).await,
        }
    }

    async fn store_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        match self {
            Store::Memory(store) => store.store_profile(user_id, profile).await,
            Store::Sqlite(store) => store.store_profile(user_id, profile).await,
        }
    }
}

impl ConversationLog for Store {
    async fn append_turn(&self, record: TurnRecord) -> Result<()> {
        match self {
            Store::Memory(store) => store.append_turn(record).await,
            Store::Sqlite(store) => store.append_turn(record).await,
        }
    }
}
