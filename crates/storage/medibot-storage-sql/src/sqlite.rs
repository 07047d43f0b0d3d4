//! SQLite store
//!
//! One pool serves both repositories. Every operation acquires its own
//! pooled connection and releases it when done; `append_exchange` is the
//! only multi-statement write and runs in a transaction.

use async_trait::async_trait;
use medibot_core::{
    HistoryMessage, HistoryStore, MediBotConfig, MediBotError, Profile, ProfileStore, Result,
    Role, Turn,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

const INSERT_TURN: &str = r#"
    INSERT INTO history (user, role, content, timestamp)
    VALUES (?, ?, ?, MAX(?, COALESCE((SELECT MAX(timestamp) FROM history), 0)))
    RETURNING id, timestamp
"#;

/// SQLite-backed [`ProfileStore`] and [`HistoryStore`]
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database named by `config` and apply the schema
    pub async fn connect(config: &MediBotConfig) -> Result<Self> {
        config.validate()?;
        info!("Opening SQLite database at: {}", config.database_url);

        let opts = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| MediBotError::database(format!("Invalid SQLite URL: {}", e)))?
            .create_if_missing(true);

        // Each connection to an in-memory URL is its own database, so keep
        // exactly one alive for the lifetime of the pool.
        let pool_opts = if is_in_memory(&config.database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_opts.connect_with(opts).await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Open a database by URL with otherwise default configuration
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(&MediBotConfig::default().with_database_url(database_url)).await
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn init_schema(&self) -> Result<()> {
        debug!("Initializing SQLite schema...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                name TEXT PRIMARY KEY,
                profile TEXT NOT NULL DEFAULT 'general'
                    CHECK (profile IN ('child', 'elder', 'general'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user TEXT NOT NULL CHECK (length(user) > 0),
                role TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
                content TEXT NOT NULL,
                timestamp INTEGER NOT NULL
                    DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_history_user_id ON history (user, id)")
            .execute(&self.pool)
            .await?;

        debug!("SQLite schema ready");
        Ok(())
    }

    async fn insert_turn(
        conn: &mut SqliteConnection,
        name: &str,
        role: Role,
        content: &str,
    ) -> Result<Turn> {
        let row = sqlx::query(INSERT_TURN)
            .bind(name)
            .bind(role.as_str())
            .bind(content)
            .bind(chrono::Utc::now().timestamp_millis())
            .fetch_one(&mut *conn)
            .await?;

        Ok(Turn {
            id: row.get("id"),
            user: name.to_string(),
            role,
            content: content.to_string(),
            timestamp: row.get("timestamp"),
        })
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn require_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MediBotError::validation("turn user must not be empty"));
    }
    Ok(())
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn upsert_profile(&self, name: &str, profile: Profile) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO profiles (name, profile) VALUES (?, ?)")
            .bind(name)
            .bind(profile.as_str())
            .execute(&self.pool)
            .await?;
        debug!(user = %name, profile = %profile, "Profile stored");
        Ok(())
    }

    async fn get_profile(&self, name: &str) -> Result<Profile> {
        let row = sqlx::query("SELECT profile FROM profiles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.get::<String, _>("profile").parse(),
            None => Ok(Profile::default()),
        }
    }

    async fn name_exists(&self, name: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM profiles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl HistoryStore for SqliteStore {
    async fn append_turn(&self, name: &str, role: Role, content: &str) -> Result<Turn> {
        require_name(name)?;
        let mut conn = self.pool.acquire().await?;
        let turn = Self::insert_turn(&mut conn, name, role, content).await?;
        debug!(user = %name, role = %role, id = turn.id, "Turn stored");
        Ok(turn)
    }

    async fn append_exchange(
        &self,
        name: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<()> {
        require_name(name)?;
        let mut tx = self.pool.begin().await?;
        Self::insert_turn(&mut tx, name, Role::User, user_text).await?;
        Self::insert_turn(&mut tx, name, Role::Assistant, assistant_text).await?;
        tx.commit().await?;
        debug!(user = %name, "Exchange stored");
        Ok(())
    }

    async fn get_recent_turns(&self, name: &str, limit: usize) -> Result<Vec<HistoryMessage>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            "SELECT role, content FROM history WHERE user = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(name)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        // Newest first from the query; hand back oldest first
        let mut messages = Vec::with_capacity(rows.len());
        for row in rows.into_iter().rev() {
            let role: String = row.get("role");
            messages.push(HistoryMessage {
                role: role.parse()?,
                content: row.get("content"),
            });
        }
        Ok(messages)
    }

    async fn count_turns(&self, name: &str) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history WHERE user = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        usize::try_from(count).map_err(|e| MediBotError::database(format!("Bad row count: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:test?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:medibot.db"));
    }

    #[test]
    fn test_require_name() {
        assert!(require_name("Ana").is_ok());
        assert!(matches!(
            require_name(""),
            Err(MediBotError::Validation(_))
        ));
    }
}
