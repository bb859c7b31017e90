//! # Local Key/Value Storage
//!
//! Persistent string storage with the same contract as browser storage:
//! values are strings addressed by key, a missing key reads as `None`, and
//! every read goes to the backing store rather than a cached copy.
//!
//! ## Implementations
//!
//! - `SqliteStorage`: a `kv_store` table in a local SQLite database opened
//!   through `sqlx`. Several instances pointed at the same file see each
//!   other's writes, the way two tabs share `localStorage`; concurrent
//!   writers serialize on the database lock and the last write wins.
//! - `MemoryStorage`: process-local map, used by tests and as a fallback
//!   when the database cannot be opened.
//!
//! The `Storage` trait is synchronous because egui calls it from the UI
//! thread. `SqliteStorage` owns a worker thread with its own tokio runtime
//! and pool; each call sends a command and blocks on the reply.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bizdesk::desk_app::storage::{keys, SqliteStorage, Storage};
//!
//! let storage = SqliteStorage::open("/tmp/bizdesk/local.db").unwrap();
//! storage.set_item(keys::TOKEN, "abc").unwrap();
//! assert_eq!(storage.get_item(keys::TOKEN).as_deref(), Some("abc"));
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

/// Well-known storage keys, named as the web storefront names them
pub mod keys {
    /// JSON array of cart lines
    pub const CART: &str = "carrinho";
    /// Bearer token
    pub const TOKEN: &str = "token";
    /// JSON user profile cached at sign-in
    pub const USER: &str = "user";
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage worker stopped")]
    Closed,
    #[error("storage lock poisoned")]
    Poisoned,
    #[error("failed to encode value for key '{key}': {message}")]
    Encode { key: String, message: String },
}

/// String key/value storage
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage handle shared across stores
pub type SharedStorage = Arc<dyn Storage>;

/// Read and decode a JSON value. Absent keys and undecodable values both
/// read as `None`.
pub fn read_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = storage.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable stored value");
            None
        }
    }
}

/// Encode and write a JSON value
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    storage.set_item(key, &raw)
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

type Reply<T> = Sender<Result<T, sqlx::Error>>;

/// Requests handled by the storage worker
enum Command {
    Get { key: String, reply: Reply<Option<String>> },
    Set { key: String, value: String, reply: Reply<()> },
    Remove { key: String, reply: Reply<()> },
}

/// SQLite-backed storage
#[derive(Debug)]
pub struct SqliteStorage {
    path: PathBuf,
    commands: Sender<Command>,
}

impl SqliteStorage {
    /// Open (or create) the database at `path` and start its worker.
    ///
    /// Returns once the schema is in place, so a bad path fails here rather
    /// than on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let io_err = |source| StorageError::Io {
            key: path.display().to_string(),
            source,
        };

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let (commands, inbox) = channel::<Command>();
        let (ready_tx, ready_rx) = channel::<Result<(), StorageError>>();
        let db_path = path.clone();
        std::thread::Builder::new()
            .name("bizdesk-storage".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                    Ok(rt) => rt,
                    Err(source) => {
                        let _ = ready_tx.send(Err(StorageError::Io {
                            key: db_path.display().to_string(),
                            source,
                        }));
                        return;
                    }
                };
                let pool = match rt.block_on(connect(&db_path)) {
                    Ok(pool) => pool,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.into()));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                // Runs until every handle is dropped
                while let Ok(command) = inbox.recv() {
                    rt.block_on(handle(&pool, command));
                }
                rt.block_on(pool.close());
            })
            .map_err(io_err)?;

        ready_rx.recv().map_err(|_| StorageError::Closed)??;
        tracing::debug!(path = %path.display(), "storage opened");
        Ok(Self { path, commands })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn call<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, StorageError> {
        let (reply, answer) = channel();
        self.commands
            .send(make(reply))
            .map_err(|_| StorageError::Closed)?;
        Ok(answer.recv().map_err(|_| StorageError::Closed)??)
    }
}

async fn connect(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));
    // commands arrive one at a time
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    sqlx::query(SCHEMA).execute(&pool).await?;
    Ok(pool)
}

async fn handle(pool: &SqlitePool, command: Command) {
    match command {
        Command::Get { key, reply } => {
            let row: Result<Option<(String,)>, _> =
                sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
                    .bind(key)
                    .fetch_optional(pool)
                    .await;
            let _ = reply.send(row.map(|row| row.map(|(value,)| value)));
        }
        Command::Set { key, value, reply } => {
            let result = sqlx::query(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .bind(key)
            .bind(value)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(pool)
            .await;
            let _ = reply.send(result.map(|_| ()));
        }
        Command::Remove { key, reply } => {
            let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
                .bind(key)
                .execute(pool)
                .await;
            let _ = reply.send(result.map(|_| ()));
        }
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.call(|reply| Command::Get {
            key: key.to_string(),
            reply,
        }) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.call(|reply| Command::Set {
            key: key.to_string(),
            value: value.to_string(),
            reply,
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.call(|reply| Command::Remove {
            key: key.to_string(),
            reply,
        })
    }
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}
