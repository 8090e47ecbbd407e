//! Document store: the single application document and its snapshot.
//!
//! The store owns the in-memory [`AppDocument`] and routes every change
//! through [`reducer::reduce`]. After each change the whole document is
//! serialized and written under one key of the key/value table before the
//! new document becomes visible to readers.

pub mod reducer;

pub use reducer::{reduce, Action};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{AppDocument, PartialDocument};

/// A document together with the revision it was committed at.
#[derive(Debug, Clone)]
pub struct Committed {
    pub document: AppDocument,
    pub revision_id: i64,
}

/// Owner of the application document.
pub struct DocumentStore {
    repo: Repository,
    key: String,
    current: Mutex<Committed>,
}

impl DocumentStore {
    /// Open the store, hydrating from the snapshot under `key` when one exists.
    ///
    /// A missing or unreadable snapshot leaves the document at its defaults.
    pub async fn open(repo: Repository, key: impl Into<String>) -> Result<Self, AppError> {
        let key = key.into();
        let revision_id = repo.get_revision_id().await?;

        let document = match repo.get_value(&key).await {
            Ok(Some(raw)) => hydrate(&raw),
            Ok(None) => {
                tracing::info!("No snapshot stored under {:?}, starting empty", key);
                AppDocument::default()
            }
            Err(e) => {
                tracing::error!("Error reading snapshot {:?}: {}", key, e);
                AppDocument::default()
            }
        };

        Ok(Self {
            repo,
            key,
            current: Mutex::new(Committed {
                document,
                revision_id,
            }),
        })
    }

    /// The latest committed document and revision.
    pub async fn current(&self) -> Committed {
        self.current.lock().await.clone()
    }

    /// The latest committed document.
    pub async fn snapshot(&self) -> AppDocument {
        self.current.lock().await.document.clone()
    }

    /// The latest committed revision.
    pub async fn revision(&self) -> i64 {
        self.current.lock().await.revision_id
    }

    /// Apply one action and persist the result.
    pub async fn dispatch(&self, action: Action) -> Result<Committed, AppError> {
        self.dispatch_all(vec![action]).await
    }

    /// Apply several actions in order and persist the result once.
    ///
    /// When the actions leave the document unchanged nothing is written and
    /// the revision stays the same. When the write fails the in-memory
    /// document is not replaced.
    pub async fn dispatch_all(&self, actions: Vec<Action>) -> Result<Committed, AppError> {
        let mut current = self.current.lock().await;

        let names: Vec<&'static str> = actions.iter().map(Action::name).collect();
        let next = actions
            .into_iter()
            .fold(current.document.clone(), reducer::reduce);

        if next == current.document {
            tracing::debug!("{:?} left the document unchanged", names);
            return Ok(current.clone());
        }

        let raw = serde_json::to_string(&next).map_err(|e| {
            tracing::error!("Failed to serialize document: {}", e);
            AppError::Internal(format!("Failed to serialize document: {}", e))
        })?;
        let revision_id = self.repo.put_value(&self.key, &raw).await?;

        tracing::debug!("{:?} committed at revision {}", names, revision_id);

        *current = Committed {
            document: next,
            revision_id,
        };
        Ok(current.clone())
    }
}

/// Parse a stored snapshot and merge it over the default document.
///
/// Each top-level key is read on its own: a key whose value does not parse
/// is logged and skipped, the others still load. A snapshot that is not a
/// JSON object is logged and ignored.
pub fn hydrate(raw: &str) -> AppDocument {
    let fields = match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(fields) => fields,
        Err(e) => {
            tracing::error!("Error loading state: {}", e);
            return AppDocument::default();
        }
    };

    let partial = PartialDocument {
        screen: stored_field(&fields, "currentStep"),
        user: stored_field(&fields, "user"),
        glucose_readings: stored_field(&fields, "glucoseReadings"),
        daily_tasks: stored_field(&fields, "dailyTasks"),
        reminders: stored_field(&fields, "reminders"),
        daily_summaries: stored_field(&fields, "dailySummaries"),
    };

    reduce(AppDocument::default(), Action::LoadState(partial))
}

/// The value under `key`, or `None` when it is missing or malformed.
fn stored_field<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.get(key)?;
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::error!("Ignoring stored {:?}: {}", key, e);
            None
        }
    }
}
