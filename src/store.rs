//! Task document store boundary.
//!
//! The store is an external collaborator: a document database holding task
//! records keyed by generated id, with server-assigned timestamps, partial
//! field merges, and owner-scoped queries sorted ascending by due date.
//! `MemoryStore` is the in-process implementation of that contract.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::task::{TaskPatch, TaskStatus};

/// Wire shape of one task document.
///
/// Timestamps are optional because they are server-assigned: a record can be
/// observed before the server has materialized them. Readers are expected to
/// default missing timestamps rather than fail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDocument {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A document paired with its store-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTask {
    pub id: String,
    pub document: TaskDocument,
}

/// Insert payload. The store assigns the id and both timestamps.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
    pub user_id: String,
}

/// Document-database collaborator contract.
///
/// All calls are asynchronous, non-cancellable network operations from the
/// caller's point of view. Writes are last-write-wins; there is no version
/// field and no transaction support.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new document and return its generated id. The store sets
    /// `created_at = updated_at = now` (server time).
    async fn insert(&self, document: NewDocument) -> Result<String>;

    /// Merge the supplied fields into an existing document, refreshing
    /// `updated_at`. Fails with `TaskNotFound` if the id does not exist.
    async fn merge(&self, id: &str, patch: TaskPatch) -> Result<()>;

    /// Permanently remove a document. Deleting an absent id succeeds.
    async fn delete(&self, id: &str) -> Result<()>;

    /// All documents owned by `owner_id`, optionally restricted to one
    /// status, ascending by due date.
    async fn query(&self, owner_id: &str, status: Option<TaskStatus>) -> Result<Vec<StoredTask>>;
}

/// In-process document store honouring the collaborator contract.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, TaskDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document under a fixed id, exactly as given.
    ///
    /// Lets tests plant records with absent timestamps or foreign owners,
    /// which the public contract never produces.
    pub async fn insert_document(&self, id: impl Into<String>, document: TaskDocument) {
        self.documents.write().await.insert(id.into(), document);
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert(&self, document: NewDocument) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let record = TaskDocument {
            title: document.title,
            description: document.description,
            due_date: document.due_date,
            status: document.status,
            user_id: document.user_id,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.documents.write().await.insert(id.clone(), record);
        Ok(id)
    }

    async fn merge(&self, id: &str, patch: TaskPatch) -> Result<()> {
        let mut documents = self.documents.write().await;
        let record = documents
            .get_mut(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(description) = patch.description {
            record.description = description;
        }
        if let Some(due_date) = patch.due_date {
            record.due_date = due_date;
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        record.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.documents.write().await.remove(id);
        Ok(())
    }

    async fn query(&self, owner_id: &str, status: Option<TaskStatus>) -> Result<Vec<StoredTask>> {
        let documents = self.documents.read().await;
        let mut matches: Vec<StoredTask> = documents
            .iter()
            .filter(|(_, doc)| doc.user_id == owner_id)
            .filter(|(_, doc)| status.map(|wanted| doc.status == wanted).unwrap_or(true))
            .map(|(id, doc)| StoredTask {
                id: id.clone(),
                document: doc.clone(),
            })
            .collect();
        matches.sort_by(|left, right| {
            left.document
                .due_date
                .cmp(&right.document.due_date)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(matches)
    }
}
