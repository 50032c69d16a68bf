#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use taskdeck::error::{Error, Result};
use taskdeck::store::{MemoryStore, NewDocument, StoredTask, TaskStore};
use taskdeck::task::{NewTaskInput, TaskPatch, TaskStatus};

/// Store wrapper with switchable failure injection and call counting.
///
/// While healthy it forwards everything to an inner `MemoryStore`; when
/// failing, every call errors with `StoreUnavailable` before touching the
/// inner store. The call counter covers both modes.
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn gate(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for FlakyStore {
    async fn insert(&self, document: NewDocument) -> Result<String> {
        self.gate()?;
        self.inner.insert(document).await
    }

    async fn merge(&self, id: &str, patch: TaskPatch) -> Result<()> {
        self.gate()?;
        self.inner.merge(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.gate()?;
        self.inner.delete(id).await
    }

    async fn query(&self, owner_id: &str, status: Option<TaskStatus>) -> Result<Vec<StoredTask>> {
        self.gate()?;
        self.inner.query(owner_id, status).await
    }
}

pub fn due(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn input(title: &str, description: &str, due_date: DateTime<Utc>) -> NewTaskInput {
    NewTaskInput {
        title: title.to_string(),
        description: description.to_string(),
        due_date,
    }
}
