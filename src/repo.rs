//! Task repository.
//!
//! Translates domain operations into store calls and normalizes returned
//! records into the stable [`Task`] shape. This is the only layer that
//! talks to the store; pages never touch documents directly.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::{NewDocument, StoredTask, TaskStore};
use crate::task::{iso_string, NewTaskInput, Task, TaskPatch, TaskStatus};

/// Repository over one task store.
///
/// Operations other than `list_tasks_for_owner` take a bare task id and do
/// not re-check ownership: callers must only pass ids obtained through an
/// owner-scoped query. Enforcing that at the store is the store's access
/// rules' job, not this layer's.
#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn TaskStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Create a task for `owner_id`. New tasks always start `Open`; the
    /// store assigns the id and both timestamps. Returns the new id.
    pub async fn create_task(&self, owner_id: &str, input: NewTaskInput) -> Result<String> {
        let id = self
            .store
            .insert(NewDocument {
                title: input.title,
                description: input.description,
                due_date: input.due_date,
                status: TaskStatus::Open,
                user_id: owner_id.to_string(),
            })
            .await?;
        debug!(task_id = %id, owner_id, "task created");
        Ok(id)
    }

    /// Apply a partial update. Only supplied fields change; `updated_at`
    /// is refreshed by the store on every merge.
    pub async fn update_task(&self, task_id: &str, patch: TaskPatch) -> Result<()> {
        self.store.merge(task_id, patch).await?;
        debug!(task_id, "task updated");
        Ok(())
    }

    /// Flip a task between `Open` and `Complete`.
    ///
    /// The new status is computed from the caller's view of the current
    /// status, not read back from the store, so two sessions toggling the
    /// same task concurrently race last-write-wins. Accepted limitation.
    pub async fn toggle_task_status(&self, task_id: &str, current: TaskStatus) -> Result<()> {
        let next = current.toggled();
        self.store
            .merge(
                task_id,
                TaskPatch {
                    status: Some(next),
                    ..TaskPatch::default()
                },
            )
            .await?;
        debug!(task_id, status = %next, "task status toggled");
        Ok(())
    }

    /// Permanently remove a task. No confirmation, no undo, no soft-delete.
    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        self.store.delete(task_id).await?;
        debug!(task_id, "task deleted");
        Ok(())
    }

    /// All tasks owned by `owner_id`, optionally restricted to one status,
    /// ascending by due date. Ascending due-date order is part of this
    /// contract, not a display choice.
    pub async fn list_tasks_for_owner(
        &self,
        owner_id: &str,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>> {
        let records = self.store.query(owner_id, status).await?;
        debug!(owner_id, count = records.len(), "tasks listed");
        Ok(records.into_iter().map(materialize).collect())
    }
}

/// Normalize a stored record into the domain shape: timestamps become
/// ISO-8601 strings, and a record missing one gets "now" instead of
/// failing the whole query.
fn materialize(record: StoredTask) -> Task {
    let StoredTask { id, document } = record;
    if document.created_at.is_none() || document.updated_at.is_none() {
        warn!(task_id = %id, "record missing server timestamp; defaulting to now");
    }
    let created_at = document.created_at.unwrap_or_else(Utc::now);
    let updated_at = document.updated_at.unwrap_or_else(Utc::now);
    Task {
        id,
        title: document.title,
        description: document.description,
        due_date: document.due_date,
        status: document.status,
        user_id: document.user_id,
        created_at: iso_string(created_at),
        updated_at: iso_string(updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, TaskDocument};
    use chrono::{DateTime, TimeZone};

    fn repo_with_store() -> (TaskRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (TaskRepository::new(store.clone()), store)
    }

    fn input(title: &str, due: DateTime<Utc>) -> NewTaskInput {
        NewTaskInput {
            title: title.to_string(),
            description: String::new(),
            due_date: due,
        }
    }

    fn due(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn created_tasks_start_open() {
        let (repo, _) = repo_with_store();
        repo.create_task("u1", input("Pay rent", due(2025, 1, 1)))
            .await
            .unwrap();
        let tasks = repo.list_tasks_for_owner("u1", None).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::Open);
        assert_eq!(tasks[0].user_id, "u1");
    }

    #[tokio::test]
    async fn list_materializes_timestamps_as_iso_strings() {
        let (repo, _) = repo_with_store();
        repo.create_task("u1", input("Pay rent", due(2025, 1, 1)))
            .await
            .unwrap();
        let task = repo
            .list_tasks_for_owner("u1", None)
            .await
            .unwrap()
            .remove(0);
        // Millisecond precision with a Z suffix, round-trippable.
        assert!(task.created_at.ends_with('Z'));
        let parsed = DateTime::parse_from_rfc3339(&task.created_at).unwrap();
        assert_eq!(iso_string(parsed.with_timezone(&Utc)), task.created_at);
    }

    #[tokio::test]
    async fn list_defaults_missing_timestamps_instead_of_failing() {
        let (repo, store) = repo_with_store();
        store
            .insert_document(
                "legacy",
                TaskDocument {
                    title: "old record".to_string(),
                    description: String::new(),
                    due_date: due(2025, 1, 1),
                    status: TaskStatus::Open,
                    user_id: "u1".to_string(),
                    created_at: None,
                    updated_at: None,
                },
            )
            .await;

        let before = Utc::now();
        let task = repo
            .list_tasks_for_owner("u1", None)
            .await
            .unwrap()
            .remove(0);
        let created = DateTime::parse_from_rfc3339(&task.created_at)
            .unwrap()
            .with_timezone(&Utc);
        assert!(created >= before - chrono::Duration::seconds(1));
        assert!(created <= Utc::now());
    }

    #[tokio::test]
    async fn toggle_writes_the_opposite_status() {
        let (repo, _) = repo_with_store();
        let id = repo
            .create_task("u1", input("Pay rent", due(2025, 1, 1)))
            .await
            .unwrap();

        repo.toggle_task_status(&id, TaskStatus::Open).await.unwrap();
        let open = repo
            .list_tasks_for_owner("u1", Some(TaskStatus::Open))
            .await
            .unwrap();
        assert!(open.is_empty());
        let complete = repo
            .list_tasks_for_owner("u1", Some(TaskStatus::Complete))
            .await
            .unwrap();
        assert_eq!(complete.len(), 1);
        assert_eq!(complete[0].id, id);

        repo.toggle_task_status(&id, TaskStatus::Complete)
            .await
            .unwrap();
        let open = repo
            .list_tasks_for_owner("u1", Some(TaskStatus::Open))
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_the_task_from_listings() {
        let (repo, _) = repo_with_store();
        let id = repo
            .create_task("u1", input("Pay rent", due(2025, 1, 1)))
            .await
            .unwrap();
        repo.delete_task(&id).await.unwrap();
        let tasks = repo.list_tasks_for_owner("u1", None).await.unwrap();
        assert!(tasks.iter().all(|task| task.id != id));
    }
}
