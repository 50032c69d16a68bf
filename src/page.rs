//! Task page view-models.
//!
//! One `TaskPage` per mounted page: the dashboard shows open tasks, the
//! completed page shows complete ones. Each instance owns its list, a
//! derived search view, the load phase and the editor state; mutations go
//! through the repository and then either drop the item locally (delete) or
//! refetch the whole list (create/update/toggle), because server-assigned
//! fields make a client-side merge unsafe.

use std::sync::Arc;

use tracing::warn;

use crate::error::Error;
use crate::repo::TaskRepository;
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft, TaskPatch, TaskStatus};

const LOAD_TASKS_ERROR: &str = "Failed to load tasks. Please try again.";
const LOAD_COMPLETED_ERROR: &str = "Failed to load completed tasks. Please try again.";
const SAVE_TASK_ERROR: &str = "Failed to save task. Please try again.";
const DELETE_TASK_ERROR: &str = "Failed to delete task. Please try again.";
const TOGGLE_TASK_ERROR: &str = "Failed to update task status. Please try again.";

/// Which page this view-model backs. The scope fixes the status filter of
/// every fetch and the meaning of the edit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageScope {
    Dashboard,
    Completed,
}

impl PageScope {
    /// Status filter applied to every fetch for this page.
    pub fn status(self) -> TaskStatus {
        match self {
            PageScope::Dashboard => TaskStatus::Open,
            PageScope::Completed => TaskStatus::Complete,
        }
    }

    fn load_error(self) -> &'static str {
        match self {
            PageScope::Dashboard => LOAD_TASKS_ERROR,
            PageScope::Completed => LOAD_COMPLETED_ERROR,
        }
    }
}

/// Page load phase.
///
/// `Idle` until an owner id is available, then `Loading` into `Ready`.
/// `Error` is only entered when a fetch fails before any list was shown; a
/// failed refetch keeps the previous list and stays `Ready` with the error
/// message set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Open add/edit form. `editing` is `Some` when an existing task is being
/// edited and `None` for a new one.
#[derive(Debug, Clone)]
pub struct EditorState {
    editing: Option<Task>,
    pub draft: TaskDraft,
    submitting: bool,
    error: Option<String>,
}

impl EditorState {
    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn task(&self) -> Option<&Task> {
        self.editing.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validation message from the last submit attempt, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// View-model for one task page instance.
///
/// Single logical thread of execution: all methods take `&mut self`, store
/// calls suspend the action but nothing else. No state is shared across
/// pages; every mount fetches fresh.
pub struct TaskPage {
    repo: TaskRepository,
    scope: PageScope,
    owner: Option<String>,
    tasks: Vec<Task>,
    filtered: Vec<Task>,
    search: String,
    phase: LoadPhase,
    error: Option<String>,
    editor: Option<EditorState>,
}

impl TaskPage {
    pub fn new(store: Arc<dyn TaskStore>, scope: PageScope) -> Self {
        Self {
            repo: TaskRepository::new(store),
            scope,
            owner: None,
            tasks: Vec::new(),
            filtered: Vec::new(),
            search: String::new(),
            phase: LoadPhase::Idle,
            error: None,
            editor: None,
        }
    }

    pub fn dashboard(store: Arc<dyn TaskStore>) -> Self {
        Self::new(store, PageScope::Dashboard)
    }

    pub fn completed(store: Arc<dyn TaskStore>) -> Self {
        Self::new(store, PageScope::Completed)
    }

    pub fn scope(&self) -> PageScope {
        self.scope
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Full list for this page's status scope, ascending by due date.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Search-filtered view of [`tasks`](Self::tasks), same order.
    pub fn filtered_tasks(&self) -> &[Task] {
        &self.filtered
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Retryable error message from the last failed operation, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn editor(&self) -> Option<&EditorState> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorState> {
        self.editor.as_mut()
    }

    /// Supply or clear the owner id from the identity collaborator.
    ///
    /// The page stays `Idle` until an owner arrives; the first owner
    /// triggers the initial load. Clearing the owner (sign-out) resets the
    /// page entirely.
    pub async fn set_owner(&mut self, owner: Option<String>) {
        match owner {
            Some(id) => {
                self.owner = Some(id);
                self.refresh().await;
            }
            None => {
                self.owner = None;
                self.tasks.clear();
                self.filtered.clear();
                self.search.clear();
                self.phase = LoadPhase::Idle;
                self.error = None;
                self.editor = None;
            }
        }
    }

    /// Refetch the list for this page's scope.
    ///
    /// On failure the previously displayed list is left intact; only a
    /// failure before anything was shown lands in the `Error` phase.
    pub async fn refresh(&mut self) {
        let Some(owner) = self.owner.clone() else {
            return;
        };
        let had_list = self.phase == LoadPhase::Ready;
        self.phase = LoadPhase::Loading;
        self.error = None;
        match self
            .repo
            .list_tasks_for_owner(&owner, Some(self.scope.status()))
            .await
        {
            Ok(tasks) => {
                self.tasks = tasks;
                self.apply_search();
                self.phase = LoadPhase::Ready;
            }
            Err(err) => {
                warn!(error = %err, scope = ?self.scope, "task list refresh failed");
                self.error = Some(self.scope.load_error().to_string());
                self.phase = if had_list {
                    LoadPhase::Ready
                } else {
                    LoadPhase::Error
                };
            }
        }
    }

    /// Update the search text and recompute the filtered view.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.apply_search();
    }

    /// Open the editor: `None` for a new task (due date defaulting to
    /// today), `Some` prefilled from the existing task.
    pub fn open_editor(&mut self, task: Option<Task>) {
        let draft = match &task {
            Some(task) => TaskDraft::for_task(task),
            None => TaskDraft::for_new(),
        };
        self.editor = Some(EditorState {
            editing: task,
            draft,
            submitting: false,
            error: None,
        });
    }

    pub fn cancel_editor(&mut self) {
        self.editor = None;
    }

    /// The per-task edit action.
    ///
    /// On the dashboard this opens the edit form. On the completed page
    /// there is no editing; the action reopens the task instead.
    pub async fn edit_task(&mut self, task: &Task) {
        match self.scope {
            PageScope::Dashboard => self.open_editor(Some(task.clone())),
            PageScope::Completed => self.toggle_task(&task.id).await,
        }
    }

    /// Submit the open editor.
    ///
    /// Validation failures stay on the form and never reach the store. A
    /// valid draft updates the edited task or creates a new one; success
    /// closes the form and refetches, failure keeps the form open and
    /// retryable.
    pub async fn submit_editor(&mut self) {
        let Some(owner) = self.owner.clone() else {
            return;
        };
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let input = match editor.draft.validate() {
            Ok(input) => input,
            Err(err) => {
                editor.error = Some(match err {
                    Error::InvalidInput(message) => message,
                    other => other.to_string(),
                });
                return;
            }
        };
        editor.error = None;
        editor.submitting = true;
        let editing_id = editor.editing.as_ref().map(|task| task.id.clone());

        let result = match editing_id {
            Some(task_id) => {
                let patch = TaskPatch {
                    title: Some(input.title),
                    description: Some(input.description),
                    due_date: Some(input.due_date),
                    status: None,
                };
                self.repo.update_task(&task_id, patch).await
            }
            None => self.repo.create_task(&owner, input).await.map(|_id| ()),
        };

        match result {
            Ok(()) => {
                self.editor = None;
                self.refresh().await;
            }
            Err(err) => {
                warn!(error = %err, "task save failed");
                self.error = Some(SAVE_TASK_ERROR.to_string());
                if let Some(editor) = self.editor.as_mut() {
                    editor.submitting = false;
                }
            }
        }
    }

    /// Delete a task and remove it from the displayed list optimistically;
    /// no refetch, no undo.
    pub async fn delete_task(&mut self, task_id: &str) {
        if self.owner.is_none() {
            return;
        }
        match self.repo.delete_task(task_id).await {
            Ok(()) => {
                self.tasks.retain(|task| task.id != task_id);
                self.apply_search();
            }
            Err(err) => {
                warn!(error = %err, task_id, "task delete failed");
                self.error = Some(DELETE_TASK_ERROR.to_string());
            }
        }
    }

    /// Toggle a listed task's status, then refetch. The task leaves this
    /// page's scope on success, so the refetched list no longer shows it.
    pub async fn toggle_task(&mut self, task_id: &str) {
        if self.owner.is_none() {
            return;
        }
        let Some(current) = self
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .map(|task| task.status)
        else {
            return;
        };
        match self.repo.toggle_task_status(task_id, current).await {
            Ok(()) => self.refresh().await,
            Err(err) => {
                warn!(error = %err, task_id, "task status toggle failed");
                self.error = Some(TOGGLE_TASK_ERROR.to_string());
            }
        }
    }

    /// Recompute the filtered view. Blank search yields the full list in
    /// the same order; otherwise a case-insensitive substring match on
    /// title or description.
    fn apply_search(&mut self) {
        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            self.filtered = self.tasks.clone();
            return;
        }
        self.filtered = self
            .tasks
            .iter()
            .filter(|task| {
                task.title.to_lowercase().contains(&query)
                    || task.description.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();
    }
}
