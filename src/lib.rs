//! taskdeck - Personal Task Management Core
//!
//! This library provides the task lifecycle and query model behind a
//! personal task manager: owner-scoped task storage, a repository layer
//! with a stable read shape, and per-page view-models for the dashboard
//! (open tasks) and completed-tasks views.
//!
//! # Core Concepts
//!
//! - **Tasks**: The sole entity - title, description, due date, Open/Complete
//!   status, owned by exactly one user
//! - **Task Store**: A document-database collaborator with server-assigned
//!   ids and timestamps, queried per owner and sorted by due date
//! - **Task Repository**: Translates domain operations into store calls and
//!   materializes timestamps into the stable domain shape
//! - **Task Pages**: Per-page view-models holding the list, a derived search
//!   view, the load phase, and the invalidate-then-reload mutation policy
//! - **Identity**: An external provider supplying the current user id
//!
//! # Module Organization
//!
//! - `error`: Error types and result alias
//! - `task`: Task entity, status, drafts, validation, date helpers
//! - `store`: `TaskStore` collaborator trait and the in-process `MemoryStore`
//! - `repo`: `TaskRepository` over any `TaskStore`
//! - `identity`: `IdentityProvider` trait and `StaticIdentity`
//! - `page`: `TaskPage` view-model for the dashboard and completed pages

pub mod error;
pub mod identity;
pub mod page;
pub mod repo;
pub mod store;
pub mod task;

pub use error::{Error, Result};
