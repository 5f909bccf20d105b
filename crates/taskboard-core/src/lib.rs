// File: src/lib.rs
// Purpose: Main entry point for taskboard-core

//! # taskboard-core
//!
//! Domain layer for projects, tasks and profiles.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use taskboard_core::{Actor, TaskDraft, TaskEditor, SubmitOutcome};
//!
//! let mut editor = TaskEditor::new();
//! editor.form_mut().set_field(TaskDraft::TITLE, "Launch".to_string());
//!
//! match editor.submit(&store, Some(&actor)).await? {
//!     SubmitOutcome::Invalid => show_errors(editor.form().errors()),
//!     SubmitOutcome::Created(id) | SubmitOutcome::Updated(id) => println!("saved {id}"),
//! }
//! ```
//!
//! The backend itself is abstracted behind the traits in [`gateway`];
//! `taskboard-store` provides the SQL implementation.

pub mod draft;
pub mod editor;
pub mod gateway;
pub mod model;
pub mod permissions;
pub mod query;
pub mod session;

// Re-export main types
pub use draft::{DraftError, ProfileDraft, ProfileDraftField, ProjectDraft, ProjectDraftField, TaskDraft, TaskDraftField};
pub use editor::{delete_project, delete_task, ProfileEditor, ProjectEditor, SubmitError, SubmitOutcome, TaskEditor};
pub use gateway::{
    AssignmentGateway, GatewayError, GatewayResult, ProfileGateway, ProjectGateway, TaskGateway,
};
pub use model::{
    Assignee, NewProject, NewTask, ParseEnumError, Priority, Profile, ProfileChanges, Project,
    ProjectChanges, Role, Status, Task, TaskChanges,
};
pub use permissions::Actor;
pub use query::{Page, PageRequest, ProjectFilter, ProjectOption, TaskFilter, DEFAULT_PAGE_SIZE};
pub use session::{Session, SessionProvider, SessionState, StaticSession, WatchSession};
