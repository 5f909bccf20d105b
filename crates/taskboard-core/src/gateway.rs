// File: src/gateway.rs
// Purpose: Data-access interface for the projects, tasks, profiles and assignment collections

use std::error::Error as StdError;

use uuid::Uuid;

use crate::model::{
    NewProject, NewTask, Profile, ProfileChanges, Project, ProjectChanges, Role, Task, TaskChanges,
};
use crate::query::{Page, PageRequest, ProjectFilter, ProjectOption, TaskFilter};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),
}

impl GatewayError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        GatewayError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn backend(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        GatewayError::Backend(err.into())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// The projects collection
///
/// Listings are sorted newest first.
#[allow(async_fn_in_trait)]
pub trait ProjectGateway {
    async fn list_projects(
        &self,
        filter: &ProjectFilter,
        page: PageRequest,
    ) -> GatewayResult<Page<Project>>;

    /// Every project's id and title, for pickers
    async fn project_options(&self) -> GatewayResult<Vec<ProjectOption>>;

    async fn get_project(&self, id: i64) -> GatewayResult<Option<Project>>;

    async fn create_project(&self, project: NewProject) -> GatewayResult<Project>;

    /// Fails with `NotFound` when no row has this id
    async fn update_project(&self, id: i64, changes: ProjectChanges) -> GatewayResult<()>;

    /// Fails with `NotFound` when no row has this id
    async fn delete_project(&self, id: i64) -> GatewayResult<()>;
}

/// The tasks collection
///
/// Listings are sorted newest first.
#[allow(async_fn_in_trait)]
pub trait TaskGateway {
    async fn list_tasks(&self, filter: &TaskFilter, page: PageRequest) -> GatewayResult<Page<Task>>;

    async fn get_task(&self, id: i64) -> GatewayResult<Option<Task>>;

    async fn create_task(&self, task: NewTask) -> GatewayResult<Task>;

    async fn update_task(&self, id: i64, changes: TaskChanges) -> GatewayResult<()>;

    async fn delete_task(&self, id: i64) -> GatewayResult<()>;
}

/// The task <-> user assignment join
#[allow(async_fn_in_trait)]
pub trait AssignmentGateway {
    /// Remove every assignment of a task
    async fn clear_assignments(&self, task_id: i64) -> GatewayResult<()>;

    async fn assign(&self, task_id: i64, user_id: Uuid) -> GatewayResult<()>;

    /// Make `user_id` the only assignee, or leave the task unassigned
    async fn replace_assignee(&self, task_id: i64, user_id: Option<Uuid>) -> GatewayResult<()> {
        self.clear_assignments(task_id).await?;
        if let Some(user_id) = user_id {
            self.assign(task_id, user_id).await?;
        }
        Ok(())
    }
}

/// The profiles collection
#[allow(async_fn_in_trait)]
pub trait ProfileGateway {
    async fn list_profiles(&self) -> GatewayResult<Vec<Profile>>;

    async fn get_profile(&self, id: Uuid) -> GatewayResult<Option<Profile>>;

    /// Insert or update the profile with this id
    async fn upsert_profile(&self, id: Uuid, changes: ProfileChanges) -> GatewayResult<Profile>;

    async fn role_of(&self, id: Uuid) -> GatewayResult<Option<Role>> {
        Ok(self.get_profile(id).await?.and_then(|profile| profile.role))
    }
}
