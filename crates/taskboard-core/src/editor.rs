// File: src/editor.rs
// Purpose: Create/edit/delete workflows binding a FormState to the gateways
//
// A failed save leaves the draft and its errors untouched.

use taskboard_forms::FormState;
use tracing::{info, warn};
use uuid::Uuid;

use crate::draft::{DraftError, ProfileDraft, ProjectDraft, TaskDraft};
use crate::gateway::{AssignmentGateway, GatewayError, ProfileGateway, ProjectGateway, TaskGateway};
use crate::model::{Profile, Project, Task};
use crate::permissions::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; see the form's errors
    Invalid,
    Created(i64),
    Updated(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("login required")]
    LoginRequired,

    #[error("not allowed to modify {entity} {id}")]
    Forbidden { entity: &'static str, id: i64 },

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Row being edited, with the creator needed for the permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EditTarget {
    id: i64,
    created_by: Option<Uuid>,
}

fn require_actor(actor: Option<&Actor>) -> Result<&Actor, SubmitError> {
    actor.ok_or(SubmitError::LoginRequired)
}

// ============================================================================
// TASKS
// ============================================================================

/// Single create/edit form for tasks
#[derive(Debug, Clone)]
pub struct TaskEditor {
    form: FormState<TaskDraft>,
    editing: Option<EditTarget>,
}

impl TaskEditor {
    pub fn new() -> Self {
        Self {
            form: TaskDraft::form(),
            editing: None,
        }
    }

    pub fn form(&self) -> &FormState<TaskDraft> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState<TaskDraft> {
        &mut self.form
    }

    /// Id of the task being edited, `None` in create mode
    pub fn editing(&self) -> Option<i64> {
        self.editing.map(|target| target.id)
    }

    pub fn start_create(&mut self) {
        self.editing = None;
        self.form.reset();
    }

    pub fn start_edit(&mut self, task: &Task) {
        self.editing = Some(EditTarget {
            id: task.id,
            created_by: task.created_by,
        });
        self.form.reset_to(TaskDraft::from_task(task));
    }

    pub fn cancel(&mut self) {
        self.start_create();
    }

    /// Validate and save the draft, then replace the task's assignee
    pub async fn submit<G>(
        &mut self,
        gateway: &G,
        actor: Option<&Actor>,
    ) -> Result<SubmitOutcome, SubmitError>
    where
        G: TaskGateway + AssignmentGateway,
    {
        if !self.form.validate() {
            return Ok(SubmitOutcome::Invalid);
        }

        let actor = require_actor(actor)?;
        let draft = self.form.draft();
        let assignee = draft.assignee()?;

        let (outcome, task_id) = match self.editing {
            Some(target) => {
                if !actor.can_modify_task(target.created_by) {
                    return Err(SubmitError::Forbidden {
                        entity: "task",
                        id: target.id,
                    });
                }

                gateway.update_task(target.id, draft.to_changes()?).await?;
                info!(task_id = target.id, "task updated");
                (SubmitOutcome::Updated(target.id), target.id)
            }
            None => {
                let task = gateway.create_task(draft.to_new_task(actor.user_id)?).await?;
                info!(task_id = task.id, "task created");

                // The row exists now; a retry after a failed assignment must update it
                self.editing = Some(EditTarget {
                    id: task.id,
                    created_by: Some(actor.user_id),
                });
                (SubmitOutcome::Created(task.id), task.id)
            }
        };

        gateway.replace_assignee(task_id, assignee).await?;

        self.start_create();
        Ok(outcome)
    }
}

impl Default for TaskEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Delete a task's assignments, then the task
pub async fn delete_task<G>(gateway: &G, actor: Option<&Actor>, task: &Task) -> Result<(), SubmitError>
where
    G: TaskGateway + AssignmentGateway,
{
    let actor = require_actor(actor)?;
    if !actor.can_edit_task(task) {
        return Err(SubmitError::Forbidden {
            entity: "task",
            id: task.id,
        });
    }

    if let Err(err) = gateway.clear_assignments(task.id).await {
        warn!(task_id = task.id, error = %err, "failed to delete task assignments");
        return Err(err.into());
    }

    gateway.delete_task(task.id).await?;
    info!(task_id = task.id, "task deleted");
    Ok(())
}

// ============================================================================
// PROJECTS
// ============================================================================

/// Create/edit form for projects
#[derive(Debug, Clone)]
pub struct ProjectEditor {
    form: FormState<ProjectDraft>,
    editing: Option<EditTarget>,
}

impl ProjectEditor {
    pub fn new() -> Self {
        Self {
            form: ProjectDraft::form(),
            editing: None,
        }
    }

    pub fn form(&self) -> &FormState<ProjectDraft> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState<ProjectDraft> {
        &mut self.form
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing.map(|target| target.id)
    }

    pub fn start_create(&mut self) {
        self.editing = None;
        self.form.reset();
    }

    pub fn start_edit(&mut self, project: &Project) {
        self.editing = Some(EditTarget {
            id: project.id,
            created_by: project.created_by,
        });
        self.form.reset_to(ProjectDraft::from_project(project));
    }

    pub fn cancel(&mut self) {
        self.start_create();
    }

    pub async fn submit<G>(
        &mut self,
        gateway: &G,
        actor: Option<&Actor>,
    ) -> Result<SubmitOutcome, SubmitError>
    where
        G: ProjectGateway,
    {
        if !self.form.validate() {
            return Ok(SubmitOutcome::Invalid);
        }

        let actor = require_actor(actor)?;
        let draft = self.form.draft();

        let outcome = match self.editing {
            Some(target) => {
                if !actor.can_modify_project(target.created_by) {
                    return Err(SubmitError::Forbidden {
                        entity: "project",
                        id: target.id,
                    });
                }

                gateway.update_project(target.id, draft.to_changes()).await?;
                info!(project_id = target.id, "project updated");
                SubmitOutcome::Updated(target.id)
            }
            None => {
                let project = gateway
                    .create_project(draft.to_new_project(actor.user_id))
                    .await?;
                info!(project_id = project.id, "project created");
                SubmitOutcome::Created(project.id)
            }
        };

        self.start_create();
        Ok(outcome)
    }
}

impl Default for ProjectEditor {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn delete_project<G>(
    gateway: &G,
    actor: Option<&Actor>,
    project: &Project,
) -> Result<(), SubmitError>
where
    G: ProjectGateway,
{
    let actor = require_actor(actor)?;
    if !actor.can_edit_project(project) {
        return Err(SubmitError::Forbidden {
            entity: "project",
            id: project.id,
        });
    }

    gateway.delete_project(project.id).await?;
    info!(project_id = project.id, "project deleted");
    Ok(())
}

// ============================================================================
// PROFILES
// ============================================================================

/// Account form of the signed-in user
#[derive(Debug, Clone)]
pub struct ProfileEditor {
    form: FormState<ProfileDraft>,
}

impl ProfileEditor {
    pub fn new() -> Self {
        Self {
            form: ProfileDraft::form(),
        }
    }

    pub fn form(&self) -> &FormState<ProfileDraft> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState<ProfileDraft> {
        &mut self.form
    }

    /// Fill the form from the stored profile
    pub fn load(&mut self, profile: &Profile) {
        self.form.reset_to(ProfileDraft::from_profile(profile));
    }

    /// Save the signed-in user's profile; `Ok(None)` when validation failed
    ///
    /// The form keeps the saved values afterwards.
    pub async fn submit<G>(
        &mut self,
        gateway: &G,
        actor: Option<&Actor>,
    ) -> Result<Option<Profile>, SubmitError>
    where
        G: ProfileGateway,
    {
        if !self.form.validate() {
            return Ok(None);
        }

        let actor = require_actor(actor)?;
        let profile = gateway
            .upsert_profile(actor.user_id, self.form.draft().to_changes())
            .await?;
        info!(user_id = %actor.user_id, "profile updated");

        self.load(&profile);
        Ok(Some(profile))
    }
}

impl Default for ProfileEditor {
    fn default() -> Self {
        Self::new()
    }
}
