// File: src/draft.rs
// Purpose: Form drafts for tasks, projects and profiles, and their conversion to write payloads

use chrono::NaiveDate;
use taskboard_forms::{FormModel, FormState};
use uuid::Uuid;

use crate::model::{
    NewProject, NewTask, Priority, Profile, ProfileChanges, Project, ProjectChanges, Role, Status,
    Task, TaskChanges,
};

/// Date format of the due-date input
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated draft whose text could not be turned into a payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("project id `{0}` is not a number")]
    InvalidProjectId(String),

    #[error("due date `{0}` is not a YYYY-MM-DD date")]
    InvalidDueDate(String),

    #[error("assignee `{0}` is not a user id")]
    InvalidAssignee(String),
}

// ============================================================================
// TASKS
// ============================================================================

/// Create/edit form for a task
///
/// Ids and the due date are kept as the text the user typed; `""` means
/// "not set".
#[derive(Debug, Clone, PartialEq, FormModel)]
pub struct TaskDraft {
    #[form(label = "Title")]
    pub title: String,

    #[form(label = "Description")]
    pub description: String,

    #[form(label = "Due date")]
    pub due_date: String,

    #[form(label = "Priority")]
    pub priority: Priority,

    #[form(label = "Status")]
    pub status: Status,

    #[form(label = "Project")]
    pub project_id: String,

    #[form(label = "Assignee")]
    pub assigned_user: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            priority: Priority::Medium,
            status: Status::ToDo,
            project_id: String::new(),
            assigned_user: String::new(),
        }
    }
}

impl TaskDraft {
    pub const REQUIRED: [TaskDraftField; 4] = [
        TaskDraftField::Title,
        TaskDraftField::Description,
        TaskDraftField::ProjectId,
        TaskDraftField::DueDate,
    ];

    /// Blank create form with the task's required fields
    pub fn form() -> FormState<Self> {
        FormState::new(Self::default(), &Self::REQUIRED)
    }

    /// Edit draft for an existing task
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone().unwrap_or_default(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .map(|date| date.format(DUE_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            priority: task.priority.unwrap_or_default(),
            status: task.status.unwrap_or_default(),
            project_id: task.project_id.map(|id| id.to_string()).unwrap_or_default(),
            assigned_user: task
                .assignee
                .as_ref()
                .map(|assignee| assignee.id.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn project_id(&self) -> Result<Option<i64>, DraftError> {
        parse_project_id(&self.project_id)
    }

    pub fn due_date(&self) -> Result<Option<NaiveDate>, DraftError> {
        let text = self.due_date.trim();
        if text.is_empty() {
            return Ok(None);
        }

        NaiveDate::parse_from_str(text, DUE_DATE_FORMAT)
            .map(Some)
            .map_err(|_| DraftError::InvalidDueDate(text.to_string()))
    }

    pub fn assignee(&self) -> Result<Option<Uuid>, DraftError> {
        let text = self.assigned_user.trim();
        if text.is_empty() {
            return Ok(None);
        }

        Uuid::parse_str(text)
            .map(Some)
            .map_err(|_| DraftError::InvalidAssignee(text.to_string()))
    }

    pub fn to_new_task(&self, created_by: Uuid) -> Result<NewTask, DraftError> {
        let changes = self.to_changes()?;
        Ok(NewTask {
            title: changes.title,
            description: changes.description,
            due_date: changes.due_date,
            priority: changes.priority,
            status: changes.status,
            project_id: changes.project_id,
            created_by,
        })
    }

    pub fn to_changes(&self) -> Result<TaskChanges, DraftError> {
        Ok(TaskChanges {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            due_date: self.due_date()?,
            priority: self.priority,
            status: self.status,
            project_id: self.project_id()?,
        })
    }
}

fn parse_project_id(text: &str) -> Result<Option<i64>, DraftError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    text.parse::<i64>()
        .map(Some)
        .map_err(|_| DraftError::InvalidProjectId(text.to_string()))
}

// ============================================================================
// PROJECTS
// ============================================================================

/// Create/edit form for a project
#[derive(Debug, Clone, Default, PartialEq, FormModel)]
pub struct ProjectDraft {
    #[form(label = "Title")]
    pub title: String,

    #[form(label = "Description")]
    pub description: String,
}

impl ProjectDraft {
    pub const REQUIRED: [ProjectDraftField; 2] =
        [ProjectDraftField::Title, ProjectDraftField::Description];

    pub fn form() -> FormState<Self> {
        FormState::new(Self::default(), &Self::REQUIRED)
    }

    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone().unwrap_or_default(),
            description: project.description.clone().unwrap_or_default(),
        }
    }

    pub fn to_new_project(&self, created_by: Uuid) -> NewProject {
        NewProject {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            created_by,
        }
    }

    pub fn to_changes(&self) -> ProjectChanges {
        ProjectChanges {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

// ============================================================================
// PROFILES
// ============================================================================

/// Account form of the signed-in user
#[derive(Debug, Clone, Default, PartialEq, FormModel)]
pub struct ProfileDraft {
    #[form(label = "Username")]
    pub username: String,

    #[form(label = "Full name")]
    pub full_name: String,

    #[form(label = "Role")]
    pub role: Role,
}

impl ProfileDraft {
    pub const REQUIRED: [ProfileDraftField; 1] = [ProfileDraftField::Username];

    pub fn form() -> FormState<Self> {
        FormState::new(Self::default(), &Self::REQUIRED)
    }

    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            username: profile.username.clone().unwrap_or_default(),
            full_name: profile.full_name.clone().unwrap_or_default(),
            role: profile.role.unwrap_or_default(),
        }
    }

    pub fn to_changes(&self) -> ProfileChanges {
        let full_name = self.full_name.trim();
        ProfileChanges {
            username: self.username.trim().to_string(),
            full_name: (!full_name.is_empty()).then(|| full_name.to_string()),
            role: self.role,
        }
    }
}
