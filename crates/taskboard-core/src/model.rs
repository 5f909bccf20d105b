// File: src/model.rs
// Purpose: Rows of the projects, tasks and profiles collections, and write payloads

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskboard_forms::FieldValue;
use uuid::Uuid;

// ============================================================================
// ENUMERATIONS
// ============================================================================

/// Unknown spelling for one of the enumerations below
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Generates as_str / Display / FromStr / FieldValue with the stored spelling
macro_rules! stored_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Spelling used by the backend
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl FieldValue for $name {
            fn field_text(&self) -> Option<Cow<'_, str>> {
                Some(Cow::Borrowed(self.as_str()))
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "LOW")]
    Low,
    #[default]
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH")]
    High,
}

stored_enum!(Priority, "priority", {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "TO DO")]
    ToDo,
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "DONE")]
    Done,
}

stored_enum!(Status, "status", {
    ToDo => "TO DO",
    InProgress => "IN PROGRESS",
    Done => "DONE",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    User,
    #[serde(rename = "Project manager")]
    ProjectManager,
    Administrator,
}

stored_enum!(Role, "role", {
    User => "User",
    ProjectManager => "Project manager",
    Administrator => "Administrator",
});

impl Role {
    /// Project managers and administrators may edit any task
    pub fn manages_all_tasks(self) -> bool {
        matches!(self, Role::ProjectManager | Role::Administrator)
    }
}

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// Row of the profiles table (one per signed-up user)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub updated_at: Option<String>,
}

impl Profile {
    /// Username, or the id when no username has been set
    pub fn display_name(&self) -> String {
        self.username.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// Row of the projects table joined with the creator's username
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub created_at: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub creator_username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: Uuid,
    pub username: Option<String>,
}

/// Row of the tasks table joined with project title, creator and first assignee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub created_at: String,
    pub created_by: Option<Uuid>,
    pub project_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub project_title: Option<String>,
    pub creator_username: Option<String>,
    pub assignee: Option<Assignee>,
}

// ============================================================================
// WRITE PAYLOADS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectChanges {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: Status,
    pub project_id: Option<i64>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskChanges {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: Status,
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileChanges {
    pub username: String,
    pub full_name: Option<String>,
    pub role: Role,
}
