// File: src/permissions.rs
// Purpose: Who may edit or delete projects and tasks

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Project, Role, Task};

/// The signed-in user acting on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Option<Role>,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Option<Role>) -> Self {
        Self { user_id, role }
    }

    fn created(&self, created_by: Option<Uuid>) -> bool {
        created_by == Some(self.user_id)
    }

    /// Creators, project managers and administrators
    pub fn can_modify_task(&self, created_by: Option<Uuid>) -> bool {
        self.created(created_by) || self.role.is_some_and(Role::manages_all_tasks)
    }

    /// Creators only
    pub fn can_modify_project(&self, created_by: Option<Uuid>) -> bool {
        self.created(created_by)
    }

    pub fn can_edit_task(&self, task: &Task) -> bool {
        self.can_modify_task(task.created_by)
    }

    pub fn can_edit_project(&self, project: &Project) -> bool {
        self.can_modify_project(project.created_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const CREATOR: Uuid = Uuid::from_u128(1);
    const OTHER: Uuid = Uuid::from_u128(2);

    #[rstest]
    #[case(CREATOR, None, true)]
    #[case(OTHER, None, false)]
    #[case(OTHER, Some(Role::User), false)]
    #[case(OTHER, Some(Role::ProjectManager), true)]
    #[case(OTHER, Some(Role::Administrator), true)]
    fn test_task_permissions(#[case] user: Uuid, #[case] role: Option<Role>, #[case] allowed: bool) {
        let actor = Actor::new(user, role);
        assert_eq!(actor.can_modify_task(Some(CREATOR)), allowed);
    }

    #[test]
    fn test_project_permissions_ignore_role() {
        let admin = Actor::new(OTHER, Some(Role::Administrator));
        assert!(!admin.can_modify_project(Some(CREATOR)));

        let creator = Actor::new(CREATOR, Some(Role::User));
        assert!(creator.can_modify_project(Some(CREATOR)));
    }

    #[test]
    fn test_rows_without_creator() {
        let user = Actor::new(CREATOR, None);
        assert!(!user.can_modify_task(None));
        assert!(!user.can_modify_project(None));

        let manager = Actor::new(CREATOR, Some(Role::ProjectManager));
        assert!(manager.can_modify_task(None));
    }
}
