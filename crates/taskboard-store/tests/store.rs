// Integration tests for SqlStore against in-memory SQLite

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use taskboard_core::{
    delete_project, delete_task, Actor, AssignmentGateway, GatewayError, NewProject, NewTask,
    PageRequest, Priority, ProfileChanges, ProfileGateway, ProjectChanges, ProjectFilter,
    ProjectGateway, Role, Status, SubmitOutcome, TaskDraft, TaskEditor, TaskFilter, TaskGateway,
};
use taskboard_store::SqlStore;

async fn store() -> SqlStore {
    SqlStore::connect("sqlite::memory:").await.unwrap()
}

async fn profile(store: &SqlStore, username: &str, role: Role) -> Uuid {
    let id = Uuid::new_v4();
    store
        .upsert_profile(
            id,
            ProfileChanges {
                username: username.to_string(),
                full_name: None,
                role,
            },
        )
        .await
        .unwrap();
    id
}

fn new_project(title: &str, description: &str, created_by: Uuid) -> NewProject {
    NewProject {
        title: title.to_string(),
        description: description.to_string(),
        created_by,
    }
}

fn new_task(title: &str, project_id: Option<i64>, created_by: Uuid) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: format!("{title} details"),
        due_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        priority: Priority::Medium,
        status: Status::ToDo,
        project_id,
        created_by,
    }
}

#[tokio::test]
async fn test_create_project_joins_creator() {
    let store = store().await;
    let alice = profile(&store, "alice", Role::User).await;

    let project = store
        .create_project(new_project("Website", "Relaunch", alice))
        .await
        .unwrap();

    assert_eq!(project.title.as_deref(), Some("Website"));
    assert_eq!(project.created_by, Some(alice));
    assert_eq!(project.creator_username.as_deref(), Some("alice"));
    assert_eq!(store.get_project(project.id).await.unwrap(), Some(project));
}

#[tokio::test]
async fn test_projects_newest_first_with_pagination() {
    let store = store().await;
    let alice = Uuid::new_v4();

    for n in 1..=7 {
        store
            .create_project(new_project(&format!("Project {n}"), "", alice))
            .await
            .unwrap();
    }

    let first = store
        .list_projects(&ProjectFilter::default(), PageRequest::first(5))
        .await
        .unwrap();
    assert_eq!(first.total_count, 7);
    assert_eq!(first.total_pages(), 2);
    assert_eq!(first.rows.len(), 5);
    assert_eq!(first.rows[0].title.as_deref(), Some("Project 7"));

    let second = store
        .list_projects(&ProjectFilter::default(), first.next())
        .await
        .unwrap();
    let titles: Vec<_> = second.rows.iter().filter_map(|p| p.title.clone()).collect();
    assert_eq!(titles, vec!["Project 2", "Project 1"]);
    assert!(!second.has_next());
}

#[tokio::test]
async fn test_project_search_is_case_insensitive() {
    let store = store().await;
    let alice = Uuid::new_v4();
    store
        .create_project(new_project("Website", "Marketing relaunch", alice))
        .await
        .unwrap();
    store
        .create_project(new_project("Billing", "Invoices", alice))
        .await
        .unwrap();

    let page = store
        .list_projects(&ProjectFilter::default().search("RELAUNCH"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.rows[0].title.as_deref(), Some("Website"));
}

#[tokio::test]
async fn test_search_keeps_non_ascii_letters() {
    let store = store().await;
    let alice = Uuid::new_v4();
    store
        .create_project(new_project("Éclair", "Pastry shop", alice))
        .await
        .unwrap();
    store
        .create_task(new_task("Éclair glaze", None, alice))
        .await
        .unwrap();

    for term in ["Éclair", "ÉCLAIR"] {
        let projects = store
            .list_projects(&ProjectFilter::default().search(term), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(projects.total_count, 1, "project search for {term}");

        let tasks = store
            .list_tasks(&TaskFilter::default().search(term), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(tasks.total_count, 1, "task search for {term}");
        assert_eq!(tasks.rows[0].title.as_deref(), Some("Éclair glaze"));
    }
}

#[tokio::test]
async fn test_update_and_delete_missing_rows() {
    let store = store().await;

    let changes = ProjectChanges {
        title: "x".into(),
        description: "y".into(),
    };
    assert!(matches!(
        store.update_project(99, changes).await,
        Err(GatewayError::NotFound { entity: "project", .. })
    ));
    assert!(matches!(
        store.delete_task(99).await,
        Err(GatewayError::NotFound { entity: "task", .. })
    ));
}

#[tokio::test]
async fn test_task_listing_joins_project_and_assignee() {
    let store = store().await;
    let alice = profile(&store, "alice", Role::User).await;
    let bob = profile(&store, "bob", Role::User).await;

    let project = store
        .create_project(new_project("Website", "", alice))
        .await
        .unwrap();
    let task = store
        .create_task(new_task("Design", Some(project.id), alice))
        .await
        .unwrap();
    store.replace_assignee(task.id, Some(bob)).await.unwrap();

    let task = store.get_task(task.id).await.unwrap().unwrap();
    assert_eq!(task.project_title.as_deref(), Some("Website"));
    assert_eq!(task.creator_username.as_deref(), Some("alice"));
    assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 6, 1));
    assert_eq!(task.priority, Some(Priority::Medium));
    assert_eq!(task.status, Some(Status::ToDo));

    let assignee = task.assignee.unwrap();
    assert_eq!(assignee.id, bob);
    assert_eq!(assignee.username.as_deref(), Some("bob"));
}

#[tokio::test]
async fn test_rows_without_profiles_or_assignee() {
    let store = store().await;
    let stranger = Uuid::new_v4();

    let project = store
        .create_project(new_project("Website", "", stranger))
        .await
        .unwrap();
    assert_eq!(project.creator_username, None);

    let task = store.create_task(new_task("Design", None, stranger)).await.unwrap();
    assert_eq!(task.created_by, Some(stranger));
    assert_eq!(task.creator_username, None);
    assert_eq!(task.project_id, None);
    assert_eq!(task.project_title, None);
    assert_eq!(task.assignee, None);

    let page = store
        .list_tasks(&TaskFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.rows, vec![task.clone()]);

    // Assigned to a user who has no profile yet
    store.assign(task.id, stranger).await.unwrap();
    let assignee = store.get_task(task.id).await.unwrap().unwrap().assignee.unwrap();
    assert_eq!(assignee.id, stranger);
    assert_eq!(assignee.username, None);

    let id = profile(&store, "alice", Role::User).await;
    let alice = store.get_profile(id).await.unwrap().unwrap();
    assert_eq!(alice.full_name, None);
}

#[tokio::test]
async fn test_replace_assignee_keeps_one() {
    let store = store().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let task = store.create_task(new_task("Design", None, alice)).await.unwrap();

    store.replace_assignee(task.id, Some(alice)).await.unwrap();
    store.replace_assignee(task.id, Some(bob)).await.unwrap();
    let assigned = store.get_task(task.id).await.unwrap().unwrap().assignee;
    assert_eq!(assigned.map(|a| a.id), Some(bob));

    store.replace_assignee(task.id, None).await.unwrap();
    let assigned = store.get_task(task.id).await.unwrap().unwrap().assignee;
    assert_eq!(assigned, None);
}

#[rstest]
#[case::by_status(TaskFilter::default().status(Status::Done), vec!["Ship"])]
#[case::by_priority(TaskFilter::default().priority(Priority::High), vec!["Ship", "Plan"])]
#[case::by_search(TaskFilter::default().search("PLAN"), vec!["Plan"])]
#[case::combined(TaskFilter::default().priority(Priority::High).status(Status::ToDo), vec!["Plan"])]
#[tokio::test]
async fn test_task_filters(#[case] filter: TaskFilter, #[case] expected: Vec<&str>) {
    let store = store().await;
    let alice = Uuid::new_v4();

    let plan = NewTask {
        priority: Priority::High,
        ..new_task("Plan", None, alice)
    };
    let build = new_task("Build", None, alice);
    let ship = NewTask {
        priority: Priority::High,
        status: Status::Done,
        ..new_task("Ship", None, alice)
    };
    for task in [plan, build, ship] {
        store.create_task(task).await.unwrap();
    }

    let page = store.list_tasks(&filter, PageRequest::default()).await.unwrap();
    let titles: Vec<_> = page.rows.iter().filter_map(|t| t.title.as_deref()).collect();
    assert_eq!(titles, expected);
    assert_eq!(page.total_count, expected.len() as u64);
}

#[tokio::test]
async fn test_task_filter_by_project_and_assignee() {
    let store = store().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let project = store
        .create_project(new_project("Website", "", alice))
        .await
        .unwrap();
    let inside = store
        .create_task(new_task("Inside", Some(project.id), alice))
        .await
        .unwrap();
    let outside = store.create_task(new_task("Outside", None, alice)).await.unwrap();
    store.assign(outside.id, bob).await.unwrap();

    let by_project = store
        .list_tasks(&TaskFilter::default().project(project.id), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(by_project.rows.iter().map(|t| t.id).collect::<Vec<_>>(), vec![inside.id]);

    let by_assignee = store
        .list_tasks(&TaskFilter::default().assignee(bob), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(by_assignee.rows.iter().map(|t| t.id).collect::<Vec<_>>(), vec![outside.id]);
}

#[tokio::test]
async fn test_assignee_filter_lists_the_filtered_user() {
    let store = store().await;
    let first = Uuid::from_u128(1);
    let second = Uuid::from_u128(2);
    store
        .upsert_profile(
            second,
            ProfileChanges {
                username: "bob".into(),
                full_name: None,
                role: Role::User,
            },
        )
        .await
        .unwrap();

    let task = store.create_task(new_task("Review", None, first)).await.unwrap();
    store.assign(task.id, first).await.unwrap();
    store.assign(task.id, second).await.unwrap();

    let unfiltered = store.get_task(task.id).await.unwrap().unwrap();
    assert_eq!(unfiltered.assignee.map(|a| a.id), Some(first));

    let page = store
        .list_tasks(&TaskFilter::default().assignee(second), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    let assignee = page.rows[0].assignee.clone().unwrap();
    assert_eq!(assignee.id, second);
    assert_eq!(assignee.username.as_deref(), Some("bob"));
}

#[tokio::test]
async fn test_deleting_project_detaches_tasks() {
    let store = store().await;
    let alice = Uuid::new_v4();
    let actor = Actor::new(alice, Some(Role::User));

    let project = store
        .create_project(new_project("Website", "", alice))
        .await
        .unwrap();
    let task = store
        .create_task(new_task("Design", Some(project.id), alice))
        .await
        .unwrap();

    delete_project(&store, Some(&actor), &project).await.unwrap();

    assert_eq!(store.get_project(project.id).await.unwrap(), None);
    let task = store.get_task(task.id).await.unwrap().unwrap();
    assert_eq!(task.project_id, None);
    assert_eq!(task.project_title, None);
}

#[tokio::test]
async fn test_profile_upsert_updates_in_place() {
    let store = store().await;
    let id = profile(&store, "alice", Role::User).await;

    let updated = store
        .upsert_profile(
            id,
            ProfileChanges {
                username: "alice2".into(),
                full_name: Some("Alice Liddell".into()),
                role: Role::ProjectManager,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.username.as_deref(), Some("alice2"));
    assert_eq!(updated.full_name.as_deref(), Some("Alice Liddell"));
    assert_eq!(store.role_of(id).await.unwrap(), Some(Role::ProjectManager));
    assert_eq!(store.list_profiles().await.unwrap().len(), 1);
    assert_eq!(store.role_of(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn test_task_editor_end_to_end() {
    let store = store().await;
    let alice = profile(&store, "alice", Role::User).await;
    let bob = profile(&store, "bob", Role::User).await;
    let actor = Actor::new(alice, Some(Role::User));
    let project = store
        .create_project(new_project("Website", "", alice))
        .await
        .unwrap();

    let mut editor = TaskEditor::new();
    let outcome = editor.submit(&store, Some(&actor)).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(editor.form().errors().len(), 4);

    let form = editor.form_mut();
    form.set_field(TaskDraft::TITLE, "Design".to_string());
    form.set_field(TaskDraft::DESCRIPTION, "Mockups".to_string());
    form.set_field(TaskDraft::PROJECT_ID, project.id.to_string());
    form.set_field(TaskDraft::DUE_DATE, "2024-06-01".to_string());
    form.set_field(TaskDraft::ASSIGNED_USER, bob.to_string());

    let SubmitOutcome::Created(id) = editor.submit(&store, Some(&actor)).await.unwrap() else {
        panic!("task was not created");
    };

    let task = store.get_task(id).await.unwrap().unwrap();
    assert_eq!(task.title.as_deref(), Some("Design"));
    assert_eq!(task.project_id, Some(project.id));
    assert_eq!(task.assignee.map(|a| a.id), Some(bob));

    let task = store.get_task(id).await.unwrap().unwrap();
    delete_task(&store, Some(&actor), &task).await.unwrap();
    assert_eq!(store.get_task(id).await.unwrap(), None);
}
