// File: src/store.rs
// Purpose: SQLx-backed implementation of every taskboard gateway

use std::error::Error as StdError;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use sqlx::any::AnyRow;
use sqlx::{Any, AnyPool, Decode, Row, Type, ValueRef};
use tracing::debug;
use uuid::Uuid;

use taskboard_core::{
    Assignee, AssignmentGateway, GatewayError, GatewayResult, NewProject, NewTask, Page,
    PageRequest, Profile, ProfileChanges, ProfileGateway, Project, ProjectChanges, ProjectFilter,
    ProjectGateway, ProjectOption, Task, TaskChanges, TaskFilter, TaskGateway,
};

use crate::database::{self, detect_database_type, DatabaseType, StoreError};
use crate::sql::{
    push_assignee_columns, push_page, push_project_filter, push_task_filter, Arg, SqlBuilder,
};

const PROJECT_COLUMNS: &str = r#"
    SELECT p.id, p.created_at, p.title, p.description, p.created_by,
           c.username AS creator_username
    FROM projects p
    LEFT JOIN profiles c ON c.id = p.created_by"#;

// Assignee columns go between these two, see `task_select`
const TASK_COLUMNS: &str = r#"
    SELECT t.id, t.created_at, t.created_by, t.project_id, t.title, t.description,
           t.due_date, t.priority, t.status,
           p.title AS project_title,
           c.username AS creator_username"#;

const TASK_JOINS: &str = r#"
    FROM tasks t
    LEFT JOIN projects p ON p.id = t.project_id
    LEFT JOIN profiles c ON c.id = t.created_by"#;

const PROFILE_COLUMNS: &str =
    "SELECT id, username, full_name, role, updated_at FROM profiles";

/// Connection pool plus the dialect it speaks
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: AnyPool,
    db_type: DatabaseType,
}

impl SqlStore {
    /// Connect and create the schema if needed
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = database::connect(database_url).await?;
        let db_type = detect_database_type(database_url);
        database::migrate(&pool, db_type).await?;
        Ok(Self { pool, db_type })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn database_type(&self) -> DatabaseType {
        self.db_type
    }

    fn builder(&self, sql: &str) -> SqlBuilder {
        SqlBuilder::new(self.db_type, sql)
    }

    /// Task columns with the assignee, preferring `assignee` when filtering by it
    fn task_select(&self, assignee: Option<Uuid>) -> SqlBuilder {
        let mut select = self.builder(TASK_COLUMNS);
        push_assignee_columns(&mut select, assignee);
        select.push(TASK_JOINS);
        select
    }

    async fn fetch_all(&self, builder: &SqlBuilder) -> GatewayResult<Vec<AnyRow>> {
        debug!(sql = builder.sql(), "fetch_all");
        builder.build().fetch_all(&self.pool).await.map_err(backend)
    }

    async fn fetch_optional(&self, builder: &SqlBuilder) -> GatewayResult<Option<AnyRow>> {
        debug!(sql = builder.sql(), "fetch_optional");
        builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)
    }

    async fn fetch_one(&self, builder: &SqlBuilder) -> GatewayResult<AnyRow> {
        debug!(sql = builder.sql(), "fetch_one");
        builder.build().fetch_one(&self.pool).await.map_err(backend)
    }

    /// Run a statement, returning the number of affected rows
    async fn execute(&self, builder: &SqlBuilder) -> GatewayResult<u64> {
        debug!(sql = builder.sql(), "execute");
        let result = builder.build().execute(&self.pool).await.map_err(backend)?;
        Ok(result.rows_affected())
    }

    async fn count(&self, builder: &SqlBuilder) -> GatewayResult<u64> {
        let row = self.fetch_one(builder).await?;
        let total: i64 = column(&row, "total")?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

// ============================================================================
// ROW DECODING
// ============================================================================

fn backend(err: sqlx::Error) -> GatewayError {
    GatewayError::backend(err)
}

fn column<T>(row: &AnyRow, name: &str) -> GatewayResult<T>
where
    T: for<'r> Decode<'r, Any> + Type<Any>,
{
    row.try_get(name).map_err(backend)
}

/// Nullable column; the Any driver refuses to decode NULL into `Option<T>`
fn nullable<T>(row: &AnyRow, name: &str) -> GatewayResult<Option<T>>
where
    T: for<'r> Decode<'r, Any> + Type<Any>,
{
    if row.try_get_raw(name).map_err(backend)?.is_null() {
        return Ok(None);
    }
    row.try_get(name).map(Some).map_err(backend)
}

/// Nullable TEXT column holding a uuid, date or enum spelling
fn parsed_column<T>(row: &AnyRow, name: &str) -> GatewayResult<Option<T>>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    match nullable::<String>(row, name)? {
        Some(text) if !text.is_empty() => text.parse().map(Some).map_err(GatewayError::backend),
        _ => Ok(None),
    }
}

fn project_from_row(row: &AnyRow) -> GatewayResult<Project> {
    Ok(Project {
        id: column(row, "id")?,
        created_at: column(row, "created_at")?,
        title: nullable(row, "title")?,
        description: nullable(row, "description")?,
        created_by: parsed_column(row, "created_by")?,
        creator_username: nullable(row, "creator_username")?,
    })
}

fn task_from_row(row: &AnyRow) -> GatewayResult<Task> {
    let assignee = match parsed_column::<Uuid>(row, "assignee_id")? {
        Some(id) => Some(Assignee {
            id,
            username: nullable(row, "assignee_username")?,
        }),
        None => None,
    };

    Ok(Task {
        id: column(row, "id")?,
        created_at: column(row, "created_at")?,
        created_by: parsed_column(row, "created_by")?,
        project_id: nullable(row, "project_id")?,
        title: nullable(row, "title")?,
        description: nullable(row, "description")?,
        due_date: parsed_column(row, "due_date")?,
        priority: parsed_column(row, "priority")?,
        status: parsed_column(row, "status")?,
        project_title: nullable(row, "project_title")?,
        creator_username: nullable(row, "creator_username")?,
        assignee,
    })
}

fn profile_from_row(row: &AnyRow) -> GatewayResult<Profile> {
    let id = parsed_column::<Uuid>(row, "id")?
        .ok_or_else(|| GatewayError::backend("profile row without id"))?;

    Ok(Profile {
        id,
        username: nullable(row, "username")?,
        full_name: nullable(row, "full_name")?,
        role: parsed_column(row, "role")?,
        updated_at: nullable(row, "updated_at")?,
    })
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn date_arg(date: Option<chrono::NaiveDate>) -> Arg {
    Arg::OptText(date.map(|date| date.to_string()))
}

// ============================================================================
// GATEWAYS
// ============================================================================

impl ProjectGateway for SqlStore {
    async fn list_projects(
        &self,
        filter: &ProjectFilter,
        page: PageRequest,
    ) -> GatewayResult<Page<Project>> {
        let mut count = self.builder("SELECT COUNT(*) AS total FROM projects p");
        push_project_filter(&mut count, filter);
        let total_count = self.count(&count).await?;

        let mut select = self.builder(PROJECT_COLUMNS);
        push_project_filter(&mut select, filter);
        select.push(" ORDER BY p.created_at DESC, p.id DESC");
        push_page(&mut select, page.limit(), page.offset());

        let rows = self
            .fetch_all(&select)
            .await?
            .iter()
            .map(project_from_row)
            .collect::<GatewayResult<Vec<_>>>()?;

        Ok(Page::new(rows, total_count, page))
    }

    async fn project_options(&self) -> GatewayResult<Vec<ProjectOption>> {
        let select = self.builder("SELECT id, title FROM projects ORDER BY id");
        self.fetch_all(&select)
            .await?
            .iter()
            .map(|row| {
                Ok(ProjectOption {
                    id: column(row, "id")?,
                    title: nullable(row, "title")?,
                })
            })
            .collect()
    }

    async fn get_project(&self, id: i64) -> GatewayResult<Option<Project>> {
        let mut select = self.builder(PROJECT_COLUMNS);
        select.push(" WHERE p.id = ").push_arg(Arg::Int(id));

        self.fetch_optional(&select)
            .await?
            .as_ref()
            .map(project_from_row)
            .transpose()
    }

    async fn create_project(&self, project: NewProject) -> GatewayResult<Project> {
        let mut insert =
            self.builder("INSERT INTO projects (created_at, title, description, created_by) VALUES (");
        insert
            .push_args([
                Arg::Text(now()),
                Arg::Text(project.title),
                Arg::Text(project.description),
                Arg::Text(project.created_by.to_string()),
            ])
            .push(") RETURNING id");

        let row = self.fetch_one(&insert).await?;
        let id: i64 = column(&row, "id")?;

        self.get_project(id)
            .await?
            .ok_or_else(|| GatewayError::not_found("project", id))
    }

    async fn update_project(&self, id: i64, changes: ProjectChanges) -> GatewayResult<()> {
        let mut update = self.builder("UPDATE projects SET ");
        update
            .push_assignments([
                ("title", Arg::Text(changes.title)),
                ("description", Arg::Text(changes.description)),
            ])
            .push(" WHERE id = ")
            .push_arg(Arg::Int(id));

        match self.execute(&update).await? {
            0 => Err(GatewayError::not_found("project", id)),
            _ => Ok(()),
        }
    }

    async fn delete_project(&self, id: i64) -> GatewayResult<()> {
        let mut delete = self.builder("DELETE FROM projects WHERE id = ");
        delete.push_arg(Arg::Int(id));

        match self.execute(&delete).await? {
            0 => Err(GatewayError::not_found("project", id)),
            _ => Ok(()),
        }
    }
}

impl TaskGateway for SqlStore {
    async fn list_tasks(&self, filter: &TaskFilter, page: PageRequest) -> GatewayResult<Page<Task>> {
        let mut count = self.builder("SELECT COUNT(*) AS total FROM tasks t");
        push_task_filter(&mut count, filter);
        let total_count = self.count(&count).await?;

        let mut select = self.task_select(filter.assignee);
        push_task_filter(&mut select, filter);
        select.push(" ORDER BY t.created_at DESC, t.id DESC");
        push_page(&mut select, page.limit(), page.offset());

        let rows = self
            .fetch_all(&select)
            .await?
            .iter()
            .map(task_from_row)
            .collect::<GatewayResult<Vec<_>>>()?;

        Ok(Page::new(rows, total_count, page))
    }

    async fn get_task(&self, id: i64) -> GatewayResult<Option<Task>> {
        let mut select = self.task_select(None);
        select.push(" WHERE t.id = ").push_arg(Arg::Int(id));

        self.fetch_optional(&select)
            .await?
            .as_ref()
            .map(task_from_row)
            .transpose()
    }

    async fn create_task(&self, task: NewTask) -> GatewayResult<Task> {
        let mut insert = self.builder(
            "INSERT INTO tasks (created_at, created_by, project_id, title, description, \
             due_date, priority, status) VALUES (",
        );
        insert
            .push_args([
                Arg::Text(now()),
                Arg::Text(task.created_by.to_string()),
                Arg::OptInt(task.project_id),
                Arg::Text(task.title),
                Arg::Text(task.description),
                date_arg(task.due_date),
                Arg::Text(task.priority.as_str().to_string()),
                Arg::Text(task.status.as_str().to_string()),
            ])
            .push(") RETURNING id");

        let row = self.fetch_one(&insert).await?;
        let id: i64 = column(&row, "id")?;

        self.get_task(id)
            .await?
            .ok_or_else(|| GatewayError::not_found("task", id))
    }

    async fn update_task(&self, id: i64, changes: TaskChanges) -> GatewayResult<()> {
        let mut update = self.builder("UPDATE tasks SET ");
        update
            .push_assignments([
                ("title", Arg::Text(changes.title)),
                ("description", Arg::Text(changes.description)),
                ("due_date", date_arg(changes.due_date)),
                ("priority", Arg::Text(changes.priority.as_str().to_string())),
                ("status", Arg::Text(changes.status.as_str().to_string())),
                ("project_id", Arg::OptInt(changes.project_id)),
            ])
            .push(" WHERE id = ")
            .push_arg(Arg::Int(id));

        match self.execute(&update).await? {
            0 => Err(GatewayError::not_found("task", id)),
            _ => Ok(()),
        }
    }

    async fn delete_task(&self, id: i64) -> GatewayResult<()> {
        let mut delete = self.builder("DELETE FROM tasks WHERE id = ");
        delete.push_arg(Arg::Int(id));

        match self.execute(&delete).await? {
            0 => Err(GatewayError::not_found("task", id)),
            _ => Ok(()),
        }
    }
}

impl AssignmentGateway for SqlStore {
    async fn clear_assignments(&self, task_id: i64) -> GatewayResult<()> {
        let mut delete = self.builder("DELETE FROM tasks_assigned_users WHERE task_id = ");
        delete.push_arg(Arg::Int(task_id));
        self.execute(&delete).await?;
        Ok(())
    }

    async fn assign(&self, task_id: i64, user_id: Uuid) -> GatewayResult<()> {
        let mut insert = self.builder("INSERT INTO tasks_assigned_users (task_id, user_id) VALUES (");
        insert
            .push_args([Arg::Int(task_id), Arg::Text(user_id.to_string())])
            .push(") ON CONFLICT DO NOTHING");
        self.execute(&insert).await?;
        Ok(())
    }
}

impl ProfileGateway for SqlStore {
    async fn list_profiles(&self) -> GatewayResult<Vec<Profile>> {
        let mut select = self.builder(PROFILE_COLUMNS);
        select.push(" ORDER BY username, id");
        self.fetch_all(&select)
            .await?
            .iter()
            .map(profile_from_row)
            .collect()
    }

    async fn get_profile(&self, id: Uuid) -> GatewayResult<Option<Profile>> {
        let mut select = self.builder(PROFILE_COLUMNS);
        select.push(" WHERE id = ").push_arg(Arg::Text(id.to_string()));

        self.fetch_optional(&select)
            .await?
            .as_ref()
            .map(profile_from_row)
            .transpose()
    }

    async fn upsert_profile(&self, id: Uuid, changes: ProfileChanges) -> GatewayResult<Profile> {
        let mut upsert =
            self.builder("INSERT INTO profiles (id, username, full_name, role, updated_at) VALUES (");
        upsert
            .push_args([
                Arg::Text(id.to_string()),
                Arg::Text(changes.username),
                Arg::OptText(changes.full_name),
                Arg::Text(changes.role.as_str().to_string()),
                Arg::Text(now()),
            ])
            .push(
                ") ON CONFLICT (id) DO UPDATE SET username = excluded.username, \
                 full_name = excluded.full_name, role = excluded.role, \
                 updated_at = excluded.updated_at",
            );
        self.execute(&upsert).await?;

        self.get_profile(id)
            .await?
            .ok_or_else(|| GatewayError::not_found("profile", id))
    }
}
