// File: src/sql.rs
// Purpose: Placeholder-aware SQL building and listing filters
//
// Architecture: everything here is pure string building; store.rs binds the
// collected arguments and runs the statements.

use sqlx::any::AnyArguments;
use sqlx::query::Query;
use sqlx::Any;

use taskboard_core::{ProjectFilter, TaskFilter};
use uuid::Uuid;

use crate::database::DatabaseType;

/// A bound parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Int(i64),
    Text(String),
    OptInt(Option<i64>),
    OptText(Option<String>),
}

/// SQL text plus its positional arguments
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    db_type: DatabaseType,
    sql: String,
    args: Vec<Arg>,
}

impl SqlBuilder {
    pub fn new(db_type: DatabaseType, sql: &str) -> Self {
        Self {
            db_type,
            sql: sql.to_string(),
            args: Vec::new(),
        }
    }

    /// Append raw SQL
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a placeholder and remember its value; a missing optional is
    /// written as a `NULL` literal instead
    pub fn push_arg(&mut self, arg: Arg) -> &mut Self {
        let arg = match arg {
            Arg::OptInt(None) | Arg::OptText(None) => return self.push("NULL"),
            Arg::OptInt(Some(value)) => Arg::Int(value),
            Arg::OptText(Some(value)) => Arg::Text(value),
            other => other,
        };
        self.args.push(arg);
        let placeholder = self.db_type.placeholder(self.args.len());
        self.sql.push_str(&placeholder);
        self
    }

    /// Append `, ` separated placeholders, one per argument
    pub fn push_args(&mut self, args: impl IntoIterator<Item = Arg>) -> &mut Self {
        for (index, arg) in args.into_iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.push_arg(arg);
        }
        self
    }

    /// Append `column = value` pairs separated by `, `
    pub fn push_assignments<'c>(
        &mut self,
        assignments: impl IntoIterator<Item = (&'c str, Arg)>,
    ) -> &mut Self {
        for (index, (column, arg)) in assignments.into_iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.push(column).push(" = ").push_arg(arg);
        }
        self
    }

    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Build the sqlx query with every argument bound in order
    pub fn build(&self) -> Query<'_, Any, AnyArguments<'_>> {
        bind_all(sqlx::query(&self.sql), self.args.iter().cloned())
    }
}

fn bind_all<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    args: impl Iterator<Item = Arg>,
) -> Query<'q, Any, AnyArguments<'q>> {
    args.fold(query, |query, arg| match arg {
        Arg::Int(value) | Arg::OptInt(Some(value)) => query.bind(value),
        Arg::Text(value) | Arg::OptText(Some(value)) => query.bind(value),
        Arg::OptInt(None) | Arg::OptText(None) => query,
    })
}

// ============================================================================
// FILTERS
// ============================================================================

/// `%term%` for a case-insensitive match
///
/// SQLite's `LOWER` only folds ASCII, so the pattern is folded the same way.
/// PostgreSQL compares with `ILIKE` and takes the term as typed.
pub fn search_pattern(db_type: DatabaseType, term: &str) -> String {
    let term = term.trim();
    match db_type {
        DatabaseType::PostgreSQL => format!("%{}%", term),
        DatabaseType::SQLite => format!("%{}%", term.to_ascii_lowercase()),
    }
}

/// Assignee id and username of a task over `tasks t`
///
/// Picks `preferred` when given (an assignee filter), otherwise the first
/// assignee by user id; the join table allows several.
pub fn push_assignee_columns(builder: &mut SqlBuilder, preferred: Option<Uuid>) {
    let push_preferred = |builder: &mut SqlBuilder| {
        if let Some(user_id) = preferred {
            builder
                .push(" AND a.user_id = ")
                .push_arg(Arg::Text(user_id.to_string()));
        }
    };

    builder.push(", (SELECT a.user_id FROM tasks_assigned_users a WHERE a.task_id = t.id");
    push_preferred(builder);
    builder.push(" ORDER BY a.user_id LIMIT 1) AS assignee_id");

    builder.push(
        ", (SELECT u.username FROM tasks_assigned_users a \
         LEFT JOIN profiles u ON u.id = a.user_id WHERE a.task_id = t.id",
    );
    push_preferred(builder);
    builder.push(" ORDER BY a.user_id LIMIT 1) AS assignee_username");
}

/// Joins conditions with WHERE / AND as they are added
struct Conditions<'a> {
    builder: &'a mut SqlBuilder,
    any: bool,
}

impl<'a> Conditions<'a> {
    fn new(builder: &'a mut SqlBuilder) -> Self {
        Self {
            builder,
            any: false,
        }
    }

    fn next(&mut self) -> &mut SqlBuilder {
        self.builder.push(if self.any { " AND " } else { " WHERE " });
        self.any = true;
        &mut *self.builder
    }
}

/// Case-insensitive substring match on `title` or `description` of `alias`
fn push_search(conditions: &mut Conditions<'_>, alias: &str, term: &str) {
    let builder = conditions.next();
    let db_type = builder.db_type();
    let pattern = search_pattern(db_type, term);
    let matches = |column: &str| match db_type {
        DatabaseType::PostgreSQL => format!("{alias}.{column} ILIKE "),
        DatabaseType::SQLite => format!("LOWER({alias}.{column}) LIKE "),
    };

    builder
        .push("(")
        .push(&matches("title"))
        .push_arg(Arg::Text(pattern.clone()))
        .push(" OR ")
        .push(&matches("description"))
        .push_arg(Arg::Text(pattern))
        .push(")");
}

/// WHERE clause for a project listing over `projects p`
pub fn push_project_filter(builder: &mut SqlBuilder, filter: &ProjectFilter) {
    let mut conditions = Conditions::new(builder);
    if let Some(term) = filter.search_term() {
        push_search(&mut conditions, "p", term);
    }
}

/// WHERE clause for a task listing over `tasks t`
pub fn push_task_filter(builder: &mut SqlBuilder, filter: &TaskFilter) {
    let mut conditions = Conditions::new(builder);

    if let Some(term) = filter.search_term() {
        push_search(&mut conditions, "t", term);
    }
    if let Some(project_id) = filter.project_id {
        conditions
            .next()
            .push("t.project_id = ")
            .push_arg(Arg::Int(project_id));
    }
    if let Some(status) = filter.status {
        conditions
            .next()
            .push("t.status = ")
            .push_arg(Arg::Text(status.as_str().to_string()));
    }
    if let Some(priority) = filter.priority {
        conditions
            .next()
            .push("t.priority = ")
            .push_arg(Arg::Text(priority.as_str().to_string()));
    }
    if let Some(user_id) = filter.assignee {
        conditions
            .next()
            .push("EXISTS (SELECT 1 FROM tasks_assigned_users a WHERE a.task_id = t.id AND a.user_id = ")
            .push_arg(Arg::Text(user_id.to_string()))
            .push(")");
    }
}

/// `LIMIT .. OFFSET ..` for a page request
pub fn push_page(builder: &mut SqlBuilder, limit: u64, offset: u64) {
    builder
        .push(" LIMIT ")
        .push_arg(Arg::Int(i64::try_from(limit).unwrap_or(i64::MAX)))
        .push(" OFFSET ")
        .push_arg(Arg::Int(i64::try_from(offset).unwrap_or(i64::MAX)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use taskboard_core::{Priority, Status};

    #[test]
    fn test_search_pattern() {
        assert_eq!(search_pattern(DatabaseType::SQLite, " Web "), "%web%");
        assert_eq!(search_pattern(DatabaseType::SQLite, "ÉCLAIR"), "%Éclair%");
        assert_eq!(search_pattern(DatabaseType::PostgreSQL, " Web "), "%Web%");
    }

    #[test]
    fn test_sqlite_search_lowers_columns() {
        let mut builder = SqlBuilder::new(DatabaseType::SQLite, "SELECT * FROM projects p");
        push_project_filter(&mut builder, &ProjectFilter::default().search("Web"));
        assert_eq!(
            builder.sql(),
            "SELECT * FROM projects p WHERE (LOWER(p.title) LIKE ? OR LOWER(p.description) LIKE ?)"
        );
        assert_eq!(builder.args()[0], Arg::Text("%web%".into()));
    }

    #[test]
    fn test_assignee_columns_prefer_filtered_user() {
        let user = Uuid::from_u128(9);
        let mut builder = SqlBuilder::new(DatabaseType::PostgreSQL, "SELECT t.id");
        push_assignee_columns(&mut builder, Some(user));
        builder.push(" FROM tasks t");
        push_task_filter(&mut builder, &TaskFilter::default().assignee(user));

        assert_eq!(
            builder.sql(),
            "SELECT t.id, (SELECT a.user_id FROM tasks_assigned_users a WHERE a.task_id = t.id \
             AND a.user_id = $1 ORDER BY a.user_id LIMIT 1) AS assignee_id, \
             (SELECT u.username FROM tasks_assigned_users a LEFT JOIN profiles u ON u.id = a.user_id \
             WHERE a.task_id = t.id AND a.user_id = $2 ORDER BY a.user_id LIMIT 1) AS assignee_username \
             FROM tasks t WHERE EXISTS (SELECT 1 FROM tasks_assigned_users a \
             WHERE a.task_id = t.id AND a.user_id = $3)"
        );
        assert_eq!(builder.args().len(), 3);
    }

    #[test]
    fn test_assignee_columns_without_preference() {
        let mut builder = SqlBuilder::new(DatabaseType::SQLite, "SELECT t.id");
        push_assignee_columns(&mut builder, None);
        assert!(builder.args().is_empty());
        assert!(!builder.sql().contains("a.user_id = "));
    }

    #[test]
    fn test_postgres_placeholders_are_numbered() {
        let mut builder = SqlBuilder::new(DatabaseType::PostgreSQL, "SELECT * FROM tasks t");
        push_task_filter(&mut builder, &TaskFilter::default().search("api").project(4));
        push_page(&mut builder, 5, 10);

        assert_eq!(
            builder.sql(),
            "SELECT * FROM tasks t WHERE (t.title ILIKE $1 OR t.description ILIKE $2) \
             AND t.project_id = $3 LIMIT $4 OFFSET $5"
        );
        assert_eq!(
            builder.args(),
            &[
                Arg::Text("%api%".into()),
                Arg::Text("%api%".into()),
                Arg::Int(4),
                Arg::Int(5),
                Arg::Int(10),
            ]
        );
    }

    #[test]
    fn test_sqlite_placeholders() {
        let mut builder = SqlBuilder::new(DatabaseType::SQLite, "SELECT * FROM tasks t");
        push_task_filter(
            &mut builder,
            &TaskFilter::default()
                .status(Status::InProgress)
                .priority(Priority::High),
        );

        assert_eq!(
            builder.sql(),
            "SELECT * FROM tasks t WHERE t.status = ? AND t.priority = ?"
        );
        assert_eq!(
            builder.args(),
            &[
                Arg::Text("IN PROGRESS".into()),
                Arg::Text("HIGH".into())
            ]
        );
    }

    #[test]
    fn test_empty_filter_adds_nothing() {
        let mut builder = SqlBuilder::new(DatabaseType::SQLite, "SELECT COUNT(*) FROM projects p");
        push_project_filter(&mut builder, &ProjectFilter::default());
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM projects p");
        assert!(builder.args().is_empty());
    }

    #[test]
    fn test_push_args_separates_values() {
        let mut builder = SqlBuilder::new(DatabaseType::PostgreSQL, "VALUES (");
        builder
            .push_args([Arg::Int(1), Arg::OptText(None), Arg::OptText(Some("x".into()))])
            .push(")");
        assert_eq!(builder.sql(), "VALUES ($1, NULL, $2)");
        assert_eq!(builder.args(), &[Arg::Int(1), Arg::Text("x".into())]);
    }

    #[test]
    fn test_push_assignments() {
        let mut builder = SqlBuilder::new(DatabaseType::PostgreSQL, "UPDATE projects SET ");
        builder
            .push_assignments([
                ("title", Arg::Text("Site".into())),
                ("description", Arg::Text("Relaunch".into())),
            ])
            .push(" WHERE id = ")
            .push_arg(Arg::Int(7));
        assert_eq!(
            builder.sql(),
            "UPDATE projects SET title = $1, description = $2 WHERE id = $3"
        );
    }
}
