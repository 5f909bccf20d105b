use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use taskboard_core::{
    delete_task, Priority, Status, Task, TaskDraft, TaskEditor, TaskFilter, TaskGateway,
};
use uuid::Uuid;

use super::{or_dash, print_page_footer, report_submit, Board, PriorityArg, StatusArg};
use crate::config::Config;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List tasks, newest first
    List {
        /// Match title or description (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        project: Option<i64>,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,

        /// Only tasks assigned to this user
        #[arg(long, conflicts_with = "mine")]
        assignee: Option<Uuid>,

        /// Only tasks assigned to you
        #[arg(long)]
        mine: bool,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Create a task
    Create {
        #[command(flatten)]
        fields: TaskFields,
    },

    /// Update a task you created (managers may update any task)
    Update {
        id: i64,

        #[command(flatten)]
        fields: TaskFields,

        /// Remove the assignee
        #[arg(long, conflicts_with = "assignee")]
        unassign: bool,
    },

    /// Delete a task and its assignments
    Delete { id: i64 },
}

/// Form fields; ids and dates are passed through as typed
#[derive(Args)]
pub struct TaskFields {
    #[arg(short, long)]
    title: Option<String>,

    #[arg(short, long)]
    description: Option<String>,

    /// Project id
    #[arg(long)]
    project: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    due: Option<String>,

    #[arg(long, value_enum)]
    priority: Option<PriorityArg>,

    #[arg(long, value_enum)]
    status: Option<StatusArg>,

    /// User id of the assignee
    #[arg(long)]
    assignee: Option<String>,
}

impl TaskFields {
    /// Copy every given field into the editor's draft
    fn apply(self, editor: &mut TaskEditor) {
        let form = editor.form_mut();
        if let Some(title) = self.title {
            form.set_field(TaskDraft::TITLE, title);
        }
        if let Some(description) = self.description {
            form.set_field(TaskDraft::DESCRIPTION, description);
        }
        if let Some(project) = self.project {
            form.set_field(TaskDraft::PROJECT_ID, project);
        }
        if let Some(due) = self.due {
            form.set_field(TaskDraft::DUE_DATE, due);
        }
        if let Some(priority) = self.priority {
            form.set_field(TaskDraft::PRIORITY, Priority::from(priority));
        }
        if let Some(status) = self.status {
            form.set_field(TaskDraft::STATUS, Status::from(status));
        }
        if let Some(assignee) = self.assignee {
            form.set_field(TaskDraft::ASSIGNED_USER, assignee);
        }
    }
}

pub async fn execute(config: &Config, command: TaskCommands) -> Result<()> {
    let board = Board::open(config).await?;

    match command {
        TaskCommands::List {
            search,
            project,
            status,
            priority,
            assignee,
            mine,
            page,
        } => {
            let mut filter = TaskFilter {
                search: None,
                project_id: project,
                status: status.map(Status::from),
                priority: priority.map(Priority::from),
                assignee,
            };
            if let Some(search) = search {
                filter = filter.search(search);
            }
            if mine {
                let actor = board.actor.context("--mine needs a signed-in user (--user)")?;
                filter = filter.assignee(actor.user_id);
            }

            list(&board, &filter, page).await
        }
        TaskCommands::Create { fields } => {
            let mut editor = TaskEditor::new();
            fields.apply(&mut editor);

            let outcome = editor.submit(&board.store, board.actor.as_ref()).await?;
            report_submit(outcome, editor.form().errors(), "task")
        }
        TaskCommands::Update {
            id,
            fields,
            unassign,
        } => {
            let task = find(&board, id).await?;

            let mut editor = TaskEditor::new();
            editor.start_edit(&task);
            fields.apply(&mut editor);
            if unassign {
                editor
                    .form_mut()
                    .set_field(TaskDraft::ASSIGNED_USER, String::new());
            }

            let outcome = editor.submit(&board.store, board.actor.as_ref()).await?;
            report_submit(outcome, editor.form().errors(), "task")
        }
        TaskCommands::Delete { id } => {
            let task = find(&board, id).await?;
            delete_task(&board.store, board.actor.as_ref(), &task).await?;
            println!("  {} Deleted task {}", "✓".green(), format!("#{}", id).cyan());
            Ok(())
        }
    }
}

async fn find(board: &Board, id: i64) -> Result<Task> {
    board
        .store
        .get_task(id)
        .await?
        .with_context(|| format!("Task #{} not found", id))
}

async fn list(board: &Board, filter: &TaskFilter, page: u32) -> Result<()> {
    let page = board.store.list_tasks(filter, board.page(page)).await?;

    for task in &page.rows {
        let status = task.status.map(|s| s.as_str()).unwrap_or("-");
        let priority = match task.priority {
            Some(Priority::High) => "HIGH".red().to_string(),
            Some(Priority::Medium) => "MEDIUM".yellow().to_string(),
            Some(Priority::Low) => "LOW".normal().to_string(),
            None => "-".to_string(),
        };

        println!(
            "{} {} [{}] {}",
            format!("#{}", task.id).cyan(),
            or_dash(task.title.as_deref()).bold(),
            status,
            priority,
        );
        println!(
            "    project: {}  due: {}  assignee: {}  creator: {}",
            or_dash(task.project_title.as_deref()),
            task.due_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".to_string()),
            or_dash(
                task.assignee
                    .as_ref()
                    .and_then(|assignee| assignee.username.as_deref())
            ),
            or_dash(task.creator_username.as_deref()),
        );
    }

    print_page_footer(&page, "tasks");
    Ok(())
}
