use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use taskboard_core::{delete_project, ProjectDraft, ProjectEditor, ProjectFilter, ProjectGateway};

use super::{or_dash, print_page_footer, report_submit, Board};
use crate::config::Config;

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects, newest first
    List {
        /// Match title or description (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Create a project
    Create {
        #[arg(short, long, default_value = "")]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Update one of your projects
    Update {
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete one of your projects
    Delete { id: i64 },
}

pub async fn execute(config: &Config, command: ProjectCommands) -> Result<()> {
    let board = Board::open(config).await?;

    match command {
        ProjectCommands::List { search, page } => list(&board, search, page).await,
        ProjectCommands::Create { title, description } => {
            let mut editor = ProjectEditor::new();
            let form = editor.form_mut();
            form.set_field(ProjectDraft::TITLE, title);
            form.set_field(ProjectDraft::DESCRIPTION, description);

            let outcome = editor.submit(&board.store, board.actor.as_ref()).await?;
            report_submit(outcome, editor.form().errors(), "project")
        }
        ProjectCommands::Update {
            id,
            title,
            description,
        } => {
            let project = board
                .store
                .get_project(id)
                .await?
                .with_context(|| format!("Project #{} not found", id))?;

            let mut editor = ProjectEditor::new();
            editor.start_edit(&project);
            let form = editor.form_mut();
            if let Some(title) = title {
                form.set_field(ProjectDraft::TITLE, title);
            }
            if let Some(description) = description {
                form.set_field(ProjectDraft::DESCRIPTION, description);
            }

            let outcome = editor.submit(&board.store, board.actor.as_ref()).await?;
            report_submit(outcome, editor.form().errors(), "project")
        }
        ProjectCommands::Delete { id } => {
            let project = board
                .store
                .get_project(id)
                .await?
                .with_context(|| format!("Project #{} not found", id))?;

            delete_project(&board.store, board.actor.as_ref(), &project).await?;
            println!("  {} Deleted project {}", "✓".green(), format!("#{}", id).cyan());
            Ok(())
        }
    }
}

async fn list(board: &Board, search: Option<String>, page: u32) -> Result<()> {
    let filter = search
        .map(|text| ProjectFilter::default().search(text))
        .unwrap_or_default();
    let page = board.store.list_projects(&filter, board.page(page)).await?;

    for project in &page.rows {
        let editable = board
            .actor
            .is_some_and(|actor| actor.can_edit_project(project));

        println!(
            "{} {} {}{}",
            format!("#{}", project.id).cyan(),
            or_dash(project.title.as_deref()).bold(),
            format!("by {}", or_dash(project.creator_username.as_deref())).dimmed(),
            if editable { " ✎".green().to_string() } else { String::new() },
        );
        if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
            println!("    {}", description);
        }
    }

    print_page_footer(&page, "projects");
    Ok(())
}
