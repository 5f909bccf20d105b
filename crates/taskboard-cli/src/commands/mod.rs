pub mod init;
pub mod profile;
pub mod projects;
pub mod tasks;

use anyhow::{Context, Result};
use colored::Colorize;
use taskboard_core::{
    Actor, Page, PageRequest, Priority, ProfileGateway, Role, Session, SessionProvider,
    StaticSession, Status, SubmitOutcome,
};
use taskboard_forms::{ErrorMap, FieldKey};
use taskboard_store::SqlStore;

use crate::config::Config;

/// Opened store plus the user the command acts as
pub struct Board {
    pub store: SqlStore,
    pub actor: Option<Actor>,
    pub page_size: u32,
}

impl Board {
    pub async fn open(config: &Config) -> Result<Self> {
        let store = SqlStore::connect(&config.database.url)
            .await
            .context("Failed to open database")?;

        let session = match config.session.user_id {
            Some(user_id) => StaticSession::signed_in(Session::new(user_id)),
            None => StaticSession::signed_out(),
        };

        let actor = match session.ready().await.user_id() {
            Some(user_id) => Some(Actor::new(user_id, store.role_of(user_id).await?)),
            None => None,
        };

        Ok(Self {
            store,
            actor,
            page_size: config.pagination.page_size,
        })
    }

    pub fn page(&self, page: u32) -> PageRequest {
        PageRequest::new(page, self.page_size)
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

pub fn print_form_errors<F: FieldKey>(errors: &ErrorMap<F>) {
    eprintln!("{}", "Validation failed:".red().bold());
    for (field, message) in errors.iter() {
        eprintln!("  {} {}", format!("{}:", field.name()).yellow(), message);
    }
}

/// Print the result of an editor submit; an invalid form is an error
pub fn report_submit<F: FieldKey>(
    outcome: SubmitOutcome,
    errors: &ErrorMap<F>,
    entity: &str,
) -> Result<()> {
    match outcome {
        SubmitOutcome::Invalid => {
            print_form_errors(errors);
            anyhow::bail!("{} was not saved", entity);
        }
        SubmitOutcome::Created(id) => {
            println!("  {} Created {} {}", "✓".green(), entity, format!("#{}", id).cyan());
        }
        SubmitOutcome::Updated(id) => {
            println!("  {} Updated {} {}", "✓".green(), entity, format!("#{}", id).cyan());
        }
    }
    Ok(())
}

pub fn print_page_footer<T>(page: &Page<T>, noun: &str) {
    if page.rows.is_empty() {
        println!("{}", format!("No {} found.", noun).dimmed());
    }
    println!(
        "{}",
        format!(
            "Page {} of {} ({} {})",
            page.page,
            page.display_total_pages(),
            page.total_count,
            noun
        )
        .dimmed()
    );
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

// ============================================================================
// ARGUMENT ENUMS
// ============================================================================

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    Todo,
    InProgress,
    Done,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Todo => Status::ToDo,
            StatusArg::InProgress => Status::InProgress,
            StatusArg::Done => Status::Done,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum RoleArg {
    User,
    ProjectManager,
    Administrator,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::User => Role::User,
            RoleArg::ProjectManager => Role::ProjectManager,
            RoleArg::Administrator => Role::Administrator,
        }
    }
}
