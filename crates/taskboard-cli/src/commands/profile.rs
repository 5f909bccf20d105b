use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use taskboard_core::{Profile, ProfileDraft, ProfileEditor, ProfileGateway, Role};

use super::{or_dash, print_form_errors, Board, RoleArg};
use crate::config::Config;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your profile, or list every profile with --all
    Show {
        #[arg(long)]
        all: bool,
    },

    /// Update your username, full name or role
    Update {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        full_name: Option<String>,

        #[arg(short, long, value_enum)]
        role: Option<RoleArg>,
    },
}

pub async fn execute(config: &Config, command: ProfileCommands) -> Result<()> {
    let board = Board::open(config).await?;

    match command {
        ProfileCommands::Show { all: true } => {
            for profile in board.store.list_profiles().await? {
                print_profile(&profile);
            }
            Ok(())
        }
        ProfileCommands::Show { all: false } => {
            let actor = board
                .actor
                .context("No user configured; pass --user or set TASKBOARD_USER")?;

            match board.store.get_profile(actor.user_id).await? {
                Some(profile) => print_profile(&profile),
                None => println!("{}", "No profile yet; run `taskboard profile update`.".dimmed()),
            }
            Ok(())
        }
        ProfileCommands::Update {
            username,
            full_name,
            role,
        } => {
            let actor = board
                .actor
                .context("No user configured; pass --user or set TASKBOARD_USER")?;

            let mut editor = ProfileEditor::new();
            if let Some(profile) = board.store.get_profile(actor.user_id).await? {
                editor.load(&profile);
            }

            let form = editor.form_mut();
            if let Some(username) = username {
                form.set_field(ProfileDraft::USERNAME, username);
            }
            if let Some(full_name) = full_name {
                form.set_field(ProfileDraft::FULL_NAME, full_name);
            }
            if let Some(role) = role {
                form.set_field(ProfileDraft::ROLE, Role::from(role));
            }

            match editor.submit(&board.store, Some(&actor)).await? {
                Some(profile) => {
                    println!("  {} Profile saved", "✓".green());
                    print_profile(&profile);
                    Ok(())
                }
                None => {
                    print_form_errors(editor.form().errors());
                    anyhow::bail!("profile was not saved");
                }
            }
        }
    }
}

fn print_profile(profile: &Profile) {
    println!(
        "{} {}",
        profile.display_name().bold(),
        format!("({})", profile.id).dimmed()
    );
    println!("    full name: {}", or_dash(profile.full_name.as_deref()));
    println!(
        "    role: {}",
        profile.role.map(|role| role.as_str()).unwrap_or("-")
    );
}
