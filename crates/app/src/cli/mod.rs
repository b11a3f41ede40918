//! Command line surface

pub mod render;

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clicktick_core::workspace::ListScope;
use clicktick_domain::{ClickTickError, Result};
use tracing::warn;

use crate::commands;
use crate::context::AppContext;

/// Parsed command line.
#[derive(Debug, Parser)]
#[command(name = "clicktick", version, about = "Track time on ClickUp tasks from the terminal")]
pub struct Cli {
    /// Config file (TOML or JSON); searched for next to the binary when omitted.
    #[arg(long, env = "CLICKTICK_CONFIG")]
    pub config: Option<PathBuf>,
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of `clicktick`.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Select a task and start tracking it.
    Select { task_id: String },
    /// Start the selected task's timer.
    Start,
    /// Stop the selected task's timer.
    Stop,
    /// Forget the selected task. A running entry keeps running.
    Forget,
    /// Show the selected task and its timer.
    Status,
    /// Tracked time today, this week and this month.
    Report {
        #[arg(long)]
        team: Option<String>,
    },
    /// Tracked intervals of a task, the selected one by default.
    Times { task_id: Option<String> },
    /// Teams of the account.
    Teams {
        #[arg(long)]
        refresh: bool,
    },
    /// Spaces of a team; `[x]` marks the ones the filter keeps.
    Spaces {
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        refresh: bool,
    },
    /// Show only the given spaces of a team.
    FilterSpaces {
        #[arg(long)]
        team: Option<String>,
        #[arg(required = true)]
        space_ids: Vec<String>,
    },
    /// Folders of a space.
    Folders { space_id: String },
    /// Lists of a folder, or the folderless lists of a space.
    Lists(ListsArgs),
    /// Open tasks of a list, the last browsed one by default.
    Tasks { list_id: Option<String> },
    /// Open tasks assigned to you.
    MyTasks {
        #[arg(long)]
        team: Option<String>,
    },
    /// Manage the stored ClickUp API token.
    #[command(subcommand)]
    Token(TokenCommand),
    /// Keep a live status line until interrupted.
    Watch,
}

/// Exactly one of `--space` or `--folder`.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
#[group(required = true, multiple = false)]
pub struct ListsArgs {
    /// Folderless lists of this space.
    #[arg(long)]
    pub space: Option<String>,
    /// Lists of this folder.
    #[arg(long)]
    pub folder: Option<String>,
}

impl ListsArgs {
    /// The folder when both are somehow set, else the space.
    pub fn scope(&self) -> Option<ListScope<'_>> {
        match (self.folder.as_deref(), self.space.as_deref()) {
            (Some(folder), _) => Some(ListScope::Folder(folder)),
            (None, Some(space)) => Some(ListScope::Space(space)),
            (None, None) => None,
        }
    }
}

/// `clicktick token ...`
#[derive(Clone, PartialEq, Eq, Subcommand)]
pub enum TokenCommand {
    /// Validate and store a token.
    Set { token: String },
    /// Show which token is in use, masked.
    Show,
    /// Delete the stored token.
    Delete,
}

impl Command {
    /// Whether the persisted selection must be restored first.
    pub fn needs_selection(&self) -> bool {
        match self {
            Self::Select { .. }
            | Self::Forget
            | Self::Teams { .. }
            | Self::Folders { .. }
            | Self::Lists(_)
            | Self::Tasks { .. }
            | Self::Token(_) => false,
            Self::Times { task_id } => task_id.is_none(),
            Self::Report { team }
            | Self::Spaces { team, .. }
            | Self::FilterSpaces { team, .. }
            | Self::MyTasks { team } => team.is_none(),
            Self::Start | Self::Stop | Self::Status | Self::Watch => true,
        }
    }
}

// Commands are logged at startup; the token must not be.
impl fmt::Debug for TokenCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set { .. } => f.write_str("Set { token: <redacted> }"),
            Self::Show => f.write_str("Show"),
            Self::Delete => f.write_str("Delete"),
        }
    }
}

/// Execute `command` and write its result to `out`.
pub async fn run(command: Command, ctx: &AppContext, out: &mut dyn Write) -> Result<()> {
    if command.needs_selection() {
        if let Err(err) = ctx.restore_selection().await {
            warn!(error = %err, "Could not restore the selected task");
        }
    }

    let text = match command {
        Command::Select { task_id } => render::task_selected(&commands::select_task(ctx, &task_id).await?),
        Command::Start => render::timer_state(commands::start_timer(ctx).await?),
        Command::Stop => render::timer_state(commands::stop_timer(ctx).await?),
        Command::Forget => {
            commands::forget_task(ctx).await?;
            String::new()
        }
        Command::Status => render::status(&commands::status(ctx).await?),
        Command::Report { team } => {
            render::report(&commands::tracked_time_report(ctx, team.as_deref()).await?)
        }
        Command::Times { task_id } => {
            render::time_sheet(&commands::task_time_sheet(ctx, task_id.as_deref()).await?)
        }
        Command::Teams { refresh } => render::teams(&commands::list_teams(ctx, refresh).await?),
        Command::Spaces { team, refresh } => {
            render::spaces(&commands::list_spaces(ctx, team.as_deref(), refresh).await?)
        }
        Command::FilterSpaces { team, space_ids } => {
            render::filter_saved(commands::filter_spaces(ctx, team.as_deref(), &space_ids).await?)
        }
        Command::Folders { space_id } => render::folders(&commands::list_folders(ctx, &space_id).await?),
        Command::Lists(args) => {
            let scope = args
                .scope()
                .ok_or_else(|| ClickTickError::InvalidInput("pass --space or --folder".into()))?;
            render::lists(&commands::list_lists(ctx, scope).await?)
        }
        Command::Tasks { list_id } => {
            render::task_listing(&commands::list_tasks(ctx, list_id.as_deref()).await?)
        }
        Command::MyTasks { team } => render::tasks(&commands::my_tasks(ctx, team.as_deref()).await?),
        Command::Token(TokenCommand::Set { token }) => commands::set_token(ctx, &token).await?.to_string(),
        Command::Token(TokenCommand::Show) => render::token_status(&commands::token_status(ctx).await?),
        Command::Token(TokenCommand::Delete) => {
            commands::delete_token(ctx).await?.unwrap_or("No stored token").to_string()
        }
        Command::Watch => {
            commands::watch(ctx, async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    warn!(error = %err, "Interrupt handler unavailable");
                }
            })
            .await?;
            String::new()
        }
    };

    if !text.is_empty() {
        writeln!(out, "{text}").map_err(|err| ClickTickError::Internal(format!("write failed: {err}")))?;
    }
    Ok(())
}
