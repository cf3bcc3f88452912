mod commands;
mod render;

use clap::{Parser, Subcommand};
use clearhead_core::{Config, Priority};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ClearHead: a calm to-do list that only ever shows you three things at once.
#[derive(Parser, Debug)]
#[command(name = "clearhead", version)]
struct Cli {
    /// Directory holding the task data, overriding the configured one
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "low")]
        priority: Priority,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Change fields of an existing task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Pass an empty string to remove the category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show every task, pending first
    List,
    /// Show the three tasks to focus on
    Top,
    /// Show completed tasks, most recent first
    Completed,
    /// Mark a task complete, or reopen a completed one
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
    /// Delete every task
    Clear,
    /// Swipe a task row horizontally: left deletes, right completes
    Swipe {
        id: String,
        #[arg(allow_negative_numbers = true)]
        dx: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        dy: f64,
    },
    /// Drag a task vertically in the all-tasks view: up raises priority, down lowers it
    Drag {
        id: String,
        #[arg(allow_negative_numbers = true)]
        dy: f64,
    },
    /// Show which view a container fling with this velocity opens
    Fling {
        #[arg(allow_negative_numbers = true)]
        vx: f64,
        #[arg(allow_negative_numbers = true)]
        vy: f64,
    },
    /// Show which view scrolling the home list with this vertical velocity opens
    Scroll {
        #[arg(allow_negative_numbers = true)]
        vy: f64,
    },
    /// Suggest what to do next based on the time of day and the tasks themselves
    Recommend,
    /// Show completion statistics
    Stats,
    /// Show the category colour table
    Categories,
    /// Inspect or change the first-run tutorial flag
    Tutorial {
        #[command(subcommand)]
        action: TutorialAction,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum TutorialAction {
    Status,
    Complete,
    Reset,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load()?;
    if let Some(dir) = args.data_dir {
        config.storage.dir = dir;
    }
    tracing::debug!("Using data directory {}", config.storage.dir.display());

    commands::run(args.command, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_displacements() {
        let cli = Cli::try_parse_from(["clearhead", "swipe", "1700000000000", "-70"]).unwrap();

        match cli.command {
            Commands::Swipe { id, dx, dy } => {
                assert_eq!(id, "1700000000000");
                assert_eq!(dx, -70.0);
                assert_eq!(dy, 0.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_priority() {
        let result = Cli::try_parse_from(["clearhead", "add", "Task", "--priority", "urgent"]);
        assert!(result.is_err());
    }
}
