mod check_cmd;
mod config;
mod generate_cmd;
mod path_cmd;
mod record_io;
mod update_cmds;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use planwright_core::{MemoryStore, PlanUpdate, Planner, TaskUpdate};

use config::ResolvedConfig;

#[derive(Parser)]
#[command(
    name = "planwright",
    about = "Turn an implementation plan into a task graph with a critical path"
)]
struct Cli {
    /// Config file (overrides PLANWRIGHT_CONFIG env var)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate tasks and the critical path from an understanding file
    Generate {
        /// Understanding record (.json or .toml)
        file: PathBuf,
        /// Output file for the generation record (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Re-run validation over a generation record
    Check {
        /// Generation record (.json)
        file: PathBuf,
    },
    /// Recompute and print the critical path of a generation record
    Path {
        /// Generation record (.json)
        file: PathBuf,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update plan fields in a generation record
    UpdatePlan {
        /// Generation record (.json)
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// draft, approved, in_progress, completed or archived
        #[arg(long)]
        status: Option<String>,
        /// Output file for the updated record (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Update one task in a generation record
    UpdateTask {
        /// Generation record (.json)
        file: PathBuf,
        /// Task ID to update
        task_id: String,
        /// todo, in_progress, completed or blocked
        #[arg(long)]
        status: Option<String>,
        /// Assign the task to someone
        #[arg(long, conflicts_with = "unassign")]
        assignee: Option<String>,
        /// Clear the assignee
        #[arg(long)]
        unassign: bool,
        /// New estimate in hours
        #[arg(long)]
        hours: Option<f64>,
        /// New priority (1-5)
        #[arg(long)]
        priority: Option<i32>,
        /// Output file for the updated record (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Execute the `planwright init` command: write config file.
fn cmd_init(cli_path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = cli_path.map_or_else(config::config_path, Path::to_path_buf);

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    config::save_config(&path, &config::ConfigFile::default())?;
    println!("Config written to {}", path.display());
    Ok(())
}

fn resolve_config(cli_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let resolved = ResolvedConfig::resolve(cli_path)?;
    match &resolved.source {
        Some(source) => tracing::debug!(path = %source.display(), "loaded config"),
        None => tracing::debug!("no config file, using defaults"),
    }
    Ok(resolved)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(config_path, force)?;
        }
        Commands::Generate { file, output } => {
            let resolved = resolve_config(config_path)?;
            let planner = Planner::with_config(Arc::new(MemoryStore::new()), resolved.planning);
            generate_cmd::run_generate(&planner, &file, output.as_deref(), resolved.pretty)
                .await?;
        }
        Commands::Check { file } => {
            check_cmd::run_check(&file)?;
        }
        Commands::Path { file, json } => {
            let resolved = resolve_config(config_path)?;
            path_cmd::run_path(&file, resolved.planning.tolerance, json, resolved.pretty)?;
        }
        Commands::UpdatePlan {
            file,
            title,
            description,
            status,
            output,
        } => {
            let resolved = resolve_config(config_path)?;
            let update = PlanUpdate {
                title,
                description,
                status,
            };
            update_cmds::run_update_plan(
                &file,
                update,
                &resolved.planning,
                output.as_deref(),
                resolved.pretty,
            )
            .await?;
        }
        Commands::UpdateTask {
            file,
            task_id,
            status,
            assignee,
            unassign,
            hours,
            priority,
            output,
        } => {
            let resolved = resolve_config(config_path)?;
            let update = TaskUpdate {
                status,
                assignee: if unassign { Some(None) } else { assignee.map(Some) },
                estimated_hours: hours,
                priority,
                ..TaskUpdate::default()
            };
            update_cmds::run_update_task(
                &file,
                &task_id,
                update,
                &resolved.planning,
                output.as_deref(),
                resolved.pretty,
            )
            .await?;
        }
    }

    Ok(())
}
