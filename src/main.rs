use clap::{Parser, Subcommand};
use uuid::Uuid;

use tally::commands;
use tally::error::{Result, TallyError};
use tally::model::ProjectStatus;
use tally::output::Format;
use tally::store::db::find_workspace_root;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Project, task, and team tracker with synchronized progress rollups"
)]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,
    /// Shorthand for --format pretty
    #[arg(long, global = true, hide = true)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new .tally/ workspace in the current directory
    Init,
    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Manage tasks within a project
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Manage team members
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },
    /// Read-only analytics rollups
    Insights {
        #[command(subcommand)]
        action: InsightsAction,
    },
    /// Recompute a project's progress and status from its tasks
    Sync {
        /// Project ID to resynchronize
        project_id: Uuid,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// Create a new project
    Add {
        /// Project name
        name: String,
        /// Initial status
        #[arg(long, value_enum)]
        status: Option<ProjectStatus>,
    },
    /// List projects, newest first
    List,
    /// Display a single project
    Show {
        /// Project ID
        id: Uuid,
    },
    /// Edit project fields
    Edit {
        /// Project ID
        id: Uuid,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New status
        #[arg(long, value_enum)]
        status: Option<ProjectStatus>,
        /// Manually override progress (0-100); stands until the next task change
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: Option<u8>,
    },
    /// Delete a project and its tasks
    Delete {
        /// Project ID
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum TaskAction {
    /// Create a task in a project
    Add {
        /// Project ID the task belongs to
        project_id: Uuid,
        /// Task name
        name: String,
        /// Assign to a team member
        #[arg(long)]
        member: Option<Uuid>,
    },
    /// List a project's tasks, oldest first
    List {
        /// Project ID
        project_id: Uuid,
    },
    /// Display a single task
    Show {
        /// Task ID
        id: Uuid,
    },
    /// Rename or reassign a task (never recomputes progress)
    Edit {
        /// Task ID
        id: Uuid,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Assign to a team member
        #[arg(long, conflicts_with = "unassign")]
        member: Option<Uuid>,
        /// Remove the current assignment
        #[arg(long, conflicts_with = "member")]
        unassign: bool,
    },
    /// Mark a task complete
    Complete {
        /// Task ID
        id: Uuid,
    },
    /// Mark a task incomplete again
    Reopen {
        /// Task ID
        id: Uuid,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum TeamAction {
    /// Add a team member
    Add {
        /// Member name
        name: String,
    },
    /// List team members by name
    List,
}

#[derive(Subcommand)]
enum InsightsAction {
    /// Per-project completion breakdown with overall totals
    Tasks,
    /// Per-member workload breakdown
    Team,
}

fn run(cli: Cli, format: Format) -> Result<()> {
    if let Commands::Init = cli.command {
        let cwd = std::env::current_dir().map_err(TallyError::Io)?;
        return commands::init::run(&cwd, format);
    }

    let root = find_workspace_root()?;
    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Project { action } => match action {
            ProjectAction::Add { name, status } => {
                commands::project::add(&root, name, status, format)
            }
            ProjectAction::List => commands::project::list(&root, format),
            ProjectAction::Show { id } => commands::project::show(&root, id, format),
            ProjectAction::Edit {
                id,
                name,
                status,
                progress,
            } => commands::project::edit(&root, id, name, status, progress, format),
            ProjectAction::Delete { id } => commands::project::delete(&root, id, format),
        },
        Commands::Task { action } => match action {
            TaskAction::Add {
                project_id,
                name,
                member,
            } => commands::task::add(&root, project_id, name, member, format),
            TaskAction::List { project_id } => commands::task::list(&root, project_id, format),
            TaskAction::Show { id } => commands::task::show(&root, id, format),
            TaskAction::Edit {
                id,
                name,
                member,
                unassign,
            } => commands::task::edit(&root, id, name, member, unassign, format),
            TaskAction::Complete { id } => commands::task::set_complete(&root, id, true, format),
            TaskAction::Reopen { id } => commands::task::set_complete(&root, id, false, format),
            TaskAction::Delete { id } => commands::task::delete(&root, id, format),
        },
        Commands::Team { action } => match action {
            TeamAction::Add { name } => commands::team::add(&root, name, format),
            TeamAction::List => commands::team::list(&root, format),
        },
        Commands::Insights { action } => match action {
            InsightsAction::Tasks => commands::insights::tasks(&root, format),
            InsightsAction::Team => commands::insights::team(&root, format),
        },
        Commands::Sync { project_id } => commands::sync::run(&root, project_id, format),
    }
}

fn main() {
    let cli = Cli::parse();
    let format = if cli.pretty {
        Format::Pretty
    } else {
        cli.format
    };
    if let Err(e) = run(cli, format) {
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
