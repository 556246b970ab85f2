use clap::ValueEnum;
use colored::Colorize;

use crate::error::Result;
use crate::insights::{TaskInsights, TeamInsights};
use crate::model::{Project, ProjectStatus, Task, TeamMember};
use crate::progress::ProgressUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
    Minimal,
}

fn status_label(status: ProjectStatus) -> colored::ColoredString {
    match status {
        ProjectStatus::Completed => status.to_string().green(),
        ProjectStatus::InProgress => status.to_string().yellow(),
    }
}

pub fn print_project(project: &Project, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(project)?),
        Format::Pretty => {
            println!("[{}] {}", project.id, project.name);
            println!(
                "  status: {} | progress: {}%",
                status_label(project.status),
                project.progress
            );
        }
        Format::Minimal => {
            println!(
                "{} {:3}% {:11} {}",
                project.id,
                project.progress,
                project.status.to_string(),
                truncate(&project.name, 32)
            );
        }
    }
    Ok(())
}

pub fn print_projects(projects: &[Project], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(projects)?),
        Format::Pretty => {
            for project in projects {
                print_project(project, Format::Pretty)?;
                println!();
            }
        }
        Format::Minimal => {
            println!("{:36} {:4} {:11} NAME", "ID", "PROG", "STATUS");
            println!("{}", "-".repeat(60));
            for project in projects {
                print_project(project, Format::Minimal)?;
            }
        }
    }
    Ok(())
}

pub fn print_task(task: &Task, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(task)?),
        Format::Pretty => {
            let mark = if task.is_complete { "x".green() } else { " ".normal() };
            println!("[{mark}] {} {}", task.id, task.name);
            if let Some(member) = task.team_member_id {
                println!("    assigned to: {member}");
            }
        }
        Format::Minimal => {
            let mark = if task.is_complete { "x" } else { "-" };
            println!("{} {} {}", task.id, mark, truncate(&task.name, 40));
        }
    }
    Ok(())
}

pub fn print_tasks(tasks: &[Task], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(tasks)?),
        Format::Pretty => {
            for task in tasks {
                print_task(task, Format::Pretty)?;
            }
        }
        Format::Minimal => {
            println!("{:36} ? NAME", "ID");
            println!("{}", "-".repeat(60));
            for task in tasks {
                print_task(task, Format::Minimal)?;
            }
        }
    }
    Ok(())
}

pub fn print_members(members: &[TeamMember], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(members)?),
        _ => {
            for member in members {
                println!("{} {}", member.id, member.name);
            }
        }
    }
    Ok(())
}

pub fn print_member(member: &TeamMember, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(member)?),
        _ => println!("{} {}", member.id, member.name),
    }
    Ok(())
}

pub fn print_progress_update(update: &ProgressUpdate, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(update)?),
        _ => println!("{}% {}", update.progress, status_label(update.status)),
    }
    Ok(())
}

pub fn print_task_insights(insights: &TaskInsights, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(insights)?),
        _ => {
            for stats in &insights.by_project {
                println!(
                    "{:3}% {:>3}/{:<3} {}",
                    stats.progress,
                    stats.completed_tasks,
                    stats.total_tasks,
                    truncate(&stats.project_name, 40)
                );
            }
            let overall = &insights.overall;
            println!(
                "overall: {} tasks, {} completed, {} pending ({}%)",
                overall.total, overall.completed, overall.pending, overall.completion_rate
            );
        }
    }
    Ok(())
}

pub fn print_team_insights(insights: &TeamInsights, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(insights)?),
        _ => {
            for member in &insights.by_member {
                println!(
                    "{:9} {:>3}/{:<3} {}",
                    member.workload_level.to_string(),
                    member.completed_tasks,
                    member.total_tasks,
                    truncate(&member.name, 40)
                );
            }
            let overall = &insights.overall;
            println!(
                "overall: {} members, ~{} tasks each",
                overall.total_members, overall.average_tasks_per_member
            );
        }
    }
    Ok(())
}

pub fn truncate(value: &str, max_len: usize) -> String {
    if value.chars().count() > max_len {
        let kept: String = value.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        value.to_string()
    }
}
