//! Analytics aggregator: read-only rollups over the project and team stores.
//!
//! Per-project breakdowns report the *stored* progress field (the
//! synchronizer's output, manual overrides included); only the overall
//! completion rate is derived here, sum-weighted across all tasks rather
//! than averaged across projects.

use serde::Serialize;

use crate::error::Result;
use crate::model::WorkloadLevel;
use crate::progress::percent;
use crate::store::db::Db;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTaskStats {
    pub project_name: String,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub progress: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskOverall {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub completion_rate: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskInsights {
    pub by_project: Vec<ProjectTaskStats>,
    pub overall: TaskOverall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberWorkload {
    pub name: String,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    pub workload_level: WorkloadLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamOverall {
    pub total_members: u64,
    pub average_tasks_per_member: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamInsights {
    pub by_member: Vec<MemberWorkload>,
    pub overall: TeamOverall,
}

/// Per-project completion breakdown plus sum-weighted overall totals.
pub fn task_insights(db: &Db) -> Result<TaskInsights> {
    let mut stmt = db.conn().prepare(
        "SELECT p.name, COUNT(t.id), COALESCE(SUM(t.is_complete), 0), p.progress
         FROM projects p
         LEFT JOIN tasks t ON t.project_id = p.id
         GROUP BY p.id
         ORDER BY p.created_at DESC, p.id",
    )?;
    let by_project = stmt
        .query_map([], |row| {
            Ok(ProjectTaskStats {
                project_name: row.get(0)?,
                total_tasks: row.get(1)?,
                completed_tasks: row.get(2)?,
                progress: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(summarize_tasks(by_project))
}

/// Per-member workload breakdown; unassigned tasks belong to no member.
pub fn team_insights(db: &Db) -> Result<TeamInsights> {
    let mut stmt = db.conn().prepare(
        "SELECT m.name, COUNT(t.id), COALESCE(SUM(t.is_complete), 0)
         FROM team_members m
         LEFT JOIN tasks t ON t.team_member_id = m.id
         GROUP BY m.id
         ORDER BY m.name, m.id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<std::result::Result<Vec<(String, u64, u64)>, _>>()?;
    Ok(summarize_team(rows))
}

fn summarize_tasks(by_project: Vec<ProjectTaskStats>) -> TaskInsights {
    let total: u64 = by_project.iter().map(|p| p.total_tasks).sum();
    let completed: u64 = by_project.iter().map(|p| p.completed_tasks).sum();
    TaskInsights {
        by_project,
        overall: TaskOverall {
            total,
            completed,
            pending: total - completed,
            completion_rate: percent(completed, total),
        },
    }
}

fn summarize_team(rows: Vec<(String, u64, u64)>) -> TeamInsights {
    let by_member: Vec<MemberWorkload> = rows
        .into_iter()
        .map(|(name, total_tasks, completed_tasks)| MemberWorkload {
            name,
            total_tasks,
            completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
            workload_level: WorkloadLevel::classify(total_tasks),
        })
        .collect();

    let total_members = by_member.len() as u64;
    let assigned: u64 = by_member.iter().map(|m| m.total_tasks).sum();
    let average_tasks_per_member = if total_members > 0 {
        (assigned as f64 / total_members as f64).round() as u64
    } else {
        0
    };

    TeamInsights {
        by_member,
        overall: TeamOverall {
            total_members,
            average_tasks_per_member,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tasks::TaskPatch;
    use uuid::Uuid;

    fn add_task(db: &Db, project: Uuid, name: &str, member: Option<Uuid>, complete: bool) {
        let task = db.create_task(project, name, member).unwrap();
        if complete {
            db.update_task(
                task.id,
                TaskPatch {
                    is_complete: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        }
    }

    #[test]
    fn empty_stores_report_zeros() {
        let db = Db::open_memory().unwrap();

        let tasks = task_insights(&db).unwrap();
        assert!(tasks.by_project.is_empty());
        assert_eq!(
            tasks.overall,
            TaskOverall {
                total: 0,
                completed: 0,
                pending: 0,
                completion_rate: 0
            }
        );

        let team = team_insights(&db).unwrap();
        assert!(team.by_member.is_empty());
        assert_eq!(team.overall.total_members, 0);
        assert_eq!(team.overall.average_tasks_per_member, 0);
    }

    #[test]
    fn completion_rate_is_sum_weighted_not_averaged() {
        let db = Db::open_memory().unwrap();
        let a = db.create_project("A", None).unwrap();
        let b = db.create_project("B", None).unwrap();

        add_task(&db, a.id, "a1", None, true);
        add_task(&db, b.id, "b1", None, false);
        add_task(&db, b.id, "b2", None, false);
        add_task(&db, b.id, "b3", None, false);

        let insights = task_insights(&db).unwrap();
        // A is 1/1 (100%), B is 0/3 (0%); overall is 1 of 4, not 50
        assert_eq!(insights.overall.total, 4);
        assert_eq!(insights.overall.completed, 1);
        assert_eq!(insights.overall.pending, 3);
        assert_eq!(insights.overall.completion_rate, 25);
    }

    #[test]
    fn by_project_uses_stored_progress_in_listing_order() {
        let db = Db::open_memory().unwrap();
        let first = db.create_project("First", None).unwrap();
        let second = db.create_project("Second", None).unwrap();
        add_task(&db, first.id, "t", None, true);

        // manual override is reported as stored, not recomputed
        db.update_project(
            second.id,
            crate::store::projects::ProjectPatch {
                progress: Some(60),
                ..Default::default()
            },
        )
        .unwrap();

        let insights = task_insights(&db).unwrap();
        let names: Vec<&str> = insights
            .by_project
            .iter()
            .map(|p| p.project_name.as_str())
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(insights.by_project[0].progress, 60);
        assert_eq!(insights.by_project[0].total_tasks, 0);
        assert_eq!(insights.by_project[1].progress, 100);
        assert_eq!(insights.by_project[1].completed_tasks, 1);
    }

    #[test]
    fn workload_levels_cover_all_tiers() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("P", None).unwrap();
        db.create_member("Idle").unwrap();
        let light = db.create_member("Light").unwrap();
        let moderate = db.create_member("Moderate").unwrap();
        let heavy = db.create_member("Heavy").unwrap();

        add_task(&db, project.id, "l1", Some(light.id), true);
        for i in 0..3 {
            add_task(&db, project.id, &format!("m{i}"), Some(moderate.id), false);
        }
        for i in 0..5 {
            add_task(&db, project.id, &format!("h{i}"), Some(heavy.id), false);
        }

        let insights = team_insights(&db).unwrap();
        let level_of = |name: &str| {
            insights
                .by_member
                .iter()
                .find(|m| m.name == name)
                .unwrap()
                .workload_level
        };
        assert_eq!(level_of("Idle"), WorkloadLevel::Available);
        assert_eq!(level_of("Light"), WorkloadLevel::Light);
        assert_eq!(level_of("Moderate"), WorkloadLevel::Moderate);
        assert_eq!(level_of("Heavy"), WorkloadLevel::Heavy);

        // 9 assigned tasks over 4 members rounds to 2
        assert_eq!(insights.overall.total_members, 4);
        assert_eq!(insights.overall.average_tasks_per_member, 2);
    }

    #[test]
    fn unassigned_tasks_count_for_no_member() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("P", None).unwrap();
        let ada = db.create_member("Ada").unwrap();

        add_task(&db, project.id, "assigned", Some(ada.id), true);
        add_task(&db, project.id, "loose", None, false);

        let insights = team_insights(&db).unwrap();
        assert_eq!(insights.by_member.len(), 1);
        assert_eq!(insights.by_member[0].total_tasks, 1);
        assert_eq!(insights.by_member[0].completed_tasks, 1);
        assert_eq!(insights.by_member[0].pending_tasks, 0);

        // the loose task still counts toward the project rollup
        let tasks = task_insights(&db).unwrap();
        assert_eq!(tasks.overall.total, 2);
    }

    #[test]
    fn unassigning_moves_task_out_of_member_totals() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("P", None).unwrap();
        let ada = db.create_member("Ada").unwrap();
        let task = db.create_task(project.id, "t", Some(ada.id)).unwrap();

        assert_eq!(team_insights(&db).unwrap().by_member[0].total_tasks, 1);

        let before = db.get_project(project.id).unwrap().progress;
        db.update_task(
            task.id,
            TaskPatch {
                team_member_id: Some(None),
                ..Default::default()
            },
        )
        .unwrap();

        let insights = team_insights(&db).unwrap();
        assert_eq!(insights.by_member[0].total_tasks, 0);
        assert_eq!(
            insights.by_member[0].workload_level,
            WorkloadLevel::Available
        );
        assert_eq!(db.get_project(project.id).unwrap().progress, before);
    }

    #[test]
    fn average_rounds_half_up() {
        let team = summarize_team(vec![("A".into(), 2, 0), ("B".into(), 3, 1)]);
        assert_eq!(team.overall.average_tasks_per_member, 3);

        let team = summarize_team(vec![("A".into(), 1, 0), ("B".into(), 1, 0), ("C".into(), 2, 0)]);
        assert_eq!(team.overall.average_tasks_per_member, 1);
    }

    #[test]
    fn insights_do_not_mutate_stores() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("P", None).unwrap();
        add_task(&db, project.id, "t", None, false);
        let before = db.get_project(project.id).unwrap();

        task_insights(&db).unwrap();
        team_insights(&db).unwrap();

        assert_eq!(db.get_project(project.id).unwrap(), before);
    }
}
