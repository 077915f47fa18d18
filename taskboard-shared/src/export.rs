/// CSV export
///
/// Renders task listings and the project report as CSV for spreadsheet
/// consumers. Timestamps are RFC 3339; absent values become empty cells.
/// The project report applies the derived status, so a project whose live
/// tasks are all done exports as completed even if nobody flipped the flag.

use anyhow::Result;

use crate::models::project::ProjectReportRow;
use crate::models::task::Task;

/// Renders tasks as CSV, one row per task
///
/// Columns: id, project_id, title, status, priority, assigned_to_user_id,
/// due_date, created_at, updated_at.
///
/// # Errors
///
/// Returns an error if a record fails to serialize.
pub fn tasks_to_csv(tasks: &[Task]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record([
        "id",
        "project_id",
        "title",
        "status",
        "priority",
        "assigned_to_user_id",
        "due_date",
        "created_at",
        "updated_at",
    ])?;

    for task in tasks {
        writer.write_record([
            task.id.to_string(),
            task.project_id.to_string(),
            task.title.clone(),
            task.status.as_str().to_string(),
            task.priority.as_str().to_string(),
            task.assigned_to_user_id
                .map(|u| u.to_string())
                .unwrap_or_default(),
            task.due_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            task.created_at.to_rfc3339(),
            task.updated_at.to_rfc3339(),
        ])?;
    }

    Ok(writer.into_inner()?)
}

/// Renders the project report as CSV, one row per live project
///
/// Columns: id, name, owner, status, total_tasks, done_tasks, progress.
/// `status` is the derived status and `progress` the completion fraction
/// with two decimals.
///
/// # Errors
///
/// Returns an error if a record fails to serialize.
pub fn project_report_to_csv(rows: &[ProjectReportRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record([
        "id",
        "name",
        "owner",
        "status",
        "total_tasks",
        "done_tasks",
        "progress",
    ])?;

    for row in rows {
        let progress = row.progress();
        writer.write_record([
            row.id.to_string(),
            row.name.clone(),
            row.owner_username.clone(),
            row.status.derived(&progress).as_str().to_string(),
            row.total_tasks.to_string(),
            row.done_tasks.to_string(),
            format!("{:.2}", progress.fraction()),
        ])?;
    }

    Ok(writer.into_inner()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::ProjectStatus;
    use crate::models::task::{TaskPriority, TaskStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_task(title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            assigned_to_user_id: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
            reminded_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_tasks_to_csv_header_and_rows() {
        let tasks = vec![sample_task("First"), sample_task("Second")];
        let bytes = tasks_to_csv(&tasks).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,project_id,title,status,priority"));
        assert!(lines[1].contains("First"));
        assert!(lines[2].contains("Second"));
    }

    #[test]
    fn test_tasks_to_csv_empty_cells_for_absent_values() {
        let task = sample_task("No assignee");
        let text = String::from_utf8(tasks_to_csv(&[task]).unwrap()).unwrap();
        let row = text.lines().nth(1).unwrap();

        // assigned_to_user_id and due_date render as empty cells
        assert!(row.contains(",todo,medium,,,"));
    }

    #[test]
    fn test_tasks_to_csv_quotes_embedded_commas() {
        let task = sample_task("fix a, b, and c");
        let text = String::from_utf8(tasks_to_csv(&[task]).unwrap()).unwrap();

        assert!(text.contains("\"fix a, b, and c\""));
    }

    #[test]
    fn test_report_csv_applies_derived_status() {
        let rows = vec![
            ProjectReportRow {
                id: Uuid::new_v4(),
                name: "All done".to_string(),
                owner_username: "alice".to_string(),
                status: ProjectStatus::Active,
                total_tasks: 2,
                done_tasks: 2,
            },
            ProjectReportRow {
                id: Uuid::new_v4(),
                name: "Half done".to_string(),
                owner_username: "bob".to_string(),
                status: ProjectStatus::Active,
                total_tasks: 2,
                done_tasks: 1,
            },
        ];

        let text = String::from_utf8(project_report_to_csv(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[1].contains("completed"));
        assert!(lines[1].ends_with("2,2,1.00"));
        assert!(lines[2].contains("active"));
        assert!(lines[2].ends_with("2,1,0.50"));
    }

    #[test]
    fn test_report_csv_empty_report_is_header_only() {
        let text = String::from_utf8(project_report_to_csv(&[]).unwrap()).unwrap();
        assert_eq!(
            text.trim_end(),
            "id,name,owner,status,total_tasks,done_tasks,progress"
        );
    }
}
