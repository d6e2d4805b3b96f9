//! Chart series for the browser's charting library.
//!
//! Series are handed over as labels plus datasets; layout and drawing stay
//! in the browser.

use classdeck_core::models::PlatformStats;
use serde::Serialize;

/// Names accepted by `/api/statistics/{chart}`.
pub const CHARTS: &[&str] = &[
    "student-activity",
    "students-by-course",
    "task-success",
    "active-users",
    "course-completion",
    "engagement",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl Dataset {
    fn new(label: &str, data: impl IntoIterator<Item = f64>) -> Self {
        Self {
            label: label.to_string(),
            data: data.into_iter().collect(),
            colors: None,
        }
    }
}

/// Series for chart `name`, or `None` for an unknown chart.
pub fn chart_data(stats: &PlatformStats, name: &str) -> Option<ChartData> {
    let chart = match name {
        "student-activity" => ChartData {
            labels: stats
                .student_activity
                .iter()
                .map(|d| d.date.format("%b %d").to_string())
                .collect(),
            datasets: vec![Dataset::new(
                "Active students",
                stats.student_activity.iter().map(|d| f64::from(d.students)),
            )],
        },
        "students-by-course" => ChartData {
            labels: stats.students_by_course.iter().map(|s| s.name.clone()).collect(),
            datasets: vec![Dataset {
                colors: Some(stats.students_by_course.iter().map(|s| s.color.clone()).collect()),
                ..Dataset::new(
                    "Students",
                    stats.students_by_course.iter().map(|s| f64::from(s.value)),
                )
            }],
        },
        "task-success" => ChartData {
            labels: stats.task_success_by_tech.iter().map(|t| t.tech.clone()).collect(),
            datasets: vec![Dataset::new(
                "Success rate (%)",
                stats.task_success_by_tech.iter().map(|t| f64::from(t.success)),
            )],
        },
        "active-users" => ChartData {
            labels: stats
                .active_users
                .iter()
                .map(|a| a.date.format("%b %d").to_string())
                .collect(),
            datasets: vec![
                Dataset::new("DAU", stats.active_users.iter().map(|a| f64::from(a.dau))),
                Dataset::new("WAU", stats.active_users.iter().map(|a| f64::from(a.wau))),
                Dataset::new("MAU", stats.active_users.iter().map(|a| f64::from(a.mau))),
            ],
        },
        "course-completion" => ChartData {
            labels: stats.course_completion.iter().map(|c| c.course.clone()).collect(),
            datasets: vec![
                Dataset::new("Started", stats.course_completion.iter().map(|c| f64::from(c.started))),
                Dataset::new(
                    "Completed",
                    stats.course_completion.iter().map(|c| f64::from(c.completed)),
                ),
            ],
        },
        "engagement" => ChartData {
            labels: stats.engagement.iter().map(|e| e.week.clone()).collect(),
            datasets: vec![
                Dataset::new("Sessions per user", stats.engagement.iter().map(|e| e.sessions)),
                Dataset::new(
                    "Minutes per session",
                    stats.engagement.iter().map(|e| f64::from(e.duration)),
                ),
            ],
        },
        _ => return None,
    };
    Some(chart)
}
