//! Weekly report entity and its task entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{IsoWeek, RecordId};

pub const TASK_TITLE_MAX: usize = 200;
pub const TASK_NOTES_MAX: usize = 500;
pub const TASK_PROJECT_MAX: usize = 100;
pub const REPORT_TEXT_MAX: usize = 1000;
/// Hours in a week; no single task can exceed it
pub const TASK_HOURS_MAX: f64 = 168.0;

/// One line of work inside a weekly report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl Task {
    pub fn new(title: impl Into<String>, hours: f64) -> Self {
        Self {
            title: title.into(),
            hours,
            notes: None,
            project: None,
        }
    }

    fn validate(&self, index: usize) -> Result<(), DomainError> {
        let title_len = self.title.trim().chars().count();
        if title_len == 0 || title_len > TASK_TITLE_MAX {
            return Err(DomainError::validation(
                format!("tasks[{index}].title"),
                format!("length must be between 1 and {TASK_TITLE_MAX}"),
            ));
        }
        if !(0.0..=TASK_HOURS_MAX).contains(&self.hours) {
            return Err(DomainError::InvalidTaskHours { index });
        }
        if self.notes.as_ref().is_some_and(|n| n.chars().count() > TASK_NOTES_MAX) {
            return Err(DomainError::validation(
                format!("tasks[{index}].notes"),
                format!("at most {TASK_NOTES_MAX} characters"),
            ));
        }
        if self.project.as_ref().is_some_and(|p| p.chars().count() > TASK_PROJECT_MAX) {
            return Err(DomainError::validation(
                format!("tasks[{index}].project"),
                format!("at most {TASK_PROJECT_MAX} characters"),
            ));
        }
        Ok(())
    }
}

/// Review state of a report. `Reviewed` is terminal and locks the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Submitted,
    Reviewed,
}

impl ReportStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Reviewed => "reviewed",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "reviewed" => Ok(Self::Reviewed),
            other => Err(format!("unknown report status '{other}'")),
        }
    }
}

/// An employee's report for one ISO week
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: RecordId,
    pub user_id: RecordId,
    pub week_iso: IsoWeek,
    pub tasks: Vec<Task>,
    pub difficulties: Option<String>,
    pub remarks: Option<String>,
    pub total_hours: f64,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Create a submitted report. `total_hours` is derived from `tasks`.
    pub fn new(
        id: RecordId,
        user_id: RecordId,
        week_iso: IsoWeek,
        tasks: Vec<Task>,
        difficulties: Option<String>,
        remarks: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::validate_tasks(&tasks)?;
        Self::validate_text("difficulties", difficulties.as_deref())?;
        Self::validate_text("remarks", remarks.as_deref())?;

        let now = Utc::now();
        Ok(Self {
            id,
            user_id,
            week_iso,
            total_hours: Self::sum_hours(&tasks),
            tasks,
            difficulties,
            remarks,
            status: ReportStatus::Submitted,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn sum_hours(tasks: &[Task]) -> f64 {
        tasks.iter().map(|t| t.hours).sum()
    }

    pub fn validate_tasks(tasks: &[Task]) -> Result<(), DomainError> {
        if tasks.is_empty() {
            return Err(DomainError::EmptyTaskList);
        }
        tasks
            .iter()
            .enumerate()
            .try_for_each(|(index, task)| task.validate(index))
    }

    fn validate_text(field: &str, value: Option<&str>) -> Result<(), DomainError> {
        if value.is_some_and(|v| v.chars().count() > REPORT_TEXT_MAX) {
            return Err(DomainError::validation(
                field,
                format!("at most {REPORT_TEXT_MAX} characters"),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: RecordId) -> bool {
        self.user_id == user_id
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.status == ReportStatus::Reviewed
    }

    #[inline]
    pub fn tasks_count(&self) -> usize {
        self.tasks.len()
    }

    /// Owner edits are rejected once an administrator signed the report off
    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.is_locked() {
            return Err(DomainError::ReportLocked(self.id));
        }
        Ok(())
    }

    pub fn replace_tasks(&mut self, tasks: Vec<Task>) -> Result<(), DomainError> {
        self.ensure_editable()?;
        Self::validate_tasks(&tasks)?;
        self.total_hours = Self::sum_hours(&tasks);
        self.tasks = tasks;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_difficulties(&mut self, difficulties: Option<String>) -> Result<(), DomainError> {
        self.ensure_editable()?;
        Self::validate_text("difficulties", difficulties.as_deref())?;
        self.difficulties = difficulties;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_remarks(&mut self, remarks: Option<String>) -> Result<(), DomainError> {
        self.ensure_editable()?;
        Self::validate_text("remarks", remarks.as_deref())?;
        self.remarks = remarks;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Admin sign-off. Returns false when the report was already reviewed.
    pub fn mark_reviewed(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }
        self.status = ReportStatus::Reviewed;
        self.updated_at = Utc::now();
        true
    }
}
