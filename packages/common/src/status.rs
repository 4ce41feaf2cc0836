#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review status of an uploaded submission.
///
/// Every submission starts out `Submitted`; the other three states are set
/// exclusively through the review endpoint by a mentor or manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "submitted"))]
    Submitted,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "reviewed"))]
    Reviewed,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "approved"))]
    Approved,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "needs_revision"))]
    NeedsRevision,
}

impl SubmissionStatus {
    pub const ALL: &'static [SubmissionStatus] = &[
        Self::Submitted,
        Self::Reviewed,
        Self::Approved,
        Self::NeedsRevision,
    ];

    /// Statuses a reviewer may assign.
    pub const REVIEWER_SETTABLE: &'static [SubmissionStatus] =
        &[Self::Reviewed, Self::Approved, Self::NeedsRevision];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Reviewed => "reviewed",
            Self::Approved => "approved",
            Self::NeedsRevision => "needs_revision",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid submission status: {}", self.invalid)
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for SubmissionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| ParseStatusError {
                invalid: s.to_string(),
            })
    }
}

/// Kind of upload a submission row represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionType {
    /// Upload for a specific project.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "project"))]
    Project,
    /// Final-test upload for a specific project.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "final_test"))]
    FinalTest,
    /// Course-wide final project, not tied to any project row.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "final_project"))]
    FinalProject,
}

impl SubmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::FinalTest => "final_test",
            Self::FinalProject => "final_project",
        }
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SubmissionType {
    fn default() -> Self {
        Self::Project
    }
}

impl FromStr for SubmissionType {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "final_test" => Ok(Self::FinalTest),
            "final_project" => Ok(Self::FinalProject),
            other => Err(ParseStatusError {
                invalid: other.to_string(),
            }),
        }
    }
}

/// Completion state of a (student, project) progress record, derived from
/// the answer ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "not_started"))]
    NotStarted,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "in_progress"))]
    InProgress,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "completed"))]
    Completed,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ProgressStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_status_round_trips() {
        for status in SubmissionStatus::ALL {
            assert_eq!(
                status.as_str().parse::<SubmissionStatus>().unwrap(),
                *status
            );
        }
    }

    #[test]
    fn submitted_is_not_reviewer_settable() {
        assert!(!SubmissionStatus::REVIEWER_SETTABLE.contains(&SubmissionStatus::Submitted));
        assert_eq!(SubmissionStatus::REVIEWER_SETTABLE.len(), 3);
    }

    #[test]
    fn submission_type_parses() {
        assert_eq!(
            "final_project".parse::<SubmissionType>().unwrap(),
            SubmissionType::FinalProject
        );
        assert!("final".parse::<SubmissionType>().is_err());
    }

    #[test]
    fn defaults() {
        assert_eq!(SubmissionStatus::default(), SubmissionStatus::Submitted);
        assert_eq!(SubmissionType::default(), SubmissionType::Project);
        assert_eq!(ProgressStatus::default(), ProgressStatus::NotStarted);
    }
}
