//! Run reporting types.
//!
//! Counters, per-record failure descriptions, and the run state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two entity variants the engine reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityVariant {
    /// Organization records.
    Organization,
    /// Member records.
    Member,
}

impl EntityVariant {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityVariant::Organization => "organization",
            EntityVariant::Member => "member",
        }
    }
}

impl fmt::Display for EntityVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Run completed with no failures.
    Success,
    /// Run completed but some records were skipped.
    Partial,
    /// Run aborted; committed steps are retained.
    Failed,
}

impl RunOutcome {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Success => "success",
            RunOutcome::Partial => "partial",
            RunOutcome::Failed => "failed",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RunOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(RunOutcome::Success),
            "partial" => Ok(RunOutcome::Partial),
            "failed" => Ok(RunOutcome::Failed),
            _ => Err(format!("Unknown run outcome: {s}")),
        }
    }
}

/// State of a run. Transitions proceed linearly; any fetch failure moves
/// directly to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Reading pipelines and box lists.
    Fetching,
    /// Reconciling the organization collection.
    SyncingOrganizations,
    /// Reconciling the member collection.
    SyncingMembers,
    /// Recomputing the link set.
    SyncingRelationships,
    /// Run finished.
    Done,
    /// Run aborted.
    Failed,
}

impl RunState {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Fetching => "fetching",
            RunState::SyncingOrganizations => "syncing_organizations",
            RunState::SyncingMembers => "syncing_members",
            RunState::SyncingRelationships => "syncing_relationships",
            RunState::Done => "done",
            RunState::Failed => "failed",
        }
    }

    /// Check if this is a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RunState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fetching" => Ok(RunState::Fetching),
            "syncing_organizations" => Ok(RunState::SyncingOrganizations),
            "syncing_members" => Ok(RunState::SyncingMembers),
            "syncing_relationships" => Ok(RunState::SyncingRelationships),
            "done" => Ok(RunState::Done),
            "failed" => Ok(RunState::Failed),
            _ => Err(format!("Unknown run state: {s}")),
        }
    }
}

/// Create/update/delete counters for one entity variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    /// Records created this run.
    #[serde(default)]
    pub created: u32,
    /// Records whose attributes changed this run.
    #[serde(default)]
    pub updated: u32,
    /// Records deleted this run.
    #[serde(default)]
    pub deleted: u32,
}

impl EntityCounts {
    /// Total mutations this run.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.created + self.updated + self.deleted
    }

    /// Check whether the run changed nothing for this variant.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.total() == 0
    }
}

/// Description of a single skipped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Which collection the record belongs to.
    pub variant: EntityVariant,
    /// Key of the offending box.
    pub box_key: String,
    /// Why the record was skipped.
    pub message: String,
}

impl RecordFailure {
    /// Create a failure record.
    pub fn new(
        variant: EntityVariant,
        box_key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            variant,
            box_key: box_key.into(),
            message: message.into(),
        }
    }
}

/// Result of one sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Organization counters.
    pub organizations: EntityCounts,
    /// Member counters.
    pub members: EntityCounts,
    /// Links created this run.
    pub links_created: u32,
    /// Links removed this run.
    pub links_removed: u32,
    /// Records skipped this run.
    pub failures: Vec<RecordFailure>,
    /// Overall outcome.
    pub outcome: RunOutcome,
    /// Final state of the run.
    pub state: RunState,
    /// Error that aborted the run, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl RunReport {
    /// Create a report for a run that just started.
    #[must_use]
    pub fn started() -> Self {
        Self {
            organizations: EntityCounts::default(),
            members: EntityCounts::default(),
            links_created: 0,
            links_removed: 0,
            failures: Vec::new(),
            outcome: RunOutcome::Failed,
            state: RunState::Fetching,
            error: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Mark the run as completed; the outcome depends on whether any
    /// record was skipped.
    pub fn complete(&mut self) {
        self.state = RunState::Done;
        self.outcome = if self.failures.is_empty() {
            RunOutcome::Success
        } else {
            RunOutcome::Partial
        };
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run as aborted.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = RunState::Failed;
        self.outcome = RunOutcome::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
    }

    /// Check whether the run changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.organizations.is_noop()
            && self.members.is_noop()
            && self.links_created == 0
            && self.links_removed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_outcome_roundtrip() {
        for outcome in [RunOutcome::Success, RunOutcome::Partial, RunOutcome::Failed] {
            let parsed: RunOutcome = outcome.as_str().parse().unwrap();
            assert_eq!(outcome, parsed);
        }
    }

    #[test]
    fn test_run_state_roundtrip() {
        for state in [
            RunState::Fetching,
            RunState::SyncingOrganizations,
            RunState::SyncingMembers,
            RunState::SyncingRelationships,
            RunState::Done,
            RunState::Failed,
        ] {
            let parsed: RunState = state.as_str().parse().unwrap();
            assert_eq!(state, parsed);
        }
    }

    #[test]
    fn test_run_state_terminal() {
        assert!(RunState::Done.is_terminal());
        assert!(RunState::Failed.is_terminal());
        assert!(!RunState::Fetching.is_terminal());
        assert!(!RunState::SyncingRelationships.is_terminal());
    }

    #[test]
    fn test_entity_counts() {
        let counts = EntityCounts {
            created: 2,
            updated: 1,
            deleted: 0,
        };
        assert_eq!(counts.total(), 3);
        assert!(!counts.is_noop());
        assert!(EntityCounts::default().is_noop());
    }

    #[test]
    fn test_report_complete_outcomes() {
        let mut report = RunReport::started();
        report.complete();
        assert_eq!(report.outcome, RunOutcome::Success);
        assert_eq!(report.state, RunState::Done);
        assert!(report.completed_at.is_some());

        let mut report = RunReport::started();
        report.failures.push(RecordFailure::new(
            EntityVariant::Member,
            "box-1",
            "missing required field: name",
        ));
        report.complete();
        assert_eq!(report.outcome, RunOutcome::Partial);
    }

    #[test]
    fn test_report_fail() {
        let mut report = RunReport::started();
        report.fail("fetch timed out after 30 seconds");
        assert_eq!(report.outcome, RunOutcome::Failed);
        assert_eq!(report.state, RunState::Failed);
        assert!(report.error.as_deref().unwrap().contains("timed out"));
    }

    #[test]
    fn test_report_serde() {
        let mut report = RunReport::started();
        report.organizations.created = 5;
        report.complete();

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"outcome\":\"success\""));
        assert!(!json.contains("\"error\""));
    }
}
