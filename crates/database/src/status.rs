use serde::{Deserialize, Serialize};

/// Status shared by the two approval workflows (Interaction and AdminAction).
/// A row moves from `pending` to exactly one of the three terminal states and
/// is never reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Accepted,
    Rejected,
    AutoAccepted,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Accepted => "accepted",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::AutoAccepted => "auto_accepted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            ApprovalStatus::Pending => false,
            ApprovalStatus::Accepted | ApprovalStatus::Rejected | ApprovalStatus::AutoAccepted => true,
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested outcome for a pending row. There is no `pending` outcome: the
/// transition happens exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    Accepted,
    Rejected,
    AutoAccepted,
}

impl ResolveOutcome {
    pub fn status(&self) -> ApprovalStatus {
        match self {
            ResolveOutcome::Accepted => ApprovalStatus::Accepted,
            ResolveOutcome::Rejected => ApprovalStatus::Rejected,
            ResolveOutcome::AutoAccepted => ApprovalStatus::AutoAccepted,
        }
    }

    /// Favorable = points get credited (manual or automatic).
    pub fn is_favorable(&self) -> bool {
        match self {
            ResolveOutcome::Accepted | ResolveOutcome::AutoAccepted => true,
            ResolveOutcome::Rejected => false,
        }
    }
}

/// Who attempts to resolve a pending row: a concrete user or the expiry
/// sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActingParty {
    User(i64),
    System,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_as_snake_case() {
        let json = serde_json::to_string(&ApprovalStatus::AutoAccepted).unwrap();
        assert_eq!(json, "\"auto_accepted\"");

        let parsed: ApprovalStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, ApprovalStatus::Pending);
    }

    #[test]
    fn test_terminal_classification() {
        assert!(!ApprovalStatus::Pending.is_terminal());
        assert!(ApprovalStatus::Accepted.is_terminal());
        assert!(ApprovalStatus::Rejected.is_terminal());
        assert!(ApprovalStatus::AutoAccepted.is_terminal());
    }

    #[test]
    fn test_favorable_outcomes_credit_points() {
        assert!(ResolveOutcome::Accepted.is_favorable());
        assert!(ResolveOutcome::AutoAccepted.is_favorable());
        assert!(!ResolveOutcome::Rejected.is_favorable());
    }

    #[test]
    fn test_outcome_maps_to_terminal_status() {
        assert_eq!(ResolveOutcome::Accepted.status(), ApprovalStatus::Accepted);
        assert_eq!(ResolveOutcome::Rejected.status(), ApprovalStatus::Rejected);
        assert_eq!(ResolveOutcome::AutoAccepted.status(), ApprovalStatus::AutoAccepted);
        assert!(ResolveOutcome::Accepted.status().is_terminal());
    }
}
