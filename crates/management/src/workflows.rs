//! Campaign status and approval state machines.
//!
//! Only the transitions an operator can trigger from the campaign list are
//! modelled here. Every other state change (initial `Pending`, going
//! offline, completion) is a direct assignment through the registry.

use crate::models::{ApprovalStatus, CampaignStatus};
use clarity_core::{ClarityError, ClarityResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Status actions
// ---------------------------------------------------------------------------

/// An operator action on a campaign's running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusAction {
    /// Active -> Paused
    Pause,
    /// Paused -> Active
    Resume,
}

impl StatusAction {
    pub const ALL: &'static [StatusAction] = &[StatusAction::Pause, StatusAction::Resume];

    pub fn label(self) -> &'static str {
        match self {
            StatusAction::Pause => "暂停",
            StatusAction::Resume => "启动",
        }
    }
}

impl fmt::Display for StatusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validate that `action` is allowed from `current` and return the target status.
pub fn next_status(current: CampaignStatus, action: StatusAction) -> ClarityResult<CampaignStatus> {
    match (current, action) {
        (CampaignStatus::Active, StatusAction::Pause) => Ok(CampaignStatus::Paused),
        (CampaignStatus::Paused, StatusAction::Resume) => Ok(CampaignStatus::Active),
        _ => Err(ClarityError::InvalidTransition {
            action: format!("{action:?}"),
            from: format!("{current:?}"),
        }),
    }
}

/// Actions the campaign list offers for a campaign in `current`.
pub fn status_actions(current: CampaignStatus) -> Vec<StatusAction> {
    StatusAction::ALL
        .iter()
        .copied()
        .filter(|action| next_status(current, *action).is_ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Approval actions
// ---------------------------------------------------------------------------

/// An operator action on a campaign's review state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    /// PendingSubmission -> UnderReview
    Submit,
    /// UnderReview | Rejected, no state change
    ViewDetails,
}

impl ApprovalAction {
    pub const ALL: &'static [ApprovalAction] = &[ApprovalAction::Submit, ApprovalAction::ViewDetails];

    pub fn label(self) -> &'static str {
        match self {
            ApprovalAction::Submit => "提交审核",
            ApprovalAction::ViewDetails => "审核详情",
        }
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validate that `action` is allowed from `current` and return the resulting
/// approval status. Viewing details leaves the status unchanged.
pub fn next_approval(current: ApprovalStatus, action: ApprovalAction) -> ClarityResult<ApprovalStatus> {
    match (current, action) {
        (ApprovalStatus::PendingSubmission, ApprovalAction::Submit) => Ok(ApprovalStatus::UnderReview),
        (ApprovalStatus::UnderReview, ApprovalAction::ViewDetails)
        | (ApprovalStatus::Rejected, ApprovalAction::ViewDetails) => Ok(current),
        _ => Err(ClarityError::InvalidTransition {
            action: format!("{action:?}"),
            from: format!("{current:?}"),
        }),
    }
}

/// Actions the campaign list offers for a campaign in review state `current`.
pub fn approval_actions(current: ApprovalStatus) -> Vec<ApprovalAction> {
    ApprovalAction::ALL
        .iter()
        .copied()
        .filter(|action| next_approval(current, *action).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_resume_cycle() {
        let paused = next_status(CampaignStatus::Active, StatusAction::Pause).unwrap();
        assert_eq!(paused, CampaignStatus::Paused);
        assert_eq!(paused.label(), "已暂停");

        let resumed = next_status(paused, StatusAction::Resume).unwrap();
        assert_eq!(resumed, CampaignStatus::Active);
        assert_eq!(resumed.label(), "活动中");
    }

    #[test]
    fn test_invalid_status_transitions() {
        let err = next_status(CampaignStatus::Pending, StatusAction::Resume).unwrap_err();
        assert!(err.to_string().contains("Invalid transition"));
        assert!(next_status(CampaignStatus::Paused, StatusAction::Pause).is_err());
        assert!(next_status(CampaignStatus::Completed, StatusAction::Resume).is_err());
    }

    #[test]
    fn test_no_action_leads_from_paused_to_completed() {
        for action in StatusAction::ALL {
            if let Ok(target) = next_status(CampaignStatus::Paused, *action) {
                assert_ne!(target, CampaignStatus::Completed);
            }
        }
    }

    #[test]
    fn test_status_actions_per_state() {
        assert_eq!(status_actions(CampaignStatus::Active), vec![StatusAction::Pause]);
        assert_eq!(status_actions(CampaignStatus::Paused), vec![StatusAction::Resume]);
        assert!(status_actions(CampaignStatus::Pending).is_empty());
        assert!(status_actions(CampaignStatus::Offline).is_empty());
        assert!(status_actions(CampaignStatus::Completed).is_empty());
    }

    #[test]
    fn test_submit_only_from_pending_submission() {
        assert_eq!(
            next_approval(ApprovalStatus::PendingSubmission, ApprovalAction::Submit).unwrap(),
            ApprovalStatus::UnderReview
        );
        assert!(next_approval(ApprovalStatus::UnderReview, ApprovalAction::Submit).is_err());
        assert!(next_approval(ApprovalStatus::Approved, ApprovalAction::Submit).is_err());
        assert!(next_approval(ApprovalStatus::Rejected, ApprovalAction::Submit).is_err());
    }

    #[test]
    fn test_view_details_does_not_change_state() {
        assert_eq!(
            next_approval(ApprovalStatus::Rejected, ApprovalAction::ViewDetails).unwrap(),
            ApprovalStatus::Rejected
        );
        assert_eq!(
            approval_actions(ApprovalStatus::UnderReview),
            vec![ApprovalAction::ViewDetails]
        );
        assert_eq!(
            approval_actions(ApprovalStatus::PendingSubmission),
            vec![ApprovalAction::Submit]
        );
        assert!(approval_actions(ApprovalStatus::Approved).is_empty());
    }
}
