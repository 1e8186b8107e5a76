//! In-memory campaign registry backed by DashMap.
//!
//! The registry lives for one process; nothing is persisted. Records are
//! listed in the order they entered the registry.

use crate::filter::{CampaignQuery, StatusFilter};
use crate::id_set::IdentifierSet;
use crate::models::*;
use crate::workflows::{self, ApprovalAction, StatusAction};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clarity_core::{ClarityError, ClarityResult, Features};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use uuid::Uuid;

struct Entry {
    seq: u64,
    campaign: Campaign,
}

/// Authoritative set of campaigns for the current session.
pub struct CampaignRegistry {
    features: Features,
    campaigns: DashMap<Uuid, Entry>,
    next_seq: AtomicU64,
}

impl CampaignRegistry {
    /// An empty registry.
    pub fn new(features: Features) -> Self {
        info!(
            blacklist = features.blacklist,
            approval_workflow = features.approval_workflow,
            "Campaign registry initialized (in-memory)"
        );
        Self {
            features,
            campaigns: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// A registry pre-populated with `seed`, in the given order. Sections
    /// switched off by `features` are stripped from the seeded records.
    pub fn with_seed(features: Features, seed: impl IntoIterator<Item = Campaign>) -> Self {
        let registry = Self::new(features);
        for mut campaign in seed {
            registry.normalize(&mut campaign);
            registry.insert(campaign);
        }
        registry
    }

    /// A registry holding the demo campaigns.
    pub fn with_demo_data(features: Features) -> Self {
        Self::with_seed(features, demo_campaigns())
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    // ─── Queries ───────────────────────────────────────────────────────────

    pub fn get(&self, id: Uuid) -> Option<Campaign> {
        self.campaigns.get(&id).map(|r| r.value().campaign.clone())
    }

    /// Campaigns whose name contains `search` (case-insensitive) and whose
    /// status passes `status`, in registry order.
    pub fn list(&self, search: &str, status: StatusFilter) -> Vec<Campaign> {
        let query = CampaignQuery::new(search, status);
        let mut matched: Vec<(u64, Campaign)> = self
            .campaigns
            .iter()
            .filter(|r| query.matches(&r.value().campaign))
            .map(|r| (r.value().seq, r.value().campaign.clone()))
            .collect();
        matched.sort_by_key(|(seq, _)| *seq);
        matched.into_iter().map(|(_, campaign)| campaign).collect()
    }

    // ─── Mutations ─────────────────────────────────────────────────────────

    /// Register a freshly saved config. New campaigns start `Pending` and,
    /// with the approval workflow on, `PendingSubmission`.
    pub fn create(&self, config: CampaignConfig, operator: &str) -> Campaign {
        let now = Utc::now();
        let mut campaign = Campaign {
            id: Uuid::new_v4(),
            config,
            status: CampaignStatus::Pending,
            approval_status: Some(ApprovalStatus::PendingSubmission),
            submitted_by: operator.to_string(),
            last_updated_by: operator.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.normalize(&mut campaign);
        info!(id = %campaign.id, name = %campaign.config.name, operator, "Campaign created");
        self.insert(campaign.clone());
        campaign
    }

    /// Replace the config of an existing campaign. Lifecycle fields are kept.
    pub fn update(&self, id: Uuid, config: CampaignConfig, operator: &str) -> Option<Campaign> {
        self.campaigns.get_mut(&id).map(|mut entry| {
            let c = &mut entry.value_mut().campaign;
            c.config = config;
            if !self.features.blacklist {
                c.config.user_blacklist = IdentifierSet::new();
            }
            c.last_updated_by = operator.to_string();
            c.updated_at = Utc::now();
            info!(id = %id, operator, "Campaign updated");
            c.clone()
        })
    }

    /// Overwrite a campaign's status. No transition rules are applied.
    pub fn change_status(&self, id: Uuid, status: CampaignStatus, operator: &str) -> Option<Campaign> {
        self.campaigns.get_mut(&id).map(|mut entry| {
            let c = &mut entry.value_mut().campaign;
            Self::set_status(c, status, operator);
            c.clone()
        })
    }

    /// Apply an operator action, refusing it when the status machine does not
    /// allow it from the current status.
    pub fn apply_status_action(&self, id: Uuid, action: StatusAction, operator: &str) -> ClarityResult<Campaign> {
        let mut entry = self.campaigns.get_mut(&id).ok_or(ClarityError::NotFound(id))?;
        let c = &mut entry.value_mut().campaign;
        let target = workflows::next_status(c.status, action)?;
        Self::set_status(c, target, operator);
        Ok(c.clone())
    }

    /// Move a campaign into review. The caller is expected to offer this only
    /// while the campaign is `PendingSubmission`; the registry does not check.
    pub fn submit_for_approval(&self, id: Uuid, operator: &str) -> ClarityResult<Campaign> {
        if !self.features.approval_workflow {
            return Err(ClarityError::FeatureDisabled("approval_workflow"));
        }
        let mut entry = self.campaigns.get_mut(&id).ok_or(ClarityError::NotFound(id))?;
        let c = &mut entry.value_mut().campaign;
        Self::set_approval(c, ApprovalStatus::UnderReview, operator);
        Ok(c.clone())
    }

    /// Apply an approval action, refusing it when the approval machine does
    /// not allow it from the current review state. The check and the write
    /// happen under the same entry lock.
    pub fn apply_approval_action(&self, id: Uuid, action: ApprovalAction, operator: &str) -> ClarityResult<Campaign> {
        if !self.features.approval_workflow {
            return Err(ClarityError::FeatureDisabled("approval_workflow"));
        }
        let mut entry = self.campaigns.get_mut(&id).ok_or(ClarityError::NotFound(id))?;
        let c = &mut entry.value_mut().campaign;
        let current = c.approval_status.unwrap_or(ApprovalStatus::PendingSubmission);
        let target = workflows::next_approval(current, action)?;
        if target != current {
            Self::set_approval(c, target, operator);
        }
        Ok(c.clone())
    }

    /// Current review state and the actions available from it.
    pub fn approval_details(&self, id: Uuid) -> ClarityResult<ApprovalDetails> {
        if !self.features.approval_workflow {
            return Err(ClarityError::FeatureDisabled("approval_workflow"));
        }
        let campaign = self.get(id).ok_or(ClarityError::NotFound(id))?;
        let approval_status = campaign
            .approval_status
            .unwrap_or(ApprovalStatus::PendingSubmission);
        Ok(ApprovalDetails {
            campaign_id: id,
            approval_status,
            label: approval_status.label(),
            actions: workflows::approval_actions(approval_status),
        })
    }

    /// Remove a campaign for good. Returns `false` if it was not present.
    pub fn delete(&self, id: Uuid, operator: &str) -> bool {
        let removed = self.campaigns.remove(&id).is_some();
        if removed {
            info!(id = %id, operator, "Campaign deleted");
        }
        removed
    }

    // ─── Internals ─────────────────────────────────────────────────────────

    fn insert(&self, campaign: Campaign) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.campaigns.insert(campaign.id, Entry { seq, campaign });
    }

    fn normalize(&self, campaign: &mut Campaign) {
        if !self.features.blacklist {
            campaign.config.user_blacklist = IdentifierSet::new();
        }
        if !self.features.approval_workflow {
            campaign.approval_status = None;
        } else if campaign.approval_status.is_none() {
            campaign.approval_status = Some(ApprovalStatus::PendingSubmission);
        }
    }

    fn set_status(campaign: &mut Campaign, status: CampaignStatus, operator: &str) {
        info!(
            id = %campaign.id,
            from = %campaign.status,
            to = %status,
            operator,
            "Campaign status changed"
        );
        campaign.status = status;
        campaign.last_updated_by = operator.to_string();
        campaign.updated_at = Utc::now();
    }

    fn set_approval(campaign: &mut Campaign, status: ApprovalStatus, operator: &str) {
        info!(
            id = %campaign.id,
            to = %status,
            operator,
            "Campaign approval status changed"
        );
        campaign.approval_status = Some(status);
        campaign.last_updated_by = operator.to_string();
        campaign.updated_at = Utc::now();
    }
}

// ─── Demo Data ─────────────────────────────────────────────────────────────

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

/// The five sample campaigns the console ships with.
pub fn demo_campaigns() -> Vec<Campaign> {
    use AudienceTarget::*;
    use FrequencyLimit::*;
    use FrequencyPeriod::*;

    let share = |percent, cap_minutes| DurationLimit::ContentShare {
        percent,
        cap_minutes,
    };
    let fixed = |minutes| DurationLimit::Fixed { minutes };

    let rows = vec![
        (
            "春节限免活动",
            (ymd(2024, 2, 1), ymd(2024, 2, 15)),
            AllNonMembers,
            "AID001\nAID002\nAID003",
            share(60, 10),
            (PerDay, Times(3)),
            CampaignStatus::Active,
            ApprovalStatus::Approved,
            "张三",
            ymd(2024, 1, 20),
        ),
        (
            "VIP专享限免",
            (ymd(2024, 3, 1), ymd(2024, 3, 31)),
            DmpSegment {
                dmp_id: Some("DMP_12345".to_string()),
            },
            "AID004\nAID005",
            fixed(30),
            (PerCampaignPeriod, Times(10)),
            CampaignStatus::Pending,
            ApprovalStatus::PendingSubmission,
            "李四",
            ymd(2024, 2, 15),
        ),
        (
            "高价值用户回馈",
            (ymd(2024, 1, 15), ymd(2024, 1, 31)),
            OfflineTag {
                tag: Some(AudienceTag::HighValue),
            },
            "AID006\nAID007\nAID008\nAID009",
            share(80, 15),
            (PerDay, Times(5)),
            CampaignStatus::Completed,
            ApprovalStatus::Approved,
            "王五",
            ymd(2024, 1, 10),
        ),
        (
            "新用户体验活动",
            (ymd(2024, 3, 15), ymd(2024, 3, 30)),
            AllUsers {
                sub_type: Some(MemberSubType::NewMember),
            },
            "AID010\nAID011",
            fixed(20),
            (PerDay, Times(2)),
            CampaignStatus::Paused,
            ApprovalStatus::UnderReview,
            "赵六",
            ymd(2024, 3, 1),
        ),
        (
            "周末特惠活动",
            (ymd(2024, 2, 10), ymd(2024, 2, 25)),
            AllNonMembers,
            "AID012\nAID013\nAID014",
            share(50, 8),
            (PerCampaignPeriod, Unlimited),
            CampaignStatus::Offline,
            ApprovalStatus::Rejected,
            "钱七",
            ymd(2024, 2, 5),
        ),
    ];

    rows.into_iter()
        .map(
            |(name, (start_date, end_date), audience, aids, duration, (period, limit), status, approval, by, created)| {
                let mut content_aids = IdentifierSet::new();
                content_aids.add_bulk(aids);
                Campaign {
                    id: Uuid::new_v4(),
                    config: CampaignConfig {
                        name: name.to_string(),
                        start_date,
                        end_date,
                        audience,
                        user_blacklist: IdentifierSet::new(),
                        content_aids,
                        duration_limit: Some(duration),
                        frequency: FrequencyRule {
                            period,
                            limit: Some(limit),
                        },
                    },
                    status,
                    approval_status: Some(approval),
                    submitted_by: by.to_string(),
                    last_updated_by: by.to_string(),
                    created_at: midnight(created),
                    updated_at: midnight(created),
                }
            },
        )
        .collect()
}
