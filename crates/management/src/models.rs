//! Campaign domain types: trial configuration, audience targeting, lifecycle
//! states, and API request/response shapes.

use crate::id_set::IdentifierSet;
use crate::workflows::{ApprovalAction, StatusAction};
use chrono::{DateTime, NaiveDate, Utc};
use clarity_core::{Features, ParseLabelError};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Gives a closed vocabulary its zh-CN display label, its wire name, and a
/// `FromStr` accepting either.
macro_rules! vocabulary {
    ($ty:ident, $kind:literal, { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }

            pub fn wire_name(self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = ParseLabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label() == s || v.wire_name() == s)
                    .ok_or_else(|| ParseLabelError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

// ─── Lifecycle ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Pending,
    Active,
    Paused,
    Offline,
    Completed,
}

vocabulary!(CampaignStatus, "campaign status", {
    Pending => ("pending", "待开始"),
    Active => ("active", "活动中"),
    Paused => ("paused", "已暂停"),
    Offline => ("offline", "已下线"),
    Completed => ("completed", "已完成"),
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    PendingSubmission,
    UnderReview,
    Approved,
    Rejected,
}

vocabulary!(ApprovalStatus, "approval status", {
    PendingSubmission => ("pending_submission", "待提交审核"),
    UnderReview => ("under_review", "审核中"),
    Approved => ("approved", "审核通过"),
    Rejected => ("rejected", "已驳回"),
});

// ─── Audience targeting ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    AllUsers,
    AllNonMembers,
    DmpSegment,
    OfflineTag,
}

vocabulary!(UserType, "user type", {
    AllUsers => ("all_users", "全部用户"),
    AllNonMembers => ("all_non_members", "全部非会员"),
    DmpSegment => ("dmp_segment", "DMP指定人群包"),
    OfflineTag => ("offline_tag", "离线人群标签"),
});

/// Refinement of [`UserType::AllUsers`] by membership state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MemberSubType {
    NewMember,
    ReturningMember,
    ExpiringMember,
    ActiveMember,
}

vocabulary!(MemberSubType, "member sub type", {
    NewMember => ("new_member", "会员新客"),
    ReturningMember => ("returning_member", "会员老客"),
    ExpiringMember => ("expiring_member", "即期会员"),
    ActiveMember => ("active_member", "在期会员"),
});

/// Precomputed offline audience labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AudienceTag {
    HighValue,
    Active,
    Churned,
    NewlyRegistered,
    Paying,
}

vocabulary!(AudienceTag, "audience tag", {
    HighValue => ("high_value", "高价值用户"),
    Active => ("active", "活跃用户"),
    Churned => ("churned", "流失用户"),
    NewlyRegistered => ("newly_registered", "新注册用户"),
    Paying => ("paying", "付费用户"),
});

/// Who a campaign targets. Each user type carries only the refinement that
/// applies to it; the refinement itself may still be unselected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum AudienceTarget {
    AllUsers {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sub_type: Option<MemberSubType>,
    },
    AllNonMembers,
    DmpSegment {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dmp_id: Option<String>,
    },
    OfflineTag {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<AudienceTag>,
    },
}

impl AudienceTarget {
    /// A target of the given type with its refinement cleared.
    pub fn blank(user_type: UserType) -> Self {
        match user_type {
            UserType::AllUsers => AudienceTarget::AllUsers { sub_type: None },
            UserType::AllNonMembers => AudienceTarget::AllNonMembers,
            UserType::DmpSegment => AudienceTarget::DmpSegment { dmp_id: None },
            UserType::OfflineTag => AudienceTarget::OfflineTag { tag: None },
        }
    }

    pub fn user_type(&self) -> UserType {
        match self {
            AudienceTarget::AllUsers { .. } => UserType::AllUsers,
            AudienceTarget::AllNonMembers => UserType::AllNonMembers,
            AudienceTarget::DmpSegment { .. } => UserType::DmpSegment,
            AudienceTarget::OfflineTag { .. } => UserType::OfflineTag,
        }
    }
}

impl fmt::Display for AudienceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_type().label())?;
        match self {
            AudienceTarget::AllUsers { sub_type: Some(sub) } => write!(f, " - {sub}"),
            AudienceTarget::DmpSegment { dmp_id: Some(id) } => write!(f, " (DMP ID: {id})"),
            AudienceTarget::OfflineTag { tag: Some(tag) } => write!(f, " - {tag}"),
            _ => Ok(()),
        }
    }
}

// ─── Trial rules ───────────────────────────────────────────────────────────

/// How long a single free high-definition session may last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DurationLimit {
    /// A fixed number of minutes.
    Fixed { minutes: u32 },
    /// A share of the content's length, capped at `cap_minutes`.
    ContentShare { percent: u8, cap_minutes: u32 },
}

impl fmt::Display for DurationLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationLimit::Fixed { minutes } => write!(f, "{minutes}分钟"),
            DurationLimit::ContentShare {
                percent,
                cap_minutes,
            } => write!(f, "min [{percent}%稿件时长, {cap_minutes}分钟]"),
        }
    }
}

fn parse_minutes(s: &str) -> Option<u32> {
    let s = s.trim();
    s.strip_suffix("分钟").unwrap_or(s).trim().parse().ok()
}

fn parse_content_share(inner: &str) -> Option<DurationLimit> {
    let (share, cap) = inner.split_once(',')?;
    let percent: u8 = share
        .trim()
        .strip_suffix("稿件时长")?
        .trim()
        .strip_suffix('%')?
        .trim()
        .parse()
        .ok()?;
    if percent > 100 {
        return None;
    }
    Some(DurationLimit::ContentShare {
        percent,
        cap_minutes: parse_minutes(cap)?,
    })
}

/// Accepts the display forms: `"30分钟"`, `"30"` and
/// `"min [60%稿件时长, 10分钟]"`.
impl FromStr for DurationLimit {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("min")
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix('['))
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Some(inner) => parse_content_share(inner),
            None => parse_minutes(trimmed).map(|minutes| DurationLimit::Fixed { minutes }),
        };
        parsed.ok_or_else(|| ParseLabelError {
            kind: "duration limit",
            value: trimmed.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FrequencyPeriod {
    #[default]
    #[serde(rename = "daily")]
    PerDay,
    #[serde(rename = "campaign")]
    PerCampaignPeriod,
}

vocabulary!(FrequencyPeriod, "frequency period", {
    PerDay => ("daily", "次/天"),
    PerCampaignPeriod => ("campaign", "活动周期内"),
});

/// Number of trials allowed per period. Travels as an integer where `-1`
/// means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum FrequencyLimit {
    Unlimited,
    Times(u32),
}

impl From<FrequencyLimit> for i64 {
    fn from(limit: FrequencyLimit) -> Self {
        match limit {
            FrequencyLimit::Unlimited => -1,
            FrequencyLimit::Times(n) => i64::from(n),
        }
    }
}

impl TryFrom<i64> for FrequencyLimit {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(FrequencyLimit::Unlimited),
            n => u32::try_from(n)
                .map(FrequencyLimit::Times)
                .map_err(|_| format!("frequency value must be -1 or a non-negative count, got {n}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRule {
    #[serde(default)]
    pub period: FrequencyPeriod,
    #[serde(default)]
    pub limit: Option<FrequencyLimit>,
}

impl fmt::Display for FrequencyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.limit, self.period) {
            (None, _) => f.write_str("-"),
            (Some(FrequencyLimit::Unlimited), _) => f.write_str("不限次数"),
            (Some(FrequencyLimit::Times(n)), FrequencyPeriod::PerDay) => write!(f, "{n}次/天"),
            (Some(FrequencyLimit::Times(n)), FrequencyPeriod::PerCampaignPeriod) => {
                write!(f, "{n}次/活动周期内")
            }
        }
    }
}

// ─── Campaign config ───────────────────────────────────────────────────────

/// A validated campaign configuration, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub audience: AudienceTarget,
    #[serde(default, skip_serializing_if = "IdentifierSet::is_empty")]
    pub user_blacklist: IdentifierSet,
    pub content_aids: IdentifierSet,
    #[serde(default)]
    pub duration_limit: Option<DurationLimit>,
    #[serde(default)]
    pub frequency: FrequencyRule,
}

/// An in-progress configuration. Every field may still be unset.
///
/// Deserialization is lenient so that incomplete input reaches validation:
/// `null` reads as unset, blank dates read as `None`, and the duration limit
/// also accepts its display text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "blank_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub audience: Option<AudienceTarget>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_blacklist: IdentifierSet,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_aids: IdentifierSet,
    #[serde(default, deserialize_with = "duration_input")]
    pub duration_limit: Option<DurationLimit>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub frequency: FrequencyRule,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DurationInput {
    Text(String),
    Rule(DurationLimit),
}

fn duration_input<'de, D>(deserializer: D) -> Result<Option<DurationLimit>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<DurationInput>::deserialize(deserializer)? {
        Some(DurationInput::Text(s)) if !s.trim().is_empty() => s.parse().map(Some).map_err(de::Error::custom),
        Some(DurationInput::Rule(rule)) => Ok(Some(rule)),
        _ => Ok(None),
    }
}

impl From<CampaignConfig> for CampaignDraft {
    fn from(config: CampaignConfig) -> Self {
        Self {
            name: config.name,
            start_date: Some(config.start_date),
            end_date: Some(config.end_date),
            audience: Some(config.audience),
            user_blacklist: config.user_blacklist,
            content_aids: config.content_aids,
            duration_limit: config.duration_limit,
            frequency: config.frequency,
        }
    }
}

// ─── Campaign record ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    #[serde(flatten)]
    pub config: CampaignConfig,
    pub status: CampaignStatus,
    /// Absent when the approval workflow is switched off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    pub submitted_by: String,
    pub last_updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─── API Request/Response types ────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ApprovalDetails {
    pub campaign_id: Uuid,
    pub approval_status: ApprovalStatus,
    pub label: &'static str,
    pub actions: Vec<ApprovalAction>,
}

/// One selectable value of a vocabulary, as shown in the form.
#[derive(Debug, Clone, Serialize)]
pub struct OptionItem {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub actions: Vec<StatusAction>,
}

#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub features: Features,
    pub user_types: Vec<OptionItem>,
    pub member_sub_types: Vec<OptionItem>,
    pub audience_tags: Vec<OptionItem>,
    pub frequency_periods: Vec<OptionItem>,
    pub statuses: Vec<StatusOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub approval_statuses: Vec<OptionItem>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
