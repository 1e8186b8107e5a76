//! Campaign list search and status filtering.

use crate::models::{Campaign, CampaignStatus};
use clarity_core::ParseLabelError;
use std::str::FromStr;

/// Status selector of the campaign list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CampaignStatus),
}

/// `""` and `"all"` select everything; anything else must name a status,
/// either by label (`活动中`) or wire name (`active`).
impl FromStr for StatusFilter {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl StatusFilter {
    pub fn matches(&self, status: CampaignStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

/// Search term plus status filter. A campaign matches when its name
/// contains the term (case-insensitively) and its status passes the filter.
#[derive(Debug, Clone, Default)]
pub struct CampaignQuery {
    needle: String,
    status: StatusFilter,
}

impl CampaignQuery {
    pub fn new(search: &str, status: StatusFilter) -> Self {
        Self {
            needle: search.to_lowercase(),
            status,
        }
    }

    pub fn matches(&self, campaign: &Campaign) -> bool {
        self.status.matches(campaign.status)
            && campaign.config.name.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "活动中".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(CampaignStatus::Active)
        );
        assert_eq!(
            "offline".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(CampaignStatus::Offline)
        );
        assert!("running".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_filter_matches() {
        assert!(StatusFilter::All.matches(CampaignStatus::Completed));
        let only_paused = StatusFilter::Only(CampaignStatus::Paused);
        assert!(only_paused.matches(CampaignStatus::Paused));
        assert!(!only_paused.matches(CampaignStatus::Active));
    }
}
