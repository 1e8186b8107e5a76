//! Save-time validation of campaign drafts.

use crate::models::{CampaignConfig, CampaignDraft};
use clarity_core::config::ValidationConfig;
use clarity_core::{Features, ValidationError};
use tracing::warn;

/// Decides whether a draft may be saved and, if so, produces its config.
///
/// Checks required fields first, then content selection. Numeric ranges of
/// the trial rules and name uniqueness are not checked.
#[derive(Debug, Clone, Copy)]
pub struct CampaignValidator {
    features: Features,
    enforce_date_order: bool,
}

impl Default for CampaignValidator {
    fn default() -> Self {
        Self::new(Features::default(), &ValidationConfig::default())
    }
}

impl CampaignValidator {
    pub fn new(features: Features, validation: &ValidationConfig) -> Self {
        Self {
            features,
            enforce_date_order: validation.enforce_date_order,
        }
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn validate(&self, draft: &CampaignDraft) -> Result<CampaignConfig, ValidationError> {
        let mut missing = Vec::new();
        if draft.name.is_empty() {
            missing.push("name");
        }
        if draft.start_date.is_none() {
            missing.push("start_date");
        }
        if draft.end_date.is_none() {
            missing.push("end_date");
        }
        if draft.audience.is_none() {
            missing.push("user_type");
        }

        let (start_date, end_date, audience) = match (draft.start_date, draft.end_date, &draft.audience) {
            (Some(start), Some(end), Some(audience)) if missing.is_empty() => (start, end, audience.clone()),
            _ => return Err(ValidationError::MissingRequiredFields { fields: missing }),
        };

        if draft.content_aids.is_empty() {
            return Err(ValidationError::NoContentSelected);
        }

        if start_date > end_date {
            if self.enforce_date_order {
                return Err(ValidationError::InvalidDateRange {
                    start: start_date,
                    end: end_date,
                });
            }
            warn!(
                name = %draft.name,
                start = %start_date,
                end = %end_date,
                "Accepting campaign whose end date precedes its start date"
            );
        }

        let user_blacklist = if self.features.blacklist {
            draft.user_blacklist.clone()
        } else {
            Default::default()
        };

        Ok(CampaignConfig {
            name: draft.name.clone(),
            start_date,
            end_date,
            audience,
            user_blacklist,
            content_aids: draft.content_aids.clone(),
            duration_limit: draft.duration_limit,
            frequency: draft.frequency,
        })
    }
}
