//! Campaign configuration form: owns one draft while an operator edits it.
//!
//! A form is opened either blank (create) or pre-populated from an existing
//! campaign (edit). Saving runs the validator and hands the resulting config
//! to the caller; a failed save leaves the draft as it was.

use crate::id_set::IdentifierSet;
use crate::models::*;
use crate::validation::CampaignValidator;
use chrono::NaiveDate;
use clarity_core::ValidationError;
use tracing::{debug, info};
use uuid::Uuid;

pub struct CampaignForm {
    validator: CampaignValidator,
    editing: Option<Uuid>,
    draft: CampaignDraft,
}

impl CampaignForm {
    /// Start a blank draft.
    pub fn blank(validator: CampaignValidator) -> Self {
        Self {
            validator,
            editing: None,
            draft: CampaignDraft::default(),
        }
    }

    /// Start a draft pre-populated from an existing campaign.
    pub fn edit(campaign: &Campaign, validator: CampaignValidator) -> Self {
        Self {
            validator,
            editing: Some(campaign.id),
            draft: CampaignDraft::from(campaign.config.clone()),
        }
    }

    /// Id of the campaign being edited, `None` for a new one.
    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn draft(&self) -> &CampaignDraft {
        &self.draft
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.draft.start_date = Some(date);
    }

    pub fn set_end_date(&mut self, date: NaiveDate) {
        self.draft.end_date = Some(date);
    }

    /// Pick a user type. Any refinement chosen for the previous type is
    /// cleared, even when the same type is picked again.
    pub fn select_user_type(&mut self, user_type: UserType) {
        self.draft.audience = Some(AudienceTarget::blank(user_type));
    }

    /// Set the member sub type. Ignored unless the user type is all users.
    pub fn set_member_sub_type(&mut self, sub: MemberSubType) -> bool {
        match &mut self.draft.audience {
            Some(AudienceTarget::AllUsers { sub_type }) => {
                *sub_type = Some(sub);
                true
            }
            _ => false,
        }
    }

    /// Set the DMP package id. Ignored unless the user type is DMP segment.
    pub fn set_dmp_id(&mut self, id: impl Into<String>) -> bool {
        match &mut self.draft.audience {
            Some(AudienceTarget::DmpSegment { dmp_id }) => {
                let id = id.into();
                *dmp_id = (!id.is_empty()).then_some(id);
                true
            }
            _ => false,
        }
    }

    /// Set the offline tag. Ignored unless the user type is offline tag.
    pub fn set_audience_tag(&mut self, value: AudienceTag) -> bool {
        match &mut self.draft.audience {
            Some(AudienceTarget::OfflineTag { tag }) => {
                *tag = Some(value);
                true
            }
            _ => false,
        }
    }

    pub fn content_aids(&mut self) -> &mut IdentifierSet {
        &mut self.draft.content_aids
    }

    /// The blacklist editor, when the blacklist section is enabled.
    pub fn user_blacklist(&mut self) -> Option<&mut IdentifierSet> {
        if self.validator.features().blacklist {
            Some(&mut self.draft.user_blacklist)
        } else {
            None
        }
    }

    pub fn set_duration_limit(&mut self, limit: Option<DurationLimit>) {
        self.draft.duration_limit = limit;
    }

    pub fn set_frequency(&mut self, period: FrequencyPeriod, limit: Option<FrequencyLimit>) {
        self.draft.frequency = FrequencyRule { period, limit };
    }

    /// Validate the draft and pass the config to `on_save`. On failure
    /// `on_save` is not called and the draft is unchanged.
    pub fn save<F>(&self, on_save: F) -> Result<(), ValidationError>
    where
        F: FnOnce(CampaignConfig),
    {
        match self.validator.validate(&self.draft) {
            Ok(config) => {
                info!(name = %config.name, editing = ?self.editing, "Campaign config saved");
                on_save(config);
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "Campaign config rejected");
                Err(e)
            }
        }
    }

    /// Abandon the draft.
    pub fn cancel<F>(self, on_cancel: F)
    where
        F: FnOnce(),
    {
        debug!(editing = ?self.editing, "Campaign form cancelled");
        on_cancel();
    }
}
