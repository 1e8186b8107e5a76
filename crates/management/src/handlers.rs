//! Axum REST handlers for the campaign console API.

use crate::filter::StatusFilter;
use crate::models::*;
use crate::store::CampaignRegistry;
use crate::validation::CampaignValidator;
use crate::workflows::{self, ApprovalAction, StatusAction};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use clarity_core::{ClarityError, ParseLabelError, ValidationError};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Header naming the operator behind a mutation.
pub const OPERATOR_HEADER: &str = "x-operator";

/// Shared console state.
#[derive(Clone)]
pub struct ManagementState {
    pub registry: Arc<CampaignRegistry>,
    pub validator: CampaignValidator,
    pub default_operator: String,
}

impl ManagementState {
    fn operator(&self, headers: &HeaderMap) -> String {
        headers
            .get(OPERATOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.default_operator.clone())
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

fn validation_error(err: ValidationError) -> ApiError {
    api_error(StatusCode::UNPROCESSABLE_ENTITY, err.code(), err.notice())
}

fn bad_filter(err: ParseLabelError) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "invalid_filter", err.to_string())
}

fn not_found(id: Uuid) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", format!("Campaign not found: {id}"))
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    api_error(rejection.status(), "invalid_body", rejection.body_text())
}

fn clarity_error(err: ClarityError) -> ApiError {
    match err {
        ClarityError::Validation(e) => validation_error(e),
        ClarityError::NotFound(id) => not_found(id),
        err @ ClarityError::InvalidTransition { .. } => {
            api_error(StatusCode::CONFLICT, "invalid_transition", err.to_string())
        }
        err @ ClarityError::FeatureDisabled(_) => {
            api_error(StatusCode::NOT_FOUND, "feature_disabled", err.to_string())
        }
        err @ ClarityError::Config(_) => {
            warn!(error = %err, "Unhandled console error");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", err.to_string())
        }
    }
}

// ─── Health ────────────────────────────────────────────────────────────────

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ─── Form ──────────────────────────────────────────────────────────────────

fn options<T: Copy>(all: &[T], value: fn(T) -> &'static str, label: fn(T) -> &'static str) -> Vec<OptionItem> {
    all.iter()
        .map(|v| OptionItem {
            value: value(*v),
            label: label(*v),
        })
        .collect()
}

pub async fn form_options(State(state): State<ManagementState>) -> Json<FormOptions> {
    let features = state.registry.features();
    let approval_statuses = if features.approval_workflow {
        options(ApprovalStatus::ALL, ApprovalStatus::wire_name, ApprovalStatus::label)
    } else {
        Vec::new()
    };
    Json(FormOptions {
        features,
        user_types: options(UserType::ALL, UserType::wire_name, UserType::label),
        member_sub_types: options(MemberSubType::ALL, MemberSubType::wire_name, MemberSubType::label),
        audience_tags: options(AudienceTag::ALL, AudienceTag::wire_name, AudienceTag::label),
        frequency_periods: options(FrequencyPeriod::ALL, FrequencyPeriod::wire_name, FrequencyPeriod::label),
        statuses: CampaignStatus::ALL
            .iter()
            .map(|s| StatusOption {
                value: s.wire_name(),
                label: s.label(),
                actions: workflows::status_actions(*s),
            })
            .collect(),
        approval_statuses,
    })
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

pub async fn list_campaigns(
    State(state): State<ManagementState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Campaign>>, ApiError> {
    let status: StatusFilter = query.status.parse().map_err(bad_filter)?;
    Ok(Json(state.registry.list(&query.search, status)))
}

pub async fn get_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError> {
    state.registry.get(id).map(Json).ok_or_else(|| not_found(id))
}

pub async fn create_campaign(
    State(state): State<ManagementState>,
    headers: HeaderMap,
    body: Result<Json<CampaignDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    let Json(draft) = body.map_err(bad_body)?;
    let config = state.validator.validate(&draft).map_err(|e| {
        metrics::counter!("console.campaigns.rejected").increment(1);
        validation_error(e)
    })?;
    let campaign = state.registry.create(config, &state.operator(&headers));
    metrics::counter!("console.campaigns.created").increment(1);
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn update_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Result<Json<CampaignDraft>, JsonRejection>,
) -> Result<Json<Campaign>, ApiError> {
    let Json(draft) = body.map_err(bad_body)?;
    let config = state.validator.validate(&draft).map_err(validation_error)?;
    let campaign = state
        .registry
        .update(id, config, &state.operator(&headers))
        .ok_or_else(|| not_found(id))?;
    metrics::counter!("console.campaigns.updated").increment(1);
    Ok(Json(campaign))
}

pub async fn delete_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> StatusCode {
    if state.registry.delete(id, &state.operator(&headers)) {
        metrics::counter!("console.campaigns.deleted").increment(1);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn apply_status_action(
    state: ManagementState,
    id: Uuid,
    action: StatusAction,
    headers: HeaderMap,
) -> Result<Json<Campaign>, ApiError> {
    state
        .registry
        .apply_status_action(id, action, &state.operator(&headers))
        .map(Json)
        .map_err(clarity_error)
}

pub async fn pause_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Campaign>, ApiError> {
    let campaign = apply_status_action(state, id, StatusAction::Pause, headers).await?;
    metrics::counter!("console.campaigns.paused").increment(1);
    Ok(campaign)
}

pub async fn resume_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Campaign>, ApiError> {
    let campaign = apply_status_action(state, id, StatusAction::Resume, headers).await?;
    metrics::counter!("console.campaigns.resumed").increment(1);
    Ok(campaign)
}

// ─── Approval ──────────────────────────────────────────────────────────────

pub async fn submit_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Campaign>, ApiError> {
    let campaign = state
        .registry
        .apply_approval_action(id, ApprovalAction::Submit, &state.operator(&headers))
        .map_err(clarity_error)?;
    metrics::counter!("console.campaigns.submitted").increment(1);
    Ok(Json(campaign))
}

pub async fn approval_details(
    State(state): State<ManagementState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApprovalDetails>, ApiError> {
    state.registry.approval_details(id).map(Json).map_err(clarity_error)
}
