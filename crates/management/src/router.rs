//! Console API router: mounts all campaign endpoints under /api/v1.

use crate::handlers::{self, ManagementState};
use crate::store::CampaignRegistry;
use crate::validation::CampaignValidator;
use axum::routing::{get, post};
use axum::Router;
use clarity_core::AppConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

impl ManagementState {
    /// Build state from configuration, seeding demo campaigns if enabled.
    pub fn from_config(config: &AppConfig) -> Self {
        let registry = if config.registry.seed_demo_data {
            CampaignRegistry::with_demo_data(config.features)
        } else {
            CampaignRegistry::new(config.features)
        };
        Self {
            registry: Arc::new(registry),
            validator: CampaignValidator::new(config.features, &config.validation),
            default_operator: config.registry.default_operator.clone(),
        }
    }
}

/// Build the console router over the given state.
pub fn management_router(state: ManagementState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Form
        .route("/api/v1/form/options", get(handlers::form_options))
        // Campaigns
        .route("/api/v1/campaigns", get(handlers::list_campaigns).post(handlers::create_campaign))
        .route(
            "/api/v1/campaigns/:id",
            get(handlers::get_campaign)
                .put(handlers::update_campaign)
                .delete(handlers::delete_campaign),
        )
        .route("/api/v1/campaigns/:id/pause", post(handlers::pause_campaign))
        .route("/api/v1/campaigns/:id/resume", post(handlers::resume_campaign))
        // Approval
        .route("/api/v1/campaigns/:id/submit", post(handlers::submit_campaign))
        .route("/api/v1/campaigns/:id/approval", get(handlers::approval_details))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApprovalStatus, Campaign, CampaignStatus};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use clarity_core::Features;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn demo_state() -> ManagementState {
        ManagementState::from_config(&AppConfig::default())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-operator", "tester");
        let body = match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn valid_draft() -> Value {
        json!({
            "name": "元旦限免",
            "start_date": "2025-01-01",
            "end_date": "2025-01-03",
            "audience": {"user_type": "all_users", "sub_type": "active_member"},
            "content_aids": ["AID300", "AID301", "AID300"],
            "duration_limit": {"kind": "content_share", "percent": 50, "cap_minutes": 12},
            "frequency": {"period": "daily", "limit": -1}
        })
    }

    #[tokio::test]
    async fn test_list_with_filters() {
        let app = management_router(demo_state());

        let (status, body) = send(&app, "GET", "/api/v1/campaigns", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);

        let uri = "/api/v1/campaigns?search=%E9%99%90%E5%85%8D&status=active";
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["春节限免活动"]);

        let (status, body) = send(&app, "GET", "/api/v1/campaigns?status=bogus", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_filter");
    }

    #[tokio::test]
    async fn test_create_validates_draft() {
        let state = ManagementState::from_config(&AppConfig {
            registry: clarity_core::config::RegistryConfig {
                seed_demo_data: false,
                default_operator: "admin".into(),
            },
            ..AppConfig::default()
        });
        let registry = state.registry.clone();
        let app = management_router(state);

        let (status, body) = send(&app, "POST", "/api/v1/campaigns", Some(json!({"name": "空活动"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "missing_required_fields");
        assert_eq!(body["message"], "请填写所有必填字段");
        assert!(registry.is_empty());

        let mut no_content = valid_draft();
        no_content["content_aids"] = json!([]);
        let (status, body) = send(&app, "POST", "/api/v1/campaigns", Some(no_content)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "no_content_selected");
        assert!(registry.is_empty());

        let (status, body) = send(&app, "POST", "/api/v1/campaigns", Some(valid_draft())).await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Campaign = serde_json::from_value(body).unwrap();
        assert_eq!(created.status, CampaignStatus::Pending);
        assert_eq!(created.approval_status, Some(ApprovalStatus::PendingSubmission));
        assert_eq!(created.submitted_by, "tester");
        assert_eq!(created.config.content_aids.len(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_null_and_blank_fields_reach_validation() {
        let state = demo_state();
        let registry = state.registry.clone();
        let app = management_router(state);

        for field in ["name", "start_date", "end_date"] {
            for blank in [Value::Null, json!("")] {
                let mut draft = valid_draft();
                draft[field] = blank;
                let (status, body) = send(&app, "POST", "/api/v1/campaigns", Some(draft)).await;
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{field}");
                assert_eq!(body["error"], "missing_required_fields", "{field}");
                assert_eq!(body["message"], "请填写所有必填字段", "{field}");
            }
        }

        let mut draft = valid_draft();
        draft["content_aids"] = Value::Null;
        draft["user_blacklist"] = Value::Null;
        let (status, body) = send(&app, "POST", "/api/v1/campaigns", Some(draft)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "no_content_selected");
        assert_eq!(body["message"], "请至少添加一个AID");
        assert_eq!(registry.len(), 5);

        let mut draft = valid_draft();
        draft["duration_limit"] = json!("min [60%稿件时长, 10分钟]");
        let (status, body) = send(&app, "POST", "/api/v1/campaigns", Some(draft)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["duration_limit"], json!({"kind": "content_share", "percent": 60, "cap_minutes": 10}));

        let mut draft = valid_draft();
        draft["start_date"] = json!("not a date");
        let (status, body) = send(&app, "POST", "/api/v1/campaigns", Some(draft)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "invalid_body");
        assert_eq!(registry.len(), 6);
    }

    #[tokio::test]
    async fn test_status_and_approval_flow() {
        let state = demo_state();
        let registry = state.registry.clone();
        let app = management_router(state);
        let id = registry.list("VIP", Default::default())[0].id;

        // Pending campaigns cannot be paused.
        let (status, _) = send(&app, "POST", &format!("/api/v1/campaigns/{id}/pause"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&app, "POST", &format!("/api/v1/campaigns/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["approval_status"], "under_review");

        let (status, _) = send(&app, "POST", &format!("/api/v1/campaigns/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&app, "GET", &format!("/api/v1/campaigns/{id}/approval"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["actions"], json!(["view_details"]));

        registry.change_status(id, CampaignStatus::Active, "ops");
        let (status, body) = send(&app, "POST", &format!("/api/v1/campaigns/{id}/pause"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "paused");
        let (status, body) = send(&app, "POST", &format!("/api/v1/campaigns/{id}/resume"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "active");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let state = demo_state();
        let registry = state.registry.clone();
        let app = management_router(state);
        let id = registry.list("春节", Default::default())[0].id;

        let (status, body) = send(&app, "PUT", &format!("/api/v1/campaigns/{id}"), Some(valid_draft())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "元旦限免");
        assert_eq!(body["status"], "active");
        assert_eq!(body["last_updated_by"], "tester");

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/campaigns/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &format!("/api/v1/campaigns/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", &format!("/api/v1/campaigns/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_approval_routes_hidden_without_workflow() {
        let state = ManagementState::from_config(&AppConfig {
            features: Features::minimal(),
            ..AppConfig::default()
        });
        let registry = state.registry.clone();
        let app = management_router(state);
        let id = registry.list("", Default::default())[0].id;

        let (status, body) = send(&app, "POST", &format!("/api/v1/campaigns/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "feature_disabled");

        let (status, body) = send(&app, "GET", "/api/v1/form/options", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["features"]["approval_workflow"], false);
        assert!(body.get("approval_statuses").is_none());
        assert_eq!(body["user_types"][2]["label"], "DMP指定人群包");
    }
}
