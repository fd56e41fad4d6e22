//! Zone tools: list, get, create, and update geofence zones.

use std::sync::Arc;

use reqwest::Method;
use rmcp::handler::server::tool::{ToolRoute, cached_schema_for_type};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domains::prey::{
    ApiError, ApiResult, Session, ensure_tool_allowed, mask_sensitive, pagination, validate, wrap,
};

use super::common;

/// Zone notification settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ZoneNotificationParams {
    /// on|off
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub when_in: String,

    /// on|off
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub when_out: String,
}

/// A zone trigger: an action fired when a device enters or leaves.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ZoneTriggerParams {
    /// when_in|when_out
    #[serde(default)]
    pub context: String,

    /// alarm|alert|lock|missing
    #[serde(default)]
    pub action_name: String,

    /// Action options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Map<String, Value>>,
}

/// Parameters for listing zones.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ZonesListParams {
    /// Page number (default 1).
    #[serde(default)]
    pub page: i64,

    /// Records per page (1-100, default 20).
    #[serde(default)]
    pub page_size: i64,
}

/// Parameters identifying a single zone.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ZonesGetParams {
    /// ID of the zone.
    #[serde(rename = "zoneId")]
    pub zone_id: String,
}

/// Parameters for creating a zone.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ZonesCreateParams {
    /// Zone name.
    #[serde(default)]
    pub name: String,

    /// Latitude.
    #[serde(default)]
    pub lat: Option<f64>,

    /// Longitude.
    #[serde(default)]
    pub lng: Option<f64>,

    /// Radius in meters.
    #[serde(default)]
    pub radius: Option<i64>,

    /// Hex color.
    #[serde(default)]
    pub color: Option<String>,

    /// Device IDs to assign.
    #[serde(default)]
    pub devices: Vec<String>,

    /// Zone triggers.
    #[serde(default)]
    pub actions: Vec<ZoneTriggerParams>,

    /// Notification settings.
    #[serde(default)]
    pub notifications: Option<ZoneNotificationParams>,
}

/// Parameters for updating a zone.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ZonesUpdateParams {
    /// ID of the zone.
    #[serde(rename = "zoneId", default)]
    pub zone_id: String,

    /// Zone name.
    #[serde(default)]
    pub name: Option<String>,

    /// Latitude.
    #[serde(default)]
    pub lat: Option<f64>,

    /// Longitude.
    #[serde(default)]
    pub lng: Option<f64>,

    /// Radius in meters.
    #[serde(default)]
    pub radius: Option<i64>,

    /// Hex color.
    #[serde(default)]
    pub color: Option<String>,

    /// Device IDs to add.
    #[serde(default)]
    pub add_devices: Vec<String>,

    /// Device IDs to remove.
    #[serde(default)]
    pub remove_devices: Vec<String>,

    /// Zone triggers.
    #[serde(default)]
    pub actions: Vec<ZoneTriggerParams>,

    /// Trigger contexts to remove (when_in|when_out).
    #[serde(default)]
    pub remove_actions: Vec<String>,

    /// Notification settings.
    #[serde(default)]
    pub notifications: Option<ZoneNotificationParams>,
}

fn validate_trigger(trigger: &ZoneTriggerParams) -> ApiResult<()> {
    validate::require_one_of(&trigger.context, "context", &["when_in", "when_out"])?;
    validate::require_one_of(
        &trigger.action_name,
        "action_name",
        &["alarm", "alert", "lock", "missing"],
    )?;
    Ok(())
}

fn validate_notifications(notifications: Option<&ZoneNotificationParams>) -> ApiResult<()> {
    let Some(n) = notifications else {
        return Ok(());
    };
    if !n.when_in.is_empty() {
        validate::require_one_of(&n.when_in, "when_in", &["on", "off"])?;
    }
    if !n.when_out.is_empty() {
        validate::require_one_of(&n.when_out, "when_out", &["on", "off"])?;
    }
    Ok(())
}

/// List zones in the account.
pub struct ZonesListTool;

impl ZonesListTool {
    pub const NAME: &'static str = "prey.zones.list";
    pub const DESCRIPTION: &'static str = "List zones.";

    pub async fn execute(params: &ZonesListParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        let query = pagination::add_pagination(Vec::new(), params.page, params.page_size)?;
        let req = session.client.request(Method::GET, "/zones", &query, None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        let meta = pagination::meta(params.page, params.page_size)?;
        Ok(wrap(mask_sensitive(payload), Some(meta)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ZonesListParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(session: Arc<Session>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        common::route(
            Self::to_tool(),
            session,
            "Listed zones",
            |params: ZonesListParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Get zone details by ID.
pub struct ZonesGetTool;

impl ZonesGetTool {
    pub const NAME: &'static str = "prey.zones.get";
    pub const DESCRIPTION: &'static str = "Get zone details.";

    pub async fn execute(params: &ZonesGetParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        validate::require_id(&params.zone_id, "zoneId")?;
        let path = format!("/zones/{}", params.zone_id);
        let req = session.client.request(Method::GET, &path, &[], None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ZonesGetParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(session: Arc<Session>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        common::route(
            Self::to_tool(),
            session,
            "Fetched zone details",
            |params: ZonesGetParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Create a zone (write).
pub struct ZonesCreateTool;

impl ZonesCreateTool {
    pub const NAME: &'static str = "prey.zones.create";
    pub const DESCRIPTION: &'static str = "Create a new zone (write).";

    pub async fn execute(params: &ZonesCreateParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, true)?;
        validate::require_id(&params.name, "name")?;
        validate_notifications(params.notifications.as_ref())?;
        for trigger in &params.actions {
            validate_trigger(trigger)?;
        }

        let mut body = json!({"name": params.name});
        if let Some(lat) = params.lat {
            body["lat"] = json!(lat);
        }
        if let Some(lng) = params.lng {
            body["lng"] = json!(lng);
        }
        if let Some(radius) = params.radius {
            body["radius"] = json!(radius);
        }
        if let Some(color) = &params.color {
            body["color"] = json!(color);
        }
        if !params.devices.is_empty() {
            body["devices"] = json!(params.devices);
        }
        if !params.actions.is_empty() {
            body["actions"] = serde_json::to_value(&params.actions).map_err(ApiError::Serialize)?;
        }
        if let Some(notifications) = &params.notifications {
            body["notifications"] =
                serde_json::to_value(notifications).map_err(ApiError::Serialize)?;
        }

        let req = session
            .client
            .request(Method::POST, "/zones", &[], Some(&body))?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ZonesCreateParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(session: Arc<Session>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        common::route(
            Self::to_tool(),
            session,
            "Created zone",
            |params: ZonesCreateParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Update a zone (write).
pub struct ZonesUpdateTool;

impl ZonesUpdateTool {
    pub const NAME: &'static str = "prey.zones.update";
    pub const DESCRIPTION: &'static str = "Update a zone (write).";

    pub async fn execute(params: &ZonesUpdateParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, true)?;
        validate::require_id(&params.zone_id, "zoneId")?;
        validate_notifications(params.notifications.as_ref())?;
        for trigger in &params.actions {
            validate_trigger(trigger)?;
        }
        for context in &params.remove_actions {
            validate::require_one_of(context, "remove_actions", &["when_in", "when_out"])?;
        }

        let mut body = json!({});
        if let Some(name) = &params.name {
            body["name"] = json!(name);
        }
        if let Some(lat) = params.lat {
            body["lat"] = json!(lat);
        }
        if let Some(lng) = params.lng {
            body["lng"] = json!(lng);
        }
        if let Some(radius) = params.radius {
            body["radius"] = json!(radius);
        }
        if let Some(color) = &params.color {
            body["color"] = json!(color);
        }
        if !params.add_devices.is_empty() {
            body["add_devices"] = json!(params.add_devices);
        }
        if !params.remove_devices.is_empty() {
            body["remove_devices"] = json!(params.remove_devices);
        }
        if !params.actions.is_empty() {
            body["actions"] = serde_json::to_value(&params.actions).map_err(ApiError::Serialize)?;
        }
        if !params.remove_actions.is_empty() {
            body["remove_actions"] = json!(params.remove_actions);
        }
        if let Some(notifications) = &params.notifications {
            body["notifications"] =
                serde_json::to_value(notifications).map_err(ApiError::Serialize)?;
        }

        let path = format!("/zones/{}", params.zone_id);
        let req = session
            .client
            .request(Method::PUT, &path, &[], Some(&body))?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ZonesUpdateParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(session: Arc<Session>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        common::route(
            Self::to_tool(),
            session,
            "Updated zone",
            |params: ZonesUpdateParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PreyConfig;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn writable_session(server: &MockServer) -> Session {
        Session::new(PreyConfig {
            base_url: server.uri(),
            api_key: "k3y".to_string(),
            allow_write: true,
            disable_rate_limit: true,
            ..PreyConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn create_posts_full_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/zones"))
            .and(body_json(serde_json::json!({
                "name": "office",
                "lat": 1.5,
                "lng": -2.5,
                "radius": 100,
                "devices": ["a"],
                "actions": [{"context": "when_out", "action_name": "alarm"}],
                "notifications": {"when_out": "on"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "z1"})))
            .expect(1)
            .mount(&server)
            .await;

        let session = writable_session(&server).await;
        let params = ZonesCreateParams {
            name: "office".to_string(),
            lat: Some(1.5),
            lng: Some(-2.5),
            radius: Some(100),
            devices: vec!["a".to_string()],
            actions: vec![ZoneTriggerParams {
                context: "when_out".to_string(),
                action_name: "alarm".to_string(),
                options: None,
            }],
            notifications: Some(ZoneNotificationParams {
                when_in: String::new(),
                when_out: "on".to_string(),
            }),
            ..ZonesCreateParams::default()
        };
        let envelope = ZonesCreateTool::execute(&params, &session).await.unwrap();
        assert_eq!(envelope["data"]["id"], "z1");
    }

    #[tokio::test]
    async fn create_rejects_invalid_trigger_context() {
        let server = MockServer::start().await;
        let session = writable_session(&server).await;
        let params = ZonesCreateParams {
            name: "office".to_string(),
            actions: vec![ZoneTriggerParams {
                context: "inside".to_string(),
                action_name: "alarm".to_string(),
                options: None,
            }],
            ..ZonesCreateParams::default()
        };
        let err = ZonesCreateTool::execute(&params, &session).await.unwrap_err();
        assert!(
            err.to_string()
                .contains("context must be one of: when_in|when_out")
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_invalid_notification_value() {
        let server = MockServer::start().await;
        let session = writable_session(&server).await;
        let params = ZonesCreateParams {
            name: "office".to_string(),
            notifications: Some(ZoneNotificationParams {
                when_in: "yes".to_string(),
                when_out: String::new(),
            }),
            ..ZonesCreateParams::default()
        };
        let err = ZonesCreateTool::execute(&params, &session).await.unwrap_err();
        assert!(err.to_string().contains("when_in must be one of: on|off"));
    }

    #[tokio::test]
    async fn update_sends_only_provided_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/zones/z1"))
            .and(body_json(serde_json::json!({
                "name": "hq",
                "remove_actions": ["when_in"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let session = writable_session(&server).await;
        let params = ZonesUpdateParams {
            zone_id: "z1".to_string(),
            name: Some("hq".to_string()),
            remove_actions: vec!["when_in".to_string()],
            ..ZonesUpdateParams::default()
        };
        ZonesUpdateTool::execute(&params, &session).await.unwrap();
    }

    #[tokio::test]
    async fn update_rejects_invalid_remove_action() {
        let server = MockServer::start().await;
        let session = writable_session(&server).await;
        let params = ZonesUpdateParams {
            zone_id: "z1".to_string(),
            remove_actions: vec!["always".to_string()],
            ..ZonesUpdateParams::default()
        };
        let err = ZonesUpdateTool::execute(&params, &session).await.unwrap_err();
        assert!(
            err.to_string()
                .contains("remove_actions must be one of: when_in|when_out")
        );
    }
}
