//! Device action tools: trigger actions and set missing status.

use std::sync::Arc;

use reqwest::Method;
use rmcp::handler::server::tool::{ToolRoute, cached_schema_for_type};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domains::prey::{
    ApiResult, Session, ensure_tool_allowed, mask_sensitive, validate, wrap,
};

use super::common;

/// Parameters for triggering a device action.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeviceActionTriggerParams {
    /// ID of the device.
    #[serde(rename = "deviceId")]
    pub device_id: String,

    /// Command to execute (start).
    #[serde(default)]
    pub command: String,

    /// Action name (alarm|alert|lock).
    #[serde(default)]
    pub action_name: String,

    /// Action options.
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
}

/// Parameters for setting device missing status.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeviceStatusSetParams {
    /// ID of the device.
    #[serde(rename = "deviceId")]
    pub device_id: String,

    /// true to mark missing, false to recover.
    #[serde(default)]
    pub missing: bool,
}

/// Trigger a remote action on a device (write).
pub struct DeviceActionTriggerTool;

impl DeviceActionTriggerTool {
    pub const NAME: &'static str = "prey.devices.action.trigger";
    pub const DESCRIPTION: &'static str = "Trigger a device action (write).";

    pub async fn execute(params: &DeviceActionTriggerParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, true)?;
        validate::require_id(&params.device_id, "deviceId")?;
        validate::require_one_of(&params.command, "command", &["start"])?;
        validate::require_one_of(&params.action_name, "action_name", &["alarm", "alert", "lock"])?;

        let mut body = json!({
            "command": params.command,
            "action_name": params.action_name,
        });
        if let Some(options) = &params.options {
            body["options"] = Value::Object(options.clone());
        }

        let path = format!("/devices/{}/action", params.device_id);
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
            input_schema: cached_schema_for_type::<DeviceActionTriggerParams>(),
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
            "Triggered device action",
            |params: DeviceActionTriggerParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Mark a device as missing or recovered (write).
pub struct DeviceStatusSetTool;

impl DeviceStatusSetTool {
    pub const NAME: &'static str = "prey.devices.status.set";
    pub const DESCRIPTION: &'static str = "Set device status (write).";

    pub async fn execute(params: &DeviceStatusSetParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, true)?;
        validate::require_id(&params.device_id, "deviceId")?;

        let body = json!({"missing": params.missing});
        let path = format!("/devices/{}/missing", params.device_id);
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
            input_schema: cached_schema_for_type::<DeviceStatusSetParams>(),
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
            "Updated device status",
            |params: DeviceStatusSetParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}
