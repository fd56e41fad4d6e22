//! Device tools: list, get, delete, reports, and location history.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Method;
use rmcp::handler::server::tool::{ToolRoute, cached_schema_for_type};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domains::prey::{
    ApiResult, Session, ensure_tool_allowed, mask_sensitive, pagination, validate, wrap,
};

use super::common;

/// Parameters for listing devices.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DevicesListParams {
    /// Page number (default 1).
    #[serde(default)]
    pub page: i64,

    /// Records per page (1-100, default 20).
    #[serde(default)]
    pub page_size: i64,
}

/// Parameters identifying a single device.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DevicesGetParams {
    /// ID of the device.
    #[serde(rename = "deviceId")]
    pub device_id: String,
}

/// Parameters for listing reports of a device.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DevicesReportsListParams {
    /// ID of the device.
    #[serde(rename = "deviceId")]
    pub device_id: String,

    /// Page number (default 1).
    #[serde(default)]
    pub page: i64,

    /// Records per page (1-100, default 20).
    #[serde(default)]
    pub page_size: i64,
}

/// Parameters for fetching a single device report.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DevicesReportsGetParams {
    /// ID of the device.
    #[serde(rename = "deviceId")]
    pub device_id: String,

    /// ID of the report.
    #[serde(rename = "reportId")]
    pub report_id: String,
}

/// Parameters for fetching device location history.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DevicesLocationHistoryParams {
    /// ID of the device.
    #[serde(rename = "deviceId")]
    pub device_id: String,

    /// Response format: "json" (default) or "csv".
    #[serde(default)]
    pub format: String,
}

/// List devices in the account.
pub struct DevicesListTool;

impl DevicesListTool {
    pub const NAME: &'static str = "prey.devices.list";
    pub const DESCRIPTION: &'static str = "List devices in the account.";

    pub async fn execute(params: &DevicesListParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        let query = pagination::add_pagination(Vec::new(), params.page, params.page_size)?;
        let req = session.client.request(Method::GET, "/devices", &query, None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        let meta = pagination::meta(params.page, params.page_size)?;
        Ok(wrap(mask_sensitive(payload), Some(meta)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DevicesListParams>(),
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
            "Listed devices",
            |params: DevicesListParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Get device details by ID.
pub struct DevicesGetTool;

impl DevicesGetTool {
    pub const NAME: &'static str = "prey.devices.get";
    pub const DESCRIPTION: &'static str = "Get device details by ID.";

    pub async fn execute(params: &DevicesGetParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        validate::require_id(&params.device_id, "deviceId")?;
        let path = format!("/devices/{}", params.device_id);
        let req = session.client.request(Method::GET, &path, &[], None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DevicesGetParams>(),
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
            "Fetched device details",
            |params: DevicesGetParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Delete a device (write).
pub struct DevicesDeleteTool;

impl DevicesDeleteTool {
    pub const NAME: &'static str = "prey.devices.delete";
    pub const DESCRIPTION: &'static str = "Delete a device (write).";

    pub async fn execute(params: &DevicesGetParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, true)?;
        validate::require_id(&params.device_id, "deviceId")?;
        let path = format!("/devices/{}", params.device_id);
        let req = session.client.request(Method::DELETE, &path, &[], None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DevicesGetParams>(),
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
            "Deleted device",
            |params: DevicesGetParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// List reports for a device.
pub struct DevicesReportsListTool;

impl DevicesReportsListTool {
    pub const NAME: &'static str = "prey.devices.reports.list";
    pub const DESCRIPTION: &'static str = "List reports for a device.";

    pub async fn execute(params: &DevicesReportsListParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        validate::require_id(&params.device_id, "deviceId")?;
        let query = pagination::add_pagination(Vec::new(), params.page, params.page_size)?;
        let path = format!("/devices/{}/reports", params.device_id);
        let req = session.client.request(Method::GET, &path, &query, None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        let meta = pagination::meta(params.page, params.page_size)?;
        Ok(wrap(mask_sensitive(payload), Some(meta)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DevicesReportsListParams>(),
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
            "Listed device reports",
            |params: DevicesReportsListParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Get a device report by ID.
pub struct DevicesReportsGetTool;

impl DevicesReportsGetTool {
    pub const NAME: &'static str = "prey.devices.reports.get";
    pub const DESCRIPTION: &'static str = "Get a device report by ID.";

    pub async fn execute(params: &DevicesReportsGetParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        validate::require_id(&params.device_id, "deviceId")?;
        validate::require_id(&params.report_id, "reportId")?;
        let path = format!("/devices/{}/reports/{}", params.device_id, params.report_id);
        let req = session.client.request(Method::GET, &path, &[], None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DevicesReportsGetParams>(),
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
            "Fetched device report",
            |params: DevicesReportsGetParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Get device location history (JSON or CSV).
pub struct DevicesLocationHistoryTool;

impl DevicesLocationHistoryTool {
    pub const NAME: &'static str = "prey.devices.location_history.get";
    pub const DESCRIPTION: &'static str = "Get device location history (JSON or CSV).";

    pub async fn execute(
        params: &DevicesLocationHistoryParams,
        session: &Session,
    ) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        validate::require_id(&params.device_id, "deviceId")?;

        let format = params.format.trim().to_lowercase();
        if format == "csv" {
            let path = format!("/devices/{}/location_activity.csv", params.device_id);
            let req = session.client.request(Method::GET, &path, &[], None)?;
            let (bytes, content_type) = session.client.dispatch_raw(req).await?;
            return Ok(wrap(
                json!({
                    "content_type": content_type,
                    "base64": BASE64.encode(&bytes),
                }),
                None,
            ));
        }

        let path = format!("/devices/{}/location_activity", params.device_id);
        let req = session.client.request(Method::GET, &path, &[], None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DevicesLocationHistoryParams>(),
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
            "Fetched device location history",
            |params: DevicesLocationHistoryParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PreyConfig;
    use crate::domains::prey::ApiError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> PreyConfig {
        PreyConfig {
            base_url: server.uri(),
            api_key: "k3y".to_string(),
            disable_rate_limit: true,
            ..PreyConfig::default()
        }
    }

    async fn session_for(server: &MockServer) -> Session {
        Session::new(config_for(server)).unwrap()
    }

    #[tokio::test]
    async fn get_masks_sensitive_fields_in_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "42", "name": "x", "password": "hunter2"
            })))
            .mount(&server)
            .await;

        let session = session_for(&server).await;
        let params = DevicesGetParams {
            device_id: "42".to_string(),
        };
        let envelope = DevicesGetTool::execute(&params, &session).await.unwrap();
        assert_eq!(
            envelope,
            serde_json::json!({"data": {"id": "42", "name": "x", "password": "***"}})
        );
    }

    #[tokio::test]
    async fn get_with_empty_key_fails_before_any_request() {
        let server = MockServer::start().await;
        let mut config = config_for(&server);
        config.api_key = String::new();
        let session = Session::new(config).unwrap();

        let params = DevicesGetParams {
            device_id: "42".to_string(),
        };
        let err = DevicesGetTool::execute(&params, &session).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingApiKey));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_404_surfaces_status_and_discards_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices/42"))
            .respond_with(ResponseTemplate::new(404).set_body_string("secret details"))
            .mount(&server)
            .await;

        let session = session_for(&server).await;
        let params = DevicesGetParams {
            device_id: "42".to_string(),
        };
        let err = DevicesGetTool::execute(&params, &session).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(!msg.contains("secret details"));
    }

    #[tokio::test]
    async fn delete_requires_write_permission() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;
        let params = DevicesGetParams {
            device_id: "42".to_string(),
        };
        let err = DevicesDeleteTool::execute(&params, &session).await.unwrap_err();
        assert!(matches!(err, ApiError::WriteDisabled));
    }

    #[tokio::test]
    async fn location_history_csv_returns_base64_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices/42/location_activity.csv"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("lat,lng\n1,2\n", "text/csv"),
            )
            .mount(&server)
            .await;

        let session = session_for(&server).await;
        let params = DevicesLocationHistoryParams {
            device_id: "42".to_string(),
            format: "CSV ".to_string(),
        };
        let envelope = DevicesLocationHistoryTool::execute(&params, &session)
            .await
            .unwrap();
        assert_eq!(envelope["data"]["content_type"], "text/csv");
        assert_eq!(envelope["data"]["base64"], BASE64.encode(b"lat,lng\n1,2\n"));
    }

    #[tokio::test]
    async fn location_history_defaults_to_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices/42/location_activity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": 1.0, "lng": 2.0}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let session = session_for(&server).await;
        let params = DevicesLocationHistoryParams {
            device_id: "42".to_string(),
            format: String::new(),
        };
        let envelope = DevicesLocationHistoryTool::execute(&params, &session)
            .await
            .unwrap();
        assert_eq!(envelope["data"][0]["lat"], 1.0);
    }
}
