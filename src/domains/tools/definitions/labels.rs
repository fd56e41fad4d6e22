//! Label tools: list, get, and create.

use std::sync::Arc;

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

/// Parameters for listing labels.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct LabelsListParams {
    /// Page number (default 1).
    #[serde(default)]
    pub page: i64,

    /// Records per page (1-100, default 20).
    #[serde(default)]
    pub page_size: i64,
}

/// Parameters identifying a single label.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LabelsGetParams {
    /// ID of the label.
    #[serde(rename = "labelId")]
    pub label_id: String,
}

/// Parameters for creating a label.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LabelsCreateParams {
    /// Label name.
    #[serde(default)]
    pub name: String,

    /// Device IDs to assign.
    #[serde(default)]
    pub devices: Vec<String>,
}

/// List labels in the account.
pub struct LabelsListTool;

impl LabelsListTool {
    pub const NAME: &'static str = "prey.labels.list";
    pub const DESCRIPTION: &'static str = "List labels.";

    pub async fn execute(params: &LabelsListParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        let query = pagination::add_pagination(Vec::new(), params.page, params.page_size)?;
        let req = session.client.request(Method::GET, "/labels", &query, None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        let meta = pagination::meta(params.page, params.page_size)?;
        Ok(wrap(mask_sensitive(payload), Some(meta)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LabelsListParams>(),
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
            "Listed labels",
            |params: LabelsListParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Get label details by ID.
pub struct LabelsGetTool;

impl LabelsGetTool {
    pub const NAME: &'static str = "prey.labels.get";
    pub const DESCRIPTION: &'static str = "Get label details.";

    pub async fn execute(params: &LabelsGetParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        validate::require_id(&params.label_id, "labelId")?;
        let path = format!("/labels/{}", params.label_id);
        let req = session.client.request(Method::GET, &path, &[], None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LabelsGetParams>(),
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
            "Fetched label details",
            |params: LabelsGetParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Create a label (write).
pub struct LabelsCreateTool;

impl LabelsCreateTool {
    pub const NAME: &'static str = "prey.labels.create";
    pub const DESCRIPTION: &'static str = "Create a new label (write).";

    pub async fn execute(params: &LabelsCreateParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, true)?;
        validate::require_id(&params.name, "name")?;

        let mut body = json!({"name": params.name});
        if !params.devices.is_empty() {
            body["devices"] = json!(params.devices);
        }

        let req = session
            .client
            .request(Method::POST, "/labels", &[], Some(&body))?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LabelsCreateParams>(),
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
            "Created label",
            |params: LabelsCreateParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}
