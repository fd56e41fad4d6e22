//! Automation tools: list and get.

use std::sync::Arc;

use reqwest::Method;
use rmcp::handler::server::tool::{ToolRoute, cached_schema_for_type};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::domains::prey::{
    ApiResult, Session, ensure_tool_allowed, mask_sensitive, pagination, validate, wrap,
};

use super::common;

/// Parameters for listing automations.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct AutomationsListParams {
    /// Page number (default 1).
    #[serde(default)]
    pub page: i64,

    /// Records per page (1-100, default 20).
    #[serde(default)]
    pub page_size: i64,
}

/// Parameters identifying a single automation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AutomationsGetParams {
    /// ID of the automation.
    #[serde(rename = "automationId")]
    pub automation_id: String,
}

/// List automations in the account.
pub struct AutomationsListTool;

impl AutomationsListTool {
    pub const NAME: &'static str = "prey.automations.list";
    pub const DESCRIPTION: &'static str = "List automations.";

    pub async fn execute(params: &AutomationsListParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        let query = pagination::add_pagination(Vec::new(), params.page, params.page_size)?;
        let req = session
            .client
            .request(Method::GET, "/automations", &query, None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        let meta = pagination::meta(params.page, params.page_size)?;
        Ok(wrap(mask_sensitive(payload), Some(meta)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<AutomationsListParams>(),
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
            "Listed automations",
            |params: AutomationsListParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Get automation details by ID.
pub struct AutomationsGetTool;

impl AutomationsGetTool {
    pub const NAME: &'static str = "prey.automations.get";
    pub const DESCRIPTION: &'static str = "Get automation details.";

    pub async fn execute(params: &AutomationsGetParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        validate::require_id(&params.automation_id, "automationId")?;
        let path = format!("/automations/{}", params.automation_id);
        let req = session.client.request(Method::GET, &path, &[], None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<AutomationsGetParams>(),
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
            "Fetched automation details",
            |params: AutomationsGetParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PreyConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn session_for(server: &MockServer) -> Session {
        Session::new(PreyConfig {
            base_url: server.uri(),
            api_key: "k3y".to_string(),
            disable_rate_limit: true,
            ..PreyConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn list_passes_explicit_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/automations"))
            .and(query_param("page", "3"))
            .and(query_param("page_size", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let session = session_for(&server).await;
        let params = AutomationsListParams {
            page: 3,
            page_size: 50,
        };
        let envelope = AutomationsListTool::execute(&params, &session).await.unwrap();
        assert_eq!(envelope["meta"]["page"], 3);
        assert_eq!(envelope["meta"]["page_size"], 50);
    }

    #[tokio::test]
    async fn get_requires_automation_id() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;
        let params = AutomationsGetParams {
            automation_id: String::new(),
        };
        let err = AutomationsGetTool::execute(&params, &session).await.unwrap_err();
        assert!(err.to_string().contains("automationId is required"));
    }
}
