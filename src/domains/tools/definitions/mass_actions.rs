//! Mass action tools: list and get.

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

/// Parameters for listing mass actions.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct MassActionsListParams {
    /// Page number (default 1).
    #[serde(default)]
    pub page: i64,

    /// Records per page (1-100, default 20).
    #[serde(default)]
    pub page_size: i64,
}

/// Parameters identifying a single mass action.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MassActionsGetParams {
    /// ID of the mass action.
    #[serde(rename = "massActionId")]
    pub mass_action_id: String,
}

/// List mass actions in the account.
pub struct MassActionsListTool;

impl MassActionsListTool {
    pub const NAME: &'static str = "prey.mass_actions.list";
    pub const DESCRIPTION: &'static str = "List mass actions.";

    pub async fn execute(params: &MassActionsListParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        let query = pagination::add_pagination(Vec::new(), params.page, params.page_size)?;
        let req = session
            .client
            .request(Method::GET, "/mass_actions", &query, None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        let meta = pagination::meta(params.page, params.page_size)?;
        Ok(wrap(mask_sensitive(payload), Some(meta)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<MassActionsListParams>(),
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
            "Listed mass actions",
            |params: MassActionsListParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

/// Get mass action details by ID.
pub struct MassActionsGetTool;

impl MassActionsGetTool {
    pub const NAME: &'static str = "prey.mass_actions.get";
    pub const DESCRIPTION: &'static str = "Get mass action details.";

    pub async fn execute(params: &MassActionsGetParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        validate::require_id(&params.mass_action_id, "massActionId")?;
        let path = format!("/mass_actions/{}", params.mass_action_id);
        let req = session.client.request(Method::GET, &path, &[], None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<MassActionsGetParams>(),
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
            "Fetched mass action details",
            |params: MassActionsGetParams, session| async move {
                Self::execute(&params, &session).await
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PreyConfig;
    use wiremock::matchers::{method, path};
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
    async fn get_fetches_mass_action_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mass_actions/m1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "m1", "token": "abc"
            })))
            .mount(&server)
            .await;

        let session = session_for(&server).await;
        let params = MassActionsGetParams {
            mass_action_id: "m1".to_string(),
        };
        let envelope = MassActionsGetTool::execute(&params, &session).await.unwrap();
        assert_eq!(envelope["data"]["id"], "m1");
        assert_eq!(envelope["data"]["token"], "***");
    }

    #[tokio::test]
    async fn get_requires_mass_action_id() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;
        let params = MassActionsGetParams {
            mass_action_id: String::new(),
        };
        let err = MassActionsGetTool::execute(&params, &session).await.unwrap_err();
        assert!(err.to_string().contains("massActionId is required"));
    }
}
