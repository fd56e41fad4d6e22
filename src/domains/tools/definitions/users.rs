//! User tools: list and get.

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

/// Parameters for listing users.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UsersListParams {
    /// Page number (default 1).
    #[serde(default)]
    pub page: i64,

    /// Records per page (1-100, default 20).
    #[serde(default)]
    pub page_size: i64,
}

/// Parameters for fetching a single user.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UsersGetParams {
    /// ID of the user.
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// List users in the account.
pub struct UsersListTool;

impl UsersListTool {
    pub const NAME: &'static str = "prey.users.list";
    pub const DESCRIPTION: &'static str = "List users in the account.";

    pub async fn execute(params: &UsersListParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        let query = pagination::add_pagination(Vec::new(), params.page, params.page_size)?;
        let req = session.client.request(Method::GET, "/users", &query, None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        let meta = pagination::meta(params.page, params.page_size)?;
        Ok(wrap(mask_sensitive(payload), Some(meta)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<UsersListParams>(),
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
            "Listed users",
            |params: UsersListParams, session| async move { Self::execute(&params, &session).await },
        )
    }
}

/// Get user details by ID.
pub struct UsersGetTool;

impl UsersGetTool {
    pub const NAME: &'static str = "prey.users.get";
    pub const DESCRIPTION: &'static str = "Get user details by ID.";

    pub async fn execute(params: &UsersGetParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        validate::require_id(&params.user_id, "userId")?;
        let path = format!("/users/{}", params.user_id);
        let req = session.client.request(Method::GET, &path, &[], None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<UsersGetParams>(),
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
            "Fetched user details",
            |params: UsersGetParams, session| async move { Self::execute(&params, &session).await },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PreyConfig;
    use crate::domains::prey::ApiError;
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
    async fn list_sends_normalized_pagination_and_returns_meta() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", "1"))
            .and(query_param("page_size", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let session = session_for(&server).await;
        let envelope = UsersListTool::execute(&UsersListParams::default(), &session)
            .await
            .unwrap();
        assert_eq!(envelope["meta"]["page"], 1);
        assert_eq!(envelope["meta"]["page_size"], 20);
    }

    #[tokio::test]
    async fn list_rejects_oversized_page_size() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;
        let params = UsersListParams {
            page: 1,
            page_size: 101,
        };
        let err = UsersListTool::execute(&params, &session).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_requires_user_id() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;
        let params = UsersGetParams {
            user_id: String::new(),
        };
        let err = UsersGetTool::execute(&params, &session).await.unwrap_err();
        assert!(err.to_string().contains("userId is required"));
    }
}
