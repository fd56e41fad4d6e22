//! Account tools.

use std::sync::Arc;

use reqwest::Method;
use rmcp::handler::server::tool::{ToolRoute, cached_schema_for_type};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::domains::prey::{ApiResult, Session, ensure_tool_allowed, mask_sensitive, wrap};

use super::common;

/// Parameters for the account info tool (none).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct AccountGetParams {}

/// Retrieve Prey account information.
pub struct AccountGetTool;

impl AccountGetTool {
    pub const NAME: &'static str = "prey.account.get";
    pub const DESCRIPTION: &'static str = "Retrieve Prey account information.";

    pub async fn execute(_params: &AccountGetParams, session: &Session) -> ApiResult<Value> {
        ensure_tool_allowed(&session.config, Self::NAME, false)?;
        let req = session.client.request(Method::GET, "/account", &[], None)?;
        let payload: Value = session.client.dispatch_json(req).await?;
        Ok(wrap(mask_sensitive(payload), None))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<AccountGetParams>(),
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
            "Fetched account information",
            |params: AccountGetParams, session| async move {
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
    async fn wraps_and_masks_account_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "acme", "api_key": "xyz"
            })))
            .mount(&server)
            .await;

        let session = session_for(&server).await;
        let envelope = AccountGetTool::execute(&AccountGetParams::default(), &session)
            .await
            .unwrap();
        assert_eq!(envelope["data"]["name"], "acme");
        assert_eq!(envelope["data"]["api_key"], "***");
        assert!(envelope.get("meta").is_none());
    }

    #[tokio::test]
    async fn respects_allowlist() {
        let server = MockServer::start().await;
        let mut config = PreyConfig {
            base_url: server.uri(),
            api_key: "k3y".to_string(),
            disable_rate_limit: true,
            ..PreyConfig::default()
        };
        config.allowed_tools.insert("prey.devices.list".to_string());
        let session = Session::new(config).unwrap();

        let err = AccountGetTool::execute(&AccountGetParams::default(), &session)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ToolNotAllowed(_)));
    }
}
