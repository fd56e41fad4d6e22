//! Shared plumbing for Prey tool definitions.
//!
//! Every tool funnels its outcome through [`into_result`], so success and
//! failure always render the same way: a one-line text summary plus the
//! `{data, meta?}` envelope as structured content, or an error result whose
//! message comes straight from the `ApiError` taxonomy.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Content, Tool},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::domains::prey::{ApiResult, Session};

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text summary + structured envelope.
pub fn structured_result(summary: impl Into<String>, envelope: Value) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(summary.into())],
        structured_content: Some(envelope),
        is_error: Some(false),
        meta: None,
    }
}

/// Convert a tool outcome into a call result.
pub fn into_result(summary: &str, outcome: ApiResult<Value>) -> CallToolResult {
    match outcome {
        Ok(envelope) => structured_result(summary, envelope),
        Err(err) => error_result(&err.to_string()),
    }
}

/// Build a ToolRoute for the STDIO/TCP transports.
///
/// Deserializes arguments into the tool's params type, runs the tool against
/// the shared session, and renders the outcome. All tool routes share this
/// shape; only the params type and the execute closure differ.
pub fn route<S, P, F, Fut>(
    tool: Tool,
    session: Arc<Session>,
    summary: &'static str,
    run: F,
) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
    P: DeserializeOwned + Send + 'static,
    F: Fn(P, Arc<Session>) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = ApiResult<Value>> + Send + 'static,
{
    ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let session = session.clone();
        let run = run.clone();
        async move {
            let params: P = serde_json::from_value(Value::Object(args))
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
            Ok(into_result(summary, run(params, session).await))
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::prey::ApiError;
    use rmcp::model::RawContent;
    use serde_json::json;

    #[test]
    fn success_carries_summary_and_envelope() {
        let result = into_result("Fetched device", Ok(json!({"data": {"id": "42"}})));
        assert_eq!(result.is_error, Some(false));
        match &result.content[0].raw {
            RawContent::Text(text) => assert_eq!(text.text, "Fetched device"),
            _ => panic!("expected text content"),
        }
        assert_eq!(result.structured_content.unwrap()["data"]["id"], "42");
    }

    #[test]
    fn failure_carries_error_message() {
        let result = into_result("ignored", Err(ApiError::MissingApiKey));
        assert_eq!(result.is_error, Some(true));
        match &result.content[0].raw {
            RawContent::Text(text) => assert!(text.text.contains("PREY_API_KEY")),
            _ => panic!("expected text content"),
        }
    }
}
