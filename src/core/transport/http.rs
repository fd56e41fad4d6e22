//! HTTP transport implementation.
//!
//! HTTP server with JSON-RPC over POST requests.
//! This allows standard HTTP clients (curl, browsers, etc.) to communicate with the MCP server.
//!
//! Per-request credentials: the `X-Prey-URL` and `X-Prey-API-Key` headers
//! override the environment-configured base URL and API key for that request
//! only, so one HTTP deployment can serve multiple Prey accounts.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::config::{PREY_API_KEY_HEADER, PREY_URL_HEADER};
use crate::domains::prey::Session;
use crate::domains::tools::ToolRegistry;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    server: McpServer,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let state = AppState { server };

        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(state);

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "rpc": "/mcp",
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "documentation": "Send POST requests to /mcp with JSON-RPC messages"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", &request.method);
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, &headers, request).await;

    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
async fn process_request(
    state: &AppState,
    headers: &HeaderMap,
    request: JsonRpcRequest,
) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request),

        "tools/list" => handle_tools_list(state, request),

        "tools/call" => handle_tools_call(state, headers, request).await,

        // Notifications (no response needed for stateless HTTP)
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", request.method);
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle initialize request.
fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let result = serde_json::json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": McpServer::instructions()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    let tools = state.server.list_tools();
    let result = serde_json::json!({
        "tools": tools
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/call request.
async fn handle_tools_call(
    state: &AppState,
    headers: &HeaderMap,
    request: JsonRpcRequest,
) -> JsonRpcResponse {
    info!("Processing tools/call request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id.clone(), "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id.clone(), "Missing tool name"),
    };

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::json!({}));

    let registry = match registry_for(state, headers) {
        Ok(r) => r,
        Err(e) => return JsonRpcResponse::internal_error(request.id, e),
    };

    match registry.call_tool(&name, arguments).await {
        Ok(envelope) => JsonRpcResponse::success(
            request.id,
            serde_json::json!({
                "content": [{"type": "text", "text": envelope.to_string()}],
                "structuredContent": envelope,
                "isError": false
            }),
        ),
        Err(message) => JsonRpcResponse::success(
            request.id,
            serde_json::json!({
                "content": [{"type": "text", "text": message}],
                "isError": true
            }),
        ),
    }
}

/// Build the registry for a request, honoring per-request header overrides.
///
/// Without overrides the server's shared session (and its limiter windows)
/// is reused; with overrides a fresh session is built for this request,
/// cancelled through a child of the server's shutdown token.
fn registry_for(state: &AppState, headers: &HeaderMap) -> Result<ToolRegistry, String> {
    let url_override = header_value(headers, PREY_URL_HEADER);
    let key_override = header_value(headers, PREY_API_KEY_HEADER);

    if url_override.is_none() && key_override.is_none() {
        return Ok(ToolRegistry::new(state.server.session().clone()));
    }

    let config = state
        .server
        .config()
        .prey
        .clone()
        .override_base_url(url_override.as_deref())
        .override_api_key(key_override.as_deref());
    let cancel = state.server.session().client.cancellation().child_token();
    let session = Session::with_cancellation(config, cancel).map_err(|e| e.to_string())?;
    Ok(ToolRegistry::new(Arc::new(session)))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    fn test_state() -> AppState {
        let mut config = Config::default();
        config.prey.api_key = "k3y".to_string();
        config.prey.disable_rate_limit = true;
        AppState {
            server: McpServer::new(config).unwrap(),
        }
    }

    fn rpc(method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(serde_json::json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn initialize_reports_tool_capability_and_instructions() {
        let state = test_state();
        let response = process_request(&state, &HeaderMap::new(), rpc("initialize", None)).await;
        let result = response.result.unwrap();
        assert!(result["capabilities"]["tools"].is_object());
        assert!(
            result["instructions"]
                .as_str()
                .unwrap()
                .contains("PREY_ALLOW_WRITE")
        );
    }

    #[tokio::test]
    async fn tools_list_returns_all_tools() {
        let state = test_state();
        let response = process_request(&state, &HeaderMap::new(), rpc("tools/list", None)).await;
        let result = response.result.unwrap();
        assert_eq!(result["tools"].as_array().unwrap().len(), 22);
    }

    #[tokio::test]
    async fn tools_call_surfaces_validation_errors_in_band() {
        let state = test_state();
        let response = process_request(
            &state,
            &HeaderMap::new(),
            rpc(
                "tools/call",
                Some(serde_json::json!({
                    "name": "prey.devices.get",
                    "arguments": {"deviceId": ""}
                })),
            ),
        )
        .await;
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "deviceId is required");
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let state = test_state();
        let response = process_request(&state, &HeaderMap::new(), rpc("bogus/method", None)).await;
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn override_sessions_observe_server_shutdown() {
        use tokio_util::sync::CancellationToken;

        let mut config = Config::default();
        config.prey.api_key = "k3y".to_string();
        config.prey.disable_rate_limit = true;
        let cancel = CancellationToken::new();
        let state = AppState {
            server: McpServer::with_cancellation(config, cancel.clone()).unwrap(),
        };
        cancel.cancel();

        let mut headers = HeaderMap::new();
        headers.insert(PREY_URL_HEADER, "http://localhost:9999".parse().unwrap());
        let registry = registry_for(&state, &headers).unwrap();
        let err = registry
            .call_tool("prey.account.get", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(err.contains("cancelled"));
    }

    #[test]
    fn header_overrides_build_fresh_registry() {
        let state = test_state();
        let mut headers = HeaderMap::new();
        headers.insert(PREY_URL_HEADER, "http://localhost:9999".parse().unwrap());
        headers.insert(PREY_API_KEY_HEADER, "other".parse().unwrap());
        assert!(registry_for(&state, &headers).is_ok());
    }
}
