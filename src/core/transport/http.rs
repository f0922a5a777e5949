//! HTTP transport implementation.
//!
//! HTTP server with JSON-RPC over POST requests.
//! This allows standard HTTP clients (curl, browsers, etc.) to communicate
//! with the MCP server.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;

/// MCP protocol revision this transport reports.
const PROTOCOL_VERSION: &str = "2024-11-05";

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

        // Build router
        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(state);

        // Add CORS if enabled
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
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", &request.method);
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, request).await;

    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        // Initialize the MCP session
        "initialize" => handle_initialize(state, request),

        // List available tools
        "tools/list" => handle_tools_list(state, request),

        // Call a tool
        "tools/call" => handle_tools_call(state, request).await,

        // Notifications (no response needed for stateless HTTP)
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", request.method);
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }

        // Unknown method
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
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": "Developer toolbox MCP server. Provides filesystem, search, shell, git, docker, and system-info tools."
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
async fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
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

    match state.server.call_tool(&name, arguments).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::invalid_params(request.id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;

    fn test_state() -> AppState {
        AppState {
            server: McpServer::new(Config::default()),
        }
    }

    fn request(method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(serde_json::json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize() {
        let state = test_state();
        let response = process_request(&state, request("initialize", None)).await;

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"].get("tools").is_some());
        assert!(result["capabilities"].get("resources").is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let state = test_state();
        let response = process_request(&state, request("tools/list", None)).await;

        let result = response.result.unwrap();
        assert_eq!(result["tools"].as_array().unwrap().len(), 15);
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let state = test_state();
        let response = process_request(
            &state,
            request(
                "tools/call",
                Some(serde_json::json!({ "name": "no_such_tool", "arguments": {} })),
            ),
        )
        .await;

        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let state = test_state();
        let response = process_request(&state, request("bogus/method", None)).await;
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let state = test_state();
        let mut req = request("tools/list", None);
        req.jsonrpc = "1.0".to_string();
        let response = process_request(&state, req).await;
        assert_eq!(response.error.unwrap().code, -32600);
    }
}
