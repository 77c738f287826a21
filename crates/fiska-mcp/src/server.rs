//! MCP server lifecycle.
//!
//! 1. Initialization: `initialize` request, then the `initialized`
//!    notification moves the server to running.
//! 2. Operation: `tools/list` and `tools/call`.
//! 3. Shutdown: EOF on stdin or a termination signal.
//!
//! Replies are computed by [`McpServer::process_line`] so the protocol
//! logic is testable without a stdio pipe; [`McpServer::run`] owns the
//! read/write loop.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::protocol::{
    ErrorCode, IncomingMessage, JsonRpcError, JsonRpcErrorData, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION, RequestId, SERVER_NAME, parse_message,
};
use crate::tools::Toolbox;
use crate::transport::StdioTransport;

/// Where the server is in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for the initialize request.
    AwaitingInit,
    /// Initialize answered, waiting for the initialized notification.
    Initialising,
    /// Ready for tool traffic.
    Running,
    /// Shutting down.
    ShuttingDown,
}

/// Capabilities advertised during initialization.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolCapabilities,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// The tool list is static for the session.
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Parameters of the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    #[serde(default)]
    pub client_info: Option<Value>,
}

/// A tool descriptor for `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Parameters of `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// One content item of a tool result.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// A tool result: text content plus the error flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}

/// The MCP server, bound to one tool surface.
pub struct McpServer {
    state: ServerState,
    toolbox: Toolbox,
}

impl McpServer {
    pub fn new(toolbox: Toolbox) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            toolbox,
        }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Read stdin until EOF or a termination signal, writing one reply
    /// line per request.
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut transport = StdioTransport::new();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("received interrupt, shutting down");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line = transport.read_line() => {
                    let Some(line) = line? else {
                        tracing::info!("stdin closed, shutting down");
                        self.state = ServerState::ShuttingDown;
                        return Ok(());
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Some(reply) = self.process_line(&line).await {
                        transport.write_line(&reply).await?;
                    }
                }
            }
        }
    }

    /// Handle one message line; `None` for notifications (no reply).
    pub async fn process_line(&mut self, line: &str) -> Option<String> {
        match parse_message(line) {
            Ok(IncomingMessage::Request(request)) => {
                let reply = match self.handle_request(request).await {
                    Ok(response) => serde_json::to_string(&response),
                    Err(error) => serde_json::to_string(&error),
                };
                // Both reply types serialize infallibly; Value has no
                // non-string map keys.
                reply.ok()
            }
            Ok(IncomingMessage::Notification(notification)) => {
                self.handle_notification(&notification);
                None
            }
            Err(error) => serde_json::to_string(&error).ok(),
        }
    }

    async fn handle_request(
        &mut self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(&request),
            "tools/list" => self.handle_tools_list(&request),
            "tools/call" => self.handle_tools_call(&request).await,
            "ping" => Ok(JsonRpcResponse::success(request.id.clone(), json!({}))),
            other => Err(JsonRpcError::method_not_found(request.id.clone(), other)),
        }
    }

    fn handle_notification(&mut self, notification: &JsonRpcNotification) {
        if notification.method == "notifications/initialized"
            && self.state == ServerState::Initialising
        {
            tracing::debug!("client initialized, entering running state");
            self.state = ServerState::Running;
        }
    }

    fn handle_initialize(
        &mut self,
        request: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::new(
                Some(request.id.clone()),
                JsonRpcErrorData::with_message(
                    ErrorCode::InvalidRequest,
                    "Server already initialised",
                ),
            ));
        }

        let params: InitializeParams = parse_params(request)?;
        tracing::info!(
            client_version = %params.protocol_version,
            "initialize received"
        );

        self.state = ServerState::Initialising;
        Ok(JsonRpcResponse::success(
            request.id.clone(),
            json!({
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "capabilities": ServerCapabilities {
                    tools: ToolCapabilities::default(),
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        ))
    }

    fn handle_tools_list(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&request.id)?;
        Ok(JsonRpcResponse::success(
            request.id.clone(),
            json!({"tools": Toolbox::definitions()}),
        ))
    }

    async fn handle_tools_call(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&request.id)?;
        let params: ToolCallParams = parse_params(request)?;

        tracing::debug!(tool = %params.name, "tool call");
        let result = self.toolbox.call(&params.name, &params.arguments).await;

        let value = serde_json::to_value(&result).map_err(|e| {
            JsonRpcError::internal_error(request.id.clone(), format!("result serialization: {e}"))
        })?;
        Ok(JsonRpcResponse::success(request.id.clone(), value))
    }

    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state != ServerState::Running {
            return Err(JsonRpcError::new(
                Some(id.clone()),
                JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, "Server not initialised"),
            ));
        }
        Ok(())
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    request: &JsonRpcRequest,
) -> Result<T, JsonRpcError> {
    let params = request
        .params
        .as_ref()
        .ok_or_else(|| JsonRpcError::invalid_params(request.id.clone(), "Missing params"))?;
    serde_json::from_value(params.clone())
        .map_err(|e| JsonRpcError::invalid_params(request.id.clone(), format!("Invalid params: {e}")))
}
