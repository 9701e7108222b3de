// MCP server implementation: newline-delimited JSON-RPC over stdio

use crate::codec::{Frame, MessageCodec};
use crate::protocol::{
    CallToolParams, InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo, ToolsCapability,
    PROTOCOL_VERSION,
};
use crate::tools::{list_schemas, Dispatcher};
use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};

pub const SERVER_NAME: &str = "veilmail-mcp";

/// MCP server exposing the Veil Mail tools.
#[derive(Debug, Clone)]
pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Serve stdin/stdout until EOF or Ctrl-C.
    pub async fn start(&self) -> Result<()> {
        tracing::info!("MCP server ready, listening on stdio");

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for interrupt signal");
                std::future::pending::<()>().await;
            }
        };

        self.serve(tokio::io::stdin(), tokio::io::stdout(), shutdown)
            .await
    }

    /// Serve one connection.
    ///
    /// Each message is handled on its own task; responses are written in
    /// completion order. A line that cannot be decoded is answered with a
    /// parse error and skipped. On EOF outstanding calls are allowed to
    /// finish, on `shutdown` they are aborted.
    pub async fn serve<R, W, S>(&self, reader: R, writer: W, shutdown: S) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
        S: Future<Output = ()>,
    {
        let mut frames = FramedRead::new(reader, MessageCodec::new());
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer_task = tokio::spawn(async move {
            let mut sink = FramedWrite::new(writer, LinesCodec::new());
            while let Some(line) = rx.recv().await {
                sink.send(line).await?;
            }
            Ok::<_, tokio_util::codec::LinesCodecError>(())
        });

        let mut in_flight = JoinSet::new();
        let mut read_error = None;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                frame = frames.next() => match frame {
                    Some(Ok(Frame::Message(line))) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        tracing::debug!(request = %line, "Received message");

                        let server = self.clone();
                        let tx = tx.clone();
                        in_flight.spawn(async move {
                            if let Some(response) = server.handle_message(&line).await {
                                send(&tx, &response);
                            }
                        });
                    }
                    Some(Ok(Frame::Malformed(reason))) => {
                        tracing::warn!(error = %reason, "Discarding unreadable message");
                        send(&tx, &JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()));
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Failed to read input, shutting down");
                        read_error = Some(e);
                        while in_flight.join_next().await.is_some() {}
                        break;
                    }
                    None => {
                        tracing::info!("Input closed, shutting down");
                        while in_flight.join_next().await.is_some() {}
                        break;
                    }
                },
                _ = &mut shutdown => {
                    tracing::info!("Interrupt received, shutting down");
                    in_flight.shutdown().await;
                    break;
                }
            }
        }

        drop(tx);
        writer_task
            .await
            .context("Writer task failed")?
            .context("Failed to write response")?;

        if let Some(e) = read_error {
            return Err(e).context("Failed to read message");
        }

        Ok(())
    }

    /// Handle a single raw message. Returns `None` for notifications.
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse message");
                return Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed request");
                return Some(JsonRpcResponse::error(Value::Null, JsonRpcError::invalid_request()));
            }
        };

        if request.jsonrpc != "2.0" {
            let id = request.id.unwrap_or(Value::Null);
            return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
        }

        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        };

        Some(response)
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                tracing::debug!("Client finished initialization");
            }
            other => tracing::debug!(method = other, "Ignoring notification"),
        }
    }

    fn handle_initialize(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        tracing::info!(
            client = params.client_info.as_ref().map(|c| c.name.as_str()).unwrap_or("unknown"),
            protocol = params.protocol_version.as_deref().unwrap_or("unknown"),
            "Initializing session"
        );

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        respond(id, &ListToolsResult { tools: list_schemas() })
    }

    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
        };

        let params: CallToolParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)),
                );
            }
        };

        tracing::debug!(tool = %params.name, "Tool call");
        let result = self.dispatcher.invoke(&params.name, params.arguments).await;
        respond(id, &result)
    }
}

fn send(tx: &mpsc::UnboundedSender<String>, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let _ = tx.send(json);
        }
        Err(e) => tracing::error!(error = %e, "Failed to encode response"),
    }
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
    }
}
