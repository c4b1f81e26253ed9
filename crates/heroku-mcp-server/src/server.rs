use crate::mcp::*;
use crate::tools::ToolRegistry;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Run the MCP server: read JSON-RPC from stdin, write responses to stdout.
pub async fn run(registry: ToolRegistry) -> Result<(), Box<dyn std::error::Error>> {
    serve(&registry, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Serve newline-delimited JSON-RPC until `input` reaches EOF.
pub async fn serve<R, W>(
    registry: &ToolRegistry,
    input: R,
    mut output: W,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();

    tracing::info!("MCP server ready, reading from stdin");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Unparseable request line: {e}");
                let resp = JsonRpcResponse::error(Value::Null, PARSE_ERROR, format!("Parse error: {e}"));
                write_response(&mut output, &resp).await?;
                continue;
            }
        };

        if let Some(resp) = handle_request(request, registry).await {
            write_response(&mut output, &resp).await?;
        }
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

pub async fn handle_request(req: JsonRpcRequest, registry: &ToolRegistry) -> Option<JsonRpcResponse> {
    // Notifications (no id) never get a response.
    let id = match req.id {
        Some(id) => id,
        None => {
            tracing::debug!("Notification: {}", req.method);
            return None;
        }
    };

    let response = match req.method.as_str() {
        "initialize" => success(id, &InitializeResult::current()),

        "ping" => JsonRpcResponse::success(id, serde_json::json!({})),

        "tools/list" => {
            let result = ToolsListResult {
                tools: registry.definitions(),
            };
            success(id, &result)
        }

        "tools/call" => {
            let Some(name) = req.params.get("name").and_then(Value::as_str) else {
                return Some(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    "Invalid params: missing tool name",
                ));
            };
            let arguments = req
                .params
                .get("arguments")
                .cloned()
                .unwrap_or(Value::Object(serde_json::Map::new()));

            let result = registry.call(name, arguments).await;
            success(id, &result)
        }

        _ => {
            tracing::debug!("Unknown method: {}", req.method);
            JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", req.method))
        }
    };

    Some(response)
}

fn success<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Internal error: {e}")),
    }
}

async fn write_response<W: AsyncWrite + Unpin>(
    output: &mut W,
    resp: &JsonRpcResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(resp)?;
    output.write_all(json.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
