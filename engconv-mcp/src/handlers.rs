//! JSON-RPC request handling
//!
//! Conversion failures are tool results with `isError: true`, not protocol
//! errors; protocol errors are reserved for malformed requests.

use engconv_units::{format_result, ConversionRequest, Registry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "engconv";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

const JSONRPC_VERSION: &str = "2.0";

// MCP Protocol types
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

/// `id` is always written; error replies to unidentifiable requests carry `null`
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError { code: INVALID_PARAMS, message: message.into(), data: None }
    }
}

impl McpResponse {
    fn success(id: Option<JsonValue>, result: JsonValue) -> Self {
        McpResponse { jsonrpc: JSONRPC_VERSION.to_string(), id, result: Some(result), error: None }
    }

    fn failure(id: Option<JsonValue>, error: McpError) -> Self {
        McpResponse { jsonrpc: JSONRPC_VERSION.to_string(), id, result: None, error: Some(error) }
    }

    pub fn parse_error(details: impl std::fmt::Display) -> Self {
        Self::failure(None, McpError {
            code: PARSE_ERROR,
            message: format!("Parse error: {}", details),
            data: None,
        })
    }

    pub fn invalid_request(id: Option<JsonValue>, details: impl std::fmt::Display) -> Self {
        Self::failure(id, McpError {
            code: INVALID_REQUEST,
            message: format!("Invalid request: {}", details),
            data: None,
        })
    }
}

/// Handle one input line.
///
/// Returns `None` when nothing must be written back: blank lines and
/// notifications (requests without an id).
pub fn process_line(registry: &Registry, line: &str) -> Option<McpResponse> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let raw: JsonValue = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "error parsing request");
            return Some(McpResponse::parse_error(e));
        }
    };

    // Echo the id when the shape is wrong but the id is readable
    let raw_id = raw.get("id").cloned().filter(|id| !id.is_null());

    let request: McpRequest = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "invalid request");
            return Some(McpResponse::invalid_request(raw_id, e));
        }
    };

    if request.jsonrpc != JSONRPC_VERSION {
        warn!(version = %request.jsonrpc, "unsupported jsonrpc version");
        return Some(McpResponse::invalid_request(
            request.id,
            format!("jsonrpc must be \"{}\"", JSONRPC_VERSION),
        ));
    }

    debug!(method = %request.method, "processing");

    let response = handle_request(registry, &request);

    // Notifications (no id) should NOT receive a response
    if request.id.is_none() {
        debug!(method = %request.method, "notification processed");
        return None;
    }

    Some(response)
}

pub fn handle_request(registry: &Registry, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(registry, &request.params),

        _ => Err(McpError {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse::success(request.id.clone(), r),
        Err(e) => McpResponse::failure(request.id.clone(), e),
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Engineering unit converter"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Use 'list_categories' to see the available categories, 'list_units' for the units of one category, and 'convert' to convert a value between two units of the same category."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "list_categories",
                "description": "List the unit categories with their units and whether negative values are accepted.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "list_units",
                "description": "List the units of one category in presentation order.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category name, e.g. \"Length\""
                        }
                    },
                    "required": ["category"]
                }
            },
            {
                "name": "convert",
                "description": "Convert a value between two units of the same category. Length, Mass and Pressure reject negative values.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category name, e.g. \"Temperature\""
                        },
                        "from_unit": {
                            "type": "string",
                            "description": "Source unit, e.g. \"Celsius\""
                        },
                        "to_unit": {
                            "type": "string",
                            "description": "Target unit, e.g. \"Fahrenheit\""
                        },
                        "value": {
                            "type": "number",
                            "description": "Value to convert"
                        }
                    },
                    "required": ["category", "from_unit", "to_unit", "value"]
                }
            }
        ]
    }))
}

fn handle_tool_call(registry: &Registry, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "list_categories" => tool_list_categories(registry),
        "list_units" => tool_list_units(registry, &args),
        "convert" => tool_convert(registry, &args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn tool_list_categories(registry: &Registry) -> Result<JsonValue, McpError> {
    let categories: Vec<JsonValue> = registry.categories()
        .map(|c| json!({
            "name": c.name,
            "units": c.units,
            "allow_negative": c.allow_negative,
            "rule": c.rule.kind(),
        }))
        .collect();

    let text = registry.list_categories().join(", ");

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "categories": categories,
        "isError": false
    }))
}

fn tool_list_units(registry: &Registry, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = string_arg(args, "category")?;

    match registry.units_for(category) {
        Ok(units) => Ok(json!({
            "content": [{ "type": "text", "text": units.join(", ") }],
            "category": category,
            "units": units,
            "isError": false
        })),
        Err(e) => Ok(error_result(&e)),
    }
}

fn tool_convert(registry: &Registry, args: &JsonValue) -> Result<JsonValue, McpError> {
    let request = ConversionRequest::new(
        string_arg(args, "category")?,
        string_arg(args, "from_unit")?,
        string_arg(args, "to_unit")?,
        number_arg(args, "value")?,
    );

    match registry.evaluate(&request) {
        Ok(result) => Ok(json!({
            "content": [{ "type": "text", "text": format_result(&result) }],
            "result": result.result,
            "isError": false
        })),
        Err(e) => {
            warn!(code = e.code(), error = %e, "conversion rejected");
            Ok(error_result(&e))
        }
    }
}

fn error_result(e: &engconv_core::ConvError) -> JsonValue {
    let report = e.report();
    let text = match &report.suggestion {
        Some(s) => format!("{} ({})", report.message, s),
        None => report.message.clone(),
    };

    json!({
        "content": [{ "type": "text", "text": text }],
        "error": report,
        "isError": true
    })
}

fn string_arg<'a>(args: &'a JsonValue, name: &str) -> Result<&'a str, McpError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

/// Accepts a JSON number or a numeric string
fn number_arg(args: &JsonValue, name: &str) -> Result<f64, McpError> {
    match args.get(name) {
        Some(JsonValue::Number(n)) => n.as_f64()
            .ok_or_else(|| McpError::invalid_params(format!("Invalid {} argument", name))),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>()
            .map_err(|_| McpError::invalid_params(format!("Invalid {} argument: '{}'", name, s))),
        _ => Err(McpError::invalid_params(format!("Missing {} argument", name))),
    }
}
