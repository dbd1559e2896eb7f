use crate::tools::measure::{MeasureSession, MeasureTool};
use crate::tools::tool_manager::{
    ClearToolEvent, MeasureAction, MeasureActionEvent, ToolManager, ToolSelectionEvent,
    ToolSelectionSource, ToolType,
};
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between React and Bevy.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to React frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Notifications queued since the last flush.
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Engine-side effect of an RPC request, applied after the response is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCommand {
    SelectTool(ToolType),
    ClearTool,
    CompleteMeasurement,
    CancelMeasurement,
}

/// Read-only engine state a request may report on.
pub struct RpcContext<'a> {
    pub fps: f32,
    pub session: &'a MeasureSession,
    pub active_tool: Option<ToolType>,
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
            return;
        }
    }

    // Hand the closure to JS so it outlives this system.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Thread-safe message queue filled by the WASM message listener.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from React frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    tool: Res<MeasureTool>,
    tool_manager: Res<ToolManager>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut tool_events: EventWriter<ToolSelectionEvent>,
    mut clear_events: EventWriter<ClearToolEvent>,
    mut action_events: EventWriter<MeasureActionEvent>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;
    let context = RpcContext {
        fps,
        session: &tool.session,
        active_tool: tool_manager.active_tool(),
    };

    let mut commands = Vec::new();
    for event in events.read() {
        debug!("Received RPC: {}", event.content);

        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                if let Some(response) = handle_rpc_request(&request, &context, &mut commands) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
                rpc_interface.queue_response(create_error_response(
                    serde_json::Value::Null,
                    -32700,
                    "Parse error",
                    None,
                ));
            }
        }
    }

    for command in commands {
        match command {
            RpcCommand::SelectTool(tool_type) => {
                tool_events.write(ToolSelectionEvent {
                    tool_type,
                    source: ToolSelectionSource::Rpc,
                });
            }
            RpcCommand::ClearTool => {
                clear_events.write(ClearToolEvent);
            }
            RpcCommand::CompleteMeasurement => {
                action_events.write(MeasureActionEvent {
                    action: MeasureAction::Complete,
                });
            }
            RpcCommand::CancelMeasurement => {
                action_events.write(MeasureActionEvent {
                    action: MeasureAction::Cancel,
                });
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
///
/// Effects on the engine are pushed to `commands`; notifications (no ID) still run
/// but produce no response.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext<'_>,
    commands: &mut Vec<RpcCommand>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "tool_selection" => handle_tool_selection(&request.params, commands),
        "clear_tool" => {
            commands.push(RpcCommand::ClearTool);
            Ok(serde_json::json!({ "success": true }))
        }
        "complete_measurement" => {
            commands.push(RpcCommand::CompleteMeasurement);
            Ok(serde_json::json!({ "success": true }))
        }
        "cancel_measurement" => {
            commands.push(RpcCommand::CancelMeasurement);
            Ok(serde_json::json!({ "success": true }))
        }
        "get_measurement" => Ok(measurement_snapshot(context)),
        "get_fps" => Ok(serde_json::json!({ "fps": context.fps })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            let id = request.id.clone()?;
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn handle_tool_selection(
    params: &serde_json::Value,
    commands: &mut Vec<RpcCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ToolSelectionParams {
        tool: String,
    }

    let tool_params = serde_json::from_value::<ToolSelectionParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'tool' parameter"))?;

    let tool_type = ToolType::from_string(&tool_params.tool)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown tool: {}", tool_params.tool)))?;

    commands.push(RpcCommand::SelectTool(tool_type));
    info!("Tool selection requested: {:?}", tool_type);

    Ok(serde_json::json!({
        "success": true,
        "active_tool": tool_type.to_string()
    }))
}

/// Current session state, points and the last computed value.
fn measurement_snapshot(context: &RpcContext<'_>) -> serde_json::Value {
    let session = context.session;
    let points: Vec<[f32; 3]> = session.points().iter().map(|p| p.to_array()).collect();
    let (value, text) = match session.result() {
        Some(result) => (result.value, result.text.clone()),
        None => (None, session.label_text().to_string()),
    };

    serde_json::json!({
        "state": session.state(),
        "mode": session.mode().as_str(),
        "active_tool": context.active_tool.map(|tool| tool.to_string()),
        "points": points,
        "value": value,
        "text": text,
    })
}

fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to React frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (React frontend).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::measure::MeasureSettings;

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(serde_json::json!(7)),
        }
    }

    fn run(request: &RpcRequest) -> (Option<RpcResponse>, Vec<RpcCommand>) {
        let session = MeasureSession::new(MeasureSettings::default());
        let context = RpcContext {
            fps: 60.0,
            session: &session,
            active_tool: None,
        };
        let mut commands = Vec::new();
        let response = handle_rpc_request(request, &context, &mut commands);
        (response, commands)
    }

    #[test]
    fn tool_selection_queues_a_select_command() {
        let (response, commands) = run(&request(
            "tool_selection",
            serde_json::json!({ "tool": "area" }),
        ));
        assert_eq!(commands, vec![RpcCommand::SelectTool(ToolType::Area)]);
        let response = response.unwrap();
        assert_eq!(response.id, Some(serde_json::json!(7)));
        assert_eq!(response.result.unwrap()["active_tool"], "area");
    }

    #[test]
    fn unknown_tool_is_invalid_params() {
        let (response, commands) = run(&request(
            "tool_selection",
            serde_json::json!({ "tool": "polygon" }),
        ));
        assert!(commands.is_empty());
        assert_eq!(response.unwrap().error.unwrap().code, -32602);
    }

    #[test]
    fn unknown_method_is_method_not_found() {
        let (response, _) = run(&request("explode", serde_json::Value::Null));
        assert_eq!(response.unwrap().error.unwrap().code, -32601);
    }

    #[test]
    fn notifications_run_without_a_response() {
        let mut clear = request("clear_tool", serde_json::Value::Null);
        clear.id = None;
        let (response, commands) = run(&clear);
        assert!(response.is_none());
        assert_eq!(commands, vec![RpcCommand::ClearTool]);
    }

    #[test]
    fn measure_actions_queue_their_commands() {
        let (response, commands) = run(&request("cancel_measurement", serde_json::Value::Null));
        assert_eq!(commands, vec![RpcCommand::CancelMeasurement]);
        assert_eq!(response.unwrap().result.unwrap()["success"], true);

        let (_, commands) = run(&request("complete_measurement", serde_json::Value::Null));
        assert_eq!(commands, vec![RpcCommand::CompleteMeasurement]);
    }

    #[test]
    fn idle_measurement_snapshot() {
        let (response, commands) = run(&request("get_measurement", serde_json::Value::Null));
        assert!(commands.is_empty());
        let result = response.unwrap().result.unwrap();
        assert_eq!(result["state"], "idle");
        assert_eq!(result["mode"], "distance");
        assert_eq!(result["points"], serde_json::json!([]));
        assert!(result["value"].is_null());
    }

    #[test]
    fn fps_is_reported_from_context() {
        let (response, _) = run(&request("get_fps", serde_json::Value::Null));
        assert_eq!(response.unwrap().result.unwrap()["fps"], 60.0);
    }
}
