use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::measure::{MeasureHostParam, MeasureMode, MeasureTool};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Enumeration of available tools in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Distance,
    Area,
    Angle,
}

impl ToolType {
    /// Convert string identifier to tool type for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        MeasureMode::from_string(s).map(Self::from_mode)
    }

    /// Convert tool type to string identifier for frontend communication.
    pub fn to_string(&self) -> &'static str {
        self.mode().as_str()
    }

    pub fn mode(self) -> MeasureMode {
        match self {
            Self::Distance => MeasureMode::Distance,
            Self::Area => MeasureMode::Area,
            Self::Angle => MeasureMode::Angle,
        }
    }

    pub fn from_mode(mode: MeasureMode) -> Self {
        match mode {
            MeasureMode::Distance => Self::Distance,
            MeasureMode::Area => Self::Area,
            MeasureMode::Angle => Self::Angle,
        }
    }
}

/// Resource tracking the currently active tool.
///
/// Mirrors the measurement session: a started session activates its tool, a closed one clears it.
#[derive(Resource, Default)]
pub struct ToolManager {
    active_tool: Option<ToolType>,
}

impl ToolManager {
    /// Activate specified tool, replacing the previous one. Returns `false` if it was already active.
    pub fn activate_tool(&mut self, tool_type: ToolType) -> bool {
        if self.active_tool == Some(tool_type) {
            return false;
        }
        self.active_tool = Some(tool_type);
        info!("Tool manager activated: {}", tool_type.to_string());
        true
    }

    /// Deactivate currently active tool.
    pub fn deactivate_current_tool(&mut self) -> Option<ToolType> {
        let previous = self.active_tool.take();
        if let Some(tool) = previous {
            info!("Tool manager deactivated: {}", tool.to_string());
        }
        previous
    }

    pub fn active_tool(&self) -> Option<ToolType> {
        self.active_tool
    }
}

/// Event fired when tool selection changes via RPC or keyboard shortcuts.
#[derive(Event)]
pub struct ToolSelectionEvent {
    pub tool_type: ToolType,
    pub source: ToolSelectionSource,
}

/// Source of tool selection for debugging and conditional logic.
#[derive(Debug, Clone, Copy)]
pub enum ToolSelectionSource {
    Rpc,
    Keyboard,
}

/// Closes the current measurement and deactivates its tool.
#[derive(Event)]
pub struct ClearToolEvent;

/// Measurement actions that can be triggered remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureAction {
    Complete, // Equivalent to double-click or Enter.
    Cancel,   // Equivalent to Escape.
}

#[derive(Event)]
pub struct MeasureActionEvent {
    pub action: MeasureAction,
}

/// Opens a fresh session for each selected tool. Selecting the active tool again restarts it.
pub fn handle_tool_selection_events(
    mut events: EventReader<ToolSelectionEvent>,
    mut tool: ResMut<MeasureTool>,
    mut host: MeasureHostParam,
) {
    for event in events.read() {
        let mode = event.tool_type.mode();
        info!("{} tool selected via {:?}", mode.as_str(), event.source);
        host.with_host(|host| tool.session.open(mode, host));
    }
}

pub fn handle_clear_tool_events(
    mut events: EventReader<ClearToolEvent>,
    mut tool: ResMut<MeasureTool>,
    mut host: MeasureHostParam,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    host.with_host(|host| tool.session.close(host));
}

pub fn handle_measure_action_events(
    mut events: EventReader<MeasureActionEvent>,
    mut tool: ResMut<MeasureTool>,
    mut host: MeasureHostParam,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        match event.action {
            MeasureAction::Complete => {
                if !tool.session.is_active() {
                    warn!("Cannot complete measurement: no measurement in progress");
                    rpc_interface.send_notification(
                        "measure_action_completed",
                        serde_json::json!({
                            "action": "complete",
                            "success": false,
                            "reason": "No measurement in progress"
                        }),
                    );
                    continue;
                }
                host.with_host(|host| tool.session.complete(host));
                rpc_interface.send_notification(
                    "measure_action_completed",
                    serde_json::json!({ "action": "complete", "success": true }),
                );
            }
            MeasureAction::Cancel => {
                host.with_host(|host| tool.session.cancel(host));
                rpc_interface.send_notification(
                    "measure_action_completed",
                    serde_json::json!({ "action": "cancel", "success": true }),
                );
            }
        }
    }
}

/// System handling keyboard shortcuts for tool selection (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_tool_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tool_events: EventWriter<ToolSelectionEvent>,
) {
    let shortcuts = [
        (KeyCode::KeyM, ToolType::Distance),
        (KeyCode::KeyN, ToolType::Area),
        (KeyCode::KeyB, ToolType::Angle),
    ];
    for (key, tool_type) in shortcuts {
        if keyboard.just_pressed(key) {
            tool_events.write(ToolSelectionEvent {
                tool_type,
                source: ToolSelectionSource::Keyboard,
            });
        }
    }
}

/// Placeholder system for WASM builds where keyboard shortcuts are disabled.
#[cfg(target_arch = "wasm32")]
pub fn handle_tool_keyboard_shortcuts() {
    // Tools are controlled via RPC only.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_names_follow_measure_modes() {
        assert_eq!(ToolType::from_string("Area"), Some(ToolType::Area));
        assert_eq!(ToolType::from_string("polygon"), None);
        assert_eq!(ToolType::Angle.to_string(), "angle");
        assert_eq!(ToolType::Distance.mode(), MeasureMode::Distance);
    }

    #[test]
    fn activating_the_same_tool_twice_reports_no_change() {
        let mut manager = ToolManager::default();
        assert!(manager.activate_tool(ToolType::Distance));
        assert!(!manager.activate_tool(ToolType::Distance));
        assert_eq!(manager.active_tool(), Some(ToolType::Distance));
        assert_eq!(manager.deactivate_current_tool(), Some(ToolType::Distance));
        assert_eq!(manager.active_tool(), None);
    }
}
