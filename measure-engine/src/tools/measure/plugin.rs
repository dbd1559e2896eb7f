use super::bevy_host::MeasureHostParam;
use super::input::{DoubleClickDetector, InputDispatcher, InputEvent, MeasureKey};
use super::render::{MeasureMaterials, sync_measure_visuals, update_measure_labels};
use super::scene::{MeasureLabels, MeasureScene};
use super::session::{MeasureEvent, MeasureSession, SessionState};
use super::settings::MeasureSettings;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::tool_manager::{ToolManager, ToolType};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_common_assets::json::JsonAssetPlugin;

const SETTINGS_PATH: &str = "measure_settings.json";

/// The measurement session plus the input state that feeds it.
#[derive(Resource)]
pub struct MeasureTool {
    pub session: MeasureSession,
    dispatcher: InputDispatcher,
    double_click: DoubleClickDetector,
    last_cursor: Option<Vec2>,
}

impl Default for MeasureTool {
    fn default() -> Self {
        Self::new(MeasureSettings::default())
    }
}

impl MeasureTool {
    pub fn new(settings: MeasureSettings) -> Self {
        Self {
            dispatcher: InputDispatcher::new(settings.click_debounce()),
            double_click: DoubleClickDetector::new(
                settings.double_click_window(),
                settings.double_click_slop_px,
            ),
            session: MeasureSession::new(settings),
            last_cursor: None,
        }
    }

    /// Swaps in new settings; an open session keeps its picker until reopened.
    pub fn apply_settings(&mut self, settings: MeasureSettings) {
        self.dispatcher.set_debounce(settings.click_debounce());
        self.double_click
            .configure(settings.double_click_window(), settings.double_click_slop_px);
        self.session.set_settings(settings);
    }
}

/// Translates this frame's mouse and keyboard state into dispatcher events.
///
/// Order per frame is move, press, release, then a synthesized double-click.
pub fn measure_input_system(
    mut tool: ResMut<MeasureTool>,
    mut host: MeasureHostParam,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time<Real>>,
) {
    if !matches!(
        tool.session.state(),
        SessionState::Active | SessionState::Completed
    ) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let cursor = window.cursor_position();
    let now = time.elapsed();

    let tool = &mut *tool;
    let mut events = Vec::new();
    if cursor.is_some() && cursor != tool.last_cursor {
        if let Some(position) = cursor {
            events.push(InputEvent::PointerMove(position));
        }
    }
    tool.last_cursor = cursor;

    if let Some(position) = cursor {
        if mouse.just_pressed(MouseButton::Left) {
            events.push(InputEvent::PointerDown(position));
        }
        if mouse.just_released(MouseButton::Left) {
            events.push(InputEvent::PointerUp(position));
        }
    }
    if keyboard.any_just_pressed([KeyCode::Enter, KeyCode::NumpadEnter]) {
        events.push(InputEvent::Key(MeasureKey::Enter));
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        events.push(InputEvent::Key(MeasureKey::Escape));
    }
    if events.is_empty() {
        return;
    }

    host.with_host(|host| {
        for event in events {
            tool.dispatcher.dispatch(event, now, &mut tool.session, host);

            // Bevy reports no double-clicks; derive them from consecutive non-drag releases.
            if let InputEvent::PointerUp(position) = event {
                if !tool.dispatcher.pointer_moved() && tool.double_click.register(now, position) {
                    tool.dispatcher
                        .dispatch(InputEvent::DoubleClick(position), now, &mut tool.session, host);
                }
            }
        }
    });
}

/// Pushes session events to the frontend and keeps the tool manager in step with the session.
pub fn forward_measure_events(
    mut tool: ResMut<MeasureTool>,
    mut tool_manager: ResMut<ToolManager>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in tool.session.drain_events() {
        match event {
            MeasureEvent::Started { mode } => {
                tool_manager.activate_tool(ToolType::from_mode(mode));
                rpc_interface.send_notification(
                    "measure_started",
                    serde_json::json!({ "mode": mode.as_str() }),
                );
                rpc_interface.send_notification(
                    "tool_state_changed",
                    serde_json::json!({ "tool": mode.as_str(), "active": true }),
                );
            }
            MeasureEvent::PointAdded {
                mode,
                index,
                position,
            } => {
                rpc_interface.send_notification(
                    "measure_point_added",
                    serde_json::json!({
                        "mode": mode.as_str(),
                        "index": index,
                        "position": [position.x, position.y, position.z],
                    }),
                );
            }
            MeasureEvent::Preview { mode, value, text } => {
                rpc_interface.send_notification(
                    "measure_updated",
                    serde_json::json!({ "mode": mode.as_str(), "value": value, "text": text }),
                );
            }
            MeasureEvent::Completed(result) => {
                let points: Vec<[f32; 3]> = result.points.iter().map(|p| p.to_array()).collect();
                rpc_interface.send_notification(
                    "measure_completed",
                    serde_json::json!({
                        "mode": result.mode.as_str(),
                        "value": result.value,
                        "text": result.text,
                        "points": points,
                    }),
                );
            }
            MeasureEvent::Closed { mode } => {
                if let Some(previous) = tool_manager.deactivate_current_tool() {
                    rpc_interface.send_notification(
                        "tool_state_changed",
                        serde_json::json!({ "tool": previous.to_string(), "active": false }),
                    );
                }
                rpc_interface.send_notification(
                    "measure_closed",
                    serde_json::json!({ "mode": mode.as_str() }),
                );
            }
        }
    }
}

#[derive(Resource, Default)]
pub struct MeasureSettingsLoader {
    handle: Option<Handle<MeasureSettings>>,
}

fn start_settings_loading(
    mut loader: ResMut<MeasureSettingsLoader>,
    asset_server: Res<AssetServer>,
) {
    loader.handle = Some(asset_server.load(SETTINGS_PATH));
}

/// Applies `measure_settings.json` once loaded and again whenever it changes on disk.
fn apply_measure_settings(
    mut events: EventReader<AssetEvent<MeasureSettings>>,
    loader: Res<MeasureSettingsLoader>,
    settings_assets: Res<Assets<MeasureSettings>>,
    mut tool: ResMut<MeasureTool>,
) {
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };
    for event in events.read() {
        let (AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id }) = event
        else {
            continue;
        };
        if *id != handle.id() {
            continue;
        }
        let Some(settings) = settings_assets.get(*id) else {
            continue;
        };
        match settings.validate() {
            Ok(()) => {
                info!("Measure settings loaded from {}", SETTINGS_PATH);
                tool.apply_settings(settings.clone());
            }
            Err(e) => warn!("Ignoring {}: {}", SETTINGS_PATH, e),
        }
    }
}

/// Measurement sessions, their helper visuals and labels.
pub struct MeasureToolPlugin;

impl Plugin for MeasureToolPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<MeasureSettings>::new(&["json"]))
            .init_resource::<MeasureTool>()
            .init_resource::<MeasureScene>()
            .init_resource::<MeasureLabels>()
            .init_resource::<MeasureSettingsLoader>()
            .init_resource::<MeasureMaterials>()
            .add_systems(Startup, start_settings_loading)
            .add_systems(
                Update,
                (
                    apply_measure_settings,
                    measure_input_system,
                    forward_measure_events,
                    sync_measure_visuals,
                    update_measure_labels,
                )
                    .chain(),
            );
    }
}
