use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;

use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::demo_scene::spawn_demo_scene;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::measure::MeasureToolPlugin;
use crate::tools::measure::plugin::measure_input_system;
use crate::tools::tool_manager::{
    ClearToolEvent, MeasureActionEvent, ToolManager, ToolSelectionEvent, handle_clear_tool_events,
    handle_measure_action_events, handle_tool_keyboard_shortcuts, handle_tool_selection_events,
};

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{FpsText, fps_text_update_system};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(WebRpcPlugin)
        .add_plugins(MeasureToolPlugin);

    app.init_resource::<ToolManager>()
        .init_resource::<ViewportCamera>()
        .add_event::<ToolSelectionEvent>()
        .add_event::<ClearToolEvent>()
        .add_event::<MeasureActionEvent>();

    app.add_systems(Startup, spawn_demo_scene);

    // Tool events are applied before this frame's pointer input reaches the session.
    app.add_systems(
        Update,
        (
            handle_tool_keyboard_shortcuts,
            handle_tool_selection_events,
            handle_clear_tool_events,
            handle_measure_action_events,
        )
            .chain()
            .before(measure_input_system),
    )
    .add_systems(Update, (camera_controller, fps_notification_system));

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, create_native_overlays)
            .add_systems(Update, fps_text_update_system);
    }

    app
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new(
                    "M distance | N area | B angle | click to pick, double-click or Enter to finish, Esc to close",
                ),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
