mod common;

use bevy::prelude::*;
use common::{TestHost, spot};
use measure_engine::rpc::web_rpc::WebRpcInterface;
use measure_engine::tools::measure::plugin::forward_measure_events;
use measure_engine::tools::measure::{MeasureMode, MeasureTool};
use measure_engine::tools::tool_manager::{ToolManager, ToolType};

fn app() -> App {
    let mut app = App::new();
    app.init_resource::<ToolManager>()
        .init_resource::<WebRpcInterface>()
        .init_resource::<MeasureTool>()
        .add_systems(Update, forward_measure_events);
    app
}

fn notified(app: &App) -> Vec<String> {
    app.world()
        .resource::<WebRpcInterface>()
        .pending_notifications()
        .iter()
        .map(|notification| notification.method.clone())
        .collect()
}

#[test]
fn session_start_and_close_drive_the_tool_manager() {
    let mut app = app();
    let mut host = TestHost::new();

    app.world_mut()
        .resource_mut::<MeasureTool>()
        .session
        .open(MeasureMode::Area, &mut host.host());
    app.update();

    assert_eq!(
        app.world().resource::<ToolManager>().active_tool(),
        Some(ToolType::Area)
    );
    assert_eq!(notified(&app), ["measure_started", "tool_state_changed"]);

    app.world_mut()
        .resource_mut::<MeasureTool>()
        .session
        .close(&mut host.host());
    app.update();

    assert_eq!(app.world().resource::<ToolManager>().active_tool(), None);
    assert_eq!(
        notified(&app)[2..],
        ["tool_state_changed", "measure_closed"]
    );
}

#[test]
fn completed_measurement_is_reported_with_its_points() {
    let mut app = app();
    let mut host = TestHost::new();
    host.place(spot(0), Vec3::ZERO);
    host.place(spot(1), Vec3::new(3.0, 4.0, 0.0));

    {
        let mut tool = app.world_mut().resource_mut::<MeasureTool>();
        tool.session.open(MeasureMode::Distance, &mut host.host());
        assert!(tool.session.on_pick(spot(0), &mut host.host()));
        assert!(tool.session.on_pick(spot(1), &mut host.host()));
        tool.session.complete(&mut host.host());
    }
    app.update();

    let rpc = app.world().resource::<WebRpcInterface>();
    let completed = rpc
        .pending_notifications()
        .iter()
        .find(|notification| notification.method == "measure_completed")
        .unwrap();
    assert_eq!(completed.params["mode"], "distance");
    assert_eq!(completed.params["text"], "5.00 m");
    assert_eq!(
        completed.params["points"],
        serde_json::json!([[0.0, 0.0, 0.0], [3.0, 4.0, 0.0]])
    );
    let added = rpc
        .pending_notifications()
        .iter()
        .filter(|notification| notification.method == "measure_point_added")
        .count();
    assert_eq!(added, 2);
}
