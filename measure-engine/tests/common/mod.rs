#![allow(dead_code)]

use bevy::math::{Vec2, Vec3};
use measure_engine::tools::measure::host::{
    CursorStyle, HostSurface, MeasureHost, RayHit, RayProvider, VisualKind,
};
use measure_engine::tools::measure::scene::{LabelState, MeasureLabels, MeasureScene};

pub const CLIENT_SIZE: Vec2 = Vec2::new(400.0, 300.0);

/// Returns scripted hits for registered screen positions and nothing elsewhere.
#[derive(Default)]
pub struct ScriptedRays {
    targets: Vec<(Vec2, Vec<RayHit>)>,
    pub casts: usize,
}

impl RayProvider for ScriptedRays {
    fn cast_ray(&mut self, ndc: Vec2) -> Vec<RayHit> {
        self.casts += 1;
        let screen = Vec2::new(
            (ndc.x + 1.0) * 0.5 * CLIENT_SIZE.x,
            (1.0 - ndc.y) * 0.5 * CLIENT_SIZE.y,
        );
        self.targets
            .iter()
            .find(|(target, _)| target.distance(screen) < 0.5)
            .map(|(_, hits)| hits.clone())
            .unwrap_or_default()
    }
}

pub struct RecordingSurface {
    pub cursor: CursorStyle,
}

impl HostSurface for RecordingSurface {
    fn client_size(&self) -> Vec2 {
        CLIENT_SIZE
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }
}

/// In-memory host: the same scene and label stores the engine uses, plus scripted rays.
pub struct TestHost {
    pub scene: MeasureScene,
    pub labels: MeasureLabels,
    pub rays: ScriptedRays,
    pub surface: RecordingSurface,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            scene: MeasureScene::default(),
            labels: MeasureLabels::default(),
            rays: ScriptedRays::default(),
            surface: RecordingSurface {
                cursor: CursorStyle::Default,
            },
        }
    }

    pub fn host(&mut self) -> MeasureHost<'_> {
        MeasureHost {
            scene: &mut self.scene,
            rays: &mut self.rays,
            labels: &mut self.labels,
            surface: &mut self.surface,
        }
    }

    /// Makes `screen` hit solid ground at `point`.
    pub fn place(&mut self, screen: Vec2, point: Vec3) {
        self.place_hits(
            screen,
            vec![RayHit {
                name: Some("ground".to_string()),
                point,
                distance: 10.0,
            }],
        );
    }

    pub fn place_hits(&mut self, screen: Vec2, hits: Vec<RayHit>) {
        self.rays.targets.retain(|(target, _)| *target != screen);
        self.rays.targets.push((screen, hits));
    }

    pub fn visible_labels(&self) -> Vec<&LabelState> {
        self.labels
            .iter()
            .map(|(_, label)| label)
            .filter(|label| label.visible)
            .collect()
    }

    pub fn positions_of(&self, kind: VisualKind) -> Option<Vec<Vec3>> {
        self.scene
            .visual_of(kind)
            .map(|visual| visual.geometry.positions().to_vec())
    }
}

/// Distinct, well-separated screen position for the `i`-th scripted target.
pub fn spot(i: usize) -> Vec2 {
    Vec2::new(40.0 + 50.0 * i as f32, 120.0)
}

pub fn approx(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < 1e-4
}
