use super::geometry::fan_indices;
use super::host::{Geometry, LabelId, LabelOverlay, SceneGraph, Visual, VisualId, VisualKind};
use bevy::math::Vec3;

/// Owns every helper visual and the label of one session.
///
/// Holds the ids it attached and is the only thing that detaches them; the
/// scene is never asked which objects belong to the tool. All `set_*`
/// operations replace the full state of a visual and are no-ops for visuals
/// this session never allocated or has already discarded.
#[derive(Debug)]
pub struct FeedbackRenderer {
    generation: u32,
    owned: Vec<VisualId>,
    label: Option<LabelId>,
    label_text: String,
}

impl FeedbackRenderer {
    /// Attaches an empty visual for each of `kinds`. The rubber band starts hidden.
    pub fn open(generation: u32, kinds: &[VisualKind], scene: &mut dyn SceneGraph) -> Self {
        let mut renderer = Self {
            generation,
            owned: Vec::with_capacity(kinds.len()),
            label: None,
            label_text: String::new(),
        };
        for &kind in kinds {
            let id = renderer.id(kind);
            let mut visual = Visual::empty(kind);
            visual.visible = kind != VisualKind::RubberBand;
            scene.attach(id, visual);
            renderer.owned.push(id);
        }
        renderer
    }

    fn id(&self, kind: VisualKind) -> VisualId {
        VisualId {
            generation: self.generation,
            kind,
        }
    }

    pub fn owns(&self, kind: VisualKind) -> bool {
        self.owned.contains(&self.id(kind))
    }

    fn set(&mut self, scene: &mut dyn SceneGraph, kind: VisualKind, geometry: Geometry, visible: bool) {
        if !self.owns(kind) {
            return;
        }
        scene.attach(
            self.id(kind),
            Visual {
                kind,
                geometry,
                visible,
            },
        );
    }

    pub fn set_points(&mut self, scene: &mut dyn SceneGraph, points: &[Vec3]) {
        self.set(scene, VisualKind::Points, Geometry::Points(points.to_vec()), true);
    }

    pub fn set_boundary(&mut self, scene: &mut dyn SceneGraph, vertices: &[Vec3]) {
        self.set(scene, VisualKind::Boundary, Geometry::LineStrip(vertices.to_vec()), true);
    }

    pub fn set_rubber_band(&mut self, scene: &mut dyn SceneGraph, vertices: &[Vec3]) {
        self.set(scene, VisualKind::RubberBand, Geometry::LineStrip(vertices.to_vec()), true);
    }

    /// Fan-triangulated fill around the last of `vertices`.
    pub fn set_fill(&mut self, scene: &mut dyn SceneGraph, vertices: &[Vec3]) {
        let geometry = Geometry::Triangles {
            positions: vertices.to_vec(),
            indices: fan_indices(vertices.len()),
        };
        self.set(scene, VisualKind::Fill, geometry, true);
    }

    pub fn set_arc(&mut self, scene: &mut dyn SceneGraph, points: &[Vec3]) {
        self.set(scene, VisualKind::Arc, Geometry::LineStrip(points.to_vec()), true);
    }

    pub fn set_mouse_marker(&mut self, scene: &mut dyn SceneGraph, point: Vec3) {
        self.set(scene, VisualKind::MouseMarker, Geometry::Points(vec![point]), true);
    }

    /// Detaches one visual for good.
    pub fn discard(&mut self, scene: &mut dyn SceneGraph, kind: VisualKind) {
        let id = self.id(kind);
        if let Some(index) = self.owned.iter().position(|owned| *owned == id) {
            self.owned.swap_remove(index);
            scene.detach(id);
        }
    }

    /// Creates the label on first use, then updates it in place.
    pub fn set_label(&mut self, labels: &mut dyn LabelOverlay, text: &str, anchor: Vec3, visible: bool) {
        let id = *self.label.get_or_insert_with(|| labels.create_label());
        labels.update_label(id, text, anchor, visible);
        self.label_text.clear();
        self.label_text.push_str(text);
    }

    /// Blanks and hides the label if one was ever created.
    pub fn hide_label(&mut self, labels: &mut dyn LabelOverlay) {
        if let Some(id) = self.label {
            labels.update_label(id, "", Vec3::ZERO, false);
        }
    }

    pub fn label_text(&self) -> &str {
        &self.label_text
    }

    /// Detaches everything still owned and removes the label.
    pub fn close(&mut self, scene: &mut dyn SceneGraph, labels: &mut dyn LabelOverlay) {
        for id in self.owned.drain(..) {
            scene.detach(id);
        }
        if let Some(label) = self.label.take() {
            labels.remove_label(label);
        }
        self.label_text.clear();
    }
}
