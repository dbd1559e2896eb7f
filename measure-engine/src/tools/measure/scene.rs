//! In-memory scene and label stores shared between the session and Bevy.
//!
//! The session writes through the [`SceneGraph`] / [`LabelOverlay`] traits;
//! the render systems in [`super::render`] read these resources and rebuild
//! meshes and UI nodes when they change.

use super::host::{LabelId, LabelOverlay, SceneGraph, Visual, VisualId, VisualKind};
use bevy::prelude::*;
use std::collections::HashMap;

/// Helper visuals currently attached, keyed by id.
#[derive(Resource, Default, Debug)]
pub struct MeasureScene {
    visuals: HashMap<VisualId, Visual>,
}

impl MeasureScene {
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Most recent visual of `kind`, across generations.
    pub fn visual_of(&self, kind: VisualKind) -> Option<&Visual> {
        self.visuals
            .iter()
            .filter(|(id, _)| id.kind == kind)
            .max_by_key(|(id, _)| id.generation)
            .map(|(_, visual)| visual)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VisualId, &Visual)> {
        self.visuals.iter()
    }
}

impl SceneGraph for MeasureScene {
    fn attach(&mut self, id: VisualId, visual: Visual) {
        self.visuals.insert(id, visual);
    }

    fn detach(&mut self, id: VisualId) {
        self.visuals.remove(&id);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelState {
    pub text: String,
    pub anchor: Vec3,
    pub visible: bool,
}

/// Live measurement labels, keyed by id.
#[derive(Resource, Default, Debug)]
pub struct MeasureLabels {
    next_id: u32,
    labels: HashMap<LabelId, LabelState>,
}

impl MeasureLabels {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, id: LabelId) -> Option<&LabelState> {
        self.labels.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LabelId, &LabelState)> {
        self.labels.iter()
    }
}

impl LabelOverlay for MeasureLabels {
    fn create_label(&mut self) -> LabelId {
        let id = LabelId(self.next_id);
        self.next_id += 1;
        self.labels.insert(
            id,
            LabelState {
                text: String::new(),
                anchor: Vec3::ZERO,
                visible: false,
            },
        );
        id
    }

    fn update_label(&mut self, id: LabelId, text: &str, anchor: Vec3, visible: bool) {
        if let Some(label) = self.labels.get_mut(&id) {
            label.text.clear();
            label.text.push_str(text);
            label.anchor = anchor;
            label.visible = visible;
        }
    }

    fn remove_label(&mut self, id: LabelId) {
        self.labels.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(generation: u32, kind: VisualKind) -> VisualId {
        VisualId { generation, kind }
    }

    #[test]
    fn attach_replaces_and_detach_tolerates_unknown() {
        let mut scene = MeasureScene::default();
        scene.attach(id(1, VisualKind::Points), Visual::empty(VisualKind::Points));
        scene.attach(id(1, VisualKind::Points), Visual::empty(VisualKind::Points));
        assert_eq!(scene.len(), 1);

        scene.detach(id(7, VisualKind::Arc));
        assert_eq!(scene.len(), 1);
        scene.detach(id(1, VisualKind::Points));
        scene.detach(id(1, VisualKind::Points));
        assert!(scene.is_empty());
    }

    #[test]
    fn visual_of_prefers_latest_generation() {
        let mut scene = MeasureScene::default();
        let mut old = Visual::empty(VisualKind::Arc);
        old.visible = false;
        scene.attach(id(1, VisualKind::Arc), old);
        scene.attach(id(2, VisualKind::Arc), Visual::empty(VisualKind::Arc));
        assert!(scene.visual_of(VisualKind::Arc).is_some_and(|v| v.visible));
    }

    #[test]
    fn labels_update_in_place() {
        let mut labels = MeasureLabels::default();
        let a = labels.create_label();
        let b = labels.create_label();
        assert_ne!(a, b);
        labels.update_label(a, "3.00 m", Vec3::X, true);
        let state = labels.get(a).expect("label a");
        assert_eq!(state.text, "3.00 m");
        assert!(state.visible);

        labels.remove_label(a);
        labels.update_label(a, "ignored", Vec3::Y, true);
        assert!(labels.get(a).is_none());
        assert_eq!(labels.len(), 1);
    }
}
