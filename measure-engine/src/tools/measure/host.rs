//! Contracts between the measurement core and the application hosting it.
//!
//! The core never touches the ECS directly. It talks to a scene it can attach
//! helper visuals to, a ray provider, a label overlay and the canvas surface.
//! The Bevy implementations live in [`super::scene`] and [`super::bevy_host`].

use bevy::math::{Vec2, Vec3};

/// Kind of helper visual owned by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// Committed picks.
    Points,
    /// Polyline through the committed picks.
    Boundary,
    /// Segment(s) from the last pick to the hover point.
    RubberBand,
    /// Area fill.
    Fill,
    /// Angle arc.
    Arc,
    /// Marker under the cursor.
    MouseMarker,
}

/// Identity of a helper visual. Unique across sessions thanks to the generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualId {
    pub generation: u32,
    pub kind: VisualKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Points(Vec<Vec3>),
    LineStrip(Vec<Vec3>),
    Triangles { positions: Vec<Vec3>, indices: Vec<u32> },
}

impl Geometry {
    pub fn positions(&self) -> &[Vec3] {
        match self {
            Self::Points(p) | Self::LineStrip(p) => p,
            Self::Triangles { positions, .. } => positions,
        }
    }
}

/// Full current state of one helper visual.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub kind: VisualKind,
    pub geometry: Geometry,
    pub visible: bool,
}

impl Visual {
    /// An empty, visible visual of the given kind.
    pub fn empty(kind: VisualKind) -> Self {
        let geometry = match kind {
            VisualKind::Points | VisualKind::MouseMarker => Geometry::Points(Vec::new()),
            VisualKind::Fill => Geometry::Triangles {
                positions: Vec::new(),
                indices: Vec::new(),
            },
            _ => Geometry::LineStrip(Vec::new()),
        };
        Self {
            kind,
            geometry,
            visible: true,
        }
    }
}

/// Scene the helper visuals are attached to.
///
/// `attach` replaces any visual already attached under the same id.
/// `detach` of an unknown id is a no-op.
pub trait SceneGraph {
    fn attach(&mut self, id: VisualId, visual: Visual);
    fn detach(&mut self, id: VisualId);
}

/// One ray intersection, as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// Name tag of the intersected object, if it has one.
    pub name: Option<String>,
    pub point: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
}

/// Casts a camera ray through a normalized device coordinate.
pub trait RayProvider {
    /// Every intersection along the ray, nearest first.
    fn cast_ray(&mut self, ndc: Vec2) -> Vec<RayHit>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(pub u32);

/// Screen-space text anchored to a world position.
pub trait LabelOverlay {
    fn create_label(&mut self) -> LabelId;
    fn update_label(&mut self, id: LabelId, text: &str, anchor: Vec3, visible: bool);
    fn remove_label(&mut self, id: LabelId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Crosshair,
}

/// Canvas the pointer events are relative to.
pub trait HostSurface {
    /// Layout (logical) size, not the backing-store pixel size.
    fn client_size(&self) -> Vec2;
    fn set_cursor(&mut self, cursor: CursorStyle);
}

/// Borrowed set of host collaborators handed to every session operation.
pub struct MeasureHost<'a> {
    pub scene: &'a mut dyn SceneGraph,
    pub rays: &'a mut dyn RayProvider,
    pub labels: &'a mut dyn LabelOverlay,
    pub surface: &'a mut dyn HostSurface,
}
