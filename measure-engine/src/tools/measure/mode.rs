//! Per-mode measurement policy.
//!
//! Each session operation dispatches on the mode exactly once; everything that
//! differs between distance, area and angle lives here.

use super::feedback::FeedbackRenderer;
use super::geometry::{angle, angle_bisector, area, distance, format_magnitude, quadratic_bezier};
use super::host::{MeasureHost, VisualKind};
use super::settings::MeasureSettings;
use super::vertex_buffer::VertexBuffer;
use bevy::math::Vec3;
use constants::measure::{UNIT_ANGLE, UNIT_AREA, UNIT_DISTANCE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureMode {
    #[default]
    Distance,
    Area,
    Angle,
}

impl MeasureMode {
    /// Parse the identifier used by the frontend.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "distance" => Some(Self::Distance),
            "area" => Some(Self::Area),
            "angle" => Some(Self::Angle),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Area => "area",
            Self::Angle => "angle",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Distance => UNIT_DISTANCE,
            Self::Area => UNIT_AREA,
            Self::Angle => UNIT_ANGLE,
        }
    }

    /// Label text for a measured value, e.g. `"5.00 m"`.
    pub fn label_text(self, value: f32) -> String {
        format!("{} {}", format_magnitude(value), self.unit())
    }

    /// Helper visuals a session of this mode allocates on open.
    pub fn visual_kinds(self) -> &'static [VisualKind] {
        const DISTANCE: &[VisualKind] = &[
            VisualKind::Points,
            VisualKind::Boundary,
            VisualKind::RubberBand,
            VisualKind::MouseMarker,
        ];
        const AREA: &[VisualKind] = &[
            VisualKind::Points,
            VisualKind::Boundary,
            VisualKind::RubberBand,
            VisualKind::Fill,
            VisualKind::MouseMarker,
        ];
        const ANGLE: &[VisualKind] = &[
            VisualKind::Points,
            VisualKind::Boundary,
            VisualKind::RubberBand,
            VisualKind::Arc,
            VisualKind::MouseMarker,
        ];
        match self {
            Self::Distance => DISTANCE,
            Self::Area => AREA,
            Self::Angle => ANGLE,
        }
    }

    /// Number of picks after which the session completes on its own.
    pub fn auto_complete_at(self) -> Option<usize> {
        match self {
            Self::Angle => Some(3),
            Self::Distance | Self::Area => None,
        }
    }

    /// Redraws committed-point feedback after a pick was appended.
    pub(super) fn on_pick(self, stroke: &mut Stroke<'_, '_>) {
        let points = stroke.vertices.as_slice();
        stroke.renderer.set_points(stroke.host.scene, points);
        if points.len() > 1 {
            stroke.renderer.set_boundary(stroke.host.scene, points);
        }

        match self {
            Self::Distance => {
                if let Some(&last) = points.last() {
                    if points.len() > 1 {
                        let text = self.label_text(stroke.total_distance);
                        stroke.renderer.set_label(stroke.host.labels, &text, last, true);
                    }
                }
            }
            Self::Area => {
                if points.len() > 2 {
                    stroke.renderer.set_fill(stroke.host.scene, points);
                }
            }
            Self::Angle => {}
        }
    }

    /// Live value with the hover point as a provisional pick, if the mode has one yet.
    pub(super) fn on_preview_move(self, stroke: &mut Stroke<'_, '_>, hover: Vec3) -> Option<f32> {
        let points = stroke.vertices.as_slice();
        let &last = points.last()?;

        let value = match self {
            Self::Distance => stroke.total_distance + distance(last, hover),
            Self::Area => {
                if points.len() < 2 {
                    return None;
                }
                let provisional = stroke.vertices.with_appended(hover);
                stroke.renderer.set_fill(stroke.host.scene, &provisional);
                area(&provisional)
            }
            Self::Angle => {
                if points.len() != 2 {
                    return None;
                }
                return Some(stroke.show_angle(points[0], points[1], hover));
            }
        };

        let text = self.label_text(value);
        stroke.renderer.set_label(stroke.host.labels, &text, hover, true);
        Some(value)
    }

    /// Final value from the committed points only, or `None` when too few were picked.
    /// Invalid measurements have their feedback discarded.
    pub(super) fn on_finalize(self, stroke: &mut Stroke<'_, '_>) -> Option<f32> {
        let points = stroke.vertices.as_slice();
        match self {
            Self::Distance => {
                if points.len() < 2 {
                    stroke.discard_invalid();
                    return None;
                }
                let total = stroke.total_distance;
                let text = self.label_text(total);
                let anchor = points[points.len() - 1];
                stroke.renderer.set_label(stroke.host.labels, &text, anchor, true);
                Some(total)
            }
            Self::Area => {
                if points.len() <= 2 {
                    stroke.discard_invalid();
                    return None;
                }
                let mut closed = points.to_vec();
                closed.push(points[0]);
                stroke.renderer.set_boundary(stroke.host.scene, &closed);
                stroke.renderer.set_fill(stroke.host.scene, points);

                let value = area(points);
                let text = self.label_text(value);
                let anchor = points[points.len() - 1];
                stroke.renderer.set_label(stroke.host.labels, &text, anchor, true);
                Some(value)
            }
            Self::Angle => {
                if points.len() != 3 {
                    stroke.discard_invalid();
                    return None;
                }
                Some(stroke.show_angle(points[0], points[1], points[2]))
            }
        }
    }
}

/// Everything a mode needs to update feedback for one operation.
pub(super) struct Stroke<'a, 'h> {
    pub vertices: &'a VertexBuffer,
    pub total_distance: f32,
    pub renderer: &'a mut FeedbackRenderer,
    pub host: &'a mut MeasureHost<'h>,
    pub settings: &'a MeasureSettings,
}

impl Stroke<'_, '_> {
    /// Draws the arc at `p1` and moves the label onto the bisector. Returns the angle in degrees.
    fn show_angle(&mut self, p0: Vec3, p1: Vec3, p2: Vec3) -> f32 {
        let value = angle(p0, p1, p2);
        let dir0 = (p0 - p1).normalize_or_zero();
        let dir2 = (p2 - p1).normalize_or_zero();
        let bisector = angle_bisector(p0, p1, p2);

        let radius = distance(p0, p1).min(distance(p2, p1)) * self.settings.arc_radius_factor;
        let anchor = p1 + bisector * radius;
        let arc = quadratic_bezier(
            p1 + dir0 * radius,
            anchor,
            p1 + dir2 * radius,
            self.settings.arc_segments,
        );
        self.renderer.set_arc(self.host.scene, &arc);

        let text = MeasureMode::Angle.label_text(value);
        self.renderer.set_label(self.host.labels, &text, anchor, true);
        value
    }

    fn discard_invalid(&mut self) {
        for kind in [
            VisualKind::Points,
            VisualKind::Boundary,
            VisualKind::Fill,
            VisualKind::Arc,
        ] {
            self.renderer.discard(self.host.scene, kind);
        }
        self.renderer.hide_label(self.host.labels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip_through_strings() {
        for mode in [MeasureMode::Distance, MeasureMode::Area, MeasureMode::Angle] {
            assert_eq!(MeasureMode::from_string(mode.as_str()), Some(mode));
        }
        assert_eq!(MeasureMode::from_string("AREA"), Some(MeasureMode::Area));
        assert_eq!(MeasureMode::from_string("volume"), None);
    }

    #[test]
    fn label_text_carries_unit() {
        assert_eq!(MeasureMode::Distance.label_text(5.0), "5.00 m");
        assert_eq!(MeasureMode::Area.label_text(6.0), "6.00 m²");
        assert_eq!(MeasureMode::Angle.label_text(90.0), "90.00 °");
    }

    #[test]
    fn extra_visuals_per_mode() {
        assert!(!MeasureMode::Distance.visual_kinds().contains(&VisualKind::Fill));
        assert!(MeasureMode::Area.visual_kinds().contains(&VisualKind::Fill));
        assert!(MeasureMode::Angle.visual_kinds().contains(&VisualKind::Arc));
        assert_eq!(MeasureMode::Angle.auto_complete_at(), Some(3));
        assert_eq!(MeasureMode::Area.auto_complete_at(), None);
    }
}
