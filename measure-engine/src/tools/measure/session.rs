//! One measurement gesture from open to teardown.
//!
//! A session moves `Idle -> Active -> Completed -> Closed`. Picks and pointer
//! moves only count while `Active`; `complete` freezes the result and leaves the
//! feedback on screen, and `close` (or `cancel`, or reopening) detaches every
//! helper. Observers read the queued [`MeasureEvent`]s through `drain_events`.

use super::feedback::FeedbackRenderer;
use super::geometry::distance;
use super::host::{CursorStyle, MeasureHost, VisualKind};
use super::mode::{MeasureMode, Stroke};
use super::picking::PickingSurface;
use super::settings::MeasureSettings;
use super::vertex_buffer::VertexBuffer;
use bevy::log::{debug, info, warn};
use bevy::math::{Vec2, Vec3};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No session was ever opened.
    #[default]
    Idle,
    /// Accepting picks.
    Active,
    /// Frozen; feedback stays visible until closed.
    Completed,
    /// Torn down.
    Closed,
}

/// Outcome of a completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementResult {
    pub mode: MeasureMode,
    pub points: Vec<Vec3>,
    /// `None` when too few points were picked for the mode.
    pub value: Option<f32>,
    pub text: String,
}

/// Things the frontend may want to hear about, drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureEvent {
    Started { mode: MeasureMode },
    PointAdded { mode: MeasureMode, index: usize, position: Vec3 },
    Preview { mode: MeasureMode, value: f32, text: String },
    Completed(MeasurementResult),
    Closed { mode: MeasureMode },
}

/// One measurement interaction from `open` to `close`.
///
/// Picks are resolved through the host's ray provider, accumulated in order,
/// and mirrored to helper visuals through a [`FeedbackRenderer`]. Once
/// completed or closed every pointer-driven call is ignored.
#[derive(Debug, Default)]
pub struct MeasureSession {
    settings: MeasureSettings,
    state: SessionState,
    mode: MeasureMode,
    points: VertexBuffer,
    total_distance: f32,
    picker: Option<PickingSurface>,
    renderer: Option<FeedbackRenderer>,
    generation: u32,
    result: Option<MeasurementResult>,
    events: Vec<MeasureEvent>,
}

impl MeasureSession {
    pub fn new(settings: MeasureSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Replaces the settings used by the next `open`.
    pub fn set_settings(&mut self, settings: MeasureSettings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &MeasureSettings {
        &self.settings
    }

    /// Helper name fixed when the session opened, so spawned helpers stay
    /// invisible to the running picker even if settings reload mid-session.
    pub fn helper_name(&self) -> &str {
        self.picker
            .as_ref()
            .map_or(self.settings.helper_name.as_str(), PickingSurface::helper_name)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn points(&self) -> &[Vec3] {
        self.points.as_slice()
    }

    /// Running polyline length, accumulated pick by pick.
    pub fn total_distance(&self) -> f32 {
        self.total_distance
    }

    pub fn result(&self) -> Option<&MeasurementResult> {
        self.result.as_ref()
    }

    /// Current label text, empty when there is no label yet.
    pub fn label_text(&self) -> &str {
        self.renderer.as_ref().map_or("", |r| r.label_text())
    }

    pub fn drain_events(&mut self) -> Vec<MeasureEvent> {
        std::mem::take(&mut self.events)
    }

    /// Starts a fresh session, tearing down whatever the previous one left behind.
    pub fn open(&mut self, mode: MeasureMode, host: &mut MeasureHost<'_>) {
        self.close(host);

        self.generation = self.generation.wrapping_add(1);
        self.mode = mode;
        self.points = VertexBuffer::new(self.settings.max_points);
        self.total_distance = 0.0;
        self.result = None;
        self.picker = Some(PickingSurface::new(
            self.settings.max_pick_distance,
            self.settings.helper_name.clone(),
        ));
        self.renderer = Some(FeedbackRenderer::open(
            self.generation,
            mode.visual_kinds(),
            host.scene,
        ));
        self.state = SessionState::Active;
        host.surface.set_cursor(CursorStyle::Crosshair);

        info!("Measure session opened: {}", mode.as_str());
        self.events.push(MeasureEvent::Started { mode });
    }

    /// Commits the surface point under `screen`. Returns whether a point was added.
    pub fn on_pick(&mut self, screen: Vec2, host: &mut MeasureHost<'_>) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        let Some(picker) = &self.picker else {
            return false;
        };
        let client_size = host.surface.client_size();
        let Some(point) = picker.pick(screen, client_size, host.rays) else {
            return false;
        };
        self.commit(point, host)
    }

    fn commit(&mut self, point: Vec3, host: &mut MeasureHost<'_>) -> bool {
        if !self.points.push(point) {
            warn!(
                "Measure point limit reached ({:?}), pick ignored",
                self.settings.max_points
            );
            return false;
        }

        let points = self.points.as_slice();
        if let [.., previous, last] = points {
            self.total_distance += distance(*previous, *last);
        }

        if let Some(renderer) = self.renderer.as_mut() {
            self.mode.on_pick(&mut Stroke {
                vertices: &self.points,
                total_distance: self.total_distance,
                renderer,
                host: &mut *host,
                settings: &self.settings,
            });
        }

        let index = points.len() - 1;
        debug!(
            "Measure point {} at ({:.3}, {:.3}, {:.3})",
            index, point.x, point.y, point.z
        );
        self.events.push(MeasureEvent::PointAdded {
            mode: self.mode,
            index,
            position: point,
        });

        if self
            .mode
            .auto_complete_at()
            .is_some_and(|count| self.points.len() >= count)
        {
            self.complete(host);
        }
        true
    }

    /// Tracks the hover point: moves the mouse marker, redraws the rubber band
    /// and refreshes the live value in the label.
    pub fn on_pointer_move(&mut self, screen: Vec2, host: &mut MeasureHost<'_>) {
        if self.state != SessionState::Active {
            return;
        }
        let (Some(picker), Some(renderer)) = (&self.picker, self.renderer.as_mut()) else {
            return;
        };
        let client_size = host.surface.client_size();
        let Some(hover) = picker.pick(screen, client_size, host.rays) else {
            return;
        };

        renderer.set_mouse_marker(host.scene, hover);

        let Some(last) = self.points.last() else {
            return;
        };
        let mut band = vec![last, hover];
        if self.mode == MeasureMode::Area && self.points.len() >= 2 {
            band.extend(self.points.first());
        }
        renderer.set_rubber_band(host.scene, &band);

        let preview = self.mode.on_preview_move(
            &mut Stroke {
                vertices: &self.points,
                total_distance: self.total_distance,
                renderer,
                host: &mut *host,
                settings: &self.settings,
            },
            hover,
        );
        if let Some(value) = preview {
            self.events.push(MeasureEvent::Preview {
                mode: self.mode,
                value,
                text: self.mode.label_text(value),
            });
        }
    }

    /// Freezes the session and computes the final value. A second call is a no-op.
    pub fn complete(&mut self, host: &mut MeasureHost<'_>) {
        if self.state != SessionState::Active {
            return;
        }

        let points = self.points.as_slice();
        let mut value = None;
        let mut text = String::new();
        if let Some(renderer) = self.renderer.as_mut() {
            value = self.mode.on_finalize(&mut Stroke {
                vertices: &self.points,
                total_distance: self.total_distance,
                renderer: &mut *renderer,
                host: &mut *host,
                settings: &self.settings,
            });
            renderer.discard(host.scene, VisualKind::MouseMarker);
            renderer.discard(host.scene, VisualKind::RubberBand);
            if value.is_some() {
                text = renderer.label_text().to_string();
            }
        }

        self.state = SessionState::Completed;
        host.surface.set_cursor(CursorStyle::Default);

        match value {
            Some(v) => info!("Measure {} completed: {}", self.mode.as_str(), self.mode.label_text(v)),
            None => info!(
                "Measure {} completed without a valid result ({} points)",
                self.mode.as_str(),
                points.len()
            ),
        }

        let result = MeasurementResult {
            mode: self.mode,
            points: points.to_vec(),
            value,
            text,
        };
        self.events.push(MeasureEvent::Completed(result.clone()));
        self.result = Some(result);
    }

    pub fn cancel(&mut self, host: &mut MeasureHost<'_>) {
        self.close(host);
    }

    /// Detaches every helper visual and the label, and drops all picks. Safe to repeat.
    pub fn close(&mut self, host: &mut MeasureHost<'_>) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.close(host.scene, host.labels);
        }
        self.points.clear();
        self.total_distance = 0.0;
        self.picker = None;
        self.result = None;
        host.surface.set_cursor(CursorStyle::Default);

        if matches!(self.state, SessionState::Active | SessionState::Completed) {
            info!("Measure session closed: {}", self.mode.as_str());
            self.events.push(MeasureEvent::Closed { mode: self.mode });
            self.state = SessionState::Closed;
        }
    }
}
