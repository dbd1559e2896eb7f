//! Interactive distance, area and angle measurement.
//!
//! The measuring logic is plain Rust and talks to the engine only through the
//! contracts in [`host`]: a scene graph for helper visuals, a ray provider for
//! picking, a label overlay and a host surface for cursor and viewport size.
//! [`bevy_host`] and [`render`] back those contracts with ECS resources, mesh ray
//! casting and UI nodes; tests back them with in-memory fakes.
//!
//! ```text
//! mouse / keyboard
//!   └─> InputDispatcher (click vs drag, debounce)
//!       └─> MeasureSession (Idle → Active → Completed → Closed)
//!           ├─> MeasureMode strategy (distance / area / angle)
//!           ├─> FeedbackRenderer ─> MeasureScene / MeasureLabels ─> entities
//!           └─> MeasureEvent queue ─> RPC notifications
//! ```

pub mod bevy_host;
pub mod feedback;
pub mod geometry;
pub mod host;
pub mod input;
pub mod mode;
pub mod picking;
pub mod plugin;
pub mod render;
pub mod scene;
pub mod session;
pub mod settings;
pub mod vertex_buffer;

pub use bevy_host::MeasureHostParam;
pub use host::MeasureHost;
pub use mode::MeasureMode;
pub use plugin::{MeasureTool, MeasureToolPlugin};
pub use session::{MeasureEvent, MeasureSession, MeasurementResult, SessionState};
pub use settings::{MeasureSettings, SettingsError};
