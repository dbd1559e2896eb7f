//! Interactive measurement tools.
//!
//! ## Tool Manager Architecture
//!
//! The `ToolManager` resource tracks which measurement tool is active:
//! - Only one tool can be active at a time
//! - Tools are selected via keyboard shortcuts (native) or RPC (WASM)
//! - Selection opens a fresh measurement session; closing the session
//!   deactivates the tool and notifies the frontend
//!
//! ### Tool Activation Flow
//!
//! ```text
//! Keyboard/RPC Input
//!   └─> ToolSelectionEvent
//!       └─> handle_tool_selection_events()
//!           └─> MeasureSession::open()  (closes the previous session first)
//!               └─> MeasureEvent::Started
//!                   └─> forward_measure_events()
//!                       ├─> ToolManager::activate_tool()
//!                       └─> tool_state_changed notification
//! ```
//!
//! ## Available Tools
//!
//! | Tool       | Shortcut | RPC `tool` | Result                              |
//! |------------|----------|------------|-------------------------------------|
//! | Distance   | `M`      | `distance` | Polyline length in metres           |
//! | Area       | `N`      | `area`     | Polygon area in square metres       |
//! | Angle      | `B`      | `angle`    | Angle at the middle point, degrees  |
//!
//! Left click picks a point, a double-click or `Enter` finishes, `Escape`
//! closes the session. Clicks released after a drag are treated as camera
//! movement and never pick.
//!
//! ## Tool Coordination Events
//!
//! - `ToolSelectionEvent`: Open a measurement (keyboard or RPC source)
//! - `ClearToolEvent`: Close the current measurement
//! - `MeasureActionEvent`: Complete or cancel the current measurement

/// Distance, area and angle measurement sessions with on-screen feedback.
pub mod measure;

/// Tool manager coordinating tool selection with the measurement session.
pub mod tool_manager;
