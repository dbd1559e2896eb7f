//! JSON-RPC 2.0 bridge between the measure engine and a hosting web page.
//!
//! On wasm the engine runs in an iframe and talks to its parent window via
//! `postMessage`. Native builds run the same systems and drop outgoing messages.
//!
//! ## Message Flow
//!
//! ```text
//! Parent window  <──postMessage──>  Engine (iframe)
//!        │                                │
//!        ├─ Request (with ID) ──────────> │
//!        │                                ├─ handle_rpc_request
//!        │ <───────── Response (with ID) ─┤
//!        │                                │
//!        │ <──── Notification (no ID) ────┤
//! ```
//!
//! ## Request Handling
//!
//! `handle_rpc_request` is a plain function over an [`web_rpc::RpcContext`]
//! (fps, the measure session, the active tool). It never touches the world:
//! anything that changes engine state is pushed as an [`web_rpc::RpcCommand`]
//! and `handle_rpc_messages` turns those into tool and measure-action events
//! once every request of the frame has been answered. Requests without an ID
//! still run their commands but produce no response.
//!
//! Errors use the JSON-RPC 2.0 codes `-32700` (parse error), `-32601`
//! (method not found) and `-32602` (invalid params).
//!
//! ## Methods
//!
//! - `tool_selection`: open a distance/area/angle measurement (`{ "tool": "area" }`)
//! - `clear_tool`: close the current measurement and deactivate its tool
//! - `complete_measurement`: finalise the active measurement
//! - `cancel_measurement`: drop the active measurement, same as Escape
//! - `get_measurement`: session state, picked points and the latest value
//! - `get_fps`: current frame rate
//!
//! ## Notifications
//!
//! Pushed with `WebRpcInterface::send_notification` and flushed once per frame:
//! `measure_started`, `measure_point_added`, `measure_updated`,
//! `measure_completed`, `measure_closed`, `measure_action_completed`,
//! `tool_state_changed` and `fps_update`.

pub mod web_rpc;
