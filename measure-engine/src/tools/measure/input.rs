//! Raw pointer/keyboard events to session calls.

use super::host::MeasureHost;
use super::session::MeasureSession;
use bevy::math::Vec2;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureKey {
    Enter,
    Escape,
}

/// Input the session reacts to, in host delivery order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp(Vec2),
    DoubleClick(Vec2),
    Key(MeasureKey),
}

/// Separates clicks from drags and swallows the echo click of a double-click.
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    moved: bool,
    last_commit: Option<Duration>,
    debounce: Duration,
}

impl InputDispatcher {
    pub fn new(debounce: Duration) -> Self {
        Self {
            moved: false,
            last_commit: None,
            debounce,
        }
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    /// Whether the pointer moved since the last press.
    pub fn pointer_moved(&self) -> bool {
        self.moved
    }

    /// Forwards `event` to `session`. `now` is a monotonic timestamp used for click debounce.
    pub fn dispatch(
        &mut self,
        event: InputEvent,
        now: Duration,
        session: &mut MeasureSession,
        host: &mut MeasureHost<'_>,
    ) {
        match event {
            InputEvent::PointerDown(_) => self.moved = false,
            InputEvent::PointerMove(position) => {
                if !session.is_active() {
                    return;
                }
                self.moved = true;
                session.on_pointer_move(position, host);
            }
            InputEvent::PointerUp(position) => {
                // Released after a drag: the user was orbiting, not picking.
                if self.moved {
                    return;
                }
                self.click(position, now, session, host);
            }
            InputEvent::DoubleClick(_) => session.complete(host),
            InputEvent::Key(MeasureKey::Enter) => session.complete(host),
            InputEvent::Key(MeasureKey::Escape) => session.cancel(host),
        }
    }

    fn click(
        &mut self,
        position: Vec2,
        now: Duration,
        session: &mut MeasureSession,
        host: &mut MeasureHost<'_>,
    ) {
        if !session.is_active() {
            return;
        }
        if self
            .last_commit
            .is_some_and(|last| now.saturating_sub(last) < self.debounce)
        {
            return;
        }
        if session.on_pick(position, host) {
            self.last_commit = Some(now);
        }
    }
}

/// Reports a double-click when two clicks land close together in time and space.
///
/// For hosts that only deliver presses and releases.
#[derive(Debug, Clone)]
pub struct DoubleClickDetector {
    window: Duration,
    slop: f32,
    last_click: Option<(Duration, Vec2)>,
}

impl DoubleClickDetector {
    pub fn new(window: Duration, slop: f32) -> Self {
        Self {
            window,
            slop,
            last_click: None,
        }
    }

    pub fn configure(&mut self, window: Duration, slop: f32) {
        self.window = window;
        self.slop = slop;
    }

    /// Registers a click; returns `true` if it completes a double-click.
    pub fn register(&mut self, now: Duration, position: Vec2) -> bool {
        let is_double = self.last_click.is_some_and(|(time, last)| {
            now.saturating_sub(time) <= self.window && last.distance(position) <= self.slop
        });
        // A third quick click starts a new pair instead of firing again.
        self.last_click = if is_double { None } else { Some((now, position)) };
        is_double
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_quick_close_clicks() {
        let mut detector = DoubleClickDetector::new(Duration::from_millis(500), 4.0);
        assert!(!detector.register(Duration::from_millis(0), Vec2::ZERO));
        assert!(detector.register(Duration::from_millis(200), Vec2::new(1.0, 1.0)));
        assert!(!detector.register(Duration::from_millis(300), Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn slow_or_distant_clicks_are_single() {
        let mut detector = DoubleClickDetector::new(Duration::from_millis(500), 4.0);
        assert!(!detector.register(Duration::from_millis(0), Vec2::ZERO));
        assert!(!detector.register(Duration::from_millis(900), Vec2::ZERO));
        assert!(!detector.register(Duration::from_millis(1000), Vec2::new(50.0, 0.0)));
    }
}
