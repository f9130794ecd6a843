//! Service for persisting the main window's position, size and mode.
//!
//! Geometry changes are throttled: the first change opens a one-second window
//! and schedules a single write; changes inside that window are dropped. The
//! write reads the geometry when it fires, so it always reflects the latest
//! state of the burst.

use crate::preferences::Preferences;
use crate::state::window_bounds::{KEY_FULLSCREEN, KEY_MAXIMIZED};
use crate::state::WindowBounds;
use log::{debug, warn};
use std::time::{Duration, Instant};

/// The window operations the store needs, independent of the UI toolkit.
///
/// Coordinates are logical pixels.
pub trait ManagedWindow {
    fn position(&self) -> (f64, f64);
    fn set_position(&self, x: f64, y: f64);
    fn size(&self) -> (f64, f64);
    fn set_size(&self, width: f64, height: f64);
    fn is_maximized(&self) -> bool;
    fn set_maximized(&self, maximized: bool);
    fn is_fullscreen(&self) -> bool;
    fn set_fullscreen(&self, fullscreen: bool);
    fn is_minimized(&self) -> bool;

    /// Snapshot of the current geometry and mode.
    fn bounds(&self) -> WindowBounds {
        let (x, y) = self.position();
        let (width, height) = self.size();
        WindowBounds {
            x,
            y,
            width,
            height,
            maximized: self.is_maximized(),
            fullscreen: self.is_fullscreen(),
            minimized: self.is_minimized(),
        }
    }
}

/// Decides which geometry changes need a new delayed write.
#[derive(Debug)]
pub struct SaveThrottle {
    delay: Duration,
    accepted_at: Option<Instant>,
}

impl SaveThrottle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            accepted_at: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a change at `now`.
    ///
    /// Returns `true` if the caller must (re)start the delayed write; `false`
    /// if a write accepted less than `delay` ago already covers this change.
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.accepted_at {
            Some(accepted) if now.saturating_duration_since(accepted) < self.delay => false,
            _ => {
                self.accepted_at = Some(now);
                true
            }
        }
    }

    /// Clears the pending write once it has run.
    pub fn fired(&mut self) {
        self.accepted_at = None;
    }
}

/// Restores and saves the state of one window in one preference node.
pub struct WindowStateStore<W: ManagedWindow> {
    window: W,
    preferences: Preferences,
    namespace: String,
    throttle: SaveThrottle,
    closed: bool,
}

impl<W: ManagedWindow> WindowStateStore<W> {
    /// Binds `window` to the preference node `namespace`.
    pub fn register(
        preferences: Preferences,
        namespace: &str,
        window: W,
        save_delay: Duration,
    ) -> Self {
        Self {
            window,
            preferences,
            namespace: namespace.to_string(),
            throttle: SaveThrottle::new(save_delay),
            closed: false,
        }
    }

    #[cfg(test)]
    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn save_delay(&self) -> Duration {
        self.throttle.delay()
    }

    /// Applies previously saved values. Without saved state this is a no-op.
    ///
    /// Only stored groups are applied: before the window is shown its
    /// geometry reads as zero, so writing fallbacks back would pin it there.
    pub fn restore(&self) {
        let Some(node) = self.preferences.get_node(&self.namespace) else {
            debug!("No saved window state");
            return;
        };
        let bounds = WindowBounds::read_from(Some(node), self.window.bounds());
        debug!("Restoring window state {:?}", bounds);

        if WindowBounds::has_position(node) {
            self.window.set_position(bounds.x, bounds.y);
        }
        if WindowBounds::has_size(node) {
            self.window.set_size(bounds.width, bounds.height);
        }
        if node.contains(KEY_MAXIMIZED) {
            self.window.set_maximized(bounds.maximized);
        }
        if node.contains(KEY_FULLSCREEN) {
            self.window.set_fullscreen(bounds.fullscreen);
        }
    }

    /// Handles a move or resize at `now`.
    ///
    /// Returns `true` when a delayed write of `save_delay` must be scheduled,
    /// replacing any earlier one.
    pub fn geometry_changed(&mut self, now: Instant) -> bool {
        if self.closed {
            return false;
        }
        self.throttle.accept(now)
    }

    /// Runs the delayed write. Returns `true` if bounds were written.
    ///
    /// Bounds are skipped while maximized, minimized or full screen so the
    /// normal geometry is not replaced by a temporary one.
    pub fn write_pending(&mut self) -> bool {
        self.throttle.fired();
        if self.closed {
            return false;
        }

        let bounds = self.window.bounds();
        if !bounds.is_normal() {
            debug!("Not saving bounds outside the normal window state");
            return false;
        }

        bounds.write_bounds(self.preferences.node(&self.namespace));
        self.flush();
        true
    }

    /// Saves the final state and stops handling further changes.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.throttle.fired();

        let bounds = self.window.bounds();
        let node = self.preferences.node(&self.namespace);
        bounds.write_flags(node);
        if bounds.is_normal() {
            bounds.write_bounds(node);
        }
        self.flush();
    }

    fn flush(&self) {
        if let Err(e) = self.preferences.flush() {
            warn!("Failed to persist window state: {}", e);
        }
    }
}
