//! Window geometry as it is stored in the preferences.

use crate::preferences::PreferenceNode;

pub const KEY_X: &str = "x";
pub const KEY_Y: &str = "y";
pub const KEY_WIDTH: &str = "width";
pub const KEY_HEIGHT: &str = "height";
pub const KEY_MAXIMIZED: &str = "maximized";
pub const KEY_FULLSCREEN: &str = "fullscreen";

/// Position and size in logical pixels plus the window mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub maximized: bool,
    pub fullscreen: bool,
    /// Never stored; a minimized window reports off-screen coordinates.
    pub minimized: bool,
}

impl WindowBounds {
    /// Bounds are only meaningful to persist in the normal window mode.
    pub fn is_normal(&self) -> bool {
        !self.maximized && !self.fullscreen && !self.minimized
    }

    pub fn has_position(node: &PreferenceNode) -> bool {
        node.contains(KEY_X) || node.contains(KEY_Y)
    }

    pub fn has_size(node: &PreferenceNode) -> bool {
        node.contains(KEY_WIDTH) || node.contains(KEY_HEIGHT)
    }

    /// Reads saved values, taking each missing key from `fallback`.
    pub fn read_from(node: Option<&PreferenceNode>, fallback: WindowBounds) -> WindowBounds {
        let Some(node) = node else {
            return fallback;
        };

        WindowBounds {
            x: node.get_f64(KEY_X, fallback.x),
            y: node.get_f64(KEY_Y, fallback.y),
            width: node.get_f64(KEY_WIDTH, fallback.width),
            height: node.get_f64(KEY_HEIGHT, fallback.height),
            maximized: node.get_bool(KEY_MAXIMIZED, fallback.maximized),
            fullscreen: node.get_bool(KEY_FULLSCREEN, fallback.fullscreen),
            minimized: fallback.minimized,
        }
    }

    pub fn write_bounds(&self, node: &mut PreferenceNode) {
        node.put_f64(KEY_X, self.x);
        node.put_f64(KEY_Y, self.y);
        node.put_f64(KEY_WIDTH, self.width);
        node.put_f64(KEY_HEIGHT, self.height);
    }

    pub fn write_flags(&self, node: &mut PreferenceNode) {
        node.put_bool(KEY_MAXIMIZED, self.maximized);
        node.put_bool(KEY_FULLSCREEN, self.fullscreen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WindowBounds {
        WindowBounds {
            x: 10.0,
            y: 20.0,
            width: 800.0,
            height: 600.0,
            maximized: false,
            fullscreen: false,
            minimized: false,
        }
    }

    #[test]
    fn missing_node_returns_fallback() {
        assert_eq!(WindowBounds::read_from(None, sample()), sample());
    }

    #[test]
    fn missing_keys_fall_back_individually() {
        let mut node = PreferenceNode::default();
        node.put_f64(KEY_WIDTH, 1280.0);
        node.put_bool(KEY_MAXIMIZED, true);

        let bounds = WindowBounds::read_from(Some(&node), sample());

        assert_eq!(bounds.width, 1280.0);
        assert!(bounds.maximized);
        assert_eq!(bounds.x, 10.0);
        assert_eq!(bounds.height, 600.0);
    }

    #[test]
    fn normal_mode_excludes_both_flags() {
        let mut bounds = sample();
        assert!(bounds.is_normal());
        bounds.fullscreen = true;
        assert!(!bounds.is_normal());
        bounds.fullscreen = false;
        bounds.maximized = true;
        assert!(!bounds.is_normal());
        bounds.maximized = false;
        bounds.minimized = true;
        assert!(!bounds.is_normal());
    }

    #[test]
    fn stored_keys_are_detected_per_group() {
        let mut node = PreferenceNode::default();
        assert!(!WindowBounds::has_position(&node));
        assert!(!WindowBounds::has_size(&node));

        node.put_bool(KEY_MAXIMIZED, true);
        assert!(!WindowBounds::has_position(&node));

        node.put_f64(KEY_HEIGHT, 600.0);
        assert!(WindowBounds::has_size(&node));
        assert!(!WindowBounds::has_position(&node));
    }

    #[test]
    fn writing_bounds_leaves_flags_alone() {
        let mut node = PreferenceNode::default();
        sample().write_bounds(&mut node);

        assert!(node.contains(KEY_X));
        assert!(!node.contains(KEY_MAXIMIZED));
    }
}
