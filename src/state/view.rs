//! Editor view state: zoom, pan, and the active tool.

use serde::{Deserialize, Serialize};

/// Minimum zoom factor.
pub const ZOOM_MIN: f64 = 0.5;
/// Maximum zoom factor.
pub const ZOOM_MAX: f64 = 4.0;

/// Zoom/pan/tool state for the editor canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Zoom factor, clamped to [0.5, 4.0].
    pub zoom: f64,
    /// Image pan offset in device pixels.
    pub pan_x: f64,
    /// Image pan offset in device pixels.
    pub pan_y: f64,
    /// True when the draw tool is active (false = select tool).
    pub is_drawing: bool,
    /// True while a pointer gesture is in flight; suppresses autosave.
    #[serde(skip)]
    pub is_active_drag: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            is_drawing: false,
            is_active_drag: false,
        }
    }
}

impl ViewState {
    /// Set the zoom factor, clamped into bounds.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Multiply the zoom factor (wheel/hotkey steps), clamped into bounds.
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    /// Reset pan when zoom returns to 1x - there is nothing to pan.
    pub fn reset_pan(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamps() {
        let mut view = ViewState::default();
        view.set_zoom(10.0);
        assert_eq!(view.zoom, ZOOM_MAX);
        view.set_zoom(0.1);
        assert_eq!(view.zoom, ZOOM_MIN);
    }
}
