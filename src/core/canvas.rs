//! Canvas pointer-gesture math.
//!
//! Everything here is pure: the Dioxus canvas component feeds device-pixel
//! pointer positions in and reads provisional regions back out, committing
//! to the store only on pointer-up. Gestures are mutually exclusive per
//! pointer: panning, drawing, segment drag, segment resize.
//!
//! Two snap thresholds exist on purpose - image panning snaps in viewport
//! pixels while segment edges snap in image-relative percent - because the
//! gestures act in different coordinate spaces.

use crate::constants::{EDGE_SNAP_THRESHOLD_PCT, PAN_SNAP_THRESHOLD_PX};
use crate::state::{Region, MIN_REGION_PCT};

/// Smallest dimension (percent) a resize gesture may leave behind.
pub const MIN_RESIZE_PCT: f64 = 5.0;

/// The displayed image rectangle in device pixels, for px <-> percent mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasMetrics {
    /// Left edge of the displayed image within the viewport.
    pub image_left: f64,
    /// Top edge of the displayed image within the viewport.
    pub image_top: f64,
    /// Displayed image width in device pixels.
    pub image_width: f64,
    /// Displayed image height in device pixels.
    pub image_height: f64,
}

impl CanvasMetrics {
    /// Map a viewport point to image-percent coordinates (unclamped).
    pub fn to_percent(&self, device_x: f64, device_y: f64) -> (f64, f64) {
        let width = self.image_width.max(1.0);
        let height = self.image_height.max(1.0);
        (
            (device_x - self.image_left) / width * 100.0,
            (device_y - self.image_top) / height * 100.0,
        )
    }

    /// Convert a pixel delta to a percent delta.
    pub fn delta_to_percent(&self, dx: f64, dy: f64) -> (f64, f64) {
        let width = self.image_width.max(1.0);
        let height = self.image_height.max(1.0);
        (dx / width * 100.0, dy / height * 100.0)
    }
}

/// Which segment edge a resize handle grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Edges that magnetically snapped during the last gesture update, for the
/// transient snap-indicator overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
}

impl SnapHits {
    /// True when any edge snapped.
    pub fn any(&self) -> bool {
        self.left || self.right || self.top
    }
}

// =============================================================================
// Drawing
// =============================================================================

/// Provisional rectangle tracked from pointer-down to pointer-up while the
/// draw tool is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawGesture {
    origin: (f64, f64),
    current: (f64, f64),
    /// Optional fixed aspect ratio (width : height) in percent space.
    pub aspect: Option<(f64, f64)>,
}

impl DrawGesture {
    /// Begin at a pointer-down position in percent coordinates.
    pub fn begin(x_pct: f64, y_pct: f64, aspect: Option<(f64, f64)>) -> Self {
        Self {
            origin: (x_pct, y_pct),
            current: (x_pct, y_pct),
            aspect,
        }
    }

    /// Track the pointer.
    pub fn update(&mut self, x_pct: f64, y_pct: f64) {
        self.current = (x_pct, y_pct);
    }

    /// The provisional rectangle: normalized, aspect-constrained, clamped.
    pub fn provisional(&self) -> Region {
        let (ox, oy) = self.origin;
        let (cx, cy) = self.current;
        let mut width = (cx - ox).abs();
        let mut height = (cy - oy).abs();

        if let Some((rw, rh)) = self.aspect {
            if rw > 0.0 && rh > 0.0 {
                // Constrain to the ratio by deriving whichever dimension
                // yields the smaller delta, so the rect stays inside the
                // dragged extent.
                let height_from_width = width * rh / rw;
                let width_from_height = height * rw / rh;
                if height_from_width <= height {
                    height = height_from_width;
                } else {
                    width = width_from_height;
                }
            }
        }

        let x = if cx < ox { ox - width } else { ox };
        let y = if cy < oy { oy - height } else { oy };
        Region {
            x: x.clamp(0.0, 100.0),
            y: y.clamp(0.0, 100.0),
            width: width.min(100.0),
            height: height.min(100.0),
        }
    }

    /// Commit the gesture: `Some` only when both dimensions meet the
    /// minimum draw threshold.
    pub fn commit(&self) -> Option<Region> {
        let region = self.provisional();
        if region.width >= MIN_REGION_PCT && region.height >= MIN_REGION_PCT {
            Some(region.clamped())
        } else {
            None
        }
    }
}

// =============================================================================
// Segment drag
// =============================================================================

/// Moves an existing segment by a pointer delta, with magnetic edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveGesture {
    /// Region at pointer-down.
    pub start_region: Region,
}

impl MoveGesture {
    pub fn begin(start_region: Region) -> Self {
        Self { start_region }
    }

    /// Apply a percent-space delta and snap. Left/right/top edges snap to
    /// the image boundary; the bottom edge intentionally never snaps so
    /// tall portrait layouts keep free vertical placement.
    pub fn update(&self, dx_pct: f64, dy_pct: f64) -> (Region, SnapHits) {
        let mut region = Region {
            x: self.start_region.x + dx_pct,
            y: self.start_region.y + dy_pct,
            ..self.start_region
        };
        let mut hits = SnapHits::default();

        if region.x.abs() <= EDGE_SNAP_THRESHOLD_PCT {
            region.x = 0.0;
            hits.left = true;
        } else if (region.x + region.width - 100.0).abs() <= EDGE_SNAP_THRESHOLD_PCT {
            region.x = 100.0 - region.width;
            hits.right = true;
        }
        if region.y.abs() <= EDGE_SNAP_THRESHOLD_PCT {
            region.y = 0.0;
            hits.top = true;
        }

        region.x = region.x.clamp(0.0, 100.0 - region.width);
        region.y = region.y.clamp(0.0, 100.0 - region.height);
        (region, hits)
    }
}

// =============================================================================
// Segment resize
// =============================================================================

/// Resizes one edge of an existing segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGesture {
    /// Region at pointer-down.
    pub start_region: Region,
    /// Which handle was grabbed.
    pub edge: ResizeEdge,
}

impl ResizeGesture {
    pub fn begin(start_region: Region, edge: ResizeEdge) -> Self {
        Self { start_region, edge }
    }

    /// Apply a percent-space delta along the grabbed edge.
    ///
    /// Top/left/right edges snap to their boundary; bottom does not.
    /// Dimensions never shrink below the resize minimum.
    pub fn update(&self, dx_pct: f64, dy_pct: f64) -> (Region, SnapHits) {
        let start = self.start_region;
        let mut region = start;
        let mut hits = SnapHits::default();

        match self.edge {
            ResizeEdge::Left => {
                let mut new_x = start.x + dx_pct;
                if new_x.abs() <= EDGE_SNAP_THRESHOLD_PCT {
                    new_x = 0.0;
                    hits.left = true;
                }
                let right = start.x + start.width;
                new_x = new_x.clamp(0.0, right - MIN_RESIZE_PCT);
                region.x = new_x;
                region.width = right - new_x;
            }
            ResizeEdge::Right => {
                let mut new_right = start.x + start.width + dx_pct;
                if (new_right - 100.0).abs() <= EDGE_SNAP_THRESHOLD_PCT {
                    new_right = 100.0;
                    hits.right = true;
                }
                new_right = new_right.clamp(start.x + MIN_RESIZE_PCT, 100.0);
                region.width = new_right - start.x;
            }
            ResizeEdge::Top => {
                let mut new_y = start.y + dy_pct;
                if new_y.abs() <= EDGE_SNAP_THRESHOLD_PCT {
                    new_y = 0.0;
                    hits.top = true;
                }
                let bottom = start.y + start.height;
                new_y = new_y.clamp(0.0, bottom - MIN_RESIZE_PCT);
                region.y = new_y;
                region.height = bottom - new_y;
            }
            ResizeEdge::Bottom => {
                let new_bottom =
                    (start.y + start.height + dy_pct).clamp(start.y + MIN_RESIZE_PCT, 100.0);
                region.height = new_bottom - start.y;
            }
        }

        (region, hits)
    }
}

// =============================================================================
// Image panning
// =============================================================================

/// Translates the view pan while zoomed in (alt+drag).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    /// Pan offset at pointer-down, device pixels.
    pub start_pan: (f64, f64),
}

impl PanGesture {
    pub fn begin(start_pan: (f64, f64)) -> Self {
        Self { start_pan }
    }

    /// Pan follows the pointer 1:1 while the gesture is live.
    pub fn update(&self, dx_px: f64, dy_px: f64) -> (f64, f64) {
        (self.start_pan.0 + dx_px, self.start_pan.1 + dy_px)
    }

    /// On release, magnetically align the image's left/right/top edges with
    /// the viewport when within the pixel threshold. The bottom edge is
    /// deliberately excluded to preserve free vertical scroll for tall
    /// portrait images.
    pub fn release_snap(
        pan: (f64, f64),
        image: CanvasMetrics,
        viewport_width: f64,
    ) -> ((f64, f64), SnapHits) {
        let (mut pan_x, mut pan_y) = pan;
        let mut hits = SnapHits::default();

        if image.image_left.abs() <= PAN_SNAP_THRESHOLD_PX {
            pan_x -= image.image_left;
            hits.left = true;
        } else if (image.image_left + image.image_width - viewport_width).abs()
            <= PAN_SNAP_THRESHOLD_PX
        {
            pan_x += viewport_width - (image.image_left + image.image_width);
            hits.right = true;
        }
        if image.image_top.abs() <= PAN_SNAP_THRESHOLD_PX {
            pan_y -= image.image_top;
            hits.top = true;
        }

        ((pan_x, pan_y), hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> CanvasMetrics {
        CanvasMetrics {
            image_left: 100.0,
            image_top: 50.0,
            image_width: 800.0,
            image_height: 600.0,
        }
    }

    #[test]
    fn test_to_percent_maps_corners() {
        let m = metrics();
        assert_eq!(m.to_percent(100.0, 50.0), (0.0, 0.0));
        assert_eq!(m.to_percent(900.0, 650.0), (100.0, 100.0));
    }

    #[test]
    fn test_draw_commit_requires_minimum_size() {
        let mut gesture = DrawGesture::begin(10.0, 10.0, None);
        gesture.update(11.0, 11.0);
        assert!(gesture.commit().is_none());
        gesture.update(20.0, 30.0);
        let region = gesture.commit().unwrap();
        assert_eq!(region.x, 10.0);
        assert_eq!(region.width, 10.0);
        assert_eq!(region.height, 20.0);
    }

    #[test]
    fn test_draw_normalizes_upward_drag() {
        let mut gesture = DrawGesture::begin(50.0, 50.0, None);
        gesture.update(30.0, 20.0);
        let region = gesture.provisional();
        assert_eq!(region.x, 30.0);
        assert_eq!(region.y, 20.0);
        assert_eq!(region.width, 20.0);
        assert_eq!(region.height, 30.0);
    }

    #[test]
    fn test_draw_aspect_constrains_smaller_dimension() {
        // 2:1 ratio, dragged 40 wide x 10 tall: width derived from height
        // (20) beats height derived from width (20 > 10), so the rect stays
        // inside the dragged extent.
        let mut gesture = DrawGesture::begin(0.0, 0.0, Some((2.0, 1.0)));
        gesture.update(40.0, 10.0);
        let region = gesture.provisional();
        assert_eq!(region.width, 20.0);
        assert_eq!(region.height, 10.0);
    }

    #[test]
    fn test_move_snaps_left_and_top_but_not_bottom() {
        let start = Region::new(5.0, 5.0, 20.0, 20.0);
        let gesture = MoveGesture::begin(start);

        let (region, hits) = gesture.update(-4.0, 0.0);
        assert_eq!(region.x, 0.0);
        assert!(hits.left);

        let (region, hits) = gesture.update(0.0, -4.0);
        assert_eq!(region.y, 0.0);
        assert!(hits.top);

        // Near the bottom edge: no magnetic pull.
        let (region, hits) = gesture.update(0.0, 74.5);
        assert!((region.y - 79.5).abs() < 1e-9);
        assert!(!hits.any());
    }

    #[test]
    fn test_move_snaps_right_edge() {
        let start = Region::new(70.0, 10.0, 20.0, 20.0);
        let gesture = MoveGesture::begin(start);
        let (region, hits) = gesture.update(9.0, 0.0);
        assert_eq!(region.x + region.width, 100.0);
        assert!(hits.right);
    }

    #[test]
    fn test_resize_enforces_minimum_dimension() {
        let start = Region::new(10.0, 10.0, 20.0, 20.0);
        let gesture = ResizeGesture::begin(start, ResizeEdge::Right);
        let (region, _) = gesture.update(-19.0, 0.0);
        assert_eq!(region.width, MIN_RESIZE_PCT);
    }

    #[test]
    fn test_resize_top_snaps_bottom_does_not() {
        let start = Region::new(10.0, 1.0, 20.0, 20.0);
        let top = ResizeGesture::begin(start, ResizeEdge::Top);
        let (region, hits) = top.update(0.0, -0.5);
        assert_eq!(region.y, 0.0);
        assert!(hits.top);

        let near_bottom = Region::new(10.0, 70.0, 20.0, 29.0);
        let bottom = ResizeGesture::begin(near_bottom, ResizeEdge::Bottom);
        let (region, hits) = bottom.update(0.0, 0.5);
        assert!((region.y + region.height - 99.5).abs() < 1e-9);
        assert!(!hits.any());
    }

    #[test]
    fn test_pan_release_snaps_left_edge() {
        let image = CanvasMetrics {
            image_left: 10.0,
            image_top: 200.0,
            image_width: 1600.0,
            image_height: 1200.0,
        };
        let ((pan_x, _), hits) = PanGesture::release_snap((10.0, 0.0), image, 1280.0);
        assert_eq!(pan_x, 0.0);
        assert!(hits.left);
    }
}
