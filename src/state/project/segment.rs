use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest region dimension (percent of the page image) a draw gesture may commit.
pub const MIN_REGION_PCT: f64 = 3.0;
/// Smallest duration a segment may have, in seconds.
pub const MIN_SEGMENT_SECONDS: f64 = 0.1;

/// A rectangular region of interest expressed in percentages (0-100) of the
/// containing page image's displayed dimensions.
///
/// Percentage encoding keeps regions independent of the source image's pixel
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge as a percentage of image width.
    pub x: f64,
    /// Top edge as a percentage of image height.
    pub y: f64,
    /// Width as a percentage of image width.
    pub width: f64,
    /// Height as a percentage of image height.
    pub height: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        }
    }
}

impl Region {
    /// Create a region, clamped into the page bounds.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
        .clamped()
    }

    /// Return a copy clamped into [0,100] on both axes with the minimum size enforced.
    pub fn clamped(&self) -> Self {
        let width = self.width.max(MIN_REGION_PCT).min(100.0);
        let height = self.height.max(MIN_REGION_PCT).min(100.0);
        let x = self.x.clamp(0.0, 100.0 - width);
        let y = self.y.clamp(0.0, 100.0 - height);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when both dimensions meet the minimum draw-commit threshold.
    pub fn meets_minimum_size(&self) -> bool {
        self.width >= MIN_REGION_PCT && self.height >= MIN_REGION_PCT
    }

    /// Hit test a point in percentage coordinates.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Translate by a percentage delta, keeping the region inside the page.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
        .clamped()
    }

    /// Center point in percentage coordinates.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A named, time-addressed view into one page's region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Unique identifier
    pub id: Uuid,
    /// Index of the owning page in the project's pages array.
    pub page_index: usize,
    /// The cropped region of the page this segment displays.
    pub region: Region,
    /// User-facing display label.
    #[serde(default)]
    pub label: String,
    /// Start time in seconds on the merged multi-page timeline.
    pub start_time: f64,
    /// End time in seconds (always at least start_time + 0.1).
    pub end_time: f64,
    /// Hidden segments stay in the data but are skipped by playback.
    #[serde(default)]
    pub is_hidden: bool,
    /// Position within the owning page, the chain-mode sequencing key.
    #[serde(default)]
    pub order: u32,
    /// Optional color override (hex string, e.g. "#3b82f6").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Optional free-text presenter notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Segment {
    /// Create a new segment covering `region` on `page_index`.
    pub fn new(page_index: usize, region: Region, start_time: f64, end_time: f64) -> Self {
        let end_time = end_time.max(start_time + MIN_SEGMENT_SECONDS);
        Self {
            id: Uuid::new_v4(),
            page_index,
            region: region.clamped(),
            label: String::new(),
            start_time,
            end_time,
            is_hidden: false,
            order: 0,
            color: None,
            notes: None,
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// True when `time` falls inside this segment's half-open range.
    pub fn contains_time(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }

    /// Re-assert the minimum-duration invariant after a time edit.
    pub fn clamp_times(&mut self) {
        self.start_time = self.start_time.max(0.0);
        if self.end_time < self.start_time + MIN_SEGMENT_SECONDS {
            self.end_time = self.start_time + MIN_SEGMENT_SECONDS;
        }
    }
}

/// Find the segment under a point, top-most first (later additions draw on
/// top, so the last matching segment in the array wins).
pub fn segment_at_point(segments: &[Segment], px: f64, py: f64) -> Option<&Segment> {
    segments
        .iter()
        .rev()
        .find(|s| !s.is_hidden && s.region.contains(px, py))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_clamps_to_bounds() {
        let region = Region::new(95.0, 95.0, 20.0, 20.0);
        assert!(region.x + region.width <= 100.0);
        assert!(region.y + region.height <= 100.0);
        assert!(region.width >= MIN_REGION_PCT);
    }

    #[test]
    fn test_region_minimum_size() {
        let tiny = Region {
            x: 10.0,
            y: 10.0,
            width: 1.0,
            height: 8.0,
        };
        assert!(!tiny.meets_minimum_size());
        assert!(tiny.clamped().meets_minimum_size());
    }

    #[test]
    fn test_segment_minimum_duration() {
        let segment = Segment::new(0, Region::default(), 5.0, 5.0);
        assert!(segment.duration() >= MIN_SEGMENT_SECONDS);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut bottom = Segment::new(0, Region::new(0.0, 0.0, 50.0, 50.0), 0.0, 5.0);
        bottom.label = "bottom".to_string();
        let mut top = Segment::new(0, Region::new(10.0, 10.0, 20.0, 20.0), 5.0, 10.0);
        top.label = "top".to_string();
        let segments = vec![bottom, top];
        let hit = segment_at_point(&segments, 15.0, 15.0).unwrap();
        assert_eq!(hit.label, "top");
    }

    #[test]
    fn test_hidden_segments_skip_hit_test() {
        let mut segment = Segment::new(0, Region::new(0.0, 0.0, 50.0, 50.0), 0.0, 5.0);
        segment.is_hidden = true;
        let segments = vec![segment];
        assert!(segment_at_point(&segments, 10.0, 10.0).is_none());
    }

    #[test]
    fn test_segment_serialization_shape() {
        let segment = Segment::new(1, Region::new(10.0, 20.0, 30.0, 40.0), 0.0, 5.0);
        let json = serde_json::to_value(&segment).unwrap();
        assert!(json.get("pageIndex").is_some());
        assert!(json.get("startTime").is_some());
        assert!(json.get("isHidden").is_some());
        let parsed: Segment = serde_json::from_value(json).unwrap();
        assert_eq!(segment, parsed);
    }
}
