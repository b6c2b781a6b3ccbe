use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Segment;

/// One imported image (or PDF-rendered page image) hosting zero or more segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Unique identifier
    pub id: Uuid,
    /// Reference into the external asset store.
    #[serde(rename = "assetId", default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<Uuid>,
    /// Transient display URL; persisted only for legacy projects that inlined
    /// image data before the asset store existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Segments drawn over this page, ordered by `order`.
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// True when this page was rendered from a PDF.
    #[serde(rename = "isPDF", default)]
    pub is_pdf: bool,
}

impl Page {
    /// Create a page backed by a stored asset.
    pub fn new(asset_id: Uuid, is_pdf: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id: Some(asset_id),
            data: None,
            segments: Vec::new(),
            is_pdf,
        }
    }

    /// Find a segment by id.
    pub fn find_segment(&self, id: Uuid) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Find a segment by id, mutably.
    pub fn find_segment_mut(&mut self, id: Uuid) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.id == id)
    }

    /// Sort segments by start time and renumber `order` to match.
    pub fn renumber_by_start_time(&mut self) {
        self.segments.sort_by(|a, b| {
            a.start_time
                .partial_cmp(&b.start_time)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.order.cmp(&b.order))
        });
        for (index, segment) in self.segments.iter_mut().enumerate() {
            segment.order = index as u32;
        }
    }

    /// Renumber `order` from current array positions without re-sorting.
    pub fn renumber_in_place(&mut self) {
        for (index, segment) in self.segments.iter_mut().enumerate() {
            segment.order = index as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Region;

    #[test]
    fn test_renumber_by_start_time() {
        let mut page = Page::new(Uuid::new_v4(), false);
        let mut a = Segment::new(0, Region::default(), 10.0, 15.0);
        a.label = "late".to_string();
        let mut b = Segment::new(0, Region::default(), 0.0, 5.0);
        b.label = "early".to_string();
        page.segments = vec![a, b];
        page.renumber_by_start_time();
        assert_eq!(page.segments[0].label, "early");
        assert_eq!(page.segments[0].order, 0);
        assert_eq!(page.segments[1].order, 1);
    }
}
