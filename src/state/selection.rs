//! Selection state shared across views.

use uuid::Uuid;

use crate::state::Page;

/// How a click modifies the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Clear everything and select one segment.
    Single,
    /// XOR the segment's membership (ctrl/cmd-click).
    Toggle,
    /// Select the inclusive span from the anchor to the clicked segment
    /// within the current page (shift-click).
    Range,
}

/// Tracks the currently selected segments plus the shift-click anchor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Selected segment IDs (membership only, unordered).
    pub segment_ids: Vec<Uuid>,
    /// Anchor for range selection: the last segment selected directly.
    pub last_selected: Option<Uuid>,
}

impl SelectionState {
    /// Clear the selection and the range anchor.
    pub fn clear(&mut self) {
        self.segment_ids.clear();
        self.last_selected = None;
    }

    /// True when the segment is part of the selection.
    pub fn contains(&self, id: Uuid) -> bool {
        self.segment_ids.contains(&id)
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.segment_ids.is_empty()
    }

    /// Replace the selection with a single segment.
    pub fn select_single(&mut self, id: Uuid) {
        self.segment_ids.clear();
        self.segment_ids.push(id);
        self.last_selected = Some(id);
    }

    /// Add or remove one segment from the selection.
    pub fn toggle(&mut self, id: Uuid) {
        if let Some(index) = self.segment_ids.iter().position(|s| *s == id) {
            self.segment_ids.remove(index);
            if self.last_selected == Some(id) {
                self.last_selected = self.segment_ids.last().copied();
            }
        } else {
            self.segment_ids.push(id);
            self.last_selected = Some(id);
        }
    }

    /// Apply a click in the given mode against the current page.
    ///
    /// Range selection walks the page's segment array between the anchor and
    /// the clicked segment; without an anchor (or with an anchor on another
    /// page) it degrades to a single select.
    pub fn select(&mut self, page: &Page, id: Uuid, mode: SelectMode) {
        match mode {
            SelectMode::Single => self.select_single(id),
            SelectMode::Toggle => self.toggle(id),
            SelectMode::Range => self.select_range(page, id),
        }
    }

    fn select_range(&mut self, page: &Page, id: Uuid) {
        let anchor = match self.last_selected {
            Some(anchor) => anchor,
            None => {
                self.select_single(id);
                return;
            }
        };
        let anchor_index = page.segments.iter().position(|s| s.id == anchor);
        let target_index = page.segments.iter().position(|s| s.id == id);
        let (Some(a), Some(b)) = (anchor_index, target_index) else {
            self.select_single(id);
            return;
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.segment_ids = page.segments[lo..=hi].iter().map(|s| s.id).collect();
        // The anchor stays put so the range can be re-extended.
        self.last_selected = Some(anchor);
    }

    /// Drop ids that no longer exist in the project after a delete.
    pub fn retain_existing(&mut self, existing: &[Uuid]) {
        self.segment_ids.retain(|id| existing.contains(id));
        if let Some(last) = self.last_selected {
            if !existing.contains(&last) {
                self.last_selected = self.segment_ids.last().copied();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Region, Segment};

    fn page_with_four() -> Page {
        let mut page = Page::new(Uuid::new_v4(), false);
        for i in 0..4 {
            let mut s = Segment::new(0, Region::default(), i as f64 * 5.0, (i + 1) as f64 * 5.0);
            s.order = i as u32;
            page.segments.push(s);
        }
        page
    }

    #[test]
    fn test_single_replaces() {
        let page = page_with_four();
        let mut selection = SelectionState::default();
        selection.select(&page, page.segments[0].id, SelectMode::Single);
        selection.select(&page, page.segments[1].id, SelectMode::Single);
        assert_eq!(selection.segment_ids, vec![page.segments[1].id]);
    }

    #[test]
    fn test_toggle_xors_membership() {
        let page = page_with_four();
        let mut selection = SelectionState::default();
        let id = page.segments[2].id;
        selection.select(&page, id, SelectMode::Toggle);
        assert!(selection.contains(id));
        selection.select(&page, id, SelectMode::Toggle);
        assert!(!selection.contains(id));
    }

    #[test]
    fn test_range_selects_inclusive_span() {
        // Selecting s0 single then s3 with range selects exactly {s0..s3}.
        let page = page_with_four();
        let mut selection = SelectionState::default();
        selection.select(&page, page.segments[0].id, SelectMode::Single);
        selection.select(&page, page.segments[3].id, SelectMode::Range);
        assert_eq!(selection.segment_ids.len(), 4);
        for segment in &page.segments {
            assert!(selection.contains(segment.id));
        }
    }

    #[test]
    fn test_range_without_anchor_degrades_to_single() {
        let page = page_with_four();
        let mut selection = SelectionState::default();
        selection.select(&page, page.segments[2].id, SelectMode::Range);
        assert_eq!(selection.segment_ids, vec![page.segments[2].id]);
    }
}
