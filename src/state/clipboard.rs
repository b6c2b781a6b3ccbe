//! Segment clipboard: value snapshots, not live references.

use crate::state::{Project, Segment};
use uuid::Uuid;

/// Holds copied segment snapshots until the next paste.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipboardState {
    /// Deep copies of the segments at the moment of copy.
    pub segments: Vec<Segment>,
}

impl ClipboardState {
    /// Snapshot the listed segments in global timeline order.
    pub fn copy_from(&mut self, project: &Project, ids: &[Uuid]) {
        let mut copied: Vec<Segment> = project
            .pages
            .iter()
            .flat_map(|p| p.segments.iter())
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect();
        copied.sort_by(|a, b| {
            a.start_time
                .partial_cmp(&b.start_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if !copied.is_empty() {
            self.segments = copied;
        }
    }

    /// True when there is nothing to paste.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Region;

    #[test]
    fn test_copy_keeps_snapshots() {
        let mut project = Project::new("Test");
        project.add_page(Uuid::new_v4(), false);
        let id = project
            .add_segment(0, Region::new(10.0, 10.0, 30.0, 30.0))
            .unwrap();
        let mut clipboard = ClipboardState::default();
        clipboard.copy_from(&project, &[id]);

        // Later edits do not affect the snapshot.
        project.set_segment_label(id, "renamed");
        assert_eq!(clipboard.segments.len(), 1);
        assert_ne!(clipboard.segments[0].label, "renamed");
    }

    #[test]
    fn test_copy_nothing_preserves_previous() {
        let project = Project::new("Test");
        let mut clipboard = ClipboardState::default();
        clipboard.segments = vec![Segment::new(0, Region::default(), 0.0, 5.0)];
        clipboard.copy_from(&project, &[Uuid::new_v4()]);
        assert_eq!(clipboard.segments.len(), 1);
    }
}
