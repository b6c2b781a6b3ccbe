//! Snapshot-based undo/redo.
//!
//! Checkpointing is caller-driven: every UI action that mutates segments
//! calls [`History::save_state`] immediately before applying the mutation.
//! Drag gestures checkpoint once at pointer-down, not per pointer-move.

use crate::state::{Page, SelectionState};

/// Maximum retained undo steps; oldest snapshots fall off the bottom.
const HISTORY_CAP: usize = 64;

/// One captured editor state: the mutable parts only.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Pages with their segments.
    pub pages: Vec<Page>,
    /// Selection at capture time.
    pub selection: SelectionState,
}

/// Undo/redo stacks over deep snapshots of the editor state.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl History {
    /// Push a checkpoint before a mutation. Clears the redo stack.
    pub fn save_state(&mut self, pages: &[Page], selection: &SelectionState) {
        self.undo_stack.push(Snapshot {
            pages: pages.to_vec(),
            selection: selection.clone(),
        });
        if self.undo_stack.len() > HISTORY_CAP {
            let overflow = self.undo_stack.len() - HISTORY_CAP;
            self.undo_stack.drain(0..overflow);
        }
        self.redo_stack.clear();
    }

    /// Swap the current state with the top of the undo stack.
    pub fn undo(&mut self, pages: &[Page], selection: &SelectionState) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(Snapshot {
            pages: pages.to_vec(),
            selection: selection.clone(),
        });
        Some(snapshot)
    }

    /// Swap the current state with the top of the redo stack.
    pub fn redo(&mut self, pages: &[Page], selection: &SelectionState) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(Snapshot {
            pages: pages.to_vec(),
            selection: selection.clone(),
        });
        Some(snapshot)
    }

    /// True when an undo step is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// True when a redo step is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop all history, e.g. after loading a different project.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Project, Region};
    use uuid::Uuid;

    #[test]
    fn test_undo_round_trip_restores_exactly() {
        let mut project = Project::new("Test");
        project.add_page(Uuid::new_v4(), false);
        let id = project
            .add_segment(0, Region::new(10.0, 10.0, 30.0, 30.0))
            .unwrap();
        let mut selection = SelectionState::default();
        selection.select_single(id);

        let before_pages = project.pages.clone();
        let before_selection = selection.clone();

        let mut history = History::default();
        history.save_state(&project.pages, &selection);
        project.delete_segments(&[id]);
        selection.clear();

        let snapshot = history.undo(&project.pages, &selection).unwrap();
        assert_eq!(snapshot.pages, before_pages);
        assert_eq!(snapshot.selection, before_selection);
    }

    #[test]
    fn test_redo_after_undo() {
        let mut project = Project::new("Test");
        project.add_page(Uuid::new_v4(), false);
        project.add_segment(0, Region::new(10.0, 10.0, 30.0, 30.0));
        let selection = SelectionState::default();

        let mut history = History::default();
        history.save_state(&project.pages, &selection);
        let mutated = {
            let mut p = project.clone();
            p.delete_segments(&[p.pages[0].segments[0].id]);
            p.pages
        };

        let restored = history.undo(&mutated, &selection).unwrap();
        assert_eq!(restored.pages[0].segments.len(), 1);
        assert!(history.can_redo());

        let redone = history.redo(&restored.pages, &selection).unwrap();
        assert!(redone.pages[0].segments.is_empty());
        assert!(history.can_undo());
    }

    #[test]
    fn test_new_checkpoint_clears_redo() {
        let selection = SelectionState::default();
        let mut history = History::default();
        history.save_state(&[], &selection);
        history.undo(&[], &selection);
        assert!(history.can_redo());
        history.save_state(&[], &selection);
        assert!(!history.can_redo());
    }
}
