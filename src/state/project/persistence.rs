use std::fs;
use std::io;
use std::path::Path;

use chrono::Utc;

use crate::state::MIN_SEGMENT_SECONDS;
use super::Project;

impl Project {
    // =========================================================================
    // Save/Load
    // =========================================================================

    /// Save the project to its file
    pub fn save(&mut self) -> io::Result<()> {
        let path = self
            .project_path
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Project path not set"))?;
        self.save_to(&path)
    }

    /// Save the project to a specific file, atomically.
    ///
    /// Writes to a temp sibling first and renames over the target so a crash
    /// mid-write never leaves a truncated project on disk.
    pub fn save_to(&mut self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.modified_at = Utc::now();

        let json = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;

        log::info!("Saved project to {}", path.display());
        Ok(())
    }

    /// Load a project from a file.
    ///
    /// Older saved projects may lack fields introduced later; everything
    /// missing falls back to serde defaults and [`sanitize`](Self::sanitize)
    /// repairs whatever remains inconsistent. Load never rejects a project
    /// over a malformed segment.
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        let mut project: Project = serde_json::from_str(&json)?;
        project.project_path = Some(path.to_path_buf());
        project.current_page_index = 0;
        project.sanitize();
        Ok(project)
    }

    /// Create a new project at a path.
    pub fn create_at(path: &Path, name: impl Into<String>) -> io::Result<Self> {
        let mut project = Project::new(name);
        project.project_path = Some(path.to_path_buf());
        project.save_to(path)?;
        Ok(project)
    }

    /// Repair legacy or hand-edited data after deserialization.
    ///
    /// - `page_index` re-synced to the actual pages array
    /// - all-zero `order` fields (pre-`order` projects) re-derived from
    ///   array position
    /// - regions clamped back into page bounds and minimum size
    /// - time ranges clamped to the minimum duration
    /// - blank labels regenerated
    pub fn sanitize(&mut self) {
        let mut label_counter = 0_usize;
        for page_index in 0..self.pages.len() {
            let page = &mut self.pages[page_index];
            let orders_unset =
                page.segments.len() > 1 && page.segments.iter().all(|s| s.order == 0);
            for (index, segment) in page.segments.iter_mut().enumerate() {
                label_counter += 1;
                segment.page_index = page_index;
                if orders_unset {
                    segment.order = index as u32;
                }
                segment.region = segment.region.clamped();
                segment.clamp_times();
                if segment.label.trim().is_empty() {
                    segment.label = format!("Segment {}", label_counter);
                }
            }
        }

        if self.default_segment_duration < MIN_SEGMENT_SECONDS {
            self.default_segment_duration = MIN_SEGMENT_SECONDS;
        }
        if let Some(audio) = self.audio_file.as_mut() {
            if !audio.duration.is_finite() || audio.duration < 0.0 {
                audio.duration = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Region;
    use uuid::Uuid;

    #[test]
    fn test_save_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("segitelep-test-{}", Uuid::new_v4()));
        let path = dir.join("project.json");

        let mut project = Project::new("Round Trip");
        project.add_page(Uuid::new_v4(), false);
        project.add_segment(0, Region::new(10.0, 10.0, 30.0, 30.0));
        project.save_to(&path).unwrap();

        let loaded = Project::load(&path).unwrap();
        assert_eq!(loaded.name, "Round Trip");
        assert_eq!(loaded.segment_count(), 1);
        assert_eq!(loaded.pages[0].segments[0].label, "Segment 1");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_coerces_legacy_segments() {
        // A minimal legacy project: no order, no isHidden, blank label,
        // region out of bounds, inverted time range.
        let json = r#"{
            "id": "6a6f1fc0-0000-4000-8000-000000000001",
            "name": "Legacy",
            "createdAt": "2023-01-01T00:00:00Z",
            "modifiedAt": "2023-01-01T00:00:00Z",
            "pages": [
                {
                    "id": "6a6f1fc0-0000-4000-8000-000000000002",
                    "segments": [
                        {
                            "id": "6a6f1fc0-0000-4000-8000-000000000003",
                            "pageIndex": 7,
                            "region": {"x": 95.0, "y": 95.0, "width": 40.0, "height": 40.0},
                            "startTime": 5.0,
                            "endTime": 4.0
                        },
                        {
                            "id": "6a6f1fc0-0000-4000-8000-000000000004",
                            "pageIndex": 7,
                            "region": {"x": 0.0, "y": 0.0, "width": 50.0, "height": 50.0},
                            "startTime": 10.0,
                            "endTime": 15.0
                        }
                    ]
                }
            ]
        }"#;
        let mut project: Project = serde_json::from_str(json).unwrap();
        project.sanitize();

        let segment = &project.pages[0].segments[0];
        assert_eq!(segment.page_index, 0);
        assert!(segment.region.x + segment.region.width <= 100.0);
        assert!(segment.duration() >= MIN_SEGMENT_SECONDS);
        assert_eq!(segment.label, "Segment 1");
        assert!(!segment.is_hidden);
        // Orders re-derived from array position.
        assert_eq!(project.pages[0].segments[1].order, 1);
    }

    #[test]
    fn test_wire_shape_uses_camel_case() {
        let mut project = Project::new("Wire");
        project.add_page(Uuid::new_v4(), true);
        project.add_segment(0, Region::new(10.0, 10.0, 30.0, 30.0));
        let value = serde_json::to_value(&project).unwrap();
        let page = &value["pages"][0];
        assert!(page.get("assetId").is_some());
        assert_eq!(page["isPDF"], true);
        let segment = &page["segments"][0];
        for key in ["id", "pageIndex", "region", "label", "startTime", "endTime", "isHidden", "order"] {
            assert!(segment.get(key).is_some(), "missing key {key}");
        }
    }
}
