//! Chain-mode timeline conformance.
//!
//! When chain mode is active every structural segment edit funnels through
//! [`conform_timeline`], which rebuilds all start/end times from scratch:
//! one running cursor walks the pages in array order and each page's
//! segments in ascending `order`, so the whole project forms a single
//! contiguous tape. Durations survive the rebuild; positions do not.

use uuid::Uuid;

use crate::state::{Page, Segment, MIN_SEGMENT_SECONDS};

/// Reassign contiguous `[start_time, end_time)` ranges across all pages.
///
/// The cursor starts at 0 and advances across page boundaries: page N's
/// first segment starts exactly where page N-1's last segment ended. A
/// segment keeps its duration when positive, otherwise `default_duration`
/// is used. Calling this on an already-conformed timeline is a no-op.
pub fn conform_timeline(pages: &mut [Page], default_duration: f64) {
    let default_duration = default_duration.max(MIN_SEGMENT_SECONDS);
    let mut cursor = 0.0_f64;

    for page in pages.iter_mut() {
        page.segments.sort_by(|a, b| a.order.cmp(&b.order));
        for segment in page.segments.iter_mut() {
            let duration = if segment.duration() > 0.0 {
                segment.duration()
            } else {
                default_duration
            };
            segment.start_time = cursor;
            segment.end_time = cursor + duration;
            cursor = segment.end_time;
        }
    }
}

/// Remove the listed segments and close the gaps they leave behind.
///
/// Each surviving segment moves earlier by the total duration of every
/// deleted segment that originally started before it, reproducing ripple
/// delete without re-walking the timeline by order. Times clamp at zero
/// and the minimum segment length.
pub fn ripple_delete(pages: &mut [Page], ids: &[Uuid]) {
    let removed: Vec<(f64, f64)> = pages
        .iter()
        .flat_map(|page| page.segments.iter())
        .filter(|s| ids.contains(&s.id))
        .map(|s| (s.start_time, s.duration()))
        .collect();

    for page in pages.iter_mut() {
        page.segments.retain(|s| !ids.contains(&s.id));
        for segment in page.segments.iter_mut() {
            let ripple: f64 = removed
                .iter()
                .filter(|(start, _)| *start < segment.start_time)
                .map(|(_, duration)| duration)
                .sum();
            if ripple > 0.0 {
                segment.start_time = (segment.start_time - ripple).max(0.0);
                segment.end_time =
                    (segment.end_time - ripple).max(segment.start_time + MIN_SEGMENT_SECONDS);
            }
        }
        page.renumber_in_place();
    }
}

/// Shift every segment whose start lies at or after `from_time` later by `delta`.
pub fn shift_following(pages: &mut [Page], from_time: f64, delta: f64) {
    for page in pages.iter_mut() {
        for segment in page.segments.iter_mut() {
            if segment.start_time >= from_time {
                segment.start_time += delta;
                segment.end_time += delta;
                segment.clamp_times();
            }
        }
    }
}

/// The explicit "tape": all segments page-major, within a page by `order`.
pub fn global_segments_ordered(pages: &[Page]) -> Vec<&Segment> {
    let mut out = Vec::new();
    for page in pages {
        let mut indices: Vec<usize> = (0..page.segments.len()).collect();
        indices.sort_by_key(|&i| page.segments[i].order);
        out.extend(indices.into_iter().map(|i| &page.segments[i]));
    }
    out
}

/// Largest end time among visible segments across all pages.
pub fn max_visible_end(pages: &[Page]) -> f64 {
    pages
        .iter()
        .flat_map(|page| page.segments.iter())
        .filter(|s| !s.is_hidden)
        .map(|s| s.end_time)
        .fold(0.0, f64::max)
}

/// Largest end time among all segments, hidden included (the authoring tape).
pub fn max_end(pages: &[Page]) -> f64 {
    pages
        .iter()
        .flat_map(|page| page.segments.iter())
        .map(|s| s.end_time)
        .fold(0.0, f64::max)
}

/// Playback duration: the later of the last visible segment and the audio track.
pub fn total_duration(pages: &[Page], audio_duration: Option<f64>) -> f64 {
    max_visible_end(pages).max(audio_duration.unwrap_or(0.0))
}

/// Resolve the visible segment to display at `time`.
///
/// Prefers the segment whose `[start, end)` range contains the time; in a
/// gap it falls back to the nearest preceding segment so the display holds
/// the last shown region instead of going blank. Returns the owning page
/// index alongside the segment.
pub fn segment_at(pages: &[Page], time: f64) -> Option<(usize, &Segment)> {
    let mut containing: Option<(usize, &Segment)> = None;
    let mut preceding: Option<(usize, &Segment)> = None;

    for (page_index, page) in pages.iter().enumerate() {
        for segment in page.segments.iter().filter(|s| !s.is_hidden) {
            if segment.contains_time(time) {
                containing = Some((page_index, segment));
            }
            if segment.start_time <= time {
                let better = match preceding {
                    Some((_, current)) => segment.start_time > current.start_time,
                    None => true,
                };
                if better {
                    preceding = Some((page_index, segment));
                }
            }
        }
    }

    containing.or(preceding)
}

/// Round `time` to the nearest multiple of `grid_seconds`, floored at zero.
pub fn snap_time_to_grid(time: f64, grid_seconds: f64) -> f64 {
    if grid_seconds <= 0.0 {
        return time.max(0.0);
    }
    ((time / grid_seconds).round() * grid_seconds).max(0.0)
}

/// Check the chain-mode contiguity invariant within a floating point epsilon.
#[cfg(test)]
pub fn is_contiguous(pages: &[Page]) -> bool {
    let ordered = global_segments_ordered(pages);
    if let Some(first) = ordered.first() {
        if first.start_time.abs() > 1e-9 {
            return false;
        }
    }
    ordered
        .windows(2)
        .all(|pair| (pair[0].end_time - pair[1].start_time).abs() < 1e-9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Region;

    fn page_with(durations: &[f64], start_order: u32) -> Page {
        let mut page = Page::new(Uuid::new_v4(), false);
        for (i, duration) in durations.iter().enumerate() {
            let mut segment = Segment::new(0, Region::default(), 0.0, *duration);
            segment.order = start_order + i as u32;
            page.segments.push(segment);
        }
        page
    }

    #[test]
    fn test_conform_produces_contiguous_tape() {
        let mut pages = vec![page_with(&[5.0, 5.0], 0), page_with(&[5.0], 0)];
        conform_timeline(&mut pages, 5.0);
        assert!(is_contiguous(&pages));
        assert_eq!(pages[0].segments[0].start_time, 0.0);
        assert_eq!(pages[0].segments[1].start_time, 5.0);
        // Page 1 continues where page 0 ended.
        assert_eq!(pages[1].segments[0].start_time, 10.0);
        assert_eq!(pages[1].segments[0].end_time, 15.0);
    }

    #[test]
    fn test_conform_is_idempotent() {
        let mut pages = vec![page_with(&[2.0, 3.5, 1.0], 0)];
        conform_timeline(&mut pages, 5.0);
        let snapshot = pages.clone();
        conform_timeline(&mut pages, 5.0);
        assert_eq!(pages, snapshot);
    }

    #[test]
    fn test_conform_uses_default_for_zero_duration() {
        let mut page = Page::new(Uuid::new_v4(), false);
        let mut segment = Segment::new(0, Region::default(), 0.0, 0.0);
        // Bypass the constructor clamp to simulate a legacy zero-length segment.
        segment.end_time = segment.start_time;
        page.segments.push(segment);
        let mut pages = vec![page];
        conform_timeline(&mut pages, 4.0);
        assert_eq!(pages[0].segments[0].end_time, 4.0);
    }

    #[test]
    fn test_ripple_delete_preserves_downstream_durations() {
        // A[0,5) B[5,10) C[10,15); deleting B yields A[0,5) C[5,10).
        let mut pages = vec![page_with(&[5.0, 5.0, 5.0], 0)];
        conform_timeline(&mut pages, 5.0);
        let b_id = pages[0].segments[1].id;
        ripple_delete(&mut pages, &[b_id]);
        assert_eq!(pages[0].segments.len(), 2);
        assert_eq!(pages[0].segments[0].start_time, 0.0);
        assert_eq!(pages[0].segments[0].end_time, 5.0);
        assert_eq!(pages[0].segments[1].start_time, 5.0);
        assert_eq!(pages[0].segments[1].end_time, 10.0);
    }

    #[test]
    fn test_ripple_delete_multiple() {
        let mut pages = vec![page_with(&[5.0, 5.0, 5.0, 5.0], 0)];
        conform_timeline(&mut pages, 5.0);
        let ids = vec![pages[0].segments[0].id, pages[0].segments[2].id];
        ripple_delete(&mut pages, &ids);
        assert_eq!(pages[0].segments.len(), 2);
        assert_eq!(pages[0].segments[0].start_time, 0.0);
        assert_eq!(pages[0].segments[0].end_time, 5.0);
        assert_eq!(pages[0].segments[1].start_time, 5.0);
        assert_eq!(pages[0].segments[1].end_time, 10.0);
    }

    #[test]
    fn test_segment_at_prefers_containing() {
        let mut pages = vec![page_with(&[5.0, 5.0], 0)];
        conform_timeline(&mut pages, 5.0);
        let (_, segment) = segment_at(&pages, 6.0).unwrap();
        assert_eq!(segment.start_time, 5.0);
    }

    #[test]
    fn test_segment_at_falls_back_to_preceding_in_gap() {
        // A[0,5) and C[10,15); elapsed 7 resolves to A, not none.
        let mut page = page_with(&[5.0], 0);
        let mut c = Segment::new(0, Region::default(), 10.0, 15.0);
        c.order = 1;
        page.segments.push(c);
        page.segments[0].start_time = 0.0;
        page.segments[0].end_time = 5.0;
        let pages = vec![page];
        let (_, segment) = segment_at(&pages, 7.0).unwrap();
        assert_eq!(segment.end_time, 5.0);
    }

    #[test]
    fn test_segment_at_skips_hidden() {
        let mut pages = vec![page_with(&[5.0, 5.0], 0)];
        conform_timeline(&mut pages, 5.0);
        pages[0].segments[1].is_hidden = true;
        let (_, segment) = segment_at(&pages, 7.0).unwrap();
        assert_eq!(segment.start_time, 0.0);
    }

    #[test]
    fn test_total_duration_ignores_hidden_tail() {
        let mut pages = vec![page_with(&[5.0, 5.0], 0)];
        conform_timeline(&mut pages, 5.0);
        pages[0].segments[1].is_hidden = true;
        assert_eq!(total_duration(&pages, None), 5.0);
        assert_eq!(total_duration(&pages, Some(30.0)), 30.0);
        // The authoring tape still sees the hidden segment.
        assert_eq!(max_end(&pages), 10.0);
    }

    #[test]
    fn test_snap_time_to_grid() {
        assert_eq!(snap_time_to_grid(4.3, 0.5), 4.5);
        assert_eq!(snap_time_to_grid(4.2, 0.5), 4.0);
        assert_eq!(snap_time_to_grid(-1.0, 0.5), 0.0);
    }

    #[test]
    fn test_global_order_is_page_major() {
        let mut pages = vec![page_with(&[5.0, 5.0], 0), page_with(&[5.0], 0)];
        conform_timeline(&mut pages, 5.0);
        let ordered = global_segments_ordered(&pages);
        assert_eq!(ordered.len(), 3);
        assert!(ordered[0].end_time <= ordered[1].start_time + 1e-9);
        assert!(ordered[1].end_time <= ordered[2].start_time + 1e-9);
    }
}
