//! Bottom strip: the current page's segments in timeline order.

use dioxus::prelude::*;
use uuid::Uuid;

use crate::constants::{
    ACCENT_HIDDEN, BG_ELEVATED, BG_SURFACE, BORDER_ACCENT, BORDER_DEFAULT, TEXT_MUTED,
    TEXT_PRIMARY,
};
use crate::state::{History, Project, SelectMode, SelectionState};
use crate::utils::{format_timecode, parse_f64_input};

#[component]
pub fn SegmentStrip(
    project: Signal<Project>,
    selection: Signal<SelectionState>,
    history: Signal<History>,
) -> Element {
    let segments: Vec<crate::state::Segment> = {
        let project_read = project.read();
        project_read
            .current_page()
            .map(|page| {
                let mut segments = page.segments.clone();
                segments.sort_by(|a, b| a.order.cmp(&b.order));
                segments
            })
            .unwrap_or_default()
    };
    let selection_read = selection.read().clone();

    let mut checkpoint = move || {
        history
            .write()
            .save_state(&project.read().pages, &selection.read());
    };

    rsx! {
        div {
            style: "
                display: flex; gap: 6px; padding: 8px;
                overflow-x: auto; align-items: stretch;
                background-color: {BG_SURFACE}; border-top: 1px solid {BORDER_DEFAULT};
                min-height: 120px;
            ",
            if segments.is_empty() {
                div {
                    style: "color: {TEXT_MUTED}; font-size: 11px; align-self: center; padding: 0 12px;",
                    "No segments on this page yet"
                }
            }
            for segment in segments.iter() {
                {
                    let id = segment.id;
                    let selected = selection_read.contains(id);
                    let border = if selected {
                        format!("1px solid {BORDER_ACCENT}")
                    } else {
                        format!("1px solid {BORDER_DEFAULT}")
                    };
                    let start_text = format_timecode(segment.start_time);
                    let end_text = format_timecode(segment.end_time);
                    let start_value = format!("{:.1}", segment.start_time);
                    let end_value = format!("{:.1}", segment.end_time);
                    let start_time = segment.start_time;
                    let end_time = segment.end_time;
                    let eye = if segment.is_hidden { "🙈" } else { "👁" };
                    let eye_color = if segment.is_hidden { ACCENT_HIDDEN } else { TEXT_MUTED };
                    rsx! {
                        div {
                            key: "strip-{id}",
                            style: "
                                display: flex; flex-direction: column; gap: 4px;
                                min-width: 150px; padding: 6px 8px;
                                background-color: {BG_ELEVATED};
                                border: {border}; border-radius: 4px;
                                cursor: pointer; flex-shrink: 0;
                            ",
                            onclick: move |e| {
                                let mode = if e.modifiers().shift() {
                                    SelectMode::Range
                                } else if e.modifiers().ctrl() || e.modifiers().meta() {
                                    SelectMode::Toggle
                                } else {
                                    SelectMode::Single
                                };
                                let project_read = project.read();
                                if let Some(page) = project_read.current_page() {
                                    selection.write().select(page, id, mode);
                                }
                            },
                            div {
                                style: "display: flex; align-items: center; gap: 6px;",
                                span {
                                    style: "
                                        font-size: 11px; color: {TEXT_PRIMARY}; flex: 1;
                                        white-space: nowrap; overflow: hidden; text-overflow: ellipsis;
                                    ",
                                    "{segment.label}"
                                }
                                button {
                                    style: "border: none; background: transparent; color: {eye_color}; cursor: pointer; font-size: 10px;",
                                    onclick: move |e| {
                                        e.stop_propagation();
                                        checkpoint();
                                        project.write().toggle_segment_visibility(id);
                                    },
                                    "{eye}"
                                }
                            }
                            div {
                                style: "font-size: 10px; color: {TEXT_MUTED};",
                                "{start_text} – {end_text}"
                            }
                            div {
                                style: "display: flex; gap: 4px; align-items: center;",
                                input {
                                    r#type: "text",
                                    value: "{start_value}",
                                    style: "
                                        width: 44px; font-size: 10px; padding: 2px 4px;
                                        background-color: {BG_SURFACE}; color: {TEXT_PRIMARY};
                                        border: 1px solid {BORDER_DEFAULT}; border-radius: 3px;
                                    ",
                                    onclick: move |e| e.stop_propagation(),
                                    onchange: move |e| {
                                        let value = parse_f64_input(&e.value(), start_time);
                                        checkpoint();
                                        project.write().update_segment_times(id, Some(value), None);
                                    },
                                }
                                input {
                                    r#type: "text",
                                    value: "{end_value}",
                                    style: "
                                        width: 44px; font-size: 10px; padding: 2px 4px;
                                        background-color: {BG_SURFACE}; color: {TEXT_PRIMARY};
                                        border: 1px solid {BORDER_DEFAULT}; border-radius: 3px;
                                    ",
                                    onclick: move |e| e.stop_propagation(),
                                    onchange: move |e| {
                                        let value = parse_f64_input(&e.value(), end_time);
                                        checkpoint();
                                        project.write().update_segment_times(id, None, Some(value));
                                    },
                                }
                                button {
                                    style: "border: none; background: transparent; color: {TEXT_MUTED}; cursor: pointer; font-size: 10px;",
                                    onclick: move |e| {
                                        e.stop_propagation();
                                        checkpoint();
                                        project.write().move_segment_up(id);
                                    },
                                    "↑"
                                }
                                button {
                                    style: "border: none; background: transparent; color: {TEXT_MUTED}; cursor: pointer; font-size: 10px;",
                                    onclick: move |e| {
                                        e.stop_propagation();
                                        checkpoint();
                                        project.write().move_segment_down(id);
                                    },
                                    "↓"
                                }
                                button {
                                    style: "border: none; background: transparent; color: #ef4444; cursor: pointer; font-size: 10px;",
                                    onclick: move |e| {
                                        e.stop_propagation();
                                        checkpoint();
                                        project.write().delete_segments(&[id]);
                                        let existing: Vec<Uuid> = project
                                            .read()
                                            .pages
                                            .iter()
                                            .flat_map(|p| p.segments.iter().map(|s| s.id))
                                            .collect();
                                        selection.write().retain_existing(&existing);
                                    },
                                    "🗑"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
