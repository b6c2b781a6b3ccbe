//! Right-hand panel: selected segment fields and batch time operations.

use dioxus::prelude::*;

use crate::constants::{
    BG_ELEVATED, BG_SURFACE, BORDER_DEFAULT, TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY,
};
use crate::state::{History, Project, SelectionState};
use crate::utils::parse_f64_input;

#[component]
pub fn PropertiesPanel(
    project: Signal<Project>,
    selection: Signal<SelectionState>,
    history: Signal<History>,
) -> Element {
    let selection_read = selection.read().clone();
    let selected_ids = selection_read.segment_ids.clone();
    let primary = selection_read
        .last_selected
        .and_then(|id| project.read().find_segment(id).map(|(_, s)| s.clone()));

    let mut shift_delta = use_signal(|| String::from("1.0"));
    let mut even_start = use_signal(|| String::from("0.0"));
    let mut even_end = use_signal(|| String::from("30.0"));
    let mut duration_value = use_signal(|| String::from("5.0"));
    let mut grid_value = use_signal(|| String::from("0.5"));

    let mut checkpoint = move || {
        history
            .write()
            .save_state(&project.read().pages, &selection.read());
    };

    let chain_mode = project.read().chain_mode;
    let chain_label = if chain_mode { "Chain mode: on" } else { "Chain mode: off" };
    let selected_count = selected_ids.len();

    let field_style = format!(
        "width: 100%; font-size: 11px; padding: 4px 6px; box-sizing: border-box;
         background-color: {BG_SURFACE}; color: {TEXT_PRIMARY};
         border: 1px solid {BORDER_DEFAULT}; border-radius: 3px;"
    );
    let button_style = format!(
        "font-size: 11px; padding: 4px 8px; cursor: pointer; border-radius: 3px;
         background-color: {BG_ELEVATED}; color: {TEXT_PRIMARY};
         border: 1px solid {BORDER_DEFAULT};"
    );
    let heading_style = format!(
        "font-size: 10px; font-weight: 500; color: {TEXT_MUTED};
         text-transform: uppercase; letter-spacing: 0.5px; margin-top: 8px;"
    );

    rsx! {
        div {
            style: "
                display: flex; flex-direction: column; gap: 6px;
                padding: 10px; overflow-y: auto; font-size: 11px;
                color: {TEXT_SECONDARY};
            ",

            button {
                style: "{button_style}",
                onclick: move |_| {
                    checkpoint();
                    project.write().toggle_chain_mode();
                },
                "{chain_label}"
            }

            if let Some(segment) = primary {
                {
                    let id = segment.id;
                    let label = segment.label.clone();
                    let color = segment.color.clone().unwrap_or_default();
                    let notes = segment.notes.clone().unwrap_or_default();
                    rsx! {
                        div { style: "{heading_style}", "Segment" }
                        input {
                            r#type: "text",
                            value: "{label}",
                            style: "{field_style}",
                            onchange: move |e| {
                                checkpoint();
                                project.write().set_segment_label(id, e.value());
                            },
                        }
                        input {
                            r#type: "text",
                            placeholder: "#3b82f6",
                            value: "{color}",
                            style: "{field_style}",
                            onchange: move |e| {
                                checkpoint();
                                project.write().set_segment_color(id, Some(e.value()));
                            },
                        }
                        textarea {
                            rows: "3",
                            placeholder: "Presenter notes",
                            value: "{notes}",
                            style: "{field_style} resize: vertical;",
                            onchange: move |e| {
                                checkpoint();
                                project.write().set_segment_notes(id, Some(e.value()));
                            },
                        }
                        div {
                            style: "display: flex; gap: 4px;",
                            button {
                                style: "{button_style} flex: 1;",
                                onclick: move |_| {
                                    checkpoint();
                                    project.write().duplicate_segment(id);
                                },
                                "Duplicate"
                            }
                            button {
                                style: "{button_style} flex: 1;",
                                onclick: move |_| {
                                    checkpoint();
                                    let ids = selection.read().segment_ids.clone();
                                    project.write().apply_aspect_ratio(&ids, 1.0, 1.0);
                                },
                                "1:1"
                            }
                            button {
                                style: "{button_style} flex: 1;",
                                onclick: move |_| {
                                    checkpoint();
                                    let ids = selection.read().segment_ids.clone();
                                    project.write().apply_aspect_ratio(&ids, 16.0, 9.0);
                                },
                                "16:9"
                            }
                        }
                    }
                }
            } else {
                div {
                    style: "color: {TEXT_MUTED};",
                    "Select a segment to edit its properties"
                }
            }

            div { style: "{heading_style}", "Batch ({selected_count} selected)" }

            div {
                style: "display: flex; gap: 4px; align-items: center;",
                input {
                    r#type: "text",
                    value: "{shift_delta}",
                    style: "{field_style} width: 50px;",
                    oninput: move |e| shift_delta.set(e.value()),
                }
                button {
                    style: "{button_style} flex: 1;",
                    onclick: move |_| {
                        let delta = parse_f64_input(&shift_delta(), 0.0);
                        let ids = selection.read().segment_ids.clone();
                        if delta != 0.0 && !ids.is_empty() {
                            checkpoint();
                            project.write().shift_times(&ids, delta);
                        }
                    },
                    "Shift times (s)"
                }
            }

            div {
                style: "display: flex; gap: 4px; align-items: center;",
                input {
                    r#type: "text",
                    value: "{even_start}",
                    style: "{field_style} width: 50px;",
                    oninput: move |e| even_start.set(e.value()),
                }
                input {
                    r#type: "text",
                    value: "{even_end}",
                    style: "{field_style} width: 50px;",
                    oninput: move |e| even_end.set(e.value()),
                }
                button {
                    style: "{button_style} flex: 1;",
                    onclick: move |_| {
                        let start = parse_f64_input(&even_start(), 0.0);
                        let end = parse_f64_input(&even_end(), 0.0);
                        let ids = selection.read().segment_ids.clone();
                        if end > start && !ids.is_empty() {
                            checkpoint();
                            project.write().space_evenly(&ids, start, end);
                        }
                    },
                    "Space evenly"
                }
            }

            div {
                style: "display: flex; gap: 4px; align-items: center;",
                input {
                    r#type: "text",
                    value: "{duration_value}",
                    style: "{field_style} width: 50px;",
                    oninput: move |e| duration_value.set(e.value()),
                }
                button {
                    style: "{button_style} flex: 1;",
                    onclick: move |_| {
                        let duration = parse_f64_input(&duration_value(), 0.0);
                        let ids = selection.read().segment_ids.clone();
                        if duration > 0.0 && !ids.is_empty() {
                            checkpoint();
                            project.write().set_duration_for(&ids, duration);
                        }
                    },
                    "Set duration"
                }
            }

            div {
                style: "display: flex; gap: 4px; align-items: center;",
                input {
                    r#type: "text",
                    value: "{grid_value}",
                    style: "{field_style} width: 50px;",
                    oninput: move |e| grid_value.set(e.value()),
                }
                button {
                    style: "{button_style} flex: 1;",
                    onclick: move |_| {
                        let grid = parse_f64_input(&grid_value(), 0.0);
                        let ids = selection.read().segment_ids.clone();
                        if grid > 0.0 && !ids.is_empty() {
                            checkpoint();
                            project.write().align_to_grid(&ids, grid);
                        }
                    },
                    "Snap to grid"
                }
            }

            button {
                style: "{button_style}",
                onclick: move |_| {
                    checkpoint();
                    project.write().show_all_segments();
                },
                "Show all segments"
            }
        }
    }
}
