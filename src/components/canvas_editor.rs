//! The editor canvas: page image, segment overlays, and pointer gestures.
//!
//! Gesture math lives in `core::canvas`; this component feeds it pointer
//! positions and holds the provisional region locally until pointer-up.
//! Committing only on release keeps the store (and the undo stack) quiet
//! during a drag - one checkpoint at gesture start, one store write at the
//! end.

use dioxus::prelude::*;
use uuid::Uuid;

use crate::constants::{
    ACCENT_HIDDEN, ACCENT_SEGMENT, BG_DEEPEST, BORDER_ACCENT, SNAP_INDICATOR_DECAY_MS,
    TEXT_PRIMARY,
};
use crate::core::assets::AssetStore;
use crate::core::canvas::{
    CanvasMetrics, DrawGesture, MoveGesture, PanGesture, ResizeEdge, ResizeGesture, SnapHits,
};
use crate::state::{
    History, Project, Region, SelectMode, SelectionState, ViewState,
};

/// The pointer gesture currently in flight, if any.
#[derive(Clone, Copy, PartialEq)]
enum Gesture {
    Draw(DrawGesture),
    Move {
        id: Uuid,
        gesture: MoveGesture,
    },
    Resize {
        id: Uuid,
        gesture: ResizeGesture,
    },
    Pan(PanGesture),
}

#[component]
pub fn CanvasEditor(
    project: Signal<Project>,
    selection: Signal<SelectionState>,
    view: Signal<ViewState>,
    history: Signal<History>,
    assets: AssetStore,
    /// Aspect ratio lock for the draw tool (width, height), if any.
    draw_aspect: Option<(f64, f64)>,
) -> Element {
    let mut gesture = use_signal(|| None::<Gesture>);
    let mut gesture_origin = use_signal(|| (0.0_f64, 0.0_f64)); // client px at pointer-down
    let mut provisional = use_signal(|| None::<(Uuid, Region)>);
    let mut draw_preview = use_signal(|| None::<Region>);
    let mut snap_hits = use_signal(SnapHits::default);
    let mut snap_token = use_signal(|| 0_u64);
    let mut container_rect = use_signal(|| (0.0_f64, 0.0_f64, 800.0_f64, 600.0_f64)); // x, y, w, h

    let page_index = project.read().current_page_index;
    let (image_url, natural_size) = {
        let project_read = project.read();
        match project_read.current_page() {
            Some(page) => {
                let url = page
                    .asset_id
                    .and_then(|id| assets.asset_url(id))
                    .or_else(|| page.data.clone());
                let size = page
                    .asset_id
                    .and_then(|id| assets.image_dimensions(id))
                    .unwrap_or((1920, 1080));
                (url, size)
            }
            None => (None, (1920, 1080)),
        }
    };

    // Aspect-fit the image into the container, scaled by zoom, offset by pan.
    let (cx, cy, cw, ch) = container_rect();
    let view_state = view.read().clone();
    let (natural_w, natural_h) = (natural_size.0 as f64, natural_size.1 as f64);
    let fit_scale = (cw / natural_w.max(1.0)).min(ch / natural_h.max(1.0));
    let scale = fit_scale * view_state.zoom;
    let display_w = natural_w * scale;
    let display_h = natural_h * scale;
    let image_left = (cw - display_w) / 2.0 + view_state.pan_x;
    let image_top = (ch - display_h) / 2.0 + view_state.pan_y;
    let metrics = CanvasMetrics {
        image_left,
        image_top,
        image_width: display_w,
        image_height: display_h,
    };

    let segments: Vec<crate::state::Segment> = project
        .read()
        .current_page()
        .map(|page| page.segments.clone())
        .unwrap_or_default();
    let selection_read = selection.read().clone();
    let is_drawing_tool = view_state.is_drawing;

    let active = gesture().is_some();
    let cursor = match gesture() {
        Some(Gesture::Pan(_)) => "grabbing",
        Some(Gesture::Draw(_)) => "crosshair",
        Some(Gesture::Move { .. }) => "grabbing",
        Some(Gesture::Resize { .. }) => "ew-resize",
        None if is_drawing_tool => "crosshair",
        None => "default",
    };

    let mut clear_snap_later = move || {
        let token = snap_token() + 1;
        snap_token.set(token);
        spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(SNAP_INDICATOR_DECAY_MS)).await;
            if snap_token() == token {
                snap_hits.set(SnapHits::default());
            }
        });
    };

    rsx! {
        div {
            style: "
                position: relative; flex: 1; overflow: hidden;
                background-color: {BG_DEEPEST};
                cursor: {cursor};
                user-select: none;
            ",
            onmounted: move |e| {
                spawn(async move {
                    if let Ok(rect) = e.get_client_rect().await {
                        container_rect.set((
                            rect.origin.x,
                            rect.origin.y,
                            rect.size.width,
                            rect.size.height,
                        ));
                    }
                });
            },
            onresize: move |e| {
                if let Ok(size) = e.get_content_box_size() {
                    let (x, y, _, _) = container_rect();
                    container_rect.set((x, y, size.width, size.height));
                }
            },
            onmousedown: move |e| {
                if project.read().current_page().is_none() {
                    return;
                }
                let coords = e.element_coordinates();
                let client = e.client_coordinates();
                gesture_origin.set((client.x, client.y));
                let (px, py) = metrics.to_percent(coords.x, coords.y);

                if e.modifiers().alt() && view.read().zoom > 1.0 {
                    let pan = (view.read().pan_x, view.read().pan_y);
                    gesture.set(Some(Gesture::Pan(PanGesture::begin(pan))));
                    view.write().is_active_drag = true;
                    return;
                }

                if view.read().is_drawing {
                    gesture.set(Some(Gesture::Draw(DrawGesture::begin(px, py, draw_aspect))));
                    view.write().is_active_drag = true;
                    return;
                }

                // Select tool: hit-test, top-most segment first.
                let hit = {
                    let project_read = project.read();
                    project_read
                        .current_page()
                        .and_then(|page| {
                            crate::state::segment_at_point(&page.segments, px, py)
                                .map(|s| (s.id, s.region))
                        })
                };
                match hit {
                    Some((id, region)) => {
                        let mode = if e.modifiers().shift() {
                            SelectMode::Range
                        } else if e.modifiers().ctrl() || e.modifiers().meta() {
                            SelectMode::Toggle
                        } else {
                            SelectMode::Single
                        };
                        {
                            let project_read = project.read();
                            if let Some(page) = project_read.current_page() {
                                // A plain click on an already-selected segment keeps
                                // the multi-selection intact for a group drag.
                                let keep = mode == SelectMode::Single
                                    && selection.read().contains(id);
                                if !keep {
                                    selection.write().select(page, id, mode);
                                }
                            }
                        }
                        history
                            .write()
                            .save_state(&project.read().pages, &selection.read());
                        gesture.set(Some(Gesture::Move {
                            id,
                            gesture: MoveGesture::begin(region),
                        }));
                        view.write().is_active_drag = true;
                    }
                    None => {
                        selection.write().clear();
                    }
                }
            },

            if let Some(url) = image_url.clone() {
                img {
                    src: "{url}",
                    draggable: "false",
                    style: "
                        position: absolute;
                        left: {image_left}px; top: {image_top}px;
                        width: {display_w}px; height: {display_h}px;
                        pointer-events: none;
                    ",
                }
            } else {
                div {
                    style: "
                        position: absolute; inset: 0;
                        display: flex; align-items: center; justify-content: center;
                        color: {TEXT_PRIMARY}; opacity: 0.4; font-size: 13px;
                    ",
                    "Import an image to start drawing segments"
                }
            }

            // Segment overlays, drawn in array order so later segments sit on top.
            div {
                style: "
                    position: absolute;
                    left: {image_left}px; top: {image_top}px;
                    width: {display_w}px; height: {display_h}px;
                    pointer-events: none;
                ",
                for segment in segments.iter() {
                    {
                        let region = provisional()
                            .filter(|(id, _)| *id == segment.id)
                            .map(|(_, region)| region)
                            .unwrap_or(segment.region);
                        let selected = selection_read.contains(segment.id);
                        let color = segment
                            .color
                            .clone()
                            .unwrap_or_else(|| if segment.is_hidden {
                                ACCENT_HIDDEN.to_string()
                            } else {
                                ACCENT_SEGMENT.to_string()
                            });
                        let border = if selected {
                            format!("2px solid {BORDER_ACCENT}")
                        } else {
                            format!("1px solid {color}")
                        };
                        let opacity = if segment.is_hidden { "0.35" } else { "1.0" };
                        let id = segment.id;
                        let seg_region = region;
                        rsx! {
                            div {
                                key: "seg-{id}",
                                style: "
                                    position: absolute;
                                    left: {region.x}%; top: {region.y}%;
                                    width: {region.width}%; height: {region.height}%;
                                    border: {border};
                                    background-color: rgba(59, 130, 246, 0.12);
                                    opacity: {opacity};
                                ",
                                span {
                                    style: "
                                        position: absolute; left: 2px; top: 2px;
                                        font-size: 10px; color: {TEXT_PRIMARY};
                                        text-shadow: 0 1px 2px rgba(0,0,0,0.8);
                                        white-space: nowrap;
                                    ",
                                    "{segment.label}"
                                }
                                if selected {
                                    for (edge, style) in [
                                        (ResizeEdge::Top, "left: 0; right: 0; top: -3px; height: 6px; cursor: ns-resize;"),
                                        (ResizeEdge::Bottom, "left: 0; right: 0; bottom: -3px; height: 6px; cursor: ns-resize;"),
                                        (ResizeEdge::Left, "top: 0; bottom: 0; left: -3px; width: 6px; cursor: ew-resize;"),
                                        (ResizeEdge::Right, "top: 0; bottom: 0; right: -3px; width: 6px; cursor: ew-resize;"),
                                    ] {
                                        div {
                                            style: "position: absolute; {style} pointer-events: auto;",
                                            onmousedown: move |e| {
                                                e.prevent_default();
                                                e.stop_propagation();
                                                let client = e.client_coordinates();
                                                gesture_origin.set((client.x, client.y));
                                                history.write().save_state(
                                                    &project.read().pages,
                                                    &selection.read(),
                                                );
                                                gesture.set(Some(Gesture::Resize {
                                                    id,
                                                    gesture: ResizeGesture::begin(seg_region, edge),
                                                }));
                                                view.write().is_active_drag = true;
                                            },
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                if let Some(region) = draw_preview() {
                    div {
                        style: "
                            position: absolute;
                            left: {region.x}%; top: {region.y}%;
                            width: {region.width}%; height: {region.height}%;
                            border: 1px dashed {ACCENT_SEGMENT};
                            background-color: rgba(59, 130, 246, 0.18);
                        ",
                    }
                }
            }

            // Magnetic-snap indicator lines.
            if snap_hits().left {
                div { style: "position: absolute; left: {image_left}px; top: 0; bottom: 0; width: 1px; background-color: {BORDER_ACCENT};" }
            }
            if snap_hits().right {
                {
                    let right = image_left + display_w;
                    rsx! {
                        div { style: "position: absolute; left: {right}px; top: 0; bottom: 0; width: 1px; background-color: {BORDER_ACCENT};" }
                    }
                }
            }
            if snap_hits().top {
                div { style: "position: absolute; top: {image_top}px; left: 0; right: 0; height: 1px; background-color: {BORDER_ACCENT};" }
            }
        }

        // Full-viewport overlay captures the pointer while a gesture is live,
        // so movement outside the canvas keeps updating it.
        if active {
            div {
                style: "position: fixed; top: 0; left: 0; right: 0; bottom: 0; z-index: 9999; cursor: {cursor};",
                oncontextmenu: move |e| e.prevent_default(),
                onmousemove: move |e| {
                    let client = e.client_coordinates();
                    let (ox, oy) = gesture_origin();
                    let (dx_px, dy_px) = (client.x - ox, client.y - oy);
                    match gesture() {
                        Some(Gesture::Draw(mut draw)) => {
                            let (px, py) = metrics.to_percent(client.x - cx, client.y - cy);
                            draw.update(px, py);
                            draw_preview.set(Some(draw.provisional()));
                            gesture.set(Some(Gesture::Draw(draw)));
                        }
                        Some(Gesture::Move { id, gesture: move_gesture }) => {
                            let (dx, dy) = metrics.delta_to_percent(dx_px, dy_px);
                            let (region, hits) = move_gesture.update(dx, dy);
                            provisional.set(Some((id, region)));
                            snap_hits.set(hits);
                        }
                        Some(Gesture::Resize { id, gesture: resize_gesture }) => {
                            let (dx, dy) = metrics.delta_to_percent(dx_px, dy_px);
                            let (region, hits) = resize_gesture.update(dx, dy);
                            provisional.set(Some((id, region)));
                            snap_hits.set(hits);
                        }
                        Some(Gesture::Pan(pan)) => {
                            let (pan_x, pan_y) = pan.update(dx_px, dy_px);
                            let mut view_write = view.write();
                            view_write.pan_x = pan_x;
                            view_write.pan_y = pan_y;
                        }
                        None => {}
                    }
                },
                onmouseup: move |_| {
                    match gesture() {
                        Some(Gesture::Draw(draw)) => {
                            if let Some(region) = draw.commit() {
                                history
                                    .write()
                                    .save_state(&project.read().pages, &selection.read());
                                let new_id = project.write().add_segment(page_index, region);
                                if let Some(id) = new_id {
                                    selection.write().select_single(id);
                                }
                            }
                            draw_preview.set(None);
                        }
                        Some(Gesture::Move { id, .. }) | Some(Gesture::Resize { id, .. }) => {
                            if let Some((_, region)) = provisional() {
                                project.write().set_segment_region(id, region);
                            }
                            provisional.set(None);
                        }
                        Some(Gesture::Pan(_)) => {
                            let pan = (view.read().pan_x, view.read().pan_y);
                            let ((snapped_x, snapped_y), hits) =
                                PanGesture::release_snap(pan, metrics, cw);
                            let mut view_write = view.write();
                            view_write.pan_x = snapped_x;
                            view_write.pan_y = snapped_y;
                            drop(view_write);
                            snap_hits.set(hits);
                        }
                        None => {}
                    }
                    gesture.set(None);
                    view.write().is_active_drag = false;
                    clear_snap_later();
                },
            }
        }
    }
}
