//! Page sidebar: thumbnails, navigation, removal.

use dioxus::prelude::*;

use crate::constants::{
    BG_ELEVATED, BG_HOVER, BG_SURFACE, BORDER_ACCENT, BORDER_DEFAULT, TEXT_MUTED, TEXT_PRIMARY,
};
use crate::core::assets::AssetStore;
use crate::state::{History, Project, SelectionState};

#[component]
pub fn PageList(
    project: Signal<Project>,
    selection: Signal<SelectionState>,
    history: Signal<History>,
    assets: AssetStore,
    on_import: EventHandler<()>,
) -> Element {
    let pages: Vec<(usize, Option<String>, usize, bool)> = {
        let project_read = project.read();
        project_read
            .pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let url = page
                    .asset_id
                    .and_then(|id| assets.asset_url(id))
                    .or_else(|| page.data.clone());
                (index, url, page.segments.len(), page.is_pdf)
            })
            .collect()
    };
    let current = project.read().current_page_index;

    rsx! {
        div {
            style: "
                display: flex; flex-direction: column; gap: 8px;
                padding: 8px; overflow-y: auto;
            ",
            for (index, url, segment_count, is_pdf) in pages {
                {
                    let is_current = index == current;
                    let page_number = index + 1;
                    let kind = if is_pdf { "PDF" } else { "image" };
                    let border = if is_current {
                        format!("2px solid {BORDER_ACCENT}")
                    } else {
                        format!("1px solid {BORDER_DEFAULT}")
                    };
                    rsx! {
                        div {
                            key: "page-{index}",
                            style: "
                                position: relative; border: {border}; border-radius: 4px;
                                background-color: {BG_ELEVATED}; cursor: pointer;
                                overflow: hidden;
                            ",
                            onclick: move |_| {
                                let mut project_write = project.write();
                                if index < project_write.pages.len() {
                                    project_write.current_page_index = index;
                                }
                                selection.write().clear();
                            },
                            if let Some(url) = url {
                                img {
                                    src: "{url}",
                                    draggable: "false",
                                    style: "width: 100%; height: 90px; object-fit: cover; display: block;",
                                }
                            } else {
                                div {
                                    style: "width: 100%; height: 90px; background-color: {BG_SURFACE};",
                                }
                            }
                            div {
                                style: "
                                    display: flex; align-items: center; justify-content: space-between;
                                    padding: 4px 6px; font-size: 10px; color: {TEXT_MUTED};
                                    background-color: {BG_SURFACE};
                                ",
                                span { "Page {page_number} · {kind} · {segment_count} seg" }
                                button {
                                    style: "
                                        border: none; background: transparent; color: {TEXT_MUTED};
                                        cursor: pointer; font-size: 10px; padding: 0 2px;
                                    ",
                                    onclick: move |e| {
                                        e.stop_propagation();
                                        history.write().save_state(
                                            &project.read().pages,
                                            &selection.read(),
                                        );
                                        project.write().remove_page(index);
                                        selection.write().clear();
                                    },
                                    "✕"
                                }
                            }
                        }
                    }
                }
            }
            button {
                style: "
                    border: 1px dashed {BORDER_DEFAULT}; border-radius: 4px;
                    background-color: transparent; color: {TEXT_PRIMARY};
                    padding: 10px; font-size: 11px; cursor: pointer;
                ",
                onclick: move |_| on_import.call(()),
                "+ Import image"
            }
            div { style: "height: 1px; background-color: {BG_HOVER};" }
        }
    }
}
