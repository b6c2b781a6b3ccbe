//! Fullscreen playback overlay.
//!
//! Renders the current segment's cropped page region aspect-fit into the
//! window, the pre-roll countdown, and an auto-hiding control bar. All
//! playback state lives in [`crate::core::player::Player`]; this component
//! only issues control calls and paints.

use std::rc::Rc;

use dioxus::desktop::use_window;
use dioxus::prelude::*;

use crate::constants::{
    BG_DEEPEST, BORDER_DEFAULT, CONTROLS_HIDE_DELAY_MS, TEXT_MUTED, TEXT_PRIMARY,
};
use crate::core::assets::AssetStore;
use crate::core::audio::playback::AudioPlaybackEngine;
use crate::core::events::EventBus;
use crate::core::player::{Player, PlayerPhase};
use crate::state::Project;
use crate::utils::format_timecode;

#[component]
pub fn PlayerOverlay(
    project: Signal<Project>,
    player: Signal<Player>,
    audio: Signal<Option<Rc<AudioPlaybackEngine>>>,
    bus: ReadOnlySignal<EventBus>,
    assets: AssetStore,
    on_close: EventHandler<()>,
) -> Element {
    let window = use_window();
    let window_for_fullscreen = window.clone();
    let window_for_close = window.clone();
    let mut controls_visible = use_signal(|| true);
    let mut always_show_controls = use_signal(|| false);
    let mut hide_token = use_signal(|| 0_u64);
    let mut progress_width = use_signal(|| 1.0_f64);
    let mut is_fullscreen = use_signal(|| false);

    let player_read = player.read().clone();
    let phase = player_read.phase();
    let position = player_read.position();
    let total = project.read().duration();
    let progress_fraction = if total > 0.0 {
        (position / total).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let progress_pct = progress_fraction * 100.0;

    // Resolve what to paint: the containing segment, or through a gap the
    // nearest preceding one.
    let frame = {
        let project_read = project.read();
        player_read.current_segment(&project_read).and_then(|(page_index, segment)| {
            let page = project_read.pages.get(page_index)?;
            let asset_id = page.asset_id?;
            let url = assets.asset_url(asset_id)?;
            let (iw, ih) = assets.image_dimensions(asset_id).unwrap_or((1920, 1080));
            Some((url, segment.region, iw as f64, ih as f64))
        })
    };

    let countdown_preview = matches!(phase, PlayerPhase::Countdown(_));
    let mut schedule_hide = move || {
        let token = hide_token() + 1;
        hide_token.set(token);
        spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(CONTROLS_HIDE_DELAY_MS)).await;
            if hide_token() == token && !always_show_controls() {
                controls_visible.set(false);
            }
        });
    };

    let sync_audio_to = move |position: f64| {
        if let Some(engine) = audio.read().as_ref() {
            engine.seek_seconds(position);
        }
    };

    let toggle_play = move |_| {
        player.write().toggle_play();
        let phase = player.read().phase();
        if let Some(engine) = audio.read().as_ref() {
            match phase {
                PlayerPhase::Playing => {
                    engine.seek_seconds(player.read().position());
                    engine.play();
                }
                PlayerPhase::Idle | PlayerPhase::Countdown(_) => engine.pause(),
            }
        }
    };

    let speed = player_read.speed();
    let speed_label = format!("{:.2}x", speed);
    let mute_label = if player_read.is_muted() { "Unmute" } else { "Mute" };
    let play_label = match phase {
        PlayerPhase::Playing => "Pause",
        PlayerPhase::Countdown(_) => "Cancel",
        PlayerPhase::Idle => "Play",
    };
    let position_text = format_timecode(position);
    let total_text = format_timecode(total);
    let controls_opacity = if controls_visible() || always_show_controls() {
        "1.0"
    } else {
        "0.0"
    };

    let button_style = format!(
        "font-size: 12px; padding: 6px 12px; cursor: pointer; border-radius: 4px;
         background-color: rgba(20, 20, 20, 0.85); color: {TEXT_PRIMARY};
         border: 1px solid {BORDER_DEFAULT};"
    );

    rsx! {
        div {
            style: "
                position: fixed; inset: 0; z-index: 5000;
                background-color: {BG_DEEPEST};
                display: flex; flex-direction: column;
            ",
            onmousemove: move |_| {
                controls_visible.set(true);
                if player.read().is_playing() {
                    schedule_hide();
                }
            },

            // Stage: the cropped segment region, aspect-fit and letterboxed.
            div {
                style: "flex: 1; display: flex; align-items: center; justify-content: center; overflow: hidden;",
                if let Some((url, region, iw, ih)) = frame {
                    {
                        let crop_w_px = region.width / 100.0 * iw;
                        let crop_h_px = region.height / 100.0 * ih;
                        let img_w = 100.0 * 100.0 / region.width;
                        let img_h = 100.0 * 100.0 / region.height;
                        let offset_x = region.x * 100.0 / region.width;
                        let offset_y = region.y * 100.0 / region.height;
                        let stage_opacity = if countdown_preview { "0.3" } else { "1.0" };
                        rsx! {
                            div {
                                style: "
                                    max-width: 100%; max-height: 100%;
                                    aspect-ratio: {crop_w_px} / {crop_h_px};
                                    width: 100%;
                                    position: relative; overflow: hidden;
                                    opacity: {stage_opacity};
                                ",
                                img {
                                    src: "{url}",
                                    draggable: "false",
                                    style: "
                                        position: absolute;
                                        width: {img_w}%; height: {img_h}%;
                                        left: -{offset_x}%; top: -{offset_y}%;
                                        max-width: none;
                                    ",
                                }
                            }
                        }
                    }
                } else {
                    div {
                        style: "color: {TEXT_MUTED}; font-size: 13px;",
                        "No visible segments to play"
                    }
                }
            }

            // Pre-roll countdown.
            if let PlayerPhase::Countdown(remaining) = phase {
                div {
                    style: "
                        position: absolute; inset: 0;
                        display: flex; align-items: center; justify-content: center;
                        pointer-events: none;
                    ",
                    span {
                        style: "font-size: 120px; font-weight: 600; color: {TEXT_PRIMARY}; text-shadow: 0 2px 16px rgba(0,0,0,0.8);",
                        "{remaining}"
                    }
                }
            }

            // Control bar (auto-hides while playing).
            div {
                style: "
                    display: flex; flex-direction: column; gap: 6px;
                    padding: 10px 16px 14px;
                    transition: opacity 0.25s ease; opacity: {controls_opacity};
                ",

                // Progress bar: click maps x-fraction onto the total duration.
                div {
                    style: "
                        height: 8px; border-radius: 4px; cursor: pointer;
                        background-color: rgba(255,255,255,0.15);
                        position: relative; overflow: hidden;
                    ",
                    onmounted: move |e| {
                        spawn(async move {
                            if let Ok(rect) = e.get_client_rect().await {
                                progress_width.set(rect.size.width.max(1.0));
                            }
                        });
                    },
                    onresize: move |e| {
                        if let Ok(size) = e.get_content_box_size() {
                            progress_width.set(size.width.max(1.0));
                        }
                    },
                    onclick: move |e| {
                        let fraction = e.element_coordinates().x / progress_width();
                        let target = player.write().scrub_fraction(&project.read(), fraction);
                        sync_audio_to(target);
                    },
                    div {
                        style: "
                            position: absolute; left: 0; top: 0; bottom: 0;
                            width: {progress_pct}%;
                            background-color: {TEXT_PRIMARY}; opacity: 0.8;
                        ",
                    }
                }

                div {
                    style: "display: flex; gap: 8px; align-items: center;",
                    button {
                        style: "{button_style}",
                        onclick: move |_| {
                            let target = player.write().skip_prev(&project.read());
                            if let Some(target) = target {
                                sync_audio_to(target);
                            }
                        },
                        "⏮"
                    }
                    button {
                        style: "{button_style}",
                        onclick: toggle_play,
                        "{play_label}"
                    }
                    button {
                        style: "{button_style}",
                        onclick: move |_| {
                            let target = player.write().skip_next(&project.read());
                            if let Some(target) = target {
                                sync_audio_to(target);
                            }
                        },
                        "⏭"
                    }
                    button {
                        style: "{button_style}",
                        onclick: move |_| {
                            let next = match player.read().speed() {
                                s if s < 1.0 => 1.0,
                                s if s < 1.5 => 1.5,
                                s if s < 2.0 => 2.0,
                                _ => 0.5,
                            };
                            player.write().set_speed(next);
                        },
                        "{speed_label}"
                    }
                    button {
                        style: "{button_style}",
                        onclick: move |_| {
                            player.write().toggle_mute();
                            if let Some(engine) = audio.read().as_ref() {
                                engine.set_muted(player.read().is_muted());
                            }
                        },
                        "{mute_label}"
                    }

                    TimeReadout { bus, fallback: "{position_text} / {total_text}" }

                    div { style: "flex: 1;" }

                    label {
                        style: "display: flex; gap: 4px; align-items: center; color: {TEXT_MUTED}; font-size: 11px;",
                        input {
                            r#type: "checkbox",
                            checked: always_show_controls(),
                            onchange: move |e| {
                                always_show_controls.set(e.checked());
                                controls_visible.set(true);
                            },
                        }
                        "Always show controls"
                    }
                    button {
                        style: "{button_style}",
                        onclick: move |_| {
                            let next = !is_fullscreen();
                            is_fullscreen.set(next);
                            window_for_fullscreen.set_fullscreen(next);
                        },
                        "Fullscreen"
                    }
                    button {
                        style: "{button_style}",
                        onclick: move |_| {
                            if is_fullscreen() {
                                window_for_close.set_fullscreen(false);
                            }
                            on_close.call(());
                        },
                        "Close"
                    }
                }
            }
        }
    }
}

/// Time readout driven by the playback-tick broadcast, not the store.
#[component]
fn TimeReadout(bus: ReadOnlySignal<EventBus>, fallback: String) -> Element {
    let mut last_tick = use_signal(|| None::<f64>);

    use_future(move || async move {
        let mut rx = bus.read().subscribe_ticks();
        loop {
            match rx.recv().await {
                Ok(tick) => last_tick.set(Some(tick.time)),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let text = match last_tick() {
        Some(time) => format_timecode(time),
        None => fallback.clone(),
    };

    rsx! {
        span {
            style: "font-size: 12px; color: #a1a1aa; font-variant-numeric: tabular-nums;",
            "{text}"
        }
    }
}
