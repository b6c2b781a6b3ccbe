//! Root application component
//!
//! This defines the main App component, the overall layout, and the wiring
//! between the editor store, the playback engine, the audio engine, and
//! the remote-control server.

use dioxus::prelude::*;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::components::{CanvasEditor, PageList, PlayerOverlay, PropertiesPanel, SegmentStrip};
use crate::constants::{
    BG_BASE, BG_ELEVATED, BG_SURFACE, BORDER_ACCENT, BORDER_DEFAULT, COUNTDOWN_BEEP_HZ,
    COUNTDOWN_BEEP_SECONDS, PANEL_DEFAULT_WIDTH, PLAYBACK_TICK_INTERVAL_MS, TEXT_MUTED,
    TEXT_PRIMARY,
};
use crate::core::assets::{AssetStore, AUDIO_EXTENSIONS, IMAGE_EXTENSIONS};
use crate::core::audio::decode::{decode_audio_to_f32, AudioDecodeConfig};
use crate::core::audio::playback::{AudioPlaybackEngine, AudioTrack};
use crate::core::audio::waveform;
use crate::core::coordinator;
use crate::core::events::{EventBus, RemoteEvent};
use crate::core::player::{Player, PlayerPhase, TickOutcome, PLAYER_OWNER_KEY};
use crate::core::timeline;
use crate::hotkeys::{handle_hotkey, HotkeyAction, HotkeyContext, HotkeyResult};
use crate::remote::{self, RemoteServer};
use crate::state::{AudioFile, ClipboardState, History, Project, SelectionState, ViewState};

fn open_asset_store() -> AssetStore {
    AssetStore::default_location()
        .or_else(|_| AssetStore::new(std::env::temp_dir().join("segitelep-assets")))
        .expect("Failed to open an asset store directory")
}

pub fn App() -> Element {
    let mut project = use_signal(Project::default);
    let mut selection = use_signal(SelectionState::default);
    let mut clipboard = use_signal(ClipboardState::default);
    let mut history = use_signal(History::default);
    let mut view = use_signal(ViewState::default);
    let mut player = use_signal(Player::new);
    let bus = use_signal(EventBus::new);
    let mut audio_engine = use_signal(|| None::<Rc<AudioPlaybackEngine>>);
    let mut player_open = use_signal(|| false);
    let mut notification = use_signal(|| None::<String>);
    let mut notification_token = use_signal(|| 0_u64);
    let mut remote_url = use_signal(|| None::<String>);
    let mut remote_state = use_signal(|| None::<remote::SharedState>);
    let mut draw_aspect = use_signal(|| None::<(f64, f64)>);
    // Abort flag for the waveform peak build in flight, if any. Replacing
    // the audio track flips it so the stale decode discards its result.
    let mut peak_abort = use_signal(|| None::<Arc<AtomicBool>>);
    let assets = use_signal(open_asset_store);

    let mut notify = move |message: String| {
        log::warn!("{}", message);
        notification.set(Some(message));
        let token = notification_token() + 1;
        notification_token.set(token);
        spawn(async move {
            tokio::time::sleep(Duration::from_secs(4)).await;
            if notification_token() == token {
                notification.set(None);
            }
        });
    };

    let mut ensure_audio_engine = move || -> Option<Rc<AudioPlaybackEngine>> {
        if let Some(engine) = audio_engine.read().as_ref() {
            return Some(engine.clone());
        }
        match AudioPlaybackEngine::new() {
            Ok(engine) => {
                let engine = Rc::new(engine);
                audio_engine.set(Some(engine.clone()));
                Some(engine)
            }
            Err(err) => {
                // Playback still works without audio, just on the wall clock.
                log::warn!("Audio output unavailable: {}", err);
                None
            }
        }
    };

    let pause_audio = move || {
        if let Some(engine) = audio_engine.read().as_ref() {
            engine.pause();
        }
    };

    let rewind_audio = move || {
        if let Some(engine) = audio_engine.read().as_ref() {
            engine.seek_seconds(0.0);
        }
    };

    let start_audio_at = move |position: f64| {
        if let Some(engine) = audio_engine.read().as_ref() {
            engine.seek_seconds(position);
            engine.play();
        }
    };

    // The player is an audio-producing surface; anything else that starts
    // playing asks it to stop through the coordinator.
    use_effect(move || {
        let bus_for_stop = bus.read().clone();
        coordinator::register_stop_callback(PLAYER_OWNER_KEY, move || {
            bus_for_stop.emit_remote(RemoteEvent::Pause);
        });
    });

    // Render loop: advance the clock, resolve the current segment, emit ticks.
    use_future(move || async move {
        loop {
            tokio::time::sleep(Duration::from_millis(PLAYBACK_TICK_INTERVAL_MS)).await;
            if !player.read().is_playing() {
                continue;
            }
            let audio_clock = {
                let has_audio_file = project.read().audio_file.is_some();
                audio_engine
                    .read()
                    .as_ref()
                    .filter(|engine| has_audio_file && engine.has_track())
                    .map(|engine| engine.playhead_seconds())
            };
            let outcome =
                player
                    .write()
                    .tick(&project.read(), audio_clock, Instant::now(), &bus.read());
            if outcome == TickOutcome::Finished {
                pause_audio();
                rewind_audio();
            }
        }
    });

    // Countdown: a real 1-second interval, only consulted in the countdown
    // phase, cleared implicitly by the phase change.
    use_future(move || async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            if !matches!(player.read().phase(), PlayerPhase::Countdown(_)) {
                continue;
            }
            let beep = player.write().countdown_tick();
            if beep {
                if let Some(engine) = ensure_audio_engine() {
                    engine.beep(COUNTDOWN_BEEP_HZ, COUNTDOWN_BEEP_SECONDS);
                }
            }
            if player.read().phase() == PlayerPhase::Playing {
                start_audio_at(player.read().position());
            }
        }
    });

    // Remote control server.
    use_future(move || async move {
        let server = RemoteServer::new(bus.read().clone(), remote::REMOTE_PORT);
        remote_state.set(Some(server.state()));
        remote_url.set(Some(remote::connection_url(remote::REMOTE_PORT)));
        if let Err(err) = server.start().await {
            log::warn!("Remote server failed: {}", err);
            remote_url.set(None);
        }
    });

    // Remote commands map 1:1 onto the player's control handlers.
    use_future(move || async move {
        let mut rx = bus.read().subscribe_remote();
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            };
            match event {
                RemoteEvent::Play => {
                    if !player_open() {
                        player_open.set(true);
                    }
                    if player.read().phase() == PlayerPhase::Idle {
                        ensure_audio_engine();
                        player.write().toggle_play();
                        if player.read().phase() == PlayerPhase::Playing {
                            start_audio_at(player.read().position());
                        }
                    }
                }
                RemoteEvent::Pause => {
                    if player.read().phase() != PlayerPhase::Idle {
                        player.write().toggle_play();
                        pause_audio();
                    }
                }
                RemoteEvent::Stop => {
                    player.write().stop();
                    pause_audio();
                    rewind_audio();
                }
                RemoteEvent::NextSegment => {
                    let target = player.write().skip_next(&project.read());
                    if let Some(target) = target {
                        if let Some(engine) = audio_engine.read().as_ref() {
                            engine.seek_seconds(target);
                        }
                    }
                }
                RemoteEvent::PrevSegment => {
                    let target = player.write().skip_prev(&project.read());
                    if let Some(target) = target {
                        if let Some(engine) = audio_engine.read().as_ref() {
                            engine.seek_seconds(target);
                        }
                    }
                }
                RemoteEvent::SetSpeed(speed) => {
                    player.write().set_speed(speed);
                }
                RemoteEvent::Seek(position) => {
                    player.write().seek(position);
                    if let Some(engine) = audio_engine.read().as_ref() {
                        engine.seek_seconds(position);
                    }
                }
                RemoteEvent::ResetPosition => {
                    player.write().seek(0.0);
                    rewind_audio();
                }
            }
        }
    });

    // Push status snapshots to connected remotes.
    use_future(move || async move {
        loop {
            tokio::time::sleep(Duration::from_millis(500)).await;
            let Some(state) = remote_state.read().clone() else {
                continue;
            };
            let status = {
                let project_read = project.read();
                let player_read = player.read();
                let visible: Vec<Uuid> = timeline::global_segments_ordered(&project_read.pages)
                    .into_iter()
                    .filter(|s| !s.is_hidden)
                    .map(|s| s.id)
                    .collect();
                let current_segment = player_read
                    .current_segment(&project_read)
                    .and_then(|(_, segment)| visible.iter().position(|id| *id == segment.id));
                remote::RemoteStatus {
                    is_playing: player_read.is_playing(),
                    current_speed: player_read.speed(),
                    current_segment,
                    total_segments: visible.len(),
                    project_name: project_read.name.clone(),
                    timestamp: 0,
                    connected_clients: 0,
                }
            };
            remote::update_status(state, status).await;
        }
    });

    // Autosave, held off while a pointer gesture is mid-flight.
    use_future(move || async move {
        loop {
            tokio::time::sleep(Duration::from_secs(30)).await;
            if view.read().is_active_drag {
                continue;
            }
            let has_path = project.read().project_path.is_some();
            if !has_path {
                continue;
            }
            let result = project.write().save();
            if let Err(err) = result {
                log::warn!("Autosave failed: {}", err);
            }
        }
    });

    // Build waveform peaks for a newly attached track, cancelling any build
    // still running for the previous one.
    let mut rebuild_peaks = move |asset_id: Uuid| {
        if let Some(previous) = peak_abort.read().as_ref() {
            previous.store(true, Ordering::Relaxed);
        }
        let abort = Arc::new(AtomicBool::new(false));
        peak_abort.set(Some(abort.clone()));
        let store = assets();
        spawn(async move {
            let cache_root = store.cache_root();
            let Some(source) = store.asset_path(asset_id) else {
                return;
            };
            let result = tokio::task::spawn_blocking(move || {
                waveform::build_and_store_peak_cache(&cache_root, asset_id, &source, &abort)
            })
            .await;
            match result {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => log::debug!("Peak build skipped: {}", err),
                Err(err) => log::warn!("Peak build task failed: {}", err),
            }
        });
    };

    // Resolve a stored audio reference into a playable track (project open).
    let load_audio_track = move |source_ref: String| {
        spawn(async move {
            let Ok(asset_id) = Uuid::parse_str(&source_ref) else {
                log::warn!("Audio source ref is not an asset id: {}", source_ref);
                return;
            };
            let Some(engine) = ensure_audio_engine() else {
                return;
            };
            let Some(path) = assets().asset_path(asset_id) else {
                notify("Audio track missing from the asset store".to_string());
                return;
            };
            let config = AudioDecodeConfig {
                target_rate: engine.sample_rate(),
                target_channels: engine.channels(),
            };
            let decoded =
                tokio::task::spawn_blocking(move || decode_audio_to_f32(&path, config)).await;
            match decoded {
                Ok(Ok(result)) => {
                    engine.set_track(Some(AudioTrack {
                        samples: std::sync::Arc::new(result.samples),
                        channels: result.meta.target_channels,
                    }));
                    rebuild_peaks(asset_id);
                }
                Ok(Err(err)) => notify(format!("Audio decode failed: {}", err)),
                Err(err) => notify(format!("Audio decode failed: {}", err)),
            }
        });
    };

    // ---------------------------------------------------------------------
    // Import / project IO
    // ---------------------------------------------------------------------

    let import_image = move || {
        spawn(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
            else {
                return;
            };
            let name = file.file_name();
            let bytes = file.read().await;
            let store = assets();
            let result =
                tokio::task::spawn_blocking(move || store.save_asset(&bytes, &name)).await;
            match result {
                Ok(Ok(asset_id)) => {
                    history
                        .write()
                        .save_state(&project.read().pages, &selection.read());
                    project.write().add_page(asset_id, false);
                    selection.write().clear();
                }
                Ok(Err(err)) => notify(format!("Image import failed: {}", err)),
                Err(err) => notify(format!("Image import failed: {}", err)),
            }
        });
    };

    let import_audio = move || {
        spawn(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("Audio", AUDIO_EXTENSIONS)
                .pick_file()
                .await
            else {
                return;
            };
            let name = file.file_name();
            let bytes = file.read().await;
            let store = assets();
            let save_name = name.clone();
            let saved =
                tokio::task::spawn_blocking(move || store.save_asset(&bytes, &save_name)).await;
            let asset_id = match saved {
                Ok(Ok(id)) => id,
                Ok(Err(err)) => {
                    notify(format!("Audio import failed: {}", err));
                    return;
                }
                Err(err) => {
                    notify(format!("Audio import failed: {}", err));
                    return;
                }
            };

            let Some(engine) = ensure_audio_engine() else {
                // Degrade: keep the descriptor so the project round-trips,
                // playback just runs on the wall clock.
                notify("No audio output device available".to_string());
                let audio = AudioFile::new(name, asset_id.to_string(), 0.0);
                project.write().set_audio_file(Some(audio));
                return;
            };

            let Some(path) = assets().asset_path(asset_id) else {
                notify("Stored audio asset went missing".to_string());
                return;
            };
            let config = AudioDecodeConfig {
                target_rate: engine.sample_rate(),
                target_channels: engine.channels(),
            };
            let decoded =
                tokio::task::spawn_blocking(move || decode_audio_to_f32(&path, config)).await;
            match decoded {
                Ok(Ok(result)) => {
                    let frames =
                        result.samples.len() as f64 / result.meta.target_channels.max(1) as f64;
                    let duration = result
                        .meta
                        .duration_seconds
                        .unwrap_or(frames / result.sample_rate.max(1) as f64);
                    engine.set_track(Some(AudioTrack {
                        samples: std::sync::Arc::new(result.samples),
                        channels: result.meta.target_channels,
                    }));
                    let audio = AudioFile::new(name, asset_id.to_string(), duration);
                    project.write().set_audio_file(Some(audio));
                    rebuild_peaks(asset_id);
                }
                Ok(Err(err)) => notify(format!("Audio decode failed: {}", err)),
                Err(err) => notify(format!("Audio decode failed: {}", err)),
            }
        });
    };

    let open_project = move || {
        spawn(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("Project", &["json"])
                .pick_file()
                .await
            else {
                return;
            };
            let path = file.path().to_path_buf();
            let loaded = tokio::task::spawn_blocking(move || Project::load(&path)).await;
            match loaded {
                Ok(Ok(loaded)) => {
                    let audio_ref = loaded.audio_file.as_ref().map(|a| a.source_ref.clone());
                    project.set(loaded);
                    selection.write().clear();
                    history.write().clear();
                    player.write().stop();
                    pause_audio();
                    if let Some(source_ref) = audio_ref {
                        load_audio_track(source_ref);
                    } else if let Some(engine) = audio_engine.read().as_ref() {
                        engine.set_track(None);
                    }
                }
                Ok(Err(err)) => notify(format!("Failed to open project: {}", err)),
                Err(err) => notify(format!("Failed to open project: {}", err)),
            }
        });
    };

    let save_project = move || {
        spawn(async move {
            let existing = project.read().project_path.clone();
            let path = match existing {
                Some(path) => Some(path),
                None => rfd::AsyncFileDialog::new()
                    .add_filter("Project", &["json"])
                    .set_file_name("project.json")
                    .save_file()
                    .await
                    .map(|handle| handle.path().to_path_buf()),
            };
            let Some(path) = path else { return };
            let result = {
                let mut project_write = project.write();
                project_write.project_path = Some(path.clone());
                project_write.save()
            };
            if let Err(err) = result {
                notify(format!("Save failed: {}", err));
                return;
            }
            // Garbage-collect assets nothing references anymore.
            let referenced: Vec<Uuid> = {
                let project_read = project.read();
                project_read
                    .pages
                    .iter()
                    .filter_map(|page| page.asset_id)
                    .chain(
                        project_read
                            .audio_file
                            .as_ref()
                            .and_then(|audio| Uuid::parse_str(&audio.source_ref).ok()),
                    )
                    .collect()
            };
            let store = assets();
            let _ = tokio::task::spawn_blocking(move || store.remove_unreferenced(&referenced))
                .await;
        });
    };

    // ---------------------------------------------------------------------
    // Editing actions shared by toolbar and hotkeys
    // ---------------------------------------------------------------------

    let mut delete_selected = move || {
        let ids = selection.read().segment_ids.clone();
        if ids.is_empty() {
            return;
        }
        history
            .write()
            .save_state(&project.read().pages, &selection.read());
        project.write().delete_segments(&ids);
        selection.write().clear();
    };

    let mut copy_selected = move || {
        let ids = selection.read().segment_ids.clone();
        clipboard.write().copy_from(&project.read(), &ids);
    };

    let mut paste_clipboard = move || {
        let snapshots = clipboard.read().segments.clone();
        if snapshots.is_empty() {
            return;
        }
        history
            .write()
            .save_state(&project.read().pages, &selection.read());
        let new_ids = project.write().paste_segments(&snapshots);
        if !new_ids.is_empty() {
            let mut selection_write = selection.write();
            selection_write.clear();
            selection_write.segment_ids = new_ids.clone();
            selection_write.last_selected = new_ids.last().copied();
        }
    };

    let mut do_undo = move || {
        let snapshot = history
            .write()
            .undo(&project.read().pages, &selection.read());
        if let Some(snapshot) = snapshot {
            project.write().pages = snapshot.pages;
            selection.set(snapshot.selection);
        }
    };

    let mut do_redo = move || {
        let snapshot = history
            .write()
            .redo(&project.read().pages, &selection.read());
        if let Some(snapshot) = snapshot {
            project.write().pages = snapshot.pages;
            selection.set(snapshot.selection);
        }
    };

    let mut toggle_player = move || {
        if player_open() {
            // Close is total cleanup: stop the state machine, silence and
            // rewind audio, drop the pre-roll.
            player.write().shutdown();
            pause_audio();
            rewind_audio();
            player_open.set(false);
        } else {
            ensure_audio_engine();
            player_open.set(true);
        }
    };

    let can_undo = history.read().can_undo();
    let can_redo = history.read().can_redo();
    let is_drawing = view.read().is_drawing;
    let draw_label = if is_drawing { "Draw ✓" } else { "Draw" };
    let aspect_label = match draw_aspect() {
        None => "Free".to_string(),
        Some((w, h)) => format!("{}:{}", w as u32, h as u32),
    };
    let zoom_pct = (view.read().zoom * 100.0).round();
    let project_name = project.read().name.clone();
    let remote_text = remote_url
        .read()
        .clone()
        .unwrap_or_else(|| "remote offline".to_string());
    let audio_name = project.read().audio_file.as_ref().map(|a| a.name.clone());

    let toolbar_button = format!(
        "font-size: 11px; padding: 5px 10px; cursor: pointer; border-radius: 4px;
         background-color: {BG_ELEVATED}; color: {TEXT_PRIMARY};
         border: 1px solid {BORDER_DEFAULT}; white-space: nowrap;"
    );

    rsx! {
        div {
            style: "
                display: flex; flex-direction: column;
                width: 100vw; height: 100vh; overflow: hidden;
                background-color: {BG_BASE}; color: {TEXT_PRIMARY};
                font-family: system-ui, sans-serif;
            ",
            tabindex: "0",
            onkeydown: move |e| {
                let modifiers = e.modifiers();
                let context = HotkeyContext {
                    has_selection: !selection.read().is_empty(),
                    input_focused: false,
                    player_open: player_open(),
                };
                let result = handle_hotkey(
                    &e.key(),
                    modifiers.shift(),
                    modifiers.ctrl(),
                    modifiers.alt(),
                    modifiers.meta(),
                    &context,
                );
                let HotkeyResult::Action(action) = result else { return };
                e.prevent_default();
                match action {
                    HotkeyAction::SaveProject => save_project(),
                    HotkeyAction::PlayPause => {
                        if !player_open() {
                            toggle_player();
                        }
                        player.write().toggle_play();
                        match player.read().phase() {
                            PlayerPhase::Playing => start_audio_at(player.read().position()),
                            _ => pause_audio(),
                        }
                    }
                    HotkeyAction::Escape => {
                        if matches!(player.read().phase(), PlayerPhase::Countdown(_)) {
                            player.write().cancel_countdown();
                        } else if player_open() {
                            toggle_player();
                        }
                    }
                    HotkeyAction::DeleteSelection => delete_selected(),
                    HotkeyAction::DuplicateSegment => {
                        if let Some(id) = selection.read().last_selected {
                            history
                                .write()
                                .save_state(&project.read().pages, &selection.read());
                            project.write().duplicate_segment(id);
                        }
                    }
                    HotkeyAction::Copy => copy_selected(),
                    HotkeyAction::Paste => paste_clipboard(),
                    HotkeyAction::Undo => do_undo(),
                    HotkeyAction::Redo => do_redo(),
                    HotkeyAction::ToggleDrawTool => {
                        let mut view_write = view.write();
                        view_write.is_drawing = !view_write.is_drawing;
                    }
                    HotkeyAction::PrevSegment => {
                        bus.read().emit_remote(RemoteEvent::PrevSegment);
                    }
                    HotkeyAction::NextSegment => {
                        bus.read().emit_remote(RemoteEvent::NextSegment);
                    }
                }
            },

            // Toolbar
            div {
                style: "
                    display: flex; gap: 6px; align-items: center;
                    padding: 8px 10px; flex-shrink: 0;
                    background-color: {BG_SURFACE}; border-bottom: 1px solid {BORDER_DEFAULT};
                ",
                input {
                    r#type: "text",
                    value: "{project_name}",
                    style: "
                        font-size: 12px; padding: 4px 8px; width: 160px;
                        background-color: {BG_ELEVATED}; color: {TEXT_PRIMARY};
                        border: 1px solid {BORDER_DEFAULT}; border-radius: 4px;
                    ",
                    onchange: move |e| {
                        project.write().name = e.value();
                    },
                }
                button { style: "{toolbar_button}", onclick: move |_| open_project(), "Open" }
                button { style: "{toolbar_button}", onclick: move |_| save_project(), "Save" }
                button { style: "{toolbar_button}", onclick: move |_| import_image(), "Import image" }
                button { style: "{toolbar_button}", onclick: move |_| import_audio(), "Import audio" }
                button {
                    style: "{toolbar_button}",
                    onclick: move |_| {
                        let mut view_write = view.write();
                        view_write.is_drawing = !view_write.is_drawing;
                    },
                    "{draw_label}"
                }
                button {
                    style: "{toolbar_button}",
                    onclick: move |_| {
                        // Cycle the draw-tool aspect lock.
                        let next = match draw_aspect() {
                            None => Some((1.0, 1.0)),
                            Some((w, h)) if w == h => Some((16.0, 9.0)),
                            Some((w, _)) if w == 16.0 => Some((4.0, 3.0)),
                            Some(_) => None,
                        };
                        draw_aspect.set(next);
                    },
                    "{aspect_label}"
                }
                button {
                    style: "{toolbar_button}",
                    onclick: move |_| {
                        let mut view_write = view.write();
                        view_write.zoom_by(1.0 / 1.25);
                        if view_write.zoom <= 1.0 {
                            view_write.reset_pan();
                        }
                    },
                    "−"
                }
                span { style: "font-size: 10px; color: {TEXT_MUTED};", "{zoom_pct}%" }
                button {
                    style: "{toolbar_button}",
                    onclick: move |_| view.write().zoom_by(1.25),
                    "+"
                }
                button {
                    style: "{toolbar_button}",
                    disabled: !can_undo,
                    onclick: move |_| do_undo(),
                    "Undo"
                }
                button {
                    style: "{toolbar_button}",
                    disabled: !can_redo,
                    onclick: move |_| do_redo(),
                    "Redo"
                }
                button {
                    style: "{toolbar_button} border-color: {BORDER_ACCENT};",
                    onclick: move |_| toggle_player(),
                    "▶ Present"
                }

                div { style: "flex: 1;" }

                if let Some(audio_name) = audio_name {
                    span { style: "font-size: 10px; color: {TEXT_MUTED};", "♪ {audio_name}" }
                }
                span { style: "font-size: 10px; color: {TEXT_MUTED};", "{remote_text}" }
            }

            // Main row: pages | canvas | properties
            div {
                style: "display: flex; flex: 1; overflow: hidden;",
                div {
                    style: "
                        width: 180px; flex-shrink: 0; overflow: hidden;
                        background-color: {BG_ELEVATED}; border-right: 1px solid {BORDER_DEFAULT};
                        display: flex; flex-direction: column;
                    ",
                    PageList {
                        project,
                        selection,
                        history,
                        assets: assets(),
                        on_import: move |_| import_image(),
                    }
                }
                CanvasEditor {
                    project,
                    selection,
                    view,
                    history,
                    assets: assets(),
                    draw_aspect: draw_aspect(),
                }
                div {
                    style: "
                        width: {PANEL_DEFAULT_WIDTH}px; flex-shrink: 0; overflow: hidden;
                        background-color: {BG_ELEVATED}; border-left: 1px solid {BORDER_DEFAULT};
                        display: flex; flex-direction: column;
                    ",
                    PropertiesPanel { project, selection, history }
                }
            }

            // Segment strip
            SegmentStrip { project, selection, history }

            // Transient notification toast
            if let Some(message) = notification() {
                div {
                    style: "
                        position: fixed; bottom: 16px; left: 50%; transform: translateX(-50%);
                        background-color: {BG_ELEVATED}; color: {TEXT_PRIMARY};
                        border: 1px solid {BORDER_DEFAULT}; border-radius: 6px;
                        padding: 8px 14px; font-size: 12px; z-index: 10000;
                        box-shadow: 0 4px 12px rgba(0,0,0,0.4);
                    ",
                    "{message}"
                }
            }

            if player_open() {
                PlayerOverlay {
                    project,
                    player,
                    audio: audio_engine,
                    bus,
                    assets: assets(),
                    on_close: move |_| toggle_player(),
                }
            }
        }
    }
}
