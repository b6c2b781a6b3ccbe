//! Audio playback engine (cpal output + audio clock).
//!
//! The output callback mixes at most one project track plus the countdown
//! beep. The atomic playhead advanced by the callback doubles as the
//! authoritative playback clock whenever a track is attached - the player
//! reads [`AudioPlaybackEngine::playhead_seconds`] instead of accumulating
//! wall-clock time.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// A decoded track ready for the output callback: interleaved f32 at the
/// engine's sample rate and channel count.
#[derive(Clone)]
pub struct AudioTrack {
    pub samples: Arc<Vec<f32>>,
    pub channels: u16,
}

impl AudioTrack {
    pub fn frames(&self) -> u64 {
        let channels = self.channels.max(1) as usize;
        (self.samples.len() / channels) as u64
    }
}

struct BeepState {
    remaining_frames: u64,
    phase: f32,
    step: f32,
}

pub struct AudioPlaybackEngine {
    _stream: cpal::Stream,
    track: Arc<Mutex<Option<AudioTrack>>>,
    beep: Arc<Mutex<Option<BeepState>>>,
    playing: Arc<AtomicBool>,
    muted: Arc<AtomicBool>,
    playhead_frames: Arc<AtomicU64>,
    sample_rate: u32,
    channels: u16,
}

impl AudioPlaybackEngine {
    pub fn new() -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| "No default audio output device found.".to_string())?;
        let config = select_output_config(&device)?;
        let sample_rate = config.sample_rate.0;
        let channels = config.channels;

        let track = Arc::new(Mutex::new(None::<AudioTrack>));
        let beep = Arc::new(Mutex::new(None::<BeepState>));
        let playing = Arc::new(AtomicBool::new(false));
        let muted = Arc::new(AtomicBool::new(false));
        let playhead_frames = Arc::new(AtomicU64::new(0));

        let track_for_cb = Arc::clone(&track);
        let beep_for_cb = Arc::clone(&beep);
        let playing_for_cb = Arc::clone(&playing);
        let muted_for_cb = Arc::clone(&muted);
        let playhead_for_cb = Arc::clone(&playhead_frames);
        let channels_for_cb = channels;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _| {
                    for sample in data.iter_mut() {
                        *sample = 0.0;
                    }
                    let frames = data.len() / channels_for_cb.max(1) as usize;

                    // Countdown beep plays regardless of track playback.
                    if let Ok(mut beep_guard) = beep_for_cb.lock() {
                        if let Some(state) = beep_guard.as_mut() {
                            let beep_frames = (state.remaining_frames as usize).min(frames);
                            for frame in 0..beep_frames {
                                let value = (state.phase * std::f32::consts::TAU).sin() * 0.25;
                                state.phase = (state.phase + state.step).fract();
                                let base = frame * channels_for_cb as usize;
                                for channel in 0..channels_for_cb as usize {
                                    data[base + channel] += value;
                                }
                            }
                            state.remaining_frames =
                                state.remaining_frames.saturating_sub(beep_frames as u64);
                            if state.remaining_frames == 0 {
                                *beep_guard = None;
                            }
                        }
                    }

                    if !playing_for_cb.load(Ordering::Relaxed) {
                        return;
                    }

                    let start_frame = playhead_for_cb.load(Ordering::Relaxed);
                    let end_frame = start_frame + frames as u64;
                    let silent = muted_for_cb.load(Ordering::Relaxed);

                    if !silent {
                        if let Ok(track_guard) = track_for_cb.lock() {
                            if let Some(track) = track_guard.as_ref() {
                                if track.channels == channels_for_cb {
                                    mix_track(data, track, start_frame, channels_for_cb);
                                }
                            }
                        }
                    }

                    // The playhead advances even while muted: it is the clock.
                    playhead_for_cb.store(end_frame, Ordering::Relaxed);
                },
                move |err| {
                    log::error!("Audio output error: {}", err);
                },
                None,
            )
            .map_err(|err| err.to_string())?;

        stream.play().map_err(|err| err.to_string())?;

        Ok(Self {
            _stream: stream,
            track,
            beep,
            playing,
            muted,
            playhead_frames,
            sample_rate,
            channels,
        })
    }

    /// Attach (or detach) the project track. Resets the playhead.
    pub fn set_track(&self, track: Option<AudioTrack>) {
        if let Ok(mut guard) = self.track.lock() {
            *guard = track;
        }
        self.playhead_frames.store(0, Ordering::Relaxed);
    }

    /// True when a track is currently loaded.
    pub fn has_track(&self) -> bool {
        self.track.lock().map(|t| t.is_some()).unwrap_or(false)
    }

    pub fn play(&self) {
        self.playing.store(true, Ordering::Relaxed);
    }

    pub fn pause(&self) {
        self.playing.store(false, Ordering::Relaxed);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    pub fn seek_seconds(&self, time_seconds: f64) {
        let frame = (time_seconds.max(0.0) * self.sample_rate as f64).round() as u64;
        self.playhead_frames.store(frame, Ordering::Relaxed);
    }

    pub fn playhead_seconds(&self) -> f64 {
        self.playhead_frames.load(Ordering::Relaxed) as f64 / self.sample_rate as f64
    }

    /// Queue a short countdown beep.
    pub fn beep(&self, frequency_hz: f32, duration_seconds: f32) {
        let step = frequency_hz / self.sample_rate as f32;
        let remaining_frames = (duration_seconds.max(0.0) * self.sample_rate as f32) as u64;
        if let Ok(mut guard) = self.beep.lock() {
            *guard = Some(BeepState {
                remaining_frames,
                phase: 0.0,
                step,
            });
        }
    }

    /// Stop playback and unload the track (player window teardown).
    pub fn unload(&self) {
        self.pause();
        self.set_track(None);
        if let Ok(mut guard) = self.beep.lock() {
            *guard = None;
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

fn mix_track(data: &mut [f32], track: &AudioTrack, start_frame: u64, channels: u16) {
    let channels = channels.max(1) as usize;
    let frames = data.len() / channels;
    let track_frames = track.frames();
    if start_frame >= track_frames {
        return;
    }

    let available = ((track_frames - start_frame) as usize).min(frames);
    let offset = start_frame as usize * channels;
    let count = available * channels;
    if offset + count > track.samples.len() {
        return;
    }
    for i in 0..count {
        data[i] += track.samples[offset + i];
    }
}

fn select_output_config(device: &cpal::Device) -> Result<cpal::StreamConfig, String> {
    let configs: Vec<_> = device
        .supported_output_configs()
        .map_err(|err| err.to_string())?
        .filter(|config| config.sample_format() == cpal::SampleFormat::F32)
        .collect();

    let target_rate = cpal::SampleRate(48_000);
    if let Some(config) = configs.iter().find(|config| {
        config.min_sample_rate() <= target_rate && config.max_sample_rate() >= target_rate
    }) {
        return Ok(config.with_sample_rate(target_rate).config());
    }

    let default_config = device
        .default_output_config()
        .map_err(|err| err.to_string())?;
    if default_config.sample_format() != cpal::SampleFormat::F32 {
        return Err("Default output device does not support f32 sample format.".to_string());
    }
    Ok(default_config.config())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_track_respects_bounds() {
        let track = AudioTrack {
            samples: Arc::new(vec![0.5; 8]),
            channels: 2,
        };
        let mut data = vec![0.0_f32; 8];
        // Start past the end of the track: output stays silent.
        mix_track(&mut data, &track, 100, 2);
        assert!(data.iter().all(|s| *s == 0.0));

        // Overlapping the tail mixes only the available frames.
        mix_track(&mut data, &track, 2, 2);
        assert_eq!(&data[0..4], &[0.5, 0.5, 0.5, 0.5]);
        assert_eq!(&data[4..], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_track_frame_count() {
        let track = AudioTrack {
            samples: Arc::new(vec![0.0; 96]),
            channels: 2,
        };
        assert_eq!(track.frames(), 48);
    }
}
