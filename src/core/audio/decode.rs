//! Audio decoding via symphonia.
//!
//! Decodes an audio file into interleaved f32 either in one shot
//! ([`decode_audio_to_f32`], resampled to a target rate for the playback
//! engine) or chunk-by-chunk ([`decode_audio_chunks`]) for waveform peak
//! extraction. The chunk callback returning `false` stops the decode early;
//! that is the cancellation mechanism for decodes whose owning asset went
//! away mid-flight.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::resample::linear_resample;

#[derive(Clone, Copy, Debug)]
pub struct AudioDecodeConfig {
    pub target_rate: u32,
    pub target_channels: u16,
}

impl Default for AudioDecodeConfig {
    fn default() -> Self {
        Self {
            target_rate: 48_000,
            target_channels: 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AudioDecodeMeta {
    pub source_rate: u32,
    pub source_channels: u16,
    pub target_channels: u16,
    pub duration_seconds: Option<f64>,
}

pub struct AudioDecodeResult {
    pub meta: AudioDecodeMeta,
    /// Interleaved f32 at the requested target rate and channel count.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Decode a whole file and resample it for the playback engine.
pub fn decode_audio_to_f32(
    path: &Path,
    config: AudioDecodeConfig,
) -> Result<AudioDecodeResult, String> {
    let mut native = Vec::new();
    let meta = decode_audio_chunks(path, config.target_channels, |chunk| {
        native.extend_from_slice(chunk);
        true
    })?;

    let samples = linear_resample(
        &native,
        meta.target_channels,
        meta.source_rate,
        config.target_rate,
    );
    Ok(AudioDecodeResult {
        meta,
        samples,
        sample_rate: config.target_rate,
    })
}

/// Decode packet-by-packet, delivering interleaved f32 at the source rate
/// remixed to `target_channels`. Return `false` from the callback to stop.
pub fn decode_audio_chunks<F>(
    path: &Path,
    target_channels: u16,
    mut on_samples: F,
) -> Result<AudioDecodeMeta, String>
where
    F: FnMut(&[f32]) -> bool,
{
    let file = File::open(path).map_err(|err| format!("{}: {}", path.display(), err))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| format!("Unsupported audio format: {}", err))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| "No audio track found".to_string())?;
    let track_id = track.id;

    let source_rate = track.codec_params.sample_rate.unwrap_or(44_100);
    let source_channels = track
        .codec_params
        .channels
        .map(|channels| channels.count() as u16)
        .unwrap_or(2);
    let duration_seconds = track
        .codec_params
        .n_frames
        .map(|frames| frames as f64 / source_rate.max(1) as f64);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| format!("Failed to create audio decoder: {}", err))?;

    log::debug!(
        "[AUDIO] Decode start: path={:?} source_rate={} source_channels={}",
        path,
        source_rate,
        source_channels
    );

    let meta = AudioDecodeMeta {
        source_rate,
        source_channels,
        target_channels,
        duration_seconds,
    };

    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err.to_string()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::<f32>::new(decoded.capacity() as u64, spec)
                });
                buf.copy_interleaved_ref(decoded);
                let remixed =
                    remix_channels(buf.samples(), spec.channels.count() as u16, target_channels);
                if !on_samples(&remixed) {
                    log::debug!("[AUDIO] Decode cancelled: path={:?}", path);
                    break;
                }
            }
            // A corrupt packet degrades to a glitch, not a failed import.
            Err(SymphoniaError::DecodeError(err)) => {
                log::warn!("[AUDIO] Skipping undecodable packet: {}", err);
                continue;
            }
            Err(err) => return Err(err.to_string()),
        }
    }

    Ok(meta)
}

/// Remix interleaved samples to the requested channel count.
///
/// Downmix averages across channels; upmix replicates the first channel.
pub fn remix_channels(samples: &[f32], source_channels: u16, target_channels: u16) -> Vec<f32> {
    let source_channels = source_channels.max(1) as usize;
    let target_channels = target_channels.max(1) as usize;
    if source_channels == target_channels {
        return samples.to_vec();
    }

    let frames = samples.len() / source_channels;
    let mut out = Vec::with_capacity(frames * target_channels);
    for frame in 0..frames {
        let base = frame * source_channels;
        if target_channels < source_channels {
            let sum: f32 = samples[base..base + source_channels].iter().sum();
            let mixed = sum / source_channels as f32;
            for _ in 0..target_channels {
                out.push(mixed);
            }
        } else {
            for channel in 0..target_channels {
                let source = channel.min(source_channels - 1);
                out.push(samples[base + source]);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remix_stereo_to_mono_averages() {
        let samples = vec![1.0, 0.0, 0.5, 0.5];
        let mono = remix_channels(&samples, 2, 1);
        assert_eq!(mono, vec![0.5, 0.5]);
    }

    #[test]
    fn test_remix_mono_to_stereo_duplicates() {
        let samples = vec![0.25, -0.25];
        let stereo = remix_channels(&samples, 1, 2);
        assert_eq!(stereo, vec![0.25, 0.25, -0.25, -0.25]);
    }

    #[test]
    fn test_decode_missing_file_errors() {
        let result = decode_audio_chunks(Path::new("/nonexistent/audio.mp3"), 2, |_| true);
        assert!(result.is_err());
    }
}
